use crate::classifier_app::core::{transition, Effect, Event, State};
use crate::classifier_app::main::ClassifierApp;
use crate::classifier_app::run_effect::RunEffect;
use crate::config::Config;
use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::device_input::impl_fake::DeviceInputFake;
use crate::device_input::interface::InputEvent;
use crate::http::impl_fake::HttpClientFake;
use crate::image_classifier::impl_fake::{ImageModelFake, ModelDecoderFake};
use crate::image_classifier::pipeline::InferencePipeline;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::model_loader::loader::ModelLoader;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const MODEL_URL: &str = "https://models.example/ovarian/model.onnx";
pub const METADATA_URL: &str = "https://models.example/ovarian/metadata.json";

pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub http_client: Arc<HttpClientFake>,
    pub model: Arc<ImageModelFake>,
    pub model_loader: Arc<ModelLoader>,
    pub pipeline: InferencePipeline,
    pub device_display: DeviceDisplayFake,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_model(ImageModelFake::new(vec![0.1, 0.7, 0.2]))
    }

    pub fn with_model(model: ImageModelFake) -> Self {
        let model = Arc::new(model);
        Self::with_decoder(model.clone(), ModelDecoderFake::new(model))
    }

    pub fn with_decoder(model: Arc<ImageModelFake>, model_decoder: ModelDecoderFake) -> Self {
        let config = Config {
            model_url: MODEL_URL.to_string(),
            metadata_url: Some(METADATA_URL.to_string()),
            ..Config::default()
        };
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let http_client = Arc::new(HttpClientFake::new());
        http_client.respond(MODEL_URL, 200, b"onnx-bytes");
        http_client.respond(
            METADATA_URL,
            200,
            br#"{"labels": ["Clear cell", "Serous", "Mucinous"]}"#,
        );

        let model_loader = Arc::new(ModelLoader::new(
            http_client.clone(),
            Arc::new(model_decoder),
            logger.clone(),
        ));
        let pipeline = InferencePipeline::new(logger.clone());

        Self {
            config,
            logger,
            http_client,
            model,
            model_loader,
            pipeline,
            device_display: DeviceDisplayFake::new(),
        }
    }

    pub fn run_effect(&self, script: Vec<InputEvent>) -> RunEffect {
        RunEffect::new(
            self.config.clone(),
            self.logger.clone(),
            Arc::new(DeviceInputFake::new(script)),
            self.model_loader.clone(),
            self.pipeline.clone(),
        )
    }

    pub fn app(&self, script: Vec<InputEvent>) -> ClassifierApp {
        let device_display = Arc::new(Mutex::new(self.device_display.clone()));
        ClassifierApp::new(
            self.config.clone(),
            self.logger.clone(),
            Arc::new(DeviceInputFake::new(script)),
            device_display,
            self.model_loader.clone(),
            self.pipeline.clone(),
        )
    }

    /// Applies `events` in order, running every resulting effect inline and
    /// feeding its completion event back before the next input event.
    pub fn drive(&self, state: State, events: Vec<Event>) -> State {
        let run_effect = self.run_effect(vec![]);
        let mut queue: VecDeque<Event> = events.into();
        let mut state = state;

        while let Some(event) = queue.pop_front() {
            let (next, effects) = transition(state, event);
            state = next;

            let mut completions = Vec::new();
            for effect in effects {
                if effect == Effect::SubscribeToInput {
                    continue;
                }
                let (sender, receiver) = std::sync::mpsc::channel();
                run_effect.run_effect(effect, sender);
                completions.extend(receiver.try_iter());
            }
            for completion in completions.into_iter().rev() {
                queue.push_front(completion);
            }
        }

        state
    }
}

pub fn png_bytes() -> Vec<u8> {
    let mut img = ImageBuffer::new(32, 32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([180, (x * 7) as u8, (y * 7) as u8]);
    }
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

/// Writes `bytes` to a file unique to `name` under the temp dir.
pub fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "histology-classifier-{}-{}",
        std::process::id(),
        name
    ));
    std::fs::write(&path, bytes).unwrap();
    path
}
