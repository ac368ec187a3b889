use crate::classifier_app::core::{Effect, Event, LabelCount};
use crate::config::Config;
use crate::device_input::interface::DeviceInput;
use crate::error::ClassifierError;
use crate::image_classifier::pipeline::InferencePipeline;
use crate::library::logger::interface::Logger;
use crate::model_loader::loader::ModelLoader;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc::Sender;
use std::sync::Arc;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_input: Arc<dyn DeviceInput + Send + Sync>,
    model_loader: Arc<ModelLoader>,
    pipeline: InferencePipeline,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        model_loader: Arc<ModelLoader>,
        pipeline: InferencePipeline,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("run_effect"),
            device_input,
            model_loader,
            pipeline,
        }
    }

    /// A panic inside `work` becomes an error, so the completion event is
    /// still sent and the state leaves `loading`.
    fn catch_panic<T>(
        &self,
        work: impl FnOnce() -> Result<T, ClassifierError>,
        to_error: fn(String) -> ClassifierError,
    ) -> Result<T, ClassifierError> {
        std::panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|payload| {
            let e = to_error(format!("panicked: {}", panic_message(payload.as_ref())));
            let _ = self.logger.error(&e.to_string());
            Err(e)
        })
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::SubscribeToInput => {
                let events = self.device_input.events();
                for event in events.iter() {
                    if event_sender.send(event.into()).is_err() {
                        return;
                    }
                }
                let _ = event_sender.send(Event::InputClosed);
            }
            Effect::ReadImage { path } => {
                let result = std::fs::read(&path).map_err(|e| e.to_string());
                if let Err(e) = &result {
                    let _ = self
                        .logger
                        .error(&format!("Reading {}: {}", path.display(), e));
                }
                let _ = event_sender.send(Event::ImageReadDone { path, result });
            }
            Effect::LoadModel => {
                let loaded = self.catch_panic(
                    || {
                        self.model_loader
                            .ensure_model(&self.config.model_url, self.config.metadata_url.as_deref())
                            .map(|_| {
                                LabelCount::from_metadata(self.model_loader.cached_metadata().as_ref())
                            })
                    },
                    ClassifierError::Load,
                );
                let _ = event_sender.send(Event::ModelLoadDone(loaded));
            }
            Effect::Classify { image } => {
                let predictions = self.catch_panic(
                    || {
                        let loaded = self.model_loader.ensure_model(
                            &self.config.model_url,
                            self.config.metadata_url.as_deref(),
                        )?;
                        self.pipeline.classify_bytes(
                            &image,
                            loaded.model.as_ref(),
                            loaded.metadata.as_ref(),
                            self.config.top_k,
                        )
                    },
                    ClassifierError::Inference,
                );
                let _ = event_sender.send(Event::ClassifyDone(predictions));
            }
        }
    }
}
