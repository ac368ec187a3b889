use clap::Parser;
use classifier_app::main::ClassifierApp;
use config::{Args, Config, DisplayKind};
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceGui;
use device_display::interface::DeviceDisplay;
use device_input::impl_console::DeviceInputConsole;
use device_input::interface::DeviceInput;
use http::impl_reqwest::HttpClientReqwest;
use image_classifier::impl_tract::ModelDecoderTract;
use image_classifier::pipeline::InferencePipeline;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use model_loader::loader::ModelLoader;
use std::sync::{Arc, Mutex};

mod classifier_app;
mod config;
mod device_display;
mod device_input;
mod error;
mod http;
mod image_classifier;
mod library;
mod model_loader;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_args(Args::parse());

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    if config.model_url.is_empty() {
        logger.info("No --model-url given, classification will fail until one is set")?;
    }

    let http_client = Arc::new(HttpClientReqwest::new(
        logger.clone(),
        config.http_connect_timeout,
        config.http_timeout,
    )?);

    let model_decoder = Arc::new(ModelDecoderTract::new(logger.clone()));

    let model_loader = Arc::new(ModelLoader::new(
        http_client,
        model_decoder,
        logger.clone(),
    ));

    let pipeline = InferencePipeline::new(logger.clone());

    match config.display {
        DisplayKind::Console => {
            let device_input: Arc<dyn DeviceInput + Send + Sync> =
                Arc::new(DeviceInputConsole::new(logger.clone()));

            let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(DeviceDisplayConsole::new()));
            device_display.lock().map_err(|e| e.to_string())?.init()?;

            let app = ClassifierApp::new(
                config,
                logger,
                device_input,
                device_display,
                model_loader,
                pipeline,
            );

            app.run()?;
        }
        DisplayKind::Gui => {
            let device_gui = DeviceGui::new();

            let app = ClassifierApp::new(
                config,
                logger.clone(),
                Arc::new(device_gui.clone()),
                Arc::new(Mutex::new(device_gui.clone())),
                model_loader,
                pipeline,
            );

            std::thread::spawn(move || {
                if let Err(e) = app.run() {
                    let _ = logger.error(&format!("App stopped: {}", e));
                }
            });

            // The window owns the main thread until it is closed.
            device_gui.run_window()?;
        }
    }

    Ok(())
}
