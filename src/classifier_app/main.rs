use crate::classifier_app::core::{init, transition, Effect, Event, State};
use crate::classifier_app::render::Render;
use crate::classifier_app::run_effect::RunEffect;
use crate::config::Config;
use crate::device_display::interface::DeviceDisplay;
use crate::device_input::interface::DeviceInput;
use crate::image_classifier::pipeline::InferencePipeline;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::model_loader::loader::ModelLoader;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct ClassifierApp {
    logger: Arc<dyn Logger + Send + Sync>,
    render: Render,
    run_effect: RunEffect,
}

impl ClassifierApp {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_input: Arc<dyn DeviceInput + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        model_loader: Arc<ModelLoader>,
        pipeline: InferencePipeline,
    ) -> Self {
        let logger = logger.with_namespace("classifier_app");
        Self {
            render: Render::new(device_display),
            run_effect: RunEffect::new(config, logger.clone(), device_input, model_loader, pipeline),
            logger,
        }
    }

    fn transition(&self, state: State, event: Event) -> (State, Vec<Effect>) {
        let _ = self
            .logger
            .info(&format!("event: {}", event.to_display_string()));
        let (state, effects) = transition(state, event);
        let _ = self.logger.info(&format!(
            "status: {}, effects: {:?}",
            state.status.as_str(),
            effects
        ));
        (state, effects)
    }

    fn render(&self, state: &State) {
        if let Err(e) = self.render.render(state) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }
    }

    /// Runs until the input closes and no classification is in flight.
    pub fn run(&self) -> Result<State, Box<dyn std::error::Error + Send + Sync>> {
        let clone1 = self.clone();
        let clone2 = self.clone();
        let clone3 = self.clone();

        let state_machine = StateMachine::new(
            init(),
            move |state, event| clone1.transition(state, event),
            move |state: &State| clone2.render(state),
            move |effect, sender: Sender<Event>| clone3.run_effect.run_effect(effect, sender),
            |state: &State| state.is_done(),
        );

        state_machine.run()
    }
}
