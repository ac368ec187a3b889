use crate::classifier_app::core::State;
use crate::device_display::interface::{DeviceDisplay, DisplayView};
use std::error::Error;
use std::sync::{Arc, Mutex};

pub fn view(state: &State) -> DisplayView {
    DisplayView {
        image_text: match &state.image {
            Some(image) => image.path.display().to_string(),
            None => "No image chosen".to_string(),
        },
        status_text: state.status.to_display_string(),
        side_text: if state.loading {
            "...".to_string()
        } else {
            state.label_count.to_display_string()
        },
        consent: state.consent,
        classify_enabled: state.image.is_some() && state.consent && !state.loading,
        button_text: if state.loading { "Working..." } else { "Classify" }.to_string(),
        best_match: state.predictions.first().map(|best| {
            (
                best.label.clone(),
                format!("{:.2}%", best.probability * 100.0),
            )
        }),
        alert: state.alert.clone(),
    }
}

#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self { device_display }
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.device_display
            .lock()
            .map_err(|e| e.to_string())?
            .render(&view(state))
    }
}
