use crate::device_display::interface::{DeviceDisplay, DisplayView};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Keeps every rendered view for inspection.
#[derive(Clone)]
pub struct DeviceDisplayFake {
    views: Arc<Mutex<Vec<DisplayView>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self {
            views: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn views(&self) -> Vec<DisplayView> {
        self.views
            .lock()
            .map(|views| views.clone())
            .unwrap_or_default()
    }

    pub fn last_view(&self) -> Option<DisplayView> {
        self.views().pop()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn render(&mut self, view: &DisplayView) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views
            .lock()
            .map_err(|e| e.to_string())?
            .push(view.clone());
        Ok(())
    }
}
