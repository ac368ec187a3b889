use crate::device_input::interface::{DeviceInput, InputEvent};

/// Replays a fixed script of events, then closes.
pub struct DeviceInputFake {
    script: Vec<InputEvent>,
}

impl DeviceInputFake {
    pub fn new(script: Vec<InputEvent>) -> Self {
        Self { script }
    }
}

impl DeviceInput for DeviceInputFake {
    fn events(&self) -> std::sync::mpsc::Receiver<InputEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        for event in self.script.iter().cloned() {
            if tx.send(event).is_err() {
                break;
            }
        }
        rx
    }
}
