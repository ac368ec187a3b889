use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ImageSelected(PathBuf),
    ConsentChanged(bool),
    ClassifyClicked,
    EnterPressed,
    AlertDismissed,
}

pub trait DeviceInput {
    /// The receiver disconnects when the user closes the input.
    fn events(&self) -> std::sync::mpsc::Receiver<InputEvent>;
}
