use std::error::Error;

/// Everything the user sees, already formatted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayView {
    pub image_text: String,
    pub status_text: String,
    /// Busy indicator text while working, otherwise the label count.
    pub side_text: String,
    pub consent: bool,
    pub classify_enabled: bool,
    pub button_text: String,
    /// Best label and its confidence, e.g. `("Serous", "87.50%")`.
    pub best_match: Option<(String, String)>,
    pub alert: Option<String>,
}

pub trait DeviceDisplay: Send + Sync {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn render(&mut self, view: &DisplayView) -> Result<(), Box<dyn Error + Send + Sync>>;
}
