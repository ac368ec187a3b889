use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("no image selected")]
    MissingImage,

    #[error("disclaimer not acknowledged")]
    MissingConsent,

    #[error("model load failed: {0}")]
    Load(String),

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl ClassifierError {
    /// Text shown to the user in the blocking alert.
    pub fn alert_message(&self) -> String {
        match self {
            ClassifierError::MissingImage => "Please upload an image first.".to_string(),
            ClassifierError::MissingConsent => {
                "Please acknowledge the disclaimer to continue.".to_string()
            }
            ClassifierError::Load(_) => {
                "Failed to load model. Try again or use local model fallback (advanced)."
                    .to_string()
            }
            ClassifierError::Decode(_) => "Failed to load the image for prediction.".to_string(),
            ClassifierError::Inference(_) => "Prediction failed, see log for details.".to_string(),
        }
    }

    pub fn is_input_failure(&self) -> bool {
        matches!(
            self,
            ClassifierError::MissingImage | ClassifierError::MissingConsent
        )
    }
}
