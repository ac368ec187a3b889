use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub probability: f64,
}

/// Preprocessed model input, NHWC with a leading batch of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    pub shape: [usize; 4],
    pub data: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl OutputTensor {
    pub fn from_values(data: Vec<f32>) -> Self {
        Self {
            shape: vec![1, data.len()],
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Single(OutputTensor),
    Multiple(Vec<OutputTensor>),
}

impl ModelOutput {
    /// The class-probability tensor is the first output.
    pub fn into_first(self) -> Option<OutputTensor> {
        match self {
            ModelOutput::Single(tensor) => Some(tensor),
            ModelOutput::Multiple(tensors) => tensors.into_iter().next(),
        }
    }
}

pub trait ImageModel {
    /// Declared input shape in NHWC order. `None` entries are symbolic or unknown.
    fn input_shape(&self) -> Option<Vec<Option<usize>>>;

    fn predict(
        &self,
        input: InputTensor,
    ) -> Result<ModelOutput, Box<dyn std::error::Error + Send + Sync>>;
}

pub trait ModelDecoder {
    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<Arc<dyn ImageModel + Send + Sync>, Box<dyn std::error::Error + Send + Sync>>;
}
