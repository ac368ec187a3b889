use crate::image_classifier::interface::{
    ImageModel, InputTensor, ModelDecoder, ModelOutput, OutputTensor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns a fixed output and remembers the shape of every input it saw.
pub struct ImageModelFake {
    input_shape: Option<Vec<Option<usize>>>,
    output: Result<ModelOutput, String>,
    inputs: Mutex<Vec<[usize; 4]>>,
    panics: bool,
}

impl ImageModelFake {
    pub fn new(output: Vec<f32>) -> Self {
        Self::with_output(ModelOutput::Single(OutputTensor::from_values(output)))
    }

    pub fn with_output(output: ModelOutput) -> Self {
        Self {
            input_shape: Some(vec![None, Some(224), Some(224), Some(3)]),
            output: Ok(output),
            inputs: Mutex::new(Vec::new()),
            panics: false,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            input_shape: Some(vec![None, Some(224), Some(224), Some(3)]),
            output: Err(message.to_string()),
            inputs: Mutex::new(Vec::new()),
            panics: false,
        }
    }

    /// Panics inside `predict` instead of returning.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::failing("unreachable")
        }
    }

    pub fn with_input_shape(mut self, input_shape: Option<Vec<Option<usize>>>) -> Self {
        self.input_shape = input_shape;
        self
    }

    pub fn input_shapes(&self) -> Vec<[usize; 4]> {
        self.inputs
            .lock()
            .map(|inputs| inputs.clone())
            .unwrap_or_default()
    }
}

impl ImageModel for ImageModelFake {
    fn input_shape(&self) -> Option<Vec<Option<usize>>> {
        self.input_shape.clone()
    }

    fn predict(
        &self,
        input: InputTensor,
    ) -> Result<ModelOutput, Box<dyn std::error::Error + Send + Sync>> {
        if self.panics {
            panic!("model crashed during forward pass");
        }
        if input.data.len() != input.shape.iter().product::<usize>() {
            return Err("input data does not match its shape".into());
        }
        self.inputs
            .lock()
            .map_err(|e| e.to_string())?
            .push(input.shape);

        self.output.clone().map_err(|message| message.into())
    }
}

pub struct ModelDecoderFake {
    model: Result<Arc<ImageModelFake>, String>,
    decodes: AtomicUsize,
    panics_left: AtomicUsize,
}

impl ModelDecoderFake {
    pub fn new(model: Arc<ImageModelFake>) -> Self {
        Self {
            model: Ok(model),
            decodes: AtomicUsize::new(0),
            panics_left: AtomicUsize::new(0),
        }
    }

    /// The first `count` decodes panic, later ones succeed.
    pub fn panicking_first(model: Arc<ImageModelFake>, count: usize) -> Self {
        Self {
            panics_left: AtomicUsize::new(count),
            ..Self::new(model)
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            model: Err(message.to_string()),
            decodes: AtomicUsize::new(0),
            panics_left: AtomicUsize::new(0),
        }
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl ModelDecoder for ModelDecoderFake {
    fn decode(
        &self,
        _bytes: &[u8],
    ) -> Result<Arc<dyn ImageModel + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        let panics = self
            .panics_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if panics {
            panic!("decoder crashed");
        }
        match &self.model {
            Ok(model) => Ok(model.clone() as Arc<dyn ImageModel + Send + Sync>),
            Err(message) => Err(message.clone().into()),
        }
    }
}
