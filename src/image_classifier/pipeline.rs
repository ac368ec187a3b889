use crate::error::ClassifierError;
use crate::image_classifier::interface::{ImageModel, Prediction};
use crate::image_classifier::postprocess::{normalize, rank, top_predictions};
use crate::image_classifier::preprocess::{resize_image_to_tensor, target_size};
use crate::library::logger::interface::Logger;
use crate::model_loader::metadata::LabelMetadata;
use image::DynamicImage;
use std::sync::Arc;

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ClassifierError> {
    image::load_from_memory(bytes).map_err(|e| ClassifierError::Decode(e.to_string()))
}

#[derive(Clone)]
pub struct InferencePipeline {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferencePipeline {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("pipeline"),
        }
    }

    /// Ranks the model's classes for `image` and returns the best `top_k`
    /// with display-adjusted confidence.
    pub fn classify(
        &self,
        image: &DynamicImage,
        model: &(dyn ImageModel + Send + Sync),
        labels: Option<&LabelMetadata>,
        top_k: usize,
    ) -> Result<Vec<Prediction>, ClassifierError> {
        let size = target_size(model.input_shape().as_deref());
        let input = resize_image_to_tensor(image, size);

        let output = model
            .predict(input)
            .map_err(|e| ClassifierError::Inference(e.to_string()))
            .inspect_err(|e| {
                let _ = self.logger.error(&e.to_string());
            })?;

        let probabilities = match output.into_first() {
            Some(tensor) if !tensor.data.is_empty() => tensor.data,
            _ => {
                let e = ClassifierError::Inference("model returned no class scores".to_string());
                let _ = self.logger.error(&e.to_string());
                return Err(e);
            }
        };

        let ranked = rank(&normalize(probabilities));
        let predictions = top_predictions(ranked, top_k, labels);

        if let Some(best) = predictions.first() {
            let _ = self.logger.info(&format!(
                "Best match {} ({:.2}%)",
                best.label,
                best.probability * 100.0
            ));
        }

        Ok(predictions)
    }

    /// Decodes first; a decode failure never reaches the model.
    pub fn classify_bytes(
        &self,
        bytes: &[u8],
        model: &(dyn ImageModel + Send + Sync),
        labels: Option<&LabelMetadata>,
        top_k: usize,
    ) -> Result<Vec<Prediction>, ClassifierError> {
        let image = decode_image(bytes).inspect_err(|e| {
            let _ = self.logger.error(&e.to_string());
        })?;
        self.classify(&image, model, labels, top_k)
    }
}
