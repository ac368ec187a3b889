use crate::image_classifier::interface::{
    ImageModel, InputTensor, ModelDecoder, ModelOutput, OutputTensor,
};
use crate::image_classifier::preprocess::target_size;
use crate::library::logger::interface::Logger;
use std::io::Cursor;
use std::sync::Arc;
use tract_onnx::prelude::*;
use tract_onnx::tract_hir::internal::DimLike;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionBackend {
    Optimized,
    Default,
}

pub struct ImageModelTract {
    model: Plan,
    input_shape: Option<Vec<Option<usize>>>,
    backend: ExecutionBackend,
}

impl ImageModelTract {
    pub fn backend(&self) -> ExecutionBackend {
        self.backend
    }
}

/// Optimized plan when `optimize` succeeds, otherwise the plain typed plan.
fn build_plan(
    typed: TypedModel,
    optimize: impl FnOnce(TypedModel) -> TractResult<TypedModel>,
) -> TractResult<(Plan, ExecutionBackend, Option<TractError>)> {
    match optimize(typed.clone()).and_then(|m| m.into_runnable()) {
        Ok(plan) => Ok((plan, ExecutionBackend::Optimized, None)),
        Err(e) => Ok((typed.into_runnable()?, ExecutionBackend::Default, Some(e))),
    }
}

impl ImageModel for ImageModelTract {
    fn input_shape(&self) -> Option<Vec<Option<usize>>> {
        self.input_shape.clone()
    }

    fn predict(
        &self,
        input: InputTensor,
    ) -> Result<ModelOutput, Box<dyn std::error::Error + Send + Sync>> {
        let tensor = Tensor::from_shape(&input.shape, &input.data)?;
        let outputs = self.model.run(tvec!(tensor.into_tvalue()))?;

        let mut tensors = Vec::with_capacity(outputs.len());
        for output in outputs.iter() {
            let view = output.to_array_view::<f32>()?;
            tensors.push(OutputTensor {
                shape: view.shape().to_vec(),
                data: view.iter().copied().collect(),
            });
        }

        if tensors.len() == 1 {
            Ok(ModelOutput::Single(tensors.remove(0)))
        } else {
            Ok(ModelOutput::Multiple(tensors))
        }
    }
}

/// Deserializes ONNX models whose input is an NHWC image batch.
pub struct ModelDecoderTract {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ModelDecoderTract {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("tract"),
        }
    }

    fn declared_input_shape(model: &InferenceModel) -> Option<Vec<Option<usize>>> {
        let typed = model.clone().into_typed().ok()?;
        let fact = typed.input_fact(0).ok()?;
        Some(fact.shape.iter().map(|dim| dim.to_usize().ok()).collect())
    }

    pub fn decode_tract(
        &self,
        bytes: &[u8],
    ) -> Result<ImageModelTract, Box<dyn std::error::Error + Send + Sync>> {
        let model = tract_onnx::onnx().model_for_read(&mut Cursor::new(bytes))?;

        let input_shape = Self::declared_input_shape(&model);
        let size = target_size(input_shape.as_deref()) as usize;
        self.logger.info(&format!(
            "Declared input shape {:?}, using {}x{}",
            input_shape, size, size
        ))?;

        let typed = model
            .with_input_fact(0, f32::fact([1, size, size, 3]).into())?
            .into_typed()?;

        let (plan, backend, optimize_error) = build_plan(typed, |m| m.into_optimized())?;
        if let Some(e) = optimize_error {
            self.logger
                .info(&format!("Optimized backend unavailable, using default: {}", e))?;
        }
        self.logger.info(&format!("Model ready on {:?} backend", backend))?;

        Ok(ImageModelTract {
            model: plan,
            input_shape,
            backend,
        })
    }
}

impl ModelDecoder for ModelDecoderTract {
    fn decode(
        &self,
        bytes: &[u8],
    ) -> Result<Arc<dyn ImageModel + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
        let model: Arc<dyn ImageModel + Send + Sync> = Arc::new(self.decode_tract(bytes)?);
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    #[test]
    fn test_decode_rejects_garbage() {
        let logger = Arc::new(LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap()));
        let decoder = ModelDecoderTract::new(logger);

        assert!(decoder.decode(b"not a model").is_err());
    }

    #[test]
    fn test_failed_optimization_falls_back_to_default_plan() {
        let typed = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(include_bytes!(
                "test/models/tiny_classifier.onnx"
            )))
            .unwrap()
            .with_input_fact(0, f32::fact([1, 32, 32, 3]).into())
            .unwrap()
            .into_typed()
            .unwrap();

        let (plan, backend, optimize_error) =
            build_plan(typed, |_| Err(TractError::msg("no optimizer"))).unwrap();

        assert_eq!(backend, ExecutionBackend::Default);
        assert!(optimize_error.is_some());
        let model = ImageModelTract {
            model: plan,
            input_shape: None,
            backend,
        };
        let output = model
            .predict(InputTensor {
                shape: [1, 32, 32, 3],
                data: vec![0.5; 32 * 32 * 3],
            })
            .unwrap();
        let probabilities = output.into_first().unwrap().data;
        assert_eq!(probabilities.len(), 3);
        assert!((probabilities.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }
}
