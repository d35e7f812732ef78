use crate::data::features::NUM_FEATURES;
use crate::error::AppError;
use crate::models::PredictionResult;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use std::path::Path;
use tracing::info;

/// Prediction seam between the request pipeline and the model runtime
pub trait Predict {
    /// Score one model-ready feature vector
    fn predict(&mut self, features: &[f64]) -> Result<PredictionResult, AppError>;
}

/// ONNX-based regression predictor
///
/// The model scores a `[1, 14]` vector and returns a single scalar in
/// log-price space; [`invert_log1p`] recovers the linear price.
pub struct Predictor {
    session: Session,
}

impl Predictor {
    /// Load the regression model from an ONNX file
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self, ort::Error> {
        let model_path = model_path.as_ref();
        info!("Loading model: {:?}", model_path);

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;

        Ok(Self { session })
    }
}

impl Predict for Predictor {
    fn predict(&mut self, features: &[f64]) -> Result<PredictionResult, AppError> {
        if features.len() != NUM_FEATURES {
            return Err(AppError::ModelInvocation(format!(
                "expected {} features, got {}",
                NUM_FEATURES,
                features.len()
            )));
        }

        let input_vec: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let input_tensor = Tensor::from_array(([1usize, NUM_FEATURES], input_vec))
            .map_err(|e| AppError::ModelInvocation(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs!["input" => input_tensor])
            .map_err(|e| AppError::ModelInvocation(e.to_string()))?;

        let (_, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| AppError::ModelInvocation(e.to_string()))?;

        let log_price = output_data
            .first()
            .copied()
            .ok_or_else(|| AppError::ModelInvocation("model returned no output".to_string()))?
            as f64;

        Ok(PredictionResult {
            log_price,
            price: invert_log1p(log_price),
        })
    }
}

/// Invert the `log1p` transform applied to prices during training:
/// `price = exp(log_price) - 1`
pub fn invert_log1p(log_price: f64) -> f64 {
    log_price.exp_m1()
}
