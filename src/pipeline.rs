//! Request orchestration
//!
//! One short-lived flow per request: validate, transform, predict.
//! Every failure is terminal for that request; the caller re-submits to
//! start a new flow. The flow is independent of any presentation layer,
//! which only supplies the record and renders the outcome.

use tracing::debug;

use crate::data::artifacts::{EncoderTable, ScalerTable};
use crate::data::features::{transform_record, validate_record};
use crate::error::AppError;
use crate::models::{FeatureRecord, PredictionResult};
use crate::predictor::Predict;

/// Terminal outcome of a prediction request
#[derive(Debug)]
pub enum RequestOutcome {
    /// Rejected before the model was invoked; every collected error
    Rejected { errors: Vec<String> },
    /// Scored; the transformed vector is returned for display
    Completed {
        features: Vec<f64>,
        prediction: PredictionResult,
    },
}

/// Run one record through the validate/transform/predict flow
///
/// Validation violations and unknown categories end in
/// [`RequestOutcome::Rejected`] without touching the model. A model
/// invocation failure propagates as `Err` and is fatal for this request
/// only.
pub fn run_request<P: Predict>(
    record: &FeatureRecord,
    encoders: &EncoderTable,
    scalers: &ScalerTable,
    predictor: &mut P,
) -> Result<RequestOutcome, AppError> {
    let errors = validate_record(record);
    if !errors.is_empty() {
        debug!("Record rejected with {} validation errors", errors.len());
        return Ok(RequestOutcome::Rejected { errors });
    }

    let features = match transform_record(record, encoders, scalers) {
        Ok(features) => features,
        Err(err @ AppError::UnknownCategory { .. }) => {
            debug!("Record rejected: {}", err);
            return Ok(RequestOutcome::Rejected {
                errors: vec![err.to_string()],
            });
        }
        Err(err) => return Err(err),
    };

    let prediction = predictor.predict(&features)?;
    Ok(RequestOutcome::Completed {
        features,
        prediction,
    })
}
