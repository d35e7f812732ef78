use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use houseprice::data::feature_catalog;
use houseprice::error::AppError;
use houseprice::models::{FeatureRecord, PredictResponse};
use houseprice::pipeline::{run_request, RequestOutcome};

/// Predict the sale price for one record
///
/// Rejections carry every collected error; a model invocation failure
/// is fatal for this request only.
pub async fn predict_price(
    state: web::Data<Arc<AppState>>,
    req: web::Json<FeatureRecord>,
) -> Result<HttpResponse, AppError> {
    let record = req.into_inner();

    let mut predictor = state
        .predictor
        .lock()
        .map_err(|_| AppError::Internal("predictor lock poisoned".to_string()))?;

    match run_request(&record, &state.encoders, &state.scalers, &mut *predictor)? {
        RequestOutcome::Rejected { errors } => Err(AppError::Validation(errors)),
        RequestOutcome::Completed {
            features,
            prediction,
        } => {
            let response = PredictResponse {
                features,
                log_price: prediction.log_price,
                price: prediction.price,
                formatted_price: prediction.formatted_price(),
            };
            Ok(HttpResponse::Ok().json(response))
        }
    }
}

/// Describe the input form: numeric defaults and fitted vocabularies
pub async fn list_features(state: web::Data<Arc<AppState>>) -> HttpResponse {
    HttpResponse::Ok().json(feature_catalog(&state.encoders))
}
