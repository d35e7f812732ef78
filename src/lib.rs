//! House price prediction service
//!
//! This library provides:
//! - Domain validation of raw housing attribute records
//! - Feature transformation through fitted label encoders and scalers
//! - Sale price prediction using a pre-trained ONNX regression model
//! - A presentation-independent request pipeline shared by the CLI and
//!   the HTTP API
//!
//! # Example
//!
//! ```
//! use houseprice::data::validate_record;
//! use houseprice::models::FeatureRecord;
//!
//! let record = FeatureRecord {
//!     overall_qual: 7,
//!     gr_liv_area: 1500.0,
//!     garage_cars: 2,
//!     garage_area: 400.0,
//!     total_bsmt_sf: 800.0,
//!     first_flr_sf: 900.0,
//!     full_bath: 2,
//!     tot_rms_abv_grd: 6,
//!     year_built: 2005,
//!     year_remod_add: 2010,
//!     garage_finish: "Fin".to_string(),
//!     kitchen_qual: "Gd".to_string(),
//!     bsmt_qual: "Gd".to_string(),
//!     exter_qual: "Gd".to_string(),
//! };
//!
//! assert!(validate_record(&record).is_empty());
//! ```

pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod predictor;

// Re-export commonly used types
pub use data::{EncoderTable, ScalerTable};
pub use error::AppError;
pub use models::{FeatureRecord, PredictionResult};
pub use pipeline::{run_request, RequestOutcome};
pub use predictor::{Predict, Predictor};
