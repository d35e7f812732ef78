//! Fitted artifacts and the validation/transformation pipeline

pub mod artifacts;
pub mod features;

// Re-export commonly used types
pub use artifacts::{ArtifactError, EncoderTable, LabelEncoder, Scaler, ScalerTable};
pub use features::{
    default_numeric, feature_catalog, transform_record, validate_record, CATEGORICAL_FEATURES,
    MODEL_COLUMNS, NUMERIC_FEATURES, NUM_FEATURES,
};
