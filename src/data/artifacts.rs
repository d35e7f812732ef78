//! Fitted preprocessing artifacts: label encoders and standard scalers
//!
//! Both tables are loaded once at startup from JSON files and shared
//! read-only for the lifetime of the process.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::data::features::{CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use crate::error::AppError;

/// Errors raised while loading fitted artifacts at startup
#[derive(Debug)]
pub enum ArtifactError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A categorical feature has no fitted encoder
    MissingEncoder(String),
    /// A fitted vocabulary is empty
    EmptyVocabulary(String),
    /// A fitted scale is zero or non-finite
    InvalidScale { feature: String, scale: f64 },
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactError::Io(e) => write!(f, "Artifact IO error: {}", e),
            ArtifactError::Json(e) => write!(f, "Artifact JSON error: {}", e),
            ArtifactError::MissingEncoder(feature) => {
                write!(f, "No fitted encoder for {}", feature)
            }
            ArtifactError::EmptyVocabulary(feature) => {
                write!(f, "Empty vocabulary for {}", feature)
            }
            ArtifactError::InvalidScale { feature, scale } => {
                write!(f, "Invalid scale {} for {}", scale, feature)
            }
        }
    }
}

impl std::error::Error for ArtifactError {}

impl From<std::io::Error> for ArtifactError {
    fn from(e: std::io::Error) -> Self {
        ArtifactError::Io(e)
    }
}

impl From<serde_json::Error> for ArtifactError {
    fn from(e: serde_json::Error) -> Self {
        ArtifactError::Json(e)
    }
}

/// Fitted label encoder: an ordered vocabulary where a value's index is
/// its integer encoding
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Vocabulary in fitted order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode a value to its vocabulary index
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == value)
    }
}

/// Categorical feature name -> fitted label encoder
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct EncoderTable {
    encoders: HashMap<String, LabelEncoder>,
}

impl EncoderTable {
    /// Load encoders from a JSON file
    ///
    /// The file maps each categorical feature to its ordered vocabulary:
    /// `{"KitchenQual": ["Ex", "Fa", "Gd", "TA"], ...}`. Every
    /// categorical feature must be present with a non-empty vocabulary.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path.as_ref())?;
        let table: Self = serde_json::from_str(&content)?;
        table.check_coverage()?;
        info!(
            "Loaded {} label encoders from {:?}",
            table.encoders.len(),
            path.as_ref()
        );
        Ok(table)
    }

    fn check_coverage(&self) -> Result<(), ArtifactError> {
        for feature in CATEGORICAL_FEATURES {
            match self.encoders.get(feature) {
                None => return Err(ArtifactError::MissingEncoder(feature.to_string())),
                Some(encoder) if encoder.classes.is_empty() => {
                    return Err(ArtifactError::EmptyVocabulary(feature.to_string()))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn get(&self, feature: &str) -> Option<&LabelEncoder> {
        self.encoders.get(feature)
    }

    /// Encode a categorical value, failing on values outside the fitted
    /// vocabulary
    pub fn encode(&self, feature: &str, value: &str) -> Result<usize, AppError> {
        let encoder = self
            .encoders
            .get(feature)
            .ok_or_else(|| AppError::Internal(format!("no encoder fitted for {}", feature)))?;

        encoder.encode(value).ok_or_else(|| AppError::UnknownCategory {
            feature: feature.to_string(),
            value: value.to_string(),
        })
    }
}

/// Fitted standard scaler parameters for one numeric feature
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Scaler {
    pub mean: f64,
    pub scale: f64,
}

impl Scaler {
    /// Apply the affine transform `(value - mean) / scale`
    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

/// Numeric feature name -> fitted scaler parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ScalerTable {
    scalers: HashMap<String, Scaler>,
}

impl ScalerTable {
    /// Load scalers from a JSON file
    ///
    /// The file maps feature names to fitted parameters:
    /// `{"GrLivArea": {"mean": 1515.46, "scale": 525.48}, ...}`.
    /// Features absent from the table pass through the transformer
    /// unscaled.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path.as_ref())?;
        let table: Self = serde_json::from_str(&content)?;
        table.check_scales()?;

        for feature in NUMERIC_FEATURES {
            if !table.scalers.contains_key(feature) {
                warn!("No fitted scaler for {}; values pass through unscaled", feature);
            }
        }

        info!(
            "Loaded {} scalers from {:?}",
            table.scalers.len(),
            path.as_ref()
        );
        Ok(table)
    }

    fn check_scales(&self) -> Result<(), ArtifactError> {
        for (feature, scaler) in &self.scalers {
            if !scaler.scale.is_finite() || scaler.scale == 0.0 {
                return Err(ArtifactError::InvalidScale {
                    feature: feature.clone(),
                    scale: scaler.scale,
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, feature: &str) -> Option<&Scaler> {
        self.scalers.get(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_encoder_json() -> &'static str {
        r#"{
            "GarageFinish": ["Fin", "RFn", "Unf"],
            "KitchenQual": ["Ex", "Fa", "Gd", "TA"],
            "BsmtQual": ["Ex", "Fa", "Gd", "TA"],
            "ExterQual": ["Ex", "Fa", "Gd", "TA"]
        }"#
    }

    #[test]
    fn test_encoder_table_from_json_string() {
        let table: EncoderTable = serde_json::from_str(full_encoder_json()).unwrap();
        assert!(table.check_coverage().is_ok());

        let encoder = table.get("KitchenQual").unwrap();
        assert_eq!(encoder.classes().len(), 4);
        assert_eq!(encoder.encode("Ex"), Some(0));
        assert_eq!(encoder.encode("TA"), Some(3));
        assert_eq!(encoder.encode("InvalidGrade"), None);
    }

    #[test]
    fn test_encode_unknown_category() {
        let table: EncoderTable = serde_json::from_str(full_encoder_json()).unwrap();

        assert_eq!(table.encode("GarageFinish", "RFn").unwrap(), 1);

        let err = table.encode("KitchenQual", "InvalidGrade").unwrap_err();
        assert!(matches!(err, AppError::UnknownCategory { .. }));
    }

    #[test]
    fn test_missing_encoder_is_a_load_error() {
        let json = r#"{ "KitchenQual": ["Ex", "Fa", "Gd", "TA"] }"#;
        let table: EncoderTable = serde_json::from_str(json).unwrap();
        assert!(matches!(
            table.check_coverage(),
            Err(ArtifactError::MissingEncoder(_))
        ));
    }

    #[test]
    fn test_empty_vocabulary_is_a_load_error() {
        let json = r#"{
            "GarageFinish": [],
            "KitchenQual": ["Ex"],
            "BsmtQual": ["Ex"],
            "ExterQual": ["Ex"]
        }"#;
        let table: EncoderTable = serde_json::from_str(json).unwrap();
        assert!(matches!(
            table.check_coverage(),
            Err(ArtifactError::EmptyVocabulary(_))
        ));
    }

    #[test]
    fn test_scaler_table_from_json_string() {
        let json = r#"{
            "GrLivArea": { "mean": 1515.46, "scale": 525.48 },
            "YearBuilt": { "mean": 1971.27, "scale": 30.2 }
        }"#;
        let table: ScalerTable = serde_json::from_str(json).unwrap();
        assert!(table.check_scales().is_ok());

        let scaler = table.get("GrLivArea").unwrap();
        assert!((scaler.transform(1515.46)).abs() < 1e-9);
        assert!((scaler.transform(2040.94) - 1.0).abs() < 1e-9);

        assert!(table.get("GarageArea").is_none());
    }

    #[test]
    fn test_zero_scale_is_a_load_error() {
        let json = r#"{ "GrLivArea": { "mean": 1500.0, "scale": 0.0 } }"#;
        let table: ScalerTable = serde_json::from_str(json).unwrap();
        assert!(matches!(
            table.check_scales(),
            Err(ArtifactError::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_scaler_transform() {
        let scaler = Scaler {
            mean: 1970.0,
            scale: 30.0,
        };
        assert!((scaler.transform(2000.0) - 1.0).abs() < 1e-9);
        assert!((scaler.transform(1940.0) + 1.0).abs() < 1e-9);
    }
}
