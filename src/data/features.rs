//! Input validation and feature transformation
//!
//! The pipeline between a raw record and the model input: domain
//! validation with every violation collected, label encoding, and
//! standard scaling in the model's fixed column order.

use crate::data::artifacts::{EncoderTable, ScalerTable};
use crate::error::AppError;
use crate::models::{CategoricalFeatureInfo, FeatureCatalog, FeatureRecord, NumericFeatureInfo};

/// Numeric features in model input order
pub const NUMERIC_FEATURES: [&str; 10] = [
    "OverallQual",
    "GrLivArea",
    "GarageCars",
    "GarageArea",
    "TotalBsmtSF",
    "1stFlrSF",
    "FullBath",
    "TotRmsAbvGrd",
    "YearBuilt",
    "YearRemodAdd",
];

/// Categorical features in model input order
pub const CATEGORICAL_FEATURES: [&str; 4] =
    ["GarageFinish", "KitchenQual", "BsmtQual", "ExterQual"];

/// Full model input layout: numeric features first, then encoded
/// categoricals
pub const MODEL_COLUMNS: [&str; 14] = [
    "OverallQual",
    "GrLivArea",
    "GarageCars",
    "GarageArea",
    "TotalBsmtSF",
    "1stFlrSF",
    "FullBath",
    "TotRmsAbvGrd",
    "YearBuilt",
    "YearRemodAdd",
    "GarageFinish",
    "KitchenQual",
    "BsmtQual",
    "ExterQual",
];

/// Number of features expected by the model
pub const NUM_FEATURES: usize = MODEL_COLUMNS.len();

/// Form default for a numeric feature: 1000 for area and square-footage
/// fields, 5 otherwise
pub fn default_numeric(feature: &str) -> f64 {
    if feature.contains("Area") || feature.contains("SF") {
        1000.0
    } else {
        5.0
    }
}

/// Check a record against the domain rules, collecting every violation
///
/// The rules are independent; no short-circuit. An empty vector means
/// the record is valid.
pub fn validate_record(record: &FeatureRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if !(1800..=2025).contains(&record.year_built) {
        errors.push("YearBuilt must be between 1800 and 2025.".to_string());
    }

    if record.year_remod_add < record.year_built {
        errors.push("YearRemodAdd cannot be earlier than YearBuilt.".to_string());
    }

    for (name, value) in [
        ("GrLivArea", record.gr_liv_area),
        ("GarageArea", record.garage_area),
        ("TotalBsmtSF", record.total_bsmt_sf),
        ("1stFlrSF", record.first_flr_sf),
    ] {
        if value <= 0.0 {
            errors.push(format!("{} must be greater than 0.", name));
        }
    }

    if !(1..=10).contains(&record.overall_qual) {
        errors.push("OverallQual must be between 1 and 10.".to_string());
    }

    errors
}

/// Encode and scale a record into the model input vector
///
/// Categorical values outside their fitted vocabulary fail with
/// `UnknownCategory`. Scaling runs after encoding; columns without a
/// fitted scaler pass through unchanged. Output order matches
/// [`MODEL_COLUMNS`].
pub fn transform_record(
    record: &FeatureRecord,
    encoders: &EncoderTable,
    scalers: &ScalerTable,
) -> Result<Vec<f64>, AppError> {
    let garage_finish = encoders.encode("GarageFinish", &record.garage_finish)? as f64;
    let kitchen_qual = encoders.encode("KitchenQual", &record.kitchen_qual)? as f64;
    let bsmt_qual = encoders.encode("BsmtQual", &record.bsmt_qual)? as f64;
    let exter_qual = encoders.encode("ExterQual", &record.exter_qual)? as f64;

    let mut vector = vec![
        record.overall_qual as f64,
        record.gr_liv_area,
        record.garage_cars as f64,
        record.garage_area,
        record.total_bsmt_sf,
        record.first_flr_sf,
        record.full_bath as f64,
        record.tot_rms_abv_grd as f64,
        record.year_built as f64,
        record.year_remod_add as f64,
        garage_finish,
        kitchen_qual,
        bsmt_qual,
        exter_qual,
    ];

    for (value, column) in vector.iter_mut().zip(MODEL_COLUMNS) {
        if let Some(scaler) = scalers.get(column) {
            *value = scaler.transform(*value);
        }
    }

    Ok(vector)
}

/// Describe the input form: numeric defaults and fitted vocabularies
pub fn feature_catalog(encoders: &EncoderTable) -> FeatureCatalog {
    let numeric = NUMERIC_FEATURES
        .iter()
        .map(|&name| NumericFeatureInfo {
            name: name.to_string(),
            default: default_numeric(name),
            min: 0.0,
        })
        .collect();

    let categorical = CATEGORICAL_FEATURES
        .iter()
        .map(|&name| CategoricalFeatureInfo {
            name: name.to_string(),
            options: encoders
                .get(name)
                .map(|e| e.classes().to_vec())
                .unwrap_or_default(),
        })
        .collect();

    FeatureCatalog {
        numeric,
        categorical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> FeatureRecord {
        FeatureRecord {
            overall_qual: 7,
            gr_liv_area: 1500.0,
            garage_cars: 2,
            garage_area: 400.0,
            total_bsmt_sf: 800.0,
            first_flr_sf: 900.0,
            full_bath: 2,
            tot_rms_abv_grd: 6,
            year_built: 2005,
            year_remod_add: 2010,
            garage_finish: "Fin".to_string(),
            kitchen_qual: "Gd".to_string(),
            bsmt_qual: "Gd".to_string(),
            exter_qual: "Gd".to_string(),
        }
    }

    fn test_encoders() -> EncoderTable {
        serde_json::from_str(
            r#"{
                "GarageFinish": ["Fin", "RFn", "Unf"],
                "KitchenQual": ["Ex", "Fa", "Gd", "TA"],
                "BsmtQual": ["Ex", "Fa", "Gd", "TA"],
                "ExterQual": ["Ex", "Fa", "Gd", "TA"]
            }"#,
        )
        .unwrap()
    }

    fn test_scalers() -> ScalerTable {
        serde_json::from_str(
            r#"{
                "GrLivArea": { "mean": 1500.0, "scale": 500.0 },
                "YearBuilt": { "mean": 1970.0, "scale": 30.0 }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(validate_record(&valid_record()).is_empty());
    }

    #[test]
    fn test_year_built_range() {
        let mut record = valid_record();

        record.year_built = 1799;
        record.year_remod_add = 1799;
        let errors = validate_record(&record);
        assert!(errors.iter().any(|e| e.contains("YearBuilt")));

        record.year_built = 2026;
        record.year_remod_add = 2026;
        let errors = validate_record(&record);
        assert!(errors.iter().any(|e| e.contains("YearBuilt")));

        record.year_built = 1800;
        record.year_remod_add = 1800;
        assert!(validate_record(&record).is_empty());

        record.year_built = 2025;
        record.year_remod_add = 2025;
        assert!(validate_record(&record).is_empty());
    }

    #[test]
    fn test_year_built_1700_is_exactly_one_error() {
        let mut record = valid_record();
        record.year_built = 1700;

        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("YearBuilt"));
    }

    #[test]
    fn test_remodel_before_build() {
        let mut record = valid_record();
        record.year_remod_add = 2000;

        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("YearRemodAdd"));
    }

    #[test]
    fn test_remodel_order_reported_alongside_other_violations() {
        let mut record = valid_record();
        record.year_remod_add = 2000;
        record.garage_area = 0.0;

        let errors = validate_record(&record);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("YearRemodAdd")));
        assert!(errors.iter().any(|e| e.contains("GarageArea")));
    }

    #[test]
    fn test_zero_garage_area_flags_only_that_field() {
        let mut record = valid_record();
        record.garage_area = 0.0;

        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("GarageArea"));
    }

    #[test]
    fn test_every_nonpositive_area_is_flagged() {
        let mut record = valid_record();
        record.gr_liv_area = 0.0;
        record.garage_area = -10.0;
        record.total_bsmt_sf = 0.0;
        record.first_flr_sf = 0.0;

        let errors = validate_record(&record);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("GrLivArea")));
        assert!(errors.iter().any(|e| e.contains("GarageArea")));
        assert!(errors.iter().any(|e| e.contains("TotalBsmtSF")));
        assert!(errors.iter().any(|e| e.contains("1stFlrSF")));
    }

    #[test]
    fn test_overall_qual_range() {
        let mut record = valid_record();

        record.overall_qual = 0;
        let errors = validate_record(&record);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("OverallQual"));

        record.overall_qual = 11;
        assert_eq!(validate_record(&record).len(), 1);

        record.overall_qual = 1;
        assert!(validate_record(&record).is_empty());
        record.overall_qual = 10;
        assert!(validate_record(&record).is_empty());
    }

    #[test]
    fn test_transform_order_and_values() {
        let record = valid_record();
        let vector = transform_record(&record, &test_encoders(), &test_scalers()).unwrap();

        assert_eq!(vector.len(), NUM_FEATURES);

        // Unscaled numerics pass through
        assert!((vector[0] - 7.0).abs() < 1e-9); // OverallQual
        assert!((vector[3] - 400.0).abs() < 1e-9); // GarageArea

        // Scaled numerics
        assert!(vector[1].abs() < 1e-9); // GrLivArea: (1500 - 1500) / 500
        assert!((vector[8] - (2005.0 - 1970.0) / 30.0).abs() < 1e-9); // YearBuilt

        // Encoded categoricals
        assert!((vector[10] - 0.0).abs() < 1e-9); // GarageFinish "Fin"
        assert!((vector[11] - 2.0).abs() < 1e-9); // KitchenQual "Gd"
        assert!((vector[12] - 2.0).abs() < 1e-9); // BsmtQual "Gd"
        assert!((vector[13] - 2.0).abs() < 1e-9); // ExterQual "Gd"
    }

    #[test]
    fn test_transform_is_deterministic() {
        let record = valid_record();
        let encoders = test_encoders();
        let scalers = test_scalers();

        let first = transform_record(&record, &encoders, &scalers).unwrap();
        let second = transform_record(&record, &encoders, &scalers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_transform_rejects_unknown_category() {
        let mut record = valid_record();
        record.kitchen_qual = "InvalidGrade".to_string();

        let err = transform_record(&record, &test_encoders(), &test_scalers()).unwrap_err();
        match err {
            AppError::UnknownCategory { feature, value } => {
                assert_eq!(feature, "KitchenQual");
                assert_eq!(value, "InvalidGrade");
            }
            other => panic!("expected UnknownCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_scales_encoded_categorical_if_fitted() {
        let scalers: ScalerTable =
            serde_json::from_str(r#"{ "KitchenQual": { "mean": 2.0, "scale": 1.0 } }"#).unwrap();

        let vector = transform_record(&valid_record(), &test_encoders(), &scalers).unwrap();
        // "Gd" encodes to 2, then (2 - 2) / 1
        assert!(vector[11].abs() < 1e-9);
    }

    #[test]
    fn test_default_numeric() {
        assert_eq!(default_numeric("GrLivArea"), 1000.0);
        assert_eq!(default_numeric("TotalBsmtSF"), 1000.0);
        assert_eq!(default_numeric("1stFlrSF"), 1000.0);
        assert_eq!(default_numeric("OverallQual"), 5.0);
        assert_eq!(default_numeric("YearBuilt"), 5.0);
    }

    #[test]
    fn test_feature_catalog() {
        let catalog = feature_catalog(&test_encoders());

        assert_eq!(catalog.numeric.len(), 10);
        assert_eq!(catalog.categorical.len(), 4);

        let gr_liv = catalog.numeric.iter().find(|i| i.name == "GrLivArea").unwrap();
        assert_eq!(gr_liv.default, 1000.0);
        assert_eq!(gr_liv.min, 0.0);

        let kitchen = catalog
            .categorical
            .iter()
            .find(|i| i.name == "KitchenQual")
            .unwrap();
        assert_eq!(kitchen.options, vec!["Ex", "Fa", "Gd", "TA"]);
    }
}
