use serde::{Deserialize, Serialize};

/// Raw housing attributes for one prediction request
///
/// Serialized field names match the training dataset columns, so a JSON
/// body like `{"OverallQual": 7, "GrLivArea": 1500, ...}` deserializes
/// directly. Every field is required; a partial record is a
/// deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeatureRecord {
    pub overall_qual: u8,
    pub gr_liv_area: f64,
    pub garage_cars: u8,
    pub garage_area: f64,
    #[serde(rename = "TotalBsmtSF")]
    pub total_bsmt_sf: f64,
    #[serde(rename = "1stFlrSF")]
    pub first_flr_sf: f64,
    pub full_bath: u8,
    pub tot_rms_abv_grd: u8,
    pub year_built: u32,
    pub year_remod_add: u32,
    pub garage_finish: String,
    pub kitchen_qual: String,
    pub bsmt_qual: String,
    pub exter_qual: String,
}

/// Model output for one request: the raw log-space prediction and the
/// inverse-transformed linear price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub log_price: f64,
    pub price: f64,
}

impl PredictionResult {
    /// Linear price formatted as currency, e.g. `$187,432.50`
    pub fn formatted_price(&self) -> String {
        format_currency(self.price)
    }
}

/// Price prediction response
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Transformed feature vector in model input order
    pub features: Vec<f64>,
    pub log_price: f64,
    pub price: f64,
    pub formatted_price: String,
}

/// Numeric form input description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeatureInfo {
    pub name: String,
    pub default: f64,
    pub min: f64,
}

/// Categorical form input description: options are the fitted vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeatureInfo {
    pub name: String,
    pub options: Vec<String>,
}

/// Form description for clients rendering the input surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCatalog {
    pub numeric: Vec<NumericFeatureInfo>,
    pub categorical: Vec<CategoricalFeatureInfo>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Format a dollar amount with thousands separators and two decimals
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let dollars = cents / 100;
    let rem = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, rem)
}
