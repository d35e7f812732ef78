use actix_web::{middleware, web, App, HttpServer};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod handlers;

use handlers::{health, predict};
use houseprice::data::{EncoderTable, ScalerTable};
use houseprice::predictor::Predictor;

/// Application state shared across handlers
///
/// The tables are read-only after startup; the ONNX session needs
/// `&mut` to run, so the predictor sits behind a mutex.
pub struct AppState {
    pub predictor: Mutex<Predictor>,
    pub encoders: EncoderTable,
    pub scalers: ScalerTable,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    let artifact_dir = std::env::var("ARTIFACT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("artifacts"));

    info!("Loading artifacts from {:?}", artifact_dir);

    // All three artifacts are required; startup aborts if any is missing
    let encoders = match EncoderTable::load(artifact_dir.join("encoders.json")) {
        Ok(encoders) => encoders,
        Err(e) => {
            error!("Failed to load encoders: {}", e);
            std::process::exit(1);
        }
    };

    let scalers = match ScalerTable::load(artifact_dir.join("scalers.json")) {
        Ok(scalers) => scalers,
        Err(e) => {
            error!("Failed to load scalers: {}", e);
            std::process::exit(1);
        }
    };

    let predictor = match Predictor::new(artifact_dir.join("model.onnx")) {
        Ok(p) => {
            info!("ONNX model loaded successfully");
            p
        }
        Err(e) => {
            error!("Failed to load ONNX model: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = Arc::new(AppState {
        predictor: Mutex::new(predictor),
        encoders,
        scalers,
    });

    info!("Starting house price API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/features", web::get().to(predict::list_features))
            .route("/predict", web::post().to(predict::predict_price))
    })
    .bind(&addr)?
    .run()
    .await
}
