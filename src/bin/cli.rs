//! House price CLI - predict sale prices from housing attributes

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use houseprice::data::{default_numeric, feature_catalog, EncoderTable, ScalerTable, MODEL_COLUMNS};
use houseprice::models::FeatureRecord;
use houseprice::pipeline::{run_request, RequestOutcome};
use houseprice::predictor::Predictor;

/// Default artifact directory (relative to project root)
const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

#[derive(Parser)]
#[command(name = "houseprice")]
#[command(author, version, about = "House price prediction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Path to the artifact directory (model.onnx, encoders.json, scalers.json)
    #[arg(long, default_value = DEFAULT_ARTIFACT_DIR)]
    artifact_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the sale price for one house
    Predict {
        /// Overall material and finish quality (1-10)
        #[arg(long, default_value = "5")]
        overall_qual: u8,

        /// Above-ground living area in square feet
        #[arg(long, default_value = "1000")]
        gr_liv_area: f64,

        /// Garage capacity in cars
        #[arg(long, default_value = "5")]
        garage_cars: u8,

        /// Garage area in square feet
        #[arg(long, default_value = "1000")]
        garage_area: f64,

        /// Total basement area in square feet
        #[arg(long, default_value = "1000")]
        total_bsmt_sf: f64,

        /// First floor area in square feet
        #[arg(long, default_value = "1000")]
        first_flr_sf: f64,

        /// Number of full bathrooms
        #[arg(long, default_value = "5")]
        full_bath: u8,

        /// Total rooms above ground
        #[arg(long, default_value = "5")]
        tot_rms_abv_grd: u8,

        /// Year built
        #[arg(long, default_value = "5")]
        year_built: u32,

        /// Year remodeled
        #[arg(long, default_value = "5")]
        year_remod_add: u32,

        /// Garage finish grade (defaults to the first fitted option)
        #[arg(long)]
        garage_finish: Option<String>,

        /// Kitchen quality grade (defaults to the first fitted option)
        #[arg(long)]
        kitchen_qual: Option<String>,

        /// Basement quality grade (defaults to the first fitted option)
        #[arg(long)]
        bsmt_qual: Option<String>,

        /// Exterior quality grade (defaults to the first fitted option)
        #[arg(long)]
        exter_qual: Option<String>,
    },

    /// List model features, defaults, and fitted vocabularies
    Features,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{}", "House Price CLI v0.2.0".cyan().bold());
    println!();

    if cli.interactive {
        run_interactive(&cli.artifact_dir)?;
    } else if let Some(command) = cli.command {
        match command {
            Commands::Predict {
                overall_qual,
                gr_liv_area,
                garage_cars,
                garage_area,
                total_bsmt_sf,
                first_flr_sf,
                full_bath,
                tot_rms_abv_grd,
                year_built,
                year_remod_add,
                garage_finish,
                kitchen_qual,
                bsmt_qual,
                exter_qual,
            } => {
                let (encoders, scalers, mut predictor) = load_artifacts(&cli.artifact_dir)?;

                let record = FeatureRecord {
                    overall_qual,
                    gr_liv_area,
                    garage_cars,
                    garage_area,
                    total_bsmt_sf,
                    first_flr_sf,
                    full_bath,
                    tot_rms_abv_grd,
                    year_built,
                    year_remod_add,
                    garage_finish: garage_finish
                        .unwrap_or_else(|| first_option(&encoders, "GarageFinish")),
                    kitchen_qual: kitchen_qual
                        .unwrap_or_else(|| first_option(&encoders, "KitchenQual")),
                    bsmt_qual: bsmt_qual.unwrap_or_else(|| first_option(&encoders, "BsmtQual")),
                    exter_qual: exter_qual.unwrap_or_else(|| first_option(&encoders, "ExterQual")),
                };

                predict_once(&record, &encoders, &scalers, &mut predictor)?;
            }
            Commands::Features => {
                let encoders = load_encoders(&cli.artifact_dir)?;
                print_features(&encoders);
            }
        }
    } else {
        println!("Use --help for usage information or --interactive for interactive mode.");
    }

    Ok(())
}

fn load_encoders(artifact_dir: &Path) -> Result<EncoderTable> {
    let path = artifact_dir.join("encoders.json");
    EncoderTable::load(&path).with_context(|| format!("Failed to load encoders from {:?}", path))
}

fn load_artifacts(artifact_dir: &Path) -> Result<(EncoderTable, ScalerTable, Predictor)> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message("Loading artifacts...");

    let encoders = load_encoders(artifact_dir)?;

    let scalers_path = artifact_dir.join("scalers.json");
    let scalers = ScalerTable::load(&scalers_path)
        .with_context(|| format!("Failed to load scalers from {:?}", scalers_path))?;

    let model_path = artifact_dir.join("model.onnx");
    let predictor = Predictor::new(&model_path)
        .with_context(|| format!("Failed to load ONNX model from {:?}", model_path))?;

    pb.finish_and_clear();
    Ok((encoders, scalers, predictor))
}

/// First vocabulary entry for a categorical feature, mirroring the
/// form's select default
fn first_option(encoders: &EncoderTable, feature: &str) -> String {
    encoders
        .get(feature)
        .and_then(|e| e.classes().first().cloned())
        .unwrap_or_default()
}

fn predict_once(
    record: &FeatureRecord,
    encoders: &EncoderTable,
    scalers: &ScalerTable,
    predictor: &mut Predictor,
) -> Result<()> {
    match run_request(record, encoders, scalers, predictor)? {
        RequestOutcome::Rejected { errors } => {
            for err in &errors {
                println!("{} {}", "Error:".red().bold(), err);
            }
            println!(
                "{}",
                "Correct the inputs above to get a valid prediction.".yellow()
            );
        }
        RequestOutcome::Completed {
            features,
            prediction,
        } => {
            println!("{}", "Model input (transformed):".yellow().bold());
            println!("{:>14} {:>12}", "Feature", "Value");
            println!("{}", "-".repeat(28));
            for (name, value) in MODEL_COLUMNS.iter().zip(&features) {
                println!("{:>14} {:>12.4}", name, value);
            }
            println!();

            println!("Raw prediction (log scale): {:.4}", prediction.log_price);
            println!(
                "{} {}",
                "Estimated sale price:".green().bold(),
                prediction.formatted_price().green().bold()
            );
        }
    }

    Ok(())
}

fn print_features(encoders: &EncoderTable) {
    let catalog = feature_catalog(encoders);

    println!("{}", "Numeric features:".yellow().bold());
    println!("{:>14} {:>8} {:>4}", "Feature", "Default", "Min");
    println!("{}", "-".repeat(30));
    for info in &catalog.numeric {
        println!("{:>14} {:>8} {:>4}", info.name, info.default, info.min);
    }
    println!();

    println!("{}", "Categorical features:".yellow().bold());
    for info in &catalog.categorical {
        println!("{:>14} {}", info.name, info.options.join(", "));
    }
}

fn run_interactive(artifact_dir: &Path) -> Result<()> {
    println!("{}", "Interactive mode".green().bold());
    println!();

    let (encoders, scalers, mut predictor) = load_artifacts(artifact_dir)?;
    let theme = ColorfulTheme::default();

    loop {
        let options = vec!["Predict a price", "Show features", "Quit"];

        let selection = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&options)
            .default(0)
            .interact()?;

        match selection {
            0 => {
                let record = collect_record(&theme, &encoders)?;
                println!();
                predict_once(&record, &encoders, &scalers, &mut predictor)?;
                println!();
            }
            1 => {
                println!();
                print_features(&encoders);
                println!();
            }
            2 => {
                println!("Goodbye!");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Prompt for every feature: numeric inputs with form defaults, then
/// the fitted categorical choices
fn collect_record(theme: &ColorfulTheme, encoders: &EncoderTable) -> Result<FeatureRecord> {
    println!("{}", "Numeric features".yellow().bold());

    let overall_qual = prompt_count(theme, "OverallQual")?;
    let gr_liv_area = prompt_area(theme, "GrLivArea")?;
    let garage_cars = prompt_count(theme, "GarageCars")?;
    let garage_area = prompt_area(theme, "GarageArea")?;
    let total_bsmt_sf = prompt_area(theme, "TotalBsmtSF")?;
    let first_flr_sf = prompt_area(theme, "1stFlrSF")?;
    let full_bath = prompt_count(theme, "FullBath")?;
    let tot_rms_abv_grd = prompt_count(theme, "TotRmsAbvGrd")?;
    let year_built = prompt_year(theme, "YearBuilt")?;
    let year_remod_add = prompt_year(theme, "YearRemodAdd")?;

    println!("{}", "Categorical features".yellow().bold());

    let garage_finish = prompt_category(theme, encoders, "GarageFinish")?;
    let kitchen_qual = prompt_category(theme, encoders, "KitchenQual")?;
    let bsmt_qual = prompt_category(theme, encoders, "BsmtQual")?;
    let exter_qual = prompt_category(theme, encoders, "ExterQual")?;

    Ok(FeatureRecord {
        overall_qual,
        gr_liv_area,
        garage_cars,
        garage_area,
        total_bsmt_sf,
        first_flr_sf,
        full_bath,
        tot_rms_abv_grd,
        year_built,
        year_remod_add,
        garage_finish,
        kitchen_qual,
        bsmt_qual,
        exter_qual,
    })
}

fn prompt_count(theme: &ColorfulTheme, name: &str) -> Result<u8> {
    let value = Input::with_theme(theme)
        .with_prompt(name)
        .default(default_numeric(name) as u8)
        .interact_text()?;
    Ok(value)
}

fn prompt_area(theme: &ColorfulTheme, name: &str) -> Result<f64> {
    let value = Input::with_theme(theme)
        .with_prompt(name)
        .default(default_numeric(name))
        .validate_with(|input: &f64| {
            if *input >= 0.0 {
                Ok(())
            } else {
                Err("must be at least 0")
            }
        })
        .interact_text()?;
    Ok(value)
}

fn prompt_year(theme: &ColorfulTheme, name: &str) -> Result<u32> {
    let value = Input::with_theme(theme)
        .with_prompt(name)
        .default(default_numeric(name) as u32)
        .interact_text()?;
    Ok(value)
}

fn prompt_category(
    theme: &ColorfulTheme,
    encoders: &EncoderTable,
    name: &str,
) -> Result<String> {
    let options: Vec<String> = encoders
        .get(name)
        .map(|e| e.classes().to_vec())
        .unwrap_or_default();

    let selection = Select::with_theme(theme)
        .with_prompt(name)
        .items(&options)
        .default(0)
        .interact()?;

    Ok(options[selection].clone())
}
