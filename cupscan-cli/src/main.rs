use clap::Parser;
use cupscan::io::{load_image, save_image};
use cupscan::{
    draw_windows, Classifier, DetectError, DetectResult, Detector, PatchNormalizer,
    PixelFeatures, ScoredWindow, SearchConfig, SuppressConfig, TargetShape,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Sliding-window cup detector (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SearchConfigJson {
    min_ratio: f32,
    max_ratio: f32,
    ratios_nb: usize,
    min_scale: f32,
    max_scale: f32,
    scales_nb: usize,
    px_step: usize,
    confidence_threshold: f32,
    parallel: bool,
    batch_size: Option<usize>,
}

impl Default for SearchConfigJson {
    fn default() -> Self {
        let cfg = SearchConfig::default();
        Self {
            min_ratio: cfg.min_ratio,
            max_ratio: cfg.max_ratio,
            ratios_nb: cfg.ratios_nb,
            min_scale: cfg.min_scale,
            max_scale: cfg.max_scale,
            scales_nb: cfg.scales_nb,
            px_step: cfg.px_step,
            confidence_threshold: cfg.confidence_threshold,
            parallel: cfg.parallel,
            batch_size: cfg.batch_size,
        }
    }
}

impl From<SearchConfigJson> for SearchConfig {
    fn from(value: SearchConfigJson) -> Self {
        Self {
            min_ratio: value.min_ratio,
            max_ratio: value.max_ratio,
            ratios_nb: value.ratios_nb,
            min_scale: value.min_scale,
            max_scale: value.max_scale,
            scales_nb: value.scales_nb,
            px_step: value.px_step,
            confidence_threshold: value.confidence_threshold,
            parallel: value.parallel,
            batch_size: value.batch_size,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SuppressConfigJson {
    iou_threshold: f32,
    score_threshold: f32,
}

impl Default for SuppressConfigJson {
    fn default() -> Self {
        let cfg = SuppressConfig::default();
        Self {
            iou_threshold: cfg.iou_threshold,
            score_threshold: cfg.score_threshold,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    model_path: String,
    target_shape_path: Option<String>,
    strict_target_shape: bool,
    output_path: Option<String>,
    annotated_path: Option<String>,
    search: SearchConfigJson,
    suppress: SuppressConfigJson,
}

/// Logistic regression over pixel features: `sigmoid(w . x + b)`.
#[derive(Debug, Deserialize)]
struct LinearModel {
    weights: Vec<f32>,
    bias: f32,
}

impl Classifier for LinearModel {
    fn predict_proba(&self, features: &[Vec<f32>]) -> DetectResult<Vec<f32>> {
        features
            .iter()
            .map(|x| {
                if x.len() != self.weights.len() {
                    return Err(DetectError::InvalidParameter {
                        name: "weights",
                        reason: "model length differs from feature length",
                    });
                }
                let z: f32 = self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f32>() + self.bias;
                Ok(1.0 / (1.0 + (-z).exp()))
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    upper_left: [usize; 2],
    lower_right: [usize; 2],
    score: f32,
}

impl From<ScoredWindow> for DetectionRecord {
    fn from(value: ScoredWindow) -> Self {
        let (top, left) = value.window.upper_left();
        let (bottom, right) = value.window.lower_right();
        Self {
            upper_left: [top, left],
            lower_right: [bottom, right],
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    candidates: usize,
    detections: Vec<DetectionRecord>,
}

fn load_target_shape(config: &Config) -> Result<TargetShape, Box<dyn std::error::Error>> {
    let Some(path) = &config.target_shape_path else {
        return Ok(TargetShape::default());
    };
    let text = fs::read_to_string(path)?;
    if config.strict_target_shape {
        Ok(TargetShape::parse_record_strict(&text)?)
    } else {
        Ok(TargetShape::parse_record(&text))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("cupscan=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.model_path.is_empty() {
        return Err("image_path and model_path must be set in the config".into());
    }

    let target = load_target_shape(&config)?;
    let model: LinearModel = serde_json::from_str(&fs::read_to_string(&config.model_path)?)?;
    if model.weights.len() != target.height * target.width {
        return Err(format!(
            "model has {} weights but target shape {}x{} yields {} features",
            model.weights.len(),
            target.height,
            target.width,
            target.height * target.width
        )
        .into());
    }
    tracing::info!(
        height = target.height,
        width = target.width,
        "loaded model"
    );

    let image = load_image(&config.image_path)?;
    let suppress_cfg = SuppressConfig {
        iou_threshold: config.suppress.iou_threshold,
        score_threshold: config.suppress.score_threshold,
    };
    let detector = Detector::new(model, PixelFeatures, PatchNormalizer::new(target))
        .with_config(config.search.into());

    let pool = detector.detect(image.view())?;
    let candidates = pool.len();
    let kept = pool.suppress(suppress_cfg.iou_threshold, suppress_cfg.score_threshold)?;
    tracing::info!(candidates, kept = kept.len(), "detection finished");

    if let Some(path) = &config.annotated_path {
        let annotated = draw_windows(image.view(), kept.windows(), [0, 255, 0], 2)?;
        save_image(&annotated, path)?;
    }

    let output = Output {
        candidates,
        detections: kept.iter().map(DetectionRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
