use anyhow::Context;
use clap::{Parser, ValueEnum};
use gcscore::config::{EngineKind, GcsConfig, VideoSourceKind};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "VTOL ground control console")]
pub struct Args {
    /// Load the station config from YAML
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// MAVLink endpoint for the single startup connection attempt
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Skip the vehicle link and show demo telemetry
    #[arg(long, default_value_t = false)]
    pub no_link: bool,
    #[arg(long, value_enum)]
    pub video: Option<VideoArg>,
    /// Capture device index
    #[arg(long)]
    pub camera: Option<i32>,
    #[arg(long, value_enum)]
    pub engine: Option<EngineArg>,
    /// YOLOv8 ONNX export
    #[arg(long)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VideoArg {
    Camera,
    Pattern,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    Yolo,
    Scripted,
    None,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<GcsConfig> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading station config {}", path_ref.display()))?;
    let config: GcsConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing station config {}", path_ref.display()))?;
    Ok(config)
}

/// Config file (or defaults) with command-line flags layered on top.
pub fn resolve(args: &Args) -> anyhow::Result<GcsConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GcsConfig::default(),
    };

    if let Some(endpoint) = &args.endpoint {
        config.link.endpoint = endpoint.clone();
    }
    if args.no_link {
        config.link.enabled = false;
    }
    if let Some(video) = args.video {
        config.video.source = match video {
            VideoArg::Camera => VideoSourceKind::Camera,
            VideoArg::Pattern => VideoSourceKind::Pattern,
            VideoArg::None => VideoSourceKind::None,
        };
    }
    if let Some(device) = args.camera {
        config.video.device = device;
    }
    if let Some(engine) = args.engine {
        config.detection.engine = match engine {
            EngineArg::Yolo => EngineKind::Yolo,
            EngineArg::Scripted => EngineKind::Scripted,
            EngineArg::None => EngineKind::None,
        };
    }
    if let Some(model) = &args.model {
        config.detection.model_path = model.clone();
    }
    Ok(config)
}
