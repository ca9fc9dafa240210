use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Result, anyhow, Context};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use crate::app_config::ProbeConfig;

// @module: Video orientation detection

// @const: Width/height ratio above which a video is landscape
pub const LANDSCAPE_RATIO: f64 = 1.3;

// @const: Width/height ratio below which a video is portrait
pub const PORTRAIT_RATIO: f64 = 0.8;

/// Effective aspect class of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl Orientation {
    /// Every orientation, in fan-out order
    pub const ALL: [Orientation; 3] = [Self::Portrait, Self::Landscape, Self::Square];

    // @returns: Lowercase identifier used in file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::Square => "square",
        }
    }

    /// Classify effective dimensions. Zero dimensions give `None`.
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let ratio = f64::from(width) / f64::from(height);
        Some(if ratio > LANDSCAPE_RATIO {
            Self::Landscape
        } else if ratio < PORTRAIT_RATIO {
            Self::Portrait
        } else {
            Self::Square
        })
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            "square" => Ok(Self::Square),
            _ => Err(anyhow!("Invalid orientation: {}", s)),
        }
    }
}

/// Dimensions of the first video stream as stored in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
    /// Display matrix rotation in degrees, absolute value
    pub rotation: u32,
}

impl VideoGeometry {
    /// Width and height after applying a 90/270 degree rotation
    pub fn effective_dimensions(&self) -> (u32, u32) {
        if matches!(self.rotation, 90 | 270) {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        let (width, height) = self.effective_dimensions();
        Orientation::from_dimensions(width, height)
    }

    /// Read the first stream of `ffprobe -print_format json -show_streams` output.
    pub fn from_ffprobe_json(json: &str) -> Result<Option<Self>> {
        let probe: ProbeOutput = serde_json::from_str(json)
            .context("Failed to parse ffprobe JSON output")?;

        Ok(probe.streams.into_iter().next().map(|stream| {
            let rotation = stream
                .side_data_list
                .iter()
                .find(|side| side.side_data_type.as_deref() == Some("Display Matrix"))
                .and_then(|side| side.rotation)
                .map(|r| r.abs().round() as u32)
                .unwrap_or(0);

            VideoGeometry {
                width: stream.width.unwrap_or(0),
                height: stream.height.unwrap_or(0),
                rotation,
            }
        }))
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    #[serde(default)]
    side_data_list: Vec<SideData>,
}

#[derive(Debug, Deserialize)]
struct SideData {
    side_data_type: Option<String>,
    rotation: Option<f64>,
}

/// External capability that classifies a video's orientation
#[async_trait]
pub trait OrientationDetector: Send + Sync {
    async fn detect(&self, video: &Path) -> Orientation;
}

/// Orientation detection through `ffprobe`.
///
/// Any probing problem falls back to landscape.
pub struct FfprobeDetector {
    config: ProbeConfig,
}

impl FfprobeDetector {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Probe the first video stream
    pub async fn probe(&self, video: &Path) -> Result<Option<VideoGeometry>> {
        let ffprobe_future = Command::new(&self.config.command)
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_streams",
                "-select_streams", "v:0",
            ])
            .arg(video)
            .kill_on_drop(true)
            .output();

        let timeout_secs = self.config.timeout_secs;
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| anyhow!("Failed to execute {} command: {}", self.config.command, e))?
            },
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                return Err(anyhow!("{} command timed out after {} seconds", self.config.command, timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} command failed: {}", self.config.command, stderr.trim()));
        }

        VideoGeometry::from_ffprobe_json(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl OrientationDetector for FfprobeDetector {
    async fn detect(&self, video: &Path) -> Orientation {
        let geometry = match self.probe(video).await {
            Ok(Some(geometry)) => geometry,
            Ok(None) => {
                warn!("No video stream found, assuming landscape");
                return Orientation::Landscape;
            }
            Err(e) => {
                error!("Error detecting aspect ratio: {}", e);
                return Orientation::Landscape;
            }
        };

        if geometry.rotation != 0 {
            let (width, height) = geometry.effective_dimensions();
            debug!("Video has {}° rotation, effective dimensions: {}x{}", geometry.rotation, width, height);
        }

        match geometry.orientation() {
            Some(orientation) => {
                info!(
                    "Original dimensions: {}x{}, detected {}",
                    geometry.width, geometry.height, orientation
                );
                orientation
            }
            None => {
                warn!("Could not determine video dimensions, assuming landscape");
                Orientation::Landscape
            }
        }
    }
}
