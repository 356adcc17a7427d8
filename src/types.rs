use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised only while building the zone configuration. The per-frame path has
/// no error conditions: observations outside the region or outside every
/// sub-zone are normal and silently skipped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("polygon '{name}' has {vertices} vertices, at least 3 required")]
    DegeneratePolygon { name: String, vertices: usize },
    #[error("duplicate sub-zone name '{0}'")]
    DuplicateZone(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub zones: ZonesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory scanned (recursively) for .jsonl track files.
    pub tracks_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub results_dir: String,
    /// When true, one summary line is written per frame; the final totals
    /// line is always written.
    pub frame_summaries: bool,
}

/// One region-of-interest polygon plus the ordered sub-zones nested in it.
/// Sub-zone order matters: on overlap the earlier-declared zone wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesConfig {
    pub region: Vec<[f32; 2]>,
    pub sub_zones: Vec<SubZoneConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubZoneConfig {
    pub name: String,
    pub polygon: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}
