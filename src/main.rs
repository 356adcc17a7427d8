// src/main.rs

mod config;
mod counter;
mod crossing_tracker;
mod geometry;
mod observations;
mod processor;
mod types;
mod zones;

use anyhow::Result;
use counter::Summary;
use observations::{JsonlReplaySource, ObservationSource};
use processor::FrameProcessor;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};
use types::Config;
use walkdir::WalkDir;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());
    let config = Config::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("crossing_counter={}", config.logging.level))
        .init();

    info!("🚶 Zone Crossing Counter Starting");
    info!("✓ Configuration loaded from {}", config_path);
    info!(
        "Region: {} vertices | Sub-zones: {}",
        config.zones.region.len(),
        config
            .zones
            .sub_zones
            .iter()
            .map(|z| z.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Validate the zone configuration up front — a malformed polygon or a
    // duplicate zone name is fatal at startup, not mid-stream.
    FrameProcessor::from_config(&config.zones)?;

    let track_files = find_track_files(&config.input.tracks_dir);
    if track_files.is_empty() {
        error!("No track files found in {}", config.input.tracks_dir);
        return Ok(());
    }
    info!("Found {} track file(s) to process", track_files.len());

    std::fs::create_dir_all(&config.output.results_dir)?;

    for (idx, track_path) in track_files.iter().enumerate() {
        info!("\n========================================");
        info!(
            "Processing stream {}/{}: {}",
            idx + 1,
            track_files.len(),
            track_path.display()
        );
        info!("========================================\n");

        match process_stream(track_path, &config) {
            Ok(stats) => {
                info!("\n✓ Stream processed successfully!");
                info!("  Total frames: {}", stats.total_frames);
                info!("  Observations: {}", stats.total_observations);
                info!(
                    "  In-region observations: {} ({:.1}%)",
                    stats.observations_in_region,
                    100.0 * stats.observations_in_region as f64
                        / stats.total_observations.max(1) as f64
                );
                info!("  🔢 Unique identities: {}", stats.unique_identities);
                for (direction, count) in &stats.per_direction {
                    info!("  ➡️  {}: {}", direction, count);
                }
                let undetermined = stats.unique_identities
                    - stats.per_direction.values().sum::<usize>();
                info!("  ❔ Undetermined: {}", undetermined);
                info!("  Processing Speed: {:.1} FPS", stats.avg_fps);
            }
            Err(e) => {
                error!("Failed to process stream: {}", e);
            }
        }
    }

    Ok(())
}

struct RunStats {
    total_frames: u64,
    total_observations: u64,
    observations_in_region: u64,
    unique_identities: usize,
    per_direction: BTreeMap<String, usize>,
    avg_fps: f64,
}

fn find_track_files(dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("jsonl"))
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn process_stream(track_path: &Path, config: &Config) -> Result<RunStats> {
    let start_time = Instant::now();

    let mut source = JsonlReplaySource::open(track_path)?;

    // Fresh ledger per stream: crossing state lives for the lifetime of one
    // video/stream only.
    let mut processor = FrameProcessor::from_config(&config.zones)?;

    let stream_name = track_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("stream");
    let results_path =
        Path::new(&config.output.results_dir).join(format!("{}_crossings.jsonl", stream_name));
    let mut results_file = std::fs::File::create(&results_path)?;
    info!("💾 Results will be written to: {}", results_path.display());

    let mut total_frames: u64 = 0;
    let mut total_observations: u64 = 0;
    let mut observations_in_region: u64 = 0;
    let mut last_summary: Option<Summary> = None;

    while let Some(frame) = source.next_frame()? {
        total_frames += 1;
        total_observations += frame.observations.len() as u64;

        let summary = processor.process_frame(&frame.observations);
        observations_in_region += summary.currently_in_region as u64;

        if total_frames % 50 == 0 {
            info!(
                "Progress: frame {} | Current: {} | Total: {} | {}",
                frame.frame_id,
                summary.currently_in_region,
                summary.total_identities,
                format_directions(&summary.per_direction)
            );
        }

        if config.output.frame_summaries {
            save_frame_summary(frame.frame_id, frame.timestamp_ms, &summary, &mut results_file)?;
        }
        last_summary = Some(summary);
    }

    let duration = start_time.elapsed();
    let avg_fps = total_frames as f64 / duration.as_secs_f64().max(1e-9);

    let final_summary = last_summary.unwrap_or_else(|| Summary {
        total_identities: 0,
        per_direction: BTreeMap::new(),
        currently_in_region: 0,
    });

    save_totals(&final_summary, total_frames, &mut results_file)?;

    info!("\n📊 Final Report:");
    info!("  Total: {}", final_summary.total_identities);
    for (direction, count) in &final_summary.per_direction {
        info!("  {}: {}", cap_first(direction), count);
    }

    Ok(RunStats {
        total_frames,
        total_observations,
        observations_in_region,
        unique_identities: final_summary.total_identities,
        per_direction: final_summary.per_direction,
        avg_fps,
    })
}

// ============================================================================
// HELPERS
// ============================================================================

fn format_directions(per_direction: &BTreeMap<String, usize>) -> String {
    if per_direction.is_empty() {
        return "no crossings yet".to_string();
    }
    per_direction
        .iter()
        .map(|(direction, count)| format!("{}: {}", direction, count))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn cap_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn save_frame_summary(
    frame_id: u64,
    timestamp_ms: f64,
    summary: &Summary,
    file: &mut std::fs::File,
) -> Result<()> {
    let json_value = serde_json::json!({
        "type": "frame",
        "frame_id": frame_id,
        "timestamp_ms": timestamp_ms,
        "current": summary.currently_in_region,
        "total": summary.total_identities,
        "per_direction": summary.per_direction,
    });
    writeln!(file, "{}", serde_json::to_string(&json_value)?)?;
    Ok(())
}

fn save_totals(summary: &Summary, total_frames: u64, file: &mut std::fs::File) -> Result<()> {
    let json_value = serde_json::json!({
        "type": "totals",
        "frames": total_frames,
        "total": summary.total_identities,
        "per_direction": summary.per_direction,
    });
    writeln!(file, "{}", serde_json::to_string(&json_value)?)?;
    file.flush()?;
    info!("💾 Final totals saved to JSONL");
    Ok(())
}
