// src/observations.rs
//
// The detector/tracker boundary. The core never runs a model: it consumes
// per-frame batches of tracked boxes through `ObservationSource` and stays
// testable with no detector in the loop. The shipped implementation replays
// recorded tracker output from a JSONL file, one frame per line.

use crate::geometry::Point;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// One frame's detection for one object, as emitted by the external tracker.
/// Ephemeral: lives only for the duration of one frame's processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedObservation {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub track_id: i64,
    pub confidence: f32,
    pub class_id: usize,
}

impl TrackedObservation {
    /// Bottom-center of the bounding box — the single point tested against
    /// the region of interest and the sub-zones.
    pub fn reference_point(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, self.y2)
    }
}

/// One frame's worth of tracked observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameObservations {
    pub frame_id: u64,
    #[serde(default)]
    pub timestamp_ms: f64,
    pub observations: Vec<TrackedObservation>,
}

/// Capability boundary for whatever produces tracked boxes. Returns `None`
/// when the stream is exhausted.
pub trait ObservationSource {
    fn next_frame(&mut self) -> Result<Option<FrameObservations>>;
}

/// Replays recorded tracker output from JSONL: one `FrameObservations` object
/// per line, blank lines skipped.
pub struct JsonlReplaySource<R: BufRead> {
    reader: R,
    label: String,
    line_no: usize,
}

impl JsonlReplaySource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("opening track file {}", path.display()))?;
        info!("Replaying tracks from: {}", path.display());
        Ok(Self::from_reader(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl<R: BufRead> JsonlReplaySource<R> {
    pub fn from_reader(reader: R, label: String) -> Self {
        Self {
            reader,
            label,
            line_no: 0,
        }
    }
}

impl<R: BufRead> ObservationSource for JsonlReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameObservations>> {
        let mut line = String::new();
        loop {
            line.clear();
            self.line_no += 1;
            let read = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("reading {} line {}", self.label, self.line_no))?;
            if read == 0 {
                return Ok(None);
            }
            if line.trim().is_empty() {
                continue;
            }
            let frame: FrameObservations = serde_json::from_str(line.trim())
                .with_context(|| format!("parsing {} line {}", self.label, self.line_no))?;
            return Ok(Some(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reference_point_is_bottom_center() {
        let obs = TrackedObservation {
            x1: 100.0,
            y1: 50.0,
            x2: 140.0,
            y2: 200.0,
            track_id: 1,
            confidence: 0.9,
            class_id: 0,
        };
        let p = obs.reference_point();
        assert_eq!(p.x, 120.0);
        assert_eq!(p.y, 200.0);
    }

    #[test]
    fn replays_frames_in_order() {
        let jsonl = concat!(
            r#"{"frame_id":1,"timestamp_ms":33.0,"observations":[{"x1":0,"y1":0,"x2":10,"y2":10,"track_id":1,"confidence":0.8,"class_id":0}]}"#,
            "\n\n",
            r#"{"frame_id":2,"timestamp_ms":66.0,"observations":[]}"#,
            "\n",
        );
        let mut source =
            JsonlReplaySource::from_reader(Cursor::new(jsonl), "test".to_string());

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.frame_id, 1);
        assert_eq!(first.observations.len(), 1);
        assert_eq!(first.observations[0].track_id, 1);

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.frame_id, 2);
        assert!(second.observations.is_empty());

        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn malformed_line_is_an_error() {
        let mut source = JsonlReplaySource::from_reader(
            Cursor::new("{not json}\n"),
            "test".to_string(),
        );
        assert!(source.next_frame().is_err());
    }
}
