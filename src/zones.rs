// src/zones.rs
//
// Ordered collection of named sub-zones nested in the region of interest.
// Zones are tested in declaration order and the first containing polygon
// wins, so overlapping zones resolve deterministically to the earlier one.

use crate::geometry::{Point, Polygon};
use crate::types::{ConfigError, SubZoneConfig};
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone)]
struct Zone {
    name: String,
    polygon: Polygon,
}

/// The named sub-zones, in configuration order. Defined once at startup and
/// never mutated during a run.
#[derive(Debug, Clone)]
pub struct ZoneMap {
    zones: Vec<Zone>,
}

impl ZoneMap {
    pub fn new(configs: &[SubZoneConfig]) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut zones = Vec::with_capacity(configs.len());

        for cfg in configs {
            if !seen.insert(cfg.name.clone()) {
                return Err(ConfigError::DuplicateZone(cfg.name.clone()));
            }
            let polygon = Polygon::new(&cfg.name, &cfg.polygon)?;
            zones.push(Zone {
                name: cfg.name.clone(),
                polygon,
            });
        }

        info!(
            "✓ Zone map ready: {} sub-zone(s) [{}]",
            zones.len(),
            zones
                .iter()
                .map(|z| z.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { zones })
    }

    /// First zone (in declaration order) whose polygon contains `p`, or
    /// `None` when the point is in no named sub-zone.
    pub fn locate(&self, p: Point) -> Option<&str> {
        self.zones
            .iter()
            .find(|z| z.polygon.contains(p))
            .map(|z| z.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, polygon: &[[f32; 2]]) -> SubZoneConfig {
        SubZoneConfig {
            name: name.to_string(),
            polygon: polygon.to_vec(),
        }
    }

    fn top_bottom_map() -> ZoneMap {
        ZoneMap::new(&[
            zone(
                "top",
                &[[0.0, 5.0], [10.0, 5.0], [10.0, 10.0], [0.0, 10.0]],
            ),
            zone("bottom", &[[0.0, 0.0], [10.0, 0.0], [10.0, 5.0], [0.0, 5.0]]),
        ])
        .unwrap()
    }

    #[test]
    fn locates_zone_by_containment() {
        let map = top_bottom_map();
        assert_eq!(map.locate(Point::new(5.0, 7.0)), Some("top"));
        assert_eq!(map.locate(Point::new(5.0, 2.0)), Some("bottom"));
    }

    #[test]
    fn point_in_no_zone_is_none() {
        let map = top_bottom_map();
        assert_eq!(map.locate(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn overlap_resolves_to_earlier_declared_zone() {
        // Both zones contain (5, 5); "a" is declared first so it wins.
        let map = ZoneMap::new(&[
            zone("a", &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]),
            zone("b", &[[2.0, 2.0], [8.0, 2.0], [8.0, 8.0], [2.0, 8.0]]),
        ])
        .unwrap();
        assert_eq!(map.locate(Point::new(5.0, 5.0)), Some("a"));

        // Declared the other way round, the inner zone wins inside itself.
        let flipped = ZoneMap::new(&[
            zone("b", &[[2.0, 2.0], [8.0, 2.0], [8.0, 8.0], [2.0, 8.0]]),
            zone("a", &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]),
        ])
        .unwrap();
        assert_eq!(flipped.locate(Point::new(5.0, 5.0)), Some("b"));
    }

    #[test]
    fn duplicate_zone_name_rejected() {
        let err = ZoneMap::new(&[
            zone("top", &[[0.0, 0.0], [10.0, 0.0], [5.0, 10.0]]),
            zone("top", &[[20.0, 0.0], [30.0, 0.0], [25.0, 10.0]]),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateZone(name) if name == "top"));
    }

    #[test]
    fn degenerate_zone_polygon_rejected() {
        let err = ZoneMap::new(&[zone("thin", &[[0.0, 0.0], [10.0, 0.0]])]).unwrap_err();
        assert!(matches!(err, ConfigError::DegeneratePolygon { .. }));
    }
}
