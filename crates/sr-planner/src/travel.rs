//! Travel-time estimation.
//!
//! Speed resolution per segment, first match wins:
//!
//! | Source                     | Example            |
//! |----------------------------|--------------------|
//! | Edge `speed_kmh`           | `Some(4.0)`        |
//! | Road-type table            | `"footway" → 4.5`  |
//! | Model default              | 5 km/h (walking)   |

use std::collections::BTreeMap;

use sr_network::{Edge, WeightedRoadNetwork};

use crate::{Path, PlanError, PlanResult, RoutePlanner};

/// Walking pace used by [`SpeedModel::walking`], km/h.
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// Deserializing runs the same speed checks as the constructors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SpeedModelRecord"))]
pub struct SpeedModel {
    default_kmh:  f64,
    by_road_type: BTreeMap<String, f64>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SpeedModelRecord {
    default_kmh: f64,
    #[serde(default)]
    by_road_type: BTreeMap<String, f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<SpeedModelRecord> for SpeedModel {
    type Error = PlanError;

    fn try_from(record: SpeedModelRecord) -> PlanResult<Self> {
        let mut model = SpeedModel::new(record.default_kmh)?;
        for (road_type, kmh) in record.by_road_type {
            model = model.with_road_type(road_type, kmh)?;
        }
        Ok(model)
    }
}

impl SpeedModel {
    pub fn new(default_kmh: f64) -> PlanResult<Self> {
        check_speed(default_kmh)?;
        Ok(Self { default_kmh, by_road_type: BTreeMap::new() })
    }

    pub fn walking() -> Self {
        Self { default_kmh: WALKING_SPEED_KMH, by_road_type: BTreeMap::new() }
    }

    /// Override the speed for edges tagged with `road_type`.
    pub fn with_road_type(mut self, road_type: impl Into<String>, kmh: f64) -> PlanResult<Self> {
        check_speed(kmh)?;
        self.by_road_type.insert(road_type.into(), kmh);
        Ok(self)
    }

    pub fn default_kmh(&self) -> f64 {
        self.default_kmh
    }

    /// Speed in km/h for traversing `edge`.
    pub fn speed_for(&self, edge: &Edge) -> f64 {
        edge.speed_kmh
            .or_else(|| {
                edge.road_type
                    .as_deref()
                    .and_then(|t| self.by_road_type.get(t).copied())
            })
            .unwrap_or(self.default_kmh)
    }
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self::walking()
    }
}

fn check_speed(kmh: f64) -> PlanResult<()> {
    if kmh.is_finite() && kmh > 0.0 {
        Ok(())
    } else {
        Err(PlanError::InvalidSpeed(kmh))
    }
}

impl RoutePlanner {
    /// Total travel time of `path` in minutes: `Σ distance / speed`.
    ///
    /// Edge metadata is read from `network`; fails with
    /// [`PlanError::Network`] if a segment's edge is no longer present.
    pub fn estimate_travel_time(
        &self,
        network: &WeightedRoadNetwork,
        path: &Path,
        model: &SpeedModel,
    ) -> PlanResult<f64> {
        let mut minutes = 0.0;
        for segment in &path.segments {
            let edge = network.edge(segment.edge)?;
            let metres_per_minute = model.speed_for(edge) * 1000.0 / 60.0;
            minutes += segment.distance / metres_per_minute;
        }
        Ok(minutes)
    }
}
