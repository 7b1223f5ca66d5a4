//! CSV incident loader.
//!
//! # CSV format
//!
//! One row per incident, positions already projected into the planar frame:
//!
//! ```csv
//! incident_id,x,y,threat_level,threat_score
//! INC_001,120.5,-40.0,HIGH,0.82
//! INC_002,300.0,15.2,low,0.10
//! ```
//!
//! `threat_level` is case-insensitive (`LOW`, `MEDIUM`, `HIGH`, `CRITICAL`).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use sr_core::Position;

use crate::heatmap::{Incident, ThreatLevel};
use crate::{RiskError, RiskResult};

#[derive(Deserialize)]
struct IncidentRecord {
    incident_id:  String,
    x:            f64,
    y:            f64,
    threat_level: String,
    threat_score: f64,
}

/// Load incidents from a CSV file.
pub fn load_incidents_csv(path: &Path) -> RiskResult<Vec<Incident>> {
    let file = std::fs::File::open(path)?;
    load_incidents_reader(file)
}

/// Like [`load_incidents_csv`] but accepts any `Read` source.
pub fn load_incidents_reader<R: Read>(reader: R) -> RiskResult<Vec<Incident>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut incidents = Vec::new();

    for (row_no, result) in csv_reader.deserialize::<IncidentRecord>().enumerate() {
        let row = result?;
        let level: ThreatLevel = row.threat_level.parse().map_err(|e| match e {
            RiskError::Parse(reason) => RiskError::Parse(format!("row {}: {reason}", row_no + 1)),
            other => other,
        })?;
        let position = Position::new(row.x, row.y);
        if !position.is_finite() {
            return Err(RiskError::InvalidPosition { owner: row.incident_id });
        }
        incidents.push(Incident {
            id: row.incident_id,
            position,
            level,
            score: row.threat_score,
        });
    }

    Ok(incidents)
}
