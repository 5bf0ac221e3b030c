//! Input boundary: row-oriented network records.
//!
//! Each row links one building to one segment feeding it. Every field is
//! optional at the type level so a missing column is detected and reported
//! instead of defaulted. The whole batch is validated before the network is
//! built; one bad row rejects everything.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlannerError, Result};
use crate::model::{Building, BuildingCategory, InfraSegment, MaterialClass, Network, SegmentState};
use crate::traits::RateTable;

/// One row as produced by the ingestion collaborator.
///
/// Field aliases accept the column names of the field survey spreadsheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    #[serde(default, alias = "id_batiment")]
    pub building_id: Option<String>,
    #[serde(default, alias = "type_batiment")]
    pub building_category: Option<String>,
    #[serde(default, alias = "nb_maisons")]
    pub house_count: Option<i64>,
    #[serde(default, alias = "infra_id")]
    pub segment_id: Option<String>,
    #[serde(default, alias = "infra_type")]
    pub segment_state: Option<String>,
    #[serde(default, alias = "type_infra")]
    pub material: Option<String>,
    #[serde(default, alias = "longueur")]
    pub length: Option<f64>,
}

impl NetworkRecord {
    /// Builds a fully populated record.
    pub fn new(
        building_id: &str,
        building_category: &str,
        house_count: i64,
        segment_id: &str,
        segment_state: &str,
        material: &str,
        length: f64,
    ) -> Self {
        Self {
            building_id: Some(building_id.to_string()),
            building_category: Some(building_category.to_string()),
            house_count: Some(house_count),
            segment_id: Some(segment_id.to_string()),
            segment_state: Some(segment_state.to_string()),
            material: Some(material.to_string()),
            length: Some(length),
        }
    }
}

/// A row that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
struct ValidRecord {
    building_id: String,
    category: BuildingCategory,
    houses: u32,
    segment_id: String,
    state: SegmentState,
    material: MaterialClass,
    length: f64,
}

fn required<T: Clone>(value: &Option<T>, row: usize, field: &'static str) -> Result<T> {
    value.clone().ok_or(PlannerError::MissingField { row, field })
}

fn required_text(value: &Option<String>, row: usize, field: &'static str) -> Result<String> {
    let text = required(value, row, field)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::MissingField { row, field });
    }
    Ok(trimmed.to_string())
}

fn validate(record: &NetworkRecord, row: usize) -> Result<ValidRecord> {
    let building_id = required_text(&record.building_id, row, "building_id")?;
    let category = BuildingCategory::parse(&required_text(&record.building_category, row, "building_category")?);

    let house_count = required(&record.house_count, row, "house_count")?;
    let houses = u32::try_from(house_count).map_err(|_| PlannerError::InvalidValue {
        row,
        field: "house_count",
        value: house_count.to_string(),
    })?;

    let segment_id = required_text(&record.segment_id, row, "segment_id")?;

    let raw_state = required_text(&record.segment_state, row, "segment_state")?;
    let state = SegmentState::parse(&raw_state).ok_or_else(|| PlannerError::InvalidValue {
        row,
        field: "segment_state",
        value: raw_state.clone(),
    })?;

    let raw_material = required_text(&record.material, row, "material")?;
    let material = MaterialClass::parse(&raw_material).ok_or_else(|| PlannerError::InvalidValue {
        row,
        field: "material",
        value: raw_material.clone(),
    })?;

    let length = required(&record.length, row, "length")?;
    if !length.is_finite() || length < 0.0 {
        return Err(PlannerError::InvalidValue {
            row,
            field: "length",
            value: length.to_string(),
        });
    }

    Ok(ValidRecord {
        building_id,
        category,
        houses,
        segment_id,
        state,
        material,
        length,
    })
}

/// Validates every row and builds the segment arena.
///
/// Duplicate (building, segment) rows are dropped, first occurrence wins.
/// A segment's physical attributes come from the first row that names it;
/// a building's category likewise.
pub fn build_network<R: RateTable + ?Sized>(records: &[NetworkRecord], rates: &R) -> Result<Network> {
    let valid = records
        .iter()
        .enumerate()
        .map(|(row, record)| validate(record, row))
        .collect::<Result<Vec<_>>>()?;

    let mut network = Network::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut duplicates = 0usize;

    for record in valid {
        if !seen.insert((record.building_id.clone(), record.segment_id.clone())) {
            duplicates += 1;
            continue;
        }

        let segment_idx = match network.find_segment(&record.segment_id) {
            Some(idx) => {
                let existing = network.segment(idx);
                if existing.length() != record.length
                    || existing.material() != record.material
                    || existing.houses_served() != record.houses
                    || existing.state() != record.state
                {
                    warn!(
                        segment_id = %record.segment_id,
                        building_id = %record.building_id,
                        "conflicting segment attributes across rows; keeping first occurrence"
                    );
                }
                idx
            }
            None => network.add_segment(InfraSegment::new(
                record.segment_id.clone(),
                record.length,
                record.material,
                record.houses,
                record.state,
                rates.rates_for(record.material),
            )),
        };

        let building_idx = network.add_building(Building::new(record.building_id.clone(), record.category));
        if network.building(building_idx).category() != record.category {
            warn!(
                building_id = %record.building_id,
                "conflicting building category across rows; keeping first occurrence"
            );
        }
        network.attach(building_idx, segment_idx);
    }

    debug!(
        rows = records.len(),
        duplicates,
        buildings = network.buildings().len(),
        segments = network.segments().len(),
        "network built from records"
    );

    Ok(network)
}
