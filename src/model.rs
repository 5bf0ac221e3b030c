//! Entity model: infrastructure segments, buildings, and the segment arena.
//!
//! Segments live in a single arena owned by [`Network`]. Buildings hold
//! indices into that arena, so a trunk segment shared by several buildings
//! is one object: repairing it through any building is immediately visible
//! to all the others. Every aggregate is recomputed from current segment
//! state on each call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::traits::MaterialRates;

/// Cable construction type; selects the per-meter rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialClass {
    Aerial,
    SemiAerial,
    Conduit,
}

impl MaterialClass {
    /// Parses a material label, accepting the French field vocabulary.
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "aerial" | "aerien" | "aérien" => Some(Self::Aerial),
            "semi-aerial" | "semi_aerial" | "semi-aerien" | "semi-aérien" => Some(Self::SemiAerial),
            "conduit" | "fourreau" => Some(Self::Conduit),
            _ => None,
        }
    }
}

/// Segment lifecycle. The only transition is `ToReplace -> Intact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentState {
    ToReplace,
    Intact,
}

impl SegmentState {
    pub fn parse(raw: &str) -> Option<Self> {
        match normalize_label(raw).as_str() {
            "to_replace" | "toreplace" | "a_remplacer" => Some(Self::ToReplace),
            "intact" | "infra_intacte" => Some(Self::Intact),
            _ => None,
        }
    }
}

/// Building category, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingCategory {
    Hospital,
    School,
    Residential,
    Other,
}

impl BuildingCategory {
    /// Parses a category label. Unknown labels fall into [`BuildingCategory::Other`].
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "hospital" | "hôpital" | "hopital" => Self::Hospital,
            "school" | "école" | "ecole" => Self::School,
            "residential" | "habitation" => Self::Residential,
            _ => Self::Other,
        }
    }

    /// Category weight: 1 for hospitals up to 4 for everything else.
    pub fn weight(self) -> u8 {
        match self {
            Self::Hospital => 1,
            Self::School => 2,
            Self::Residential => 3,
            Self::Other => 4,
        }
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Index of a segment inside a [`Network`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SegmentIdx(pub usize);

/// Index of a building inside a [`Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BuildingIdx(pub usize);

/// A physical cable run that can be replaced independently.
#[derive(Debug, Clone, PartialEq)]
pub struct InfraSegment {
    id: String,
    length: f64,
    material: MaterialClass,
    houses_served: u32,
    state: SegmentState,
    rates: MaterialRates,
}

impl InfraSegment {
    pub fn new(
        id: impl Into<String>,
        length: f64,
        material: MaterialClass,
        houses_served: u32,
        state: SegmentState,
        rates: MaterialRates,
    ) -> Self {
        Self {
            id: id.into(),
            length,
            material,
            houses_served,
            state,
            rates,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn material(&self) -> MaterialClass {
        self.material
    }

    pub fn houses_served(&self) -> u32 {
        self.houses_served
    }

    pub fn state(&self) -> SegmentState {
        self.state
    }

    pub fn is_to_replace(&self) -> bool {
        self.state == SegmentState::ToReplace
    }

    /// Material cost of replacing the whole run.
    pub fn cost(&self) -> f64 {
        self.length * self.rates.cost_per_meter
    }

    /// Crew hours for replacing the whole run.
    pub fn duration(&self) -> f64 {
        self.length * self.rates.duration_per_meter
    }

    /// Meters of cable per house served.
    ///
    /// Infinite when the segment serves no house, which drives the ease
    /// term of any building owning it to zero without breaking arithmetic.
    pub fn difficulty(&self) -> f64 {
        if self.houses_served == 0 {
            f64::INFINITY
        } else {
            self.length / f64::from(self.houses_served)
        }
    }

    /// Marks the segment intact. Returns `true` only on the actual transition;
    /// repairing an intact segment is a no-op.
    pub fn repair(&mut self) -> bool {
        if self.state == SegmentState::Intact {
            return false;
        }
        self.state = SegmentState::Intact;
        true
    }
}

/// Sums over the `ToReplace` segments of one building at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuildingAggregates {
    pub cost: f64,
    pub duration: f64,
    pub difficulty: f64,
    pub houses_pending: u64,
    pub pending_segments: usize,
}

/// A building and the segments that feed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    id: String,
    category: BuildingCategory,
    segments: Vec<SegmentIdx>,
}

impl Building {
    pub fn new(id: impl Into<String>, category: BuildingCategory) -> Self {
        Self {
            id: id.into(),
            category,
            segments: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> BuildingCategory {
        self.category
    }

    pub fn segments(&self) -> &[SegmentIdx] {
        &self.segments
    }

    fn attach(&mut self, segment: SegmentIdx) {
        if !self.segments.contains(&segment) {
            self.segments.push(segment);
        }
    }

    fn pending<'a>(&'a self, arena: &'a [InfraSegment]) -> impl Iterator<Item = &'a InfraSegment> + 'a {
        self.segments
            .iter()
            .map(move |idx| &arena[idx.0])
            .filter(|segment| segment.is_to_replace())
    }

    pub fn aggregate_cost(&self, arena: &[InfraSegment]) -> f64 {
        self.pending(arena).map(InfraSegment::cost).sum()
    }

    pub fn aggregate_duration(&self, arena: &[InfraSegment]) -> f64 {
        self.pending(arena).map(InfraSegment::duration).sum()
    }

    pub fn aggregate_difficulty(&self, arena: &[InfraSegment]) -> f64 {
        self.pending(arena).map(InfraSegment::difficulty).sum()
    }

    pub fn houses_pending(&self, arena: &[InfraSegment]) -> u64 {
        self.pending(arena).map(|segment| u64::from(segment.houses_served())).sum()
    }

    /// All aggregates in a single pass over the owned segments.
    pub fn aggregates(&self, arena: &[InfraSegment]) -> BuildingAggregates {
        self.pending(arena)
            .fold(BuildingAggregates::default(), |mut acc, segment| {
                acc.cost += segment.cost();
                acc.duration += segment.duration();
                acc.difficulty += segment.difficulty();
                acc.houses_pending += u64::from(segment.houses_served());
                acc.pending_segments += 1;
                acc
            })
    }

    /// A building is pending while at least one house still waits on it.
    pub fn is_pending(&self, arena: &[InfraSegment]) -> bool {
        self.houses_pending(arena) > 0
    }

    /// True when the building still owns segments to replace.
    pub fn has_work(&self, arena: &[InfraSegment]) -> bool {
        self.pending(arena).next().is_some()
    }
}

/// Arena of segments plus the buildings referencing them.
#[derive(Debug, Clone, Default)]
pub struct Network {
    segments: Vec<InfraSegment>,
    segment_lookup: HashMap<String, SegmentIdx>,
    buildings: Vec<Building>,
    building_lookup: HashMap<String, BuildingIdx>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a segment. If a segment with the same id already exists the
    /// existing one is kept and its index returned.
    pub fn add_segment(&mut self, segment: InfraSegment) -> SegmentIdx {
        if let Some(&idx) = self.segment_lookup.get(segment.id()) {
            return idx;
        }
        let idx = SegmentIdx(self.segments.len());
        self.segment_lookup.insert(segment.id().to_string(), idx);
        self.segments.push(segment);
        idx
    }

    /// Registers a building, or returns the existing one with the same id.
    pub fn add_building(&mut self, building: Building) -> BuildingIdx {
        if let Some(&idx) = self.building_lookup.get(building.id()) {
            return idx;
        }
        let idx = BuildingIdx(self.buildings.len());
        self.building_lookup.insert(building.id().to_string(), idx);
        self.buildings.push(building);
        idx
    }

    /// Links a building to a segment it draws power through.
    pub fn attach(&mut self, building: BuildingIdx, segment: SegmentIdx) {
        self.buildings[building.0].attach(segment);
    }

    pub fn segments(&self) -> &[InfraSegment] {
        &self.segments
    }

    pub fn segment(&self, idx: SegmentIdx) -> &InfraSegment {
        &self.segments[idx.0]
    }

    pub fn find_segment(&self, id: &str) -> Option<SegmentIdx> {
        self.segment_lookup.get(id).copied()
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, idx: BuildingIdx) -> &Building {
        &self.buildings[idx.0]
    }

    pub fn find_building(&self, id: &str) -> Option<BuildingIdx> {
        self.building_lookup.get(id).copied()
    }

    pub fn building_indices(&self) -> impl Iterator<Item = BuildingIdx> {
        (0..self.buildings.len()).map(BuildingIdx)
    }

    pub fn segment_indices(&self) -> impl Iterator<Item = SegmentIdx> {
        (0..self.segments.len()).map(SegmentIdx)
    }

    pub fn aggregates(&self, building: BuildingIdx) -> BuildingAggregates {
        self.buildings[building.0].aggregates(&self.segments)
    }

    pub fn is_pending(&self, building: BuildingIdx) -> bool {
        self.buildings[building.0].is_pending(&self.segments)
    }

    /// Repairs every `ToReplace` segment owned by `building` and returns the
    /// ids of the segments that actually transitioned.
    pub fn repair_building(&mut self, building: BuildingIdx) -> Vec<String> {
        let mut repaired = Vec::new();
        for idx in &self.buildings[building.0].segments {
            let segment = &mut self.segments[idx.0];
            if segment.repair() {
                repaired.push(segment.id().to_string());
            }
        }
        repaired
    }
}
