//! Test fixtures for restoration-planner.
//!
//! Provides:
//! - A row builder producing boundary records
//! - A synthetic district with shared trunks, intact runs and mixed categories

#![allow(dead_code)]

use restoration_planner::model::Network;
use restoration_planner::rates::StandardRates;
use restoration_planner::records::{build_network, NetworkRecord};

/// Builder for record batches with sensible defaults.
#[derive(Clone, Debug, Default)]
pub struct TestNetwork {
    records: Vec<NetworkRecord>,
}

impl TestNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a segment to replace feeding `building`.
    pub fn segment(
        mut self,
        building: &str,
        category: &str,
        segment: &str,
        material: &str,
        length: f64,
        houses: i64,
    ) -> Self {
        self.records.push(NetworkRecord::new(
            building,
            category,
            houses,
            segment,
            "a_remplacer",
            material,
            length,
        ));
        self
    }

    /// Adds an intact segment feeding `building`.
    pub fn intact_segment(
        mut self,
        building: &str,
        category: &str,
        segment: &str,
        length: f64,
        houses: i64,
    ) -> Self {
        self.records.push(NetworkRecord::new(
            building,
            category,
            houses,
            segment,
            "infra_intacte",
            "aerien",
            length,
        ));
        self
    }

    pub fn records(&self) -> &[NetworkRecord] {
        &self.records
    }

    pub fn build(&self) -> Network {
        build_network(&self.records, &StandardRates::default()).expect("fixture records are valid")
    }
}

/// The three-building incident: one hospital, one school, one residence.
pub fn incident() -> TestNetwork {
    TestNetwork::new()
        .segment("H", "hôpital", "I-H", "aerien", 100.0, 5)
        .segment("S", "école", "I-S", "semi-aerien", 50.0, 10)
        .segment("R", "habitation", "I-R", "fourreau", 20.0, 2)
}

/// A deterministic district of `size` buildings.
///
/// Every building owns one private line; groups of four share a trunk;
/// every fifth building also hangs off an intact service run.
pub fn district(size: usize) -> TestNetwork {
    let categories = ["hôpital", "école", "habitation", "habitation", "commerce"];
    let materials = ["aerien", "semi-aerien", "fourreau"];

    let mut network = TestNetwork::new();
    for i in 0..size {
        let building = format!("B{i:03}");
        let category = categories[(i * 7) % categories.len()];
        let length = 5.0 + ((i * 37) % 90) as f64;
        let houses = 1 + ((i * 13) % 6) as i64;

        network = network
            .segment(&building, category, &format!("L{i:03}"), materials[i % 3], length, houses)
            .segment(&building, category, &format!("T{:02}", i / 4), "aerien", 60.0, 8);
        if i % 5 == 0 {
            network = network.intact_segment(&building, category, &format!("X{:02}", i / 10), 15.0, 3);
        }
    }
    network
}
