//! Building adjacency through shared infrastructure.
//!
//! Two buildings are neighbours when they reference at least one common
//! segment. The graph is built once from the original topology, intact
//! segments included, and is never updated while repairs progress.

use petgraph::graph::{NodeIndex, UnGraph};

use crate::model::{BuildingIdx, Network, SegmentIdx};

#[derive(Debug, Clone)]
pub struct NetworkGraph {
    graph: UnGraph<BuildingIdx, ()>,
    degrees: Vec<usize>,
    owners_per_segment: Vec<usize>,
}

impl NetworkGraph {
    pub fn build(network: &Network) -> Self {
        let mut graph = UnGraph::with_capacity(network.buildings().len(), 0);
        let nodes: Vec<NodeIndex> = network
            .building_indices()
            .map(|idx| graph.add_node(idx))
            .collect();

        let mut owners: Vec<Vec<BuildingIdx>> = vec![Vec::new(); network.segments().len()];
        for idx in network.building_indices() {
            for segment in network.building(idx).segments() {
                owners[segment.0].push(idx);
            }
        }

        for sharing in &owners {
            for (i, a) in sharing.iter().enumerate() {
                for b in &sharing[i + 1..] {
                    graph.update_edge(nodes[a.0], nodes[b.0], ());
                }
            }
        }

        let degrees = nodes.iter().map(|&node| graph.neighbors(node).count()).collect();
        let owners_per_segment = owners.iter().map(Vec::len).collect();

        Self {
            graph,
            degrees,
            owners_per_segment,
        }
    }

    /// Number of distinct other buildings sharing a segment with `building`.
    pub fn degree(&self, building: BuildingIdx) -> usize {
        self.degrees.get(building.0).copied().unwrap_or(0)
    }

    pub fn mutualization_factor(&self, building: BuildingIdx) -> f64 {
        1.0 + self.degree(building) as f64
    }

    /// Number of buildings drawing power through `segment`.
    pub fn segment_sharing(&self, segment: SegmentIdx) -> usize {
        self.owners_per_segment.get(segment.0).copied().unwrap_or(0)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Building, BuildingCategory, InfraSegment, MaterialClass, SegmentState};
    use crate::traits::MaterialRates;

    fn segment(id: &str) -> InfraSegment {
        InfraSegment::new(
            id,
            10.0,
            MaterialClass::Aerial,
            1,
            SegmentState::ToReplace,
            MaterialRates::new(500.0, 2.0),
        )
    }

    fn network() -> (Network, [BuildingIdx; 4]) {
        let mut network = Network::new();
        let a = network.add_building(Building::new("a", BuildingCategory::Residential));
        let b = network.add_building(Building::new("b", BuildingCategory::Residential));
        let c = network.add_building(Building::new("c", BuildingCategory::School));
        let d = network.add_building(Building::new("d", BuildingCategory::Other));

        let trunk = network.add_segment(segment("trunk"));
        let branch = network.add_segment(segment("branch"));
        let second = network.add_segment(segment("second"));
        let leaf = network.add_segment(segment("leaf"));

        for building in [a, b, c] {
            network.attach(building, trunk);
        }
        network.attach(a, branch);
        network.attach(b, branch);
        network.attach(a, second);
        network.attach(b, second);
        network.attach(d, leaf);
        (network, [a, b, c, d])
    }

    #[test]
    fn test_degree_counts_distinct_neighbours() {
        let (network, [a, b, c, d]) = network();
        let graph = NetworkGraph::build(&network);

        assert_eq!(graph.degree(a), 2);
        assert_eq!(graph.degree(b), 2);
        assert_eq!(graph.degree(c), 2);
        assert_eq!(graph.degree(d), 0);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_isolated_building_factor_is_one() {
        let (network, [_, _, _, d]) = network();
        let graph = NetworkGraph::build(&network);
        assert_eq!(graph.mutualization_factor(d), 1.0);
    }

    #[test]
    fn test_graph_ignores_repair_progress() {
        let (mut network, [a, b, ..]) = network();
        let before = NetworkGraph::build(&network);
        network.repair_building(a);
        let after = NetworkGraph::build(&network);
        assert_eq!(before.degree(b), after.degree(b));
    }

    #[test]
    fn test_segment_sharing() {
        let (network, _) = network();
        let graph = NetworkGraph::build(&network);
        let trunk = network.find_segment("trunk").unwrap();
        assert_eq!(graph.segment_sharing(trunk), 3);
        let leaf = network.find_segment("leaf").unwrap();
        assert_eq!(graph.segment_sharing(leaf), 1);
        let shared = network
            .segment_indices()
            .filter(|&idx| graph.segment_sharing(idx) > 1)
            .count();
        assert_eq!(shared, 3);
    }
}
