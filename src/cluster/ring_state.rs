use std::collections::BTreeMap;
use std::fmt;

/// Point-in-time diagnostic view of a ring, taken under the ring lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingState {
    pub total_points: usize,
    pub points_per_node: BTreeMap<String, usize>,
    /// Lowest positions on the ring, ascending, truncated to the configured
    /// sample size.
    pub sample: Vec<(u64, String)>,
    pub loads: BTreeMap<String, u64>,
}

impl RingState {
    pub fn node_count(&self) -> usize {
        self.points_per_node.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.sample.len() < self.total_points
    }

    /// Fraction of the ring's points owned by the node.
    pub fn point_share(&self, node_id: &str) -> f64 {
        if self.total_points == 0 {
            0.0
        } else {
            self.points_per_node.get(node_id).copied().unwrap_or(0) as f64 / self.total_points as f64
        }
    }

    pub fn total_load(&self) -> u64 {
        self.loads.values().sum()
    }
}

impl fmt::Display for RingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ring: {} virtual points across {} nodes", self.total_points, self.node_count())?;
        for (node_id, points) in &self.points_per_node {
            writeln!(f, "  {}: {} points ({:.1}%)", node_id, points, self.point_share(node_id) * 100.0)?;
        }
        writeln!(f, "Positions:")?;
        for (position, node_id) in &self.sample {
            writeln!(f, "  {:#018x} -> {}", position, node_id)?;
        }
        if self.is_truncated() {
            writeln!(f, "  ... {} more", self.total_points - self.sample.len())?;
        }
        writeln!(f, "Loads:")?;
        for (node_id, load) in &self.loads {
            writeln!(f, "  {}: {}", node_id, load)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_state() -> RingState {
        RingState {
            total_points: 4,
            points_per_node: BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 3)]),
            sample: vec![(1, "a".to_string()), (0xff, "b".to_string())],
            loads: BTreeMap::from([("a".to_string(), 5), ("b".to_string(), 7), ("gone".to_string(), 2)]),
        }
    }

    #[test]
    fn test_point_share() {
        let state = make_state();
        assert_eq!(state.point_share("b"), 0.75);
        assert_eq!(state.point_share("missing"), 0.0);
        assert_eq!(state.total_load(), 14);
    }

    #[test]
    fn test_empty_state_share_is_zero() {
        let state = RingState {
            total_points: 0,
            points_per_node: BTreeMap::new(),
            sample: Vec::new(),
            loads: BTreeMap::new(),
        };
        assert_eq!(state.point_share("a"), 0.0);
        assert!(!state.is_truncated());
    }

    #[test]
    fn test_display_lists_sections() {
        let rendered = make_state().to_string();

        assert!(rendered.starts_with("Ring: 4 virtual points across 2 nodes"));
        assert!(rendered.contains("  b: 3 points (75.0%)"));
        assert!(rendered.contains("  0x00000000000000ff -> b"));
        assert!(rendered.contains("  ... 2 more"));
        assert!(rendered.contains("  gone: 2"));
    }
}
