//! Statistics about hierarchy builds.

/// Statistics about a built hierarchy.
#[derive(Debug, Clone, Default)]
pub struct HierarchyStats {
    /// Number of definition rows turned into nodes.
    pub node_count: usize,
    /// Nodes with a path from the root (the root row included).
    pub reachable_count: usize,
    /// Nodes left at the unassigned level.
    pub unreachable_count: usize,
    /// Deepest assigned level.
    pub max_depth: u32,
    /// Rows dropped before building (structure parsing).
    pub skipped_rows: usize,
    /// Time taken to build the hierarchy in milliseconds.
    pub build_time_ms: u64,
}

impl HierarchyStats {
    /// Share of nodes reachable from the root, as a percentage.
    pub fn reachable_rate(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            (self.reachable_count as f64 / self.node_count as f64) * 100.0
        }
    }
}

impl std::fmt::Display for HierarchyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hierarchy Statistics:")?;
        writeln!(f, "  Nodes:        {}", self.node_count)?;
        writeln!(f, "  Reachable:    {} ({:.1}%)", self.reachable_count, self.reachable_rate())?;
        writeln!(f, "  Unreachable:  {}", self.unreachable_count)?;
        writeln!(f, "  Max depth:    {}", self.max_depth)?;
        writeln!(f, "  Skipped rows: {}", self.skipped_rows)?;
        writeln!(f, "  Build time:   {}ms", self.build_time_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable_rate() {
        let stats = HierarchyStats {
            node_count: 4,
            reachable_count: 3,
            unreachable_count: 1,
            ..Default::default()
        };
        assert!((stats.reachable_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(HierarchyStats::default().reachable_rate(), 0.0);
    }

    #[test]
    fn test_display_mentions_counts() {
        let stats = HierarchyStats {
            node_count: 10,
            reachable_count: 10,
            max_depth: 4,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("Nodes:        10"));
        assert!(text.contains("Max depth:    4"));
    }
}
