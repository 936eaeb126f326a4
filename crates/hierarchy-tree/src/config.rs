//! Configuration for hierarchy construction.

use crate::value::NodeKey;

/// Prefix of the parent column (`parent_<name>`).
pub const DEFAULT_PARENT_PREFIX: &str = "parent_";

/// Sort index column added to the node table.
pub const DEFAULT_IX_COLUMN: &str = "h_ix";

/// Level column added to the node table.
pub const DEFAULT_LEVEL_COLUMN: &str = "h_level";

/// Configuration of a hierarchy.
///
/// # Example
///
/// ```rust
/// use hierarchy_tree::{HierarchyConfig, NodeKey};
///
/// let config = HierarchyConfig::builder("dept")
///     .with_root("0")
///     .build();
///
/// assert_eq!(config.parent_column(), "parent_dept");
/// assert_eq!(config.root, Some(NodeKey::from("0")));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchyConfig {
    /// Name of the hierarchy and of its key column (e.g. `dept`).
    pub name: String,
    /// Explicit root key (None = parent of the first definition row).
    pub root: Option<NodeKey>,
    /// Prefix that turns `name` into the parent column name.
    pub parent_prefix: String,
    /// Sort index column.
    pub ix_column: String,
    /// Level column.
    pub level_column: String,
}

impl HierarchyConfig {
    /// Creates a configuration with default column names.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
            parent_prefix: DEFAULT_PARENT_PREFIX.to_string(),
            ix_column: DEFAULT_IX_COLUMN.to_string(),
            level_column: DEFAULT_LEVEL_COLUMN.to_string(),
        }
    }

    /// Creates a new builder for HierarchyConfig.
    pub fn builder(name: impl Into<String>) -> HierarchyConfigBuilder {
        HierarchyConfigBuilder {
            config: Self::new(name),
        }
    }

    /// Name of the parent key column.
    pub fn parent_column(&self) -> String {
        format!("{}{}", self.parent_prefix, self.name)
    }
}

/// Builder for HierarchyConfig.
#[derive(Debug, Clone)]
pub struct HierarchyConfigBuilder {
    config: HierarchyConfig,
}

impl HierarchyConfigBuilder {
    /// Sets the root key.
    pub fn with_root(mut self, root: impl Into<NodeKey>) -> Self {
        self.config.root = Some(root.into());
        self
    }

    /// Sets the parent column prefix.
    pub fn with_parent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.parent_prefix = prefix.into();
        self
    }

    /// Sets the sort index column.
    pub fn with_ix_column(mut self, column: impl Into<String>) -> Self {
        self.config.ix_column = column.into();
        self
    }

    /// Sets the level column.
    pub fn with_level_column(mut self, column: impl Into<String>) -> Self {
        self.config.level_column = column.into();
        self
    }

    /// Builds the HierarchyConfig.
    pub fn build(self) -> HierarchyConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HierarchyConfig::new("oe");
        assert_eq!(config.name, "oe");
        assert!(config.root.is_none());
        assert_eq!(config.parent_column(), "parent_oe");
        assert_eq!(config.ix_column, "h_ix");
        assert_eq!(config.level_column, "h_level");
    }

    #[test]
    fn test_config_builder() {
        let config = HierarchyConfig::builder("dept")
            .with_root(0)
            .with_parent_prefix("up_")
            .with_ix_column("sort")
            .with_level_column("depth")
            .build();

        assert_eq!(config.root, Some(NodeKey::Int(0)));
        assert_eq!(config.parent_column(), "up_dept");
        assert_eq!(config.ix_column, "sort");
        assert_eq!(config.level_column, "depth");
    }
}
