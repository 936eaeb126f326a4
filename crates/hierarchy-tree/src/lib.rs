//! # hierarchy-tree
//!
//! Rooted hierarchies built from tabular node definitions.
//!
//! A hierarchy is defined by a table with one row per node: a key column
//! (`dept`), a parent column (`parent_dept`) and any number of attribute
//! columns. Building it resolves the path from the root to every node and
//! assigns each node a level (its distance from the root).
//!
//! ## Key Features
//!
//! - **Two definition styles** - explicit parent links, or structure strings
//!   such as `"RvB|Sales & Marketing|Marketing"`
//! - **Tolerant construction** - unreachable nodes and unresolvable rows are
//!   reported as [`Diagnostic`]s instead of failing the build
//! - **Cheap snapshots** - clones share node storage; merging an aggregate
//!   copies on write
//!
//! ## Quick Start
//!
//! ```rust
//! use hierarchy_tree::{Hierarchy, HierarchyConfig, Level, Table, Value};
//!
//! let org = Table::from_columns(vec![
//!     ("dept", ["1", "12", "121", "2"].map(Value::from).to_vec()),
//!     ("parent_dept", ["0", "1", "12", "0"].map(Value::from).to_vec()),
//!     ("manager", ["Ann", "Bob", "Cy", "Di"].map(Value::from).to_vec()),
//! ])
//! .unwrap();
//!
//! let config = HierarchyConfig::builder("dept").with_root("0").build();
//! let h = Hierarchy::new(&org, config).unwrap();
//!
//! assert_eq!(h.level(&"121".into()), Some(Level::Depth(3)));
//! assert_eq!(h.children(&"1".into()).len(), 1);
//! assert_eq!(h.definition_table().columns().last().map(String::as_str), Some("h_level"));
//! ```
//!
//! ## From Structure Strings
//!
//! ```rust
//! use hierarchy_tree::{Hierarchy, HierarchyConfig, StructureSource, Table, Value};
//!
//! let src = Table::from_columns(vec![
//!     ("labels", ["RvB", "RvB|Finance", "RvB|Finance|Tax"].map(Value::from).to_vec()),
//!     ("dept", vec![Value::Int(10), Value::Int(200), Value::Int(210)]),
//! ])
//! .unwrap();
//!
//! let h = Hierarchy::from_structure(
//!     &src,
//!     HierarchyConfig::builder("dept").with_root("0").build(),
//!     &StructureSource::path("labels"),
//! )
//! .unwrap();
//!
//! assert_eq!(h.node(&210.into()).unwrap().parent(), &200.into());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/deserialize tables, values, configs and diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod aggregate;
mod builder;
mod config;
mod diagnostics;
mod error;
mod hierarchy;
mod level;
mod node;
mod paths;
mod stats;
mod structure;
mod table;
mod value;

// Public re-exports
pub use aggregate::AggregateResult;
pub use builder::TreeBuilder;
pub use config::{
    HierarchyConfig, HierarchyConfigBuilder, DEFAULT_IX_COLUMN, DEFAULT_LEVEL_COLUMN,
    DEFAULT_PARENT_PREFIX,
};
pub use diagnostics::Diagnostic;
pub use error::{HierarchyError, HierarchyResult};
pub use hierarchy::Hierarchy;
pub use level::{Level, UNASSIGNED_LEVEL};
pub use node::Node;
pub use paths::{PathMap, PathResolver};
pub use stats::HierarchyStats;
pub use structure::{
    ParsedStructure, StructureParser, StructureSource, DEFAULT_DELIMITER, DEFAULT_ROOT_SENTINEL,
};
pub use table::{Record, Table};
pub use value::{NodeKey, Value};
