//! # hierarchy-rollup
//!
//! Roll fact tables up along a [`hierarchy_tree::Hierarchy`].
//!
//! Facts are rows that reference one node (a person's department, an
//! invoice's cost centre). This crate answers the questions that need the
//! whole ancestry of that node:
//!
//! - **expand** - one copy of every fact per ancestor level, so a single
//!   group-by rolls a measure up to every level at once
//! - **aggregate** - that group-by, reduced with a [`Reducer`] and merged back
//!   onto the node table as a new column
//! - **wrap** - a reporting table with every node row followed by its facts
//!
//! ## Quick Start
//!
//! ```rust
//! use hierarchy_rollup::{Reducer, Rollup};
//! use hierarchy_tree::{Hierarchy, HierarchyConfig, Table, Value};
//!
//! let org = Table::from_columns(vec![
//!     ("dept", ["1", "12", "13"].map(Value::from).to_vec()),
//!     ("parent_dept", ["0", "1", "1"].map(Value::from).to_vec()),
//! ])
//! .unwrap();
//! let mut h = Hierarchy::new(&org, HierarchyConfig::builder("dept").with_root("0").build()).unwrap();
//!
//! let people = Table::from_columns(vec![
//!     ("pnr", vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
//!     ("dept", ["12", "13", "13"].map(Value::from).to_vec()),
//! ])
//! .unwrap();
//!
//! Rollup::add_aggregate(&mut h, &people, "pnr", "p_count", &Reducer::Count).unwrap();
//! assert_eq!(h.attribute(&"1".into(), "p_count"), Some(&Value::Int(3)));
//! assert_eq!(h.attribute(&"13".into(), "p_count"), Some(&Value::Int(2)));
//! ```
//!
//! ## With Configuration
//!
//! ```ignore
//! use hierarchy_rollup::{Rollup, RollupConfig};
//!
//! let config = RollupConfig::builder()
//!     .with_parallel(true)
//!     .with_max_expanded_rows(5_000_000)
//!     .build();
//!
//! let expansion = Rollup::with_config(&hierarchy, config).expand(&facts)?;
//! println!("{}", expansion.stats());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - Expands fact rows on the rayon thread pool when
//!   [`RollupConfig::parallel`] is set
//! - `serde` - Forwards to `hierarchy-tree/serde`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod reducer;
mod result;
mod rollup;
mod traits;

// Public re-exports
pub use config::{RollupConfig, RollupConfigBuilder};
pub use error::{RollupError, RollupResult};
pub use reducer::{ReduceFn, Reducer};
pub use result::{ExpandedRecord, Expansion, ExpansionStats};
pub use rollup::Rollup;
pub use traits::HierarchyView;

// Re-export commonly used types from the tree crate for convenience
pub use hierarchy_tree::{AggregateResult, Hierarchy, NodeKey, Table, Value};
