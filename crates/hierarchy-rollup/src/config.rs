//! Configuration types for the roll-up engine.

/// Configuration for [`Rollup`](crate::Rollup).
///
/// # Example
///
/// ```rust
/// use hierarchy_rollup::RollupConfig;
///
/// let config = RollupConfig::builder()
///     .with_parallel(true)
///     .with_max_expanded_rows(1_000_000)
///     .build();
/// assert_eq!(config.max_expanded_rows, Some(1_000_000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RollupConfig {
    /// Expand fact rows in parallel (requires the `parallel` feature).
    pub parallel: bool,
    /// Maximum number of expanded rows (None = unlimited).
    pub max_expanded_rows: Option<usize>,
}

impl RollupConfig {
    /// Creates a new builder for RollupConfig.
    pub fn builder() -> RollupConfigBuilder {
        RollupConfigBuilder::default()
    }
}

/// Builder for RollupConfig.
#[derive(Debug, Clone, Default)]
pub struct RollupConfigBuilder {
    parallel: bool,
    max_expanded_rows: Option<usize>,
}

impl RollupConfigBuilder {
    /// Enables or disables parallel expansion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the maximum number of expanded rows.
    pub fn with_max_expanded_rows(mut self, limit: usize) -> Self {
        self.max_expanded_rows = Some(limit);
        self
    }

    /// Builds the RollupConfig.
    pub fn build(self) -> RollupConfig {
        RollupConfig {
            parallel: self.parallel,
            max_expanded_rows: self.max_expanded_rows,
        }
    }
}
