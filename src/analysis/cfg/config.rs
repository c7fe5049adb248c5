//! Graph construction settings.

/// Settings for [`GraphBuilder`](crate::analysis::GraphBuilder).
///
/// # Example
///
/// ```rust
/// use dexscope::analysis::GraphConfig;
///
/// let config = GraphConfig::default();
/// assert!(!config.deduplicate_switch_targets);
///
/// let config = GraphConfig::new().with_deduplicate_switch_targets(true);
/// assert!(config.deduplicate_switch_targets);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphConfig {
    /// Collapse switch cases that lead to an already connected target.
    ///
    /// By default every payload element produces its own edge, so several keys sharing a
    /// target yield parallel edges. When enabled only the first case per target is kept.
    pub deduplicate_switch_targets: bool,
}

impl GraphConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`deduplicate_switch_targets`](Self::deduplicate_switch_targets).
    #[must_use]
    pub fn with_deduplicate_switch_targets(mut self, enabled: bool) -> Self {
        self.deduplicate_switch_targets = enabled;
        self
    }
}
