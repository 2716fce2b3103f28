//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default bound on chained completion transitions per stimulus.
pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 256;

/// What to do when more than one transition of a state is enabled at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Fail the stimulus with `EngineError::AmbiguousTransition`.
    #[default]
    Reject,
    /// Take the first enabled transition in declaration order and log a
    /// warning.
    FirstDeclared,
}

/// Run-time settings shared by every stimulus of an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub(crate) ambiguity: AmbiguityPolicy,
    pub(crate) max_cascade_depth: usize,
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    pub fn ambiguity(&self) -> AmbiguityPolicy {
        self.ambiguity
    }

    pub fn max_cascade_depth(&self) -> usize {
        self.max_cascade_depth
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ambiguity: AmbiguityPolicy::default(),
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
        }
    }
}

/// Builder for creating an engine configuration
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set how ambiguous guards are resolved
    pub fn ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.config.ambiguity = policy;
        self
    }

    /// Set the maximum number of chained completion transitions
    pub fn max_cascade_depth(mut self, depth: usize) -> Self {
        self.config.max_cascade_depth = depth;
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
