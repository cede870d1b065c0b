//! Project-wide generator defaults.
//!
//! A class's own `ApiClientGenerator(...)` options always win; these values
//! only fill in what the class leaves unset.

use serde::Serialize;

use crate::ir::{SerializationMode, Serializer};

/// Namespace of the shared attribute definitions when none is configured.
pub const DEFAULT_ROOT_NAMESPACE: &str = "ApiClient.Generated";

/// Defaults applied underneath class-level options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorDefaults {
    /// Namespace for `Common.g.cs`.
    pub root_namespace: String,
    /// Serializer used when a class says nothing (or `Inherit`).
    pub serializer: Serializer,
    /// Thread cancellation tokens into content reads.
    pub net_core: bool,
    /// Class-wide slow-call threshold in milliseconds, 0 disables.
    pub connection_too_long_warn: u32,
}

impl Default for GeneratorDefaults {
    fn default() -> Self {
        Self {
            root_namespace: DEFAULT_ROOT_NAMESPACE.to_string(),
            serializer: Serializer::Newtonsoft,
            net_core: false,
            connection_too_long_warn: 0,
        }
    }
}

impl GeneratorDefaults {
    /// Apply a serialization symbol from configuration. `Inherit` keeps the current value.
    pub fn with_serialization(mut self, mode: SerializationMode) -> Self {
        self.serializer = mode.resolve(self.serializer);
        self
    }
}

/// Clamp a configured millisecond value; negative disables.
pub fn clamp_threshold(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
