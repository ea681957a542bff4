//! Configuration errors
//!
//! Only construction can fail. Once a run is built, every failure path
//! (bad turn, obstacle, falling off) is a game outcome, not an error.

use thiserror::Error;

/// Errors raised while loading config or building a run controller
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tunable is out of range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// Two query masks share a layer
    #[error("layer masks `{first}` and `{second}` overlap")]
    OverlappingMasks {
        first: &'static str,
        second: &'static str,
    },

    /// The builder was not given a required collaborator
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The spawn point has no track tile under the liveness probe
    #[error("spawn point {0:?} is not above the course")]
    SpawnOffCourse([f32; 3]),

    /// The agent's collider would start inside solid geometry
    #[error("spawn point {0:?} is inside solid geometry")]
    SpawnEmbedded([f32; 3]),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
