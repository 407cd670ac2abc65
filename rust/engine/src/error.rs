// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error taxonomy of a BOM run.
//!
//! Only [`ResolveError::NoRootSelection`] and an invalid configuration abort
//! a run. Every other failure is contained to the branch that produced it:
//! the resolver records a [`Diagnostic`] and carries on with the siblings.

use serde::Serialize;

/// Errors raised while resolving the scene graph.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The branch went deeper than the configured limit.
    #[error("recursion limit {limit} exceeded at '{node}' (depth {depth})")]
    RecursionLimitExceeded {
        node: String,
        depth: usize,
        limit: usize,
    },

    /// A group instance references a group without members.
    #[error("group instance '{node}' references empty group '{group}'")]
    EmptyGroupReference { node: String, group: String },

    /// A primitive is hidden in the active context.
    #[error("'{node}' is not visible")]
    NotVisible { node: String },

    /// Neither a selection nor an auto-selection produced any root.
    #[error("nothing selected and no visible part to select")]
    NoRootSelection,

    /// The node's geometry cannot be measured for volume.
    #[error("no volume for '{node}': unsupported geometry")]
    UnsupportedVolumeGeometry { node: String },

    /// Duplicate, join or triangulate failed in the geometry collaborator.
    #[error("geometry provider failed for '{node}': {source}")]
    GeometryProviderFailure {
        node: String,
        #[source]
        source: bom_lite_scene::Error,
    },

    /// Strict cycle mode: a group is entered again below one of its own instances.
    #[error("group '{group}' already on the ancestor chain of '{node}'")]
    CycleDetected { node: String, group: String },

    /// The scene returned a dangling reference.
    #[error("scene error: {0}")]
    Scene(#[from] bom_lite_scene::Error),

    /// The run configuration is out of range.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ResolveError {
    /// Whether the whole run has to stop.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn severity(&self) -> Severity {
        match self {
            ResolveError::NotVisible { .. } | ResolveError::UnsupportedVolumeGeometry { .. } => {
                Severity::Notice
            }
            ResolveError::EmptyGroupReference { .. }
            | ResolveError::GeometryProviderFailure { .. } => Severity::Warning,
            ResolveError::RecursionLimitExceeded { .. }
            | ResolveError::CycleDetected { .. }
            | ResolveError::Scene(_) => Severity::Error,
            ResolveError::NoRootSelection | ResolveError::Config(_) => Severity::Fatal,
        }
    }

    /// Name of the node the failure belongs to, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            ResolveError::RecursionLimitExceeded { node, .. }
            | ResolveError::EmptyGroupReference { node, .. }
            | ResolveError::NotVisible { node }
            | ResolveError::UnsupportedVolumeGeometry { node }
            | ResolveError::GeometryProviderFailure { node, .. }
            | ResolveError::CycleDetected { node, .. } => Some(node),
            ResolveError::NoRootSelection | ResolveError::Scene(_) | ResolveError::Config(_) => {
                None
            }
        }
    }

    /// Keep whichever of two failures is worse; the earlier one wins ties.
    pub fn worst(current: Option<Self>, next: Self) -> Option<Self> {
        match current {
            Some(c) if c.severity() >= next.severity() => Some(c),
            _ => Some(next),
        }
    }
}

/// How bad a failure is, ordered from harmless to run-aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice,
    Warning,
    Error,
    Fatal,
}

/// A contained failure, kept in traversal order for the caller to report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub message: String,
}

impl From<&ResolveError> for Diagnostic {
    fn from(err: &ResolveError) -> Self {
        Self {
            severity: err.severity(),
            node: err.node().map(str::to_owned),
            message: err.to_string(),
        }
    }
}

/// Out-of-range run configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("precision {0} is out of range 0..=10")]
    Precision(u8),

    #[error("max recursion depth must be at least 1")]
    ZeroDepth,

    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_roots_and_config_are_fatal() {
        assert!(ResolveError::NoRootSelection.is_fatal());
        assert!(ResolveError::Config(ConfigError::ZeroDepth).is_fatal());
        assert!(!ResolveError::NotVisible { node: "a".into() }.is_fatal());
        assert!(!ResolveError::RecursionLimitExceeded {
            node: "a".into(),
            depth: 101,
            limit: 100
        }
        .is_fatal());
    }

    #[test]
    fn worst_keeps_the_earlier_on_ties() {
        let first = ResolveError::NotVisible { node: "a".into() };
        let second = ResolveError::NotVisible { node: "b".into() };
        let kept = ResolveError::worst(Some(first), second).unwrap();
        assert_eq!(kept.node(), Some("a"));

        let worse = ResolveError::EmptyGroupReference {
            node: "c".into(),
            group: "G".into(),
        };
        let kept = ResolveError::worst(Some(kept), worse).unwrap();
        assert_eq!(kept.severity(), Severity::Warning);
    }

    #[test]
    fn diagnostic_from_error() {
        let diag = Diagnostic::from(&ResolveError::NotVisible {
            node: "Spare".into(),
        });
        assert_eq!(diag.severity, Severity::Notice);
        assert_eq!(diag.node.as_deref(), Some("Spare"));
        assert_eq!(diag.message, "'Spare' is not visible");
    }
}
