// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operations.

use crate::keys::{GroupKey, NodeKey, TempMeshKey};

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a scene.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A snapshot refers to a node name that does not exist.
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    /// A snapshot refers to a group name that does not exist.
    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    /// A snapshot refers to a mesh name that does not exist.
    #[error("unknown mesh '{0}'")]
    UnknownMesh(String),

    /// Two entities of the same kind share a name.
    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    /// Mesh data is malformed.
    #[error("invalid mesh '{name}': {source}")]
    InvalidMesh {
        name: String,
        #[source]
        source: bom_lite_geometry::Error,
    },

    /// Node key not found in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// Group key not found in the arena.
    #[error("group not found: {0:?}")]
    GroupNotFound(GroupKey),

    /// Temporary mesh handle was already discarded or never existed.
    #[error("temporary mesh not found: {0:?}")]
    HandleNotFound(TempMeshKey),

    /// Geometry processing failed.
    #[error("geometry error: {0}")]
    Geometry(#[from] bom_lite_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
