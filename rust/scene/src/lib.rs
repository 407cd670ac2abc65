// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BOM-Lite Scene
//!
//! Arena-based scene graph of primitive parts and group instances.
//!
//! A [`Group`] is a reusable collection of nodes; a group instance is a node
//! that stands in for the group's members under its own transform. Groups may
//! contain instances of other groups (and, in damaged scenes, of themselves),
//! so the graph can alias and cycle. Nodes, groups and meshes live in slot
//! maps with stable keys; names are resolved to keys once, at ingestion.
//!
//! The [`SceneProvider`] and [`GeometryProvider`] traits are the seams the
//! BOM engine talks to. [`Scene`] and [`InMemoryGeometry`] implement them.

pub mod arena;
pub mod error;
pub mod keys;
pub mod node;
pub mod provider;
pub mod realize;
pub mod serialization;

pub use arena::{NamedMesh, Scene};
pub use error::{Error, Result};
pub use keys::{GroupKey, MeshKey, NodeKey, TempMeshKey};
pub use node::{Group, NodeKind, NodeType, SceneNode};
pub use provider::{GeometryProvider, SceneProvider};
pub use realize::{GeometryStats, InMemoryGeometry};
pub use serialization::SceneSnapshot;
