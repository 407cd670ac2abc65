// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage.
//!
//! Keys are created by `slotmap::SlotMap` and remain valid even after other
//! entries are removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for a scene node (primitive part or group instance).
    pub struct NodeKey;

    /// Key for a group (reusable collection of nodes).
    pub struct GroupKey;

    /// Key for shared mesh data referenced by nodes.
    pub struct MeshKey;

    /// Key for a temporary joined mesh created while realizing a group.
    pub struct TempMeshKey;
}
