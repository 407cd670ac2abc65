// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Chain of group instances enclosing the node being resolved.

use bom_lite_scene::{GroupKey, NodeKey};

use crate::key::PartKey;

/// One enclosing group instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AncestorFrame {
    pub node: NodeKey,
    pub group: GroupKey,
    /// Key of the instance, built against the frames below it.
    pub key: PartKey,
}

/// Ancestor chain, innermost last.
///
/// Frames are pushed and popped only through [`AncestorStack::descend`], so
/// the stack is back to its previous state whatever the descent returns.
#[derive(Debug, Default)]
pub struct AncestorStack {
    frames: Vec<AncestorFrame>,
}

impl AncestorStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn frames(&self) -> &[AncestorFrame] {
        &self.frames
    }

    #[inline]
    pub fn last(&self) -> Option<&AncestorFrame> {
        self.frames.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether an instance of `group` already encloses the current node.
    pub fn contains_group(&self, group: GroupKey) -> bool {
        self.frames.iter().any(|f| f.group == group)
    }

    /// Run `f` with `frame` pushed on top of the stack.
    pub fn descend<R>(&mut self, frame: AncestorFrame, f: impl FnOnce(&mut Self) -> R) -> R {
        self.frames.push(frame);
        let result = f(self);
        self.frames.pop();
        result
    }
}
