// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsing of display names.
//!
//! Scene authors encode BOM hints directly in object names:
//!
//! - `Bracket.001`: host duplicate suffix, dropped.
//! - `Plate mat:Steel S235`: inline material after a tag.
//! - `Hinge-atom`: never decompose this group instance.
//! - `Spacer_optional`: the part (and everything below it) is optional.

/// Inline material tags, in priority order.
pub const MATERIAL_TAGS: [&str; 6] = ["material:", "Material:", "mat:", "Mat:", "M:", "m:"];

const ATOMIC_MARKER: &str = "atom";
const OPTIONAL_MARKER: &str = "optional";

#[inline]
fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | ' ')
}

/// Strip trailing `.NNN` suffixes (exactly three digits each).
///
/// Stacked suffixes such as `Bracket.001.002` are all removed, so the result
/// is a fixed point.
pub fn strip_numeric_suffix(name: &str) -> &str {
    let mut current = name;
    while let Some((head, tail)) = current.rsplit_once('.') {
        if tail.len() == 3 && tail.bytes().all(|b| b.is_ascii_digit()) {
            current = head;
        } else {
            break;
        }
    }
    current
}

/// Split `name` at the first inline material tag, trying tags in priority
/// order. Returns `(label, material)`.
pub fn split_material_tag(name: &str) -> Option<(&str, &str)> {
    MATERIAL_TAGS.iter().find_map(|tag| {
        name.find(tag)
            .map(|at| (&name[..at], &name[at + tag.len()..]))
    })
}

/// Marker tokens found in a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub atomic: bool,
    pub optional: bool,
}

impl Markers {
    /// Union of two marker sets.
    pub fn or(self, other: Markers) -> Markers {
        Markers {
            atomic: self.atomic || other.atomic,
            optional: self.optional || other.optional,
        }
    }
}

/// Remove `atom` and `optional` tokens (case-insensitive, bounded by `-`,
/// `_`, space or the string ends).
pub fn strip_markers(text: &str) -> (String, Markers) {
    let mut markers = Markers::default();
    let mut kept: Vec<(Option<char>, &str)> = Vec::new();

    let mut separator = None;
    let mut start = 0;
    for (i, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        if i < text.len() && !is_separator(c) {
            continue;
        }
        let token = &text[start..i];
        if token.eq_ignore_ascii_case(ATOMIC_MARKER) {
            markers.atomic = true;
        } else if token.eq_ignore_ascii_case(OPTIONAL_MARKER) {
            markers.optional = true;
        } else {
            kept.push((separator, token));
        }
        separator = Some(c);
        start = i + c.len_utf8();
    }

    if markers == Markers::default() {
        return (text.to_string(), markers);
    }

    let mut out = String::with_capacity(text.len());
    for (sep, token) in kept.into_iter().filter(|(_, t)| !t.is_empty()) {
        if let Some(sep) = sep.filter(|_| !out.is_empty()) {
            out.push(sep);
        }
        out.push_str(token);
    }
    (out, markers)
}

/// A display name broken into its BOM-relevant parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub label: String,
    /// Material given inline with a tag.
    pub material: Option<String>,
    pub markers: Markers,
}

/// Parse a display name: drop the duplicate suffix, split off an inline
/// material, then remove marker tokens from label and material.
pub fn parse_name(name: &str) -> ParsedName {
    let base = strip_numeric_suffix(name);
    let (label, material) = match split_material_tag(base) {
        Some((label, material)) => (label, Some(material)),
        None => (base, None),
    };

    let (label, label_markers) = strip_markers(label.trim());
    let (material, material_markers) = match material {
        Some(m) => {
            let (m, markers) = strip_markers(m.trim());
            (Some(m.trim().to_string()), markers)
        }
        None => (None, Markers::default()),
    };

    ParsedName {
        label: label.trim().to_string(),
        material: material.filter(|m| !m.is_empty()),
        markers: label_markers.or(material_markers),
    }
}
