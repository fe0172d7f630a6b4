//! Checksums attached to a release's download artifact.

use std::fmt::{Display, Formatter};

use crate::dom::Element;

/// Digest algorithm of a [`Checksum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChecksumKind {
    #[default]
    None,
    Sha1,
    Sha256,
    Sha512,
    Blake2b,
    Blake3,
}

impl ChecksumKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumKind::Sha1 => "sha1",
            ChecksumKind::Sha256 => "sha256",
            ChecksumKind::Sha512 => "sha512",
            ChecksumKind::Blake2b => "blake2b",
            ChecksumKind::Blake3 => "blake3",
            ChecksumKind::None => "none",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ChecksumKind::None => 0,
            ChecksumKind::Sha1 => 1,
            ChecksumKind::Sha256 => 2,
            ChecksumKind::Sha512 => 3,
            ChecksumKind::Blake2b => 4,
            ChecksumKind::Blake3 => 5,
        }
    }

    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => ChecksumKind::Sha1,
            2 => ChecksumKind::Sha256,
            3 => ChecksumKind::Sha512,
            4 => ChecksumKind::Blake2b,
            5 => ChecksumKind::Blake3,
            _ => ChecksumKind::None,
        }
    }
}

impl From<&str> for ChecksumKind {
    fn from(s: &str) -> Self {
        match s {
            "sha1" => ChecksumKind::Sha1,
            "sha256" => ChecksumKind::Sha256,
            "sha512" => ChecksumKind::Sha512,
            "blake2b" => ChecksumKind::Blake2b,
            "blake3" => ChecksumKind::Blake3,
            _ => ChecksumKind::None,
        }
    }
}

impl Display for ChecksumKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A digest value tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    pub kind: ChecksumKind,
    pub value: String,
}

impl Checksum {
    pub fn new(kind: ChecksumKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Reads `<checksum type="sha256">…</checksum>`.
    ///
    /// Returns `None` for an unknown algorithm or an empty digest.
    pub fn from_xml(node: &Element) -> Option<Self> {
        let kind = ChecksumKind::from(node.attr("type")?);
        if kind == ChecksumKind::None {
            return None;
        }
        let value = node.text();
        if value.is_empty() {
            return None;
        }
        Some(Self { kind, value })
    }

    /// Appends a `<checksum>` child to `parent`; checksums of kind `None` are skipped.
    pub fn to_xml(&self, parent: &mut Element) {
        if self.kind == ChecksumKind::None {
            return;
        }
        parent
            .add_text_child("checksum", self.value.as_str())
            .set_attr("type", self.kind.as_str());
    }

    /// Cache form: algorithm id and digest.
    pub fn to_cache_entry(&self) -> (u32, String) {
        (self.kind.as_u32(), self.value.clone())
    }

    pub fn from_cache_entry(kind: u32, value: &str) -> Option<Self> {
        match ChecksumKind::from_u32(kind) {
            ChecksumKind::None => None,
            kind => Some(Self::new(kind, value)),
        }
    }
}
