//! Closed vocabularies used by a release, and the per-kind size table.
//!
//! Every enum has an `Unknown` catch-all. Textual or numeric values that are
//! not recognized map to it instead of failing.

use std::fmt::{Display, Formatter};

use crate::error::Error;

/// Whether a release is meant for end users or is a prerelease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReleaseKind {
    Unknown,
    #[default]
    Stable,
    Development,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Stable => "stable",
            ReleaseKind::Development => "development",
            ReleaseKind::Unknown => "unknown",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ReleaseKind::Unknown => 0,
            ReleaseKind::Stable => 1,
            ReleaseKind::Development => 2,
        }
    }

    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => ReleaseKind::Stable,
            2 => ReleaseKind::Development,
            _ => ReleaseKind::Unknown,
        }
    }
}

impl From<&str> for ReleaseKind {
    fn from(s: &str) -> Self {
        match s {
            "stable" => ReleaseKind::Stable,
            "development" => ReleaseKind::Development,
            _ => ReleaseKind::Unknown,
        }
    }
}

impl Display for ReleaseKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How important it is to update to a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum UrgencyKind {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyKind::Low => "low",
            UrgencyKind::Medium => "medium",
            UrgencyKind::High => "high",
            UrgencyKind::Critical => "critical",
            UrgencyKind::Unknown => "unknown",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            UrgencyKind::Unknown => 0,
            UrgencyKind::Low => 1,
            UrgencyKind::Medium => 2,
            UrgencyKind::High => 3,
            UrgencyKind::Critical => 4,
        }
    }

    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => UrgencyKind::Low,
            2 => UrgencyKind::Medium,
            3 => UrgencyKind::High,
            4 => UrgencyKind::Critical,
            _ => UrgencyKind::Unknown,
        }
    }
}

impl From<&str> for UrgencyKind {
    fn from(s: &str) -> Self {
        match s {
            "low" => UrgencyKind::Low,
            "medium" => UrgencyKind::Medium,
            "high" => UrgencyKind::High,
            "critical" => UrgencyKind::Critical,
            _ => UrgencyKind::Unknown,
        }
    }
}

impl Display for UrgencyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a byte count measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeKind {
    /// Reserved; never has a stored value.
    #[default]
    Unknown,
    Download,
    Installed,
}

impl SizeKind {
    /// The kinds that own a slot in [`Sizes`], in serialization order.
    pub const STORED: [SizeKind; 2] = [SizeKind::Download, SizeKind::Installed];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeKind::Download => "download",
            SizeKind::Installed => "installed",
            SizeKind::Unknown => "unknown",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            SizeKind::Unknown => 0,
            SizeKind::Download => 1,
            SizeKind::Installed => 2,
        }
    }

    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => SizeKind::Download,
            2 => SizeKind::Installed,
            _ => SizeKind::Unknown,
        }
    }

    fn slot(&self) -> Option<usize> {
        match self {
            SizeKind::Unknown => None,
            SizeKind::Download => Some(0),
            SizeKind::Installed => Some(1),
        }
    }
}

impl From<&str> for SizeKind {
    fn from(s: &str) -> Self {
        match s {
            "download" => SizeKind::Download,
            "installed" => SizeKind::Installed,
            _ => SizeKind::Unknown,
        }
    }
}

impl Display for SizeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte counts per [`SizeKind`]; `0` means unset.
///
/// Only the stored kinds have a slot, so `SizeKind::Unknown` can never hold a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sizes {
    slots: [u64; 2],
}

impl Sizes {
    /// Returns the size for `kind`, or [`Error::InvalidArgument`] for `Unknown`.
    pub fn get(&self, kind: SizeKind) -> Result<u64, Error> {
        let slot = Self::slot_for(kind)?;
        Ok(self.slots[slot])
    }

    /// Stores `size` for `kind`. `Unknown` is rejected with [`Error::InvalidArgument`].
    pub fn set(&mut self, kind: SizeKind, size: u64) -> Result<(), Error> {
        let slot = Self::slot_for(kind)?;
        self.slots[slot] = size;
        Ok(())
    }

    /// Non-zero entries in serialization order.
    pub fn iter(&self) -> impl Iterator<Item = (SizeKind, u64)> + '_ {
        SizeKind::STORED
            .iter()
            .zip(self.slots.iter())
            .filter(|(_, size)| **size > 0)
            .map(|(kind, size)| (*kind, *size))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|size| *size == 0)
    }

    fn slot_for(kind: SizeKind) -> Result<usize, Error> {
        kind.slot().ok_or_else(|| {
            Error::invalid_argument(format!("size kind `{}` has no storage slot", kind))
        })
    }
}
