//! The release record: one upstream release of a software component.
//!
//! A release carries a version, a timestamp, an urgency, a localized
//! description, download locations, checksums and sizes. Locale-sensitive
//! reads and writes go through the active locale, which is the explicit
//! override if one is set, otherwise the ambient locale of the attached
//! document [`Context`], otherwise `"C"`.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use crate::{
    checksum::{Checksum, ChecksumKind},
    context::Context,
    error::Error,
    locale::{DEFAULT_LOCALE, resolve_active_locale},
    types::{ReleaseKind, SizeKind, Sizes, UrgencyKind},
    version::compare_versions,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Release {
    kind: ReleaseKind,
    version: Option<String>,
    /// Seconds since the epoch, 0 when unset.
    timestamp: u64,
    urgency: UrgencyKind,
    description: HashMap<String, String>,
    locations: Vec<String>,
    checksums: Vec<Checksum>,
    sizes: Sizes,

    context: Option<Arc<Context>>,
    active_locale_override: Option<String>,
}

impl Release {
    /// Creates an empty stable release.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ReleaseKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: ReleaseKind) {
        self.kind = kind;
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn set_version(&mut self, version: Option<String>) {
        self.version = version;
    }

    /// Orders two releases by version; a release without version sorts first.
    pub fn vercmp(&self, other: &Release) -> Ordering {
        compare_versions(self.version(), other.version())
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    pub fn urgency(&self) -> UrgencyKind {
        self.urgency
    }

    pub fn set_urgency(&mut self, urgency: UrgencyKind) {
        self.urgency = urgency;
    }

    /// Byte count for `kind`, 0 when unset.
    ///
    /// Fails with [`Error::InvalidArgument`] for [`SizeKind::Unknown`].
    pub fn size(&self, kind: SizeKind) -> Result<u64, Error> {
        self.sizes.get(kind)
    }

    /// Sets the byte count for `kind`; 0 clears it.
    ///
    /// Fails with [`Error::InvalidArgument`] for [`SizeKind::Unknown`].
    pub fn set_size(&mut self, kind: SizeKind, size: u64) -> Result<(), Error> {
        self.sizes.set(kind, size)
    }

    pub fn sizes(&self) -> &Sizes {
        &self.sizes
    }

    /// Description markup for the active locale, falling back to `"C"`.
    pub fn description(&self) -> Option<&str> {
        self.description
            .get(self.active_locale())
            .or_else(|| self.description.get(DEFAULT_LOCALE))
            .map(String::as_str)
    }

    /// Stores description markup for `locale`, or for the active locale when `None`.
    pub fn set_description(&mut self, markup: impl Into<String>, locale: Option<&str>) {
        let locale = locale.unwrap_or_else(|| self.active_locale()).to_string();
        self.description.insert(locale, markup.into());
    }

    /// All description translations, keyed by locale.
    pub fn descriptions(&self) -> &HashMap<String, String> {
        &self.description
    }

    pub fn active_locale(&self) -> &str {
        resolve_active_locale(self.active_locale_override.as_deref(), self.context.as_deref())
    }

    /// Pins the locale of this record regardless of its context; `None` unpins it.
    pub fn set_active_locale(&mut self, locale: Option<&str>) {
        self.active_locale_override = locale.map(str::to_string);
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    /// Appends a download location. Duplicates are kept.
    pub fn add_location(&mut self, location: impl Into<String>) {
        self.locations.push(location.into());
    }

    pub fn checksums(&self) -> &[Checksum] {
        &self.checksums
    }

    /// First checksum of the given kind; later ones of the same kind are shadowed.
    pub fn checksum(&self, kind: ChecksumKind) -> Option<&Checksum> {
        self.checksums.iter().find(|cs| cs.kind == kind)
    }

    /// Appends a checksum. No deduplication is done.
    pub fn add_checksum(&mut self, checksum: Checksum) {
        self.checksums.push(checksum);
    }

    pub fn context(&self) -> Option<&Arc<Context>> {
        self.context.as_ref()
    }

    /// Attaches a document context and drops any locale override, so the
    /// context locale takes effect immediately.
    pub fn set_context(&mut self, context: Arc<Context>) {
        self.context = Some(context);
        self.active_locale_override = None;
    }
}
