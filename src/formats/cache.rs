//! Release ⇄ binary cache value.
//!
//! A cache is built for one locale: only the description text resolved for
//! the record's active locale is kept. Restoring it installs that text under
//! the locale the caller asks for; other translations are not recoverable.
//!
//! On disk the value is a MessagePack map with named keys. Optional keys
//! (`locations`, `checksums`, `sizes`) are left out when empty; `version`
//! and `description` are always present and may be nil.

use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use crate::{
    checksum::Checksum,
    error::Error,
    release::Release,
    traits::Parser,
    types::{ReleaseKind, SizeKind, UrgencyKind},
};

/// Flat, single-locale snapshot of a [`Release`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReleaseCache {
    pub kind: u32,
    #[serde(default)]
    pub version: Option<String>,
    pub timestamp: u64,
    pub urgency: u32,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,

    /// Algorithm id → digest, in insertion order; repeated ids are kept.
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "dict")]
    pub checksums: Vec<(u32, String)>,

    /// Size kind id → byte count, only for sizes that are set.
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "dict")]
    pub sizes: Vec<(u32, u64)>,
}

impl Parser for ReleaseCache {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Ok(rmp_serde::from_read(reader)?)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        rmp_serde::encode::write_named(&mut writer, self)?;
        Ok(())
    }
}

impl Parser for Vec<ReleaseCache> {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Ok(rmp_serde::from_read(reader)?)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        rmp_serde::encode::write_named(&mut writer, self)?;
        Ok(())
    }
}

impl Release {
    /// Snapshots this release for the cache, keeping only the description
    /// for the current active locale (or its `"C"` fallback).
    pub fn to_cache(&self) -> ReleaseCache {
        ReleaseCache {
            kind: self.kind().as_u32(),
            version: self.version().map(str::to_string),
            timestamp: self.timestamp(),
            urgency: self.urgency().as_u32(),
            description: self.description().map(str::to_string),
            locations: self.locations().to_vec(),
            checksums: self.checksums().iter().map(Checksum::to_cache_entry).collect(),
            sizes: self
                .sizes()
                .iter()
                .map(|(kind, size)| (kind.as_u32(), size))
                .collect(),
        }
    }

    /// Restores a release from a cache value built for `locale`.
    ///
    /// `locale` becomes the record's locale override and the key of the
    /// restored description. Unknown checksum or size kinds are logged and
    /// dropped.
    pub fn from_cache(cache: &ReleaseCache, locale: &str) -> Release {
        let mut release = Release::new();
        release.set_active_locale(Some(locale));

        release.set_kind(ReleaseKind::from_u32(cache.kind));
        release.set_version(cache.version.clone());
        release.set_timestamp(cache.timestamp);
        release.set_urgency(UrgencyKind::from_u32(cache.urgency));
        if let Some(description) = &cache.description {
            release.set_description(description.as_str(), Some(locale));
        }

        for location in &cache.locations {
            release.add_location(location.as_str());
        }

        for (kind, size) in &cache.sizes {
            if let Err(e) = release.set_size(SizeKind::from_u32(*kind), *size) {
                tracing::debug!("Dropping cached size of kind {}: {}", kind, e);
            }
        }

        for (kind, value) in &cache.checksums {
            match Checksum::from_cache_entry(*kind, value) {
                Some(cs) => release.add_checksum(cs),
                None => tracing::debug!("Dropping cached checksum of unknown kind {}", kind),
            }
        }

        release
    }
}

/// Serde adapter that writes `(key, value)` pairs as a map without
/// collapsing repeated keys.
mod dict {
    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{MapAccess, Visitor},
        ser::SerializeMap,
    };
    use std::{fmt, marker::PhantomData};

    pub fn serialize<K, V, S>(entries: &[(K, V)], serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<Vec<(K, V)>, D::Error>
    where
        K: Deserialize<'de>,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for EntriesVisitor<K, V>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
        {
            type Value = Vec<(K, V)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a dictionary")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry()? {
                    entries.push(entry);
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
