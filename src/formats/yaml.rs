//! Release ⇄ catalog YAML (DEP-11 style).
//!
//! ```yaml
//! - version: '1.2'
//!   type: stable
//!   unix-timestamp: 1600000000
//!   urgency: high
//!   description:
//!     C: <p>Bugfix release.</p>
//!   locations:
//!   - https://example.org/app-1.2.tar.xz
//! ```
//!
//! The catalog dialect has no checksums or sizes, so those are never written.

use serde::{
    Deserialize, Deserializer,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
use serde_yaml::{Mapping, Number, Value};
use std::{fmt, sync::Arc};

use crate::{
    context::{Context, FormatStyle},
    datetime::{iso8601_to_timestamp, parse_leading_u64, timestamp_to_iso8601},
    description::{localized_yaml_value, yaml_localized_entry},
    error::Error,
    release::Release,
    types::{ReleaseKind, UrgencyKind},
};

/// One catalog release mapping, with its keys in document order.
///
/// Scalars are kept exactly as written, so an unquoted `version: 1.10`
/// stays `"1.10"` instead of becoming the number 1.1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YamlRelease {
    fields: Vec<YamlField>,
}

#[derive(Debug, Clone, PartialEq)]
enum YamlField {
    Timestamp(String),
    Date(String),
    Kind(String),
    Version(String),
    Urgency(String),
    Description(Value),
    Locations(Vec<String>),
    Unknown(String),
}

impl<'de> Deserialize<'de> for YamlRelease {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReleaseVisitor;

        impl<'de> Visitor<'de> for ReleaseVisitor {
            type Value = YamlRelease;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a release mapping")
            }

            fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
                read_fields(access)
            }
        }

        deserializer.deserialize_map(ReleaseVisitor)
    }
}

/// Reads the keys of a release mapping, asking for each value in the shape
/// its key expects so scalars are handed over as text.
fn read_fields<'de, A: MapAccess<'de>>(mut access: A) -> Result<YamlRelease, A::Error> {
    let mut fields = Vec::new();
    while let Some(key) = access.next_key::<String>()? {
        let field = match key.as_str() {
            "unix-timestamp" => access.next_value::<Option<String>>()?.map(YamlField::Timestamp),
            "date" => access.next_value::<Option<String>>()?.map(YamlField::Date),
            "type" => access.next_value::<Option<String>>()?.map(YamlField::Kind),
            "version" => access.next_value::<Option<String>>()?.map(YamlField::Version),
            "urgency" => access.next_value::<Option<String>>()?.map(YamlField::Urgency),
            "description" => Some(YamlField::Description(access.next_value()?)),
            "locations" => access
                .next_value::<Option<Vec<String>>>()?
                .map(YamlField::Locations),
            _ => {
                access.next_value::<IgnoredAny>()?;
                Some(YamlField::Unknown(key))
            }
        };
        fields.extend(field);
    }
    Ok(YamlRelease { fields })
}

/// A sequence item that may or may not be a release mapping.
struct CatalogEntry(Option<YamlRelease>);

impl<'de> Deserialize<'de> for CatalogEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = CatalogEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a release entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
                read_fields(access).map(|release| CatalogEntry(Some(release)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                while access.next_element::<IgnoredAny>()?.is_some() {}
                Ok(CatalogEntry(None))
            }

            fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
                Ok(CatalogEntry(None))
            }

            fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
                Ok(CatalogEntry(None))
            }

            fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
                Ok(CatalogEntry(None))
            }

            fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
                Ok(CatalogEntry(None))
            }

            fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
                Ok(CatalogEntry(None))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(CatalogEntry(None))
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

impl Release {
    /// Loads this release from a catalog mapping.
    ///
    /// Attaches `ctx` first. Keys are applied in document order, so of
    /// `date` and `unix-timestamp` the later one wins. Invalid dates and
    /// unknown keys are logged and skipped. A node that is not a mapping
    /// never gets this far: it fails to deserialize into a [`YamlRelease`].
    pub fn load_yaml(&mut self, ctx: &Arc<Context>, node: &YamlRelease) {
        self.set_context(Arc::clone(ctx));

        for field in &node.fields {
            match field {
                YamlField::Timestamp(value) => self.set_timestamp(parse_leading_u64(value)),
                YamlField::Date(value) => match iso8601_to_timestamp(value) {
                    Some(timestamp) => self.set_timestamp(timestamp),
                    None => tracing::debug!("Invalid ISO-8601 date in {}", ctx.source_name()),
                },
                YamlField::Kind(value) => self.set_kind(ReleaseKind::from(value.as_str())),
                YamlField::Version(value) => self.set_version(Some(value.clone())),
                YamlField::Urgency(value) => self.set_urgency(UrgencyKind::from(value.as_str())),
                YamlField::Description(value) => {
                    for (locale, text) in localized_yaml_value(ctx, value) {
                        self.set_description(text, Some(&locale));
                    }
                }
                YamlField::Locations(locations) => {
                    for location in locations {
                        self.add_location(location.as_str());
                    }
                }
                YamlField::Unknown(key) => tracing::debug!(
                    "Unknown field '{}' in release of {}",
                    key,
                    ctx.source_name()
                ),
            }
        }
    }

    /// Builds the catalog mapping for this release.
    pub fn to_yaml(&self, ctx: &Context) -> Value {
        let mut map = Mapping::new();

        if let Some(version) = self.version() {
            insert(&mut map, "version", Value::String(version.to_string()));
        }
        insert(&mut map, "type", Value::String(self.kind().to_string()));

        if self.timestamp() > 0 {
            match ctx.style() {
                FormatStyle::Collection => insert(
                    &mut map,
                    "unix-timestamp",
                    Value::Number(Number::from(self.timestamp())),
                ),
                FormatStyle::Metainfo => {
                    if let Some(date) = timestamp_to_iso8601(self.timestamp()) {
                        insert(&mut map, "date", Value::String(date));
                    }
                }
            }
        }

        if self.urgency() != UrgencyKind::Unknown {
            insert(&mut map, "urgency", Value::String(self.urgency().to_string()));
        }

        if let Some(description) = yaml_localized_entry(self.descriptions()) {
            insert(&mut map, "description", description);
        }

        if !self.locations().is_empty() {
            let locations = self
                .locations()
                .iter()
                .cloned()
                .map(Value::String)
                .collect();
            insert(&mut map, "locations", Value::Sequence(locations));
        }

        Value::Mapping(map)
    }
}

fn insert(map: &mut Mapping, key: &str, value: Value) {
    map.insert(Value::String(key.to_string()), value);
}

/// Reads a YAML sequence of release mappings.
///
/// Entries that are not mappings are logged and skipped.
pub fn releases_from_str(ctx: &Arc<Context>, s: &str) -> Result<Vec<Release>, Error> {
    let entries: Vec<CatalogEntry> = serde_yaml::from_str(s)?;

    let mut releases = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.0 {
            Some(node) => {
                let mut release = Release::new();
                release.load_yaml(ctx, &node);
                releases.push(release);
            }
            None => tracing::debug!("Skipping non-mapping release in {}", ctx.source_name()),
        }
    }
    Ok(releases)
}

/// Renders releases as a YAML sequence.
pub fn releases_to_string(ctx: &Context, releases: &[Release]) -> Result<String, Error> {
    let doc = Value::Sequence(releases.iter().map(|r| r.to_yaml(ctx)).collect());
    Ok(serde_yaml::to_string(&doc)?)
}
