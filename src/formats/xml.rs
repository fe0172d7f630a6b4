//! Release ⇄ AppStream XML, in metainfo and collection style.
//!
//! ```xml
//! <release type="stable" version="1.2" date="2020-01-01T00:00:00Z" urgency="high">
//!   <location>https://example.org/app-1.2.tar.xz</location>
//!   <checksum type="sha256">…</checksum>
//!   <size type="download">123456</size>
//!   <description>
//!     <p>Bugfix release.</p>
//!     <p xml:lang="de">Fehlerbehebungen.</p>
//!   </description>
//! </release>
//! ```
//!
//! Collection data writes an integer `timestamp` instead of `date`, and one
//! `<description xml:lang="…">` per translation.

use std::sync::Arc;

use crate::{
    checksum::Checksum,
    context::{Context, FormatStyle},
    datetime::{iso8601_to_timestamp, parse_leading_u64, timestamp_to_iso8601},
    description::{DescriptionVisitor, node_locale, parse_metainfo_description, write_description_nodes},
    dom::Element,
    error::Error,
    release::Release,
    types::{ReleaseKind, SizeKind, UrgencyKind},
};

impl DescriptionVisitor for Release {
    fn visit(&mut self, locale: &str, markup: &str) {
        self.set_description(markup, Some(locale));
    }
}

impl Release {
    /// Loads this release from a `<release>` element.
    ///
    /// Attaches `ctx` first. A `timestamp` attribute overrides `date`.
    /// Malformed children and unparsable dates are logged and skipped; only an
    /// element that is not a `<release>` fails.
    pub fn load_xml(&mut self, ctx: &Arc<Context>, node: &Element) -> Result<(), Error> {
        if node.name() != "release" {
            return Err(Error::invalid_node(format!(
                "expected <release>, found <{}>",
                node.name()
            )));
        }
        self.set_context(Arc::clone(ctx));

        if let Some(kind) = node.attr("type") {
            self.set_kind(ReleaseKind::from(kind));
        }
        self.set_version(node.attr("version").map(str::to_string));

        if let Some(date) = node.attr("date") {
            match iso8601_to_timestamp(date) {
                Some(timestamp) => self.set_timestamp(timestamp),
                None => tracing::debug!(
                    "Invalid ISO-8601 date in releases at {} offset {}",
                    ctx.source_name(),
                    node.position()
                ),
            }
        }
        if let Some(timestamp) = node.attr("timestamp") {
            self.set_timestamp(parse_leading_u64(timestamp));
        }
        if let Some(urgency) = node.attr("urgency") {
            self.set_urgency(UrgencyKind::from(urgency));
        }

        for child in node.elements() {
            match child.name() {
                "location" => self.add_location(child.text()),
                "checksum" => {
                    if let Some(cs) = Checksum::from_xml(child) {
                        self.add_checksum(cs);
                    }
                }
                "size" => self.load_xml_size(child)?,
                "description" => self.load_xml_description(ctx, child),
                _ => {}
            }
        }

        Ok(())
    }

    fn load_xml_size(&mut self, node: &Element) -> Result<(), Error> {
        let kind = SizeKind::from(node.attr("type").unwrap_or_default());
        if kind == SizeKind::Unknown {
            return Ok(());
        }
        // 0 is indistinguishable from "not set"
        let size = parse_leading_u64(&node.text());
        if size > 0 {
            self.set_size(kind, size)?;
        }
        Ok(())
    }

    fn load_xml_description(&mut self, ctx: &Context, node: &Element) {
        let result = match ctx.style() {
            FormatStyle::Collection => node.inner_markup().map(|content| {
                if let Some(lang) = node_locale(ctx, node) {
                    self.set_description(content, Some(&lang));
                }
            }),
            FormatStyle::Metainfo => parse_metainfo_description(ctx, node, self),
        };
        if let Err(e) = result {
            tracing::debug!(
                "Ignoring unreadable release description in {}: {}",
                ctx.source_name(),
                e
            );
        }
    }

    /// Appends a `<release>` element describing this release to `parent`.
    ///
    /// The `version` attribute is left out when the release has no version.
    pub fn to_xml(&self, ctx: &Context, parent: &mut Element) {
        let mut node = Element::new("release");
        node.set_attr("type", self.kind().as_str());
        if let Some(version) = self.version() {
            node.set_attr("version", version);
        }

        if self.timestamp() > 0 {
            match ctx.style() {
                FormatStyle::Collection => {
                    node.set_attr("timestamp", self.timestamp().to_string());
                }
                FormatStyle::Metainfo => match timestamp_to_iso8601(self.timestamp()) {
                    Some(date) => node.set_attr("date", date),
                    None => tracing::debug!(
                        "Release timestamp {} is out of range for a date",
                        self.timestamp()
                    ),
                },
            }
        }

        if self.urgency() != UrgencyKind::Unknown {
            node.set_attr("urgency", self.urgency().as_str());
        }

        for location in self.locations() {
            node.add_text_child("location", location.as_str());
        }
        for cs in self.checksums() {
            cs.to_xml(&mut node);
        }
        for (kind, size) in self.sizes().iter() {
            node.add_text_child("size", size.to_string())
                .set_attr("type", kind.as_str());
        }

        write_description_nodes(ctx, &mut node, self.descriptions());

        parent.add_child(node);
    }
}

/// Loads every `<release>` child of a `<releases>` element.
///
/// Children that cannot be loaded are logged and skipped.
pub fn read_releases(ctx: &Arc<Context>, releases: &Element) -> Vec<Release> {
    releases
        .elements()
        .filter(|el| el.name() == "release")
        .filter_map(|el| {
            let mut release = Release::new();
            match release.load_xml(ctx, el) {
                Ok(()) => Some(release),
                Err(e) => {
                    tracing::debug!("Skipping release in {}: {}", ctx.source_name(), e);
                    None
                }
            }
        })
        .collect()
}

/// Builds a `<releases>` element holding `releases` in order.
pub fn write_releases(ctx: &Context, releases: &[Release]) -> Element {
    let mut root = Element::new("releases");
    for release in releases {
        release.to_xml(ctx, &mut root);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        checksum::ChecksumKind,
        traits::Parser,
    };
    use indoc::indoc;

    fn metainfo() -> Arc<Context> {
        Arc::new(Context::new(FormatStyle::Metainfo).with_locale("ALL"))
    }

    fn collection() -> Arc<Context> {
        Arc::new(Context::new(FormatStyle::Collection).with_locale("ALL"))
    }

    fn load(ctx: &Arc<Context>, xml: &str) -> Release {
        let node = Element::from_bytes(xml.as_bytes()).unwrap();
        let mut release = Release::new();
        release.load_xml(ctx, &node).unwrap();
        release
    }

    #[test]
    fn test_load_metainfo_release() {
        let xml = indoc! {r#"
            <release type="development" version="1.2~rc1" date="2020-01-01" urgency="high">
              <location>https://example.org/app-1.2.tar.xz</location>
              <location>https://mirror.example.org/app-1.2.tar.xz</location>
              <checksum type="sha256">0123abcd</checksum>
              <size type="download">12345</size>
              <size type="installed">67890</size>
              <description>
                <p>Bugfix release.</p>
                <p xml:lang="de">Fehlerbehebungen.</p>
              </description>
            </release>
        "#};
        let release = load(&metainfo(), xml);

        assert_eq!(release.kind(), ReleaseKind::Development);
        assert_eq!(release.version(), Some("1.2~rc1"));
        assert_eq!(release.timestamp(), 1577836800);
        assert_eq!(release.urgency(), UrgencyKind::High);
        assert_eq!(release.locations().len(), 2);
        assert_eq!(
            release.checksum(ChecksumKind::Sha256).map(|cs| cs.value.as_str()),
            Some("0123abcd")
        );
        assert_eq!(release.size(SizeKind::Download).unwrap(), 12345);
        assert_eq!(release.size(SizeKind::Installed).unwrap(), 67890);
        assert_eq!(
            release.descriptions().get("C").map(String::as_str),
            Some("<p>Bugfix release.</p>\n")
        );
        assert_eq!(
            release.descriptions().get("de").map(String::as_str),
            Some("<p>Fehlerbehebungen.</p>\n")
        );
    }

    #[test]
    fn test_timestamp_overrides_date() {
        let xml = r#"<release version="1.0" date="2020-01-01T00:00:00Z" timestamp="1600000000"/>"#;
        let release = load(&metainfo(), xml);
        assert_eq!(release.timestamp(), 1600000000);
    }

    #[test]
    fn test_invalid_date_is_ignored() {
        let xml = r#"<release version="1.0" date="not a date"/>"#;
        let node = Element::from_bytes(xml.as_bytes()).unwrap();
        let mut release = Release::new();
        release.set_timestamp(42);
        release.load_xml(&metainfo(), &node).unwrap();
        assert_eq!(release.timestamp(), 42);
        assert_eq!(release.version(), Some("1.0"));
    }

    #[test]
    fn test_size_edge_cases() {
        let xml = indoc! {r#"
            <release version="1.0">
              <size type="download">0</size>
              <size type="compressed">100</size>
              <size>200</size>
              <size type="installed">junk</size>
            </release>
        "#};
        let release = load(&metainfo(), xml);
        assert_eq!(release.size(SizeKind::Download).unwrap(), 0);
        assert_eq!(release.size(SizeKind::Installed).unwrap(), 0);
        assert!(release.sizes().is_empty());
    }

    #[test]
    fn test_unknown_values_map_to_unknown() {
        let xml = r#"<release type="nightly" urgency="whenever" version="3"/>"#;
        let release = load(&metainfo(), xml);
        assert_eq!(release.kind(), ReleaseKind::Unknown);
        assert_eq!(release.urgency(), UrgencyKind::Unknown);
    }

    #[test]
    fn test_load_rejects_other_elements() {
        let node = Element::from_bytes(b"<component/>").unwrap();
        let mut release = Release::new();
        let result = release.load_xml(&metainfo(), &node);
        assert!(matches!(result, Err(Error::InvalidNode(_))));
    }

    #[test]
    fn test_load_collection_description() {
        let xml = indoc! {r#"
            <release version="1.0" timestamp="1460419200">
              <description><p>Hello <em>there</em></p></description>
              <description xml:lang="fr"><p>Salut</p></description>
            </release>
        "#};
        let release = load(&collection(), xml);
        assert_eq!(release.timestamp(), 1460419200);
        assert_eq!(
            release.descriptions().get("C").map(String::as_str),
            Some("<p>Hello <em>there</em></p>")
        );
        assert_eq!(
            release.descriptions().get("fr").map(String::as_str),
            Some("<p>Salut</p>")
        );
    }

    #[test]
    fn test_description_markup_is_kept_verbatim() {
        let xml = indoc! {r#"
            <release version="1.0">
              <description><p>Use <code>foo</code> <em>now</em>, it's "fast"</p></description>
            </release>
        "#};
        let markup = r#"<p>Use <code>foo</code> <em>now</em>, it's "fast"</p>"#;
        let ctx = collection();
        let release = load(&ctx, xml);
        assert_eq!(release.descriptions().get("C").map(String::as_str), Some(markup));

        let bytes = write_releases(&ctx, std::slice::from_ref(&release))
            .to_bytes()
            .unwrap();
        let loaded = read_releases(&ctx, &Element::from_bytes(&bytes).unwrap());
        assert_eq!(loaded[0].descriptions(), release.descriptions());

        let metainfo_xml = r#"<release><description><p>Use <code>foo</code> <em>now</em></p></description></release>"#;
        let release = load(&metainfo(), metainfo_xml);
        assert_eq!(
            release.description(),
            Some("<p>Use <code>foo</code> <em>now</em></p>\n")
        );
    }

    #[test]
    fn test_load_collection_filters_locales() {
        let ctx = Arc::new(Context::new(FormatStyle::Collection).with_locale("de_DE"));
        let xml = indoc! {r#"
            <release version="1.0">
              <description><p>Hello</p></description>
              <description xml:lang="de"><p>Hallo</p></description>
              <description xml:lang="fr"><p>Salut</p></description>
            </release>
        "#};
        let release = load(&ctx, xml);
        assert_eq!(release.descriptions().len(), 2);
        assert_eq!(release.active_locale(), "de_DE");
        // no de_DE entry, no fallback to "de", so "C" is used
        assert_eq!(release.description(), Some("<p>Hello</p>"));
    }

    #[test]
    fn test_write_metainfo() {
        let ctx = metainfo();
        let mut release = Release::new();
        release.set_version(Some("1.0".to_string()));
        release.set_timestamp(1600000000);
        release.set_urgency(UrgencyKind::Low);
        release.add_location("https://example.org/a.tar.xz");
        release.set_size(SizeKind::Installed, 4096).unwrap();
        release.set_description("<p>Hi</p>", Some("C"));

        let mut parent = Element::new("releases");
        release.to_xml(&ctx, &mut parent);
        let node = parent.child("release").unwrap();

        assert_eq!(node.attr("type"), Some("stable"));
        assert_eq!(node.attr("version"), Some("1.0"));
        assert_eq!(node.attr("date"), Some("2020-09-13T12:26:40Z"));
        assert_eq!(node.attr("timestamp"), None);
        assert_eq!(node.attr("urgency"), Some("low"));
        let size = node.child("size").unwrap();
        assert_eq!(size.attr("type"), Some("installed"));
        assert_eq!(size.text(), "4096");
        assert_eq!(node.elements().filter(|e| e.name() == "description").count(), 1);
    }

    #[test]
    fn test_write_collection_omits_unset_fields() {
        let ctx = collection();
        let release = Release::new();
        let mut parent = Element::new("releases");
        release.to_xml(&ctx, &mut parent);
        let node = parent.child("release").unwrap();

        assert_eq!(node.attr("type"), Some("stable"));
        assert_eq!(node.attr("version"), None);
        assert_eq!(node.attr("timestamp"), None);
        assert_eq!(node.attr("date"), None);
        assert_eq!(node.attr("urgency"), None);
        assert_eq!(node.elements().count(), 0);
    }

    #[test]
    fn test_collection_round_trip() {
        let ctx = collection();
        let mut release = Release::new();
        release.set_kind(ReleaseKind::Development);
        release.set_version(Some("2.0".to_string()));
        release.set_timestamp(1600000000);
        release.set_urgency(UrgencyKind::Critical);
        release.add_location("https://example.org/b.tar.xz");
        release.add_checksum(Checksum::new(ChecksumKind::Sha1, "abc"));
        release.add_checksum(Checksum::new(ChecksumKind::Sha1, "def"));
        release.set_size(SizeKind::Download, 99).unwrap();
        release.set_description("<p>Security fixes</p>", Some("C"));

        let root = write_releases(&ctx, std::slice::from_ref(&release));
        let bytes = root.to_bytes().unwrap();
        let reparsed = Element::from_bytes(&bytes).unwrap();
        let loaded = read_releases(&ctx, &reparsed);

        assert_eq!(loaded.len(), 1);
        let loaded = &loaded[0];
        assert_eq!(loaded.kind(), release.kind());
        assert_eq!(loaded.version(), release.version());
        assert_eq!(loaded.timestamp(), release.timestamp());
        assert_eq!(loaded.urgency(), release.urgency());
        assert_eq!(loaded.locations(), release.locations());
        assert_eq!(loaded.checksums(), release.checksums());
        assert_eq!(loaded.sizes(), release.sizes());
        assert_eq!(loaded.descriptions(), release.descriptions());
    }

    #[test]
    fn test_read_releases_skips_foreign_children() {
        let xml = indoc! {r#"
            <releases>
              <release version="1.0"/>
              <artifact/>
              <release version="0.9"/>
            </releases>
        "#};
        let root = Element::from_bytes(xml.as_bytes()).unwrap();
        let releases = read_releases(&metainfo(), &root);
        let versions: Vec<_> = releases.iter().filter_map(Release::version).collect();
        assert_eq!(versions, vec!["1.0", "0.9"]);
    }
}
