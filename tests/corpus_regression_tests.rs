use appstream_release::dom::Element;
use appstream_release::formats::{xml, yaml};
use appstream_release::traits::Parser;
use appstream_release::{
    ChecksumKind, Context, FormatStyle, Release, ReleaseKind, SizeKind, UrgencyKind,
};
use indoc::indoc;
use std::sync::Arc;

struct ParseCase {
    name: &'static str,
    style: FormatStyle,
    locale: &'static str,
    input: &'static str,
    expected: Vec<ExpectedRelease>,
}

struct ExpectedRelease {
    version: Option<&'static str>,
    kind: ReleaseKind,
    timestamp: u64,
    urgency: UrgencyKind,
    description: Option<&'static str>,
}

const METAINFO_RELEASES: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <releases>
      <release version="3.38.1" date="2020-10-05" urgency="medium">
        <description>
          <p>This release fixes a crash when opening large folders.</p>
          <p xml:lang="de">Diese Version behebt einen Absturz beim Öffnen großer Ordner.</p>
          <ul>
            <li>Faster thumbnail loading</li>
            <li xml:lang="de">Schnelleres Laden von Vorschaubildern</li>
            <li>Updated translations</li>
          </ul>
        </description>
      </release>
      <release version="3.38.0" date="2020-09-12T08:30:00Z" type="stable"/>
      <release version="3.37.92" date="2020-09-05" type="development">
        <url>https://example.org/news/3.37.92</url>
      </release>
    </releases>
"#};

const COLLECTION_RELEASES: &str = indoc! {r#"
    <releases>
      <release type="stable" version="0.9.2" timestamp="1587945600" urgency="critical">
        <location>https://downloads.example.org/tool-0.9.2.tar.gz</location>
        <checksum type="sha256">3b5d5c3712955042212316173ccf37be800ee98ae1d5b2d0c1ea1bd3ab8f7f0b</checksum>
        <checksum type="md5">ignored</checksum>
        <size type="download">524288</size>
        <size type="installed">2097152</size>
        <description><p>Security update for <code>CVE-2020-0001</code>.</p></description>
        <description xml:lang="fr"><p>Mise à jour de sécurité.</p></description>
        <description xml:lang="x-test"><p>xxSecurity updatexx</p></description>
      </release>
      <release type="stable" version="0.9.1" timestamp="1585267200"/>
    </releases>
"#};

const CATALOG_RELEASES: &str = indoc! {r#"
    - version: 1.4.0
      type: stable
      unix-timestamp: 1609459200
      description:
        C: <p>New year, new features.</p>
        de: <p>Neues Jahr, neue Funktionen.</p>
        fr: <p>Nouvelle année, nouvelles fonctionnalités.</p>
    - version: '1.3'
      date: 2020-06-01
      urgency: low
      description: <p>Plain scalar description.</p>
      artifacts:
        - type: source
"#};

fn parse_cases() -> Vec<ParseCase> {
    vec![
        ParseCase {
            name: "metainfo_all_locales",
            style: FormatStyle::Metainfo,
            locale: "ALL",
            input: METAINFO_RELEASES,
            expected: vec![
                ExpectedRelease {
                    version: Some("3.38.1"),
                    kind: ReleaseKind::Stable,
                    timestamp: 1601856000,
                    urgency: UrgencyKind::Medium,
                    description: Some(
                        "<p>This release fixes a crash when opening large folders.</p>\n<ul>\n  <li>Faster thumbnail loading</li>\n  <li>Updated translations</li>\n</ul>\n",
                    ),
                },
                ExpectedRelease {
                    version: Some("3.38.0"),
                    kind: ReleaseKind::Stable,
                    timestamp: 1599899400,
                    urgency: UrgencyKind::Unknown,
                    description: None,
                },
                ExpectedRelease {
                    version: Some("3.37.92"),
                    kind: ReleaseKind::Development,
                    timestamp: 1599264000,
                    urgency: UrgencyKind::Unknown,
                    description: None,
                },
            ],
        },
        ParseCase {
            name: "metainfo_german",
            style: FormatStyle::Metainfo,
            locale: "de_DE",
            input: METAINFO_RELEASES,
            expected: vec![
                ExpectedRelease {
                    version: Some("3.38.1"),
                    kind: ReleaseKind::Stable,
                    timestamp: 1601856000,
                    urgency: UrgencyKind::Medium,
                    description: Some(
                        "<p>This release fixes a crash when opening large folders.</p>\n<ul>\n  <li>Faster thumbnail loading</li>\n  <li>Updated translations</li>\n</ul>\n",
                    ),
                },
                ExpectedRelease {
                    version: Some("3.38.0"),
                    kind: ReleaseKind::Stable,
                    timestamp: 1599899400,
                    urgency: UrgencyKind::Unknown,
                    description: None,
                },
                ExpectedRelease {
                    version: Some("3.37.92"),
                    kind: ReleaseKind::Development,
                    timestamp: 1599264000,
                    urgency: UrgencyKind::Unknown,
                    description: None,
                },
            ],
        },
        ParseCase {
            name: "collection",
            style: FormatStyle::Collection,
            locale: "ALL",
            input: COLLECTION_RELEASES,
            expected: vec![
                ExpectedRelease {
                    version: Some("0.9.2"),
                    kind: ReleaseKind::Stable,
                    timestamp: 1587945600,
                    urgency: UrgencyKind::Critical,
                    description: Some("<p>Security update for <code>CVE-2020-0001</code>.</p>"),
                },
                ExpectedRelease {
                    version: Some("0.9.1"),
                    kind: ReleaseKind::Stable,
                    timestamp: 1585267200,
                    urgency: UrgencyKind::Unknown,
                    description: None,
                },
            ],
        },
    ]
}

fn load_xml_case(case: &ParseCase) -> Vec<Release> {
    let ctx = Arc::new(
        Context::new(case.style)
            .with_locale(case.locale)
            .with_filename(case.name),
    );
    let root = Element::from_bytes(case.input.as_bytes())
        .unwrap_or_else(|e| panic!("{}: parse failed: {}", case.name, e));
    xml::read_releases(&ctx, &root)
}

#[test]
fn test_corpus_parse_cases() {
    for case in parse_cases() {
        let releases = load_xml_case(&case);
        assert_eq!(releases.len(), case.expected.len(), "{}", case.name);

        for (release, expected) in releases.iter().zip(&case.expected) {
            assert_eq!(release.version(), expected.version, "{}", case.name);
            assert_eq!(release.kind(), expected.kind, "{}", case.name);
            assert_eq!(release.timestamp(), expected.timestamp, "{}", case.name);
            assert_eq!(release.urgency(), expected.urgency, "{}", case.name);
            assert_eq!(
                release.descriptions().get("C").map(String::as_str),
                expected.description,
                "{}",
                case.name
            );
        }
    }
}

#[test]
fn test_metainfo_translations_are_aggregated() {
    let case = &parse_cases()[0];
    let releases = load_xml_case(case);
    let first = &releases[0];

    assert_eq!(first.descriptions().len(), 2);
    assert_eq!(
        first.descriptions().get("de").map(String::as_str),
        Some(
            "<p>Diese Version behebt einen Absturz beim Öffnen großer Ordner.</p>\n<ul>\n  <li>Schnelleres Laden von Vorschaubildern</li>\n</ul>\n"
        )
    );
}

#[test]
fn test_locale_filter_reads_matching_language() {
    let case = &parse_cases()[1];
    let releases = load_xml_case(case);
    let first = &releases[0];

    assert_eq!(first.active_locale(), "de_DE");
    assert!(first.descriptions().contains_key("de"));
    assert_eq!(first.descriptions().len(), 2);
}

#[test]
fn test_collection_artifacts() {
    let case = &parse_cases()[2];
    let releases = load_xml_case(case);
    let first = &releases[0];

    assert_eq!(
        first.locations(),
        ["https://downloads.example.org/tool-0.9.2.tar.gz"]
    );
    assert_eq!(first.checksums().len(), 1);
    assert_eq!(
        first
            .checksum(ChecksumKind::Sha256)
            .map(|cs| cs.value.len()),
        Some(64)
    );
    assert_eq!(first.size(SizeKind::Download).unwrap(), 524288);
    assert_eq!(first.size(SizeKind::Installed).unwrap(), 2097152);
    assert_eq!(first.descriptions().len(), 3);
}

#[test]
fn test_cruft_locales_are_not_written_back() {
    let case = &parse_cases()[2];
    let releases = load_xml_case(case);
    let ctx = Context::new(FormatStyle::Collection).with_locale("ALL");

    let out = xml::write_releases(&ctx, &releases)
        .to_xml_string()
        .expect("serialize");
    assert!(out.contains(r#"<description xml:lang="fr">"#));
    assert!(!out.contains("x-test"));
    assert!(!out.contains("xxSecurity"));

    let catalog = yaml::releases_to_string(&ctx, &releases).expect("render yaml");
    assert!(!catalog.contains("x-test"));
}

#[test]
fn test_catalog_yaml_corpus() {
    let ctx = Arc::new(
        Context::new(FormatStyle::Collection)
            .with_locale("de")
            .with_filename("catalog.yml"),
    );
    let releases = yaml::releases_from_str(&ctx, CATALOG_RELEASES).expect("parse catalog");
    assert_eq!(releases.len(), 2);

    let first = &releases[0];
    assert_eq!(first.version(), Some("1.4.0"));
    assert_eq!(first.timestamp(), 1609459200);
    assert_eq!(first.descriptions().len(), 2);
    assert_eq!(first.description(), Some("<p>Neues Jahr, neue Funktionen.</p>"));

    let second = &releases[1];
    assert_eq!(second.version(), Some("1.3"));
    assert_eq!(second.timestamp(), 1590969600);
    assert_eq!(second.urgency(), UrgencyKind::Low);
    assert_eq!(
        second.descriptions().get("C").map(String::as_str),
        Some("<p>Plain scalar description.</p>")
    );
}

#[test]
fn test_catalog_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("releases.xml");
    let ctx = Arc::new(Context::new(FormatStyle::Metainfo).with_locale("ALL"));

    let root = Element::from_bytes(METAINFO_RELEASES.as_bytes()).expect("parse corpus");
    root.write_to(&path).expect("write file");
    let reread = Element::read_from(&path).expect("read file");

    let expected = xml::read_releases(&ctx, &root);
    let actual = xml::read_releases(&ctx, &reread);
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(&expected) {
        assert_eq!(a.version(), e.version());
        assert_eq!(a.timestamp(), e.timestamp());
        assert_eq!(a.descriptions(), e.descriptions());
    }
}
