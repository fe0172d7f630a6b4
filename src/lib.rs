#![forbid(unsafe_code)]
//! AppStream release metadata for Rust.
//!
//! A [`Release`] describes one upstream release of a software component:
//! version, type, timestamp, urgency, a localized description, download
//! locations, checksums and sizes. It can be read from and written to
//! AppStream XML (metainfo and collection style), catalog YAML, and a
//! compact single-locale binary cache.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use appstream_release::{Context, FormatStyle, Release, dom::Element, traits::Parser};
//!
//! let ctx = Arc::new(Context::new(FormatStyle::Metainfo));
//! let node = Element::from_bytes(
//!     br#"<release version="1.2" date="2020-01-01"><description><p>Fixes.</p></description></release>"#,
//! )?;
//!
//! let mut release = Release::new();
//! release.load_xml(&ctx, &node)?;
//! assert_eq!(release.version(), Some("1.2"));
//! assert_eq!(release.timestamp(), 1577836800);
//! assert_eq!(release.description(), Some("<p>Fixes.</p>\n"));
//! # Ok::<(), appstream_release::Error>(())
//! ```
//!
//! # Formats
//!
//! - **Metainfo XML**: ISO-8601 `date`, translations interleaved per paragraph
//! - **Collection XML**: integer `timestamp`, one `<description>` per language
//! - **Catalog YAML**: DEP-11 style mapping, without checksums or sizes
//! - **Cache**: MessagePack map holding the description for one locale

pub mod checksum;
pub mod context;
pub mod datetime;
pub mod description;
pub mod dom;
pub mod error;
pub mod formats;
pub mod locale;
pub mod release;
pub mod traits;
pub mod types;
pub mod version;

// Re-export most used types for easy consumption
pub use crate::{
    checksum::{Checksum, ChecksumKind},
    context::{Context, FormatStyle},
    error::Error,
    formats::ReleaseCache,
    release::Release,
    types::{ReleaseKind, SizeKind, Sizes, UrgencyKind},
    version::compare_versions,
};
