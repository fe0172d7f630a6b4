//! Codecs for the release record.
//!
//! Each submodule adds `load_*`/`to_*` methods to [`Release`](crate::Release)
//! plus helpers for whole release lists.

pub mod cache;
pub mod xml;
pub mod yaml;

pub use cache::ReleaseCache;
