//! All error types for the appstream-release crate.
//!
//! Only structural failures and caller mistakes are reported through [`Error`].
//! Tolerable malformations inside a record (bad dates, unknown size types,
//! unrecognized keys) are logged and skipped instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cache encode error: {0}")]
    CacheEncode(#[from] rmp_serde::encode::Error),

    #[error("cache decode error: {0}")]
    CacheDecode(#[from] rmp_serde::decode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The supplied node or value cannot hold a release at all.
    #[error("invalid node: {0}")]
    InvalidNode(String),

    /// A caller broke an API contract, e.g. by addressing the reserved size slot.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid data: {0}")]
    DataMismatch(String),
}

impl Error {
    /// Creates a new structural-failure error.
    pub fn invalid_node(message: impl Into<String>) -> Self {
        Error::InvalidNode(message.into())
    }

    /// Creates a new caller-contract error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }
}
