//! Schema versions, structural diffs and automatic row mapping.
//!
//! A [`Registry`](schema::Registry) holds the known
//! [`SchemaVersion`](schema::SchemaVersion)s. A
//! [`MappingGenerator`](mapping::MappingGenerator) compares one table across
//! two versions and derives a [`TableMapping`](mapping::TableMapping); a
//! [`Mapper`](mapping::Mapper) applies registered mappings to rows captured
//! under the older version.

mod error;
pub use error::{Error, IntoError};

pub mod mapping;

mod row;
pub use row::{Row, Slot};

pub mod schema;

pub mod typemap;

mod value;
pub use value::Value;

/// A Result type alias that uses verschema's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
