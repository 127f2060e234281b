use super::{document, Table};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::{fmt, str::FromStr};

/// A named, immutable snapshot of table definitions.
///
/// The version label is opaque: it is compared for equality only and never
/// ordered semantically.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaVersion {
    /// Version label
    pub version: String,

    /// Free-form description
    pub description: String,

    /// Tables keyed by name, in document order
    pub tables: IndexMap<String, Table>,
}

impl SchemaVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            description: String::new(),
            tables: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds a table, replacing any table with the same name.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Looks up a table, failing with a table-not-found error.
    pub fn require_table(&self, name: &str) -> Result<&Table> {
        self.table(name)
            .ok_or_else(|| Error::table_not_found(name, &self.version))
    }

    /// Renders the version back into its JSON document form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&document::SchemaDocument::from(
            self,
        ))?)
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        document::parse(s, None)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json().map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
