use super::Field;

use indexmap::IndexMap;

/// A table in one schema version
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the table
    pub name: String,

    /// The table's fields, in declaration order
    pub fields: Vec<Field>,

    /// Names of the fields forming the primary key
    pub primary_key: Vec<String>,

    /// Local field name to a `table.field` reference.
    ///
    /// References are advisory and never resolved against the registry.
    pub foreign_keys: IndexMap<String, String>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: vec![],
            primary_key: vec![],
            foreign_keys: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_primary_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_foreign_key(mut self, field: impl Into<String>, reference: impl Into<String>) -> Self {
        self.foreign_keys.insert(field.into(), reference.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        self.primary_key.iter().any(|pk| pk == name)
    }
}
