use super::{document, SchemaDiff, SchemaVersion};
use crate::{mapping::MappingGenerator, Error, Result};

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

/// Holds every known schema version, indexed by version label.
///
/// Versions are loaded once and never modified afterwards; the registry
/// only answers lookups and diffs.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    versions: BTreeMap<String, SchemaVersion>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` schema document found directly in `dir`.
    ///
    /// Files are read in file name order. Two documents declaring the same
    /// version label are rejected.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let mut paths = fs::read_dir(dir)
            .map_err(|err| Error::from(err).context(crate::err!("reading {}", dir.display())))?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<PathBuf>>>()?;
        paths.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"));
        paths.sort();

        let mut registry = Registry::new();
        let mut origins = HashMap::<String, PathBuf>::new();

        for path in paths {
            let contents = fs::read_to_string(&path).map_err(|err| {
                Error::from(err).context(crate::err!("reading {}", path.display()))
            })?;
            let version = document::parse(&contents, Some(&path))?;

            if let Some(previous) = origins.get(&version.version) {
                return Err(Error::parse(format!(
                    "{}: version {} is already defined in {}",
                    path.display(),
                    version.version,
                    previous.display()
                )));
            }

            tracing::debug!(
                version = %version.version,
                path = %path.display(),
                tables = version.tables.len(),
                "loaded schema version"
            );

            origins.insert(version.version.clone(), path);
            registry.insert(version);
        }

        Ok(registry)
    }

    /// Registers a version, returning the one it replaced, if any.
    pub fn insert(&mut self, version: SchemaVersion) -> Option<SchemaVersion> {
        self.versions.insert(version.version.clone(), version)
    }

    pub fn get(&self, version: &str) -> Option<&SchemaVersion> {
        self.versions.get(version)
    }

    /// Looks up a version, failing with a version-not-found error.
    pub fn require(&self, version: &str) -> Result<&SchemaVersion> {
        self.get(version)
            .ok_or_else(|| Error::version_not_found(version))
    }

    /// All version labels, sorted lexicographically.
    ///
    /// Lexicographic order says nothing about which version is newer.
    pub fn list(&self) -> Vec<&str> {
        self.versions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Computes the structural difference going from `v1` to `v2`.
    pub fn compare(&self, v1: &str, v2: &str) -> Result<SchemaDiff> {
        let from = self.require(v1)?;
        let to = self.require(v2)?;
        Ok(SchemaDiff::from(from, to))
    }

    /// Creates a mapping generator from version `source` to version `target`.
    pub fn generator(&self, source: &str, target: &str) -> Result<MappingGenerator<'_>> {
        Ok(MappingGenerator::new(
            self.require(source)?,
            self.require(target)?,
        ))
    }
}

impl FromIterator<SchemaVersion> for Registry {
    fn from_iter<I: IntoIterator<Item = SchemaVersion>>(iter: I) -> Self {
        let mut registry = Registry::new();
        for version in iter {
            registry.insert(version);
        }
        registry
    }
}
