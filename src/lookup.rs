use std::path::{Path, PathBuf};

use crate::config::LookupConfig;
use crate::db::Database;
use crate::discovery::MendeleyPaths;
use crate::errors::{LookupError, Result};
use crate::types::{LinkNode, Reference};

/// Read-only access to the references of a Mendeley database.
///
/// Holds only the database location. Each operation opens its own
/// connection and releases it before returning, including on failure.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLookup {
    database_path: Option<PathBuf>,
}

impl ReferenceLookup {
    pub fn new(database_path: Option<PathBuf>) -> Self {
        Self { database_path }
    }

    /// Creates a lookup over the configured database, or over the discovered
    /// Mendeley database when the configuration names none.
    pub fn from_config(config: &LookupConfig, paths: Option<&MendeleyPaths>) -> Self {
        Self::new(config.effective_database_path(paths))
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.database_path.as_deref()
    }

    /// Points the lookup at a different database, e.g. after the user
    /// changed settings.
    pub fn set_database_path(&mut self, database_path: Option<PathBuf>) {
        self.database_path = database_path;
    }

    /// Returns all references ordered by author string.
    pub fn list_references(&self) -> Result<Vec<Reference>> {
        let db = self.open()?;
        db.get_references()
    }

    /// Returns the local URL of the first file attached to `uuid`, or `None`
    /// if the reference is unknown or has no file.
    pub fn resolve_file_path(&self, uuid: &str) -> Result<Option<String>> {
        let db = self.open()?;
        let local_url = db.get_local_url_by_uuid(uuid)?;
        if local_url.is_none() {
            tracing::debug!(uuid, "no local file for reference");
        }
        Ok(local_url)
    }

    /// Returns the listed reference carrying `uuid`, if any.
    pub fn find_reference(&self, uuid: &str) -> Result<Option<Reference>> {
        Ok(self
            .list_references()?
            .into_iter()
            .find(|reference| reference.uuid == uuid))
    }

    /// Returns the link node a host should insert for `uuid`.
    pub fn link_node_for(&self, uuid: &str) -> Result<Option<LinkNode>> {
        Ok(self.find_reference(uuid)?.map(|r| r.to_link_node()))
    }

    fn open(&self) -> Result<Database> {
        let path = self
            .database_path
            .as_deref()
            .ok_or(LookupError::ConfigurationMissing)?;
        Database::open_read_only(path)
    }
}
