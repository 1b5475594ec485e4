use rusqlite::params;
use rusqlite::OptionalExtension;

use super::connection::Database;
use crate::errors::{LookupError, Result};
use crate::types::Reference;

// ---------------------------------------------------------------------------
// Helper: map a rusqlite row to domain types
// ---------------------------------------------------------------------------

/// Maps a row of the reference listing query to a `Reference`.
fn row_to_reference(row: &rusqlite::Row) -> rusqlite::Result<Reference> {
    Ok(Reference {
        uuid: row.get("uuid")?,
        authors: row.get::<_, Option<String>>("authors")?.unwrap_or_default(),
        year: row.get("year")?,
        title: row.get::<_, Option<String>>("title")?.unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Reference operations
// ---------------------------------------------------------------------------

impl Database {
    /// Returns every document that has at least one contributor, ordered by
    /// the joined author string.
    ///
    /// Rows are grouped by `(year, title)`: documents sharing both collapse
    /// into one entry whose author list spans all of them and whose uuid is
    /// taken from an arbitrary member of the group.
    pub fn get_references(&self) -> Result<Vec<Reference>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT Documents.uuid AS uuid,
                        group_concat(DocumentContributors.lastName, ', ') AS authors,
                        Documents.year AS year,
                        Documents.title AS title
                 FROM DocumentContributors
                 JOIN Documents ON Documents.id = DocumentContributors.documentId
                 GROUP BY Documents.year, Documents.title
                 ORDER BY authors",
            )
            .map_err(|e| LookupError::Database {
                message: format!("failed to prepare query: {e}"),
                operation: "get_references".to_string(),
            })?;

        let rows = stmt.query_map([], row_to_reference).map_err(|e| LookupError::Database {
            message: format!("failed to query references: {e}"),
            operation: "get_references".to_string(),
        })?;

        let references = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| LookupError::Database {
                message: format!("failed to read reference row: {e}"),
                operation: "get_references".to_string(),
            })?;

        tracing::debug!(count = references.len(), "loaded references");
        Ok(references)
    }

    /// Returns the local URL of the first file attached to the document with
    /// the given uuid, or `None` if the uuid is unknown or has no file.
    ///
    /// "First" is the earliest inserted document-file association.
    pub fn get_local_url_by_uuid(&self, uuid: &str) -> Result<Option<String>> {
        self.conn()
            .query_row(
                "SELECT Files.localUrl
                 FROM Files
                 JOIN DocumentFiles ON Files.hash = DocumentFiles.hash
                 JOIN Documents ON DocumentFiles.documentId = Documents.id
                 WHERE Documents.uuid = ?1
                 ORDER BY DocumentFiles.rowid
                 LIMIT 1",
                params![uuid],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LookupError::Database {
                message: format!("failed to get local url by uuid: {e}"),
                operation: "get_local_url_by_uuid".to_string(),
            })
    }
}
