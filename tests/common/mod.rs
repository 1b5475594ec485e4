#![allow(dead_code)]

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tempfile::TempDir;

/// Subset of the Mendeley Desktop schema touched by the lookup queries.
const FIXTURE_SCHEMA: &str = "
    CREATE TABLE Documents (
        id INTEGER PRIMARY KEY,
        uuid TEXT NOT NULL UNIQUE,
        title TEXT,
        year INTEGER
    );
    CREATE TABLE DocumentContributors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        documentId INTEGER NOT NULL,
        contribution TEXT NOT NULL DEFAULT 'DocumentAuthor',
        firstNames TEXT,
        lastName TEXT
    );
    CREATE TABLE DocumentFiles (
        documentId INTEGER NOT NULL,
        hash TEXT NOT NULL,
        unlinked INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE Files (
        hash TEXT PRIMARY KEY,
        localUrl TEXT NOT NULL
    );
";

/// Builds a throwaway Mendeley-shaped database inside a temp directory.
pub struct MendeleyFixture {
    dir: TempDir,
    path: PathBuf,
    conn: Connection,
}

impl MendeleyFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("jane@example.org@www.mendeley.com.sqlite");
        let conn = Connection::open(&path).expect("failed to create fixture database");
        conn.execute_batch(FIXTURE_SCHEMA)
            .expect("failed to create fixture schema");
        Self { dir, path, conn }
    }

    /// Inserts a document and one contributor row per author, in order.
    pub fn add_document(
        &self,
        id: i64,
        uuid: &str,
        title: &str,
        year: Option<i64>,
        authors: &[&str],
    ) -> &Self {
        self.conn
            .execute(
                "INSERT INTO Documents (id, uuid, title, year) VALUES (?1, ?2, ?3, ?4)",
                params![id, uuid, title, year],
            )
            .expect("failed to insert document");
        for author in authors {
            self.conn
                .execute(
                    "INSERT INTO DocumentContributors (documentId, lastName) VALUES (?1, ?2)",
                    params![id, author],
                )
                .expect("failed to insert contributor");
        }
        self
    }

    /// Attaches a file to a document. Files are keyed by content hash.
    pub fn add_file(&self, document_id: i64, hash: &str, local_url: &str) -> &Self {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO Files (hash, localUrl) VALUES (?1, ?2)",
                params![hash, local_url],
            )
            .expect("failed to insert file");
        self.conn
            .execute(
                "INSERT INTO DocumentFiles (documentId, hash) VALUES (?1, ?2)",
                params![document_id, hash],
            )
            .expect("failed to insert document file");
        self
    }

    /// Closes the writing connection and hands back the database location.
    /// The `TempDir` must be kept alive for as long as the file is used.
    pub fn finish(self) -> (TempDir, PathBuf) {
        drop(self.conn);
        (self.dir, self.path)
    }
}

/// A small library: three documents, one without a year, one with two files.
pub fn sample_library() -> (TempDir, PathBuf) {
    let fixture = MendeleyFixture::new();
    fixture
        .add_document(1, "uuid-shannon", "A Mathematical Theory of Communication", Some(1948), &["Shannon"])
        .add_document(2, "uuid-knuth", "The Art of Computer Programming", None, &["Knuth"])
        .add_document(
            3,
            "uuid-awk",
            "The AWK Programming Language",
            Some(1988),
            &["Aho", "Kernighan"],
        )
        .add_file(1, "hash-shannon", "file:///home/jane/papers/shannon1948.pdf")
        .add_file(3, "hash-awk-first", "file:///home/jane/books/awk-first.pdf")
        .add_file(3, "hash-awk-second", "file:///home/jane/books/awk-second.pdf");
    fixture.finish()
}

/// Splits a joined author string back into its sorted surnames.
pub fn author_set(authors: &str) -> Vec<String> {
    let mut names: Vec<String> = authors.split(", ").map(str::to_string).collect();
    names.sort();
    names
}
