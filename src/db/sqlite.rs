//! SQLite-backed writer.
//!
//! Owns one optional connection plus the transaction nesting counter and the
//! last-error string. Internal helpers use `Result` and `?`; the
//! [`DatabaseWriter`] surface converts every failure into the
//! boolean-plus-last-error convention.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{DatabaseWriter, WriterStats};
use crate::error::{Result, WriterError};
use crate::model::{
    DefinitionKind, FileId, LocalSymbolId, NameHierarchy, ReferenceId, SourceRange, SymbolId,
};

/// Database version written into fresh databases and required by
/// [`DatabaseWriter::is_compatible`].
pub const SUPPORTED_DATABASE_VERSION: i64 = 1;

const NO_DATABASE_OPEN: &str = "no database is open";

// Location kinds stored in the source_locations table.
const LOCATION_TOKEN: &str = "token";
const LOCATION_SCOPE: &str = "scope";
const LOCATION_SIGNATURE: &str = "signature";
const LOCATION_QUALIFIER: &str = "qualifier";
const LOCATION_REFERENCE: &str = "reference";
const LOCATION_UNSOLVED: &str = "unsolved";
const LOCATION_LOCAL_SYMBOL: &str = "local_symbol";
const LOCATION_ATOMIC_RANGE: &str = "atomic_range";
const LOCATION_ERROR: &str = "error";

pub struct SqliteWriter {
    conn: Option<Connection>,
    transaction_depth: u32,
    last_error: String,
}

impl SqliteWriter {
    pub fn new() -> Self {
        Self {
            conn: None,
            transaction_depth: 0,
            last_error: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Row counts per record table. Mainly for diagnostics and tests.
    pub fn stats(&self) -> Result<WriterStats> {
        let conn = self.connection()?;
        let count = |table: &str| -> Result<i64> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            Ok(conn.query_row(&sql, [], |row| row.get(0))?)
        };
        Ok(WriterStats {
            symbols: count("symbols")?,
            files: count("files")?,
            references: count("symbol_references")?,
            local_symbols: count("local_symbols")?,
            source_locations: count("source_locations")?,
            errors: count("indexer_errors")?,
        })
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| WriterError::writer(NO_DATABASE_OPEN))
    }

    /// Configure SQLite PRAGMA settings: WAL for crash safety with decent
    /// write throughput, NORMAL synchronous, in-memory temp store.
    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;
        Ok(())
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS symbols (
                id INTEGER PRIMARY KEY,
                name_json TEXT NOT NULL UNIQUE,
                definition_kind INTEGER,
                kind INTEGER
            );

            CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY,
                path TEXT NOT NULL UNIQUE,
                language TEXT
            );

            CREATE TABLE IF NOT EXISTS local_symbols (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS symbol_references (
                id INTEGER PRIMARY KEY,
                context_symbol_id INTEGER NOT NULL,
                referenced_symbol_id INTEGER,
                kind INTEGER NOT NULL,
                is_ambiguous INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_references_context
                ON symbol_references(context_symbol_id);

            CREATE TABLE IF NOT EXISTS source_locations (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER,
                location_kind TEXT NOT NULL,
                file_id INTEGER NOT NULL,
                start_line INTEGER NOT NULL,
                start_column INTEGER NOT NULL,
                end_line INTEGER NOT NULL,
                end_column INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_locations_owner
                ON source_locations(owner_id, location_kind);
            CREATE INDEX IF NOT EXISTS idx_locations_file
                ON source_locations(file_id);

            CREATE TABLE IF NOT EXISTS indexer_errors (
                id INTEGER PRIMARY KEY,
                message TEXT NOT NULL,
                is_fatal INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )?;
        // Stamp fresh databases; an existing version row is left untouched
        // so that is_compatible can report a mismatch.
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('database_version', ?1)
             ON CONFLICT(key) DO NOTHING",
            params![SUPPORTED_DATABASE_VERSION.to_string()],
        )?;
        Ok(())
    }

    fn try_open(&mut self, database_file_path: &str) -> Result<()> {
        if self.conn.is_some() {
            return Err(WriterError::writer(
                "a database is already open; close it first",
            ));
        }
        let conn = Connection::open(database_file_path)?;
        Self::configure_pragmas(&conn)?;
        Self::init_schema(&conn)?;
        tracing::debug!(path = database_file_path, "opened symbol database");
        self.conn = Some(conn);
        self.transaction_depth = 0;
        Ok(())
    }

    fn try_close(&mut self) -> Result<()> {
        let conn = self
            .conn
            .take()
            .ok_or_else(|| WriterError::writer(NO_DATABASE_OPEN))?;
        // Dropping the connection rolls back anything left uncommitted.
        if self.transaction_depth > 0 {
            tracing::warn!(
                depth = self.transaction_depth,
                "closing database with an open transaction"
            );
            self.transaction_depth = 0;
        }
        drop(conn);
        tracing::debug!("closed symbol database");
        Ok(())
    }

    fn try_clear(&mut self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(
            r#"
            DELETE FROM symbols;
            DELETE FROM files;
            DELETE FROM local_symbols;
            DELETE FROM symbol_references;
            DELETE FROM source_locations;
            DELETE FROM indexer_errors;
            "#,
        )?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('database_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![SUPPORTED_DATABASE_VERSION.to_string()],
        )?;
        Ok(())
    }

    fn try_is_empty(&self) -> Result<bool> {
        Ok(self.stats()?.total() == 0)
    }

    fn try_loaded_database_version(&self) -> Result<i64> {
        let conn = self.connection()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'database_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    fn try_begin_transaction(&mut self) -> Result<()> {
        let conn = self.connection()?;
        if self.transaction_depth == 0 {
            conn.execute_batch("BEGIN")?;
        }
        self.transaction_depth += 1;
        Ok(())
    }

    fn try_commit_transaction(&mut self) -> Result<()> {
        let conn = self.connection()?;
        if self.transaction_depth == 0 {
            return Err(WriterError::writer("no transaction is open"));
        }
        if self.transaction_depth == 1 {
            conn.execute_batch("COMMIT")?;
        }
        self.transaction_depth -= 1;
        Ok(())
    }

    fn try_rollback_transaction(&mut self) -> Result<()> {
        let conn = self.connection()?;
        if self.transaction_depth == 0 {
            return Err(WriterError::writer("no transaction is open"));
        }
        conn.execute_batch("ROLLBACK")?;
        self.transaction_depth = 0;
        Ok(())
    }

    fn try_optimize_database_memory(&self) -> Result<()> {
        self.connection()?.execute_batch("VACUUM")?;
        Ok(())
    }

    fn try_record_symbol(&mut self, name: &NameHierarchy) -> Result<SymbolId> {
        let name_json = serde_json::to_string(name)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO symbols (name_json) VALUES (?1)
             ON CONFLICT(name_json) DO NOTHING",
            params![name_json],
        )?;
        let id = conn.query_row(
            "SELECT id FROM symbols WHERE name_json = ?1",
            params![name_json],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn require_symbol(&self, symbol_id: SymbolId) -> Result<()> {
        let found: Option<i64> = self
            .connection()?
            .query_row(
                "SELECT id FROM symbols WHERE id = ?1",
                params![symbol_id],
                |row| row.get(0),
            )
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(WriterError::writer(format!("unknown symbol id {symbol_id}"))),
        }
    }

    fn require_reference(&self, reference_id: ReferenceId) -> Result<()> {
        let found: Option<i64> = self
            .connection()?
            .query_row(
                "SELECT id FROM symbol_references WHERE id = ?1",
                params![reference_id],
                |row| row.get(0),
            )
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(WriterError::writer(format!(
                "unknown reference id {reference_id}"
            ))),
        }
    }

    fn require_local_symbol(&self, local_symbol_id: LocalSymbolId) -> Result<()> {
        let found: Option<i64> = self
            .connection()?
            .query_row(
                "SELECT id FROM local_symbols WHERE id = ?1",
                params![local_symbol_id],
                |row| row.get(0),
            )
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(WriterError::writer(format!(
                "unknown local symbol id {local_symbol_id}"
            ))),
        }
    }

    fn insert_location(
        &self,
        owner_id: Option<i64>,
        location_kind: &str,
        range: &SourceRange,
    ) -> Result<()> {
        self.connection()?.execute(
            "INSERT INTO source_locations
                 (owner_id, location_kind, file_id,
                  start_line, start_column, end_line, end_column)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                owner_id,
                location_kind,
                range.file_id,
                range.start_line,
                range.start_column,
                range.end_line,
                range.end_column
            ],
        )?;
        Ok(())
    }

    fn try_record_symbol_location(
        &mut self,
        symbol_id: SymbolId,
        location_kind: &str,
        range: &SourceRange,
    ) -> Result<()> {
        self.require_symbol(symbol_id)?;
        self.insert_location(Some(symbol_id), location_kind, range)
    }

    fn try_record_symbol_detail(
        &mut self,
        symbol_id: SymbolId,
        column: &str,
        code: i32,
    ) -> Result<()> {
        let sql = format!("UPDATE symbols SET {column} = ?1 WHERE id = ?2");
        let updated = self.connection()?.execute(&sql, params![code, symbol_id])?;
        if updated == 0 {
            return Err(WriterError::writer(format!("unknown symbol id {symbol_id}")));
        }
        Ok(())
    }

    fn try_record_reference(
        &mut self,
        context_symbol_id: SymbolId,
        referenced_symbol_id: SymbolId,
        kind: i32,
    ) -> Result<ReferenceId> {
        self.require_symbol(context_symbol_id)?;
        self.require_symbol(referenced_symbol_id)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO symbol_references (context_symbol_id, referenced_symbol_id, kind)
             VALUES (?1, ?2, ?3)",
            params![context_symbol_id, referenced_symbol_id, kind],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn try_record_reference_to_unsolved_symbol(
        &mut self,
        context_symbol_id: SymbolId,
        kind: i32,
        range: &SourceRange,
    ) -> Result<ReferenceId> {
        self.require_symbol(context_symbol_id)?;
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO symbol_references (context_symbol_id, referenced_symbol_id, kind)
             VALUES (?1, NULL, ?2)",
            params![context_symbol_id, kind],
        )?;
        let reference_id = conn.last_insert_rowid();
        self.insert_location(Some(reference_id), LOCATION_UNSOLVED, range)?;
        Ok(reference_id)
    }

    fn try_record_reference_is_ambiguous(&mut self, reference_id: ReferenceId) -> Result<()> {
        let updated = self.connection()?.execute(
            "UPDATE symbol_references SET is_ambiguous = 1 WHERE id = ?1",
            params![reference_id],
        )?;
        if updated == 0 {
            return Err(WriterError::writer(format!(
                "unknown reference id {reference_id}"
            )));
        }
        Ok(())
    }

    fn try_record_file(&mut self, file_path: &str) -> Result<FileId> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO files (path) VALUES (?1) ON CONFLICT(path) DO NOTHING",
            params![file_path],
        )?;
        let id = conn.query_row(
            "SELECT id FROM files WHERE path = ?1",
            params![file_path],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn try_record_file_language(&mut self, file_id: FileId, language: &str) -> Result<()> {
        let updated = self.connection()?.execute(
            "UPDATE files SET language = ?1 WHERE id = ?2",
            params![language, file_id],
        )?;
        if updated == 0 {
            return Err(WriterError::writer(format!("unknown file id {file_id}")));
        }
        Ok(())
    }

    fn try_record_local_symbol(&mut self, name: &str) -> Result<LocalSymbolId> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO local_symbols (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        let id = conn.query_row(
            "SELECT id FROM local_symbols WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn try_record_error(&mut self, message: &str, fatal: bool, range: &SourceRange) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO indexer_errors (message, is_fatal) VALUES (?1, ?2)",
            params![message, fatal],
        )?;
        let error_id = conn.last_insert_rowid();
        self.insert_location(Some(error_id), LOCATION_ERROR, range)
    }

    /// Collapses an internal `Result` onto the boolean convention.
    fn report(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }

    /// Collapses an internal `Result` onto the id convention, `0` on failure.
    fn report_id(&mut self, result: Result<i64>) -> i64 {
        match result {
            Ok(id) => id,
            Err(e) => {
                self.last_error = e.to_string();
                0
            }
        }
    }
}

impl Default for SqliteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseWriter for SqliteWriter {
    fn version_string(&self) -> String {
        format!("symbol-writer {}", env!("CARGO_PKG_VERSION"))
    }

    fn supported_database_version(&self) -> i64 {
        SUPPORTED_DATABASE_VERSION
    }

    fn last_error(&self) -> String {
        self.last_error.clone()
    }

    fn set_last_error(&mut self, message: &str) {
        self.last_error = message.to_owned();
    }

    fn clear_last_error(&mut self) {
        self.last_error.clear();
    }

    fn open(&mut self, database_file_path: &str) -> bool {
        let result = self.try_open(database_file_path);
        self.report(result)
    }

    fn close(&mut self) -> bool {
        let result = self.try_close();
        self.report(result)
    }

    fn clear(&mut self) -> bool {
        let result = self.try_clear();
        self.report(result)
    }

    fn is_empty(&mut self) -> bool {
        match self.try_is_empty() {
            Ok(empty) => empty,
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }

    fn is_compatible(&mut self) -> bool {
        match self.try_loaded_database_version() {
            Ok(version) => version == SUPPORTED_DATABASE_VERSION,
            Err(e) => {
                self.last_error = e.to_string();
                false
            }
        }
    }

    fn loaded_database_version(&mut self) -> i64 {
        match self.try_loaded_database_version() {
            Ok(version) => version,
            Err(e) => {
                self.last_error = e.to_string();
                0
            }
        }
    }

    fn begin_transaction(&mut self) -> bool {
        let result = self.try_begin_transaction();
        self.report(result)
    }

    fn commit_transaction(&mut self) -> bool {
        let result = self.try_commit_transaction();
        self.report(result)
    }

    fn rollback_transaction(&mut self) -> bool {
        let result = self.try_rollback_transaction();
        self.report(result)
    }

    fn optimize_database_memory(&mut self) -> bool {
        let result = self.try_optimize_database_memory();
        self.report(result)
    }

    fn record_symbol(&mut self, name: &NameHierarchy) -> SymbolId {
        let result = self.try_record_symbol(name);
        self.report_id(result)
    }

    fn record_symbol_definition_kind(&mut self, symbol_id: SymbolId, kind: DefinitionKind) -> bool {
        let result = self.try_record_symbol_detail(symbol_id, "definition_kind", kind.code());
        self.report(result)
    }

    fn record_symbol_kind(&mut self, symbol_id: SymbolId, kind: i32) -> bool {
        let result = self.try_record_symbol_detail(symbol_id, "kind", kind);
        self.report(result)
    }

    fn record_symbol_location(&mut self, symbol_id: SymbolId, range: &SourceRange) -> bool {
        let result = self.try_record_symbol_location(symbol_id, LOCATION_TOKEN, range);
        self.report(result)
    }

    fn record_symbol_scope_location(&mut self, symbol_id: SymbolId, range: &SourceRange) -> bool {
        let result = self.try_record_symbol_location(symbol_id, LOCATION_SCOPE, range);
        self.report(result)
    }

    fn record_symbol_signature_location(
        &mut self,
        symbol_id: SymbolId,
        range: &SourceRange,
    ) -> bool {
        let result = self.try_record_symbol_location(symbol_id, LOCATION_SIGNATURE, range);
        self.report(result)
    }

    fn record_reference(
        &mut self,
        context_symbol_id: SymbolId,
        referenced_symbol_id: SymbolId,
        kind: i32,
    ) -> ReferenceId {
        let result = self.try_record_reference(context_symbol_id, referenced_symbol_id, kind);
        self.report_id(result)
    }

    fn record_reference_location(&mut self, reference_id: ReferenceId, range: &SourceRange) -> bool {
        let result = self
            .require_reference(reference_id)
            .and_then(|_| self.insert_location(Some(reference_id), LOCATION_REFERENCE, range));
        self.report(result)
    }

    fn record_reference_is_ambiguous(&mut self, reference_id: ReferenceId) -> bool {
        let result = self.try_record_reference_is_ambiguous(reference_id);
        self.report(result)
    }

    fn record_reference_to_unsolved_symbol(
        &mut self,
        context_symbol_id: SymbolId,
        kind: i32,
        range: &SourceRange,
    ) -> ReferenceId {
        let result = self.try_record_reference_to_unsolved_symbol(context_symbol_id, kind, range);
        self.report_id(result)
    }

    fn record_qualifier_location(&mut self, symbol_id: SymbolId, range: &SourceRange) -> bool {
        let result = self.try_record_symbol_location(symbol_id, LOCATION_QUALIFIER, range);
        self.report(result)
    }

    fn record_file(&mut self, file_path: &str) -> FileId {
        let result = self.try_record_file(file_path);
        self.report_id(result)
    }

    fn record_file_language(&mut self, file_id: FileId, language: &str) -> bool {
        let result = self.try_record_file_language(file_id, language);
        self.report(result)
    }

    fn record_local_symbol(&mut self, name: &str) -> LocalSymbolId {
        let result = self.try_record_local_symbol(name);
        self.report_id(result)
    }

    fn record_local_symbol_location(
        &mut self,
        local_symbol_id: LocalSymbolId,
        range: &SourceRange,
    ) -> bool {
        let result = self
            .require_local_symbol(local_symbol_id)
            .and_then(|_| self.insert_location(Some(local_symbol_id), LOCATION_LOCAL_SYMBOL, range));
        self.report(result)
    }

    fn record_atomic_source_range(&mut self, range: &SourceRange) -> bool {
        let result = self.insert_location(None, LOCATION_ATOMIC_RANGE, range);
        self.report(result)
    }

    fn record_error(&mut self, message: &str, fatal: bool, range: &SourceRange) -> bool {
        let result = self.try_record_error(message, fatal, range);
        self.report(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NameElement;

    fn open_writer() -> SqliteWriter {
        let mut writer = SqliteWriter::new();
        assert!(writer.open(":memory:"));
        writer
    }

    fn hierarchy(name: &str) -> NameHierarchy {
        NameHierarchy::new("::", vec![NameElement::new(name)])
    }

    #[test]
    fn operations_fail_without_open_database() {
        let mut writer = SqliteWriter::new();
        assert_eq!(writer.record_symbol(&hierarchy("Foo")), 0);
        assert_eq!(writer.last_error(), "no database is open");
        assert!(!writer.begin_transaction());
        assert!(!writer.close());
    }

    #[test]
    fn fresh_database_is_empty_and_compatible() {
        let mut writer = open_writer();
        assert!(writer.is_empty());
        assert!(writer.is_compatible());
        assert_eq!(writer.loaded_database_version(), SUPPORTED_DATABASE_VERSION);
    }

    #[test]
    fn record_symbol_is_idempotent_per_name() {
        let mut writer = open_writer();
        let first = writer.record_symbol(&hierarchy("Foo"));
        let second = writer.record_symbol(&hierarchy("Foo"));
        let other = writer.record_symbol(&hierarchy("Bar"));
        assert_ne!(first, 0);
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(writer.stats().unwrap().symbols, 2);
    }

    #[test]
    fn symbol_detail_updates_require_known_id() {
        let mut writer = open_writer();
        assert!(!writer.record_symbol_kind(42, 11));
        assert_eq!(writer.last_error(), "unknown symbol id 42");

        let id = writer.record_symbol(&hierarchy("Foo"));
        assert!(writer.record_symbol_kind(id, 11));
        assert!(writer.record_symbol_definition_kind(id, DefinitionKind::Explicit));
    }

    #[test]
    fn locations_are_stored_per_kind() {
        let mut writer = open_writer();
        let file_id = writer.record_file("src/main.cpp");
        let symbol_id = writer.record_symbol(&hierarchy("main"));
        let range = SourceRange::new(file_id, 3, 5, 3, 8);

        assert!(writer.record_symbol_location(symbol_id, &range));
        assert!(writer.record_symbol_scope_location(symbol_id, &range));
        assert!(writer.record_symbol_signature_location(symbol_id, &range));
        assert!(writer.record_qualifier_location(symbol_id, &range));
        assert_eq!(writer.stats().unwrap().source_locations, 4);
    }

    #[test]
    fn references_link_known_symbols() {
        let mut writer = open_writer();
        let caller = writer.record_symbol(&hierarchy("caller"));
        let callee = writer.record_symbol(&hierarchy("callee"));

        let reference_id = writer.record_reference(caller, callee, 2);
        assert_ne!(reference_id, 0);
        assert!(writer.record_reference_is_ambiguous(reference_id));

        assert_eq!(writer.record_reference(caller, 999, 2), 0);
        assert_eq!(writer.last_error(), "unknown symbol id 999");
    }

    #[test]
    fn transaction_nesting_only_touches_sqlite_at_the_outermost_level() {
        let mut writer = open_writer();
        assert!(writer.begin_transaction());
        assert!(writer.begin_transaction());
        writer.record_symbol(&hierarchy("Foo"));
        assert!(writer.commit_transaction());
        // Still inside the outer transaction; a bare COMMIT would fail here
        // if the inner commit had already ended it.
        assert!(writer.commit_transaction());
        assert!(!writer.commit_transaction());
        assert_eq!(writer.last_error(), "no transaction is open");
    }

    #[test]
    fn rollback_discards_uncommitted_records() {
        let mut writer = open_writer();
        writer.record_symbol(&hierarchy("kept"));
        assert!(writer.begin_transaction());
        writer.record_symbol(&hierarchy("discarded"));
        assert!(writer.rollback_transaction());
        assert_eq!(writer.stats().unwrap().symbols, 1);
    }

    #[test]
    fn clear_empties_all_record_tables() {
        let mut writer = open_writer();
        let file_id = writer.record_file("a.cpp");
        let symbol_id = writer.record_symbol(&hierarchy("Foo"));
        writer.record_symbol_location(symbol_id, &SourceRange::new(file_id, 1, 1, 1, 3));
        assert!(!writer.is_empty());

        assert!(writer.clear());
        assert!(writer.is_empty());
        assert_eq!(writer.loaded_database_version(), SUPPORTED_DATABASE_VERSION);
    }

    #[test]
    fn record_error_stores_message_and_location() {
        let mut writer = open_writer();
        let file_id = writer.record_file("broken.cpp");
        let range = SourceRange::new(file_id, 10, 1, 10, 20);
        assert!(writer.record_error("unexpected token", false, &range));
        let stats = writer.stats().unwrap();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.source_locations, 1);
    }

    #[test]
    fn reopen_rejected_while_open() {
        let mut writer = open_writer();
        assert!(!writer.open(":memory:"));
        assert_eq!(
            writer.last_error(),
            "a database is already open; close it first"
        );
        assert!(writer.close());
        assert!(writer.open(":memory:"));
    }
}
