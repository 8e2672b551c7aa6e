//! Writer backend: the stateful handle that owns the open database,
//! the transaction nesting and the last-error string.

pub mod sqlite;

use serde::Serialize;

pub use sqlite::{SqliteWriter, SUPPORTED_DATABASE_VERSION};

use crate::model::{
    DefinitionKind, FileId, LocalSymbolId, NameHierarchy, ReferenceId, SourceRange, SymbolId,
};

/// The writer contract.
///
/// No method panics or returns `Err` across this boundary: every failure is
/// reported as `false` (or an id of `0`) with the diagnostic placed in the
/// handle's last-error string. The next failing call overwrites that string,
/// so callers must read it immediately after a failure.
///
/// Numeric kind codes for symbols and references pass through unvalidated;
/// rejecting an unknown code is the backend's decision, not the caller's.
pub trait DatabaseWriter {
    fn version_string(&self) -> String;
    fn supported_database_version(&self) -> i64;

    fn last_error(&self) -> String;
    fn set_last_error(&mut self, message: &str);
    fn clear_last_error(&mut self);

    fn open(&mut self, database_file_path: &str) -> bool;
    fn close(&mut self) -> bool;
    fn clear(&mut self) -> bool;
    fn is_empty(&mut self) -> bool;
    fn is_compatible(&mut self) -> bool;
    fn loaded_database_version(&mut self) -> i64;

    fn begin_transaction(&mut self) -> bool;
    fn commit_transaction(&mut self) -> bool;
    fn rollback_transaction(&mut self) -> bool;
    fn optimize_database_memory(&mut self) -> bool;

    /// Records a symbol, or returns the id it was already recorded under.
    fn record_symbol(&mut self, name: &NameHierarchy) -> SymbolId;
    fn record_symbol_definition_kind(&mut self, symbol_id: SymbolId, kind: DefinitionKind) -> bool;
    fn record_symbol_kind(&mut self, symbol_id: SymbolId, kind: i32) -> bool;
    fn record_symbol_location(&mut self, symbol_id: SymbolId, range: &SourceRange) -> bool;
    fn record_symbol_scope_location(&mut self, symbol_id: SymbolId, range: &SourceRange) -> bool;
    fn record_symbol_signature_location(&mut self, symbol_id: SymbolId, range: &SourceRange)
        -> bool;

    fn record_reference(
        &mut self,
        context_symbol_id: SymbolId,
        referenced_symbol_id: SymbolId,
        kind: i32,
    ) -> ReferenceId;
    fn record_reference_location(&mut self, reference_id: ReferenceId, range: &SourceRange)
        -> bool;
    fn record_reference_is_ambiguous(&mut self, reference_id: ReferenceId) -> bool;
    fn record_reference_to_unsolved_symbol(
        &mut self,
        context_symbol_id: SymbolId,
        kind: i32,
        range: &SourceRange,
    ) -> ReferenceId;
    fn record_qualifier_location(&mut self, symbol_id: SymbolId, range: &SourceRange) -> bool;

    /// Records a file by path, or returns the id it was already recorded under.
    fn record_file(&mut self, file_path: &str) -> FileId;
    fn record_file_language(&mut self, file_id: FileId, language: &str) -> bool;

    fn record_local_symbol(&mut self, name: &str) -> LocalSymbolId;
    fn record_local_symbol_location(
        &mut self,
        local_symbol_id: LocalSymbolId,
        range: &SourceRange,
    ) -> bool;

    fn record_atomic_source_range(&mut self, range: &SourceRange) -> bool;
    fn record_error(&mut self, message: &str, fatal: bool, range: &SourceRange) -> bool;
}

/// Row counts per record table, for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WriterStats {
    pub symbols: i64,
    pub files: i64,
    pub references: i64,
    pub local_symbols: i64,
    pub source_locations: i64,
    pub errors: i64,
}

impl WriterStats {
    pub fn total(&self) -> i64 {
        self.symbols
            + self.files
            + self.references
            + self.local_symbols
            + self.source_locations
            + self.errors
    }
}
