//! Fluent, strongly-typed recording API for Rust callers.
//!
//! Converts the backend's boolean-plus-last-error convention into
//! `Result<T, WriterError>` at the public seam: a `false` or a zero id is
//! turned into [`WriterError::Writer`] carrying the handle's last-error
//! string, so the raw handle never has to be inspected by hand.

use std::path::Path;

use crate::db::{DatabaseWriter, SqliteWriter};
use crate::error::{Result, WriterError};
use crate::model::{
    DefinitionKind, FileId, LocalSymbolId, NameElement, NameHierarchy, ReferenceId, ReferenceKind,
    SourceRange, SymbolId, SymbolKind,
};

fn check<W: DatabaseWriter>(writer: &W, ok: bool) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(WriterError::Writer(writer.last_error()))
    }
}

fn check_id<W: DatabaseWriter>(writer: &W, id: i64) -> Result<i64> {
    if id != 0 {
        Ok(id)
    } else {
        Err(WriterError::Writer(writer.last_error()))
    }
}

/// Owns a writer handle and hands out scoped record builders.
pub struct WriterBuilder<W: DatabaseWriter = SqliteWriter> {
    writer: W,
}

impl WriterBuilder<SqliteWriter> {
    /// Opens a database at the given path.
    pub fn open(database_file_path: impl AsRef<Path>) -> Result<Self> {
        let mut writer = SqliteWriter::new();
        let path = database_file_path.as_ref().to_string_lossy().into_owned();
        let ok = writer.open(&path);
        check(&writer, ok)?;
        Ok(Self { writer })
    }

    /// Opens a database, runs `record` inside one transaction and closes the
    /// database again. The transaction is committed when `record` returns
    /// `Ok` and rolled back otherwise.
    pub fn open_scoped<F>(database_file_path: impl AsRef<Path>, record: F) -> Result<()>
    where
        F: FnOnce(&mut WriterBuilder<SqliteWriter>) -> Result<()>,
    {
        Self::scoped(database_file_path, false, record)
    }

    /// Like [`WriterBuilder::open_scoped`], but clears existing records first.
    pub fn open_and_clear_scoped<F>(database_file_path: impl AsRef<Path>, record: F) -> Result<()>
    where
        F: FnOnce(&mut WriterBuilder<SqliteWriter>) -> Result<()>,
    {
        Self::scoped(database_file_path, true, record)
    }

    fn scoped<F>(database_file_path: impl AsRef<Path>, clear: bool, record: F) -> Result<()>
    where
        F: FnOnce(&mut WriterBuilder<SqliteWriter>) -> Result<()>,
    {
        let mut builder = Self::open(database_file_path)?;
        let outcome = Self::run_session(&mut builder, clear, record);
        if outcome.is_ok() {
            builder.close()?;
        } else {
            // Keep the session's error; a close failure is secondary.
            let _ = builder.close();
        }
        outcome
    }

    fn run_session<F>(
        builder: &mut WriterBuilder<SqliteWriter>,
        clear: bool,
        record: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut WriterBuilder<SqliteWriter>) -> Result<()>,
    {
        if clear {
            builder.clear()?;
        }
        builder.begin_transaction()?;
        match record(builder) {
            Ok(()) => builder.commit_transaction(),
            Err(e) => {
                // Keep the callback's error; a rollback failure is secondary.
                let _ = builder.rollback_transaction();
                Err(e)
            }
        }
    }
}

impl<W: DatabaseWriter> WriterBuilder<W> {
    /// Wraps an already constructed writer handle.
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn version_string(&self) -> String {
        self.writer.version_string()
    }

    pub fn supported_database_version(&self) -> i64 {
        self.writer.supported_database_version()
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        self.writer.clear_last_error();
        let empty = self.writer.is_empty();
        let diagnostic = self.writer.last_error();
        if diagnostic.is_empty() {
            Ok(empty)
        } else {
            Err(WriterError::Writer(diagnostic))
        }
    }

    pub fn is_compatible(&mut self) -> bool {
        self.writer.is_compatible()
    }

    pub fn loaded_database_version(&mut self) -> i64 {
        self.writer.loaded_database_version()
    }

    pub fn clear(&mut self) -> Result<()> {
        let ok = self.writer.clear();
        check(&self.writer, ok)
    }

    pub fn begin_transaction(&mut self) -> Result<()> {
        let ok = self.writer.begin_transaction();
        check(&self.writer, ok)
    }

    pub fn commit_transaction(&mut self) -> Result<()> {
        let ok = self.writer.commit_transaction();
        check(&self.writer, ok)
    }

    pub fn rollback_transaction(&mut self) -> Result<()> {
        let ok = self.writer.rollback_transaction();
        check(&self.writer, ok)
    }

    pub fn optimize_database_memory(&mut self) -> Result<()> {
        let ok = self.writer.optimize_database_memory();
        check(&self.writer, ok)
    }

    pub fn close(&mut self) -> Result<()> {
        let ok = self.writer.close();
        check(&self.writer, ok)
    }

    /// Records a symbol under the given hierarchy.
    pub fn create_symbol(&mut self, hierarchy: NameHierarchy) -> Result<SymbolBuilder<'_, W>> {
        let symbol_id = self.writer.record_symbol(&hierarchy);
        let symbol_id = check_id(&self.writer, symbol_id)?;
        Ok(SymbolBuilder {
            writer: &mut self.writer,
            hierarchy,
            symbol_id,
        })
    }

    /// Records a symbol from one unqualified name.
    pub fn create_named_symbol(&mut self, name: impl Into<String>) -> Result<SymbolBuilder<'_, W>> {
        self.create_symbol(NameHierarchy::unqualified(name))
    }

    pub fn create_file(&mut self, file_path: &str) -> Result<FileBuilder<'_, W>> {
        let file_id = self.writer.record_file(file_path);
        let file_id = check_id(&self.writer, file_id)?;
        Ok(FileBuilder {
            writer: &mut self.writer,
            file_id,
        })
    }

    pub fn create_local_symbol(&mut self, name: &str) -> Result<LocalSymbolBuilder<'_, W>> {
        let local_symbol_id = self.writer.record_local_symbol(name);
        let local_symbol_id = check_id(&self.writer, local_symbol_id)?;
        Ok(LocalSymbolBuilder {
            writer: &mut self.writer,
            local_symbol_id,
        })
    }

    pub fn record_error(&mut self, message: &str, location: SourceRange) -> Result<()> {
        let ok = self.writer.record_error(message, false, &location);
        check(&self.writer, ok)
    }

    pub fn record_fatal_error(&mut self, message: &str, location: SourceRange) -> Result<()> {
        let ok = self.writer.record_error(message, true, &location);
        check(&self.writer, ok)
    }

    pub fn record_atomic_source_range(&mut self, range: SourceRange) -> Result<()> {
        let ok = self.writer.record_atomic_source_range(&range);
        check(&self.writer, ok)
    }
}

/// One recorded symbol; chains kind, definition and location records.
pub struct SymbolBuilder<'a, W: DatabaseWriter> {
    writer: &'a mut W,
    hierarchy: NameHierarchy,
    symbol_id: SymbolId,
}

impl<'a, W: DatabaseWriter> SymbolBuilder<'a, W> {
    pub fn symbol_id(&self) -> SymbolId {
        self.symbol_id
    }

    pub fn hierarchy(&self) -> &NameHierarchy {
        &self.hierarchy
    }

    pub fn of_kind(&mut self, kind: SymbolKind) -> Result<&mut Self> {
        let ok = self.writer.record_symbol_kind(self.symbol_id, kind.code());
        check(&*self.writer, ok)?;
        Ok(self)
    }

    pub fn with_definition(&mut self, kind: DefinitionKind) -> Result<&mut Self> {
        let ok = self.writer.record_symbol_definition_kind(self.symbol_id, kind);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    pub fn implicitly(&mut self) -> Result<&mut Self> {
        self.with_definition(DefinitionKind::Implicit)
    }

    pub fn explicitly(&mut self) -> Result<&mut Self> {
        self.with_definition(DefinitionKind::Explicit)
    }

    pub fn at_location(&mut self, location: SourceRange) -> Result<&mut Self> {
        let ok = self.writer.record_symbol_location(self.symbol_id, &location);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    pub fn with_scope(&mut self, location: SourceRange) -> Result<&mut Self> {
        let ok = self
            .writer
            .record_symbol_scope_location(self.symbol_id, &location);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    pub fn with_signature(&mut self, location: SourceRange) -> Result<&mut Self> {
        let ok = self
            .writer
            .record_symbol_signature_location(self.symbol_id, &location);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    pub fn with_qualifier(&mut self, location: SourceRange) -> Result<&mut Self> {
        let ok = self.writer.record_qualifier_location(self.symbol_id, &location);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    /// Records a child symbol: this symbol's hierarchy extended by one element.
    pub fn create_child(&mut self, element: NameElement) -> Result<SymbolBuilder<'_, W>> {
        let mut hierarchy = self.hierarchy.clone();
        hierarchy.name_elements.push(element);
        let symbol_id = self.writer.record_symbol(&hierarchy);
        let symbol_id = check_id(&*self.writer, symbol_id)?;
        Ok(SymbolBuilder {
            writer: &mut *self.writer,
            hierarchy,
            symbol_id,
        })
    }

    /// Records a reference from this symbol to another recorded symbol.
    pub fn references(
        &mut self,
        referenced: SymbolId,
        kind: ReferenceKind,
    ) -> Result<ReferenceBuilder<'_, W>> {
        let reference_id = self
            .writer
            .record_reference(self.symbol_id, referenced, kind.code());
        let reference_id = check_id(&*self.writer, reference_id)?;
        Ok(ReferenceBuilder {
            writer: &mut *self.writer,
            reference_id,
        })
    }

    /// Records a reference from another recorded symbol to this one.
    pub fn is_referenced_by(
        &mut self,
        context: SymbolId,
        kind: ReferenceKind,
    ) -> Result<ReferenceBuilder<'_, W>> {
        let reference_id = self
            .writer
            .record_reference(context, self.symbol_id, kind.code());
        let reference_id = check_id(&*self.writer, reference_id)?;
        Ok(ReferenceBuilder {
            writer: &mut *self.writer,
            reference_id,
        })
    }

    /// Records a reference from this symbol to a symbol the indexer could
    /// not resolve, pinned at the location of the unresolved name.
    pub fn references_unsolved(
        &mut self,
        kind: ReferenceKind,
        location: SourceRange,
    ) -> Result<ReferenceBuilder<'_, W>> {
        let reference_id =
            self.writer
                .record_reference_to_unsolved_symbol(self.symbol_id, kind.code(), &location);
        let reference_id = check_id(&*self.writer, reference_id)?;
        Ok(ReferenceBuilder {
            writer: &mut *self.writer,
            reference_id,
        })
    }
}

/// One recorded reference; chains location and ambiguity records.
pub struct ReferenceBuilder<'a, W: DatabaseWriter> {
    writer: &'a mut W,
    reference_id: ReferenceId,
}

impl<'a, W: DatabaseWriter> ReferenceBuilder<'a, W> {
    pub fn reference_id(&self) -> ReferenceId {
        self.reference_id
    }

    pub fn at_location(&mut self, location: SourceRange) -> Result<&mut Self> {
        let ok = self
            .writer
            .record_reference_location(self.reference_id, &location);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    pub fn as_ambiguous(&mut self) -> Result<&mut Self> {
        let ok = self.writer.record_reference_is_ambiguous(self.reference_id);
        check(&*self.writer, ok)?;
        Ok(self)
    }
}

/// One recorded file; source of [`SourceRange`] values for that file.
pub struct FileBuilder<'a, W: DatabaseWriter> {
    writer: &'a mut W,
    file_id: FileId,
}

impl<'a, W: DatabaseWriter> FileBuilder<'a, W> {
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn as_language(&mut self, language_identifier: &str) -> Result<&mut Self> {
        let ok = self
            .writer
            .record_file_language(self.file_id, language_identifier);
        check(&*self.writer, ok)?;
        Ok(self)
    }

    /// A 1-based, inclusive range within this file.
    pub fn at(&self, start_line: i32, start_column: i32, end_line: i32, end_column: i32) -> SourceRange {
        SourceRange::new(self.file_id, start_line, start_column, end_line, end_column)
    }
}

/// One recorded local symbol; chains location records.
pub struct LocalSymbolBuilder<'a, W: DatabaseWriter> {
    writer: &'a mut W,
    local_symbol_id: LocalSymbolId,
}

impl<'a, W: DatabaseWriter> LocalSymbolBuilder<'a, W> {
    pub fn local_symbol_id(&self) -> LocalSymbolId {
        self.local_symbol_id
    }

    pub fn at_location(&mut self, location: SourceRange) -> Result<&mut Self> {
        let ok = self
            .writer
            .record_local_symbol_location(self.local_symbol_id, &location);
        check(&*self.writer, ok)?;
        Ok(self)
    }
}
