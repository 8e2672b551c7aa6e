//! Marshalling adapter: the dynamically-typed call surface.
//!
//! Receives a call name and an ordered slice of JSON arguments, validates
//! argument shapes, converts them into the typed records of [`crate::model`]
//! and forwards to the [`DatabaseWriter`] backend. Results come back as JSON
//! booleans, strings and numbers; diagnostics travel out of band through the
//! handle's last-error string, for validation failures and backend failures
//! alike, so callers have exactly one place to look after any failure.

mod marshal;

use serde_json::{json, Value};

use crate::db::{DatabaseWriter, SqliteWriter};
use crate::model::DefinitionKind;
use marshal::MarshalResult;

pub struct WriterAdapter<W: DatabaseWriter = SqliteWriter> {
    writer: W,
}

impl WriterAdapter<SqliteWriter> {
    /// Adapter over a fresh, unopened SQLite writer handle.
    pub fn new() -> Self {
        Self::with_writer(SqliteWriter::new())
    }
}

impl Default for WriterAdapter<SqliteWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: DatabaseWriter> WriterAdapter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Dispatches one call by name. Never panics: an unknown name or an
    /// invalid argument shape sets the last-error string and returns the
    /// operation's failure value without invoking the backend.
    pub fn call(&mut self, method: &str, args: &[Value]) -> Value {
        tracing::trace!(method, args = args.len(), "dispatching writer call");
        let result = self.dispatch(method, args);
        match result {
            Ok(value) => value,
            Err(diagnostic) => {
                self.writer.set_last_error(&diagnostic);
                failure_value(method)
            }
        }
    }

    fn dispatch(&mut self, method: &str, args: &[Value]) -> MarshalResult<Value> {
        match method {
            "getVersionString" => Ok(Value::from(self.writer.version_string())),
            "getSupportedDatabaseVersion" => Ok(json!(self.writer.supported_database_version())),
            "getLastError" => Ok(Value::from(self.writer.last_error())),
            "setLastError" => {
                let message = marshal::string_arg(args, 0, method, "message")?;
                self.writer.set_last_error(&message);
                Ok(Value::Null)
            }
            "clearLastError" => {
                self.writer.clear_last_error();
                Ok(Value::Null)
            }
            "open" => {
                let path = marshal::string_arg(args, 0, method, "databaseFilePath")?;
                Ok(Value::Bool(self.writer.open(&path)))
            }
            "close" => Ok(Value::Bool(self.writer.close())),
            "clear" => Ok(Value::Bool(self.writer.clear())),
            "isEmpty" => Ok(Value::Bool(self.writer.is_empty())),
            "isCompatible" => Ok(Value::Bool(self.writer.is_compatible())),
            "getLoadedDatabaseVersion" => Ok(json!(self.writer.loaded_database_version())),
            "beginTransaction" => Ok(Value::Bool(self.writer.begin_transaction())),
            "commitTransaction" => Ok(Value::Bool(self.writer.commit_transaction())),
            "rollbackTransaction" => Ok(Value::Bool(self.writer.rollback_transaction())),
            "optimizeDatabaseMemory" => Ok(Value::Bool(self.writer.optimize_database_memory())),
            "recordSymbol" => self.record_symbol(args),
            "recordSymbolDefinitionKind" => self.record_symbol_definition_kind(args),
            "recordSymbolKind" => self.record_symbol_kind(args),
            "recordSymbolLocation" => self.record_symbol_location(args, LocationTarget::Token),
            "recordSymbolScopeLocation" => self.record_symbol_location(args, LocationTarget::Scope),
            "recordSymbolSignatureLocation" => {
                self.record_symbol_location(args, LocationTarget::Signature)
            }
            "recordQualifierLocation" => self.record_symbol_location(args, LocationTarget::Qualifier),
            "recordReference" => self.record_reference(args),
            "recordReferenceLocation" => self.record_reference_location(args),
            "recordReferenceIsAmbiguous" => self.record_reference_is_ambiguous(args),
            "recordReferenceToUnsolvedSymbol" => self.record_reference_to_unsolved_symbol(args),
            "recordFile" => self.record_file(args),
            "recordFileLanguage" => self.record_file_language(args),
            "recordLocalSymbol" => self.record_local_symbol(args),
            "recordLocalSymbolLocation" => self.record_local_symbol_location(args),
            "recordAtomicSourceRange" => self.record_atomic_source_range(args),
            "recordError" => self.record_error(args),
            _ => Err(format!("unknown method: {method}")),
        }
    }

    fn record_symbol(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let hierarchy = marshal::name_hierarchy_arg(args, 0, "recordSymbol")?;
        Ok(Value::Bool(self.writer.record_symbol(&hierarchy) != 0))
    }

    fn record_symbol_definition_kind(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordSymbolDefinitionKind";
        let symbol_id = marshal::int_arg(args, 0, call, "symbolId")?;
        let kind = DefinitionKind::from_code(marshal::int_arg(args, 1, call, "definitionKind")?);
        Ok(Value::Bool(
            self.writer.record_symbol_definition_kind(symbol_id, kind),
        ))
    }

    fn record_symbol_kind(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordSymbolKind";
        let symbol_id = marshal::int_arg(args, 0, call, "symbolId")?;
        let kind = marshal::int_arg(args, 1, call, "symbolKind")? as i32;
        Ok(Value::Bool(self.writer.record_symbol_kind(symbol_id, kind)))
    }

    fn record_symbol_location(
        &mut self,
        args: &[Value],
        target: LocationTarget,
    ) -> MarshalResult<Value> {
        let call = target.call_name();
        let symbol_id = marshal::int_arg(args, 0, call, "symbolId")?;
        let range = marshal::source_range_arg(args, 1, call)?;
        let ok = match target {
            LocationTarget::Token => self.writer.record_symbol_location(symbol_id, &range),
            LocationTarget::Scope => self.writer.record_symbol_scope_location(symbol_id, &range),
            LocationTarget::Signature => self
                .writer
                .record_symbol_signature_location(symbol_id, &range),
            LocationTarget::Qualifier => self.writer.record_qualifier_location(symbol_id, &range),
        };
        Ok(Value::Bool(ok))
    }

    fn record_reference(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordReference";
        let context_id = marshal::int_arg(args, 0, call, "contextSymbolId")?;
        let referenced_id = marshal::int_arg(args, 1, call, "referencedSymbolId")?;
        let kind = marshal::int_arg(args, 2, call, "referenceKind")? as i32;
        Ok(json!(self.writer.record_reference(
            context_id,
            referenced_id,
            kind
        )))
    }

    fn record_reference_location(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordReferenceLocation";
        let reference_id = marshal::int_arg(args, 0, call, "referenceId")?;
        let range = marshal::source_range_arg(args, 1, call)?;
        Ok(Value::Bool(
            self.writer.record_reference_location(reference_id, &range),
        ))
    }

    fn record_reference_is_ambiguous(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordReferenceIsAmbiguous";
        let reference_id = marshal::int_arg(args, 0, call, "referenceId")?;
        Ok(Value::Bool(
            self.writer.record_reference_is_ambiguous(reference_id),
        ))
    }

    fn record_reference_to_unsolved_symbol(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordReferenceToUnsolvedSymbol";
        let context_id = marshal::int_arg(args, 0, call, "contextSymbolId")?;
        let kind = marshal::int_arg(args, 1, call, "referenceKind")? as i32;
        let range = marshal::source_range_arg(args, 2, call)?;
        Ok(json!(self.writer.record_reference_to_unsolved_symbol(
            context_id, kind, &range
        )))
    }

    fn record_file(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let path = marshal::string_arg(args, 0, "recordFile", "filePath")?;
        Ok(json!(self.writer.record_file(&path)))
    }

    fn record_file_language(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordFileLanguage";
        let file_id = marshal::int_arg(args, 0, call, "fileId")?;
        let language = marshal::string_arg(args, 1, call, "languageIdentifier")?;
        Ok(Value::Bool(
            self.writer.record_file_language(file_id, &language),
        ))
    }

    fn record_local_symbol(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let name = marshal::string_arg(args, 0, "recordLocalSymbol", "name")?;
        Ok(json!(self.writer.record_local_symbol(&name)))
    }

    fn record_local_symbol_location(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordLocalSymbolLocation";
        let local_symbol_id = marshal::int_arg(args, 0, call, "localSymbolId")?;
        let range = marshal::source_range_arg(args, 1, call)?;
        Ok(Value::Bool(
            self.writer
                .record_local_symbol_location(local_symbol_id, &range),
        ))
    }

    fn record_atomic_source_range(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let range = marshal::source_range_arg(args, 0, "recordAtomicSourceRange")?;
        Ok(Value::Bool(self.writer.record_atomic_source_range(&range)))
    }

    fn record_error(&mut self, args: &[Value]) -> MarshalResult<Value> {
        let call = "recordError";
        let message = marshal::string_arg(args, 0, call, "message")?;
        let fatal = marshal::bool_arg(args, 1, call, "fatal")?;
        let range = marshal::source_range_arg(args, 2, call)?;
        Ok(Value::Bool(self.writer.record_error(&message, fatal, &range)))
    }
}

/// Which of the four symbol-location operations a call maps to. They share
/// one marshalling path and differ only in the backend method invoked.
#[derive(Clone, Copy)]
enum LocationTarget {
    Token,
    Scope,
    Signature,
    Qualifier,
}

impl LocationTarget {
    fn call_name(self) -> &'static str {
        match self {
            Self::Token => "recordSymbolLocation",
            Self::Scope => "recordSymbolScopeLocation",
            Self::Signature => "recordSymbolSignatureLocation",
            Self::Qualifier => "recordQualifierLocation",
        }
    }
}

/// Failure value per operation: id-returning operations fail with `0`,
/// the two error-channel setters have no result, everything else fails
/// with `false`.
fn failure_value(method: &str) -> Value {
    match method {
        "recordReference" | "recordReferenceToUnsolvedSymbol" | "recordFile"
        | "recordLocalSymbol" => json!(0),
        "setLastError" | "clearLastError" => Value::Null,
        _ => Value::Bool(false),
    }
}
