pub mod adapter;
pub mod builder;
pub mod db;
pub mod error;
pub mod model;

pub use adapter::WriterAdapter;
pub use builder::{
    FileBuilder, LocalSymbolBuilder, ReferenceBuilder, SymbolBuilder, WriterBuilder,
};
pub use db::{DatabaseWriter, SqliteWriter, WriterStats, SUPPORTED_DATABASE_VERSION};
pub use error::{Result, WriterError};
pub use model::{
    DefinitionKind, FileId, LocalSymbolId, NameElement, NameHierarchy, ReferenceId, ReferenceKind,
    SourceRange, SymbolId, SymbolKind,
};
