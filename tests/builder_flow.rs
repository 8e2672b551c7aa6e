//! Integration tests for the fluent builder layer.

use tempfile::TempDir;

use symbol_writer::{
    DatabaseWriter, NameElement, NameHierarchy, ReferenceKind, SqliteWriter, SymbolKind,
    WriterBuilder, WriterError,
};

fn stats_of(db_path: &std::path::Path) -> symbol_writer::WriterStats {
    let mut writer = SqliteWriter::new();
    assert!(writer.open(&db_path.to_string_lossy()));
    let stats = writer.stats().unwrap();
    writer.close();
    stats
}

#[test]
fn scoped_session_records_and_commits() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    WriterBuilder::open_scoped(&db_path, |builder| {
        let (file_id, class_range, method_range) = {
            let mut file = builder.create_file("src/app.cpp")?;
            file.as_language("cpp")?;
            (file.file_id(), file.at(1, 7, 1, 9), file.at(3, 5, 3, 7))
        };
        assert_ne!(file_id, 0);

        let mut class_symbol = builder.create_symbol(NameHierarchy::new(
            "::",
            vec![NameElement::new("App")],
        ))?;
        class_symbol
            .of_kind(SymbolKind::Class)?
            .explicitly()?
            .at_location(class_range)?;

        let mut method = class_symbol.create_child(NameElement::with_affixes("void ", "run", "()"))?;
        method
            .of_kind(SymbolKind::Method)?
            .explicitly()?
            .at_location(method_range)?
            .with_signature(method_range)?;
        assert_eq!(method.hierarchy().qualified_name(), "App::void run()");

        Ok(())
    })
    .unwrap();

    let stats = stats_of(&db_path);
    assert_eq!(stats.symbols, 2);
    assert_eq!(stats.files, 1);
    assert_eq!(stats.source_locations, 3);
}

#[test]
fn references_and_local_symbols_flow() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    WriterBuilder::open_scoped(&db_path, |builder| {
        let range = {
            let file = builder.create_file("src/main.cpp")?;
            file.at(5, 3, 5, 9)
        };

        let callee_id = builder.create_named_symbol("helper")?.symbol_id();
        let mut caller = builder.create_named_symbol("main")?;
        caller
            .references(callee_id, ReferenceKind::Call)?
            .at_location(range)?
            .as_ambiguous()?;
        caller.references_unsolved(ReferenceKind::Usage, range)?;

        let mut local = builder.create_local_symbol("counter")?;
        local.at_location(range)?;

        builder.record_error("stray semicolon", range)?;
        Ok(())
    })
    .unwrap();

    let stats = stats_of(&db_path);
    assert_eq!(stats.symbols, 2);
    assert_eq!(stats.references, 2);
    assert_eq!(stats.local_symbols, 1);
    assert_eq!(stats.errors, 1);
}

#[test]
fn failed_session_rolls_back() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    let outcome = WriterBuilder::open_scoped(&db_path, |builder| {
        builder.create_named_symbol("doomed")?;
        Err(WriterError::writer("indexer gave up"))
    });
    assert!(outcome.is_err());

    let stats = stats_of(&db_path);
    assert_eq!(stats.symbols, 0);
}

#[test]
fn commit_failure_still_closes_the_session() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    // Ending the transaction inside the callback makes the session's own
    // commit fail afterwards.
    let outcome = WriterBuilder::open_scoped(&db_path, |builder| {
        builder.create_named_symbol("early")?;
        builder.commit_transaction()?;
        Ok(())
    });
    match outcome.unwrap_err() {
        WriterError::Writer(message) => assert_eq!(message, "no transaction is open"),
        other => panic!("unexpected error: {other}"),
    }

    // The handle was closed on the failure path; the database stays usable
    // and holds what the callback committed.
    WriterBuilder::open_scoped(&db_path, |builder| {
        builder.create_named_symbol("later")?;
        Ok(())
    })
    .unwrap();
    let stats = stats_of(&db_path);
    assert_eq!(stats.symbols, 2);
}

#[test]
fn open_and_clear_scoped_discards_previous_records() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    WriterBuilder::open_scoped(&db_path, |builder| {
        builder.create_named_symbol("old")?;
        Ok(())
    })
    .unwrap();

    WriterBuilder::open_and_clear_scoped(&db_path, |builder| {
        builder.create_named_symbol("new")?;
        Ok(())
    })
    .unwrap();

    let stats = stats_of(&db_path);
    assert_eq!(stats.symbols, 1);
}

#[test]
fn backend_failures_become_writer_errors() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    let mut builder = WriterBuilder::open(&db_path).unwrap();
    let error = builder.commit_transaction().unwrap_err();
    match error {
        WriterError::Writer(message) => assert_eq!(message, "no transaction is open"),
        other => panic!("unexpected error: {other}"),
    }
    builder.close().unwrap();
}

#[test]
fn symbol_ids_are_stable_across_sessions() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("index.db");

    let mut first_id = 0;
    WriterBuilder::open_scoped(&db_path, |builder| {
        first_id = builder.create_named_symbol("stable")?.symbol_id();
        Ok(())
    })
    .unwrap();

    let mut second_id = 0;
    WriterBuilder::open_scoped(&db_path, |builder| {
        second_id = builder.create_named_symbol("stable")?.symbol_id();
        Ok(())
    })
    .unwrap();

    assert_eq!(first_id, second_id);
    assert_ne!(first_id, 0);
}
