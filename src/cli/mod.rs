//! CLI commands: a line-oriented JSON request driver plus small database
//! inspection helpers.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use symbol_writer::{
    DatabaseWriter, Result, SqliteWriter, WriterAdapter, WriterBuilder, WriterError,
};

#[derive(Parser)]
#[command(name = "symbol-writer")]
#[command(about = "Sourcetrail-style symbol database writer")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Serve the JSON call surface over stdin/stdout
    symbol-writer serve

    # One request per line, one response per line:
    #   {"method": "open", "args": ["index.db"]}
    #   {"method": "recordSymbol", "args": [{"nameDelimiter": "::",
    #       "nameElements": [{"prefix": "", "name": "Foo", "postfix": ""}]}]}

    # Inspect a database
    symbol-writer info --db index.db

    # Remove all records from a database
    symbol-writer clear --db index.db
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve writer calls as JSON request/response lines on stdin/stdout
    Serve,

    /// Show version and record counts for a database
    Info {
        /// Path to the symbol database
        #[arg(long, default_value = "index.db")]
        db: PathBuf,
    },

    /// Remove all records from a database
    Clear {
        /// Path to the symbol database
        #[arg(long, default_value = "index.db")]
        db: PathBuf,
    },

    /// Print version and supported database version
    Version,
}

/// One serialized request: a call name plus its ordered arguments.
#[derive(Deserialize)]
struct Request {
    method: String,
    #[serde(default)]
    args: Vec<Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Response {
    Result { result: Value },
    Error { error: String },
}

/// Handles one request line against the adapter. Unparseable lines never
/// reach the dispatch layer; they are reported on the response stream since
/// there is no call to attach a last-error diagnostic to.
fn handle_line(adapter: &mut WriterAdapter, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => Response::Result {
            result: adapter.call(&request.method, &request.args),
        },
        Err(e) => Response::Error {
            error: format!("invalid request: {e}"),
        },
    };
    // Both variants serialize to plain objects.
    serde_json::to_string(&response).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
}

/// Runs the request loop until stdin closes. The writer handle lives for
/// the whole session, so `open` and later record calls see the same state.
pub fn serve() -> Result<()> {
    tracing::info!("serving writer calls on stdin");
    let mut adapter = WriterAdapter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&mut adapter, &line);
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

pub fn info(db: &Path) -> Result<()> {
    let mut writer = SqliteWriter::new();
    if !writer.open(&db.to_string_lossy()) {
        return Err(WriterError::Writer(writer.last_error()));
    }

    println!("{}", writer.version_string());
    println!("database:           {}", db.display());
    println!(
        "database version:   {} (supported: {})",
        writer.loaded_database_version(),
        writer.supported_database_version()
    );
    println!("compatible:         {}", writer.is_compatible());

    let stats = writer.stats()?;
    println!("symbols:            {}", stats.symbols);
    println!("files:              {}", stats.files);
    println!("references:         {}", stats.references);
    println!("local symbols:      {}", stats.local_symbols);
    println!("source locations:   {}", stats.source_locations);
    println!("errors:             {}", stats.errors);

    if !writer.close() {
        return Err(WriterError::Writer(writer.last_error()));
    }
    Ok(())
}

pub fn clear(db: &Path) -> Result<()> {
    let mut builder = WriterBuilder::open(db)?;
    builder.clear()?;
    builder.close()?;
    println!("cleared {}", db.display());
    Ok(())
}

pub fn version() {
    let writer = SqliteWriter::new();
    println!("{}", writer.version_string());
    println!(
        "supported database version: {}",
        writer.supported_database_version()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_produces_result_line() {
        let mut adapter = WriterAdapter::new();
        let response = handle_line(&mut adapter, r#"{"method": "getVersionString"}"#);
        let value: Value = serde_json::from_str(&response).unwrap();
        assert!(value["result"].as_str().unwrap().starts_with("symbol-writer"));
    }

    #[test]
    fn open_and_record_share_one_handle() {
        let mut adapter = WriterAdapter::new();
        let open = handle_line(&mut adapter, r#"{"method": "open", "args": [":memory:"]}"#);
        assert_eq!(open, r#"{"result":true}"#);

        let record = handle_line(
            &mut adapter,
            r#"{"method": "recordSymbol", "args": [{"nameDelimiter": "::",
                "nameElements": [{"prefix": "", "name": "Foo", "postfix": ""}]}]}"#,
        );
        assert_eq!(record, r#"{"result":true}"#);

        let empty = handle_line(&mut adapter, r#"{"method": "isEmpty"}"#);
        assert_eq!(empty, r#"{"result":false}"#);
    }

    #[test]
    fn info_opens_reports_and_closes() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = dir.path().join("index.db");
        info(&db).unwrap();
    }

    #[test]
    fn malformed_request_reports_error() {
        let mut adapter = WriterAdapter::new();
        let response = handle_line(&mut adapter, "not json");
        let value: Value = serde_json::from_str(&response).unwrap();
        assert!(value["error"].as_str().unwrap().starts_with("invalid request"));
    }
}
