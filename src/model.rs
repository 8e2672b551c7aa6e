//! Typed records marshalled into the writer backend.
//!
//! All of these are plain value types: constructed by one call, passed by
//! reference into the backend, never retained across calls.

use serde::{Deserialize, Serialize};

/// Identifier of a recorded symbol. `0` means "no symbol" / failure.
pub type SymbolId = i64;
/// Identifier of a recorded file. `0` means failure.
pub type FileId = i64;
/// Identifier of a recorded reference. `0` means failure.
pub type ReferenceId = i64;
/// Identifier of a recorded local symbol. `0` means failure.
pub type LocalSymbolId = i64;

/// One segment of a qualified symbol name.
///
/// `prefix` and `postfix` carry non-name syntax attached to the segment,
/// e.g. a return type or a parameter list for a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameElement {
    #[serde(default)]
    pub prefix: String,
    pub name: String,
    #[serde(default)]
    pub postfix: String,
}

impl NameElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            name: name.into(),
            postfix: String::new(),
        }
    }

    pub fn with_affixes(
        prefix: impl Into<String>,
        name: impl Into<String>,
        postfix: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            postfix: postfix.into(),
        }
    }
}

/// A fully-qualified symbol name: delimiter plus ordered segments,
/// most-significant element first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameHierarchy {
    pub name_delimiter: String,
    pub name_elements: Vec<NameElement>,
}

impl NameHierarchy {
    pub fn new(name_delimiter: impl Into<String>, name_elements: Vec<NameElement>) -> Self {
        Self {
            name_delimiter: name_delimiter.into(),
            name_elements,
        }
    }

    /// Single unqualified name with an empty delimiter.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self::new("", vec![NameElement::new(name)])
    }

    /// Delimiter-joined display form, affixes included.
    pub fn qualified_name(&self) -> String {
        self.name_elements
            .iter()
            .map(|e| format!("{}{}{}", e.prefix, e.name, e.postfix))
            .collect::<Vec<_>>()
            .join(&self.name_delimiter)
    }
}

/// Location of a range of characters in a recorded source file.
/// Line and column counts start at 1; start and end are both inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub file_id: FileId,
    pub start_line: i32,
    pub start_column: i32,
    pub end_line: i32,
    pub end_column: i32,
}

impl SourceRange {
    pub fn new(
        file_id: FileId,
        start_line: i32,
        start_column: i32,
        end_line: i32,
        end_column: i32,
    ) -> Self {
        Self {
            file_id,
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// Whether a symbol definition was written by the indexed source itself
/// or inferred by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DefinitionKind {
    Implicit = 1,
    Explicit = 2,
}

impl DefinitionKind {
    /// Normalizes a numeric code: `1` is `Implicit`, every other value is
    /// treated as `Explicit`. Unknown codes are accepted rather than
    /// rejected so that callers built against a newer code table keep
    /// working.
    pub fn from_code(code: i64) -> Self {
        if code == Self::Implicit as i64 {
            Self::Implicit
        } else {
            Self::Explicit
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Kinds of symbols that can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SymbolKind {
    Type = 0,
    BuiltinType = 1,
    Module = 2,
    Namespace = 3,
    Package = 4,
    Struct = 5,
    Class = 6,
    Interface = 7,
    Annotation = 8,
    GlobalVariable = 9,
    Field = 10,
    Function = 11,
    Method = 12,
    Enum = 13,
    EnumConstant = 14,
    Typedef = 15,
    TypeParameter = 16,
    Macro = 17,
    Union = 18,
}

impl SymbolKind {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Kinds of references between two recorded symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ReferenceKind {
    TypeUsage = 0,
    Usage = 1,
    Call = 2,
    Inheritance = 3,
    Override = 4,
    TypeArgument = 5,
    TemplateSpecialization = 6,
    Include = 7,
    Import = 8,
    MacroUsage = 9,
    AnnotationUsage = 10,
}

impl ReferenceKind {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_kind_normalizes_implicit_code() {
        assert_eq!(DefinitionKind::from_code(1), DefinitionKind::Implicit);
    }

    #[test]
    fn definition_kind_falls_back_to_explicit() {
        assert_eq!(DefinitionKind::from_code(2), DefinitionKind::Explicit);
        assert_eq!(DefinitionKind::from_code(0), DefinitionKind::Explicit);
        assert_eq!(DefinitionKind::from_code(999), DefinitionKind::Explicit);
        assert_eq!(DefinitionKind::from_code(-1), DefinitionKind::Explicit);
    }

    #[test]
    fn qualified_name_joins_elements_in_order() {
        let hierarchy = NameHierarchy::new(
            "::",
            vec![
                NameElement::new("app"),
                NameElement::with_affixes("void ", "run", "()"),
            ],
        );
        assert_eq!(hierarchy.qualified_name(), "app::void run()");
    }

    #[test]
    fn name_hierarchy_serializes_camel_case() {
        let hierarchy = NameHierarchy::unqualified("Foo");
        let json = serde_json::to_value(&hierarchy).unwrap();
        assert!(json.get("nameDelimiter").is_some());
        assert!(json.get("nameElements").is_some());
    }
}
