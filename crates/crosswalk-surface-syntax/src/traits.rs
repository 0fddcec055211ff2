//! Traits for language readers and writers, and the conditions they report.

use crate::ir::Node;
use serde::{Deserialize, Serialize};

/// Source position of a host node. All fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extent {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    /// Source text covered by the node.
    pub text: String,
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// A host construct the reader has no IR mapping for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unsupported construct {kind} at {extent}")]
pub struct UnsupportedConstruct {
    /// Host node kind, e.g. `SwitchStatement`.
    pub kind: String,
    pub extent: Extent,
}

impl UnsupportedConstruct {
    pub fn new(kind: impl Into<String>, extent: Extent) -> Self {
        Self {
            kind: kind.into(),
            extent,
        }
    }
}

/// Non-fatal condition recorded while converting.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Replaced by a placeholder node.
    Unsupported(UnsupportedConstruct),
    /// Operator token with no canonical mapping; the node carries `Unknown`.
    UnknownOperator { token: String, extent: Extent },
}

/// A converted tree together with everything that was approximated.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub node: Node,
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// True when nothing was substituted or left unmapped.
    pub fn is_exact(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Error that can occur when reading a syntax tree into IR.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("malformed syntax tree: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Unsupported(#[from] UnsupportedConstruct),
}

/// A reader converts a host language's syntax tree into the IR.
///
/// Readers never parse raw source text; the input is the serialized tree
/// produced by that language's own parser.
pub trait Reader: Send + Sync {
    /// Language identifier (e.g., "powershell").
    fn language(&self) -> &'static str;

    /// Source file extensions of this language (e.g., &["ps1", "psm1"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Convert a serialized syntax tree into the IR.
    fn read(&self, syntax_tree: &str) -> Result<Conversion, ReadError>;
}

/// A writer emits the IR as source code in a target language.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "csharp").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "cs").
    fn extension(&self) -> &'static str;

    /// Emit the IR as source code. Never fails for a well-formed tree.
    fn write(&self, node: &Node) -> String;
}
