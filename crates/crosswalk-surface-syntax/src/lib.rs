//! Source-to-source conversion between imperative languages.
//!
//! `crosswalk-surface-syntax` maps a host language's parser tree onto a
//! common IR and prints that IR in another language. It maps syntax plus a
//! small set of recognized idioms, not deep semantics.
//!
//! # Architecture
//!
//! ```text
//! Host parser tree        IR              Target Languages
//! ────────────────    ─────────────    ────────────────────
//! PowerShell AST  ─┐                ┌─> C#
//!   (JSON / PsAst) ┼─> Node ────────┼─> PowerShell
//! (future)        ─┘    (ir)        └─> (future)
//! ```
//!
//! Readers never parse source text. A host process runs the language's own
//! parser and hands over its tree; the PowerShell reader accepts it as a
//! [`input::powershell::PsAst`] or its JSON form.
//!
//! # Example
//!
//! ```ignore
//! use crosswalk_surface_syntax::{input, output};
//!
//! // [Foo]$x = New-Object -TypeName Bar -ArgumentList 1, 2
//! let conversion = input::read_powershell(dumped_tree_json)?;
//! let csharp = output::CSharpWriter::emit(&conversion.node);
//! // => "Foo x = new Bar(1, 2);\n"
//! ```
//!
//! # Partial coverage
//!
//! Constructs with no IR mapping either fail the conversion with
//! [`UnsupportedConstruct`] or, under [`UnsupportedPolicy::Placeholder`],
//! become literal placeholders listed in [`Conversion::diagnostics`].
//! Operators without a canonical mapping convert to `Unknown` and are
//! always listed.

pub mod config;
pub mod ir;
pub mod registry;
pub mod traits;

pub mod input;
pub mod output;

// Re-exports: IR types
pub use ir::{
    Argument, ArgumentBuilder, ArgumentList, BinaryOperator, Block, Expr, IfChainBuilder,
    IfStatement, Node, Stmt, StructureEq, TemplatePart, UnaryOperator, Visitor, template_parts,
};

// Re-exports: Traits
pub use traits::{
    Conversion, Diagnostic, Extent, ReadError, Reader, UnsupportedConstruct, Writer,
};

// Re-exports: Configuration
pub use config::{
    AdapterOptions, ConfigError, ConvertConfig, DuplicateParameters, RenderOptions,
    UnsupportedPolicy,
};

// Re-exports: Registry
pub use registry::{
    Translated, Translation, reader_for_extension, reader_for_language, readers,
    register_reader, register_writer, translations, writer_for_extension, writer_for_language,
    writers,
};

// Re-exports: Built-in readers
#[cfg(feature = "read-powershell")]
pub use input::powershell::{PowerShellAdapter, PowerShellReader};
#[cfg(feature = "read-powershell")]
pub use input::{read_powershell, read_powershell_with};

// Re-exports: Built-in writers
#[cfg(feature = "write-csharp")]
pub use output::CSharpWriter;
#[cfg(feature = "write-csharp")]
pub use output::csharp::CSharpWriterImpl;
#[cfg(feature = "write-powershell")]
pub use output::PowerShellWriter;
#[cfg(feature = "write-powershell")]
pub use output::powershell::PowerShellWriterImpl;
