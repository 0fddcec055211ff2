//! PowerShell concrete syntax tree, as produced by the PowerShell parser.
//!
//! This mirrors the node classes of `System.Management.Automation.Language`
//! closely enough for conversion. The crate never parses PowerShell text;
//! a host process runs the real parser and hands the tree over, either in
//! memory or as JSON:
//!
//! ```json
//! { "type": "Command",
//!   "extent": { "start_line": 1, "start_column": 1, "text": "New-Object Foo" },
//!   "elements": [
//!     { "type": "StringConstantExpression", "value": "New-Object" },
//!     { "type": "StringConstantExpression", "value": "Foo" } ] }
//! ```
//!
//! The `type` tag is the host class name without its `Ast` suffix.

use serde::{Deserialize, Serialize};

pub use crate::traits::Extent;

/// A host node with its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsAst {
    #[serde(default)]
    pub extent: Extent,
    #[serde(flatten)]
    pub kind: PsAstKind,
}

/// Every host node kind the converter knows about.
///
/// Some kinds (loops with trailing conditions, `switch`, hashtables, ...) are
/// modelled only so the converter can name them when reporting that they are
/// unsupported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PsAstKind {
    ScriptBlock {
        #[serde(default)]
        param_block: Option<ParamBlock>,
        #[serde(default)]
        statements: Vec<PsAst>,
    },
    StatementBlock {
        #[serde(default)]
        statements: Vec<PsAst>,
    },
    Pipeline {
        elements: Vec<PsAst>,
    },
    CommandExpression {
        expression: Box<PsAst>,
    },
    /// First element is the command name.
    Command {
        elements: Vec<PsAst>,
    },
    /// `-Name` or `-Name:value`.
    CommandParameter {
        parameter_name: String,
        #[serde(default)]
        argument: Option<Box<PsAst>>,
    },
    AssignmentStatement {
        left: Box<PsAst>,
        /// Token kind name: `Equals`, `PlusEquals`, ...
        #[serde(default = "default_assignment_operator")]
        operator: String,
        right: Box<PsAst>,
    },
    BinaryExpression {
        left: Box<PsAst>,
        /// Token kind name: `Ieq`, `Plus`, `And`, ...
        operator: String,
        right: Box<PsAst>,
    },
    UnaryExpression {
        /// Token kind name: `PlusPlus`, `PostfixMinusMinus`, `Not`, ...
        token_kind: String,
        child: Box<PsAst>,
    },
    ConstantExpression {
        /// Textual form of the constant value.
        value: String,
    },
    StringConstantExpression {
        value: String,
    },
    /// `value` is the host's expanded text: escapes resolved, `$` references kept.
    ExpandableStringExpression {
        value: String,
    },
    VariableExpression {
        /// Variable path without the leading `$`.
        variable_path: String,
    },
    ConvertExpression {
        type_name: String,
        child: Box<PsAst>,
    },
    TypeExpression {
        type_name: String,
    },
    IfStatement {
        clauses: Vec<IfClause>,
        #[serde(default)]
        else_clause: Option<Box<PsAst>>,
    },
    WhileStatement {
        condition: Box<PsAst>,
        body: Box<PsAst>,
    },
    ForStatement {
        #[serde(default)]
        initializer: Option<Box<PsAst>>,
        #[serde(default)]
        condition: Option<Box<PsAst>>,
        #[serde(default)]
        iterator: Option<Box<PsAst>>,
        body: Box<PsAst>,
    },
    ForEachStatement {
        variable: Box<PsAst>,
        condition: Box<PsAst>,
        body: Box<PsAst>,
    },
    BreakStatement,
    ContinueStatement,
    ReturnStatement {
        #[serde(default)]
        pipeline: Option<Box<PsAst>>,
    },
    TryStatement {
        body: Box<PsAst>,
        #[serde(default)]
        catch_clauses: Vec<CatchClause>,
        #[serde(default)]
        finally: Option<Box<PsAst>>,
    },
    FunctionDefinition {
        name: String,
        #[serde(default)]
        parameters: Vec<ParameterAst>,
        body: Box<PsAst>,
    },
    Parameter(ParameterAst),
    IndexExpression {
        target: Box<PsAst>,
        index: Box<PsAst>,
    },
    InvokeMemberExpression {
        expression: Box<PsAst>,
        member: String,
        #[serde(default)]
        arguments: Vec<PsAst>,
        #[serde(default, rename = "static")]
        is_static: bool,
    },
    MemberExpression {
        expression: Box<PsAst>,
        member: String,
        #[serde(default, rename = "static")]
        is_static: bool,
    },
    ParenExpression {
        pipeline: Box<PsAst>,
    },
    /// `$( ... )`
    SubExpression {
        #[serde(default)]
        statements: Vec<PsAst>,
    },
    /// `1, 2, 3`
    ArrayLiteral {
        elements: Vec<PsAst>,
    },
    /// `@( ... )`
    ArrayExpression {
        #[serde(default)]
        statements: Vec<PsAst>,
    },

    // Kinds with no IR counterpart
    DoWhileStatement {
        condition: Box<PsAst>,
        body: Box<PsAst>,
    },
    DoUntilStatement {
        condition: Box<PsAst>,
        body: Box<PsAst>,
    },
    SwitchStatement,
    ThrowStatement {
        #[serde(default)]
        pipeline: Option<Box<PsAst>>,
    },
    Hashtable,
    ScriptBlockExpression,

    /// Any tag this model does not recognize.
    #[serde(other)]
    Unknown,
}

fn default_assignment_operator() -> String {
    "Equals".to_string()
}

/// `param( ... )` block of a script block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamBlock {
    #[serde(default)]
    pub parameters: Vec<ParameterAst>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAst {
    #[serde(default)]
    pub extent: Extent,
    /// Name without the leading `$`.
    pub name: String,
    /// Declared type name; absent for untyped parameters.
    #[serde(default)]
    pub static_type: Option<String>,
}

/// One `if`/`elseif` condition and its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfClause {
    pub condition: PsAst,
    pub body: PsAst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub extent: Extent,
    /// Exception type names; empty for a catch-all.
    #[serde(default)]
    pub catch_types: Vec<String>,
    pub body: PsAst,
}

impl PsAstKind {
    /// Host class name, used when reporting unsupported constructs.
    pub fn name(&self) -> &'static str {
        match self {
            PsAstKind::ScriptBlock { .. } => "ScriptBlock",
            PsAstKind::StatementBlock { .. } => "StatementBlock",
            PsAstKind::Pipeline { .. } => "Pipeline",
            PsAstKind::CommandExpression { .. } => "CommandExpression",
            PsAstKind::Command { .. } => "Command",
            PsAstKind::CommandParameter { .. } => "CommandParameter",
            PsAstKind::AssignmentStatement { .. } => "AssignmentStatement",
            PsAstKind::BinaryExpression { .. } => "BinaryExpression",
            PsAstKind::UnaryExpression { .. } => "UnaryExpression",
            PsAstKind::ConstantExpression { .. } => "ConstantExpression",
            PsAstKind::StringConstantExpression { .. } => "StringConstantExpression",
            PsAstKind::ExpandableStringExpression { .. } => "ExpandableStringExpression",
            PsAstKind::VariableExpression { .. } => "VariableExpression",
            PsAstKind::ConvertExpression { .. } => "ConvertExpression",
            PsAstKind::TypeExpression { .. } => "TypeExpression",
            PsAstKind::IfStatement { .. } => "IfStatement",
            PsAstKind::WhileStatement { .. } => "WhileStatement",
            PsAstKind::ForStatement { .. } => "ForStatement",
            PsAstKind::ForEachStatement { .. } => "ForEachStatement",
            PsAstKind::BreakStatement => "BreakStatement",
            PsAstKind::ContinueStatement => "ContinueStatement",
            PsAstKind::ReturnStatement { .. } => "ReturnStatement",
            PsAstKind::TryStatement { .. } => "TryStatement",
            PsAstKind::FunctionDefinition { .. } => "FunctionDefinition",
            PsAstKind::Parameter(_) => "Parameter",
            PsAstKind::IndexExpression { .. } => "IndexExpression",
            PsAstKind::InvokeMemberExpression { .. } => "InvokeMemberExpression",
            PsAstKind::MemberExpression { .. } => "MemberExpression",
            PsAstKind::ParenExpression { .. } => "ParenExpression",
            PsAstKind::SubExpression { .. } => "SubExpression",
            PsAstKind::ArrayLiteral { .. } => "ArrayLiteral",
            PsAstKind::ArrayExpression { .. } => "ArrayExpression",
            PsAstKind::DoWhileStatement { .. } => "DoWhileStatement",
            PsAstKind::DoUntilStatement { .. } => "DoUntilStatement",
            PsAstKind::SwitchStatement => "SwitchStatement",
            PsAstKind::ThrowStatement { .. } => "ThrowStatement",
            PsAstKind::Hashtable => "Hashtable",
            PsAstKind::ScriptBlockExpression => "ScriptBlockExpression",
            PsAstKind::Unknown => "Unknown",
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================
//
// Handy for hosts that build trees directly and for tests. Nodes built this
// way carry an empty extent.

impl PsAst {
    pub fn new(kind: PsAstKind) -> Self {
        Self {
            extent: Extent::default(),
            kind,
        }
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    pub fn script(statements: Vec<PsAst>) -> Self {
        Self::new(PsAstKind::ScriptBlock {
            param_block: None,
            statements,
        })
    }

    pub fn statement_block(statements: Vec<PsAst>) -> Self {
        Self::new(PsAstKind::StatementBlock { statements })
    }

    /// A single-element pipeline wrapping `expression` as a command expression.
    pub fn expr_statement(expression: PsAst) -> Self {
        Self::pipeline(vec![Self::new(PsAstKind::CommandExpression {
            expression: Box::new(expression),
        })])
    }

    pub fn pipeline(elements: Vec<PsAst>) -> Self {
        Self::new(PsAstKind::Pipeline { elements })
    }

    pub fn command(elements: Vec<PsAst>) -> Self {
        Self::new(PsAstKind::Command { elements })
    }

    pub fn parameter(name: impl Into<String>, argument: Option<PsAst>) -> Self {
        Self::new(PsAstKind::CommandParameter {
            parameter_name: name.into(),
            argument: argument.map(Box::new),
        })
    }

    pub fn assign(left: PsAst, right: PsAst) -> Self {
        Self::assign_op(left, "Equals", right)
    }

    pub fn assign_op(left: PsAst, operator: impl Into<String>, right: PsAst) -> Self {
        Self::new(PsAstKind::AssignmentStatement {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        })
    }

    pub fn binary(left: PsAst, operator: impl Into<String>, right: PsAst) -> Self {
        Self::new(PsAstKind::BinaryExpression {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        })
    }

    pub fn unary(token_kind: impl Into<String>, child: PsAst) -> Self {
        Self::new(PsAstKind::UnaryExpression {
            token_kind: token_kind.into(),
            child: Box::new(child),
        })
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Self::new(PsAstKind::ConstantExpression {
            value: value.into(),
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(PsAstKind::StringConstantExpression {
            value: value.into(),
        })
    }

    pub fn expandable(value: impl Into<String>) -> Self {
        Self::new(PsAstKind::ExpandableStringExpression {
            value: value.into(),
        })
    }

    pub fn variable(path: impl Into<String>) -> Self {
        Self::new(PsAstKind::VariableExpression {
            variable_path: path.into(),
        })
    }

    pub fn convert(type_name: impl Into<String>, child: PsAst) -> Self {
        Self::new(PsAstKind::ConvertExpression {
            type_name: type_name.into(),
            child: Box::new(child),
        })
    }

    pub fn type_expr(type_name: impl Into<String>) -> Self {
        Self::new(PsAstKind::TypeExpression {
            type_name: type_name.into(),
        })
    }

    pub fn array_literal(elements: Vec<PsAst>) -> Self {
        Self::new(PsAstKind::ArrayLiteral { elements })
    }

    pub fn paren(inner: PsAst) -> Self {
        Self::new(PsAstKind::ParenExpression {
            pipeline: Box::new(inner),
        })
    }
}
