//! Language-neutral IR shared by every reader and writer.
//!
//! The tree is closed: [`Stmt`] and [`Expr`] are exhaustive enums, and the
//! structural pieces (argument lists, declarators, catch clauses, ...) are
//! plain structs. A parent owns its children exclusively. Trees are built
//! bottom-up by a reader and handed to a writer by shared reference, so
//! nothing mutates a tree once rendering starts.
//!
//! Two constructs are naturally built in two phases (a command argument that
//! receives its value from the following token, and an if/else-if chain);
//! see [`ArgumentBuilder`] and [`IfChainBuilder`].

mod builder;
mod structure_eq;
mod template;

pub use builder::{ArgumentBuilder, IfChainBuilder};
pub use structure_eq::StructureEq;
pub use template::{TemplatePart, template_parts};

use serde::{Deserialize, Serialize};

/// Root of a converted tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Stmt(Stmt),
    Expr(Expr),
}

impl Node {
    /// Dispatch to the visitor method for this node's family.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Node::Stmt(stmt) => visitor.visit_stmt(stmt),
            Node::Expr(expr) => visitor.visit_expr(expr),
        }
    }

    pub fn as_stmt(&self) -> Option<&Stmt> {
        match self {
            Node::Stmt(stmt) => Some(stmt),
            Node::Expr(_) => None,
        }
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Node::Expr(expr) => Some(expr),
            Node::Stmt(Stmt::Expr(expr)) => Some(expr),
            Node::Stmt(_) => None,
        }
    }

    /// Statement view of this node; bare expressions become expression statements.
    pub fn into_stmt(self) -> Stmt {
        match self {
            Node::Stmt(stmt) => stmt,
            Node::Expr(expr) => Stmt::Expr(expr),
        }
    }
}

impl From<Stmt> for Node {
    fn from(stmt: Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        Node::Expr(expr)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Node::Stmt(Stmt::Block(block))
    }
}

/// Double dispatch over the two node families.
///
/// Implementors match exhaustively inside each method; there is no default
/// implementation, so a new variant is a compile error in every writer.
pub trait Visitor {
    type Output;

    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Output;

    fn visit_expr(&mut self, expr: &Expr) -> Self::Output;
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Expression evaluated for its effect.
    Expr(Expr),

    Block(Block),

    /// `<type> <name> = <initializer>`
    VariableDeclaration(VariableDeclaration),

    MethodDeclaration(MethodDeclaration),

    If(IfStatement),

    For {
        initializer: Option<Box<Stmt>>,
        condition: Option<Expr>,
        iterator: Option<Expr>,
        body: Box<Stmt>,
    },

    ForEach {
        variable: String,
        iterable: Expr,
        body: Box<Stmt>,
    },

    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Break,

    Continue,

    /// `None` when the source carries no explicit value.
    Return(Option<Expr>),

    Try(TryStatement),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub type_name: String,
    pub declarator: VariableDeclarator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub name: String,
    pub initializer: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Absent when the source declares no type.
    pub type_name: Option<String>,
    pub name: String,
}

impl Parameter {
    pub fn new(type_name: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.map(str::to_string),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub arguments: ArgumentList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
}

/// One link of a conditional chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub else_clause: Option<Box<ElseClause>>,
}

impl IfStatement {
    /// Iterate over this conditional and every chained `else if`.
    pub fn chain(&self) -> IfChain<'_> {
        IfChain { next: Some(self) }
    }

    /// The terminal `else` block, if the chain has one.
    pub fn terminal_else(&self) -> Option<&Block> {
        let last = self.chain().last()?;
        match last.else_clause.as_deref() {
            Some(ElseClause::Block(block)) => Some(block),
            _ => None,
        }
    }
}

pub struct IfChain<'a> {
    next: Option<&'a IfStatement>,
}

impl<'a> Iterator for IfChain<'a> {
    type Item = &'a IfStatement;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.else_clause.as_deref() {
            Some(ElseClause::If(chained)) => Some(chained),
            _ => None,
        };
        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElseClause {
    /// `else if`
    If(IfStatement),
    /// Terminal `else`
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryStatement {
    pub body: Block,
    pub catches: Vec<Catch>,
    pub finally: Option<Finally>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catch {
    /// `None` for a catch-all clause.
    pub declaration: Option<CatchDeclaration>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchDeclaration {
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finally {
    pub body: Block,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Source text of a constant, emitted verbatim.
    Literal(String),

    StringConstant(String),

    /// Expanded string text with embedded `$` references.
    ///
    /// Escapes are already resolved, so every character outside a reference
    /// is literal. Writers split the body with [`template_parts`] and encode
    /// the text for their own string syntax.
    TemplateStringConstant(String),

    Identifier(String),

    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    PrefixUnary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    PostfixUnary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    Cast {
        type_name: String,
        operand: Box<Expr>,
    },

    Parenthesized(Box<Expr>),

    /// `target.member`; `is_static` marks type-level access (`[T]::Member` in PowerShell).
    MemberAccess {
        target: Box<Expr>,
        member: String,
        is_static: bool,
    },

    ElementAccess {
        target: Box<Expr>,
        index: BracketedArgumentList,
    },

    Invocation(Invocation),

    ObjectCreation {
        type_name: String,
        arguments: ArgumentList,
    },

    /// `element_type` is `None` when the source array is untyped.
    ArrayCreation {
        element_type: Option<String>,
        elements: Vec<Expr>,
    },

    /// `op` is set for compound forms: `Some(Add)` is `target += value`.
    Assignment {
        target: Box<Expr>,
        op: Option<BinaryOperator>,
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub callee: Box<Expr>,
    pub arguments: ArgumentList,
}

impl Invocation {
    pub fn new(callee: Expr, arguments: ArgumentList) -> Self {
        Self {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Callee name when the callee is a plain identifier.
    pub fn callee_name(&self) -> Option<&str> {
        match self.callee.as_ref() {
            Expr::Identifier(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: Option<String>,
    pub expression: Option<Expr>,
}

impl Argument {
    pub fn positional(expression: Expr) -> Self {
        Self {
            name: None,
            expression: Some(expression),
        }
    }

    pub fn named(name: impl Into<String>, expression: Expr) -> Self {
        Self {
            name: Some(name.into()),
            expression: Some(expression),
        }
    }

    /// A name with no value, such as a PowerShell switch parameter.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            expression: None,
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    }
}

/// Ordered arguments; order is positional and must be preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentList {
    pub arguments: Vec<Argument>,
}

impl ArgumentList {
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self { arguments }
    }

    pub fn positional(expressions: Vec<Expr>) -> Self {
        Self::new(expressions.into_iter().map(Argument::positional).collect())
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// First argument with the given name (case-insensitive).
    pub fn find_named(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|arg| arg.has_name(name))
    }
}

/// Index arguments, always wrapped even for a single index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketedArgumentList {
    pub arguments: ArgumentList,
}

impl BracketedArgumentList {
    pub fn new(arguments: ArgumentList) -> Self {
        Self { arguments }
    }
}

/// Canonical binary operators, independent of any language's spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    ExclusiveOr,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LeftShift,
    RightShift,
    Is,
    As,
    /// Token with no canonical mapping.
    Unknown,
}

/// Canonical unary operators. Prefix/postfix placement lives on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Increment,
    Decrement,
    Not,
    Negate,
    Plus,
    BitwiseNot,
    Unknown,
}

// ============================================================================
// Constructors
// ============================================================================

impl Expr {
    pub fn literal(text: impl Into<String>) -> Self {
        Expr::Literal(text.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::StringConstant(value.into())
    }

    pub fn template(value: impl Into<String>) -> Self {
        Expr::TemplateStringConstant(value.into())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn prefix(op: UnaryOperator, operand: Expr) -> Self {
        Expr::PrefixUnary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn postfix(op: UnaryOperator, operand: Expr) -> Self {
        Expr::PostfixUnary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn cast(type_name: impl Into<String>, operand: Expr) -> Self {
        Expr::Cast {
            type_name: type_name.into(),
            operand: Box::new(operand),
        }
    }

    pub fn paren(inner: Expr) -> Self {
        Expr::Parenthesized(Box::new(inner))
    }

    pub fn member(target: Expr, member: impl Into<String>) -> Self {
        Expr::MemberAccess {
            target: Box::new(target),
            member: member.into(),
            is_static: false,
        }
    }

    pub fn static_member(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        Expr::MemberAccess {
            target: Box::new(Expr::ident(type_name)),
            member: member.into(),
            is_static: true,
        }
    }

    pub fn index(target: Expr, index: Expr) -> Self {
        Expr::ElementAccess {
            target: Box::new(target),
            index: BracketedArgumentList::new(ArgumentList::positional(vec![index])),
        }
    }

    pub fn call(callee: Expr, arguments: ArgumentList) -> Self {
        Expr::Invocation(Invocation::new(callee, arguments))
    }

    pub fn new_object(type_name: impl Into<String>, arguments: ArgumentList) -> Self {
        Expr::ObjectCreation {
            type_name: type_name.into(),
            arguments,
        }
    }

    pub fn array(element_type: Option<String>, elements: Vec<Expr>) -> Self {
        Expr::ArrayCreation {
            element_type,
            elements,
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assignment {
            target: Box::new(target),
            op: None,
            value: Box::new(value),
        }
    }

    pub fn compound_assign(target: Expr, op: BinaryOperator, value: Expr) -> Self {
        Expr::Assignment {
            target: Box::new(target),
            op: Some(op),
            value: Box::new(value),
        }
    }
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn block(statements: Vec<Stmt>) -> Self {
        Stmt::Block(Block::new(statements))
    }

    pub fn var_decl(type_name: impl Into<String>, name: impl Into<String>, initializer: Expr) -> Self {
        Stmt::VariableDeclaration(VariableDeclaration {
            type_name: type_name.into(),
            declarator: VariableDeclarator {
                name: name.into(),
                initializer,
            },
        })
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Self {
        Stmt::While {
            condition,
            body: Box::new(body),
        }
    }

    pub fn for_loop(
        initializer: Option<Stmt>,
        condition: Option<Expr>,
        iterator: Option<Expr>,
        body: Stmt,
    ) -> Self {
        Stmt::For {
            initializer: initializer.map(Box::new),
            condition,
            iterator,
            body: Box::new(body),
        }
    }

    pub fn for_each(variable: impl Into<String>, iterable: Expr, body: Stmt) -> Self {
        Stmt::ForEach {
            variable: variable.into(),
            iterable,
            body: Box::new(body),
        }
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return(value)
    }

    pub fn method(name: impl Into<String>, parameters: Vec<Parameter>, body: Block) -> Self {
        Stmt::MethodDeclaration(MethodDeclaration {
            name: name.into(),
            parameters,
            body,
            modifiers: vec!["public".into()],
            attributes: Vec::new(),
        })
    }

    pub fn try_stmt(body: Block, catches: Vec<Catch>, finally: Option<Block>) -> Self {
        Stmt::Try(TryStatement {
            body,
            catches,
            finally: finally.map(|body| Finally { body }),
        })
    }
}

impl Catch {
    pub fn new(type_name: Option<&str>, body: Block) -> Self {
        Self {
            declaration: type_name.map(|t| CatchDeclaration {
                type_name: t.to_string(),
            }),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_as_expr_sees_through_expression_statement() {
        let node = Node::Stmt(Stmt::expr(Expr::ident("x")));
        assert_eq!(node.as_expr(), Some(&Expr::ident("x")));
        assert!(Node::Stmt(Stmt::Break).as_expr().is_none());
    }

    #[test]
    fn test_find_named_is_case_insensitive() {
        let args = ArgumentList::new(vec![
            Argument::positional(Expr::literal("1")),
            Argument::named("TypeName", Expr::string("Foo")),
        ]);
        let found = args.find_named("typename").expect("named argument");
        assert_eq!(found.expression, Some(Expr::string("Foo")));
        assert!(args.find_named("ArgumentList").is_none());
    }

    #[test]
    fn test_index_wraps_single_index() {
        match Expr::index(Expr::ident("a"), Expr::literal("0")) {
            Expr::ElementAccess { index, .. } => assert_eq!(index.arguments.len(), 1),
            other => panic!("expected ElementAccess, got {other:?}"),
        }
    }

    #[test]
    fn test_visitor_dispatch() {
        struct Counter {
            stmts: usize,
            exprs: usize,
        }

        impl Visitor for Counter {
            type Output = ();

            fn visit_stmt(&mut self, _stmt: &Stmt) {
                self.stmts += 1;
            }

            fn visit_expr(&mut self, _expr: &Expr) {
                self.exprs += 1;
            }
        }

        let mut counter = Counter { stmts: 0, exprs: 0 };
        Node::from(Stmt::Break).accept(&mut counter);
        Node::from(Expr::ident("x")).accept(&mut counter);
        Node::from(Block::default()).accept(&mut counter);
        assert_eq!((counter.stmts, counter.exprs), (2, 1));
    }
}
