//! PowerShell reader - converts the PowerShell parser's syntax tree into IR.
//!
//! The tree arrives as a [`PsAst`], either built in memory or decoded from
//! the JSON dump of an external parser host (see [`ast`]). Conversion is a
//! single recursive walk; children are converted in source order so that
//! anything order-sensitive downstream (argument evaluation, diagnostics)
//! sees the source's left-to-right order.

pub mod ast;
pub mod idioms;
pub mod operators;

pub use ast::{CatchClause, IfClause, ParamBlock, ParameterAst, PsAst, PsAstKind};

use crate::config::{AdapterOptions, DuplicateParameters, UnsupportedPolicy};
use crate::ir::*;
use crate::traits::{Conversion, Diagnostic, Extent, ReadError, Reader, UnsupportedConstruct};
use operators::Fixity;

/// Static instance of the PowerShell reader for registry.
pub static POWERSHELL_READER: PowerShellReader = PowerShellReader;

/// PowerShell reader over JSON-serialized parser trees.
pub struct PowerShellReader;

impl Reader for PowerShellReader {
    fn language(&self) -> &'static str {
        "powershell"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ps1", "psm1"]
    }

    fn read(&self, syntax_tree: &str) -> Result<Conversion, ReadError> {
        read_powershell(syntax_tree)
    }
}

/// Decode a JSON PowerShell tree and convert it with default options.
pub fn read_powershell(syntax_tree: &str) -> Result<Conversion, ReadError> {
    read_powershell_with(syntax_tree, &AdapterOptions::default())
}

/// Decode a JSON PowerShell tree and convert it with the given options.
pub fn read_powershell_with(
    syntax_tree: &str,
    options: &AdapterOptions,
) -> Result<Conversion, ReadError> {
    let root: PsAst = serde_json::from_str(syntax_tree)?;
    Ok(PowerShellAdapter::new(options.clone()).convert(&root)?)
}

/// Converts PowerShell trees into IR.
#[derive(Debug, Clone, Default)]
pub struct PowerShellAdapter {
    options: AdapterOptions,
}

impl PowerShellAdapter {
    pub fn new(options: AdapterOptions) -> Self {
        Self { options }
    }

    /// Convert one tree. A script block root becomes a [`Block`].
    ///
    /// Under [`UnsupportedPolicy::Error`] the first unmappable construct is
    /// returned as the error. Otherwise it is replaced by a placeholder and
    /// listed in [`Conversion::diagnostics`].
    pub fn convert(&self, root: &PsAst) -> Result<Conversion, UnsupportedConstruct> {
        tracing::trace!(kind = root.kind.name(), "converting PowerShell tree");
        let mut ctx = ConvertContext::new(&self.options);
        let stmt = ctx.convert_stmt(root)?;
        Ok(Conversion {
            node: Node::Stmt(stmt),
            diagnostics: ctx.diagnostics,
        })
    }
}

type ConvertResult<T> = Result<T, UnsupportedConstruct>;

struct ConvertContext<'a> {
    options: &'a AdapterOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ConvertContext<'a> {
    fn new(options: &'a AdapterOptions) -> Self {
        Self {
            options,
            diagnostics: Vec::new(),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn convert_stmt(&mut self, node: &PsAst) -> ConvertResult<Stmt> {
        match &node.kind {
            PsAstKind::ScriptBlock {
                param_block,
                statements,
            } => {
                let mut converted = Vec::with_capacity(statements.len() + 1);
                // A script-level param() has no IR home; only function bodies harvest it.
                if param_block.as_ref().is_some_and(|p| !p.parameters.is_empty()) {
                    converted.push(Stmt::Expr(self.unsupported("ParamBlock", &node.extent)?));
                }
                converted.extend(self.convert_statements(statements)?);
                Ok(Stmt::Block(Block::new(converted)))
            }

            PsAstKind::StatementBlock { statements } => {
                let mut converted = self.convert_statements(statements)?;
                if converted.len() == 1 {
                    if let Some(single) = converted.pop() {
                        return Ok(single);
                    }
                }
                Ok(Stmt::Block(Block::new(converted)))
            }

            PsAstKind::AssignmentStatement {
                left,
                operator,
                right,
            } => {
                if operator == "Equals" {
                    if let Some((type_name, name)) = typed_variable(left) {
                        let initializer = self.convert_expr(right)?;
                        return Ok(Stmt::var_decl(type_name, name, initializer));
                    }
                }
                self.convert_assignment(node, left, operator, right)
                    .map(Stmt::Expr)
            }

            PsAstKind::IfStatement {
                clauses,
                else_clause,
            } => self.convert_if(node, clauses, else_clause.as_deref()),

            PsAstKind::WhileStatement { condition, body } => {
                let condition = self.convert_expr(condition)?;
                let body = self.convert_stmt(body)?;
                Ok(Stmt::while_loop(condition, body))
            }

            PsAstKind::ForStatement {
                initializer,
                condition,
                iterator,
                body,
            } => {
                let initializer = initializer
                    .as_deref()
                    .map(|n| self.convert_stmt(n))
                    .transpose()?;
                let condition = condition
                    .as_deref()
                    .map(|n| self.convert_expr(n))
                    .transpose()?;
                let iterator = iterator
                    .as_deref()
                    .map(|n| self.convert_expr(n))
                    .transpose()?;
                let body = self.convert_stmt(body)?;
                Ok(Stmt::for_loop(initializer, condition, iterator, body))
            }

            PsAstKind::ForEachStatement {
                variable,
                condition,
                body,
            } => {
                let PsAstKind::VariableExpression { variable_path } = &variable.kind else {
                    return self.unsupported_node(variable).map(Stmt::Expr);
                };
                let iterable = self.convert_expr(condition)?;
                let body = self.convert_stmt(body)?;
                Ok(Stmt::for_each(variable_path, iterable, body))
            }

            PsAstKind::BreakStatement => Ok(Stmt::Break),
            PsAstKind::ContinueStatement => Ok(Stmt::Continue),

            PsAstKind::ReturnStatement { pipeline } => {
                let value = pipeline
                    .as_deref()
                    .map(|n| self.convert_expr(n))
                    .transpose()?;
                Ok(Stmt::return_stmt(value))
            }

            PsAstKind::TryStatement {
                body,
                catch_clauses,
                finally,
            } => self.convert_try(body, catch_clauses, finally.as_deref()),

            PsAstKind::FunctionDefinition {
                name,
                parameters,
                body,
            } => self.convert_function(name, parameters, body),

            PsAstKind::DoWhileStatement { .. }
            | PsAstKind::DoUntilStatement { .. }
            | PsAstKind::SwitchStatement
            | PsAstKind::ThrowStatement { .. } => self.unsupported_node(node).map(Stmt::Expr),

            _ => self.convert_expr(node).map(Stmt::Expr),
        }
    }

    fn convert_statements(&mut self, statements: &[PsAst]) -> ConvertResult<Vec<Stmt>> {
        statements.iter().map(|s| self.convert_stmt(s)).collect()
    }

    /// Convert a body that must be a block even when it holds one statement.
    fn convert_block(&mut self, node: &PsAst) -> ConvertResult<Block> {
        match &node.kind {
            PsAstKind::StatementBlock { statements } | PsAstKind::ScriptBlock { statements, .. } => {
                Ok(Block::new(self.convert_statements(statements)?))
            }
            _ => match self.convert_stmt(node)? {
                Stmt::Block(block) => Ok(block),
                other => Ok(Block::new(vec![other])),
            },
        }
    }

    fn convert_if(
        &mut self,
        node: &PsAst,
        clauses: &[IfClause],
        else_clause: Option<&PsAst>,
    ) -> ConvertResult<Stmt> {
        let Some((first, rest)) = clauses.split_first() else {
            return self.unsupported_node(node).map(Stmt::Expr);
        };

        let condition = self.convert_expr(&first.condition)?;
        let body = self.convert_stmt(&first.body)?;
        let mut chain = IfChainBuilder::new(condition, body);

        for clause in rest {
            let condition = self.convert_expr(&clause.condition)?;
            let body = self.convert_stmt(&clause.body)?;
            chain = chain.else_if(condition, body);
        }

        if let Some(otherwise) = else_clause {
            chain = chain.otherwise(self.convert_block(otherwise)?);
        }

        Ok(Stmt::If(chain.build()))
    }

    fn convert_try(
        &mut self,
        body: &PsAst,
        catch_clauses: &[CatchClause],
        finally: Option<&PsAst>,
    ) -> ConvertResult<Stmt> {
        let body = self.convert_block(body)?;

        let mut catches = Vec::with_capacity(catch_clauses.len());
        for clause in catch_clauses {
            let block = self.convert_block(&clause.body)?;
            if clause.catch_types.is_empty() {
                catches.push(Catch::new(None, block));
            } else {
                // `catch [A], [B] { }` shares one body across several types.
                for type_name in &clause.catch_types {
                    catches.push(Catch::new(Some(type_name.as_str()), block.clone()));
                }
            }
        }

        let finally = finally.map(|n| self.convert_block(n)).transpose()?;
        Ok(Stmt::try_stmt(body, catches, finally))
    }

    fn convert_function(
        &mut self,
        name: &str,
        parameters: &[ParameterAst],
        body: &PsAst,
    ) -> ConvertResult<Stmt> {
        let mut harvested: Vec<Parameter> = parameters.iter().map(ir_parameter).collect();
        if let PsAstKind::ScriptBlock {
            param_block: Some(param_block),
            ..
        } = &body.kind
        {
            harvested.extend(param_block.parameters.iter().map(ir_parameter));
        }
        let parameters = self.resolve_duplicates(name, harvested);

        let body = self.convert_block(body)?;
        Ok(Stmt::method(name, parameters, body))
    }

    fn resolve_duplicates(&self, function: &str, parameters: Vec<Parameter>) -> Vec<Parameter> {
        if self.options.duplicate_parameters == DuplicateParameters::Preserve {
            return parameters;
        }

        let mut kept: Vec<Parameter> = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if let Some(earlier) = kept
                .iter()
                .position(|p| p.name.eq_ignore_ascii_case(&parameter.name))
            {
                tracing::debug!(
                    function,
                    parameter = %parameter.name,
                    "dropping earlier declaration of duplicate parameter"
                );
                kept.remove(earlier);
            }
            kept.push(parameter);
        }
        kept
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn convert_expr(&mut self, node: &PsAst) -> ConvertResult<Expr> {
        match &node.kind {
            PsAstKind::Pipeline { elements } => match elements.as_slice() {
                [single] => self.convert_expr(single),
                _ => self.unsupported_node(node),
            },

            PsAstKind::CommandExpression { expression } => self.convert_expr(expression),

            PsAstKind::Command { elements } => self.convert_command(node, elements),

            PsAstKind::AssignmentStatement {
                left,
                operator,
                right,
            } => self.convert_assignment(node, left, operator, right),

            PsAstKind::BinaryExpression {
                left,
                operator,
                right,
            } => {
                let left = self.convert_expr(left)?;
                let op = operators::binary_operator(operator);
                if op == BinaryOperator::Unknown {
                    self.unknown_operator(operator, &node.extent);
                }
                let right = self.convert_expr(right)?;
                Ok(Expr::binary(left, op, right))
            }

            PsAstKind::UnaryExpression { token_kind, child } => {
                let (op, fixity) = operators::unary_operator(token_kind);
                if op == UnaryOperator::Unknown {
                    self.unknown_operator(token_kind, &node.extent);
                }
                let operand = self.convert_expr(child)?;
                Ok(match fixity {
                    Fixity::Prefix => Expr::prefix(op, operand),
                    Fixity::Postfix => Expr::postfix(op, operand),
                })
            }

            PsAstKind::ConstantExpression { value } => Ok(Expr::literal(value)),
            PsAstKind::StringConstantExpression { value } => Ok(Expr::string(value)),
            PsAstKind::ExpandableStringExpression { value } => Ok(Expr::template(value)),
            PsAstKind::VariableExpression { variable_path } => Ok(Expr::ident(variable_path)),
            PsAstKind::TypeExpression { type_name } => Ok(Expr::ident(type_name)),

            PsAstKind::ConvertExpression { type_name, child } => {
                let operand = self.convert_expr(child)?;
                Ok(Expr::cast(type_name, operand))
            }

            PsAstKind::IndexExpression { target, index } => {
                let target = self.convert_expr(target)?;
                let index = self.convert_expr(index)?;
                Ok(Expr::index(target, index))
            }

            PsAstKind::InvokeMemberExpression {
                expression,
                member,
                arguments,
                is_static,
            } => {
                let target = self.convert_expr(expression)?;
                let arguments = arguments
                    .iter()
                    .map(|arg| self.convert_expr(arg))
                    .collect::<ConvertResult<Vec<_>>>()?;
                let callee = Expr::MemberAccess {
                    target: Box::new(target),
                    member: member.clone(),
                    is_static: *is_static,
                };
                Ok(Expr::call(callee, ArgumentList::positional(arguments)))
            }

            PsAstKind::MemberExpression {
                expression,
                member,
                is_static,
            } => {
                let target = self.convert_expr(expression)?;
                Ok(Expr::MemberAccess {
                    target: Box::new(target),
                    member: member.clone(),
                    is_static: *is_static,
                })
            }

            PsAstKind::ParenExpression { pipeline } => {
                let inner = self.convert_expr(pipeline)?;
                Ok(Expr::paren(inner))
            }

            PsAstKind::SubExpression { statements } => match statements.as_slice() {
                [single] => Ok(Expr::paren(self.convert_expr(single)?)),
                _ => self.unsupported_node(node),
            },

            PsAstKind::ArrayLiteral { elements } => {
                let elements = self.convert_exprs(elements)?;
                Ok(Expr::array(None, elements))
            }

            PsAstKind::ArrayExpression { statements } => {
                let mut elements = self.convert_exprs(statements)?;
                // `@(1, 2)` holds one array literal; its elements are the array's.
                let single_array = matches!(
                    elements.as_slice(),
                    [Expr::ArrayCreation {
                        element_type: None,
                        ..
                    }]
                );
                if single_array {
                    if let Some(Expr::ArrayCreation { elements: inner, .. }) = elements.pop() {
                        elements = inner;
                    }
                }
                Ok(Expr::array(None, elements))
            }

            PsAstKind::ScriptBlock { .. }
            | PsAstKind::StatementBlock { .. }
            | PsAstKind::CommandParameter { .. }
            | PsAstKind::IfStatement { .. }
            | PsAstKind::WhileStatement { .. }
            | PsAstKind::ForStatement { .. }
            | PsAstKind::ForEachStatement { .. }
            | PsAstKind::BreakStatement
            | PsAstKind::ContinueStatement
            | PsAstKind::ReturnStatement { .. }
            | PsAstKind::TryStatement { .. }
            | PsAstKind::FunctionDefinition { .. }
            | PsAstKind::Parameter(_)
            | PsAstKind::DoWhileStatement { .. }
            | PsAstKind::DoUntilStatement { .. }
            | PsAstKind::SwitchStatement
            | PsAstKind::ThrowStatement { .. }
            | PsAstKind::Hashtable
            | PsAstKind::ScriptBlockExpression
            | PsAstKind::Unknown => self.unsupported_node(node),
        }
    }

    fn convert_exprs(&mut self, nodes: &[PsAst]) -> ConvertResult<Vec<Expr>> {
        nodes.iter().map(|n| self.convert_expr(n)).collect()
    }

    /// Plain or compound assignment in expression form.
    fn convert_assignment(
        &mut self,
        node: &PsAst,
        left: &PsAst,
        operator: &str,
        right: &PsAst,
    ) -> ConvertResult<Expr> {
        let target = self.convert_expr(left)?;
        if operator == "Equals" {
            let value = self.convert_expr(right)?;
            return Ok(Expr::assign(target, value));
        }

        // The target is evaluated once, so the operator stays on the node.
        let op = operators::compound_assignment(operator);
        if op == BinaryOperator::Unknown {
            self.unknown_operator(operator, &node.extent);
        }
        let value = self.convert_expr(right)?;
        Ok(Expr::compound_assign(target, op, value))
    }

    fn convert_command(&mut self, node: &PsAst, elements: &[PsAst]) -> ConvertResult<Expr> {
        let Some((head, rest)) = elements.split_first() else {
            return self.unsupported_node(node);
        };

        let callee = match &head.kind {
            PsAstKind::StringConstantExpression { value } => Expr::ident(value),
            _ => self.convert_expr(head)?,
        };

        let mut builders = Vec::with_capacity(rest.len());
        for element in rest {
            let builder = match &element.kind {
                PsAstKind::CommandParameter {
                    parameter_name,
                    argument,
                } => {
                    let value = argument
                        .as_deref()
                        .map(|n| self.convert_expr(n))
                        .transpose()?;
                    ArgumentBuilder::named(parameter_name, value)
                }
                _ => ArgumentBuilder::positional(self.convert_expr(element)?),
            };
            builders.push(builder);
        }

        let invocation = Invocation::new(callee, ArgumentList::new(pair_arguments(builders)));
        Ok(idioms::rewrite_command(invocation))
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    fn unsupported_node(&mut self, node: &PsAst) -> ConvertResult<Expr> {
        self.unsupported(node.kind.name(), &node.extent)
    }

    /// Fail, or stand in a literal placeholder, per the configured policy.
    fn unsupported(&mut self, kind: &str, extent: &Extent) -> ConvertResult<Expr> {
        let construct = UnsupportedConstruct::new(kind, extent.clone());
        match self.options.on_unsupported {
            UnsupportedPolicy::Error => Err(construct),
            UnsupportedPolicy::Placeholder => {
                tracing::warn!(
                    kind,
                    at = %extent,
                    "substituting placeholder for unsupported construct"
                );
                let text = if extent.text.is_empty() {
                    kind.to_string()
                } else {
                    extent.text.clone()
                };
                self.diagnostics.push(Diagnostic::Unsupported(construct));
                Ok(Expr::Literal(text))
            }
        }
    }

    fn unknown_operator(&mut self, token: &str, extent: &Extent) {
        tracing::warn!(token, at = %extent, "operator has no canonical mapping");
        self.diagnostics.push(Diagnostic::UnknownOperator {
            token: token.to_string(),
            extent: extent.clone(),
        });
    }
}

/// `[T]$name` on the left of `=`.
fn typed_variable(left: &PsAst) -> Option<(&str, &str)> {
    match &left.kind {
        PsAstKind::ConvertExpression { type_name, child } => match &child.kind {
            PsAstKind::VariableExpression { variable_path } => {
                Some((type_name.as_str(), variable_path.as_str()))
            }
            _ => None,
        },
        _ => None,
    }
}

fn ir_parameter(parameter: &ParameterAst) -> Parameter {
    Parameter::new(
        parameter.static_type.as_deref(),
        parameter.name.trim_start_matches('$'),
    )
}

/// Merge each value-less parameter name with an immediately following
/// positional value. Left to right, each merge consumes one element.
fn pair_arguments(builders: Vec<ArgumentBuilder>) -> Vec<Argument> {
    let mut arguments = Vec::with_capacity(builders.len());
    let mut builders = builders.into_iter().peekable();

    while let Some(builder) = builders.next() {
        let builder = if builder.awaits_value()
            && builders.peek().is_some_and(ArgumentBuilder::is_positional)
        {
            match builders.next().and_then(ArgumentBuilder::into_expression) {
                Some(value) => builder.attach(value),
                None => builder,
            }
        } else {
            builder
        };
        arguments.push(builder.build());
    }

    arguments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(root: PsAst) -> Conversion {
        PowerShellAdapter::default()
            .convert(&root)
            .expect("conversion should succeed")
    }

    fn script_statements(root: PsAst) -> Vec<Stmt> {
        match convert(root).node {
            Node::Stmt(Stmt::Block(block)) => block.statements,
            other => panic!("expected a block, got {other:?}"),
        }
    }

    fn command_stmt(elements: Vec<PsAst>) -> PsAst {
        PsAst::pipeline(vec![PsAst::command(elements)])
    }

    fn if_statement(clause_count: usize, with_else: bool) -> PsAst {
        let clauses = (0..clause_count)
            .map(|i| IfClause {
                condition: PsAst::expr_statement(PsAst::variable(format!("c{i}"))),
                body: PsAst::statement_block(vec![PsAst::expr_statement(PsAst::constant(
                    i.to_string(),
                ))]),
            })
            .collect();
        let else_clause = with_else.then(|| {
            Box::new(PsAst::statement_block(vec![PsAst::expr_statement(
                PsAst::constant("else"),
            )]))
        });
        PsAst::new(PsAstKind::IfStatement {
            clauses,
            else_clause,
        })
    }

    #[test]
    fn test_typed_assignment_with_new_object() {
        // [Foo]$x = New-Object -TypeName Bar -ArgumentList 1, 2
        let root = PsAst::script(vec![PsAst::assign(
            PsAst::convert("Foo", PsAst::variable("x")),
            command_stmt(vec![
                PsAst::string("New-Object"),
                PsAst::parameter("TypeName", None),
                PsAst::string("Bar"),
                PsAst::parameter("ArgumentList", None),
                PsAst::array_literal(vec![PsAst::constant("1"), PsAst::constant("2")]),
            ]),
        )]);

        assert_eq!(
            script_statements(root),
            vec![Stmt::var_decl(
                "Foo",
                "x",
                Expr::new_object(
                    "Bar",
                    ArgumentList::positional(vec![Expr::literal("1"), Expr::literal("2")])
                )
            )]
        );
    }

    #[test]
    fn test_untyped_assignment_stays_assignment() {
        let statements = script_statements(PsAst::script(vec![PsAst::assign(
            PsAst::variable("x"),
            PsAst::expr_statement(PsAst::constant("1")),
        )]));
        assert_eq!(
            statements,
            vec![Stmt::expr(Expr::assign(Expr::ident("x"), Expr::literal("1")))]
        );
    }

    #[test]
    fn test_compound_assignment_keeps_operator() {
        let statements = script_statements(PsAst::script(vec![PsAst::assign_op(
            PsAst::variable("i"),
            "PlusEquals",
            PsAst::expr_statement(PsAst::constant("2")),
        )]));
        assert_eq!(
            statements,
            vec![Stmt::expr(Expr::compound_assign(
                Expr::ident("i"),
                BinaryOperator::Add,
                Expr::literal("2")
            ))]
        );
    }

    #[test]
    fn test_compound_assignment_target_is_converted_once() {
        // $a[$i++] += 1
        let target = PsAst::new(PsAstKind::IndexExpression {
            target: Box::new(PsAst::variable("a")),
            index: Box::new(PsAst::unary("PostfixPlusPlus", PsAst::variable("i"))),
        });
        let statements = script_statements(PsAst::script(vec![PsAst::assign_op(
            target,
            "PlusEquals",
            PsAst::expr_statement(PsAst::constant("1")),
        )]));

        let [Stmt::Expr(Expr::Assignment { target, op, value })] = statements.as_slice() else {
            panic!("expected a single assignment, got {statements:?}");
        };
        assert_eq!(*op, Some(BinaryOperator::Add));
        assert!(matches!(target.as_ref(), Expr::ElementAccess { .. }));
        assert_eq!(value.as_ref(), &Expr::literal("1"));
    }

    #[test]
    fn test_else_chain_has_one_link_per_clause() {
        let statements = script_statements(PsAst::script(vec![if_statement(3, true)]));
        let Stmt::If(if_stmt) = &statements[0] else {
            panic!("expected if statement");
        };

        assert_eq!(if_stmt.chain().count(), 3);
        assert_eq!(
            if_stmt.terminal_else(),
            Some(&Block::new(vec![Stmt::expr(Expr::literal("else"))]))
        );
    }

    #[test]
    fn test_if_without_else_has_no_else_clause() {
        let statements = script_statements(PsAst::script(vec![if_statement(1, false)]));
        let Stmt::If(if_stmt) = &statements[0] else {
            panic!("expected if statement");
        };

        assert_eq!(if_stmt.chain().count(), 1);
        assert!(if_stmt.else_clause.is_none());
        assert!(if_stmt.terminal_else().is_none());
    }

    #[test]
    fn test_single_statement_block_collapses() {
        let body = |n: usize| {
            PsAst::statement_block(
                (0..n)
                    .map(|_| PsAst::new(PsAstKind::BreakStatement))
                    .collect(),
            )
        };
        let while_loop = |n| {
            PsAst::new(PsAstKind::WhileStatement {
                condition: Box::new(PsAst::expr_statement(PsAst::variable("true"))),
                body: Box::new(body(n)),
            })
        };

        let statements = script_statements(PsAst::script(vec![while_loop(1), while_loop(2)]));
        assert_eq!(
            statements,
            vec![
                Stmt::while_loop(Expr::ident("true"), Stmt::Break),
                Stmt::while_loop(
                    Expr::ident("true"),
                    Stmt::block(vec![Stmt::Break, Stmt::Break])
                ),
            ]
        );
    }

    #[test]
    fn test_parameter_followed_by_parameter_is_not_merged() {
        // Get-Item -Force -Path .
        let statements = script_statements(PsAst::script(vec![command_stmt(vec![
            PsAst::string("Get-Item"),
            PsAst::parameter("Force", None),
            PsAst::parameter("Path", None),
            PsAst::string("."),
        ])]));

        assert_eq!(
            statements,
            vec![Stmt::expr(Expr::call(
                Expr::ident("Get-Item"),
                ArgumentList::new(vec![
                    Argument::flag("Force"),
                    Argument::named("Path", Expr::string(".")),
                ])
            ))]
        );
    }

    #[test]
    fn test_trailing_parameter_stays_flag() {
        let statements = script_statements(PsAst::script(vec![command_stmt(vec![
            PsAst::string("Write-Host"),
            PsAst::string("hi"),
            PsAst::parameter("NoNewline", None),
        ])]));

        assert_eq!(
            statements,
            vec![Stmt::expr(Expr::call(
                Expr::ident("Write-Host"),
                ArgumentList::new(vec![
                    Argument::positional(Expr::string("hi")),
                    Argument::flag("NoNewline"),
                ])
            ))]
        );
    }

    #[test]
    fn test_new_object_with_variable_type_is_invocation() {
        let statements = script_statements(PsAst::script(vec![command_stmt(vec![
            PsAst::string("New-Object"),
            PsAst::parameter("TypeName", None),
            PsAst::variable("t"),
        ])]));

        assert_eq!(
            statements,
            vec![Stmt::expr(Expr::call(
                Expr::ident("New-Object"),
                ArgumentList::new(vec![Argument::named("TypeName", Expr::ident("t"))])
            ))]
        );
    }

    #[test]
    fn test_unknown_operator_is_reported() {
        let conversion = convert(PsAst::script(vec![PsAst::expr_statement(PsAst::binary(
            PsAst::variable("s"),
            "Imatch",
            PsAst::string("^a"),
        ))]));

        assert!(!conversion.is_exact());
        assert_eq!(
            conversion.diagnostics,
            vec![Diagnostic::UnknownOperator {
                token: "Imatch".into(),
                extent: Extent::default(),
            }]
        );
        assert_eq!(
            conversion.node.as_stmt(),
            Some(&Stmt::block(vec![Stmt::expr(Expr::binary(
                Expr::ident("s"),
                BinaryOperator::Unknown,
                Expr::string("^a")
            ))]))
        );
    }

    #[test]
    fn test_unsupported_construct_errors_by_default() {
        let extent = Extent {
            start_line: 4,
            start_column: 1,
            text: "switch ($x) { }".into(),
            ..Extent::default()
        };
        let root = PsAst::script(vec![
            PsAst::new(PsAstKind::SwitchStatement).with_extent(extent.clone())
        ]);

        let err = PowerShellAdapter::default().convert(&root).unwrap_err();
        assert_eq!(err, UnsupportedConstruct::new("SwitchStatement", extent));
        assert_eq!(err.to_string(), "unsupported construct SwitchStatement at 4:1");
    }

    #[test]
    fn test_placeholder_policy_substitutes_and_reports() {
        let extent = Extent {
            text: "throw 'x'".into(),
            ..Extent::default()
        };
        let root = PsAst::script(vec![
            PsAst::new(PsAstKind::ThrowStatement { pipeline: None }).with_extent(extent.clone()),
            PsAst::new(PsAstKind::Hashtable),
        ]);
        let adapter = PowerShellAdapter::new(AdapterOptions {
            on_unsupported: UnsupportedPolicy::Placeholder,
            ..AdapterOptions::default()
        });

        let conversion = adapter.convert(&root).unwrap();
        assert_eq!(
            conversion.node,
            Node::Stmt(Stmt::block(vec![
                Stmt::expr(Expr::literal("throw 'x'")),
                Stmt::expr(Expr::literal("Hashtable")),
            ]))
        );
        assert_eq!(conversion.diagnostics.len(), 2);
        assert_eq!(
            conversion.diagnostics[0],
            Diagnostic::Unsupported(UnsupportedConstruct::new("ThrowStatement", extent))
        );
    }

    fn function_with_duplicate() -> PsAst {
        let param = |name: &str, ty: Option<&str>| ParameterAst {
            extent: Extent::default(),
            name: name.into(),
            static_type: ty.map(str::to_string),
        };
        PsAst::new(PsAstKind::FunctionDefinition {
            name: "Get-Thing".into(),
            parameters: vec![param("Name", None), param("Count", Some("int"))],
            body: Box::new(PsAst::new(PsAstKind::ScriptBlock {
                param_block: Some(ParamBlock {
                    parameters: vec![param("$name", Some("string"))],
                }),
                statements: vec![],
            })),
        })
    }

    #[test]
    fn test_duplicate_parameters_last_wins() {
        let statements = script_statements(PsAst::script(vec![function_with_duplicate()]));
        let Stmt::MethodDeclaration(method) = &statements[0] else {
            panic!("expected method declaration");
        };

        assert_eq!(
            method.parameters,
            vec![
                Parameter::new(Some("int"), "Count"),
                Parameter::new(Some("string"), "name"),
            ]
        );
        assert_eq!(method.modifiers, vec!["public".to_string()]);
        assert!(method.body.is_empty());
    }

    #[test]
    fn test_duplicate_parameters_preserved() {
        let adapter = PowerShellAdapter::new(AdapterOptions {
            duplicate_parameters: DuplicateParameters::Preserve,
            ..AdapterOptions::default()
        });
        let conversion = adapter
            .convert(&PsAst::script(vec![function_with_duplicate()]))
            .unwrap();
        let Some(Stmt::Block(block)) = conversion.node.as_stmt() else {
            panic!("expected block");
        };
        let Stmt::MethodDeclaration(method) = &block.statements[0] else {
            panic!("expected method declaration");
        };

        let names: Vec<_> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Name", "Count", "name"]);
    }

    #[test]
    fn test_multi_type_catch_splits() {
        let body = |text: &str| PsAst::statement_block(vec![PsAst::expr_statement(PsAst::string(text))]);
        let root = PsAst::script(vec![PsAst::new(PsAstKind::TryStatement {
            body: Box::new(body("try")),
            catch_clauses: vec![
                CatchClause {
                    extent: Extent::default(),
                    catch_types: vec!["IOException".into(), "TimeoutException".into()],
                    body: body("typed"),
                },
                CatchClause {
                    extent: Extent::default(),
                    catch_types: vec![],
                    body: body("all"),
                },
            ],
            finally: Some(Box::new(body("finally"))),
        })]);

        let typed = Block::new(vec![Stmt::expr(Expr::string("typed"))]);
        assert_eq!(
            script_statements(root),
            vec![Stmt::try_stmt(
                Block::new(vec![Stmt::expr(Expr::string("try"))]),
                vec![
                    Catch::new(Some("IOException"), typed.clone()),
                    Catch::new(Some("TimeoutException"), typed),
                    Catch::new(None, Block::new(vec![Stmt::expr(Expr::string("all"))])),
                ],
                Some(Block::new(vec![Stmt::expr(Expr::string("finally"))])),
            )]
        );
    }

    #[test]
    fn test_static_member_invocation() {
        // [Math]::Max(1, 2)
        let root = PsAst::script(vec![PsAst::expr_statement(PsAst::new(
            PsAstKind::InvokeMemberExpression {
                expression: Box::new(PsAst::type_expr("Math")),
                member: "Max".into(),
                arguments: vec![PsAst::constant("1"), PsAst::constant("2")],
                is_static: true,
            },
        ))]);

        assert_eq!(
            script_statements(root),
            vec![Stmt::expr(Expr::call(
                Expr::static_member("Math", "Max"),
                ArgumentList::positional(vec![Expr::literal("1"), Expr::literal("2")])
            ))]
        );
    }

    #[test]
    fn test_array_expression_flattens_inner_literal() {
        let array_expr = |statements| PsAst::new(PsAstKind::ArrayExpression { statements });
        let root = PsAst::script(vec![
            PsAst::expr_statement(array_expr(vec![PsAst::expr_statement(
                PsAst::array_literal(vec![PsAst::constant("1"), PsAst::constant("2")]),
            )])),
            PsAst::expr_statement(array_expr(vec![])),
        ]);

        assert_eq!(
            script_statements(root),
            vec![
                Stmt::expr(Expr::array(None, vec![Expr::literal("1"), Expr::literal("2")])),
                Stmt::expr(Expr::array(None, vec![])),
            ]
        );
    }

    #[test]
    fn test_unary_fixity() {
        let root = PsAst::script(vec![
            PsAst::expr_statement(PsAst::unary("PostfixPlusPlus", PsAst::variable("i"))),
            PsAst::expr_statement(PsAst::unary("Not", PsAst::variable("ok"))),
        ]);

        assert_eq!(
            script_statements(root),
            vec![
                Stmt::expr(Expr::postfix(UnaryOperator::Increment, Expr::ident("i"))),
                Stmt::expr(Expr::prefix(UnaryOperator::Not, Expr::ident("ok"))),
            ]
        );
    }

    #[test]
    fn test_read_json_tree() {
        let conversion = read_powershell(
            r#"{
                "type": "ScriptBlock",
                "statements": [{
                    "type": "ReturnStatement",
                    "pipeline": { "type": "VariableExpression", "variable_path": "result" }
                }]
            }"#,
        )
        .unwrap();

        assert!(conversion.is_exact());
        assert_eq!(
            conversion.node,
            Node::Stmt(Stmt::block(vec![Stmt::return_stmt(Some(Expr::ident("result")))]))
        );
    }

    #[test]
    fn test_read_malformed_json() {
        let err = read_powershell(r#"{ "type": "Command" "#).unwrap_err();
        assert!(matches!(err, ReadError::Parse(_)));
    }
}
