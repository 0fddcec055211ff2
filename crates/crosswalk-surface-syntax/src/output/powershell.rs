//! PowerShell writer for surface-syntax IR.
//!
//! Emits K&R-braced PowerShell with no statement terminators. Identifiers
//! are variables (`$name`) except where PowerShell spells them bare: the
//! command name of an invocation and the type of a static member access.

use super::emitter::Emitter;
use crate::config::RenderOptions;
use crate::ir::*;
use crate::traits::Writer;

/// Static instance of the PowerShell writer for registry.
pub static POWERSHELL_WRITER: PowerShellWriterImpl = PowerShellWriterImpl;

/// PowerShell writer implementing the Writer trait.
pub struct PowerShellWriterImpl;

impl Writer for PowerShellWriterImpl {
    fn language(&self) -> &'static str {
        "powershell"
    }

    fn extension(&self) -> &'static str {
        "ps1"
    }

    fn write(&self, node: &Node) -> String {
        PowerShellWriter::emit(node)
    }
}

/// Emits IR as PowerShell source code.
pub struct PowerShellWriter {
    out: Emitter,
    terminate: bool,
}

impl PowerShellWriter {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            out: Emitter::from_options(options),
            terminate: options.terminate_statements.unwrap_or(false),
        }
    }

    pub fn emit(node: &Node) -> String {
        Self::emit_with(node, &RenderOptions::default())
    }

    pub fn emit_with(node: &Node, options: &RenderOptions) -> String {
        tracing::trace!(language = "powershell", "rendering tree");
        let mut writer = Self::new(options);
        writer.write_root(node);
        writer.out.finish()
    }

    fn write_root(&mut self, node: &Node) {
        match node {
            Node::Stmt(Stmt::Block(block)) => {
                for stmt in &block.statements {
                    self.write_stmt(stmt);
                    self.out.newline();
                }
            }
            Node::Stmt(stmt) => {
                self.write_stmt(stmt);
                self.out.newline();
            }
            Node::Expr(expr) => self.write_expr(expr),
        }
    }

    fn terminator(&mut self) {
        if self.terminate {
            self.out.push(";");
        }
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                self.write_expr(expr);
                self.terminator();
            }

            Stmt::Block(block) => self.write_block(&block.statements),

            Stmt::VariableDeclaration(decl) => {
                self.out.push("[");
                self.out.push(&decl.type_name);
                self.out.push("]$");
                self.out.push(&decl.declarator.name);
                self.out.push(" = ");
                self.write_expr(&decl.declarator.initializer);
                self.terminator();
            }

            Stmt::MethodDeclaration(method) => {
                self.out.push("function ");
                self.out.push(&method.name);
                self.out.push("(");
                for parameter in &method.parameters {
                    if let Some(type_name) = &parameter.type_name {
                        self.out.push("[");
                        self.out.push(type_name);
                        self.out.push("]");
                    }
                    self.out.push("$");
                    self.out.push(&parameter.name);
                    self.out.push(", ");
                }
                if !method.parameters.is_empty() {
                    self.out.trim_separator(", ");
                }
                self.out.push(") ");
                self.write_block(&method.body.statements);
            }

            Stmt::If(if_stmt) => {
                self.out.push("if (");
                self.write_expr(&if_stmt.condition);
                self.out.push(") ");
                self.write_body(&if_stmt.body);
                self.write_else(if_stmt.else_clause.as_deref());
            }

            Stmt::For {
                initializer,
                condition,
                iterator,
                body,
            } => {
                self.out.push("for (");
                if let Some(init) = initializer {
                    let saved = self.terminate;
                    self.terminate = false;
                    self.write_stmt(init);
                    self.terminate = saved;
                }
                self.out.push("; ");
                if let Some(condition) = condition {
                    self.write_expr(condition);
                }
                self.out.push("; ");
                if let Some(iterator) = iterator {
                    self.write_expr(iterator);
                }
                self.out.push(") ");
                self.write_body(body);
            }

            Stmt::ForEach {
                variable,
                iterable,
                body,
            } => {
                self.out.push("foreach ($");
                self.out.push(variable);
                self.out.push(" in ");
                self.write_expr(iterable);
                self.out.push(") ");
                self.write_body(body);
            }

            Stmt::While { condition, body } => {
                self.out.push("while (");
                self.write_expr(condition);
                self.out.push(") ");
                self.write_body(body);
            }

            Stmt::Break => {
                self.out.push("break");
                self.terminator();
            }

            Stmt::Continue => {
                self.out.push("continue");
                self.terminator();
            }

            Stmt::Return(value) => {
                self.out.push("return");
                if let Some(value) = value {
                    self.out.push(" ");
                    self.write_expr(value);
                }
                self.terminator();
            }

            Stmt::Try(try_stmt) => {
                self.out.push("try ");
                self.write_block(&try_stmt.body.statements);
                for catch in &try_stmt.catches {
                    self.out.push(" catch ");
                    if let Some(declaration) = &catch.declaration {
                        self.out.push("[");
                        self.out.push(&declaration.type_name);
                        self.out.push("] ");
                    }
                    self.write_block(&catch.body.statements);
                }
                if let Some(finally) = &try_stmt.finally {
                    self.out.push(" finally ");
                    self.write_block(&finally.body.statements);
                }
            }
        }
    }

    fn write_block(&mut self, statements: &[Stmt]) {
        self.out.push("{");
        self.out.indent();
        for stmt in statements {
            self.out.newline();
            self.write_stmt(stmt);
        }
        self.out.outdent();
        self.out.newline();
        self.out.push("}");
    }

    fn write_body(&mut self, body: &Stmt) {
        match body {
            Stmt::Block(block) => self.write_block(&block.statements),
            other => self.write_block(std::slice::from_ref(other)),
        }
    }

    fn write_else(&mut self, else_clause: Option<&ElseClause>) {
        match else_clause {
            Some(ElseClause::If(chained)) => {
                self.out.push(" elseif (");
                self.write_expr(&chained.condition);
                self.out.push(") ");
                self.write_body(&chained.body);
                self.write_else(chained.else_clause.as_deref());
            }
            Some(ElseClause::Block(block)) => {
                self.out.push(" else ");
                self.write_block(&block.statements);
            }
            None => {}
        }
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(text) => self.out.push(text),

            Expr::StringConstant(value) => {
                self.out.push("'");
                self.out.push(&value.replace('\'', "''"));
                self.out.push("'");
            }

            Expr::TemplateStringConstant(template) => {
                self.out.push(&expandable_string(template));
            }

            Expr::Identifier(name) => {
                self.out.push("$");
                self.out.push(name);
            }

            Expr::Binary { left, op, right } => {
                self.write_expr(left);
                self.out.push(" ");
                self.out.push(binary_operator(*op));
                self.out.push(" ");
                self.write_expr(right);
            }

            Expr::PrefixUnary { op, operand } => {
                self.out.push(unary_operator(*op));
                self.write_expr(operand);
            }

            Expr::PostfixUnary { op, operand } => {
                self.write_expr(operand);
                self.out.push(unary_operator(*op));
            }

            Expr::Cast { type_name, operand } => {
                self.out.push("[");
                self.out.push(type_name);
                self.out.push("]");
                self.write_expr(operand);
            }

            Expr::Parenthesized(inner) => {
                self.out.push("(");
                self.write_expr(inner);
                self.out.push(")");
            }

            Expr::MemberAccess {
                target,
                member,
                is_static,
            } => {
                self.write_member_target(target, *is_static);
                self.out.push(member);
            }

            Expr::ElementAccess { target, index } => {
                self.write_expr(target);
                self.out.push("[");
                self.write_method_arguments(&index.arguments);
                self.out.push("]");
            }

            Expr::Invocation(invocation) => match invocation.callee.as_ref() {
                Expr::Identifier(command) => {
                    self.out.push(command);
                    self.write_command_arguments(&invocation.arguments);
                }
                callee @ Expr::MemberAccess { .. } => {
                    self.write_expr(callee);
                    self.out.push("(");
                    self.write_method_arguments(&invocation.arguments);
                    self.out.push(")");
                }
                callee => {
                    self.out.push("& ");
                    self.write_expr(callee);
                    self.write_command_arguments(&invocation.arguments);
                }
            },

            Expr::ObjectCreation {
                type_name,
                arguments,
            } => {
                self.out.push("[");
                self.out.push(type_name);
                self.out.push("]::new(");
                self.write_method_arguments(arguments);
                self.out.push(")");
            }

            Expr::ArrayCreation {
                element_type,
                elements,
            } => {
                if let Some(element_type) = element_type {
                    self.out.push("[");
                    self.out.push(element_type);
                    self.out.push("[]]");
                }
                self.out.push("@(");
                for element in elements {
                    self.write_expr(element);
                    self.out.push(", ");
                }
                if !elements.is_empty() {
                    self.out.trim_separator(", ");
                }
                self.out.push(")");
            }

            Expr::Assignment { target, op, value } => {
                self.write_expr(target);
                self.out.push(" ");
                if let Some(op) = op {
                    self.out.push(binary_operator(*op));
                }
                self.out.push("= ");
                self.write_expr(value);
            }
        }
    }

    /// `[Type]::` for static access on a type name, `target.` otherwise.
    fn write_member_target(&mut self, target: &Expr, is_static: bool) {
        match (target, is_static) {
            (Expr::Identifier(type_name), true) => {
                self.out.push("[");
                self.out.push(type_name);
                self.out.push("]::");
            }
            (target, true) => {
                self.write_expr(target);
                self.out.push("::");
            }
            (target, false) => {
                self.write_expr(target);
                self.out.push(".");
            }
        }
    }

    /// Method-call syntax: `(a, b)`. Argument names have no spelling here.
    fn write_method_arguments(&mut self, arguments: &ArgumentList) {
        let mut written = false;
        for expr in arguments.arguments.iter().filter_map(|a| a.expression.as_ref()) {
            self.write_expr(expr);
            self.out.push(", ");
            written = true;
        }
        if written {
            self.out.trim_separator(", ");
        }
    }

    /// Command syntax: ` value -Name value -Switch`.
    fn write_command_arguments(&mut self, arguments: &ArgumentList) {
        for argument in &arguments.arguments {
            if let Some(name) = &argument.name {
                self.out.push(" -");
                self.out.push(name);
            }
            if let Some(expr) = &argument.expression {
                self.out.push(" ");
                self.write_command_argument(expr);
            }
        }
    }

    /// Anything beyond a simple value needs parentheses in argument mode.
    fn write_command_argument(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_)
            | Expr::StringConstant(_)
            | Expr::TemplateStringConstant(_)
            | Expr::Identifier(_)
            | Expr::Parenthesized(_)
            | Expr::MemberAccess { .. }
            | Expr::ElementAccess { .. }
            | Expr::ArrayCreation { .. } => self.write_expr(expr),
            _ => {
                self.out.push("(");
                self.write_expr(expr);
                self.out.push(")");
            }
        }
    }
}

impl Visitor for PowerShellWriter {
    type Output = ();

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.write_stmt(stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.write_expr(expr);
    }
}

impl Default for PowerShellWriter {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}

fn binary_operator(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Modulo => "%",
        BinaryOperator::Equal => "-eq",
        BinaryOperator::NotEqual => "-ne",
        BinaryOperator::LessThan => "-lt",
        BinaryOperator::LessThanOrEqual => "-le",
        BinaryOperator::GreaterThan => "-gt",
        BinaryOperator::GreaterThanOrEqual => "-ge",
        BinaryOperator::And => "-and",
        BinaryOperator::Or => "-or",
        BinaryOperator::ExclusiveOr => "-xor",
        BinaryOperator::BitwiseAnd => "-band",
        BinaryOperator::BitwiseOr => "-bor",
        BinaryOperator::BitwiseXor => "-bxor",
        BinaryOperator::LeftShift => "-shl",
        BinaryOperator::RightShift => "-shr",
        BinaryOperator::Is => "-is",
        BinaryOperator::As => "-as",
        BinaryOperator::Unknown => "<# unknown operator #>",
    }
}

fn unary_operator(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Increment => "++",
        UnaryOperator::Decrement => "--",
        UnaryOperator::Not => "-not ",
        UnaryOperator::Negate => "-",
        UnaryOperator::Plus => "+",
        UnaryOperator::BitwiseNot => "-bnot ",
        UnaryOperator::Unknown => "<# unknown operator #> ",
    }
}

/// Template body to a double-quoted string; text is backtick-escaped so only
/// the references expand.
fn expandable_string(template: &str) -> String {
    let mut out = String::from("\"");
    for part in template_parts(template) {
        match part {
            TemplatePart::Text(text) => {
                for c in text.chars() {
                    match c {
                        '`' => out.push_str("``"),
                        '"' => out.push_str("`\""),
                        '$' => out.push_str("`$"),
                        '\n' => out.push_str("`n"),
                        '\r' => out.push_str("`r"),
                        '\t' => out.push_str("`t"),
                        '\0' => out.push_str("`0"),
                        other => out.push(other),
                    }
                }
            }
            TemplatePart::Variable {
                scope,
                name,
                braced,
            } => {
                out.push_str(if braced { "${" } else { "$" });
                if let Some(scope) = scope {
                    out.push_str(scope);
                    out.push(':');
                }
                out.push_str(name);
                if braced {
                    out.push('}');
                }
            }
            TemplatePart::SubExpression(inner) => {
                out.push_str("$(");
                out.push_str(inner);
                out.push(')');
            }
        }
    }
    out.push('"');
    out
}
