//! C# writer for surface-syntax IR.
//!
//! Allman braces, `;` terminators. A root [`Block`] is written as a bare
//! sequence of top-level statements.

use super::emitter::Emitter;
use crate::config::RenderOptions;
use crate::ir::*;
use crate::traits::Writer;

/// Static instance of the C# writer for registry.
pub static CSHARP_WRITER: CSharpWriterImpl = CSharpWriterImpl;

/// C# writer implementing the Writer trait.
pub struct CSharpWriterImpl;

impl Writer for CSharpWriterImpl {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn write(&self, node: &Node) -> String {
        CSharpWriter::emit(node)
    }
}

/// Emits IR as C# source code.
pub struct CSharpWriter {
    out: Emitter,
    terminate: bool,
}

impl CSharpWriter {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            out: Emitter::from_options(options),
            terminate: options.terminate_statements.unwrap_or(true),
        }
    }

    /// Emit a tree with default formatting.
    pub fn emit(node: &Node) -> String {
        Self::emit_with(node, &RenderOptions::default())
    }

    pub fn emit_with(node: &Node, options: &RenderOptions) -> String {
        tracing::trace!(language = "csharp", "rendering tree");
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

    // ========================================================================
    // Statements
    // ========================================================================

    fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(expr) => {
                self.write_expr(expr);
                self.terminator();
            }

            Stmt::Block(block) => self.write_block(&block.statements),

            Stmt::VariableDeclaration(decl) => {
                self.out.push(&decl.type_name);
                self.out.push(" ");
                self.out.push(&decl.declarator.name);
                self.out.push(" = ");
                self.write_expr(&decl.declarator.initializer);
                self.terminator();
            }

            Stmt::MethodDeclaration(method) => self.write_method(method),

            Stmt::If(if_stmt) => self.write_if(if_stmt),

            Stmt::For {
                initializer,
                condition,
                iterator,
                body,
            } => {
                self.out.push("for (");
                if let Some(init) = initializer {
                    // The header supplies its own separators.
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
                self.out.push(")");
                self.write_body(body);
            }

            Stmt::ForEach {
                variable,
                iterable,
                body,
            } => {
                self.out.push("foreach (var ");
                self.out.push(variable);
                self.out.push(" in ");
                self.write_expr(iterable);
                self.out.push(")");
                self.write_body(body);
            }

            Stmt::While { condition, body } => {
                self.out.push("while (");
                self.write_expr(condition);
                self.out.push(")");
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
                self.out.push("try");
                self.out.newline();
                self.write_block(&try_stmt.body.statements);
                for catch in &try_stmt.catches {
                    self.out.newline();
                    self.out.push("catch");
                    if let Some(declaration) = &catch.declaration {
                        self.out.push(" (");
                        self.out.push(&declaration.type_name);
                        self.out.push(")");
                    }
                    self.out.newline();
                    self.write_block(&catch.body.statements);
                }
                if let Some(finally) = &try_stmt.finally {
                    self.out.newline();
                    self.out.push("finally");
                    self.out.newline();
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

    /// Body of a control construct on its own lines; a bare statement gets braces too.
    fn write_body(&mut self, body: &Stmt) {
        self.out.newline();
        match body {
            Stmt::Block(block) => self.write_block(&block.statements),
            other => self.write_block(std::slice::from_ref(other)),
        }
    }

    fn write_if(&mut self, if_stmt: &IfStatement) {
        self.out.push("if (");
        self.write_expr(&if_stmt.condition);
        self.out.push(")");
        self.write_body(&if_stmt.body);

        match if_stmt.else_clause.as_deref() {
            Some(ElseClause::If(chained)) => {
                self.out.newline();
                self.out.push("else ");
                self.write_if(chained);
            }
            Some(ElseClause::Block(block)) => {
                self.out.newline();
                self.out.push("else");
                self.out.newline();
                self.write_block(&block.statements);
            }
            None => {}
        }
    }

    fn write_method(&mut self, method: &MethodDeclaration) {
        for modifier in &method.modifiers {
            self.out.push(modifier);
            self.out.push(" ");
        }
        self.out.push("void ");
        self.out.push(&method.name);
        self.out.push("(");
        for parameter in &method.parameters {
            self.out.push(parameter.type_name.as_deref().unwrap_or("object"));
            self.out.push(" ");
            self.out.push(&parameter.name);
            self.out.push(", ");
        }
        if !method.parameters.is_empty() {
            self.out.trim_separator(", ");
        }
        self.out.push(")");
        self.out.newline();
        self.write_block(&method.body.statements);
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(text) => self.out.push(text),

            Expr::StringConstant(value) => {
                self.out.push("\"");
                self.out.push(&escape_string(value));
                self.out.push("\"");
            }

            Expr::TemplateStringConstant(template) => {
                self.out.push(&interpolated_string(template));
            }

            Expr::Identifier(name) => self.out.push(name),

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
                self.out.push("(");
                self.out.push(type_name);
                self.out.push(")");
                self.write_expr(operand);
            }

            Expr::Parenthesized(inner) => {
                self.out.push("(");
                self.write_expr(inner);
                self.out.push(")");
            }

            Expr::MemberAccess { target, member, .. } => {
                self.write_expr(target);
                self.out.push(".");
                self.out.push(member);
            }

            Expr::ElementAccess { target, index } => {
                self.write_expr(target);
                self.out.push("[");
                self.write_arguments(&index.arguments);
                self.out.push("]");
            }

            Expr::Invocation(invocation) => {
                self.write_expr(&invocation.callee);
                self.out.push("(");
                self.write_arguments(&invocation.arguments);
                self.out.push(")");
            }

            Expr::ObjectCreation {
                type_name,
                arguments,
            } => {
                self.out.push("new ");
                self.out.push(type_name);
                self.out.push("(");
                self.write_arguments(arguments);
                self.out.push(")");
            }

            Expr::ArrayCreation {
                element_type,
                elements,
            } => {
                match (element_type, elements.is_empty()) {
                    (Some(element_type), _) => {
                        self.out.push("new ");
                        self.out.push(element_type);
                        self.out.push("[] {");
                    }
                    // Nothing to infer the element type from.
                    (None, true) => self.out.push("new object[] {"),
                    (None, false) => self.out.push("new[] {"),
                }
                for element in elements {
                    self.out.push(" ");
                    self.write_expr(element);
                    self.out.push(",");
                }
                if !elements.is_empty() {
                    self.out.trim_separator(",");
                }
                self.out.push(" }");
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

    fn write_arguments(&mut self, arguments: &ArgumentList) {
        for argument in &arguments.arguments {
            if let Some(name) = &argument.name {
                self.out.push(name);
                self.out.push(": ");
            }
            match &argument.expression {
                Some(expr) => self.write_expr(expr),
                // A switch parameter is present-or-absent.
                None => self.out.push("true"),
            }
            self.out.push(", ");
        }
        if !arguments.is_empty() {
            self.out.trim_separator(", ");
        }
    }
}

impl Visitor for CSharpWriter {
    type Output = ();

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.write_stmt(stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.write_expr(expr);
    }
}

impl Default for CSharpWriter {
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
        BinaryOperator::Equal => "==",
        BinaryOperator::NotEqual => "!=",
        BinaryOperator::LessThan => "<",
        BinaryOperator::LessThanOrEqual => "<=",
        BinaryOperator::GreaterThan => ">",
        BinaryOperator::GreaterThanOrEqual => ">=",
        BinaryOperator::And => "&&",
        BinaryOperator::Or => "||",
        BinaryOperator::ExclusiveOr => "^",
        BinaryOperator::BitwiseAnd => "&",
        BinaryOperator::BitwiseOr => "|",
        BinaryOperator::BitwiseXor => "^",
        BinaryOperator::LeftShift => "<<",
        BinaryOperator::RightShift => ">>",
        BinaryOperator::Is => "is",
        BinaryOperator::As => "as",
        BinaryOperator::Unknown => "/* unknown operator */",
    }
}

fn unary_operator(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Increment => "++",
        UnaryOperator::Decrement => "--",
        UnaryOperator::Not => "!",
        UnaryOperator::Negate => "-",
        UnaryOperator::Plus => "+",
        UnaryOperator::BitwiseNot => "~",
        UnaryOperator::Unknown => "/* unknown operator */ ",
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Template body to a C# interpolated string.
///
/// References become `{...}` holes and literal braces are doubled.
fn interpolated_string(template: &str) -> String {
    let mut out = String::from("$\"");
    for part in template_parts(template) {
        match part {
            TemplatePart::Text(text) => {
                text.chars().for_each(|c| push_interpolated_char(&mut out, c));
            }
            TemplatePart::Variable { scope, name, .. } => push_variable_hole(&mut out, scope, name),
            TemplatePart::SubExpression(inner) => push_hole(&mut out, &inner.replace('$', "")),
        }
    }
    out.push('"');
    out
}

/// Variable scopes are dropped and `env:` reads the process environment.
/// Other provider drives (`function:`, `alias:`, ...) have no C# value and
/// stay literal text.
fn push_variable_hole(out: &mut String, scope: Option<&str>, name: &str) {
    let Some(scope) = scope else {
        return push_hole(out, name);
    };
    match scope.to_ascii_lowercase().as_str() {
        "global" | "local" | "script" | "private" | "using" => push_hole(out, name),
        "env" => push_hole(
            out,
            &format!("Environment.GetEnvironmentVariable(\"{name}\")"),
        ),
        _ => format!("${scope}:{name}")
            .chars()
            .for_each(|c| push_interpolated_char(out, c)),
    }
}

fn push_hole(out: &mut String, expr: &str) {
    out.push('{');
    out.push_str(expr);
    out.push('}');
}

fn push_interpolated_char(out: &mut String, c: char) {
    match c {
        '"' => out.push_str("\\\""),
        '\\' => out.push_str("\\\\"),
        '{' => out.push_str("{{"),
        '}' => out.push_str("}}"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        other => out.push(other),
    }
}
