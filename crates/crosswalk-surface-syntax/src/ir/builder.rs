//! Two-phase construction for nodes whose parts arrive out of order.
//!
//! Readers sometimes learn about a node before they have all of its
//! children: a command parameter token whose value is the *next* token, or an
//! `if` whose `else if` links are discovered one clause at a time. The
//! builders collect those parts and produce finished, immutable IR values.

use super::{Argument, Block, ElseClause, Expr, IfStatement, Stmt};

/// Collects a command argument whose value may be attached after its name.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentBuilder {
    name: Option<String>,
    expression: Option<Expr>,
}

impl ArgumentBuilder {
    /// A parameter name, optionally with an inline value (`-Name:value`).
    pub fn named(name: impl Into<String>, expression: Option<Expr>) -> Self {
        Self {
            name: Some(name.into()),
            expression,
        }
    }

    pub fn positional(expression: Expr) -> Self {
        Self {
            name: None,
            expression: Some(expression),
        }
    }

    /// Named with no value yet; the next positional value may complete it.
    pub fn awaits_value(&self) -> bool {
        self.name.is_some() && self.expression.is_none()
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_none()
    }

    /// Attach the value of a pending named argument.
    pub fn attach(self, expression: Expr) -> Self {
        debug_assert!(self.awaits_value(), "argument already has a value");
        Self {
            name: self.name,
            expression: Some(expression),
        }
    }

    /// Take the value out of a positional argument.
    pub fn into_expression(self) -> Option<Expr> {
        self.expression
    }

    pub fn build(self) -> Argument {
        Argument {
            name: self.name,
            expression: self.expression,
        }
    }
}

/// Collects an `if` / `else if` / `else` sequence and links it on `build`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfChainBuilder {
    condition: Expr,
    body: Stmt,
    else_ifs: Vec<(Expr, Stmt)>,
    otherwise: Option<Block>,
}

impl IfChainBuilder {
    pub fn new(condition: Expr, body: Stmt) -> Self {
        Self {
            condition,
            body,
            else_ifs: Vec::new(),
            otherwise: None,
        }
    }

    pub fn else_if(mut self, condition: Expr, body: Stmt) -> Self {
        self.else_ifs.push((condition, body));
        self
    }

    /// Terminal `else`. Replaces any earlier one.
    pub fn otherwise(mut self, block: Block) -> Self {
        self.otherwise = Some(block);
        self
    }

    /// Link the clauses from the tail forward.
    pub fn build(self) -> IfStatement {
        let mut tail = self.otherwise.map(ElseClause::Block);
        for (condition, body) in self.else_ifs.into_iter().rev() {
            tail = Some(ElseClause::If(IfStatement {
                condition,
                body: Box::new(body),
                else_clause: tail.map(Box::new),
            }));
        }
        IfStatement {
            condition: self.condition,
            body: Box::new(self.body),
            else_clause: tail.map(Box::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_completes_named_argument() {
        let pending = ArgumentBuilder::named("TypeName", None);
        assert!(pending.awaits_value());

        let arg = pending.attach(Expr::string("Foo")).build();
        assert_eq!(arg, Argument::named("TypeName", Expr::string("Foo")));
    }

    #[test]
    fn test_inline_value_does_not_await() {
        let arg = ArgumentBuilder::named("Path", Some(Expr::string(".")));
        assert!(!arg.awaits_value());
        assert!(!ArgumentBuilder::positional(Expr::literal("1")).awaits_value());
    }

    #[test]
    fn test_chain_links_in_source_order() {
        let stmt = IfChainBuilder::new(Expr::ident("a"), Stmt::Break)
            .else_if(Expr::ident("b"), Stmt::Continue)
            .else_if(Expr::ident("c"), Stmt::Break)
            .otherwise(Block::new(vec![Stmt::return_stmt(None)]))
            .build();

        let conditions: Vec<_> = stmt.chain().map(|link| &link.condition).collect();
        assert_eq!(
            conditions,
            vec![&Expr::ident("a"), &Expr::ident("b"), &Expr::ident("c")]
        );
        assert_eq!(
            stmt.terminal_else(),
            Some(&Block::new(vec![Stmt::return_stmt(None)]))
        );
    }

    #[test]
    fn test_if_only_has_no_else() {
        let stmt = IfChainBuilder::new(Expr::ident("a"), Stmt::Break).build();
        assert_eq!(stmt.chain().count(), 1);
        assert!(stmt.else_clause.is_none());
        assert!(stmt.terminal_else().is_none());
    }
}
