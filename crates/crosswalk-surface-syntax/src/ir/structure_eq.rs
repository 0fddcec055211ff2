//! Structural equality for IR types.
//!
//! `structure_eq` compares IR trees ignoring "surface hints" - shapes that
//! one language writes differently from another without changing meaning.
//!
//! # Hints (normalized during comparison)
//!
//! - Body statements: a bare statement equals a one-statement `Block`
//! - `Expr::Parenthesized` - grouping is unwrapped on both sides
//! - `MethodDeclaration { modifiers, attributes }` - not every target has them
//! - `MemberAccess { is_static }` - only PowerShell spells it differently
//!
//! # Core Fields (must match exactly)
//!
//! - All names, values, operators, type names
//! - Argument order and argument names
//! - Control flow structure, including the shape of else-chains

use super::*;

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores surface hint fields that may differ
/// between languages but don't affect program semantics.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Node {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Stmt(a), Node::Stmt(b)) => a.structure_eq(b),
            (Node::Expr(a), Node::Expr(b)) => a.structure_eq(b),
            (Node::Stmt(Stmt::Expr(a)), Node::Expr(b)) | (Node::Expr(a), Node::Stmt(Stmt::Expr(b))) => {
                a.structure_eq(b)
            }
            _ => false,
        }
    }
}

impl StructureEq for Stmt {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Stmt::Expr(a), Stmt::Expr(b)) => a.structure_eq(b),

            (Stmt::Block(a), Stmt::Block(b)) => a.structure_eq(b),

            (Stmt::VariableDeclaration(a), Stmt::VariableDeclaration(b)) => {
                a.type_name == b.type_name
                    && a.declarator.name == b.declarator.name
                    && a.declarator.initializer.structure_eq(&b.declarator.initializer)
            }

            // Ignore `modifiers` and `attributes` - surface hints
            (Stmt::MethodDeclaration(a), Stmt::MethodDeclaration(b)) => {
                a.name == b.name && a.parameters == b.parameters && a.body.structure_eq(&b.body)
            }

            (Stmt::If(a), Stmt::If(b)) => a.structure_eq(b),

            (
                Stmt::For {
                    initializer: i1,
                    condition: c1,
                    iterator: it1,
                    body: b1,
                },
                Stmt::For {
                    initializer: i2,
                    condition: c2,
                    iterator: it2,
                    body: b2,
                },
            ) => {
                option_structure_eq(i1.as_deref(), i2.as_deref())
                    && option_structure_eq(c1.as_ref(), c2.as_ref())
                    && option_structure_eq(it1.as_ref(), it2.as_ref())
                    && body_structure_eq(b1, b2)
            }

            (
                Stmt::ForEach {
                    variable: v1,
                    iterable: i1,
                    body: b1,
                },
                Stmt::ForEach {
                    variable: v2,
                    iterable: i2,
                    body: b2,
                },
            ) => v1 == v2 && i1.structure_eq(i2) && body_structure_eq(b1, b2),

            (
                Stmt::While {
                    condition: c1,
                    body: b1,
                },
                Stmt::While {
                    condition: c2,
                    body: b2,
                },
            ) => c1.structure_eq(c2) && body_structure_eq(b1, b2),

            (Stmt::Break, Stmt::Break) => true,
            (Stmt::Continue, Stmt::Continue) => true,

            (Stmt::Return(a), Stmt::Return(b)) => option_structure_eq(a.as_ref(), b.as_ref()),

            (Stmt::Try(a), Stmt::Try(b)) => {
                a.body.structure_eq(&b.body)
                    && a.catches.len() == b.catches.len()
                    && a.catches.iter().zip(&b.catches).all(|(x, y)| {
                        x.declaration == y.declaration && x.body.structure_eq(&y.body)
                    })
                    && match (&a.finally, &b.finally) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x.body.structure_eq(&y.body),
                        _ => false,
                    }
            }

            _ => false,
        }
    }
}

impl StructureEq for Block {
    fn structure_eq(&self, other: &Self) -> bool {
        vec_structure_eq(&self.statements, &other.statements)
    }
}

impl StructureEq for IfStatement {
    fn structure_eq(&self, other: &Self) -> bool {
        self.condition.structure_eq(&other.condition)
            && body_structure_eq(&self.body, &other.body)
            && match (self.else_clause.as_deref(), other.else_clause.as_deref()) {
                (None, None) => true,
                (Some(ElseClause::If(a)), Some(ElseClause::If(b))) => a.structure_eq(b),
                (Some(ElseClause::Block(a)), Some(ElseClause::Block(b))) => a.structure_eq(b),
                _ => false,
            }
    }
}

impl StructureEq for Expr {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            // Grouping is a surface hint
            (Expr::Parenthesized(a), b) => a.structure_eq(b),
            (a, Expr::Parenthesized(b)) => a.structure_eq(b),

            (Expr::Literal(a), Expr::Literal(b)) => a == b,
            (Expr::StringConstant(a), Expr::StringConstant(b)) => a == b,
            (Expr::TemplateStringConstant(a), Expr::TemplateStringConstant(b)) => a == b,
            (Expr::Identifier(a), Expr::Identifier(b)) => a == b,

            (
                Expr::Binary {
                    left: l1,
                    op: o1,
                    right: r1,
                },
                Expr::Binary {
                    left: l2,
                    op: o2,
                    right: r2,
                },
            ) => o1 == o2 && l1.structure_eq(l2) && r1.structure_eq(r2),

            (
                Expr::PrefixUnary {
                    op: o1,
                    operand: e1,
                },
                Expr::PrefixUnary {
                    op: o2,
                    operand: e2,
                },
            )
            | (
                Expr::PostfixUnary {
                    op: o1,
                    operand: e1,
                },
                Expr::PostfixUnary {
                    op: o2,
                    operand: e2,
                },
            ) => o1 == o2 && e1.structure_eq(e2),

            (
                Expr::Cast {
                    type_name: t1,
                    operand: e1,
                },
                Expr::Cast {
                    type_name: t2,
                    operand: e2,
                },
            ) => t1 == t2 && e1.structure_eq(e2),

            // Ignore `is_static` - surface hint
            (
                Expr::MemberAccess {
                    target: t1,
                    member: m1,
                    is_static: _,
                },
                Expr::MemberAccess {
                    target: t2,
                    member: m2,
                    is_static: _,
                },
            ) => m1 == m2 && t1.structure_eq(t2),

            (
                Expr::ElementAccess {
                    target: t1,
                    index: i1,
                },
                Expr::ElementAccess {
                    target: t2,
                    index: i2,
                },
            ) => t1.structure_eq(t2) && i1.arguments.structure_eq(&i2.arguments),

            (Expr::Invocation(a), Expr::Invocation(b)) => {
                a.callee.structure_eq(&b.callee) && a.arguments.structure_eq(&b.arguments)
            }

            (
                Expr::ObjectCreation {
                    type_name: t1,
                    arguments: a1,
                },
                Expr::ObjectCreation {
                    type_name: t2,
                    arguments: a2,
                },
            ) => t1 == t2 && a1.structure_eq(a2),

            (
                Expr::ArrayCreation {
                    element_type: t1,
                    elements: e1,
                },
                Expr::ArrayCreation {
                    element_type: t2,
                    elements: e2,
                },
            ) => t1 == t2 && vec_structure_eq(e1, e2),

            (
                Expr::Assignment {
                    target: t1,
                    op: o1,
                    value: v1,
                },
                Expr::Assignment {
                    target: t2,
                    op: o2,
                    value: v2,
                },
            ) => o1 == o2 && t1.structure_eq(t2) && v1.structure_eq(v2),

            _ => false,
        }
    }
}

impl StructureEq for ArgumentList {
    fn structure_eq(&self, other: &Self) -> bool {
        self.arguments.len() == other.arguments.len()
            && self.arguments.iter().zip(&other.arguments).all(|(a, b)| {
                a.name == b.name
                    && option_structure_eq(a.expression.as_ref(), b.expression.as_ref())
            })
    }
}

// Helper functions

/// A loop or conditional body: a bare statement equals a one-statement block.
fn body_structure_eq(a: &Stmt, b: &Stmt) -> bool {
    match (a, b) {
        (Stmt::Block(x), Stmt::Block(y)) => x.structure_eq(y),
        (Stmt::Block(x), single) | (single, Stmt::Block(x)) => {
            x.statements.len() == 1 && x.statements[0].structure_eq(single)
        }
        _ => a.structure_eq(b),
    }
}

fn vec_structure_eq<T: StructureEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structure_eq(y))
}

fn option_structure_eq<T: StructureEq>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.structure_eq(y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_body_equals_single_statement_block() {
        let bare = Stmt::while_loop(Expr::ident("x"), Stmt::Break);
        let blocked = Stmt::while_loop(Expr::ident("x"), Stmt::block(vec![Stmt::Break]));

        assert!(bare.structure_eq(&blocked));
        assert_ne!(bare, blocked); // Regular equality still differs
    }

    #[test]
    fn test_two_statement_block_is_not_a_bare_body() {
        let bare = Stmt::while_loop(Expr::ident("x"), Stmt::Break);
        let blocked = Stmt::while_loop(
            Expr::ident("x"),
            Stmt::block(vec![Stmt::Break, Stmt::Break]),
        );

        assert!(!bare.structure_eq(&blocked));
    }

    #[test]
    fn test_parentheses_are_ignored() {
        let plain = Expr::binary(Expr::ident("a"), BinaryOperator::Add, Expr::ident("b"));
        let grouped = Expr::paren(plain.clone());

        assert!(plain.structure_eq(&grouped));
        assert!(grouped.structure_eq(&plain));
    }

    #[test]
    fn test_modifiers_are_ignored() {
        let public = Stmt::method("Run", vec![], Block::default());
        let mut bare = public.clone();
        if let Stmt::MethodDeclaration(method) = &mut bare {
            method.modifiers.clear();
        }

        assert!(public.structure_eq(&bare));
    }

    #[test]
    fn test_argument_order_matters() {
        let a = Expr::call(
            Expr::ident("f"),
            ArgumentList::positional(vec![Expr::literal("1"), Expr::literal("2")]),
        );
        let b = Expr::call(
            Expr::ident("f"),
            ArgumentList::positional(vec![Expr::literal("2"), Expr::literal("1")]),
        );

        assert!(!a.structure_eq(&b));
    }

    #[test]
    fn test_different_operators_not_equal() {
        let lt = Expr::binary(Expr::ident("a"), BinaryOperator::LessThan, Expr::ident("b"));
        let unknown = Expr::binary(Expr::ident("a"), BinaryOperator::Unknown, Expr::ident("b"));

        assert!(!lt.structure_eq(&unknown));
    }
}
