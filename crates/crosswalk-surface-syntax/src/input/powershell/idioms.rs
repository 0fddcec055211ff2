//! Command idioms rewritten into more specific IR.
//!
//! A PowerShell command call first becomes a generic [`Invocation`]. The
//! rewrite pass then looks the command name up (case-insensitively) in
//! [`COMMAND_IDIOMS`] and lets the matching rule produce a better node. Rules
//! are pure functions, so new idioms are added to the table without touching
//! the tree walker.

use crate::ir::{Argument, ArgumentList, Expr, Invocation};

/// A rewrite rule for one command name.
pub struct CommandIdiom {
    pub command: &'static str,
    pub rewrite: fn(Invocation) -> Expr,
}

pub static COMMAND_IDIOMS: &[CommandIdiom] = &[CommandIdiom {
    command: "New-Object",
    rewrite: rewrite_new_object,
}];

/// Apply the first matching idiom, or return the invocation unchanged.
pub fn rewrite_command(invocation: Invocation) -> Expr {
    let idiom = invocation.callee_name().and_then(|name| {
        COMMAND_IDIOMS
            .iter()
            .find(|idiom| idiom.command.eq_ignore_ascii_case(name))
    });
    match idiom {
        Some(idiom) => (idiom.rewrite)(invocation),
        None => Expr::Invocation(invocation),
    }
}

/// `New-Object [-TypeName] <T> [[-ArgumentList] <args>]` becomes `new T(args)`.
///
/// Fires only when the type name is a literal string. Parameters bind by name
/// first, then positionally in declaration order. Any other named parameter
/// (`-ComObject`, `-Property`, ...) or a positional value left unbound
/// leaves the call alone.
fn rewrite_new_object(invocation: Invocation) -> Expr {
    let args = &invocation.arguments.arguments;

    let has_foreign_parameter = args.iter().any(|arg| {
        arg.name.is_some() && !arg.has_name("TypeName") && !arg.has_name("ArgumentList")
    });
    if has_foreign_parameter {
        return Expr::Invocation(invocation);
    }

    let (type_name, constructor_args, unbound) = {
        let mut positional = args
            .iter()
            .filter(|arg| arg.name.is_none())
            .filter_map(|arg| arg.expression.as_ref());
        let named_value = |name: &str| {
            invocation
                .arguments
                .find_named(name)
                .and_then(|arg| arg.expression.as_ref())
        };

        let type_name = match named_value("TypeName").or_else(|| positional.next()) {
            Some(Expr::StringConstant(name)) => Some(name.clone()),
            _ => None,
        };
        let constructor_args =
            constructor_arguments(named_value("ArgumentList").or_else(|| positional.next()));
        (type_name, constructor_args, positional.next().is_some())
    };

    match type_name {
        Some(type_name) if !unbound => {
            tracing::debug!(type_name = %type_name, "rewriting New-Object as object creation");
            Expr::new_object(type_name, constructor_args)
        }
        _ => Expr::Invocation(invocation),
    }
}

/// Spread an argument-list value into constructor arguments.
///
/// `-ArgumentList 1, 2` and `-ArgumentList (1, 2)` give two arguments; any
/// other value is a single argument.
fn constructor_arguments(value: Option<&Expr>) -> ArgumentList {
    let mut value = match value {
        Some(value) => value,
        None => return ArgumentList::default(),
    };
    while let Expr::Parenthesized(inner) = value {
        value = &**inner;
    }
    match value {
        Expr::ArrayCreation {
            element_type: None,
            elements,
        } => ArgumentList::positional(elements.clone()),
        other => ArgumentList::new(vec![Argument::positional(other.clone())]),
    }
}
