//! Reference scanning for [`Expr::TemplateStringConstant`](super::Expr).
//!
//! A template body holds expanded text: escape sequences are already resolved
//! to the characters they denote, and only `$` references remain to be
//! interpolated. Recognized references are `$name`, `$scope:name`, `${name}`,
//! `${scope:name}` and `$( ... )`. A `$` that starts none of these is a
//! literal dollar sign.

/// One piece of a template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePart<'a> {
    /// Literal characters, with no escapes left in them.
    Text(&'a str),
    Variable {
        /// `env` in `$env:PATH`.
        scope: Option<&'a str>,
        name: &'a str,
        /// Written as `${...}`.
        braced: bool,
    },
    /// Source of the expression inside `$( ... )`.
    SubExpression(&'a str),
}

/// Split a template body into text and references, in order.
pub fn template_parts(template: &str) -> Vec<TemplatePart<'_>> {
    let mut parts = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = template[pos..].find('$') {
        let dollar = pos + offset;
        let Some((part, len)) = reference(&template[dollar + 1..]) else {
            pos = dollar + 1;
            continue;
        };
        if text_start < dollar {
            parts.push(TemplatePart::Text(&template[text_start..dollar]));
        }
        parts.push(part);
        pos = dollar + 1 + len;
        text_start = pos;
    }

    if text_start < template.len() {
        parts.push(TemplatePart::Text(&template[text_start..]));
    }
    parts
}

/// The reference following a `$`, and how many bytes it spans.
fn reference(rest: &str) -> Option<(TemplatePart<'_>, usize)> {
    if let Some(inner) = rest.strip_prefix('{') {
        let end = inner.find('}')?;
        let (scope, name) = split_scope(&inner[..end]);
        let part = TemplatePart::Variable {
            scope,
            name,
            braced: true,
        };
        return Some((part, end + 2));
    }

    if let Some(inner) = rest.strip_prefix('(') {
        let mut depth = 1;
        for (i, c) in inner.char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((TemplatePart::SubExpression(&inner[..i]), i + 2));
                    }
                }
                _ => {}
            }
        }
        return None;
    }

    let name_len = identifier_len(rest);
    if name_len == 0 {
        return None;
    }
    if let Some(qualified) = rest[name_len..].strip_prefix(':') {
        let qualified_len = identifier_len(qualified);
        if qualified_len > 0 {
            let part = TemplatePart::Variable {
                scope: Some(&rest[..name_len]),
                name: &qualified[..qualified_len],
                braced: false,
            };
            return Some((part, name_len + 1 + qualified_len));
        }
    }

    let part = TemplatePart::Variable {
        scope: None,
        name: &rest[..name_len],
        braced: false,
    };
    Some((part, name_len))
}

fn identifier_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(s.len(), |(i, _)| i)
}

fn split_scope(braced: &str) -> (Option<&str>, &str) {
    match braced.split_once(':') {
        Some((scope, name)) if !scope.is_empty() => (Some(scope), name),
        _ => (None, braced),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TemplatePart::*;

    fn var(name: &str) -> TemplatePart<'_> {
        Variable {
            scope: None,
            name,
            braced: false,
        }
    }

    #[test]
    fn test_plain_and_braced_variables() {
        assert_eq!(
            template_parts("Hello $name, ${user id}!"),
            vec![
                Text("Hello "),
                var("name"),
                Text(", "),
                Variable {
                    scope: None,
                    name: "user id",
                    braced: true
                },
                Text("!"),
            ]
        );
    }

    #[test]
    fn test_scoped_variables() {
        assert_eq!(
            template_parts("$env:PATH;${script:count}"),
            vec![
                Variable {
                    scope: Some("env"),
                    name: "PATH",
                    braced: false
                },
                Text(";"),
                Variable {
                    scope: Some("script"),
                    name: "count",
                    braced: true
                },
            ]
        );
        // A trailing colon is text.
        assert_eq!(template_parts("$x: done"), vec![var("x"), Text(": done")]);
    }

    #[test]
    fn test_subexpression_nesting() {
        assert_eq!(
            template_parts("n=$($list.Count + (1))."),
            vec![Text("n="), SubExpression("$list.Count + (1)"), Text(".")]
        );
    }

    #[test]
    fn test_lone_dollars_are_text() {
        assert_eq!(template_parts("cost $5 or $"), vec![Text("cost "), var("5"), Text(" or $")]);
        assert_eq!(template_parts("a $ b"), vec![Text("a $ b")]);
        assert_eq!(template_parts("open $(x"), vec![Text("open $(x")]);
        assert!(template_parts("").is_empty());
    }
}
