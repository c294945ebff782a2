// Pipe-syntax parser: `<expr> | <name>[:<arg>[:<arg>...]] [| <name2>...]`
//
// The resolver core only consumes parsed expressions; the concrete binding
// syntax is this host's concern.
use convey_core::Expr;
use convey_core::error::{ConveyError, Result};
use serde_json::Value;

/// A binding expression split into its base and converter steps
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBinding {
    pub base: Expr,
    pub steps: Vec<(String, Vec<Expr>)>,
}

/// Parse a full binding expression
pub fn parse_binding(input: &str) -> Result<ParsedBinding> {
    let mut segments = split_top_level(input, '|').into_iter();
    let base_text = segments
        .next()
        .ok_or_else(|| ConveyError::expr("empty binding expression"))?;
    let base = parse_expr(&base_text)?;

    let mut steps = Vec::new();
    for segment in segments {
        steps.push(parse_step(&segment)?);
    }

    Ok(ParsedBinding { base, steps })
}

/// Parse one `name:arg:arg` step segment
fn parse_step(segment: &str) -> Result<(String, Vec<Expr>)> {
    let mut parts = split_top_level(segment, ':').into_iter();
    let name = parts
        .next()
        .map(|n| n.trim().to_string())
        .unwrap_or_default();

    if name.is_empty() {
        return Err(ConveyError::expr("converter name is empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    {
        return Err(ConveyError::expr(format!("invalid converter name '{name}'")));
    }

    let args = parts.map(|p| parse_expr(&p)).collect::<Result<Vec<_>>>()?;
    Ok((name, args))
}

/// Parse a single expression token: a JSON literal, a single-quoted string,
/// or a dotted scope path
pub fn parse_expr(token: &str) -> Result<Expr> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConveyError::expr("empty expression"));
    }

    // Single-quoted strings are shell-friendly aliases for JSON strings
    if let Some(inner) = token
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Ok(Expr::Literal(Value::String(inner.to_string())));
    }

    // Anything valid as JSON is a literal: numbers, quoted strings,
    // true/false/null, arrays, objects
    if let Ok(value) = serde_json::from_str::<Value>(token) {
        return Ok(Expr::Literal(value));
    }

    parse_path(token)
}

fn parse_path(token: &str) -> Result<Expr> {
    let segments: Vec<String> = token.split('.').map(str::to_string).collect();

    for segment in &segments {
        let valid = !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if !valid {
            return Err(ConveyError::expr(format!(
                "'{token}' is neither a literal nor a scope path"
            )));
        }
    }

    Ok(Expr::Path(segments))
}

/// Split on a separator, ignoring separators inside quotes or brackets
fn split_top_level(input: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '{' | '[' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ if c == sep && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);

    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_base_only() {
        let parsed = parse_binding("user.name").unwrap();
        assert_eq!(parsed.base, Expr::path(["user", "name"]));
        assert!(parsed.steps.is_empty());
    }

    #[test]
    fn test_parses_chain_with_args() {
        let parsed = parse_binding("price | clamp:0:10 | prefix:\"$\"").unwrap();
        assert_eq!(parsed.base, Expr::path(["price"]));
        assert_eq!(parsed.steps.len(), 2);
        assert_eq!(parsed.steps[0].0, "clamp");
        assert_eq!(
            parsed.steps[0].1,
            vec![Expr::literal(json!(0)), Expr::literal(json!(10))]
        );
        assert_eq!(parsed.steps[1].0, "prefix");
        assert_eq!(parsed.steps[1].1, vec![Expr::literal(json!("$"))]);
    }

    #[test]
    fn test_literal_bases() {
        assert_eq!(parse_expr("15").unwrap(), Expr::literal(json!(15)));
        assert_eq!(parse_expr("1234.5").unwrap(), Expr::literal(json!(1234.5)));
        assert_eq!(parse_expr("true").unwrap(), Expr::literal(json!(true)));
        assert_eq!(parse_expr("null").unwrap(), Expr::Literal(Value::Null));
        assert_eq!(
            parse_expr("[1, 2]").unwrap(),
            Expr::literal(json!([1, 2]))
        );
        assert_eq!(parse_expr("'ok'").unwrap(), Expr::literal(json!("ok")));
    }

    #[test]
    fn test_dynamic_args_are_paths() {
        let parsed = parse_binding("total | scale:settings.factor").unwrap();
        assert_eq!(
            parsed.steps[0].1,
            vec![Expr::path(["settings", "factor"])]
        );
    }

    #[test]
    fn test_separators_inside_quotes_and_brackets() {
        let parsed = parse_binding(r#"name | prefix:"a|b:c""#).unwrap();
        assert_eq!(parsed.steps[0].1, vec![Expr::literal(json!("a|b:c"))]);

        let parsed = parse_binding(r#"x | pad:{"width": 3, "fill": "0"}"#).unwrap();
        assert_eq!(
            parsed.steps[0].1,
            vec![Expr::literal(json!({"width": 3, "fill": "0"}))]
        );
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(parse_binding("").is_err());
        assert!(parse_binding("x | ").is_err());
        assert!(parse_binding("x | bad name").is_err());
        assert!(parse_binding("x | take:").is_err());
        assert!(parse_expr("a..b").is_err());
        assert!(parse_expr("a-b").is_err());
    }
}
