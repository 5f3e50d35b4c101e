//! Commit message template engine
//!
//! Supports the subset of Go `text/template` syntax commit templates need:
//!
//! - `{{ .name }}` prints a field
//! - `{{ if .name }}…{{ else if .other }}…{{ else }}…{{ end }}`
//! - `{{ if not .name }}`
//! - string and boolean literals: `{{ "text" }}`, `{{ true }}`
//! - comments: `{{/* note */}}`
//! - trim markers: `{{- ` strips whitespace before the action, ` -}}` after it
//!
//! Text outside actions is copied verbatim. A field missing from the
//! environment prints as `<no value>` and is false in conditions. Parsing and
//! execution are separate steps with separate errors.

use crate::config::FieldValue;
use crate::error::CommityError;
use std::collections::HashMap;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const NO_VALUE: &str = "<no value>";
const UNSUPPORTED_ACTIONS: [&str; 7] = [
    "range", "with", "define", "template", "block", "break", "continue",
];

/// Values available to a template, by field name
pub type Environment = HashMap<String, FieldValue>;

/// Parsed template, ready to execute any number of times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Output(Expr),
    If {
        branches: Vec<(Expr, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Field(Vec<String>),
    Str(String),
    Bool(bool),
    Not(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Output(Expr),
    If(Expr),
    ElseIf(Expr),
    Else,
    End,
    Comment,
}

#[derive(Debug)]
enum Token {
    Text(String),
    Action { action: Action, line: usize },
}

/// What closed a list of nodes
enum Terminator {
    End,
    Else,
    ElseIf(Expr),
}

impl Template {
    /// Parse a template source
    ///
    /// `name` only appears in error messages.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateParse` error for unclosed actions, unbalanced
    /// `if`/`else`/`end`, bad field names and unsupported actions
    pub fn parse(name: &str, source: &str) -> Result<Self, CommityError> {
        let tokens = lex(name, source)?;
        let mut parser = Parser {
            name,
            tokens: tokens.into_iter(),
        };

        let (nodes, terminator) = parser.parse_list()?;
        if let Some((terminator, line)) = terminator {
            let found = match terminator {
                Terminator::End => "{{end}}",
                Terminator::Else | Terminator::ElseIf(_) => "{{else}}",
            };
            return Err(parse_error(name, line, &format!("unexpected {found}")));
        }

        Ok(Self {
            name: name.to_owned(),
            nodes,
        })
    }

    /// Render the template with `env`
    ///
    /// # Errors
    ///
    /// Returns a `TemplateExecution` error when a field path goes through a
    /// scalar or a missing value
    pub fn execute(&self, env: &Environment) -> Result<String, CommityError> {
        let mut out = String::new();
        self.write_nodes(&self.nodes, env, &mut out)?;
        Ok(out)
    }

    fn write_nodes(
        &self,
        nodes: &[Node],
        env: &Environment,
        out: &mut String,
    ) -> Result<(), CommityError> {
        for node in nodes {
            match *node {
                Node::Text(ref text) => out.push_str(text),
                Node::Output(ref expr) => match self.eval(expr, env)? {
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push_str(NO_VALUE),
                },
                Node::If {
                    ref branches,
                    ref otherwise,
                } => {
                    let mut taken = None;
                    for &(ref condition, ref body) in branches {
                        if truthy(self.eval(condition, env)?.as_ref()) {
                            taken = Some(body);
                            break;
                        }
                    }
                    self.write_nodes(taken.unwrap_or(otherwise), env, out)?;
                }
            }
        }
        Ok(())
    }

    /// Evaluate an expression; `None` is a field missing from `env`
    fn eval(&self, expr: &Expr, env: &Environment) -> Result<Option<FieldValue>, CommityError> {
        match *expr {
            Expr::Str(ref s) => Ok(Some(FieldValue::Str(s.clone()))),
            Expr::Bool(b) => Ok(Some(FieldValue::Bool(b))),
            Expr::Not(ref inner) => Ok(Some(FieldValue::Bool(!truthy(
                self.eval(inner, env)?.as_ref(),
            )))),
            Expr::Field(ref path) => {
                let (first, rest) = path.split_first().ok_or_else(|| {
                    CommityError::template_execution(format!("template: {}: empty field", self.name))
                })?;
                let value = env.get(first);
                if let Some(next) = rest.first() {
                    let kind = match value {
                        Some(&FieldValue::Str(_)) => "string",
                        Some(&FieldValue::Bool(_)) => "bool",
                        None => {
                            return Err(CommityError::template_execution(format!(
                                "template: {}: nil pointer evaluating interface {{}}.{next}",
                                self.name
                            )));
                        }
                    };
                    return Err(CommityError::template_execution(format!(
                        "template: {}: can't evaluate field {next} in type {kind}",
                        self.name
                    )));
                }
                Ok(value.cloned())
            }
        }
    }
}

struct Parser<'src> {
    name: &'src str,
    tokens: std::vec::IntoIter<Token>,
}

impl Parser<'_> {
    /// Parse nodes until EOF or a closing action
    fn parse_list(&mut self) -> Result<(Vec<Node>, Option<(Terminator, usize)>), CommityError> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.next() {
            match token {
                Token::Text(text) => {
                    if !text.is_empty() {
                        nodes.push(Node::Text(text));
                    }
                }
                Token::Action { action, line } => match action {
                    Action::Comment => {}
                    Action::Output(expr) => nodes.push(Node::Output(expr)),
                    Action::If(condition) => nodes.push(self.parse_if(condition, line)?),
                    Action::End => return Ok((nodes, Some((Terminator::End, line)))),
                    Action::Else => return Ok((nodes, Some((Terminator::Else, line)))),
                    Action::ElseIf(condition) => {
                        return Ok((nodes, Some((Terminator::ElseIf(condition), line))));
                    }
                },
            }
        }

        Ok((nodes, None))
    }

    fn parse_if(&mut self, condition: Expr, line: usize) -> Result<Node, CommityError> {
        let mut branches = Vec::new();
        let mut condition = condition;

        loop {
            let (body, terminator) = self.parse_list()?;
            branches.push((condition, body));

            match terminator {
                None => return Err(parse_error(self.name, line, "unexpected EOF in if")),
                Some((Terminator::End, _)) => {
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                    });
                }
                Some((Terminator::ElseIf(next), _)) => condition = next,
                Some((Terminator::Else, else_line)) => {
                    let (otherwise, terminator) = self.parse_list()?;
                    return match terminator {
                        Some((Terminator::End, _)) => Ok(Node::If {
                            branches,
                            otherwise,
                        }),
                        Some((_, found_line)) => Err(parse_error(
                            self.name,
                            found_line,
                            "expected end; found {{else}}",
                        )),
                        None => Err(parse_error(self.name, else_line, "unexpected EOF in else")),
                    };
                }
            }
        }
    }
}

fn truthy(value: Option<&FieldValue>) -> bool {
    value.is_some_and(FieldValue::is_truthy)
}

fn parse_error(name: &str, line: usize, message: &str) -> CommityError {
    CommityError::template_parse(format!("template: {name}:{line}: {message}"))
}

fn line_at(source: &str, offset: usize) -> usize {
    source
        .get(..offset)
        .map_or(0, |prefix| prefix.matches('\n').count())
        + 1
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split the source into text and actions, applying trim markers
fn lex(name: &str, source: &str) -> Result<Vec<Token>, CommityError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut trim_next = false;

    while let Some(start) = rest.find(LEFT_DELIM) {
        let offset = source.len() - rest.len() + start;
        let line = line_at(source, offset);

        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start_matches(is_space);
        }

        let mut inner = &rest[start + LEFT_DELIM.len()..];
        let trim_left = inner.starts_with('-') && inner[1..].starts_with(is_space);
        if trim_left {
            text = text.trim_end_matches(is_space);
            inner = &inner[1..];
        }
        tokens.push(Token::Text(text.to_owned()));

        let end =
            find_action_end(inner).ok_or_else(|| parse_error(name, line, "unclosed action"))?;
        let mut body = &inner[..end];
        trim_next = body.ends_with('-')
            && body[..body.len() - 1].ends_with(is_space);
        if trim_next {
            body = &body[..body.len() - 1];
        }

        tokens.push(Token::Action {
            action: parse_action(name, line, body)?,
            line,
        });
        rest = &inner[end + RIGHT_DELIM.len()..];
    }

    let text = if trim_next {
        rest.trim_start_matches(is_space)
    } else {
        rest
    };
    tokens.push(Token::Text(text.to_owned()));

    Ok(tokens)
}

/// Offset of the first `}}` that is not inside a quoted string
fn find_action_end(inner: &str) -> Option<usize> {
    let mut quoted = false;
    let mut escaped = false;

    for (offset, c) in inner.char_indices() {
        if quoted {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
        } else if c == '"' {
            quoted = true;
        } else if inner[offset..].starts_with(RIGHT_DELIM) {
            return Some(offset);
        }
    }

    None
}

fn parse_action(name: &str, line: usize, body: &str) -> Result<Action, CommityError> {
    let trimmed = body.trim_matches(is_space);

    if trimmed.starts_with("/*") {
        if trimmed.ends_with("*/") && trimmed.len() >= 4 {
            return Ok(Action::Comment);
        }
        return Err(parse_error(name, line, "unclosed comment"));
    }

    let words = split_words(name, line, trimmed)?;
    let Some((keyword, args)) = words.split_first() else {
        return Err(parse_error(name, line, "missing value for command"));
    };

    match keyword.as_str() {
        "if" => Ok(Action::If(parse_expr(name, line, args, "if")?)),
        "else" => match args.split_first() {
            None => Ok(Action::Else),
            Some((next, condition)) if next == "if" => {
                Ok(Action::ElseIf(parse_expr(name, line, condition, "if")?))
            }
            Some(_) => Err(parse_error(name, line, "unexpected argument to else")),
        },
        "end" if args.is_empty() => Ok(Action::End),
        "end" => Err(parse_error(name, line, "unexpected argument to end")),
        _ => Ok(Action::Output(parse_expr(name, line, &words, "command")?)),
    }
}

fn parse_expr(
    name: &str,
    line: usize,
    words: &[String],
    context: &str,
) -> Result<Expr, CommityError> {
    match *words {
        [] => Err(parse_error(
            name,
            line,
            &format!("missing value for {context}"),
        )),
        [ref word] => parse_operand(name, line, word),
        [ref function, ref operand] if function == "not" => Ok(Expr::Not(Box::new(
            parse_operand(name, line, operand)?,
        ))),
        [ref function, ..] if function == "not" => Err(parse_error(
            name,
            line,
            "wrong number of args for not: want 1",
        )),
        [ref first, ..] => Err(parse_error(
            name,
            line,
            &format!("can't give argument to non-function {first}"),
        )),
    }
}

fn parse_operand(name: &str, line: usize, word: &str) -> Result<Expr, CommityError> {
    if let Some(path) = word.strip_prefix('.') {
        if path.is_empty() {
            return Err(parse_error(name, line, "expected a field name after \".\""));
        }
        let segments: Vec<String> = path.split('.').map(str::to_owned).collect();
        if let Some(bad) = segments.iter().find(|segment| !is_identifier(segment)) {
            return Err(parse_error(
                name,
                line,
                &format!("bad field name \"{bad}\" in {word}"),
            ));
        }
        return Ok(Expr::Field(segments));
    }

    if let Some(literal) = word.strip_prefix('"') {
        return Ok(Expr::Str(literal.to_owned()));
    }

    match word {
        "true" => Ok(Expr::Bool(true)),
        "false" => Ok(Expr::Bool(false)),
        "not" => Err(parse_error(name, line, "wrong number of args for not: want 1")),
        _ if UNSUPPORTED_ACTIONS.contains(&word) => Err(parse_error(
            name,
            line,
            &format!("unsupported action \"{word}\""),
        )),
        _ => Err(parse_error(
            name,
            line,
            &format!("function \"{word}\" not defined"),
        )),
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Split an action body into words
///
/// Quoted strings are kept as one word, unescaped, with a leading `"` marker.
fn split_words(name: &str, line: usize, body: &str) -> Result<Vec<String>, CommityError> {
    let mut words = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        if is_space(c) {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut literal = String::from('"');
            loop {
                match chars.next() {
                    None => return Err(parse_error(name, line, "unterminated quoted string")),
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => literal.push('\n'),
                        Some('t') => literal.push('\t'),
                        Some('\\') => literal.push('\\'),
                        Some('"') => literal.push('"'),
                        Some(other) => {
                            return Err(parse_error(
                                name,
                                line,
                                &format!("unknown escape sequence \\{other}"),
                            ));
                        }
                        None => {
                            return Err(parse_error(name, line, "unterminated quoted string"));
                        }
                    },
                    Some(other) => literal.push(other),
                }
            }
            words.push(literal);
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if is_space(c) || c == '"' {
                break;
            }
            word.push(c);
            chars.next();
        }
        words.push(word);
    }

    Ok(words)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, FieldValue)]) -> Environment {
        pairs
            .iter()
            .map(|&(ref k, ref v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn s(value: &str) -> FieldValue {
        FieldValue::Str(value.to_owned())
    }

    fn render(source: &str, env: &Environment) -> Result<String, CommityError> {
        Template::parse("message", source)?.execute(env)
    }

    #[test]
    fn test_text_is_preserved_verbatim() {
        let source = "  leading\n\n{{ .a }}  \ttrailing \n";
        let out = render(source, &env(&[("a", s("x"))])).unwrap();
        assert_eq!(out, "  leading\n\nx  \ttrailing \n");
    }

    #[test]
    fn test_interpolation_without_spaces() {
        let out = render("{{.a}}-{{ .b }}", &env(&[("a", s("1")), ("b", FieldValue::Bool(true))]))
            .unwrap();
        assert_eq!(out, "1-true");
    }

    #[test]
    fn test_if_else_chain() {
        let source = "{{ if .a }}A{{ else if .b }}B{{ else }}C{{ end }}";
        let both = env(&[("a", s("")), ("b", FieldValue::Bool(true))]);
        assert_eq!(render(source, &both).unwrap(), "B");
        let neither = env(&[("a", s("")), ("b", FieldValue::Bool(false))]);
        assert_eq!(render(source, &neither).unwrap(), "C");
        let first = env(&[("a", s("y")), ("b", FieldValue::Bool(false))]);
        assert_eq!(render(source, &first).unwrap(), "A");
    }

    #[test]
    fn test_not_and_literals() {
        let values = env(&[("flag", FieldValue::Bool(false))]);
        assert_eq!(render("{{ if not .flag }}off{{ end }}", &values).unwrap(), "off");
        assert_eq!(render(r#"{{ "a \"b\"\n" }}"#, &values).unwrap(), "a \"b\"\n");
        assert_eq!(render("{{ if true }}t{{ end }}", &values).unwrap(), "t");
    }

    #[test]
    fn test_nested_if() {
        let source = "{{ if .a }}[{{ if .b }}{{ .b }}{{ end }}]{{ end }}";
        let values = env(&[("a", FieldValue::Bool(true)), ("b", s("x"))]);
        assert_eq!(render(source, &values).unwrap(), "[x]");
    }

    #[test]
    fn test_trim_markers() {
        let source = "a  \n{{- .x -}}\n  b";
        assert_eq!(render(source, &env(&[("x", s("X"))])).unwrap(), "aXb");
        // A dash without a following space is not a trim marker
        let err = render("a {{-.x}}", &env(&[("x", s("X"))])).unwrap_err();
        assert!(matches!(err, CommityError::TemplateParse { .. }));
    }

    #[test]
    fn test_comments_are_dropped() {
        let out = render("a{{/* note */}}b", &Environment::new()).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_parse_errors() {
        for source in [
            "{{ .a ",
            "{{ if .a }}x",
            "x{{ end }}",
            "{{ else }}",
            "{{ if .a }}x{{ else }}y{{ else }}z{{ end }}",
            "{{ range .a }}{{ end }}",
            "{{ upper .a }}",
            "{{ .a .b }}",
            "{{ . }}",
            "{{ .a-b }}",
            "{{ }}",
            "{{ if }}{{ end }}",
            "{{ \"open }}",
        ] {
            let err = Template::parse("message", source).unwrap_err();
            assert!(
                matches!(err, CommityError::TemplateParse { .. }),
                "expected parse error for {source:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = Template::parse("message", "line one\n{{ if .a }}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse template: template: message:2: unexpected EOF in if"
        );
    }

    #[test]
    fn test_missing_field_has_no_value() {
        let template = Template::parse("message", "[{{ .missing }}]").unwrap();
        assert_eq!(template.execute(&Environment::new()).unwrap(), "[<no value>]");

        let source = "{{ if .missing }}yes{{ else }}no{{ end }}{{ if not .missing }}!{{ end }}";
        assert_eq!(render(source, &Environment::new()).unwrap(), "no!");
    }

    #[test]
    fn test_execution_errors() {
        let template = Template::parse("message", "{{ .a.b }}").unwrap();
        let err = template.execute(&env(&[("a", s("x"))])).unwrap_err();
        assert!(matches!(err, CommityError::TemplateExecution { .. }));
        assert!(err.to_string().contains("can't evaluate field b in type string"));

        let template = Template::parse("message", "{{ .missing.b }}").unwrap();
        let err = template.execute(&Environment::new()).unwrap_err();
        assert!(matches!(err, CommityError::TemplateExecution { .. }));
    }

    #[test]
    fn test_closing_delimiter_inside_string_literal() {
        assert_eq!(render(r#"{{ "}}" }}"#, &Environment::new()).unwrap(), "}}");
        assert_eq!(
            render(r#"a{{ "\"}}" }}b{{ .x }}"#, &env(&[("x", s("X"))])).unwrap(),
            "a\"}}bX"
        );
    }

    #[test]
    fn test_untaken_branch_is_not_evaluated() {
        let template = Template::parse("message", "{{ if .a }}{{ .missing }}{{ end }}").unwrap();
        assert_eq!(template.execute(&env(&[("a", s(""))])).unwrap(), "");
    }
}
