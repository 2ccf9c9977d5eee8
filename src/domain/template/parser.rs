// Expression parser using recursive descent

use anyhow::{bail, Result};

use super::ast::{Expr, Operand, PathExpr, Predicate, Scope, Template, TemplatePart};
use super::normalizer::normalize_expressions;

const IF_FN: &str = "if";
const JSON_STRINGIFY_FN: &str = "jsonStringify";

pub struct ExpressionParser {
    input: String,
    pos: usize,
}

impl ExpressionParser {
    /// Split a string field into literal text and `${...}` expressions.
    ///
    /// Spans whose body falls outside the expression grammar, and an unterminated
    /// `${`, are kept as literal text.
    pub fn parse(text: &str) -> Template {
        let text = normalize_expressions(text);
        let mut parts = Vec::new();
        let mut literal_buf = String::new();
        let mut rest = text.as_str();

        while let Some(start) = rest.find("${") {
            literal_buf.push_str(&rest[..start]);
            let span = &rest[start..];

            let Some(end) = find_span_end(span) else {
                literal_buf.push_str(span);
                rest = "";
                break;
            };

            let source = &span[..=end];
            match Self::parse_expression(&source[2..end]) {
                Ok(expr) => {
                    if !literal_buf.is_empty() {
                        parts.push(TemplatePart::Literal(std::mem::take(&mut literal_buf)));
                    }
                    parts.push(TemplatePart::Expression {
                        expr,
                        source: source.to_string(),
                    });
                }
                Err(_) => literal_buf.push_str(source),
            }
            rest = &span[end + 1..];
        }

        literal_buf.push_str(rest);
        if !literal_buf.is_empty() {
            parts.push(TemplatePart::Literal(literal_buf));
        }

        Template::new(parts)
    }

    /// Parse the body of a single `${...}` span (without the delimiters)
    pub fn parse_expression(body: &str) -> Result<Expr> {
        let mut parser = Self {
            input: body.to_string(),
            pos: 0,
        };
        let expr = parser.parse_expr()?;
        parser.expect_end()?;
        Ok(expr)
    }

    /// Parse a `$data` binding, written either as a bare path or as `${path}`
    pub fn parse_binding(text: &str) -> Result<PathExpr> {
        let text = normalize_expressions(text);
        let body = strip_span(&text).unwrap_or(&text);
        parse_path(body)
    }

    /// Recognise a `$when` predicate. Only `var!=null&&var!=''` is supported; any
    /// other text yields `None`, meaning the element is always visible.
    pub fn parse_predicate(text: &str) -> Option<Predicate> {
        let text = normalize_expressions(text);
        let body = strip_span(&text).unwrap_or(&text);

        let (left, right) = body.split_once("&&")?;
        let left = left.strip_suffix("!=null")?;
        let right = right.strip_suffix("!=''")?;
        if left != right {
            return None;
        }

        parse_path(left).ok().map(Predicate::NotNullOrEmpty)
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let start = self.pos;
        let name = self.parse_identifier();

        if self.peek_char() != Some('(') {
            // Not a function call, re-read as a plain operand
            self.pos = start;
            return self.parse_operand().map(Expr::Value);
        }

        self.consume_char()?; // consume (
        let args = self.parse_arguments()?;

        match (name.as_str(), args.as_slice()) {
            (IF_FN, [cond, then, otherwise]) => Ok(Expr::If {
                cond: cond.clone(),
                then: then.clone(),
                otherwise: otherwise.clone(),
            }),
            (IF_FN, _) => bail!("'if' takes exactly 3 arguments, got {}", args.len()),
            (JSON_STRINGIFY_FN, [arg @ Operand::Path(_)]) => Ok(Expr::JsonStringify(arg.clone())),
            (JSON_STRINGIFY_FN, _) => bail!("'jsonStringify' takes a single path argument"),
            (other, _) => bail!("Unknown function: {}", other),
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Operand>> {
        let mut args = Vec::new();

        loop {
            args.push(self.parse_operand()?);
            match self.consume_char()? {
                ',' => continue,
                ')' => break,
                ch => bail!("Unexpected '{}' in argument list at position {}", ch, self.pos),
            }
        }

        Ok(args)
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        match self.peek_char() {
            Some(q @ ('\'' | '"')) => {
                self.consume_char()?; // consume opening quote
                let mut value = String::new();
                loop {
                    let ch = self.consume_char()?;
                    if ch == q {
                        break;
                    }
                    value.push(ch);
                }
                Ok(Operand::Literal(value))
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(ch) = self.peek_char() {
                    if ch == ',' || ch == ')' {
                        break;
                    }
                    token.push(self.consume_char()?);
                }

                match token.as_str() {
                    "true" => Ok(Operand::Bool(true)),
                    "false" => Ok(Operand::Bool(false)),
                    _ => parse_path(&token).map(Operand::Path),
                }
            }
            None => bail!("Expected operand at position {}", self.pos),
        }
    }

    fn parse_identifier(&mut self) -> String {
        let mut ident = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }

        ident
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Result<char> {
        let ch = self
            .peek_char()
            .ok_or_else(|| anyhow::anyhow!("Unexpected end of input at position {}", self.pos))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek_char() {
            None => Ok(()),
            Some(ch) => bail!("Unexpected '{}' at position {}", ch, self.pos),
        }
    }
}

/// Parse a dotted path with an optional trailing `[index]`
pub fn parse_path(text: &str) -> Result<PathExpr> {
    let (path, index) = match text.strip_suffix(']') {
        Some(head) => {
            let Some((path, index)) = head.rsplit_once('[') else {
                bail!("Unbalanced ']' in path '{}'", text);
            };
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                bail!("Invalid index '{}' in path '{}'", index, text);
            }
            // Too large for usize can never be in range; resolving reports it
            let index = index.parse::<usize>().unwrap_or(usize::MAX);
            (path, Some(index))
        }
        None => (text, None),
    };

    if path.is_empty() {
        bail!("Empty path");
    }

    let mut segments = Vec::new();
    for segment in path.split('.') {
        if segment.is_empty() {
            bail!("Empty segment in path '{}'", text);
        }
        if let Some(ch) = segment.chars().find(|ch| !is_path_char(*ch)) {
            bail!("Invalid character '{}' in path '{}'", ch, text);
        }
        segments.push(segment.to_string());
    }

    let scope = match segments[0].as_str() {
        "$data" => Scope::Data,
        "$root" => Scope::Root,
        _ => Scope::Current,
    };
    if scope != Scope::Current {
        segments.remove(0);
    }

    let path = PathExpr::new(scope, segments);
    Ok(match index {
        Some(index) => path.with_index(index),
        None => path,
    })
}

fn is_path_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '$' | '-' | '@')
}

/// Byte offset of the `}` closing the span that starts at `span[0..2] == "${"`
fn find_span_end(span: &str) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (offset, ch) in span.char_indices().skip(2) {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                '}' => return Some(offset),
                _ => {}
            },
        }
    }

    None
}

/// The body of `text` when the whole of it is a single `${...}` span
fn strip_span(text: &str) -> Option<&str> {
    if !text.starts_with("${") {
        return None;
    }
    let end = find_span_end(text)?;
    if end + 1 == text.len() {
        Some(&text[2..end])
    } else {
        None
    }
}
