// Expression evaluation against a data context

use anyhow::Result;
use serde_json::Value;
use std::borrow::Cow;

use super::ast::{Expr, Operand, PathExpr, Predicate, Scope, Template, TemplatePart};
use crate::error::RenderError;

/// What to write in place of an expression whose value is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// Leave the `${...}` span exactly as written
    KeepPlaceholder,
    /// Write the path's own name, e.g. `img` for `${img}`
    UseKey,
}

/// The data an expression is evaluated against.
///
/// `data` moves as Containers iterate their bound arrays; `root` stays on the
/// top-level context of the render call. Both are borrowed per call, so a
/// renderer holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub data: &'a Value,
    pub root: &'a Value,
}

impl<'a> RenderContext<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { data: root, root }
    }

    /// Same root, different current context
    pub fn with_data(&self, data: &'a Value) -> Self {
        Self {
            data,
            root: self.root,
        }
    }

    /// Walk a path. Missing keys and JSON `null` resolve to `None`; indexing a
    /// non-array or past the end of one is an error.
    pub fn resolve_path(&self, path: &PathExpr) -> Result<Option<&'a Value>> {
        let start = match path.scope {
            Scope::Root => self.root,
            Scope::Current | Scope::Data => self.data,
        };

        let mut current = Some(start);
        for segment in &path.segments {
            current = current
                .and_then(Value::as_object)
                .and_then(|map| map.get(segment));
        }

        if let Some(index) = path.index {
            let items = current
                .and_then(Value::as_array)
                .ok_or_else(|| RenderError::NotAnArray(path.key()))?;
            let item = items.get(index).ok_or_else(|| RenderError::IndexOutOfRange {
                path: path.key(),
                index,
            })?;
            current = Some(item);
        }

        Ok(current.filter(|value| !value.is_null()))
    }

    pub fn evaluate_operand(&self, operand: &Operand) -> Result<Option<Cow<'a, Value>>> {
        match operand {
            Operand::Literal(s) => Ok(Some(Cow::Owned(Value::String(s.clone())))),
            Operand::Bool(b) => Ok(Some(Cow::Owned(Value::Bool(*b)))),
            Operand::Path(path) => Ok(self.resolve_path(path)?.map(Cow::Borrowed)),
        }
    }

    /// Evaluate an expression to the text it substitutes, or `None` when absent
    pub fn evaluate(&self, expr: &Expr) -> Result<Option<String>> {
        match expr {
            Expr::Value(operand) => Ok(self.evaluate_operand(operand)?.map(|v| stringify(&v))),
            Expr::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if is_truthy(self.evaluate_operand(cond)?.as_deref()) {
                    then
                } else {
                    otherwise
                };
                let value = self.evaluate_operand(branch)?;
                Ok(Some(value.map(|v| stringify(&v)).unwrap_or_default()))
            }
            Expr::JsonStringify(operand) => match self.evaluate_operand(operand)? {
                Some(value) => Ok(Some(serde_json::to_string(&*value)?)),
                None => Ok(None),
            },
        }
    }

    pub fn is_visible(&self, predicate: &Predicate) -> Result<bool> {
        match predicate {
            Predicate::NotNullOrEmpty(path) => Ok(match self.resolve_path(path)? {
                None => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            }),
        }
    }

    /// Substitute every expression in a parsed field
    pub fn interpolate(&self, template: &Template, absent: AbsentPolicy) -> Result<String> {
        let mut result = String::new();

        for part in &template.parts {
            match part {
                TemplatePart::Literal(s) => result.push_str(s),
                TemplatePart::Expression { expr, source } => match self.evaluate(expr)? {
                    Some(value) => result.push_str(&value),
                    None => match (absent, expr) {
                        (AbsentPolicy::UseKey, Expr::Value(Operand::Path(path))) => {
                            result.push_str(&path.key())
                        }
                        _ => result.push_str(source),
                    },
                },
            }
        }

        Ok(result)
    }
}

/// Non-empty, non-false and present values are truthy
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(_)) => true,
    }
}

/// Strings substitute as their raw text, everything else as compact JSON
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
