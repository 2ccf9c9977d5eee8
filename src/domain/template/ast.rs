// Abstract Syntax Tree types for `${...}` expressions

/// A string field split into literal text and expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub parts: Vec<TemplatePart>,
}

impl Template {
    pub fn new(parts: Vec<TemplatePart>) -> Self {
        Self { parts }
    }

    /// True when the field contains no expression to evaluate
    pub fn is_literal(&self) -> bool {
        self.parts
            .iter()
            .all(|part| matches!(part, TemplatePart::Literal(_)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Literal(String),
    /// An expression plus the exact source text of its `${...}` span, kept so the
    /// span can be written back verbatim when its value is absent.
    Expression { expr: Expr, source: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Value(Operand),
    If {
        cond: Operand,
        then: Operand,
        otherwise: Operand,
    },
    JsonStringify(Operand),
}

/// The leaf forms an expression argument may take
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(String),
    Bool(bool),
    Path(PathExpr),
}

/// Where a path starts its walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Bare path, looked up in the current context
    Current,
    /// `$data`, the current context itself
    Data,
    /// `$root`, the top-level context of the render call
    Root,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub scope: Scope,
    pub segments: Vec<String>,
    pub index: Option<usize>,
}

impl PathExpr {
    pub fn new(scope: Scope, segments: Vec<String>) -> Self {
        Self {
            scope,
            segments,
            index: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// The path as written, without any index suffix
    pub fn key(&self) -> String {
        let mut parts: Vec<&str> = match self.scope {
            Scope::Current => Vec::new(),
            Scope::Data => vec!["$data"],
            Scope::Root => vec!["$root"],
        };
        parts.extend(self.segments.iter().map(String::as_str));
        parts.join(".")
    }
}

/// Visibility predicate for `$when`. Only one shape is recognised.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `var!=null&&var!=''`
    NotNullOrEmpty(PathExpr),
}
