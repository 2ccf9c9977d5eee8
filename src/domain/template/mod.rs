// Template module for `${...}` expression rendering
//
// This module provides normalization, parsing and evaluation of the expressions
// embedded in card templates, and the element renderer that drives them.

mod ast;
mod evaluator;
mod normalizer;
mod parser;
mod renderer;

pub use ast::{Expr, Operand, PathExpr, Predicate, Scope, Template, TemplatePart};
pub use evaluator::{is_truthy, stringify, AbsentPolicy, RenderContext};
pub use normalizer::{normalize_document, normalize_expressions};
pub use parser::{parse_path, ExpressionParser};
pub use renderer::ElementRenderer;
