// Element tree rendering

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use super::evaluator::{AbsentPolicy, RenderContext};
use super::parser::ExpressionParser;
use crate::domain::element::{Element, DATA_DIRECTIVE, WHEN_DIRECTIVE};
use crate::error::RenderError;

const TEXT_FIELD: &str = "text";
const URL_FIELD: &str = "url";
const ITEMS_FIELD: &str = "items";

/// Renders a template body against a [`RenderContext`]
pub struct ElementRenderer {
    max_depth: usize,
}

impl ElementRenderer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Render a whole body. An object context yields one element list; an array
    /// context yields one element list per entry, in entry order.
    pub fn render_body(&self, body: &[Value], ctx: RenderContext<'_>) -> Result<Value> {
        match ctx.data {
            Value::Array(entries) => entries
                .iter()
                .map(|entry| {
                    self.render_elements(body, ctx.with_data(entry), 0)
                        .map(Value::Array)
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            _ => self.render_elements(body, ctx, 0).map(Value::Array),
        }
    }

    pub fn render_elements(
        &self,
        elements: &[Value],
        ctx: RenderContext<'_>,
        depth: usize,
    ) -> Result<Vec<Value>> {
        if depth > self.max_depth {
            return Err(RenderError::DepthExceeded(self.max_depth).into());
        }

        let mut rendered = Vec::with_capacity(elements.len());
        for element in elements {
            self.render_element(Element::from(element.clone()), ctx, depth, &mut rendered)?;
        }

        Ok(rendered)
    }

    fn render_element(
        &self,
        element: Element,
        ctx: RenderContext<'_>,
        depth: usize,
        out: &mut Vec<Value>,
    ) -> Result<()> {
        match element {
            Element::TextBlock(fields) => out.push(Value::Object(self.render_text_block(fields, ctx)?)),
            Element::Container(fields) => self.render_container(fields, ctx, depth, out)?,
            Element::Image(fields) => {
                if let Some(image) = self.render_image(fields, ctx)? {
                    out.push(Value::Object(image));
                }
            }
            Element::Other(value) => out.push(value),
        }

        Ok(())
    }

    fn render_text_block(
        &self,
        mut fields: Map<String, Value>,
        ctx: RenderContext<'_>,
    ) -> Result<Map<String, Value>> {
        strip_directives(&mut fields);

        let text = fields
            .get(TEXT_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| RenderError::MissingField(format!("TextBlock.{}", TEXT_FIELD)))?;

        let template = ExpressionParser::parse(text);
        if !template.is_literal() {
            let rendered = ctx
                .interpolate(&template, AbsentPolicy::KeepPlaceholder)
                .with_context(|| format!("Failed to render TextBlock text '{}'", text))?;
            fields.insert(TEXT_FIELD.to_string(), Value::String(rendered));
        }

        Ok(fields)
    }

    /// A Container without `$data` is emitted unchanged, items included. With a
    /// binding, one copy is emitted per array entry with its items rendered
    /// against that entry.
    fn render_container(
        &self,
        mut fields: Map<String, Value>,
        ctx: RenderContext<'_>,
        depth: usize,
        out: &mut Vec<Value>,
    ) -> Result<()> {
        let Some(binding) = fields.shift_remove(DATA_DIRECTIVE) else {
            out.push(Value::Object(fields));
            return Ok(());
        };

        let binding = binding.as_str().ok_or_else(|| {
            RenderError::MalformedInput(format!("{} must be a string", DATA_DIRECTIVE))
        })?;
        let path = ExpressionParser::parse_binding(binding)
            .with_context(|| format!("Invalid {} binding '{}'", DATA_DIRECTIVE, binding))?;

        let entries = ctx
            .resolve_path(&path)?
            .and_then(Value::as_array)
            .ok_or_else(|| RenderError::NotAnArray(path.key()))?;
        let items = fields
            .get(ITEMS_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| RenderError::MissingField(format!("Container.{}", ITEMS_FIELD)))?;

        for entry in entries {
            let rendered = self.render_elements(items, ctx.with_data(entry), depth + 1)?;
            let mut container = fields.clone();
            container.insert(ITEMS_FIELD.to_string(), Value::Array(rendered));
            out.push(Value::Object(container));
        }

        Ok(())
    }

    /// Returns `None` when the `$when` predicate hides the image
    fn render_image(
        &self,
        mut fields: Map<String, Value>,
        ctx: RenderContext<'_>,
    ) -> Result<Option<Map<String, Value>>> {
        let predicate = fields
            .shift_remove(WHEN_DIRECTIVE)
            .as_ref()
            .and_then(Value::as_str)
            .and_then(ExpressionParser::parse_predicate);
        strip_directives(&mut fields);

        if let Some(predicate) = predicate {
            if !ctx.is_visible(&predicate)? {
                return Ok(None);
            }
        }

        let url = fields
            .get(URL_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| RenderError::MissingField(format!("Image.{}", URL_FIELD)))?;

        let rendered = ctx
            .interpolate(&ExpressionParser::parse(url), AbsentPolicy::UseKey)
            .with_context(|| format!("Failed to render Image url '{}'", url))?;
        fields.insert(URL_FIELD.to_string(), Value::String(rendered));

        Ok(Some(fields))
    }
}

/// Directives only steer rendering and are never part of the output
fn strip_directives(fields: &mut Map<String, Value>) {
    fields.shift_remove(DATA_DIRECTIVE);
    fields.shift_remove(WHEN_DIRECTIVE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(body: Value, data: Value) -> Result<Value> {
        let body = body.as_array().cloned().unwrap();
        ElementRenderer::new(8).render_body(&body, RenderContext::new(&data))
    }

    #[test]
    fn test_text_block_substitution() {
        let result = render(
            json!([{"type": "TextBlock", "text": "Hi ${name}!", "wrap": true}]),
            json!({"name": "Ada"}),
        )
        .unwrap();
        assert_eq!(
            result,
            json!([{"type": "TextBlock", "text": "Hi Ada!", "wrap": true}])
        );
    }

    #[test]
    fn test_text_block_directives_removed() {
        let result = render(
            json!([{
                "type": "TextBlock",
                "text": "${a}",
                "$when": "${a!=null&&a!=''}",
                "$data": "rows"
            }]),
            json!({"a": "x"}),
        )
        .unwrap();
        assert_eq!(result, json!([{"type": "TextBlock", "text": "x"}]));
    }

    #[test]
    fn test_text_block_missing_text() {
        let err = render(json!([{"type": "TextBlock"}]), json!({})).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RenderError>(),
            Some(&RenderError::MissingField("TextBlock.text".to_string()))
        );
    }

    #[test]
    fn test_container_array_binding() {
        let result = render(
            json!([{
                "type": "Container",
                "$data": "items",
                "items": [{"type": "TextBlock", "text": "${$data.label}"}]
            }]),
            json!({"items": [{"label": "A"}, {"label": "B"}]}),
        )
        .unwrap();

        assert_eq!(
            result,
            json!([
                {"type": "Container", "items": [{"type": "TextBlock", "text": "A"}]},
                {"type": "Container", "items": [{"type": "TextBlock", "text": "B"}]}
            ])
        );
    }

    #[test]
    fn test_container_binding_reaches_root() {
        let result = render(
            json!([{
                "type": "Container",
                "$data": "${rows}",
                "items": [{"type": "TextBlock", "text": "${name} of ${$root.team}"}]
            }]),
            json!({"team": "Ops", "rows": [{"name": "Ada"}]}),
        )
        .unwrap();

        assert_eq!(result[0]["items"][0]["text"], json!("Ada of Ops"));
    }

    #[test]
    fn test_container_nested_binding() {
        let result = render(
            json!([{
                "type": "Container",
                "$data": "groups",
                "items": [{
                    "type": "Container",
                    "$data": "members",
                    "items": [{"type": "TextBlock", "text": "${name}"}]
                }]
            }]),
            json!({"groups": [{"members": [{"name": "a"}, {"name": "b"}]}]}),
        )
        .unwrap();

        let inner = result[0]["items"].as_array().unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[1]["items"][0]["text"], json!("b"));
    }

    #[test]
    fn test_container_empty_array_emits_nothing() {
        let result = render(
            json!([{"type": "Container", "$data": "items", "items": []}]),
            json!({"items": []}),
        )
        .unwrap();
        assert_eq!(result, json!([]));
    }

    #[test]
    fn test_container_without_binding_is_untouched() {
        let body = json!([{
            "type": "Container",
            "items": [{"type": "TextBlock", "text": "${name}"}]
        }]);
        let result = render(body.clone(), json!({"name": "Ada"})).unwrap();
        assert_eq!(result, body);
    }

    #[test]
    fn test_container_binding_not_an_array() {
        let body = json!([{"type": "Container", "$data": "items", "items": []}]);

        let err = render(body.clone(), json!({"items": {"a": 1}})).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RenderError>(),
            Some(&RenderError::NotAnArray("items".to_string()))
        );
        assert!(render(body, json!({})).is_err());
    }

    #[test]
    fn test_container_binding_missing_items() {
        let body = json!([{"type": "Container", "$data": "items"}]);
        assert!(render(body, json!({"items": [1]})).is_err());
    }

    #[test]
    fn test_image_hidden_by_predicate() {
        let body = json!([{
            "type": "Image",
            "url": "${img}",
            "$when": "${img!=null&&img!=''}"
        }]);

        assert_eq!(render(body.clone(), json!({"img": ""})).unwrap(), json!([]));
        assert_eq!(
            render(body, json!({"img": "x.png"})).unwrap(),
            json!([{"type": "Image", "url": "x.png"}])
        );
    }

    #[test]
    fn test_image_unrecognised_predicate_is_visible() {
        let body = json!([{"type": "Image", "url": "${img}", "$when": "${img != null}"}]);
        assert_eq!(
            render(body, json!({})).unwrap(),
            json!([{"type": "Image", "url": "img"}])
        );
    }

    #[test]
    fn test_image_url_defaults_to_key() {
        let body = json!([{"type": "Image", "url": "https://cdn/${path}.png"}]);
        assert_eq!(
            render(body, json!({})).unwrap(),
            json!([{"type": "Image", "url": "https://cdn/path.png"}])
        );
    }

    #[test]
    fn test_other_elements_pass_through() {
        let body = json!([{"type": "ActionSet", "actions": [{"title": "${x}"}]}]);
        assert_eq!(render(body.clone(), json!({"x": 1})).unwrap(), body);
    }

    #[test]
    fn test_array_context_renders_body_per_entry() {
        let result = render(
            json!([{"type": "TextBlock", "text": "${name}"}]),
            json!([{"name": "a"}, {"name": "b"}]),
        )
        .unwrap();

        assert_eq!(
            result,
            json!([
                [{"type": "TextBlock", "text": "a"}],
                [{"type": "TextBlock", "text": "b"}]
            ])
        );
    }

    #[test]
    fn test_depth_exceeded() {
        let mut body = json!([{"type": "TextBlock", "text": "leaf"}]);
        let mut data = json!({});
        for _ in 0..4 {
            body = json!([{"type": "Container", "$data": "next", "items": body}]);
            data = json!({"next": [data]});
        }

        let body = body.as_array().cloned().unwrap();
        assert!(ElementRenderer::new(8)
            .render_body(&body, RenderContext::new(&data))
            .is_ok());

        let err = ElementRenderer::new(2)
            .render_body(&body, RenderContext::new(&data))
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RenderError>(),
            Some(&RenderError::DepthExceeded(2))
        );
    }
}
