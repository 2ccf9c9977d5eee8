//! Renders declarative card templates, JSON trees of typed elements with embedded
//! `${...}` expressions, against a JSON data context.
//!
//! Rendering never fails from the caller's point of view: on any error the
//! original template text is returned and a warning is logged.

pub mod config;
pub mod domain;
pub mod error;

use anyhow::{Context, Result};
use serde_json::Value;

use config::RenderSettings;
use domain::template::{normalize_document, ElementRenderer, RenderContext};
use error::RenderError;

const BODY_FIELD: &str = "body";

/// Template renderer. Holds only settings; the data and root contexts are scoped
/// to each call, so one renderer can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render `template_text` against `data_text`, both JSON. Returns the
    /// template text unchanged if anything goes wrong.
    pub fn render(&self, template_text: &str, data_text: &str) -> String {
        match self.try_render(template_text, data_text) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!("Template rendering failed, returning it unrendered: {:#}", err);
                template_text.to_string()
            }
        }
    }

    /// Like [`Renderer::render`], but reports the failure instead of falling back
    pub fn try_render(&self, template_text: &str, data_text: &str) -> Result<String> {
        let data: Value = serde_json::from_str(data_text)
            .map_err(RenderError::from)
            .context("Failed to parse data context")?;

        let normalized = normalize_document(template_text);
        let template: Value = serde_json::from_str(&normalized)
            .map_err(RenderError::from)
            .context("Failed to parse template")?;

        let rendered = self.render_value(&template, &data)?;

        let output = if self.settings.pretty {
            serde_json::to_string_pretty(&rendered)?
        } else {
            serde_json::to_string(&rendered)?
        };

        tracing::debug!(
            template_len = template_text.len(),
            output_len = output.len(),
            "Rendered template"
        );
        Ok(output)
    }

    /// Render an already-parsed template. The template is left untouched; the
    /// result is a copy with its `body` replaced by the rendered elements.
    pub fn render_value(&self, template: &Value, data: &Value) -> Result<Value> {
        let body = template
            .get(BODY_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| RenderError::MissingField(BODY_FIELD.to_string()))?;

        let rendered = ElementRenderer::new(self.settings.max_depth)
            .render_body(body, RenderContext::new(data))?;

        let mut output = template.clone();
        output[BODY_FIELD] = rendered;
        Ok(output)
    }
}

/// Render with default settings. See [`Renderer::render`].
pub fn render(template_text: &str, data_text: &str) -> String {
    Renderer::default().render(template_text, data_text)
}
