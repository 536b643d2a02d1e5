//! HTML rendering for form text inputs.
//!
//! Output mirrors the paragraph layout UI tests match against:
//! `<p><label for="id_text">Text:</label> <input type="text" name="text" ...></p>`.

use crate::form::FieldError;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Single-line text input bound to one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextInput {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub class: &'static str,
}

impl TextInput {
    /// DOM id derived from the field name.
    pub fn id(&self) -> String {
        format!("id_{}", self.name)
    }

    /// Renders the `<input>` tag, echoing `value` when the form is bound.
    pub fn render(&self, value: Option<&str>) -> String {
        let mut html = format!(r#"<input type="text" name="{}""#, self.name);
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            html.push_str(&format!(
                r#" value="{}""#,
                encode_double_quoted_attribute(value)
            ));
        }
        html.push_str(&format!(
            r#" placeholder="{}" class="{}" required id="{}">"#,
            encode_double_quoted_attribute(self.placeholder),
            encode_double_quoted_attribute(self.class),
            self.id()
        ));
        html
    }

    /// Renders errors, label and input as one paragraph block.
    pub fn render_paragraph(&self, value: Option<&str>, errors: &[FieldError]) -> String {
        let mut html = render_error_list(errors);
        html.push_str(&format!(
            r#"<p><label for="{}">{}:</label> {}</p>"#,
            self.id(),
            encode_text(self.label),
            self.render(value)
        ));
        html
    }
}

fn render_error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|error| format!("<li>{}</li>", encode_text(error.message)))
        .collect();
    format!(r#"<ul class="errorlist">{items}</ul>"#)
}
