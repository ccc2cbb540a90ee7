//! Server-side markup for a map field.
//!
//! Produces the map container and the readonly text input for one field.
//! The container carries the field's serialized [`FieldConfig`] in a
//! `data-mapfield` attribute; the browser boot scans for it to register the
//! field's session, so no per-field script is emitted.

use std::fmt::{self, Write};

use markdown_weaver_escape::{FmtWriter, escape_href, escape_html};
use miette::Diagnostic;
use thiserror::Error;

use crate::config::{ConfigError, FieldConfig, FieldKeys, InteractionMode};
use crate::coords::{parse_point, parse_polygon};

/// Attribute the browser boot looks for.
pub const CONFIG_ATTRIBUTE: &str = "data-mapfield";

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error("failed to write field markup")]
    #[diagnostic(code(mapfield::render::write))]
    Write(#[from] fmt::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Display state the host passes along with the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldFlags {
    pub required: bool,
    pub failed_validation: bool,
    /// Rendering inside the form builder's editor.
    pub form_editor: bool,
    /// Rendering on the admin entry-detail screen.
    pub entry_detail: bool,
}

impl FieldFlags {
    fn is_admin_screen(&self) -> bool {
        self.form_editor || self.entry_detail
    }
}

/// Who is looking at the form.
#[derive(Clone, Copy, Debug, Default)]
pub struct Viewer<'a> {
    /// Whether the viewer may change plugin settings.
    pub can_manage_options: bool,
    /// Where the provider credential is configured.
    pub settings_url: &'a str,
}

/// Everything needed to render one field instance.
#[derive(Clone, Debug)]
pub struct FieldRender<'a> {
    pub keys: FieldKeys,
    pub config: &'a FieldConfig,
    /// Stored value as submitted or saved.
    pub value: &'a str,
    pub api_key: Option<&'a str>,
    pub flags: FieldFlags,
    pub viewer: Viewer<'a>,
}

/// Drop a stored value that does not parse for the field's mode.
pub fn sanitize_value(mode: InteractionMode, value: &str) -> &str {
    let valid = match mode {
        InteractionMode::Marker => parse_point(value).is_ok(),
        InteractionMode::Polygon => parse_polygon(value).is_ok(),
    };
    if valid { value } else { "" }
}

/// Render the field's markup.
///
/// Without a provider credential, administrators get a prompt linking to the
/// settings page and everyone else gets nothing.
pub fn render_field(field: &FieldRender<'_>) -> Result<String, RenderError> {
    let mut out = String::new();

    let has_key = field.api_key.is_some_and(|key| !key.trim().is_empty());
    if !has_key {
        if field.viewer.can_manage_options {
            write_missing_key_prompt(&mut out, field.viewer.settings_url)?;
        }
        return Ok(out);
    }

    let config = FieldConfig {
        input_id: field.keys.input_id(),
        container_id: field.keys.container_id(),
        ..field.config.clone()
    };
    let config_json = config.to_json()?;
    let value = sanitize_value(config.mode, field.value);

    let mut w = FmtWriter(&mut out);
    w.0.write_str("<div id=\"")?;
    escape_html(&mut w, &config.container_id)?;
    w.0.write_str(
        "\" class=\"gform-field-mapfield\" style=\"height: 300px; margin-bottom: 1rem;\" ",
    )?;
    write!(w.0, "{CONFIG_ATTRIBUTE}=\"")?;
    escape_html(&mut w, &config_json)?;
    w.0.write_str("\"></div>\n")?;

    w.0.write_str("<input type=\"text\" readonly placeholder=\"Latitude, Longitude\" name=\"")?;
    escape_html(&mut w, &field.keys.input_name())?;
    w.0.write_str("\" id=\"")?;
    escape_html(&mut w, &config.input_id)?;
    w.0.write_str("\" value=\"")?;
    escape_html(&mut w, value)?;
    w.0.write_str("\"")?;
    if !field.flags.is_admin_screen() {
        w.0.write_str(" class=\"gform_mapfield\"")?;
    }
    if field.flags.required {
        w.0.write_str(" aria-required=\"true\"")?;
    }
    write!(w.0, " aria-invalid=\"{}\"", field.flags.failed_validation)?;
    if field.flags.form_editor {
        w.0.write_str(" disabled=\"disabled\"")?;
    }
    w.0.write_str(" />")?;

    Ok(out)
}

fn write_missing_key_prompt(out: &mut String, settings_url: &str) -> fmt::Result {
    let mut w = FmtWriter(out);
    w.0.write_str(
        "<div class=\"mapfield-notice\"><p>The map field requires a Google Maps API key. \
         <a style=\"text-decoration: underline;\" href=\"",
    )?;
    escape_href(&mut w, settings_url)?;
    w.0.write_str("\">Configure</a></p></div>")
}
