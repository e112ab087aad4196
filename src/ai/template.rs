//! Prompt templating — `{{name}}` variable substitution, nothing more.
//!
//! No conditionals, loops, or escaping. An unresolved placeholder is an
//! error naming the placeholder; unused variables are permitted.

use std::collections::HashMap;
use std::sync::OnceLock;

static RE_PLACEHOLDER: OnceLock<regex::Regex> = OnceLock::new();

fn re_placeholder() -> &'static regex::Regex {
    RE_PLACEHOLDER.get_or_init(|| {
        regex::Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex")
    })
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TemplateError {
    #[error("unresolved placeholder `{0}`")]
    Unresolved(String),
}

/// Substitute every `{{name}}` in `template` from `vars`.
pub fn render(template: &str, vars: &HashMap<String, String>) -> Result<String, TemplateError> {
    let mut missing: Option<String> = None;
    let rendered = re_placeholder().replace_all(template, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match vars.get(name) {
            Some(value) => value.clone(),
            None => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });
    match missing {
        Some(name) => Err(TemplateError::Unresolved(name)),
        None => Ok(rendered.into_owned()),
    }
}
