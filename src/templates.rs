//! Prompt loading and rendering using Tera.
//!
//! Prompts are read from a `templates/` directory when one exists, with
//! embedded copies as fallback so the binary works from any directory.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tera::{Context, Tera};

/// Default templates directory relative to the working directory.
const TEMPLATES_DIR: &str = "templates";

/// Name of the label suggestion prompt.
pub const LABELS_PROMPT: &str = "prompts/labels.tera";

/// Embedded default templates for fallback when files don't exist.
static EMBEDDED_TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(LABELS_PROMPT, include_str!("../templates/prompts/labels.tera"));
    m
});

/// Global template engine with caching.
static TERA: Lazy<RwLock<Option<Tera>>> = Lazy::new(|| RwLock::new(None));

/// Initialize the template engine with templates from the specified directory.
///
/// If the directory doesn't exist, templates will be loaded from embedded defaults.
///
/// # Errors
///
/// Returns an error if the templates directory exists but contains invalid
/// templates, or an embedded template cannot be added.
pub fn init_templates(templates_dir: Option<&Path>) -> Result<()> {
    let dir = templates_dir.map_or_else(
        || std::env::current_dir().unwrap_or_default().join(TEMPLATES_DIR),
        Path::to_path_buf,
    );

    let mut tera = Tera::default();

    if dir.exists() {
        let glob_pattern = format!("{}/**/*.tera", dir.display());
        tera = Tera::new(&glob_pattern).map_err(|e| {
            Error::Template(format!("Failed to load templates from {}: {e}", dir.display()))
        })?;
    }

    add_embedded(&mut tera)?;
    install(tera)
}

/// Add every embedded template that `tera` does not already define.
fn add_embedded(tera: &mut Tera) -> Result<()> {
    for (name, content) in EMBEDDED_TEMPLATES.iter() {
        if tera.get_template(name).is_err() {
            tera.add_raw_template(name, content)
                .map_err(|e| Error::Template(format!("Invalid embedded template {name}: {e}")))?;
        }
    }
    Ok(())
}

fn install(tera: Tera) -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = Some(tera);
    Ok(())
}

/// Initialize from `templates_dir`, caching the embedded templates alone if
/// the directory cannot be loaded.
fn init_or_fallback(templates_dir: Option<&Path>) -> Result<()> {
    if let Err(e) = init_templates(templates_dir) {
        tracing::warn!(error = %e, "using embedded templates");
        let mut tera = Tera::default();
        add_embedded(&mut tera)?;
        install(tera)?;
    }
    Ok(())
}

/// Render a template with the given context.
///
/// Templates are lazy-loaded on first use. If the `templates/` directory
/// fails to load, the embedded templates are used from then on.
///
/// # Errors
///
/// Returns an error if the template doesn't exist or rendering fails.
pub fn render(name: &str, context: &Context) -> Result<String> {
    let needs_init = TERA.read().map_err(|e| Error::Template(e.to_string()))?.is_none();

    if needs_init {
        init_or_fallback(None)?;
    }

    let guard = TERA.read().map_err(|e| Error::Template(e.to_string()))?;
    let tera = guard.as_ref().ok_or_else(|| Error::Template("Templates not initialized".into()))?;
    let rendered = tera
        .render(name, context)
        .map_err(|e| Error::Template(format!("Failed to render template {name}: {e}")))?;
    drop(guard);

    Ok(rendered)
}

/// Render the label suggestion prompt for a task.
///
/// A missing description renders as `(none)`.
///
/// # Errors
///
/// Returns an error if the prompt template cannot be rendered.
pub fn render_labels_prompt(title: &str, description: Option<&str>) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("title", title);
    if let Some(description) = description {
        ctx.insert("description", description);
    }
    render(LABELS_PROMPT, &ctx)
}

/// Reset the template cache, forcing re-initialization on next use.
///
/// # Errors
///
/// Returns an error if the write lock cannot be acquired.
pub fn reset_cache() -> Result<()> {
    *TERA.write().map_err(|e| Error::Template(e.to_string()))? = None;
    Ok(())
}
