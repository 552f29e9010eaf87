//! HTML views.
//!
//! Templates are minijinja files under `templates/`, compiled into the binary
//! with `include_str!`. Every page extends `layout.html`, which draws the
//! sidebar of all notes. Autoescaping is on for `.html` templates, so note
//! titles and bodies are escaped. The `markdown` filter is the one way to
//! emit a body as HTML.

use minijinja::{Environment, Value};
use pulldown_cmark::{html, Event, Options, Parser};
use serde::Serialize;

use jotter_core::{Error, Note, Result};

pub const LAYOUT_TEMPLATE: &str = include_str!("../templates/layout.html");
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
pub const NEW_TEMPLATE: &str = include_str!("../templates/new.html");
pub const SHOW_TEMPLATE: &str = include_str!("../templates/show.html");
pub const EDIT_TEMPLATE: &str = include_str!("../templates/edit.html");
pub const ANALYTICS_TEMPLATE: &str = include_str!("../templates/analytics.html");

/// Compiled page templates.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_filter("markdown", |source: String| {
            Value::from_safe_string(render_markdown(&source))
        });
        for (name, source) in [
            ("layout.html", LAYOUT_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
            ("new.html", NEW_TEMPLATE),
            ("show.html", SHOW_TEMPLATE),
            ("edit.html", EDIT_TEMPLATE),
            ("analytics.html", ANALYTICS_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|e| Error::Render(format!("{}: {}", name, e)))?;
        }
        Ok(Self { env })
    }

    /// Render the named template with `ctx`.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| Error::Render(e.to_string()))?;
        template
            .render(ctx)
            .map_err(|e| Error::Render(format!("{}: {}", name, e)))
    }
}

/// A note as the templates see it. Absent fields become empty strings.
#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub summary: String,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title.clone().unwrap_or_default(),
            body: note.body.clone().unwrap_or_default(),
            summary: note.summary(),
        }
    }
}

impl NoteView {
    pub fn list(notes: &[Note]) -> Vec<NoteView> {
        notes.iter().map(NoteView::from).collect()
    }
}

/// Render Markdown to HTML.
///
/// Raw HTML inside the source is emitted as escaped text.
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
