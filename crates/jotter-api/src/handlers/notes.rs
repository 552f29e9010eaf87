//! Note pages and note mutations.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use minijinja::context;
use serde::Deserialize;
use uuid::Uuid;

use jotter_core::{CreateNoteRequest, Error, UpdateNoteRequest};

use crate::error::ApiError;
use crate::views::NoteView;
use crate::AppState;

/// Form payload for creating and updating a note.
///
/// A field left out of the submission is `None`. On update that clears the
/// stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteForm {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl From<NoteForm> for CreateNoteRequest {
    fn from(form: NoteForm) -> Self {
        Self {
            title: form.title,
            body: form.body,
        }
    }
}

impl From<NoteForm> for UpdateNoteRequest {
    fn from(form: NoteForm) -> Self {
        Self {
            title: form.title,
            body: form.body,
        }
    }
}

/// Parse a note id from the URL.
pub fn parse_note_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| Error::InvalidInput(format!("Invalid note id: {}", raw)).into())
}

fn form_payload(form: Result<Form<NoteForm>, FormRejection>) -> Result<NoteForm, ApiError> {
    match form {
        Ok(Form(payload)) => Ok(payload),
        // No urlencoded body means no fields were submitted.
        Err(FormRejection::InvalidFormContentType(_)) => Ok(NoteForm::default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let notes = state.notes.list().await?;
    let page = state
        .views
        .render("index.html", context! { notes => NoteView::list(&notes) })?;
    Ok(Html(page))
}

/// `GET /notes/new`
pub async fn new_note(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let notes = state.notes.list().await?;
    let page = state
        .views
        .render("new.html", context! { notes => NoteView::list(&notes) })?;
    Ok(Html(page))
}

/// `POST /notes`
pub async fn create_note(
    State(state): State<AppState>,
    form: Result<Form<NoteForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let payload = form_payload(form)?;
    state.notes.insert(payload.into()).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]).into_response())
}

/// `GET /notes/:id`
pub async fn show_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_note_id(&id)?;
    let notes = state.notes.list().await?;
    let note = state.notes.fetch(id).await?;

    let page = state.views.render(
        "show.html",
        context! {
            notes => NoteView::list(&notes),
            current_note => NoteView::from(&note),
        },
    )?;
    Ok(Html(page))
}

/// `GET /notes/:id/edit`
pub async fn edit_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_note_id(&id)?;
    let notes = state.notes.list().await?;
    let note = state.notes.fetch(id).await?;

    let page = state.views.render(
        "edit.html",
        context! {
            notes => NoteView::list(&notes),
            current_note => NoteView::from(&note),
        },
    )?;
    Ok(Html(page))
}

/// `PATCH /notes/:id`
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<NoteForm>, FormRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_note_id(&id)?;
    let payload = form_payload(form)?;
    state.notes.update(id, payload.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /notes/:id`
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_note_id(&id)?;
    state.notes.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
