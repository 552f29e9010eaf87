//! HTTP handlers for jotter.

pub mod analytics;
pub mod notes;

pub use analytics::analytics;
pub use notes::{
    create_note, delete_note, edit_note, index, new_note, not_found, show_note, update_note,
    NoteForm,
};
