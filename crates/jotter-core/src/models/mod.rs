//! Data models for Jotter

mod note;

pub use note::{filter_notes, CreateNoteRequest, Note, NoteId, Timestamp, UpdateNoteRequest};
