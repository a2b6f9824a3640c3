use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jotter_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Nothing to edit: pass --title and/or --content")]
    NothingToEdit,
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Page must be 1 or greater")]
    InvalidPage,
}
