//! jotter-core - Core library for Jotter
//!
//! This crate contains the shared models, the REST client for the hosted
//! notes backend, and the observable application state used by every Jotter
//! front end.

pub mod actions;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod preferences;
pub mod state;
pub mod theme;
pub mod toast;
pub mod util;

pub use error::{Error, Result};
pub use models::{CreateNoteRequest, Note, NoteId, UpdateNoteRequest};
