//! Backend round-trips applied to the application state.
//!
//! Each action flips `loading` around the call. On success the collection is
//! replaced, the error cell cleared and a success toast raised. On failure the
//! collection is left alone, the error cell is set and an error toast raised;
//! the error is returned to the caller as well.

use crate::api::NoteBackend;
use crate::error::Result;
use crate::models::{CreateNoteRequest, Note, NoteId, UpdateNoteRequest};
use crate::state::AppState;

pub struct NoteActions<B> {
    backend: B,
    state: AppState,
}

impl<B: NoteBackend> NoteActions<B> {
    pub const fn new(backend: B, state: AppState) -> Self {
        Self { backend, state }
    }

    pub const fn state(&self) -> &AppState {
        &self.state
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Reload the collection using the current search query.
    pub async fn refresh(&self) -> Result<()> {
        let query = self.state.search_query();
        let search = (!query.is_empty()).then_some(query.as_str());

        let notes = self
            .track(self.backend.list(search), "Failed to load notes")
            .await?;
        tracing::debug!(count = notes.len(), "Loaded notes");
        self.state.set_notes(notes);
        Ok(())
    }

    /// Set the search query, go back to page 1 and reload.
    pub async fn search(&self, query: impl Into<String>) -> Result<()> {
        self.state.set_search_query(query);
        self.state.reset_pagination();
        self.refresh().await
    }

    /// Create a note and put it at the head of the collection.
    pub async fn create(&self, request: CreateNoteRequest) -> Result<Note> {
        let note = self
            .track(self.backend.create(&request), "Failed to create note")
            .await?;

        let mut notes = self.state.notes();
        notes.insert(0, note.clone());
        self.state.set_notes(notes);
        self.state.reset_pagination();
        self.state.toasts.success("Note created successfully!");
        Ok(note)
    }

    /// Update a note and swap the confirmed copy into the collection.
    pub async fn update(&self, id: &NoteId, request: UpdateNoteRequest) -> Result<Note> {
        let note = self
            .track(self.backend.update(id, &request), "Failed to update note")
            .await?;

        let mut notes = self.state.notes();
        match notes.iter_mut().find(|existing| &existing.id == id) {
            Some(existing) => *existing = note.clone(),
            None => notes.insert(0, note.clone()),
        }
        self.state.set_notes(notes);
        self.state.reset_pagination();
        self.state.toasts.success("Note updated successfully!");
        Ok(note)
    }

    /// Delete a note and drop it from the collection.
    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        self.track(self.backend.delete(id), "Failed to delete note")
            .await?;

        let mut notes = self.state.notes();
        notes.retain(|note| &note.id != id);
        self.state.set_notes(notes);
        self.state.reset_pagination();
        self.state.toasts.success("Note deleted successfully!");
        Ok(())
    }

    async fn track<T>(
        &self,
        call: impl std::future::Future<Output = Result<T>>,
        failure: &str,
    ) -> Result<T> {
        self.state.set_loading(true);
        let result = call.await;
        self.state.set_loading(false);

        match result {
            Ok(value) => {
                self.state.set_error(None);
                Ok(value)
            }
            Err(error) => {
                tracing::warn!("{failure}: {error}");
                self.state.set_error(Some(format!("{failure}: {error}")));
                self.state.toasts.error(failure);
                Err(error)
            }
        }
    }
}
