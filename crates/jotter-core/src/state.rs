//! Application state management
//!
//! Observable cells shared by every front end. Each cell hands out
//! `tokio::sync::watch` receivers, so subscribers see the current value on
//! subscribe and every later change. The page view is recomputed inside the
//! setters that feed it, before they return.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::models::Note;
use crate::pagination::{paginate, PageView, DEFAULT_PAGE_SIZE};
use crate::theme::DarkMode;
use crate::toast::ToastQueue;

/// A cloneable observable value. Clones share the same cell.
#[derive(Debug)]
pub struct Observable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

/// Global application state
///
/// Flat state: any cell may be set at any time. The note collection is
/// replaced wholesale, last writer wins. Page view recomputation and
/// publication happen under one lock, so the last published view always
/// reflects inputs at least as new as every completed setter.
#[derive(Debug, Clone)]
pub struct AppState {
    notes: Observable<Vec<Note>>,
    loading: Observable<bool>,
    error: Observable<Option<String>>,
    search_query: Observable<String>,
    current_page: Observable<usize>,
    page_size: Observable<NonZeroUsize>,
    page_view: Observable<PageView>,
    view_lock: Arc<Mutex<()>>,
    initial_page_size: NonZeroUsize,
    /// Persisted dark-mode preference
    pub dark_mode: DarkMode,
    /// Active notifications
    pub toasts: ToastQueue,
}

impl AppState {
    pub fn new(page_size: NonZeroUsize, dark_mode: DarkMode) -> Self {
        let state = Self {
            notes: Observable::default(),
            loading: Observable::new(false),
            error: Observable::new(None),
            search_query: Observable::default(),
            current_page: Observable::new(1),
            page_size: Observable::new(page_size),
            page_view: Observable::default(),
            view_lock: Arc::new(Mutex::new(())),
            initial_page_size: page_size,
            dark_mode,
            toasts: ToastQueue::new(),
        };
        state.refresh_page_view();
        state
    }

    /// State with the default page size and an in-memory dark-mode preference.
    pub fn in_memory() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DarkMode::in_memory())
    }

    /// Restore every cell except the dark-mode preference to its initial value.
    ///
    /// Initial values: no notes, not loading, no error, empty query, page 1,
    /// the page size given at construction, no toasts.
    pub fn reset(&self) {
        self.notes.set(Vec::new());
        self.loading.set(false);
        self.error.set(None);
        self.search_query.set(String::new());
        self.current_page.set(1);
        self.page_size.set(self.initial_page_size);
        self.toasts.clear();
        self.refresh_page_view();
    }

    fn refresh_page_view(&self) {
        let _guard = self.view_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let view = self.notes.with(|notes| {
            self.search_query.with(|query| {
                paginate(notes, query, self.current_page.get(), self.page_size.get())
            })
        });
        self.page_view.set(view);
    }

    // Notes

    pub fn notes(&self) -> Vec<Note> {
        self.notes.get()
    }

    /// Replace the whole collection.
    pub fn set_notes(&self, notes: Vec<Note>) {
        self.notes.set(notes);
        self.refresh_page_view();
    }

    pub fn subscribe_notes(&self) -> watch::Receiver<Vec<Note>> {
        self.notes.subscribe()
    }

    // Loading / error

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn set_error(&self, error: Option<String>) {
        self.error.set(error);
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    // Search

    pub fn search_query(&self) -> String {
        self.search_query.get()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.search_query.set(query.into());
        self.refresh_page_view();
    }

    pub fn subscribe_search_query(&self) -> watch::Receiver<String> {
        self.search_query.subscribe()
    }

    // Pagination

    pub fn current_page(&self) -> usize {
        self.current_page.get()
    }

    pub fn subscribe_current_page(&self) -> watch::Receiver<usize> {
        self.current_page.subscribe()
    }

    /// Jump to `page` as given. Out-of-range pages render empty.
    pub fn go_to_page(&self, page: usize) {
        self.current_page.set(page);
        self.refresh_page_view();
    }

    pub fn next_page(&self) {
        self.current_page.update(|page| *page = page.saturating_add(1));
        self.refresh_page_view();
    }

    /// Step back one page, never below 1.
    pub fn prev_page(&self) {
        self.current_page
            .update(|page| *page = page.saturating_sub(1).max(1));
        self.refresh_page_view();
    }

    pub fn reset_pagination(&self) {
        self.go_to_page(1);
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size.get()
    }

    pub fn set_page_size(&self, page_size: usize) -> Result<()> {
        let page_size = NonZeroUsize::new(page_size)
            .ok_or_else(|| Error::InvalidInput("page size must be positive".to_string()))?;
        self.page_size.set(page_size);
        self.refresh_page_view();
        Ok(())
    }

    pub fn subscribe_page_size(&self) -> watch::Receiver<NonZeroUsize> {
        self.page_size.subscribe()
    }

    // Derived view

    pub fn page_view(&self) -> PageView {
        self.page_view.get()
    }

    pub fn subscribe_page_view(&self) -> watch::Receiver<PageView> {
        self.page_view.subscribe()
    }
}
