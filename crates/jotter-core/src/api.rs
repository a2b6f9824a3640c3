//! REST client for the hosted notes backend.
//!
//! Four calls over a single collection resource: list, create, update and
//! delete. A non-success status becomes [`Error::Remote`]; transport errors
//! pass through as [`Error::Transport`]. Nothing here retries.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Response, StatusCode};

use crate::error::{Error, Result};
use crate::models::{filter_notes, CreateNoteRequest, Note, NoteId, UpdateNoteRequest};
use crate::util::normalize_base_url;

/// Backend operations the application state is driven from.
#[allow(async_fn_in_trait)]
pub trait NoteBackend {
    /// List notes, newest first, optionally narrowed by `search`.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Note>>;

    /// Create a note and return the backend's canonical copy.
    async fn create(&self, request: &CreateNoteRequest) -> Result<Note>;

    /// Replace the mutable fields of a note.
    async fn update(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<Note>;

    /// Delete a note.
    async fn delete(&self, id: &NoteId) -> Result<()>;
}

/// HTTP client for the notes collection resource.
#[derive(Debug, Clone)]
pub struct NotesApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl NotesApiClient {
    /// Builds a client for the collection URL, e.g. `https://host/notes`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into().as_str()).map_err(Error::Config)?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base_url, client })
    }

    /// Returns the collection URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &NoteId) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    /// Fetch notes sorted by `createdAt` descending.
    ///
    /// The backend may ignore `search`, so matches are always re-checked
    /// locally against title and content.
    pub async fn list_notes(&self, search: Option<&str>) -> Result<Vec<Note>> {
        let search = search.filter(|query| !query.is_empty());
        let mut query = Vec::with_capacity(3);
        if let Some(search) = search {
            query.push(("search", search));
        }
        query.push(("sortBy", "createdAt"));
        query.push(("order", "desc"));

        tracing::debug!(url = %self.base_url, ?search, "Listing notes");
        let response = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, "application/json")
            .query(&query)
            .send()
            .await?;
        let response = ensure_success(response, "API Error")?;

        let body = response.text().await?;
        let notes = parse_note_list(&body)?;
        Ok(match search {
            Some(search) => filter_notes(&notes, search),
            None => notes,
        })
    }

    /// Create a note.
    pub async fn create_note(&self, request: &CreateNoteRequest) -> Result<Note> {
        tracing::debug!(url = %self.base_url, "Creating note");
        let response = self
            .client
            .post(&self.base_url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(serde_json::to_vec(request)?)
            .send()
            .await?;
        let response = ensure_success(response, "API Error")?;
        Ok(response.json::<Note>().await?)
    }

    /// Replace a note's title and content.
    pub async fn update_note(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<Note> {
        let url = self.item_url(id);
        tracing::debug!(%url, "Updating note");
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(serde_json::to_vec(request)?)
            .send()
            .await?;
        let response = ensure_success(response, "API Error")?;
        Ok(response.json::<Note>().await?)
    }

    /// Delete a note. Deleting a missing id surfaces the backend's failure.
    pub async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let url = self.item_url(id);
        tracing::debug!(%url, "Deleting note");
        let response = self.client.delete(url).send().await?;
        ensure_success(response, "Failed to delete note")?;
        Ok(())
    }
}

impl NoteBackend for NotesApiClient {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Note>> {
        self.list_notes(search).await
    }

    async fn create(&self, request: &CreateNoteRequest) -> Result<Note> {
        self.create_note(request).await
    }

    async fn update(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<Note> {
        self.update_note(id, request).await
    }

    async fn delete(&self, id: &NoteId) -> Result<()> {
        self.delete_note(id).await
    }
}

fn ensure_success(response: Response, prefix: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(status = status.as_u16(), url = %response.url(), "Backend request failed");
    Err(remote_error(status, prefix))
}

fn remote_error(status: StatusCode, prefix: &str) -> Error {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    Error::Remote {
        status: status.as_u16(),
        message: format!("{prefix}: {reason}"),
    }
}

/// An empty body or JSON `null` is an empty list.
fn parse_note_list(body: &str) -> Result<Vec<Note>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let notes = serde_json::from_str::<Option<Vec<Note>>>(body)?;
    Ok(notes.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Clone, Default)]
    struct Backend {
        notes: Arc<Mutex<Vec<Note>>>,
        last_query: Arc<Mutex<HashMap<String, String>>>,
        last_content_type: Arc<Mutex<Option<String>>>,
        fail_with: Option<StatusCode>,
        ignore_search: bool,
    }

    fn sample(id: &str, title: &str, content: &str) -> Note {
        Note {
            id: NoteId::new(id),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Some(crate::models::Timestamp::Numeric(1_700_000_000)),
        }
    }

    async fn list_handler(
        State(backend): State<Backend>,
        Query(query): Query<HashMap<String, String>>,
    ) -> std::result::Result<Json<Vec<Note>>, StatusCode> {
        if let Some(status) = backend.fail_with {
            return Err(status);
        }
        *backend.last_query.lock().unwrap() = query.clone();
        let notes = backend.notes.lock().unwrap().clone();
        let notes = match (query.get("search"), backend.ignore_search) {
            (Some(search), false) => notes.into_iter().filter(|n| n.matches(search)).collect(),
            _ => notes,
        };
        Ok(Json(notes))
    }

    async fn create_handler(
        State(backend): State<Backend>,
        headers: HeaderMap,
        Json(request): Json<CreateNoteRequest>,
    ) -> std::result::Result<(StatusCode, Json<Note>), StatusCode> {
        if let Some(status) = backend.fail_with {
            return Err(status);
        }
        *backend.last_content_type.lock().unwrap() = headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let mut notes = backend.notes.lock().unwrap();
        let note = sample(&(notes.len() + 1).to_string(), &request.title, &request.content);
        notes.push(note.clone());
        Ok((StatusCode::CREATED, Json(note)))
    }

    async fn update_handler(
        State(backend): State<Backend>,
        Path(id): Path<String>,
        Json(request): Json<UpdateNoteRequest>,
    ) -> std::result::Result<Json<Note>, StatusCode> {
        let mut notes = backend.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|note| note.id.as_str() == id)
            .ok_or(StatusCode::NOT_FOUND)?;
        note.title = request.title;
        note.content = request.content;
        Ok(Json(note.clone()))
    }

    async fn delete_handler(
        State(backend): State<Backend>,
        Path(id): Path<String>,
    ) -> StatusCode {
        let mut notes = backend.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|note| note.id.as_str() != id);
        if notes.len() == before {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::OK
        }
    }

    async fn serve(backend: Backend) -> NotesApiClient {
        let app = Router::new()
            .route("/notes", get(list_handler).post(create_handler))
            .route("/notes/{id}", put(update_handler).delete(delete_handler))
            .with_state(backend);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        NotesApiClient::new(format!("http://{addr}/notes/")).unwrap()
    }

    async fn serve_raw(status: StatusCode, body: &'static str) -> NotesApiClient {
        let app = Router::new().route("/notes", get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        NotesApiClient::new(format!("http://{addr}/notes")).unwrap()
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        assert!(NotesApiClient::new("").is_err());
        assert!(NotesApiClient::new("example.com/notes").is_err());
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = NotesApiClient::new("https://api.example.com/notes/").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/notes");
    }

    #[test]
    fn item_url_encodes_id_as_one_segment() {
        let client = NotesApiClient::new("https://api.example.com/notes").unwrap();
        assert_eq!(
            client.item_url(&NoteId::new("a/b c")),
            "https://api.example.com/notes/a%2Fb%20c"
        );
    }

    #[test]
    fn parse_note_list_handles_empty_and_null() {
        assert!(parse_note_list("").unwrap().is_empty());
        assert!(parse_note_list("null").unwrap().is_empty());
        assert_eq!(parse_note_list("[]").unwrap(), Vec::<Note>::new());
    }

    #[tokio::test]
    async fn list_sends_sort_parameters() {
        let backend = Backend::default();
        backend.notes.lock().unwrap().push(sample("1", "Hello", "world"));
        let client = serve(backend.clone()).await;

        let notes = client.list_notes(None).await.unwrap();

        assert_eq!(notes.len(), 1);
        let query = backend.last_query.lock().unwrap().clone();
        assert_eq!(query.get("sortBy").map(String::as_str), Some("createdAt"));
        assert_eq!(query.get("order").map(String::as_str), Some("desc"));
        assert!(!query.contains_key("search"));
    }

    #[tokio::test]
    async fn list_filters_locally_when_backend_ignores_search() {
        let backend = Backend {
            ignore_search: true,
            ..Backend::default()
        };
        {
            let mut notes = backend.notes.lock().unwrap();
            notes.push(sample("1", "Groceries", "milk, eggs"));
            notes.push(sample("2", "Ideas", "build a notes app"));
            notes.push(sample("3", "Todo", "buy MILK"));
        }
        let client = serve(backend.clone()).await;

        let notes = client.list_notes(Some("milk")).await.unwrap();

        let ids = notes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "3"]);
        let query = backend.last_query.lock().unwrap().clone();
        assert_eq!(query.get("search").map(String::as_str), Some("milk"));
    }

    #[tokio::test]
    async fn list_maps_failure_status() {
        let client = serve(Backend {
            fail_with: Some(StatusCode::SERVICE_UNAVAILABLE),
            ..Backend::default()
        })
        .await;

        let error = client.list_notes(None).await.unwrap_err();

        match error {
            Error::Remote { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "API Error: Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_treats_empty_body_as_no_notes() {
        let client = serve_raw(StatusCode::OK, "").await;
        assert!(client.list_notes(None).await.unwrap().is_empty());

        let client = serve_raw(StatusCode::OK, "null").await;
        assert!(client.list_notes(Some("x")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_returns_canonical_note() {
        let backend = Backend::default();
        let client = serve(backend.clone()).await;

        let created = client
            .create_note(&CreateNoteRequest {
                title: "First".to_string(),
                content: "hello".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.id.as_str(), "1");
        assert_eq!(created.title, "First");
        assert!(created.created_at.is_some());
        assert_eq!(
            backend.last_content_type.lock().unwrap().as_deref(),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn create_failure_carries_status() {
        let client = serve(Backend {
            fail_with: Some(StatusCode::INTERNAL_SERVER_ERROR),
            ..Backend::default()
        })
        .await;

        let error = client
            .create_note(&CreateNoteRequest {
                title: "t".to_string(),
                content: "c".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(500));
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let backend = Backend::default();
        backend.notes.lock().unwrap().push(sample("9", "Old", "old body"));
        let client = serve(backend.clone()).await;

        let updated = client
            .update_note(
                &NoteId::new("9"),
                &UpdateNoteRequest {
                    title: "New".to_string(),
                    content: "new body".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id.as_str(), "9");
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "new body");
    }

    #[tokio::test]
    async fn delete_twice_surfaces_backend_failure() {
        let backend = Backend::default();
        backend.notes.lock().unwrap().push(sample("4", "Gone", "soon"));
        let client = serve(backend.clone()).await;
        let id = NoteId::new("4");

        client.delete_note(&id).await.unwrap();
        let error = client.delete_note(&id).await.unwrap_err();

        match error {
            Error::Remote { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Failed to delete note: Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(backend.notes.lock().unwrap().is_empty());
    }
}
