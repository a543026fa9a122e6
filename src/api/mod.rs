//! JSON resource routers.
//!
//! Both resources share one shape, so the verb → store-operation mapping
//! lives here once and each resource module just names its store:
//!
//! | Verb | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/` | 200, array | — |
//! | POST | `/` | 201, created record | 400 |
//! | PUT | `/{id}` | 200, updated record | 400, 404 |
//! | DELETE | `/{id}` | 204 | 404 |

pub mod recipes;
pub mod shopping_list;

use std::future::{Ready, ready};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{Record, Store, StoreError, parse_draft, parse_id};

/// A failed API call, rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("request path id ({path}) and request body id ({body}) must match")]
    IdMismatch { path: String, body: String },

    /// The detail is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::Store(StoreError::Validation(_)) | Self::IdMismatch { .. } => Status::BadRequest,
            Self::Store(StoreError::NotFound { .. }) => Status::NotFound,
            Self::Internal(_) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(detail) => error!("{detail}"),
            other => warn!("{other}"),
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

/// A PUT body: the draft fields plus an optional echo of the id.
#[derive(Deserialize)]
struct Replacement<D> {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    draft: D,
}

/// Builds the list/create/update/remove router over `store`.
pub fn resource<T: Record>(store: Arc<Store<T>>) -> Router {
    Router::new()
        .get("/", with_store(&store, list::<T>))
        .post("/", with_store(&store, create::<T>))
        .put("/{id}", with_store(&store, update::<T>))
        .delete("/{id}", with_store(&store, remove::<T>))
}

/// Adapts a synchronous store handler into a route handler. The store call
/// runs to completion before the returned future is first polled.
fn with_store<T, F, R>(
    store: &Arc<Store<T>>,
    f: F,
) -> impl Fn(Request) -> Ready<R> + Send + Sync + 'static
where
    T: Record,
    F: Fn(&Store<T>, Request) -> R + Send + Sync + 'static,
    R: IntoResponse + Send + 'static,
{
    let store = Arc::clone(store);
    move |req| ready(f(&store, req))
}

fn list<T: Record>(store: &Store<T>, _req: Request) -> Json<Vec<T>> {
    Json(store.list())
}

fn create<T: Record>(store: &Store<T>, req: Request) -> Result<(Status, Json<T>), ApiError> {
    let draft = parse_draft::<T::Draft>(req.body())?;
    let record = store.create(draft);
    info!(kind = T::KIND, id = %record.id(), "created");
    Ok((Status::Created, Json(record)))
}

fn update<T: Record>(store: &Store<T>, req: Request) -> Result<Json<T>, ApiError> {
    let raw = req.param("id").unwrap_or_default();
    let id = parse_id::<T>(raw)?;
    let payload = parse_draft::<Replacement<T::Draft>>(req.body())?;
    // `raw` is canonical here, so a body id that differs only in spelling is
    // still a mismatch: echoing it back would not equal the stored id.
    if let Some(body) = payload.id.filter(|body| body != raw) {
        return Err(ApiError::IdMismatch { path: raw.to_owned(), body });
    }
    let record = store.update(id, payload.draft)?;
    info!(kind = T::KIND, id = %record.id(), "updated");
    Ok(Json(record))
}

fn remove<T: Record>(store: &Store<T>, req: Request) -> Result<Status, ApiError> {
    let id = parse_id::<T>(req.param("id").unwrap_or_default())?;
    store.remove(id)?;
    info!(kind = T::KIND, %id, "removed");
    Ok(Status::NoContent)
}
