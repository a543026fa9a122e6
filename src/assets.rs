//! Landing page and static files.
//!
//! `GET /` serves the configured index page. Any other `GET` that no route
//! claims is looked up under the public directory. Everything else, and any
//! path that would escape the directory, gets the generic 404.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::api::ApiError;
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::not_found;

/// Where the landing page and public files live on disk.
#[derive(Clone, Debug)]
pub struct Assets {
    public_dir: PathBuf,
    index_page: PathBuf,
}

impl Assets {
    pub fn new(public_dir: impl Into<PathBuf>, index_page: impl Into<PathBuf>) -> Self {
        Self { public_dir: public_dir.into(), index_page: index_page.into() }
    }

    /// Handler for `GET /`.
    pub fn landing(self: &Arc<Self>) -> impl Fn(Request) -> AssetFuture + Send + Sync + 'static {
        let assets = Arc::clone(self);
        move |_req: Request| -> AssetFuture {
            let assets = Arc::clone(&assets);
            Box::pin(async move { serve_file(&assets.index_page).await })
        }
    }

    /// Fallback handler: public files for `GET`, 404 for everything else.
    pub fn fallback(self: &Arc<Self>) -> impl Fn(Request) -> AssetFuture + Send + Sync + 'static {
        let assets = Arc::clone(self);
        move |req: Request| -> AssetFuture {
            let assets = Arc::clone(&assets);
            Box::pin(async move {
                if req.method() != Some(Method::Get) {
                    return not_found();
                }
                match resolve(&assets.public_dir, req.path()) {
                    Some(path) => serve_file(&path).await,
                    None => not_found(),
                }
            })
        }
    }
}

pub type AssetFuture = std::pin::Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Maps a request path onto a file under `root`. Segments are
/// percent-decoded first; traversal, hidden files, encoded slashes and
/// backslashes are refused.
fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut segments = 0;
    for raw in request_path.split('/').filter(|s| !s.is_empty()) {
        let segment = percent_decode_str(raw).decode_utf8().ok()?;
        if segment.starts_with('.') || segment.contains(['/', '\\', '\0']) {
            return None;
        }
        path.push(&*segment);
        segments += 1;
    }
    (segments > 0).then_some(path)
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder().bytes(mime.as_ref(), bytes)
        }
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
            debug!(path = %path.display(), "asset not found");
            not_found()
        }
        Err(e) => ApiError::Internal(format!("reading {}: {e}", path.display())).into_response(),
    }
}
