use std::path::{Path, PathBuf};

use actix_files::NamedFile;
use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse};

use crate::app::{App, ServeEvent};
use crate::hooks::HookHandler;
use crate::router::handler;

// ============================================================================
// Static File Serving - Last-Resort Catch-All Binding
// ============================================================================
//
// Serves the configured public directory behind a catch-all route that only
// matches when no other route claims the path. The serve-bound handler
// checks the route table before registering, so repeated serve events never
// produce a second catch-all.
//
// ============================================================================

/// Catch-all pattern claimed by the static handler.
pub const CATCH_ALL_PATTERN: &str = "/{path:.*}";

/// Bound well below any explicit route so the catch-all only serves as a
/// last resort.
pub const LAST_RESORT_PRIORITY: i32 = 999;

const INDEX_FILE: &str = "index.html";

pub fn register(app: &mut App) {
    let public_dir = app.config().public_dir.clone();
    let index_fallback = app.config().index_fallback;

    app.on_serve().bind(HookHandler {
        id: "static-files",
        priority: LAST_RESORT_PRIORITY,
        func: Box::new(move |event: &mut ServeEvent| {
            // Another component may have claimed the catch-all already.
            if !event.router.has_route(&Method::GET, CATCH_ALL_PATTERN) {
                let root = public_dir.clone();
                event.router.register(
                    Method::GET,
                    CATCH_ALL_PATTERN,
                    LAST_RESORT_PRIORITY,
                    handler(move |req| serve_static(root.clone(), index_fallback, req)),
                );
            }
            event.next();
            Ok(())
        }),
    });
}

async fn serve_static(root: PathBuf, index_fallback: bool, req: HttpRequest) -> HttpResponse {
    let rel = req.match_info().get("path").unwrap_or_default().to_string();

    match resolve(&root, &rel) {
        Some(path) if path.is_file() => open(path, &req).await,
        _ if index_fallback => {
            let index = root.join(INDEX_FILE);
            if index.is_file() {
                open(index, &req).await
            } else {
                not_found()
            }
        }
        _ => not_found(),
    }
}

async fn open(path: PathBuf, req: &HttpRequest) -> HttpResponse {
    match NamedFile::open_async(&path).await {
        Ok(file) => file.into_response(req),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to open static file");
            not_found()
        }
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "status": 404,
        "message": "The requested resource wasn't found.",
    }))
}

/// Resolve the request path under the public root, rejecting any segment
/// that would escape it.
fn resolve(root: &Path, rel: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in rel.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => path.push(s),
        }
    }
    Some(path)
}
