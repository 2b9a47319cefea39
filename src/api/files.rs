//! `GET /api/files` and static file serving.

use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::{error, info, warn};

use super::models::ErrorBody;
use crate::{Response, StatusCode};

/// Creates `dir` (and its parents) if it does not exist yet.
///
/// Returns `true` when the directory had to be created.
pub async fn ensure_data_dir(dir: &Path) -> io::Result<bool> {
    if tokio::fs::try_exists(dir).await? {
        return Ok(false);
    }
    tokio::fs::create_dir_all(dir).await?;
    info!(dir = %dir.display(), "created data directory");
    Ok(true)
}

/// Names of the regular files in `dir` ending with `suffix`, sorted.
pub async fn list_data_files(dir: &Path, suffix: &str) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.ends_with(suffix) {
            continue;
        }
        // Follows symlinks, so a linked data file is still listed.
        match tokio::fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_file() => names.push(name),
            Ok(_) => {}
            Err(e) => warn!(file = %name, error = %e, "skipping unreadable entry"),
        }
    }

    names.sort();
    Ok(names)
}

/// Answers the listing endpoint.
///
/// A data directory removed after startup is re-created and reported empty.
pub async fn listing(dir: &Path, suffix: &str) -> Response {
    match list_data_files(dir, suffix).await {
        Ok(names) => Response::json(StatusCode::Ok, &names),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match ensure_data_dir(dir).await {
            Ok(_) => Response::json(StatusCode::Ok, &Vec::<String>::new()),
            Err(e) => listing_failed(dir, &e),
        },
        Err(e) => listing_failed(dir, &e),
    }
}

fn listing_failed(dir: &Path, e: &io::Error) -> Response {
    error!(dir = %dir.display(), error = %e, "error reading data directory");
    Response::json(
        StatusCode::InternalServerError,
        &ErrorBody::new("Failed to read files"),
    )
}

/// Serves the file under `root` named by `url_path`.
///
/// Directories need a trailing slash (otherwise 301, keeping `query`) and are
/// served through their `index.html` or `index.htm`.
pub async fn serve_static(root: &Path, url_path: &str, query: Option<&str>) -> Response {
    let path = resolve(root, url_path);

    let Ok(meta) = tokio::fs::metadata(&path).await else {
        return file_not_found();
    };

    let file = if meta.is_dir() {
        if !url_path.ends_with('/') {
            let location = match query {
                Some(q) => format!("{url_path}/?{q}"),
                None => format!("{url_path}/"),
            };
            return Response::new(StatusCode::MovedPermanently).header("Location", location);
        }
        match find_index(&path).await {
            Some(index) => index,
            None => return file_not_found(),
        }
    } else {
        path
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => Response::new(StatusCode::Ok)
            .header("Content-Type", content_type_for(&file))
            .body_bytes(bytes),
        Err(e) => {
            warn!(file = %file.display(), error = %e, "failed to read static file");
            file_not_found()
        }
    }
}

fn file_not_found() -> Response {
    Response::new(StatusCode::NotFound).body("File not found")
}

async fn find_index(dir: &Path) -> Option<PathBuf> {
    for name in ["index.html", "index.htm"] {
        let candidate = dir.join(name);
        if let Ok(meta) = tokio::fs::metadata(&candidate).await {
            if meta.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Maps a URL path onto the filesystem below `root`.
///
/// Empty, `.` and `..` segments are dropped, so the result never leaves `root`.
fn resolve(root: &Path, url_path: &str) -> PathBuf {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();
    let mut path = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains('\\')
            || segment.contains('\0')
        {
            continue;
        }
        path.push(segment);
    }
    path
}

/// Content type by file extension; unknown extensions are served as bytes.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("geojson") => "application/geo+json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv; charset=utf-8",
        Some("xml") => "application/xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("wasm") => "application/wasm",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
