//! Maps a request target onto a file under the document root.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::access;

/// A file that passed every check and may be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Canonical absolute path
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    /// Lower-cased extension, empty when the file has none
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Ok(ResolvedFile),
    Forbidden,
    NotFound,
    ServerError,
}

/// Resolves `uri` against `document_root` on behalf of `client`.
///
/// Checks run in a fixed order: existence, containment under the root,
/// access rules, directory, world-readable bit. Directories are never
/// served, not even through an `index.html` inside them.
pub async fn resolve(document_root: &Path, uri: &str, client: &str) -> Resolution {
    // Plain concatenation: a uri always starts with '/', and Path::join
    // would discard the root for it.
    let mut candidate = document_root.as_os_str().to_owned();
    candidate.push(uri);

    let canonical = match tokio::fs::canonicalize(&candidate).await {
        Ok(p) => p,
        Err(e) => {
            debug!(uri, error = %e, "target does not resolve");
            return Resolution::NotFound;
        }
    };

    let root = match tokio::fs::canonicalize(document_root).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(root = %document_root.display(), error = %e, "document root unavailable");
            return Resolution::ServerError;
        }
    };

    if !canonical.starts_with(&root) {
        debug!(uri, path = %canonical.display(), "target escapes document root");
        return Resolution::Forbidden;
    }

    let rules = access::load_rules(&canonical).await;
    if !access::is_allowed(&rules, client) {
        debug!(uri, client, "denied by access rules");
        return Resolution::Forbidden;
    }

    let meta = match tokio::fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Resolution::NotFound,
        Err(e) => {
            tracing::error!(path = %canonical.display(), error = %e, "cannot stat target");
            return Resolution::ServerError;
        }
    };

    if meta.is_dir() {
        return Resolution::NotFound;
    }

    if !world_readable(&meta) {
        return Resolution::Forbidden;
    }

    let modified = match meta.modified() {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(path = %canonical.display(), error = %e, "no modification time");
            return Resolution::ServerError;
        }
    };

    let extension = canonical
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    Resolution::Ok(ResolvedFile {
        path: canonical,
        size: meta.len(),
        modified,
        extension,
    })
}

#[cfg(unix)]
fn world_readable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    meta.permissions().mode() & 0o004 != 0
}

#[cfg(not(unix))]
fn world_readable(_meta: &std::fs::Metadata) -> bool {
    true
}
