use std::fs;
use std::path::{Path, PathBuf};

use porter::access::RULES_FILE;
use porter::resolver::{resolve, Resolution};
use tempfile::TempDir;

const LOCAL: &str = "127.0.0.1";
const REMOTE: &str = "203.0.113.9";

/// base/
///   outside.html
///   www/            <- document root
///     index.html
///     photo.PNG
///     docs/index.html
fn fixture() -> (TempDir, PathBuf) {
    let base = tempfile::tempdir().unwrap();
    let root = base.path().join("www");

    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(base.path().join("outside.html"), "outside").unwrap();
    fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
    fs::write(root.join("photo.PNG"), [0u8; 16]).unwrap();
    fs::write(root.join("docs/index.html"), "docs").unwrap();

    for file in ["index.html", "photo.PNG", "docs/index.html"] {
        set_mode(&root.join(file), 0o644);
    }

    (base, root)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}

#[tokio::test]
async fn test_resolve_existing_file() {
    let (_base, root) = fixture();

    let Resolution::Ok(file) = resolve(&root, "/index.html", LOCAL).await else {
        panic!("expected Ok");
    };

    assert_eq!(file.path, fs::canonicalize(root.join("index.html")).unwrap());
    assert_eq!(file.size, 11);
    assert_eq!(file.extension, "html");
    assert_eq!(
        file.modified,
        fs::metadata(root.join("index.html")).unwrap().modified().unwrap()
    );
}

#[tokio::test]
async fn test_resolve_lowercases_extension() {
    let (_base, root) = fixture();

    let Resolution::Ok(file) = resolve(&root, "/photo.PNG", LOCAL).await else {
        panic!("expected Ok");
    };

    assert_eq!(file.extension, "png");
}

#[tokio::test]
async fn test_resolve_missing_file() {
    let (_base, root) = fixture();

    assert_eq!(resolve(&root, "/nope.html", LOCAL).await, Resolution::NotFound);
}

#[tokio::test]
async fn test_resolve_directory_is_not_found_even_with_index() {
    let (_base, root) = fixture();

    assert_eq!(resolve(&root, "/docs", LOCAL).await, Resolution::NotFound);
    assert_eq!(resolve(&root, "/docs/", LOCAL).await, Resolution::NotFound);
}

#[tokio::test]
async fn test_resolve_dot_segments_inside_root() {
    let (_base, root) = fixture();

    assert!(matches!(
        resolve(&root, "/docs/../index.html", LOCAL).await,
        Resolution::Ok(_)
    ));
}

#[tokio::test]
async fn test_resolve_traversal_outside_root_is_forbidden() {
    let (_base, root) = fixture();

    assert_eq!(
        resolve(&root, "/../outside.html", LOCAL).await,
        Resolution::Forbidden
    );
}

#[tokio::test]
async fn test_resolve_sibling_with_shared_name_prefix_is_forbidden() {
    let (base, root) = fixture();
    fs::create_dir(base.path().join("www2")).unwrap();
    fs::write(base.path().join("www2/page.html"), "x").unwrap();

    assert_eq!(
        resolve(&root, "/../www2/page.html", LOCAL).await,
        Resolution::Forbidden
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_symlink_escape_is_forbidden() {
    let (base, root) = fixture();
    std::os::unix::fs::symlink(base.path().join("outside.html"), root.join("link.html")).unwrap();

    assert_eq!(resolve(&root, "/link.html", LOCAL).await, Resolution::Forbidden);
}

#[cfg(unix)]
#[tokio::test]
async fn test_resolve_not_world_readable_is_forbidden() {
    let (_base, root) = fixture();
    fs::write(root.join("secret.html"), "secret").unwrap();
    set_mode(&root.join("secret.html"), 0o640);

    assert_eq!(resolve(&root, "/secret.html", LOCAL).await, Resolution::Forbidden);
}

#[tokio::test]
async fn test_resolve_denied_client_is_forbidden() {
    let (_base, root) = fixture();
    fs::write(root.join(RULES_FILE), "deny from 203.0.113.0/24\n").unwrap();

    assert_eq!(resolve(&root, "/index.html", REMOTE).await, Resolution::Forbidden);
    // loopback stays allowed
    assert!(matches!(
        resolve(&root, "/index.html", LOCAL).await,
        Resolution::Ok(_)
    ));
}

#[tokio::test]
async fn test_resolve_rules_apply_per_directory() {
    let (_base, root) = fixture();
    fs::write(root.join("docs").join(RULES_FILE), "deny from 203.0.113.9\n").unwrap();

    assert_eq!(
        resolve(&root, "/docs/index.html", REMOTE).await,
        Resolution::Forbidden
    );
    assert!(matches!(
        resolve(&root, "/index.html", REMOTE).await,
        Resolution::Ok(_)
    ));
}

#[tokio::test]
async fn test_resolve_denied_before_directory_check() {
    let (_base, root) = fixture();
    fs::write(root.join(RULES_FILE), "deny from 203.0.113.9\n").unwrap();

    // docs/ lives in root, so root's rules govern it
    assert_eq!(resolve(&root, "/docs", REMOTE).await, Resolution::Forbidden);
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let (_base, root) = fixture();

    for uri in ["/index.html", "/docs", "/missing", "/../outside.html"] {
        let first = resolve(&root, uri, LOCAL).await;
        let second = resolve(&root, uri, LOCAL).await;
        assert_eq!(first, second, "{}", uri);
    }
}
