/// Content type sent for extensions the server does not know.
pub const UNKNOWN: &str = "unknown";

/// Maps a file extension to the Content-type value sent with it.
///
/// Matching is exact except that `PNG` is accepted alongside `png`.
///
/// # Example
///
/// ```
/// # use porter::http::mime::content_type;
/// assert_eq!(content_type("jpeg"), "image/jpeg");
/// assert_eq!(content_type("txt"), "unknown");
/// ```
pub fn content_type(extension: &str) -> &'static str {
    match extension {
        "html" => "text/html",
        "jpg" | "jpeg" => "image/jpeg",
        "png" | "PNG" => "image/png",
        _ => UNKNOWN,
    }
}
