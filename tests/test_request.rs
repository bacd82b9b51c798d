use porter::http::request::{Request, RequestBuilder};

fn request_with(headers: &[(&str, &str)]) -> Request {
    headers
        .iter()
        .fold(RequestBuilder::new().uri("/"), |b, (k, v)| b.header(*k, *v))
        .build()
        .unwrap()
}

#[test]
fn test_request_header_retrieval() {
    let req = request_with(&[("Host", " example.com"), ("Accept", " */*")]);

    assert_eq!(req.header("Host"), Some(" example.com"));
    assert_eq!(req.header("Accept"), Some(" */*"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_lookup_is_case_sensitive() {
    let req = request_with(&[("Host", " example.com")]);

    assert_eq!(req.header("host"), None);
}

#[test]
fn test_request_header_returns_first_duplicate() {
    let req = request_with(&[("Accept", " a"), ("Accept", " b")]);

    assert_eq!(req.header("Accept"), Some(" a"));
    assert_eq!(req.headers_named("Accept").count(), 2);
}

#[test]
fn test_request_wants_close_with_conventional_spacing() {
    let req = request_with(&[("Connection", " close")]);

    assert!(req.wants_close());
}

#[test]
fn test_request_wants_close_is_literal() {
    for value in ["close", "  close", " Close", " close ", " keep-alive"] {
        let req = request_with(&[("Connection", value)]);
        assert!(!req.wants_close(), "{:?} should not close", value);
    }
}

#[test]
fn test_request_wants_close_checks_every_connection_header() {
    let req = request_with(&[("Connection", " keep-alive"), ("Connection", " close")]);

    assert!(req.wants_close());
}

#[test]
fn test_request_without_connection_header_stays_open() {
    let req = request_with(&[("Host", " example.com")]);

    assert!(!req.wants_close());
}

#[test]
fn test_request_builder_defaults() {
    let req = RequestBuilder::new().uri("/a.html").build().unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.version, "HTTP/1.1");
    assert!(req.valid);
    assert!(req.headers.is_empty());
}

#[test]
fn test_request_builder_requires_uri() {
    assert!(RequestBuilder::new().method("GET").build().is_err());
}
