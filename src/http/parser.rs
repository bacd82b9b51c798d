use thiserror::Error;

use crate::http::request::{Request, DEFAULT_URI, HTTP_VERSION, METHOD_GET};

/// Message terminator: an empty line after the header block.
pub const TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request is not valid UTF-8")]
    InvalidEncoding,
    #[error("malformed request line")]
    InvalidRequestLine,
    #[error("unsupported method {0:?}")]
    InvalidMethod(String),
    #[error("request target {0:?} is not an absolute path")]
    InvalidTarget(String),
    #[error("unsupported protocol version {0:?}")]
    InvalidVersion(String),
    #[error("header line without a colon: {0:?}")]
    InvalidHeader(String),
}

/// Parses one request out of `buf`.
///
/// Only the bytes before the first CRLF CRLF are looked at; anything after
/// belongs to the next request. A buffer without a terminator yields an
/// invalid request. Failures never panic: they come back as `valid == false`
/// with the fields that were read before the failure left in place.
pub fn parse_http_request(buf: &[u8]) -> Request {
    let mut request = Request::default();

    match parse_into(buf, &mut request) {
        Ok(()) => request.valid = true,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting request");
            request.valid = false;
        }
    }

    request
}

fn parse_into(buf: &[u8], req: &mut Request) -> Result<(), ParseError> {
    let head_end = find_headers_end(buf).ok_or(ParseError::InvalidRequestLine)?;

    let head = std::str::from_utf8(&buf[..head_end])
        .map_err(|_| ParseError::InvalidEncoding)?;

    let (request_line, header_block) = match head.split_once("\r\n") {
        Some((line, rest)) => (line, Some(rest)),
        None => (head, None),
    };

    parse_request_line(request_line, req)?;

    if let Some(block) = header_block {
        for line in block.split("\r\n") {
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;

            req.headers.push((key.to_string(), value.to_string()));
        }
    }

    Ok(())
}

fn parse_request_line(line: &str, req: &mut Request) -> Result<(), ParseError> {
    // Single spaces only: "GET  /x HTTP/1.1" has an empty field and fails.
    let mut parts = line.split(' ');

    let method = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    req.method = method.to_string();
    if method != METHOD_GET {
        return Err(ParseError::InvalidMethod(req.method.clone()));
    }

    let target = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    req.uri = match target {
        "" | "/" => DEFAULT_URI.to_string(),
        t if t.starts_with('/') => t.to_string(),
        t => return Err(ParseError::InvalidTarget(t.to_string())),
    };

    let version = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    req.version = version.to_string();
    if version != HTTP_VERSION {
        return Err(ParseError::InvalidVersion(req.version.clone()));
    }

    if parts.next().is_some() {
        return Err(ParseError::InvalidRequestLine);
    }

    Ok(())
}

/// Returns the offset of the first CRLF CRLF in `buf`, if any.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(TERMINATOR.len())
        .position(|w| w == TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = parse_http_request(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");

        assert!(req.valid);
        assert_eq!(req.uri, "/index.html");
        assert_eq!(req.header("Host"), Some(" example.com"));
    }

    #[test]
    fn request_line_without_headers() {
        let req = parse_http_request(b"GET /a.html HTTP/1.1\r\n\r\n");

        assert!(req.valid);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn finds_terminator_offset() {
        assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n\r\n"), Some(14));
        assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n"), None);
    }
}
