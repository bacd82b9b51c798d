use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::http::mime;
use crate::http::request::HTTP_VERSION;
use crate::resolver::Resolution;

/// Value of the `Server` header on every response.
pub const SERVER_NAME: &str = "Custom/0.1";

/// Status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200 OK
    Ok,
    /// 400 Client Error
    ClientError,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Server Error
    ServerError,
}

impl Status {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use porter::http::response::Status;
    /// assert_eq!(Status::Ok.as_u16(), 200);
    /// assert_eq!(Status::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::ClientError => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::ServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::ClientError => "Client Error",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::ServerError => "Server Error",
        }
    }

    /// The status line as sent after the version, e.g. `404 Not Found`.
    pub fn line(&self) -> String {
        format!("{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// A response header block plus the file to stream after it.
///
/// The three resource fields are set only for 200 responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: &'static str,
    pub status: Status,
    pub server: &'static str,
    pub last_modified: Option<String>,
    pub content_type: Option<&'static str>,
    pub content_length: Option<u64>,
    pub file_path: Option<PathBuf>,
}

impl Response {
    /// A response that carries no resource.
    pub fn status_only(status: Status) -> Self {
        Self {
            version: HTTP_VERSION,
            status,
            server: SERVER_NAME,
            last_modified: None,
            content_type: None,
            content_length: None,
            file_path: None,
        }
    }

    /// 400, for requests that failed to parse.
    pub fn client_error() -> Self {
        Self::status_only(Status::ClientError)
    }

    pub fn from_resolution(resolution: &Resolution) -> Self {
        match resolution {
            Resolution::Ok(file) => Self {
                last_modified: Some(http_date(file.modified)),
                content_type: Some(mime::content_type(&file.extension)),
                content_length: Some(file.size),
                file_path: Some(file.path.clone()),
                ..Self::status_only(Status::Ok)
            },
            Resolution::Forbidden => Self::status_only(Status::Forbidden),
            Resolution::NotFound => Self::status_only(Status::NotFound),
            Resolution::ServerError => Self::status_only(Status::ServerError),
        }
    }
}

/// Formats a timestamp as `Wdy, DD Mon YYYY HH:MM:SS GMT`.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
