/// The only method the server answers.
pub const METHOD_GET: &str = "GET";

/// The only protocol version the server accepts.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Target served when a client asks for `/`.
pub const DEFAULT_URI: &str = "/index.html";

/// Represents a parsed HTTP request from a client.
///
/// A request is produced by [`parse_http_request`](crate::http::parser::parse_http_request)
/// and is never mutated afterwards. When `valid` is `false` only the fields
/// filled in before the failure carry data; callers must check `valid`
/// before trusting anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// The request method (only "GET" is accepted)
    pub method: String,
    /// The request target, `/` already rewritten to `/index.html`
    pub uri: String,
    /// HTTP version, always "HTTP/1.1" for a valid request
    pub version: String,
    /// Header pairs in wire order. Duplicates are kept and values are
    /// stored exactly as received, including any leading whitespace.
    pub headers: Vec<(String, String)>,
    /// Whether the whole message parsed successfully
    pub valid: bool,
}

/// Builder for constructing Request objects.
///
/// The server itself only gets requests from the parser; this exists to
/// build them directly in tests.
pub struct RequestBuilder {
    method: Option<String>,
    uri: Option<String>,
    version: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            uri: None,
            version: None,
            headers: Vec::new(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a header pair. The value is kept verbatim.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.unwrap_or_else(|| METHOD_GET.to_string()),
            uri: self.uri.ok_or("uri missing")?,
            version: self.version.unwrap_or_else(|| HTTP_VERSION.to_string()),
            headers: self.headers,
            valid: true,
        })
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Request {
    /// Returns the value of the first header whose key is exactly `key`.
    ///
    /// Keys are compared case-sensitively and values are returned untrimmed,
    /// so `Host: example.com` yields `" example.com"`.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the values of every header named `key`, in wire order.
    pub fn headers_named<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Determines whether the client asked to close the connection.
    ///
    /// The raw value must be exactly `" close"`: the conventional single
    /// space after the colon is part of the stored value and no other
    /// spelling (`close`, `Close`, `  close`) is recognised.
    pub fn wants_close(&self) -> bool {
        self.headers_named("Connection").any(|v| v == " close")
    }
}
