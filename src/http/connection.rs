use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::Config;
use crate::http::parser::{find_headers_end, parse_http_request, TERMINATOR};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::send_response;
use crate::resolver;

pub struct Connection<S> {
    stream: S,
    client_addr: String,
    config: Arc<Config>,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response, bool), // bool = close afterwards?
    Closed,
}

/// What one receive cycle produced.
enum Incoming {
    Request(Request),
    /// The buffer filled up before a terminator arrived.
    Overflow,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// `client_addr` is the peer's dotted-quad address, checked against
    /// access rules on every request.
    pub fn new(stream: S, client_addr: impl Into<String>, config: Arc<Config>) -> Self {
        let capacity = config.max_request_bytes;
        Self {
            stream,
            client_addr: client_addr.into(),
            config,
            buffer: BytesMut::with_capacity(capacity),
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests one at a time until the client asks to close, goes
    /// quiet past the receive timeout, or the socket fails.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(Incoming::Request(req)) => ConnectionState::Processing(req),
                        Some(Incoming::Overflow) => {
                            debug!(peer = %self.client_addr, "request exceeds buffer");
                            ConnectionState::Writing(Response::client_error(), true)
                        }
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.handle_request(&req).await;

                    info!(
                        peer = %self.client_addr,
                        uri = %req.uri,
                        status = response.status.as_u16(),
                        "request served"
                    );

                    self.state = ConnectionState::Writing(response, req.wants_close());
                }

                ConnectionState::Writing(response, close) => {
                    send_response(&response, &mut self.stream).await?;

                    if close {
                        self.state = ConnectionState::Closed;
                    } else {
                        self.state = ConnectionState::Reading; // go back for next request
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        // The peer may already be gone.
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    /// Reads until a full request is buffered.
    ///
    /// Returns `None` when the peer closed the connection or stayed silent
    /// past the receive timeout. Bytes after the terminator stay buffered
    /// for the next call.
    async fn read_request(&mut self) -> anyhow::Result<Option<Incoming>> {
        let max = self.config.max_request_bytes;

        loop {
            if let Some(end) = find_headers_end(&self.buffer) {
                let message = self.buffer.split_to(end + TERMINATOR.len());
                return Ok(Some(Incoming::Request(parse_http_request(&message))));
            }

            if self.buffer.len() >= max {
                return Ok(Some(Incoming::Overflow));
            }

            let mut temp = [0u8; 1024];
            let room = (max - self.buffer.len()).min(temp.len());

            let n = match timeout(self.config.recv_timeout(), self.stream.read(&mut temp[..room])).await {
                Ok(read) => read?,
                Err(_) => {
                    debug!(peer = %self.client_addr, "receive timed out");
                    return Ok(None);
                }
            };

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    async fn handle_request(&self, req: &Request) -> Response {
        if !req.valid {
            return Response::client_error();
        }

        let resolution =
            resolver::resolve(&self.config.document_root, &req.uri, &self.client_addr).await;
        Response::from_resolution(&resolution)
    }
}
