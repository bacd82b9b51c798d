//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.1 static-file server with support
//! for keep-alive connections. Only `GET` is answered.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and header lookup
//! - **`response`**: Maps a resolution outcome onto a status and resource headers
//! - **`writer`**: Serializes the header block and streams the file body
//! - **`mime`**: Content type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for a full request (bounded by the receive timeout)
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve against the document root
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send header block, then the file on 200
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ no "Connection: close" → Reading (same connection)
//!               └─ "Connection: close" → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use porter::config::Config;
//! use porter::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(Config::default());
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, addr) = listener.accept().await?;
//!         let config = config.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, addr.ip().to_string(), config);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
