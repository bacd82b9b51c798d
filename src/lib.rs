//! Porter - static file server
//!
//! Core library: request parsing, `.htaccess` access control, resource
//! resolution and response writing.

pub mod access;
pub mod config;
pub mod http;
pub mod resolver;
pub mod server;
