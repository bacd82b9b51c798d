//! Host-based access control.
//!
//! Every directory may carry a `.htaccess` file listing rules of the form
//!
//! ```text
//! deny from 10.0.0.0/8
//! allow from trusted.example.com
//! ```
//!
//! Rules are evaluated top to bottom and the first one whose network covers
//! the client decides. Networks are compared in whole octets: `/20` behaves
//! like `/16`, and `/0` through `/7` never match anything. A loopback allow
//! rule is always evaluated before the file's own rules, and a client no rule
//! matches is let in.

pub mod matcher;
pub mod rules;

pub use matcher::{match_addr, matches};
pub use rules::{is_allowed, load_rules, parse_rules, AccessRule, Action, RULES_FILE};
