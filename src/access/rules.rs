use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use thiserror::Error;
use tokio::net::lookup_host;
use tracing::{debug, warn};

use crate::access::matcher;

/// Name of the per-directory rules file.
pub const RULES_FILE: &str = ".htaccess";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Allow,
    Deny,
}

/// One `allow|deny from <network>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    /// Dotted-quad network address
    pub network: String,
    /// Prefix length in bits (0-32), matched in whole octets
    pub prefix_len: u8,
    pub action: Action,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("expected `<allow|deny> from <address>`")]
    Malformed,
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("invalid prefix length {0:?}")]
    InvalidPrefix(String),
    #[error("could not resolve host {0:?}")]
    Unresolved(String),
}

impl AccessRule {
    pub fn new(network: impl Into<String>, prefix_len: u8, action: Action) -> Self {
        Self {
            network: network.into(),
            prefix_len,
            action,
        }
    }

    /// Loopback clients are always let in, whatever the rules file says.
    pub fn loopback() -> Self {
        Self::new("127.0.0.0", 8, Action::Allow)
    }
}

/// A rules-file line split into its parts, before any name lookup.
#[derive(Debug, PartialEq, Eq)]
pub struct RuleLine<'a> {
    pub action: Action,
    pub host: &'a str,
    pub prefix_len: u8,
}

/// Splits `<allow|deny> from <host>[/prefix]`.
///
/// Returns `Ok(None)` for blank lines and `#` comments. The action keyword
/// is matched case-insensitively.
pub fn parse_line(line: &str) -> Result<Option<RuleLine<'_>>, RuleError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let &[verb, from, target] = fields.as_slice() else {
        return Err(RuleError::Malformed);
    };

    if !from.eq_ignore_ascii_case("from") {
        return Err(RuleError::Malformed);
    }

    let action = if verb.eq_ignore_ascii_case("allow") {
        Action::Allow
    } else if verb.eq_ignore_ascii_case("deny") {
        Action::Deny
    } else {
        return Err(RuleError::UnknownAction(verb.to_string()));
    };

    let (host, prefix_len) = match target.split_once('/') {
        Some((host, prefix)) => {
            let n = prefix
                .parse::<u8>()
                .ok()
                .filter(|n| *n <= 32)
                .ok_or_else(|| RuleError::InvalidPrefix(prefix.to_string()))?;
            (host, n)
        }
        None => (target, 32),
    };

    Ok(Some(RuleLine {
        action,
        host,
        prefix_len,
    }))
}

/// Turns a host field into a dotted-quad string, resolving names.
async fn resolve_host(host: &str) -> Result<String, RuleError> {
    if host.parse::<Ipv4Addr>().is_ok() {
        return Ok(host.to_string());
    }

    let addrs = lookup_host((host, 0))
        .await
        .map_err(|_| RuleError::Unresolved(host.to_string()))?;

    addrs
        .filter_map(|a| match a.ip() {
            IpAddr::V4(v4) => Some(v4.to_string()),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| RuleError::Unresolved(host.to_string()))
}

/// Parses the contents of a rules file.
///
/// The loopback rule always comes first. Lines that fail to parse or whose
/// host does not resolve are skipped.
pub async fn parse_rules(text: &str) -> Vec<AccessRule> {
    let mut rules = vec![AccessRule::loopback()];

    for (lineno, raw) in text.lines().enumerate() {
        let line = match parse_line(raw) {
            Ok(Some(line)) => line,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "skipping access rule");
                continue;
            }
        };

        match resolve_host(line.host).await {
            Ok(network) => rules.push(AccessRule::new(network, line.prefix_len, line.action)),
            Err(e) => warn!(line = lineno + 1, error = %e, "skipping access rule"),
        }
    }

    rules
}

/// Loads the rules governing `resource`, read from the rules file in its
/// containing directory.
///
/// Read fresh on every call. A missing or unreadable file leaves only the
/// loopback rule.
pub async fn load_rules(resource: &Path) -> Vec<AccessRule> {
    let Some(dir) = resource.parent() else {
        return vec![AccessRule::loopback()];
    };
    let rules_path = dir.join(RULES_FILE);

    match tokio::fs::read_to_string(&rules_path).await {
        Ok(text) => {
            let rules = parse_rules(&text).await;
            debug!(path = %rules_path.display(), count = rules.len(), "loaded access rules");
            rules
        }
        Err(e) if e.kind() == ErrorKind::NotFound => vec![AccessRule::loopback()],
        Err(e) => {
            warn!(path = %rules_path.display(), error = %e, "cannot read access rules");
            vec![AccessRule::loopback()]
        }
    }
}

/// First matching rule decides; no match means allowed.
pub fn is_allowed(rules: &[AccessRule], client: &str) -> bool {
    rules
        .iter()
        .find(|rule| matcher::matches(rule, client))
        .map(|rule| rule.action == Action::Allow)
        .unwrap_or(true)
}
