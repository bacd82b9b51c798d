use crate::access::rules::AccessRule;

/// Number of leading octets a prefix length covers.
///
/// Matching works on whole octets, so `/20` compares two octets and
/// anything below `/8` compares none.
pub fn octet_count(prefix_len: u8) -> usize {
    usize::from(prefix_len / 8).min(4)
}

/// Returns true when `client` falls inside the rule's network.
///
/// A rule covering zero octets never matches, `0.0.0.0/0` included.
pub fn matches(rule: &AccessRule, client: &str) -> bool {
    octets_match(&rule.network, client, octet_count(rule.prefix_len))
}

/// Matches a textual `a.b.c.d[/n]` pattern against `client`.
///
/// A missing `/n` means the whole address must match. A prefix that is not
/// a number never matches.
pub fn match_addr(pattern: &str, client: &str) -> bool {
    let (network, prefix_len) = match pattern.split_once('/') {
        Some((network, prefix)) => match prefix.parse::<u8>() {
            Ok(n) => (network, n),
            Err(_) => return false,
        },
        None => (pattern, 32),
    };

    octets_match(network, client, octet_count(prefix_len))
}

fn octets_match(network: &str, client: &str, count: usize) -> bool {
    if count == 0 {
        return false;
    }

    let mut net = network.split('.');
    let mut cli = client.split('.');

    for _ in 0..count {
        match (net.next(), cli.next()) {
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octet_count_truncates() {
        assert_eq!(octet_count(0), 0);
        assert_eq!(octet_count(7), 0);
        assert_eq!(octet_count(8), 1);
        assert_eq!(octet_count(20), 2);
        assert_eq!(octet_count(24), 3);
        assert_eq!(octet_count(32), 4);
        assert_eq!(octet_count(64), 4);
    }

    #[test]
    fn short_client_address_never_matches() {
        assert!(!match_addr("10.0.0.1", "10.0.0"));
    }

    #[test]
    fn octets_compare_as_text() {
        // "010" and "10" are different strings
        assert!(!match_addr("010.0.0.0/8", "10.0.0.1"));
    }
}
