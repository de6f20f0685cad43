//! Tabular output parsing for `cf routes` and `cf services`
//!
//! The listings are whitespace-aligned tables. A row whose trailing
//! "apps"/"bound apps" column is empty has fewer fields than a bound row,
//! which is how unbound entries are recognised.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `name service plan [bound apps] create succeeded`, where the plan column
/// may span words but holds no digits
static SERVICE_CREATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S*\s*\S*\s*\D*\s*create succeeded").expect("valid service row pattern")
});

/// A route with no app bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnboundRoute {
    pub space: String,
    pub host: String,
    pub domain: String,
}

/// A service instance with no app bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnboundService {
    pub name: String,
    pub service: String,
}

/// The `n`-th (zero based) whitespace-delimited field of a line
pub fn field(line: &str, n: usize) -> Option<&str> {
    line.split_whitespace().nth(n)
}

/// Recognise a `cf routes` row that only has `space host domain`
pub fn parse_unbound_route(line: &str) -> Option<UnboundRoute> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [space, host, domain] => Some(UnboundRoute {
            space: space.to_string(),
            host: host.to_string(),
            domain: domain.to_string(),
        }),
        _ => None,
    }
}

/// Recognise a successfully created `cf services` row with an empty bound-apps column
pub fn parse_unbound_service(line: &str) -> Option<UnboundService> {
    if !SERVICE_CREATED.is_match(line) {
        return None;
    }

    let count = line.split_whitespace().count();
    if count != 5 && count != 7 {
        return None;
    }

    Some(UnboundService {
        name: field(line, 0)?.to_string(),
        service: field(line, 1)?.to_string(),
    })
}
