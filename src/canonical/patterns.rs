use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a dotted-quad IPv4 netloc, optionally carrying a port.
pub static IPV4_NETLOC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(?::\d{1,5})?$")
        .unwrap()
});

/// Extracts the last two labels of a dotted host as a TLD-level token.
/// A heuristic, not a public-suffix lookup; swapping one in would
/// change dedup-key semantics.
pub static TLD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9-]+\.)+([a-zA-Z0-9-]+\.[a-zA-Z]+)(?::\d+)?$").unwrap()
});
