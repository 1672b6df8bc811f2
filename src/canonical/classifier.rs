use tracing::{debug, warn};
use url::Url;

// Constants for validation
const MAX_URI_LENGTH: usize = 2048; // Maximum allowable URI length

/// Outcome of classifying a raw stored URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedUri {
    /// No authority after the scheme: an app identifier or a malformed
    /// remnant. Kept verbatim and contributes itself as its host token.
    Bare(String),

    /// A parseable URL split into the parts the pipeline works with.
    /// Query and fragment are already discarded and never reconstructed.
    Parts {
        scheme: String,
        netloc: String,
        path: String,
    },
}

/// Prepends `https://` unless the value already carries an HTTP scheme.
pub fn ensure_scheme(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Classifies a raw stored URI into a bare token or URL parts.
///
/// Returns `None` when the value is malformed beyond use; the caller
/// drops that URI and moves on. A single bad URI never fails the item.
pub fn classify(raw: &str) -> Option<ClassifiedUri> {
    if raw.len() > MAX_URI_LENGTH {
        warn!(
            "Dropping URI exceeding maximum length of {} characters",
            MAX_URI_LENGTH
        );
        return None;
    }

    let prefixed = ensure_scheme(raw);

    // The url crate refuses empty-host http(s) URLs outright, so the
    // bare-token check has to run on the authority substring first.
    let after_scheme = prefixed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let authority = after_scheme.split(['/', '?', '#']).next().unwrap_or("");
    if authority.is_empty() {
        debug!("No netloc in '{}', keeping as bare token", raw);
        return Some(ClassifiedUri::Bare(raw.to_string()));
    }

    let parsed = match Url::parse(&prefixed) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Dropping unparsable URI '{}': {}", raw, e);
            return None;
        }
    };

    let host = parsed.host_str()?;
    let netloc = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    Some(ClassifiedUri::Parts {
        scheme: parsed.scheme().to_string(),
        netloc,
        path: parsed.path().to_string(),
    })
}
