use tracing::{debug, info};

pub mod classifier;
pub mod patterns;
pub mod prober;
pub mod resolver;

pub use classifier::{classify, ensure_scheme, ClassifiedUri};
pub use prober::{Probe, TcpProber};
pub use resolver::{HeadResolver, ResolveRedirect};

use patterns::{IPV4_NETLOC_REGEX, TLD_REGEX};

/// A normalized URI together with the host token it contributes to an
/// item's identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUri {
    /// Scheme + host + path, query and fragment stripped. Bare tokens
    /// carry the original value untouched.
    pub url: String,

    /// The string this URI contributes to the dedup key: the bare
    /// token, the validated netloc, or the derived TLD token.
    pub host_token: String,
}

/// Turns one raw stored URI into zero-or-one verified canonical URI.
///
/// Orchestrates the classifier, the reachability prober, and the
/// redirect resolver. The decision order prefers cheap and precise
/// checks (IP-literal match) over expensive and approximate ones
/// (TLD-level redirect resolution).
#[derive(Debug)]
pub struct Canonicalizer<P: Probe, R: ResolveRedirect> {
    prober: P,
    resolver: R,
}

impl<P: Probe, R: ResolveRedirect> Canonicalizer<P, R> {
    /// Creates a canonicalizer over the given prober and resolver
    pub fn new(prober: P, resolver: R) -> Self {
        Self { prober, resolver }
    }

    /// Canonicalizes a raw stored URI.
    ///
    /// Classifies the value first: bare tokens pass through verbatim
    /// with no network activity, URL parts go through the full
    /// validation chain, and malformed values are dropped.
    ///
    /// # Arguments
    /// * `raw` - The stored URI string, possibly missing a scheme
    ///
    /// # Returns
    /// * `Option<CanonicalUri>` - The normalized URI, or `None` when the
    ///   value is malformed or unreachable
    pub async fn get_valid_url(&self, raw: &str) -> Option<CanonicalUri> {
        match classify(raw)? {
            ClassifiedUri::Bare(token) => Some(CanonicalUri {
                url: token.clone(),
                host_token: token,
            }),
            ClassifiedUri::Parts {
                scheme,
                netloc,
                path,
            } => self.canonicalize(&scheme, &netloc, &path).await,
        }
    }

    /// Validates already-classified URL parts.
    ///
    /// Decision order, first match wins:
    /// 1. IPv4-literal netloc: accepted immediately, no probing.
    /// 2. Reachable bare host: accepted as scheme+netloc+path.
    /// 3. TLD fallback: a host-only request against the derived TLD
    ///    token; the resolver's final URL becomes the canonical URI and
    ///    the TLD token becomes the host token.
    /// 4. Otherwise the URI is unrecoverable and dropped.
    pub async fn canonicalize(&self, scheme: &str, netloc: &str, path: &str) -> Option<CanonicalUri> {
        debug!("Processing [{}]:[{}]:[{}]", scheme, netloc, path);
        let clean_uri = format!("{}://{}{}", scheme, netloc, path);

        if IPV4_NETLOC_REGEX.is_match(netloc) {
            debug!("Matched IP address for {}", clean_uri);
            return Some(CanonicalUri {
                url: clean_uri,
                host_token: netloc.to_string(),
            });
        }

        if self.prober.probe(probe_host(netloc)).await {
            debug!("Found reachable domain for {}", clean_uri);
            return Some(CanonicalUri {
                url: clean_uri,
                host_token: netloc.to_string(),
            });
        }

        let Some(tld) = extract_tld(netloc) else {
            info!("Skipping unreachable URL: {}", clean_uri);
            return None;
        };

        let tld_url = format!("{}://{}", scheme, tld);
        match self.resolver.resolve_final_url(&tld_url).await {
            Some(final_url) => {
                info!("Found reachable redirect for {} to {}", tld_url, final_url);
                Some(CanonicalUri {
                    url: final_url,
                    host_token: tld,
                })
            }
            None => {
                info!("Skipping unreachable URL: {}", tld_url);
                None
            }
        }
    }
}

/// Derives the TLD-level token from a netloc.
///
/// Matches dotted hosts of three labels or more and extracts the last
/// two; bare two-label hosts, single labels, and IP literals yield
/// `None`.
pub fn extract_tld(netloc: &str) -> Option<String> {
    TLD_REGEX
        .captures(netloc)
        .map(|caps| caps[1].to_string())
}

// The probe targets the bare host; any port in the netloc is the
// service's, not the probe's.
fn probe_host(netloc: &str) -> &str {
    if let Some(rest) = netloc.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &rest[..end];
        }
    }
    netloc.split(':').next().unwrap_or(netloc)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProbe(bool);

    impl Probe for StaticProbe {
        async fn probe(&self, _host: &str) -> bool {
            self.0
        }
    }

    struct PanicProbe;

    impl Probe for PanicProbe {
        async fn probe(&self, host: &str) -> bool {
            panic!("prober must not run for {}", host);
        }
    }

    struct StaticResolver(Option<String>);

    impl ResolveRedirect for StaticResolver {
        async fn resolve_final_url(&self, _url: &str) -> Option<String> {
            self.0.clone()
        }
    }

    struct PanicResolver;

    impl ResolveRedirect for PanicResolver {
        async fn resolve_final_url(&self, url: &str) -> Option<String> {
            panic!("resolver must not run for {}", url);
        }
    }

    #[tokio::test]
    async fn test_ip_literal_bypasses_probe_and_resolver() {
        let canonicalizer = Canonicalizer::new(PanicProbe, PanicResolver);
        let result = canonicalizer
            .get_valid_url("203.0.113.5/login?session=abc")
            .await
            .unwrap();

        assert_eq!(result.url, "https://203.0.113.5/login");
        assert_eq!(result.host_token, "203.0.113.5");
    }

    #[tokio::test]
    async fn test_reachable_host_keeps_netloc_token() {
        let canonicalizer = Canonicalizer::new(StaticProbe(true), PanicResolver);
        let result = canonicalizer
            .get_valid_url("https://vault.example.com/unlock#main")
            .await
            .unwrap();

        assert_eq!(result.url, "https://vault.example.com/unlock");
        assert_eq!(result.host_token, "vault.example.com");
    }

    #[tokio::test]
    async fn test_tld_fallback_uses_derived_token() {
        let resolver = StaticResolver(Some("https://canonical.example/".to_string()));
        let canonicalizer = Canonicalizer::new(StaticProbe(false), resolver);
        let result = canonicalizer
            .get_valid_url("https://dead.host.example.com/account")
            .await
            .unwrap();

        assert_eq!(result.url, "https://canonical.example/");
        assert_eq!(result.host_token, "example.com");
    }

    #[tokio::test]
    async fn test_unreachable_two_label_host_is_dropped() {
        // No third label to fall back from, so the resolver never runs.
        let canonicalizer = Canonicalizer::new(StaticProbe(false), PanicResolver);
        assert!(canonicalizer.get_valid_url("example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_unresolvable_tld_is_dropped() {
        let canonicalizer = Canonicalizer::new(StaticProbe(false), StaticResolver(None));
        assert!(canonicalizer
            .get_valid_url("login.dead.example")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_bare_token_passes_through_untouched() {
        let canonicalizer = Canonicalizer::new(PanicProbe, PanicResolver);
        let result = canonicalizer.get_valid_url("/saved/form").await.unwrap();

        assert_eq!(result.url, "/saved/form");
        assert_eq!(result.host_token, "/saved/form");
    }

    #[tokio::test]
    async fn test_canonicalization_is_idempotent() {
        let canonicalizer = Canonicalizer::new(StaticProbe(true), PanicResolver);
        let first = canonicalizer
            .get_valid_url("example.com/login?next=/home")
            .await
            .unwrap();
        let second = canonicalizer.get_valid_url(&first.url).await.unwrap();

        assert_eq!(first.url, second.url);
        assert_eq!(first.host_token, second.host_token);
    }

    #[test]
    fn test_probe_host_strips_port() {
        assert_eq!(probe_host("example.com:8443"), "example.com");
        assert_eq!(probe_host("example.com"), "example.com");
        assert_eq!(probe_host("[::1]:8443"), "::1");
    }
}
