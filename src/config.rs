use std::time::Duration;

// Constants for pipeline configuration
const PROBE_TIMEOUT_SECS: u64 = 5;
const RESOLVE_TIMEOUT_SECS: u64 = 5;
const PROBE_PORT: u16 = 443;

/// Configuration for the canonicalization pipeline
///
/// Allows customization of the network behavior: probe and resolve
/// timeouts, the TCP port used for liveness probing, and the user
/// agent sent with redirect-resolution requests.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Timeout for a single reachability probe
    pub probe_timeout: Duration,

    /// Total timeout for a single redirect-resolution request
    pub resolve_timeout: Duration,

    /// TCP port targeted by the reachability probe
    pub probe_port: u16,

    /// User agent sent with redirect-resolution requests
    pub user_agent: String,
}

impl PipelineConfig {
    /// Creates a new pipeline configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reachability probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Sets the redirect-resolution timeout
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Sets the TCP port targeted by the reachability probe
    pub fn with_probe_port(mut self, port: u16) -> Self {
        self.probe_port = port;
        self
    }

    /// Sets the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            resolve_timeout: Duration::from_secs(RESOLVE_TIMEOUT_SECS),
            probe_port: PROBE_PORT,
            user_agent: "vaultsweep/0.1".to_string(),
        }
    }
}
