use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::config::PipelineConfig;

/// Host-liveness probe used by the canonicalizer before trusting a netloc.
///
/// Implementations perform at most one network operation per call and
/// must never return an error: an unreachable host is a `false`, not a
/// failure of the pipeline.
#[allow(async_fn_in_trait)]
pub trait Probe {
    /// Probes a bare host (no port, no scheme) for liveness.
    async fn probe(&self, host: &str) -> bool;
}

/// Probes hosts with a single TCP connection attempt.
///
/// A connection established within the timeout is reachable. A timeout
/// is also treated as reachable: it is an inconclusive result, and the
/// pipeline errs toward keeping entries on restrictive networks. Only
/// an explicit failure from the network layer (DNS resolution,
/// connection refused, network unreachable) counts as unreachable.
#[derive(Debug, Clone)]
pub struct TcpProber {
    timeout: Duration,
    port: u16,
}

impl TcpProber {
    /// Creates a prober from the pipeline configuration
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            timeout: config.probe_timeout,
            port: config.probe_port,
        }
    }
}

impl Probe for TcpProber {
    async fn probe(&self, host: &str) -> bool {
        trace!("Probing {}:{} with timeout {:?}", host, self.port, self.timeout);
        match timeout(self.timeout, TcpStream::connect((host, self.port))).await {
            Ok(Ok(_stream)) => {
                debug!("Probe succeeded for {}", host);
                true
            }
            Err(_elapsed) => {
                // Inconclusive; the host may be filtered rather than dead.
                debug!("Probe timed out for {}, treating as reachable", host);
                true
            }
            Ok(Err(e)) => {
                warn!("Probe failed for {}: {}", host, e);
                false
            }
        }
    }
}
