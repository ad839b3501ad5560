//! Waits for the backend to answer on its loopback endpoint, then switches the
//! main view to it exactly once.

use std::{
    future::Future,
    net::IpAddr,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use reqwest::Client;
use url::{Host, Url};

use crate::{backend_config::Endpoint, error::ProbeError, ReadinessState};

pub trait ReadinessProbe: Send + Sync {
    /// `Ok` means the backend answered at all, whatever the status code.
    fn probe(&self) -> impl Future<Output = Result<(), ProbeError>> + Send;
}

pub trait DisplaySurface: Send + Sync {
    fn show_url(&self, url: &Url) -> Result<(), String>;
}

/// HTTPS probe for a backend serving a self-signed certificate.
///
/// Certificate validation is disabled on this client only, and the
/// constructor refuses anything that is not a loopback address.
#[derive(Debug, Clone)]
pub struct HttpsLoopbackProbe {
    client: Client,
    url: Url,
}

impl HttpsLoopbackProbe {
    pub fn new(endpoint: &Endpoint) -> Result<Self, ProbeError> {
        Self::for_url(endpoint.url())
    }

    pub fn for_url(url: Url) -> Result<Self, ProbeError> {
        if !is_loopback_url(&url) {
            return Err(ProbeError::NonLoopbackHost(url.to_string()));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .map_err(ProbeError::ClientBuild)?;
        Ok(Self { client, url })
    }
}

impl ReadinessProbe for HttpsLoopbackProbe {
    async fn probe(&self) -> Result<(), ProbeError> {
        self.client.get(self.url.clone()).send().await?;
        Ok(())
    }
}

pub fn is_loopback_url(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(address)) => address.is_loopback(),
        Some(Host::Ipv6(address)) => address.is_loopback(),
        Some(Host::Domain(domain)) => domain
            .parse::<IpAddr>()
            .map(|address| address.is_loopback())
            .unwrap_or_else(|_| domain.eq_ignore_ascii_case("localhost")),
        None => false,
    }
}

#[derive(Debug)]
pub struct ReadinessPoller {
    ready: AtomicBool,
    interval: Duration,
}

impl ReadinessPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            ready: AtomicBool::new(false),
            interval,
        }
    }

    pub fn state(&self) -> ReadinessState {
        if self.ready.load(Ordering::Acquire) {
            ReadinessState::Ready
        } else {
            ReadinessState::Waiting
        }
    }

    fn mark_ready(&self) -> bool {
        self.ready
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Probes until the first success, sleeping `interval` between failures.
    /// Returns the number of probes issued; zero when already ready.
    pub async fn run<P, S, F>(&self, probe: &P, surface: &S, url: &Url, log: F) -> u32
    where
        P: ReadinessProbe,
        S: DisplaySurface,
        F: Fn(&str) + Send + Sync,
    {
        let mut attempts = 0_u32;
        loop {
            if self.state() == ReadinessState::Ready {
                return attempts;
            }

            attempts += 1;
            log(&format!("readiness probe attempt {attempts}: {url}"));
            match probe.probe().await {
                Ok(()) => {
                    if self.mark_ready() {
                        log(&format!(
                            "backend responded after {attempts} attempt(s); switching view to {url}"
                        ));
                        if let Err(error) = surface.show_url(url) {
                            log(&format!("failed to switch view to {url}: {error}"));
                        }
                    }
                    return attempts;
                }
                Err(error) => {
                    log(&format!(
                        "readiness probe attempt {attempts} failed: {error}; retrying in {}ms",
                        self.interval.as_millis()
                    ));
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}
