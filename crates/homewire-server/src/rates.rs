//! Mortgage-rate TTL cache.
//!
//! One externally sourced value, cached in an explicit object with an
//! injectable clock. Upstream failure serves the stale value when one is
//! present, else a fixed default.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

/// Served when the upstream has never answered.
pub const DEFAULT_RATE: f64 = 4.79;

/// How long a fetched rate stays fresh.
pub const RATE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Clock seam so tests can drive expiry without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CachedRate {
    rate: f64,
    fetched_at: Instant,
}

/// TTL cache for the posted 5-year fixed mortgage rate.
pub struct RateCache {
    inner: Mutex<Option<CachedRate>>,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl RateCache {
    pub fn new(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(None),
            ttl,
            clock,
        }
    }

    pub fn default_cache() -> Self {
        Self::new(RATE_TTL, Box::new(SystemClock))
    }

    /// The cached rate, if still within its TTL.
    pub fn fresh(&self) -> Option<f64> {
        let inner = self.inner.lock();
        inner.as_ref().and_then(|c| {
            if self.clock.now().duration_since(c.fetched_at) < self.ttl {
                Some(c.rate)
            } else {
                None
            }
        })
    }

    /// The cached rate regardless of age.
    pub fn stale(&self) -> Option<f64> {
        self.inner.lock().as_ref().map(|c| c.rate)
    }

    pub fn store(&self, rate: f64) {
        *self.inner.lock() = Some(CachedRate {
            rate,
            fetched_at: self.clock.now(),
        });
    }

    /// Resolve the rate to serve: fresh cache, else the fetcher, else the
    /// stale value, else the default. A fetch failure never fails the
    /// request.
    pub async fn resolve<F, Fut>(&self, fetch: F) -> (f64, bool)
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<f64, String>>,
    {
        if let Some(rate) = self.fresh() {
            return (rate, true);
        }

        match fetch().await {
            Ok(rate) => {
                self.store(rate);
                (rate, false)
            }
            Err(e) => {
                warn!("Rate fetch failed, serving cached/default: {}", e);
                (self.stale().unwrap_or(DEFAULT_RATE), self.stale().is_some())
            }
        }
    }
}

/// Fetch the posted conventional 5-year rate from the Bank of Canada
/// Valet API.
pub async fn fetch_posted_rate(client: &reqwest::Client) -> Result<f64, String> {
    let url = "https://www.bankofcanada.ca/valet/observations/V80691335/json?recent=1";
    let resp = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        return Err(format!("rate API returned {}", resp.status()));
    }
    let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
    body["observations"][0]["V80691335"]["v"]
        .as_str()
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| "unexpected rate payload shape".to_string())
}
