//! Retry and rate limiting applied where tool calls leave the process.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::{error, warn};

use crate::config::PolicyConfig;
use crate::error::Result;
use crate::mcp::ToolExecutor;
use crate::models::ToolDescriptor;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay slept after failed attempt `attempt` (1-based); grows linearly.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    if self.max_attempts > 1 {
                        error!("{} failed after {} attempts: {}", label, attempt, e);
                    }
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        "{}: attempt {} failed: {}. Retrying in {:?}...",
                        label, attempt, e, delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Fixed-delay limiter: successive acquisitions start at least
/// `min_interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;
        if let Some(previous) = *last_start {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last_start = Some(Instant::now());
    }
}

/// A [`ToolExecutor`] with rate limiting and retries around `call`.
pub struct PolicyExecutor<E> {
    inner: E,
    retry: RetryPolicy,
    limiter: Option<RateLimiter>,
}

impl<E: ToolExecutor> PolicyExecutor<E> {
    pub fn new(inner: E, retry: RetryPolicy, limiter: Option<RateLimiter>) -> Self {
        Self {
            inner,
            retry,
            limiter,
        }
    }

    pub fn from_config(inner: E, config: &PolicyConfig) -> Self {
        let limiter = (config.min_interval_ms > 0)
            .then(|| RateLimiter::new(Duration::from_millis(config.min_interval_ms)));
        Self::new(
            inner,
            RetryPolicy::new(
                config.max_retries,
                Duration::from_millis(config.retry_delay_ms),
            ),
            limiter,
        )
    }
}

#[async_trait]
impl<E: ToolExecutor> ToolExecutor for PolicyExecutor<E> {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        self.inner.list_tools().await
    }

    async fn call(&self, name: &str, arguments: &Value) -> Result<Value> {
        let label = format!("tool '{}'", name);
        self.retry
            .run(&label, || async move {
                if let Some(limiter) = &self.limiter {
                    limiter.acquire().await;
                }
                self.inner.call(name, arguments).await
            })
            .await
    }

    async fn shutdown(&self) -> Result<()> {
        self.inner.shutdown().await
    }
}
