//! Client configuration.
//!
//! # Design
//! Everything defaults to ureq's own behavior (no timeouts) except that
//! status codes never become errors: the helpers report them as data.

use std::time::Duration;

use ureq::Agent;

/// Default cap on response bodies read into memory.
pub const DEFAULT_MAX_BODY_SIZE: u64 = 10 * 1024 * 1024;

/// Settings applied to every request made through an `HttpClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Upper bound for a whole call, connect to last body byte.
    pub timeout_global: Option<Duration>,
    pub timeout_connect: Option<Duration>,
    /// Sent as `User-Agent` when set.
    pub user_agent: Option<String>,
    /// Bodies larger than this fail with a transport error.
    pub max_body_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_global: None,
            timeout_connect: None,
            user_agent: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_global = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_connect = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_max_body_size(mut self, bytes: u64) -> Self {
        self.max_body_size = bytes;
        self
    }

    pub(crate) fn build_agent(&self) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(self.timeout_global)
            .timeout_connect(self.timeout_connect)
            .build()
            .new_agent()
    }
}
