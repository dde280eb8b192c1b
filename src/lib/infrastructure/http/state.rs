//! Application state module

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::communication::{email_address::EmailAddress, mailer::Mailer};

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// The sender address applied to every outgoing message
    pub sender: EmailAddress,

    /// The access credential required from callers, if any
    pub api_key: Option<String>,
}

/// Global application state
///
/// Everything in here is established at startup and read-only afterwards;
/// concurrent requests share no mutable state.
#[derive(Clone)]
pub struct AppState<M: Mailer> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// The mail transport, absent when the service secret is not configured
    pub mailer: Option<Arc<M>>,
}

impl<M: Mailer> AppState<M> {
    /// Create a new application state
    pub fn new(config: AppConfig, mailer: Option<M>) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            mailer: mailer.map(Arc::new),
        }
    }
}

impl<M: Mailer> fmt::Debug for AppState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("mailer", &self.mailer.as_ref().map(|_| "Mailer"))
            .finish()
    }
}

#[cfg(test)]
use crate::domain::communication::mailer::MockMailer;

#[cfg(test)]
pub fn test_state(mailer: Option<MockMailer>, api_key: Option<&str>) -> AppState<MockMailer> {
    AppState {
        start_time: Utc::now(),
        config: AppConfig {
            sender: EmailAddress::new_unchecked("noreply@example.com"),
            api_key: api_key.map(String::from),
        },
        mailer: mailer.map(Arc::new),
    }
}
