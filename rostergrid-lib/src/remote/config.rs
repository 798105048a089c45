//! Remote source configuration

use std::time::Duration;

/// Timeouts for requests to a paging endpoint.
///
/// No retry policy lives here: a failed fetch is reported to the grid as-is.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rostergrid_lib::remote::RemoteConfig;
///
/// let config = RemoteConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_connect_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Total time allowed for one page request.
    ///
    /// Default: 30 seconds
    pub timeout: Option<Duration>,

    /// Time allowed to establish the connection.
    ///
    /// Default: 5 seconds
    pub connect_timeout: Option<Duration>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl RemoteConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}
