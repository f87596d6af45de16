use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tm_traccar_api::{Credentials, RequestConfig};

const DEFAULT_PORT: u16 = 8082;
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection to the Traccar server
#[derive(Clone, Serialize, Deserialize)]
pub struct TraccarConfig {
	pub host: String,

	#[serde(default = "default_port")]
	pub port: u16,

	/// Leave empty to send requests without basic auth
	#[serde(default)]
	pub username: String,

	#[serde(default)]
	pub password: String,

	/// Seconds between the end of a sync cycle and the start of the next one
	#[serde(default = "default_update_interval")]
	pub update_interval: u64,

	/// Seconds before a single API request is abandoned
	#[serde(default = "default_request_timeout")]
	pub request_timeout: u64,
}

const fn default_port() -> u16 {
	DEFAULT_PORT
}

const fn default_update_interval() -> u64 {
	DEFAULT_UPDATE_INTERVAL_SECS
}

const fn default_request_timeout() -> u64 {
	DEFAULT_REQUEST_TIMEOUT_SECS
}

impl TraccarConfig {
	#[must_use]
	pub fn new(host: impl Into<String>) -> Self {
		Self {
			host: host.into(),
			port: DEFAULT_PORT,
			username: String::new(),
			password: String::new(),
			update_interval: DEFAULT_UPDATE_INTERVAL_SECS,
			request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
		}
	}

	#[must_use]
	pub fn api_url(&self) -> String {
		format!("http://{}:{}", self.host, self.port)
	}

	#[must_use]
	pub fn credentials(&self) -> Option<Credentials> {
		(!self.username.is_empty()).then(|| Credentials {
			username: self.username.clone(),
			password: self.password.clone(),
		})
	}

	#[must_use]
	pub const fn update_interval(&self) -> Duration {
		Duration::from_secs(self.update_interval)
	}

	pub fn request_config(&self) -> Result<RequestConfig, tm_traccar_api::Error> {
		RequestConfig::new(
			self.api_url(),
			self.credentials(),
			Duration::from_secs(self.request_timeout),
		)
	}

	/// Password as it may appear in logs
	#[must_use]
	pub fn masked_password(&self) -> &'static str {
		if self.password.is_empty() {
			"no password configured"
		} else {
			"**********"
		}
	}
}

impl fmt::Debug for TraccarConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TraccarConfig")
			.field("host", &self.host)
			.field("port", &self.port)
			.field("username", &self.username)
			.field("password", &self.masked_password())
			.field("update_interval", &self.update_interval)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}
