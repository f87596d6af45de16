//! Read-only client for the subset of the Traccar REST API the mirror consumes.
//!
//! Every resource lives in its own module exposing an `exec` function, all of them
//! taking a [`RequestConfig`] describing where and as whom to connect.

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use std::{fmt, time::Duration};

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::trace;

mod models;

pub use models::{Device, Geofence, Position, PositionAttributes};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("failed to build HTTP client: {0}")]
	Client(#[source] reqwest::Error),
	#[error("request to <endpoint='{endpoint}'> failed: {source}")]
	Request {
		endpoint: &'static str,
		#[source]
		source: reqwest::Error,
	},
	#[error("malformed response from <endpoint='{endpoint}'>: {source}")]
	Decode {
		endpoint: &'static str,
		#[source]
		source: serde_json::Error,
	},
}

#[derive(Clone)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"**********")
			.finish()
	}
}

#[derive(Debug, Clone)]
pub struct RequestConfig {
	pub client: reqwest::Client,
	pub api_url: String,
	pub credentials: Option<Credentials>,
}

impl RequestConfig {
	/// `api_url` is the server root, e.g. `http://192.168.1.10:8082`.
	pub fn new(
		api_url: impl Into<String>,
		credentials: Option<Credentials>,
		timeout: Duration,
	) -> Result<Self, Error> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(Error::Client)?;

		Ok(Self {
			client,
			api_url: api_url.into().trim_end_matches('/').to_string(),
			credentials,
		})
	}
}

trait WithAuth {
	fn with_auth(self, credentials: &Credentials) -> Self;
}

impl WithAuth for reqwest::RequestBuilder {
	fn with_auth(self, credentials: &Credentials) -> Self {
		self.basic_auth(&credentials.username, Some(&credentials.password))
	}
}

async fn get_json<T: DeserializeOwned>(
	config: &RequestConfig,
	endpoint: &'static str,
) -> Result<T, Error> {
	let url = format!("{}/api/{endpoint}", config.api_url);
	trace!(%url, "Requesting");

	let mut req = config.client.get(&url).header(ACCEPT, "application/json");

	if let Some(credentials) = &config.credentials {
		req = req.with_auth(credentials);
	}

	let body = req
		.send()
		.await
		.and_then(reqwest::Response::error_for_status)
		.map_err(|source| Error::Request { endpoint, source })?
		.bytes()
		.await
		.map_err(|source| Error::Request { endpoint, source })?;

	serde_json::from_slice(&body).map_err(|source| Error::Decode { endpoint, source })
}

pub mod devices {
	use super::*;

	pub use list::exec as list;
	pub mod list {
		use super::*;

		pub async fn exec(config: &RequestConfig) -> Result<Response, Error> {
			get_json(config, "devices").await
		}

		pub type Response = Vec<Device>;
	}
}

pub mod positions {
	use super::*;

	pub use list::exec as list;
	pub mod list {
		use super::*;

		/// Latest known position of every device visible to the user.
		pub async fn exec(config: &RequestConfig) -> Result<Response, Error> {
			get_json(config, "positions").await
		}

		pub type Response = Vec<Position>;
	}
}

pub mod geofences {
	use super::*;

	pub use list::exec as list;
	pub mod list {
		use super::*;

		pub async fn exec(config: &RequestConfig) -> Result<Response, Error> {
			get_json(config, "geofences").await
		}

		pub type Response = Vec<Geofence>;
	}
}
