//! Runtime configuration.
//!
//! Defaults target the backend serving the page. Individual values can be
//! overridden from the page's query string, e.g.
//! `/?mode=chat&timeout=10&hops=2&api=http://localhost:8000`.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::form_urlencoded;

/// Configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
	#[error("unknown parameter '{0}'")]
	UnknownKey(String),

	#[error("invalid value '{value}' for '{key}'")]
	InvalidValue { key: &'static str, value: String },
}

/// Where free-text queries go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryMode {
	/// `GET /api/search_graph/` and render the result on the canvas.
	#[default]
	Search,
	/// `POST /api/query/` and print the answer.
	Chat,
}

impl FromStr for QueryMode {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"search" | "graph" => Ok(QueryMode::Search),
			"chat" | "query" => Ok(QueryMode::Chat),
			_ => Err(()),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	pub search: String,
	pub graph: String,
	pub query: String,
	pub upload: String,
}

impl Default for Endpoints {
	fn default() -> Self {
		Self {
			search: "/api/search_graph/".into(),
			graph: "/api/graph/".into(),
			query: "/api/query/".into(),
			upload: "/api/upload/".into(),
		}
	}
}

/// Extra parameters forwarded with every search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
	/// Number of ontology hits the backend merges (`k`).
	pub top_k: Option<u32>,
	/// Traversal depth around matched nodes (`hops`).
	pub hops: Option<u32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	/// Scheme and authority requests are sent to, without trailing slash.
	pub api_base: String,
	pub endpoints: Endpoints,
	pub request_timeout: Duration,
	pub query_mode: QueryMode,
	pub search: SearchParams,
	/// Seed the canvas with a small demo graph on start-up.
	pub seed_demo: bool,
}

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Default for Config {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.into(),
			endpoints: Endpoints::default(),
			request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
			query_mode: QueryMode::default(),
			search: SearchParams::default(),
			seed_demo: true,
		}
	}
}

impl Config {
	/// Defaults for a page served from `origin`.
	pub fn for_origin(origin: &str) -> Self {
		let mut config = Self::default();
		if origin.starts_with("http") {
			config.api_base = origin.trim_end_matches('/').to_string();
		}
		config
	}

	/// Applies `key=value` overrides from a query string (with or without the
	/// leading `?`). Every bad pair is reported; good pairs still apply.
	pub fn apply_query(&mut self, query: &str) -> Vec<ConfigError> {
		let query = query.strip_prefix('?').unwrap_or(query);
		form_urlencoded::parse(query.as_bytes())
			.filter_map(|(key, value)| self.set(&key, &value).err())
			.collect()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
		let invalid = |key: &'static str| ConfigError::InvalidValue {
			key,
			value: value.to_string(),
		};
		match key {
			"api" => {
				let parsed = url::Url::parse(value).map_err(|_| invalid("api"))?;
				self.api_base = parsed.origin().ascii_serialization();
			}
			"mode" => self.query_mode = value.parse().map_err(|_| invalid("mode"))?,
			"timeout" => {
				let secs: u64 = value.parse().map_err(|_| invalid("timeout"))?;
				if secs == 0 {
					return Err(invalid("timeout"));
				}
				self.request_timeout = Duration::from_secs(secs);
			}
			"k" => self.search.top_k = Some(value.parse().map_err(|_| invalid("k"))?),
			"hops" => self.search.hops = Some(value.parse().map_err(|_| invalid("hops"))?),
			"demo" => {
				self.seed_demo = match value {
					"1" | "true" | "yes" | "on" => true,
					"0" | "false" | "no" | "off" => false,
					_ => return Err(invalid("demo")),
				}
			}
			other => return Err(ConfigError::UnknownKey(other.to_string())),
		}
		Ok(())
	}

	/// Absolute URL for an endpoint path.
	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.api_base, path)
	}
}
