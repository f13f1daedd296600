use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::{ApiError, Backend, ChatReply, ChatRequest, FileUpload, GraphResponse, UploadReply};
use crate::config::Config;

/// [`Backend`] over HTTP. Uses `fetch` in the browser.
#[derive(Clone, Debug)]
pub struct HttpBackend {
	config: Config,
	client: Client,
}

impl HttpBackend {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			client: Client::new(),
		}
	}

	fn search_params(&self, query: &str) -> Vec<(&'static str, String)> {
		let mut params = vec![("q", query.to_string())];
		if let Some(k) = self.config.search.top_k {
			params.push(("k", k.to_string()));
		}
		if let Some(hops) = self.config.search.hops {
			params.push(("hops", hops.to_string()));
		}
		params
	}
}

impl Backend for HttpBackend {
	async fn search_graph(&self, query: &str) -> Result<GraphResponse, ApiError> {
		let url = self.config.url(&self.config.endpoints.search);
		log::debug!("sending search to {url} (q={query:?})");
		let response = self
			.client
			.get(&url)
			.query(&self.search_params(query))
			.timeout(self.config.request_timeout)
			.send()
			.await?
			.error_for_status()?;
		Ok(response.json().await?)
	}

	async fn load_graph(&self) -> Result<GraphResponse, ApiError> {
		let url = self.config.url(&self.config.endpoints.graph);
		log::debug!("loading aggregated graph from {url}");
		let response = self
			.client
			.get(&url)
			.timeout(self.config.request_timeout)
			.send()
			.await?
			.error_for_status()?;
		Ok(response.json().await?)
	}

	async fn ask(&self, query: &str) -> Result<ChatReply, ApiError> {
		let url = self.config.url(&self.config.endpoints.query);
		let response = self
			.client
			.post(&url)
			.json(&ChatRequest { query })
			.timeout(self.config.request_timeout)
			.send()
			.await?;
		let body: Value = response.json().await?;
		Ok(ChatReply(body))
	}

	async fn upload(&self, file: FileUpload) -> Result<UploadReply, ApiError> {
		let url = self.config.url(&self.config.endpoints.upload);
		log::info!("uploading {} ({} bytes) to {url}", file.name, file.bytes.len());
		let part = Part::bytes(file.bytes).file_name(file.name);
		let form = Form::new().part("file", part);
		// Any status is accepted; only the body has to be JSON.
		let response = self
			.client
			.post(&url)
			.multipart(form)
			.timeout(self.config.request_timeout)
			.send()
			.await?;
		let body: Value = response.json().await?;
		Ok(UploadReply(body))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn search_params_include_configured_extras() {
		let mut config = Config::default();
		let backend = HttpBackend::new(config.clone());
		assert_eq!(backend.search_params("cats & dogs"), vec![("q", "cats & dogs".to_string())]);

		config.search.top_k = Some(8);
		config.search.hops = Some(2);
		let backend = HttpBackend::new(config);
		assert_eq!(
			backend.search_params("x"),
			vec![("q", "x".to_string()), ("k", "8".to_string()), ("hops", "2".to_string())]
		);
	}
}
