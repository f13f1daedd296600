//! Thin wrappers over the DOM APIs the toolbar needs.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, HtmlInputElement, Url, Window};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum BrowserError {
	#[error("no window")]
	NoWindow,

	#[error("no document")]
	NoDocument,

	#[error("{0}")]
	Js(String),
}

impl From<JsValue> for BrowserError {
	fn from(value: JsValue) -> Self {
		BrowserError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

pub fn window() -> Result<Window, BrowserError> {
	web_sys::window().ok_or(BrowserError::NoWindow)
}

/// Blocking text prompt. `None` when cancelled.
pub fn prompt(message: &str) -> Option<String> {
	window().ok()?.prompt_with_message(message).ok().flatten()
}

/// Blocking alert.
pub fn alert(message: &str) {
	match window() {
		Ok(w) => {
			let _ = w.alert_with_message(message);
		}
		Err(_) => log::error!("{message}"),
	}
}

/// Offers `text` as a file download.
pub fn download_text(file_name: &str, text: &str, mime: &str) -> Result<(), BrowserError> {
	let parts = js_sys::Array::of1(&JsValue::from_str(text));
	let options = BlobPropertyBag::new();
	options.set_type(mime);
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = window()?.document().ok_or(BrowserError::NoDocument)?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")?
		.dyn_into()
		.map_err(|_| BrowserError::Js("not an anchor".into()))?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url)?;
	Ok(())
}

pub fn selected_files(input: &HtmlInputElement) -> Vec<File> {
	let Some(list) = input.files() else {
		return Vec::new();
	};
	(0..list.length()).filter_map(|i| list.get(i)).collect()
}

pub async fn read_text(file: &File) -> Result<String, BrowserError> {
	let text = JsFuture::from(file.text()).await?;
	text.as_string()
		.ok_or_else(|| BrowserError::Js("file is not text".into()))
}

pub async fn read_bytes(file: &File) -> Result<Vec<u8>, BrowserError> {
	let buffer = JsFuture::from(file.array_buffer()).await?;
	Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Configuration for the current page: origin as API base, query string as
/// overrides.
pub fn load_config() -> Config {
	let Ok(location) = window().map(|w| w.location()) else {
		return Config::default();
	};
	let mut config = location
		.origin()
		.map(|origin| Config::for_origin(&origin))
		.unwrap_or_default();
	if let Ok(query) = location.search() {
		for err in config.apply_query(&query) {
			log::warn!("ignoring page parameter: {err}");
		}
	}
	log::info!("api base {}, query mode {:?}", config.api_base, config.query_mode);
	config
}
