use std::fmt;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
	#[error("Select files to upload")]
	NoSelection,

	#[error("unknown document #{0}")]
	UnknownDocument(u64),

	#[error("could not read {name}: {detail}")]
	Unreadable { name: String, detail: String },

	#[error(transparent)]
	Api(#[from] ApiError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadStatus {
	#[default]
	Pending,
	Uploading,
	Indexed,
	Failed,
}

impl fmt::Display for UploadStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			UploadStatus::Pending => "",
			UploadStatus::Uploading => "uploading",
			UploadStatus::Indexed => "indexed",
			UploadStatus::Failed => "failed",
		})
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentEntry {
	pub id: u64,
	pub name: String,
	pub status: UploadStatus,
}

/// Files the user picked, each waiting for its "Index" action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentList {
	entries: Vec<DocumentEntry>,
	next_id: u64,
}

impl DocumentList {
	/// Adds one entry per file name and returns their ids.
	pub fn stage<I>(&mut self, names: I) -> Result<Vec<u64>, UploadError>
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		let ids: Vec<u64> = names
			.into_iter()
			.map(|name| {
				self.next_id += 1;
				self.entries.push(DocumentEntry {
					id: self.next_id,
					name: name.into(),
					status: UploadStatus::Pending,
				});
				self.next_id
			})
			.collect();
		if ids.is_empty() {
			return Err(UploadError::NoSelection);
		}
		Ok(ids)
	}

	pub fn entries(&self) -> &[DocumentEntry] {
		&self.entries
	}

	pub fn set_status(&mut self, id: u64, status: UploadStatus) -> Result<&DocumentEntry, UploadError> {
		let entry = self
			.entries
			.iter_mut()
			.find(|e| e.id == id)
			.ok_or(UploadError::UnknownDocument(id))?;
		entry.status = status;
		Ok(entry)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn staging_nothing_is_an_error() {
		let mut docs = DocumentList::default();
		assert_eq!(docs.stage(Vec::<String>::new()), Err(UploadError::NoSelection));
		assert!(docs.entries().is_empty());
	}

	#[test]
	fn staged_entries_start_pending() {
		let mut docs = DocumentList::default();
		let ids = docs.stage(["a.pdf", "b.txt"]).unwrap();
		assert_eq!(ids, [1, 2]);
		assert_eq!(docs.entries()[1].name, "b.txt");
		assert!(docs.entries().iter().all(|e| e.status == UploadStatus::Pending));

		docs.set_status(1, UploadStatus::Indexed).unwrap();
		assert_eq!(docs.entries()[0].status, UploadStatus::Indexed);
		assert_eq!(docs.set_status(9, UploadStatus::Failed), Err(UploadError::UnknownDocument(9)));
	}
}
