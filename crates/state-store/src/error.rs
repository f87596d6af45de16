use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("file I/O error: {source}; path: '{}'", .path.display())]
	FileIO {
		path: Box<Path>,
		#[source]
		source: std::io::Error,
	},
	#[error("malformed state snapshot: {source}; path: '{}'", .path.display())]
	Snapshot {
		path: Box<Path>,
		#[source]
		source: serde_json::Error,
	},
	#[error("failed to encode state snapshot: {0}")]
	Encode(#[from] serde_json::Error),
	#[error("object <path='{0}'> is a group and can't hold a value")]
	NotALeaf(String),
}

impl Error {
	pub(crate) fn file_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
		Self::FileIO {
			path: path.as_ref().into(),
			source,
		}
	}
}
