use thiserror::Error;

use super::types::NodeId;

/// Rejected graph mutations. State is unchanged when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
	/// An edge endpoint does not name a node currently in the graph.
	#[error("node {id} does not exist in this graph")]
	MissingNode {
		/// The id that failed to resolve.
		id: NodeId,
	},
}

/// Failures talking to a storage slot. The persistence adapter logs and swallows these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
	/// No storage backend (no window, disabled storage, private browsing).
	#[error("storage unavailable: {0}")]
	Unavailable(String),
	/// Reading the slot threw.
	#[error("failed to read `{key}`: {reason}")]
	Read {
		/// Slot key.
		key: String,
		/// Backend message.
		reason: String,
	},
	/// Writing the slot threw (e.g. quota exceeded).
	#[error("failed to write `{key}`: {reason}")]
	Write {
		/// Slot key.
		key: String,
		/// Backend message.
		reason: String,
	},
}

/// A stored snapshot that cannot be used.
#[derive(Error, Debug)]
pub enum SnapshotError {
	/// The slot does not hold valid JSON.
	#[error("snapshot is not valid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	/// Valid JSON, but not a graph object.
	#[error("snapshot has unexpected shape: {0}")]
	Shape(&'static str),
}

/// Returned by a render hook that could not draw.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
	/// The render target has been torn down.
	#[error("render target is no longer mounted")]
	Detached,
}
