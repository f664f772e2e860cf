//! The CSMatrix graph model: entities, mutations, JSON snapshots, and grid geometry.

mod error;
pub mod geometry;
mod meters;
pub mod serialize;
mod store;
mod types;

pub use error::{GraphError, RenderError, SnapshotError, StorageError};
pub use meters::MeterBridge;
pub use serialize::{from_json, to_json};
pub use store::{Graph, GraphStore, RenderHook};
pub use types::{
	Edge, EdgeAttrs, EdgeId, GlobalMeters, Meta, MeterKey, Node, NodeAttrs, NodeId, NodePatch,
	clamp_meter, default_color,
};
