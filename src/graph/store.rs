use std::collections::HashSet;

use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::error::{GraphError, RenderError};
use super::serialize;
use super::types::{
	Edge, EdgeAttrs, EdgeId, GlobalMeters, Meta, MeterKey, Node, NodeAttrs, NodeId, NodePatch,
};
use crate::persistence::PersistenceAdapter;

/// Largest id a snapshot may carry. Ids above it would not survive a trip through a JS number.
pub(crate) const MAX_ID: u64 = (1 << 53) - 1;

/// The CSMatrix graph: nodes in z-order, edges, and metadata.
///
/// Ids come from one counter that only moves forward, so a deleted node's id is never handed
/// to a later node and stale edges cannot silently re-attach.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub(crate) nodes: Vec<Node>,
	pub(crate) edges: Vec<Edge>,
	pub(crate) meta: Meta,
	pub(crate) next_id: u64,
}

impl Graph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Nodes in insertion (draw) order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Graph metadata.
	pub fn meta(&self) -> &Meta {
		&self.meta
	}

	/// Look up a node.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Look up an edge.
	pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Edges touching `node` in either direction.
	pub fn edges_of(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
		self.edges
			.iter()
			.filter(move |e| e.from == node || e.to == node)
	}

	pub(crate) fn allocate_id(&mut self) -> u64 {
		let id = self.next_id;
		match id.checked_add(1) {
			Some(next) if id <= MAX_ID => {
				self.next_id = next;
				id
			}
			// Counter exhausted: hand out the lowest id nothing uses.
			_ => {
				let used: HashSet<u64> = self
					.nodes
					.iter()
					.map(|n| n.id.0)
					.chain(self.edges.iter().map(|e| e.id.0))
					.collect();
				let id = (0..).find(|id| !used.contains(id)).unwrap_or_default();
				warn!("csmatrix: id counter exhausted, reusing free id {id}");
				id
			}
		}
	}

	/// Append a node built from `attrs` over the defaults.
	pub fn add_node(&mut self, attrs: NodeAttrs) -> &Node {
		let id = NodeId(self.allocate_id());
		let node = Node::normalized(id, attrs.name, attrs.gx, attrs.gy, attrs.color);
		self.nodes.push(node);
		&self.nodes[self.nodes.len() - 1]
	}

	/// Remove a node and every edge touching it. `false` if the id is unknown.
	pub fn remove_node(&mut self, id: NodeId) -> bool {
		let Some(pos) = self.nodes.iter().position(|n| n.id == id) else {
			return false;
		};
		self.nodes.remove(pos);
		let before = self.edges.len();
		self.edges.retain(|e| e.from != id && e.to != id);
		let dropped = before - self.edges.len();
		if dropped > 0 {
			debug!("csmatrix: removing {id} dropped {dropped} edge(s)");
		}
		true
	}

	/// Overwrite the fields set in `patch`. `None` if the id is unknown.
	pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Option<&Node> {
		let node = self.nodes.iter_mut().find(|n| n.id == id)?;
		if let Some(name) = patch.name {
			node.name = name;
		}
		if let Some(gx) = patch.gx.filter(|v| v.is_finite()) {
			node.gx = gx;
		}
		if let Some(gy) = patch.gy.filter(|v| v.is_finite()) {
			node.gy = gy;
		}
		if let Some(color) = patch.color {
			node.color = color;
		}
		Some(&*node)
	}

	/// Append an edge. Both endpoints must be present.
	pub fn add_edge(&mut self, attrs: EdgeAttrs) -> Result<&Edge, GraphError> {
		for id in [attrs.from, attrs.to] {
			if self.node(id).is_none() {
				return Err(GraphError::MissingNode { id });
			}
		}
		let id = EdgeId(self.allocate_id());
		self.edges.push(Edge {
			id,
			from: attrs.from,
			to: attrs.to,
			label: attrs.label,
			weight: attrs.weight,
			color: attrs.color,
		});
		Ok(&self.edges[self.edges.len() - 1])
	}

	/// Remove an edge. `false` if the id is unknown.
	pub fn remove_edge(&mut self, id: EdgeId) -> bool {
		let before = self.edges.len();
		self.edges.retain(|e| e.id != id);
		self.edges.len() != before
	}

	/// Stored meters, or [`GlobalMeters::fallback`] when none were ever stored.
	pub fn meters(&self) -> GlobalMeters {
		self.meta
			.global_meters
			.clone()
			.unwrap_or_else(GlobalMeters::fallback)
	}

	/// Set a meter, clamped into range. Returns the stored value.
	pub fn set_meter(&mut self, key: MeterKey, value: i64) -> u8 {
		let mut meters = self.meters();
		let stored = meters.set(key, value);
		self.meta.global_meters = Some(meters);
		stored
	}

	/// Add `delta` to a meter, clamped into range. Returns the stored value.
	pub fn adjust_meter(&mut self, key: MeterKey, delta: i64) -> u8 {
		let current = self.meters().get(key) as i64;
		self.set_meter(key, current.saturating_add(delta))
	}

	/// Shallow-merge free-form metadata.
	pub fn merge_meta(&mut self, patch: Map<String, Value>) {
		self.meta.merge(patch);
	}

	/// Drop every node, edge and meta key. The id counter keeps running.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.meta = Meta::default();
	}

	/// Replace this graph's contents with `other`, never moving the id counter backwards.
	pub(crate) fn hydrate(&mut self, other: Graph) {
		let floor = self.next_id;
		*self = other;
		self.next_id = self.next_id.max(floor);
	}
}

/// Callback run after every committed mutation. Errors are logged, never returned to the
/// caller of the mutation.
pub type RenderHook = Box<dyn Fn(&Graph) -> Result<(), RenderError>>;

/// A [`Graph`] bound to a storage slot and an optional renderer.
///
/// Every successful mutation is saved and rendered before the call returns; rejected or no-op
/// mutations touch neither.
pub struct GraphStore {
	graph: Graph,
	persistence: Box<dyn PersistenceAdapter>,
	render_hook: Option<RenderHook>,
}

impl GraphStore {
	/// Load the slot once and hydrate from it, starting empty when nothing usable is stored.
	pub fn open(persistence: Box<dyn PersistenceAdapter>) -> Self {
		let graph = match persistence.load() {
			Some(snapshot) => serialize::from_json(&snapshot),
			None => Graph::new(),
		};
		info!(
			"csmatrix: opened graph with {} node(s), {} edge(s)",
			graph.nodes.len(),
			graph.edges.len()
		);
		Self {
			graph,
			persistence,
			render_hook: None,
		}
	}

	/// Install the renderer and draw once.
	pub fn set_render_hook(&mut self, hook: RenderHook) {
		self.render_hook = Some(hook);
		self.render();
	}

	/// Read-only view of the current graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Re-read the slot and replace the whole graph (another tab wrote it).
	pub fn reload(&mut self) {
		let fresh = match self.persistence.load() {
			Some(snapshot) => serialize::from_json(&snapshot),
			None => Graph::new(),
		};
		self.graph.hydrate(fresh);
		debug!("csmatrix: reloaded graph from storage");
		self.render();
	}

	fn render(&self) {
		if let Some(hook) = &self.render_hook {
			if let Err(err) = hook(&self.graph) {
				warn!("csmatrix: render hook failed: {err}");
			}
		}
	}

	fn commit(&self) {
		self.persistence.save(&serialize::to_json(&self.graph));
		self.render();
	}

	/// See [`Graph::add_node`].
	pub fn add_node(&mut self, attrs: NodeAttrs) -> &Node {
		self.graph.add_node(attrs);
		self.commit();
		&self.graph.nodes[self.graph.nodes.len() - 1]
	}

	/// See [`Graph::remove_node`].
	pub fn remove_node(&mut self, id: NodeId) -> bool {
		let removed = self.graph.remove_node(id);
		if removed {
			self.commit();
		}
		removed
	}

	/// See [`Graph::update_node`].
	pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> Option<&Node> {
		let before = self.graph.node(id)?.clone();
		if self.graph.update_node(id, patch).is_some_and(|node| *node != before) {
			self.commit();
		}
		self.graph.node(id)
	}

	/// See [`Graph::add_edge`].
	pub fn add_edge(&mut self, attrs: EdgeAttrs) -> Result<&Edge, GraphError> {
		self.graph.add_edge(attrs)?;
		self.commit();
		Ok(&self.graph.edges[self.graph.edges.len() - 1])
	}

	/// See [`Graph::remove_edge`].
	pub fn remove_edge(&mut self, id: EdgeId) -> bool {
		let removed = self.graph.remove_edge(id);
		if removed {
			self.commit();
		}
		removed
	}

	/// See [`Graph::set_meter`]. Saves only when the stored block changes.
	pub fn set_meter(&mut self, key: MeterKey, value: i64) -> u8 {
		let before = self.graph.meta.global_meters.clone();
		let stored = self.graph.set_meter(key, value);
		if self.graph.meta.global_meters != before {
			self.commit();
		}
		stored
	}

	/// See [`Graph::adjust_meter`]. Saves only when the stored block changes.
	pub fn adjust_meter(&mut self, key: MeterKey, delta: i64) -> u8 {
		let current = self.graph.meters().get(key) as i64;
		self.set_meter(key, current.saturating_add(delta))
	}

	/// See [`Graph::merge_meta`].
	pub fn merge_meta(&mut self, patch: Map<String, Value>) {
		self.graph.merge_meta(patch);
		self.commit();
	}

	/// See [`Graph::clear`].
	pub fn clear(&mut self) {
		self.graph.clear();
		self.commit();
	}
}
