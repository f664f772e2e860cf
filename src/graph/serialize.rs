//! Plain JSON form of a [`Graph`]: `{nodes, edges, meta}`.
//!
//! Decoding is forgiving. Missing optional fields take the same defaults as
//! [`Graph::add_node`], unusable entries are skipped, and edges whose endpoints did not load are
//! dropped. None of it is an error: a bad snapshot degrades to whatever could be recovered.

use std::collections::HashSet;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::SnapshotError;
use super::store::{Graph, MAX_ID};
use super::types::{Edge, EdgeId, Meta, Node, NodeId};

#[derive(Serialize)]
struct GraphJsonRef<'a> {
	nodes: &'a [Node],
	edges: &'a [Edge],
	meta: &'a Meta,
}

#[derive(Deserialize)]
struct NodeJson {
	#[serde(default)]
	id: Option<Value>,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	gx: Option<f64>,
	#[serde(default)]
	gy: Option<f64>,
	#[serde(default)]
	color: Option<String>,
}

#[derive(Deserialize)]
struct EdgeJson {
	#[serde(default)]
	id: Option<Value>,
	from: Value,
	to: Value,
	#[serde(default)]
	label: Option<String>,
	#[serde(default)]
	weight: Option<f64>,
	#[serde(default)]
	color: Option<String>,
}

fn empty_snapshot() -> Value {
	json!({ "nodes": [], "edges": [], "meta": {} })
}

/// Snapshot `graph` as plain JSON.
pub fn to_json(graph: &Graph) -> Value {
	let wire = GraphJsonRef {
		nodes: &graph.nodes,
		edges: &graph.edges,
		meta: &graph.meta,
	};
	serde_json::to_value(wire).unwrap_or_else(|err| {
		warn!("csmatrix: failed to serialize graph: {err}");
		empty_snapshot()
	})
}

/// Parse stored text into a snapshot object.
pub fn parse_snapshot(text: &str) -> Result<Value, SnapshotError> {
	let value: Value = serde_json::from_str(text)?;
	if !value.is_object() {
		return Err(SnapshotError::Shape("top level is not an object"));
	}
	Ok(value)
}

fn entries<'a>(snapshot: &'a Value, key: &str) -> &'a [Value] {
	match snapshot.get(key) {
		Some(Value::Array(items)) => items.as_slice(),
		None | Some(Value::Null) => &[],
		Some(_) => {
			warn!("csmatrix: snapshot `{key}` is not an array, ignoring it");
			&[]
		}
	}
}

fn as_id(value: Option<&Value>) -> Option<u64> {
	value.and_then(Value::as_u64).filter(|&id| id <= MAX_ID)
}

/// Rebuild a graph from a snapshot, keeping stored ids.
pub fn from_json(snapshot: &Value) -> Graph {
	let mut graph = Graph::new();
	if !snapshot.is_object() {
		warn!("csmatrix: snapshot is not an object, starting empty");
		return graph;
	}

	let nodes: Vec<NodeJson> = entries(snapshot, "nodes")
		.iter()
		.filter_map(|raw| match NodeJson::deserialize(raw) {
			Ok(node) => Some(node),
			Err(err) => {
				warn!("csmatrix: skipping unreadable node: {err}");
				None
			}
		})
		.collect();
	let edges: Vec<EdgeJson> = entries(snapshot, "edges")
		.iter()
		.filter_map(|raw| match EdgeJson::deserialize(raw) {
			Ok(edge) => Some(edge),
			Err(err) => {
				warn!("csmatrix: skipping unreadable edge: {err}");
				None
			}
		})
		.collect();

	// Fresh ids must start past every stored id, so find the ceiling first.
	graph.next_id = nodes
		.iter()
		.filter_map(|n| as_id(n.id.as_ref()))
		.chain(edges.iter().filter_map(|e| as_id(e.id.as_ref())))
		.max()
		.map_or(0, |max| max.saturating_add(1));

	let mut node_ids = HashSet::new();
	for raw in nodes {
		let id = match as_id(raw.id.as_ref()) {
			Some(id) => NodeId(id),
			None => NodeId(graph.allocate_id()),
		};
		if !node_ids.insert(id) {
			warn!("csmatrix: dropping node with duplicate id {id}");
			continue;
		}
		graph.nodes.push(Node::normalized(
			id,
			raw.name,
			raw.gx.unwrap_or(0.0),
			raw.gy.unwrap_or(0.0),
			raw.color,
		));
	}

	let mut edge_ids = HashSet::new();
	for raw in edges {
		let (Some(from), Some(to)) = (as_id(Some(&raw.from)), as_id(Some(&raw.to))) else {
			warn!("csmatrix: dropping edge with unusable endpoint ids");
			continue;
		};
		let (from, to) = (NodeId(from), NodeId(to));
		if !node_ids.contains(&from) || !node_ids.contains(&to) {
			warn!("csmatrix: dropping dangling edge {from} -> {to}");
			continue;
		}
		let id = match as_id(raw.id.as_ref()) {
			Some(id) => EdgeId(id),
			None => EdgeId(graph.allocate_id()),
		};
		if !edge_ids.insert(id) {
			warn!("csmatrix: dropping edge with duplicate id {id}");
			continue;
		}
		graph.edges.push(Edge {
			id,
			from,
			to,
			label: raw.label,
			weight: raw.weight,
			color: raw.color,
		});
	}

	graph.meta = match snapshot.get("meta") {
		Some(meta @ Value::Object(_)) => Meta::deserialize(meta).unwrap_or_else(|err| {
			warn!("csmatrix: unreadable meta, starting empty: {err}");
			Meta::default()
		}),
		None | Some(Value::Null) => Meta::default(),
		Some(_) => {
			warn!("csmatrix: snapshot `meta` is not an object, ignoring it");
			Meta::default()
		}
	};

	graph
}
