use collapse_csmatrix::config::GRAPH_STORAGE_KEY;
use collapse_csmatrix::graph::{
	EdgeAttrs, Graph, GraphError, GraphStore, MeterBridge, MeterKey, NodeAttrs, NodeId, from_json,
	to_json,
};
use collapse_csmatrix::persistence::{MemoryStorage, SlotAdapter, StorageSlot};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn open(storage: &MemoryStorage) -> GraphStore {
	GraphStore::open(Box::new(SlotAdapter::new(storage.clone(), GRAPH_STORAGE_KEY)))
}

fn stored(storage: &MemoryStorage) -> Value {
	let text = storage.get(GRAPH_STORAGE_KEY).unwrap().unwrap();
	serde_json::from_str(&text).unwrap()
}

#[test]
fn nodes_survive_a_reload() {
	let storage = MemoryStorage::new();
	let mut first = open(&storage);
	let a = first
		.add_node(NodeAttrs::at(-1.0, 2.0).named("A").colored("#123456"))
		.id;
	first.add_node(NodeAttrs::at(1.0, -1.0).named("B").colored("#abcdef"));
	assert_eq!(stored(&storage)["nodes"].as_array().unwrap().len(), 2);

	let second = open(&storage);
	let nodes = second.graph().nodes();
	assert_eq!(nodes.len(), 2);
	assert_eq!(nodes[0].id, a);
	assert_eq!(nodes[0].name, "A");
	assert_eq!(nodes[0].color, "#123456");
	assert_eq!((nodes[0].gx, nodes[0].gy), (-1.0, 2.0));
}

#[test]
fn json_node_count_tracks_mutations() {
	let mut g = Graph::new();
	let mut ids = Vec::new();
	for i in 0..6 {
		ids.push(g.add_node(NodeAttrs::at(i as f64, 0.0)).id);
		assert_eq!(to_json(&g)["nodes"].as_array().unwrap().len(), g.nodes().len());
	}
	for id in ids.iter().step_by(2) {
		g.remove_node(*id);
		assert_eq!(to_json(&g)["nodes"].as_array().unwrap().len(), g.nodes().len());
	}
	assert_eq!(g.nodes().len(), 3);
}

#[test]
fn adjusted_meters_stay_in_range() {
	let mut g = Graph::new();
	for key in MeterKey::ALL {
		for delta in [-100, -7, -1, 0, 1, 5, 7, 100, i64::MAX, i64::MIN] {
			let value = g.adjust_meter(key, delta);
			assert!(value <= 6, "{key:?} {delta} -> {value}");
			assert_eq!(g.meters().get(key), value);
		}
	}
}

#[test]
fn round_trip_is_idempotent() {
	let mut g = Graph::new();
	let a = g.add_node(NodeAttrs::at(0.0, 0.0).named("hub")).id;
	let b = g.add_node(NodeAttrs::at(2.0, -1.5)).id;
	g.add_edge(EdgeAttrs::between(a, b)).unwrap();
	let gone = g.add_node(NodeAttrs::at(9.0, 9.0)).id;
	g.remove_node(gone);
	g.set_meter(MeterKey::Record, 4);

	let once = from_json(&to_json(&g));
	let twice = from_json(&to_json(&once));
	assert_eq!(to_json(&once), to_json(&twice));
	assert_eq!(once.nodes(), g.nodes());
	assert_eq!(once.edges(), g.edges());
}

#[test]
fn edge_to_unknown_node_fails_without_saving() {
	let storage = MemoryStorage::new();
	let mut store = open(&storage);
	let a = store.add_node(NodeAttrs::at(0.0, 0.0)).id;
	let writes = storage.writes();

	let err = store
		.add_edge(EdgeAttrs::between(NodeId(777), a))
		.unwrap_err();
	assert_eq!(err, GraphError::MissingNode { id: NodeId(777) });
	assert!(store.graph().edges().is_empty());
	assert_eq!(storage.writes(), writes);
}

#[test]
fn meters_start_at_fallback_and_clamp() {
	let storage = MemoryStorage::new();
	let mut store = open(&storage);
	let m = store.graph().meters();
	assert_eq!(
		(m.collapse, m.influence, m.record, m.grit),
		(0, 2, 1, 0)
	);
	for _ in 0..3 {
		store.adjust_meter(MeterKey::Grit, 1);
	}
	assert_eq!(store.graph().meters().grit, 3);
	for _ in 0..6 {
		store.adjust_meter(MeterKey::Grit, 1);
	}
	assert_eq!(store.graph().meters().grit, 6);
	assert_eq!(stored(&storage)["meta"]["globalMeters"]["grit"], json!(6));
}

#[test]
fn corrupt_slot_opens_empty() {
	let storage = MemoryStorage::new();
	storage.set(GRAPH_STORAGE_KEY, "{\"nodes\": [").unwrap();
	let store = open(&storage);
	assert!(store.graph().nodes().is_empty());
	assert!(store.graph().edges().is_empty());
	assert_eq!(store.graph().meta().global_meters, None);
}

#[test]
fn failed_writes_keep_the_session_working() {
	let storage = MemoryStorage::new();
	storage.fail_writes(true);
	let mut store = open(&storage);
	let a = store.add_node(NodeAttrs::at(0.0, 0.0)).id;
	let b = store.add_node(NodeAttrs::at(1.0, 0.0)).id;
	store.add_edge(EdgeAttrs::between(a, b)).unwrap();
	assert_eq!(store.graph().edges().len(), 1);
	assert_eq!(storage.get(GRAPH_STORAGE_KEY).unwrap(), None);
}

#[test]
fn reload_picks_up_another_tab() {
	let storage = MemoryStorage::new();
	let mut mine = open(&storage);
	for i in 0..3 {
		mine.add_node(NodeAttrs::at(i as f64, 0.0));
	}

	// the other tab clears and adds one node, reusing low ids
	storage
		.set(
			GRAPH_STORAGE_KEY,
			r#"{"nodes":[{"id":0,"name":"other"}],"edges":[],"meta":{}}"#,
		)
		.unwrap();
	mine.reload();
	assert_eq!(mine.graph().nodes().len(), 1);
	assert_eq!(mine.graph().nodes()[0].name, "other");

	let fresh = mine.add_node(NodeAttrs::at(0.0, 0.0)).id;
	assert!(fresh.0 >= 3, "id counter went backwards: {fresh}");
}

#[test]
fn unknown_meta_survives_editor_and_meter_widget() {
	let storage = MemoryStorage::new();
	storage
		.set(
			GRAPH_STORAGE_KEY,
			r##"{"nodes":[{"id":5,"name":"keep","gx":1,"gy":1,"color":"#fff"}],"edges":[],
			"meta":{"layout":{"zoom":2},"globalMeters":{"grit":2,"collapse":1,"record":0,"influence":3,"morale":4}}}"##,
		)
		.unwrap();

	let bridge = MeterBridge::new(Box::new(SlotAdapter::new(storage.clone(), GRAPH_STORAGE_KEY)));
	assert_eq!(bridge.change(MeterKey::Collapse, 1), 2);

	let mut store = open(&storage);
	assert_eq!(store.graph().meters().collapse, 2);
	store.add_node(NodeAttrs::at(0.0, 0.0).named("new"));

	let snapshot = stored(&storage);
	assert_eq!(snapshot["meta"]["layout"], json!({"zoom": 2}));
	assert_eq!(snapshot["meta"]["globalMeters"]["morale"], json!(4));
	assert_eq!(snapshot["nodes"][0]["name"], json!("keep"));
	assert_eq!(snapshot["nodes"][1]["id"], json!(6));
}
