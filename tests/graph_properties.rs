//! Property tests for the graph core: arbitrary attributes, deltas and edit sequences.

use std::collections::HashSet;

use collapse_csmatrix::graph::{
	EdgeAttrs, Graph, MeterKey, NodeAttrs, NodeId, clamp_meter, from_json, to_json,
};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Edit {
	Add(f64, f64),
	Remove(usize),
	Link(usize, usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
	prop_oneof![
		(-20.0f64..20.0, -20.0f64..20.0).prop_map(|(gx, gy)| Edit::Add(gx, gy)),
		(0usize..32).prop_map(Edit::Remove),
		(0usize..32, 0usize..32).prop_map(|(a, b)| Edit::Link(a, b)),
	]
}

fn meter_key() -> impl Strategy<Value = MeterKey> {
	prop::sample::select(MeterKey::ALL.to_vec())
}

/// Apply `edits`, returning the node ids that should still be present.
fn apply(graph: &mut Graph, edits: &[Edit]) -> Vec<NodeId> {
	let mut live = Vec::new();
	for edit in edits {
		match *edit {
			Edit::Add(gx, gy) => live.push(graph.add_node(NodeAttrs::at(gx, gy)).id),
			Edit::Remove(i) if !live.is_empty() => {
				let id = live.remove(i % live.len());
				assert!(graph.remove_node(id));
			}
			Edit::Link(a, b) if !live.is_empty() => {
				let (from, to) = (live[a % live.len()], live[b % live.len()]);
				graph.add_edge(EdgeAttrs::between(from, to)).unwrap();
			}
			_ => {}
		}
	}
	live
}

proptest! {
	#[test]
	fn node_attributes_survive_a_round_trip(
		name in "[a-zA-Z0-9 ]{0,12}",
		gx in -1.0e6f64..1.0e6,
		gy in -1.0e6f64..1.0e6,
		color in "#[0-9a-f]{6}",
	) {
		let mut g = Graph::new();
		let id = g
			.add_node(NodeAttrs::at(gx, gy).named(name.clone()).colored(color.clone()))
			.id;
		let back = from_json(&to_json(&g));
		let node = back.node(id).unwrap();
		prop_assert_eq!(&node.name, &name);
		prop_assert_eq!(&node.color, &color);
		prop_assert_eq!((node.gx, node.gy), (gx, gy));
	}

	#[test]
	fn adjusted_meters_stay_in_range(
		steps in prop::collection::vec((meter_key(), any::<i64>()), 1..40),
	) {
		let mut g = Graph::new();
		for (key, delta) in steps {
			let before = i64::from(g.meters().get(key));
			let value = g.adjust_meter(key, delta);
			prop_assert!(value <= 6);
			prop_assert_eq!(value, clamp_meter(before.saturating_add(delta)));
			prop_assert_eq!(g.meters().get(key), value);
		}
	}

	#[test]
	fn json_node_count_tracks_edits(edits in prop::collection::vec(edit_strategy(), 0..60)) {
		let mut g = Graph::new();
		let live = apply(&mut g, &edits);
		let json = to_json(&g);
		prop_assert_eq!(json["nodes"].as_array().unwrap().len(), live.len());
		prop_assert_eq!(g.nodes().len(), live.len());

		let ids: HashSet<u64> = g
			.nodes()
			.iter()
			.map(|n| n.id.0)
			.chain(g.edges().iter().map(|e| e.id.0))
			.collect();
		prop_assert_eq!(ids.len(), g.nodes().len() + g.edges().len());
		for edge in g.edges() {
			prop_assert!(g.node(edge.from).is_some() && g.node(edge.to).is_some());
		}
	}

	#[test]
	fn double_round_trip_is_idempotent(
		edits in prop::collection::vec(edit_strategy(), 0..60),
		meters in prop::collection::vec((meter_key(), -10i64..10), 0..8),
	) {
		let mut g = Graph::new();
		apply(&mut g, &edits);
		for (key, delta) in meters {
			g.adjust_meter(key, delta);
		}
		let once = from_json(&to_json(&g));
		let twice = from_json(&to_json(&once));
		prop_assert_eq!(to_json(&once), to_json(&twice));
		prop_assert_eq!(once.nodes(), g.nodes());
		prop_assert_eq!(once.edges(), g.edges());
		prop_assert_eq!(once.meta(), g.meta());
	}
}
