use std::collections::HashSet;

use crate::graph::geometry::GridPoint;
use crate::graph::{Graph, NodeId};

/// Result of clicking a node while linking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClick {
	/// First node picked; waiting for the second.
	Selected(NodeId),
	/// Second node picked; an edge should be created.
	Linked {
		/// Node picked first.
		from: NodeId,
		/// Node picked second.
		to: NodeId,
	},
	/// The picked node was clicked again.
	Deselected,
}

/// Two-click edge creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkSelection {
	pending: Option<NodeId>,
}

impl LinkSelection {
	/// Node waiting for a partner, if any.
	pub fn pending(&self) -> Option<NodeId> {
		self.pending
	}

	/// Feed a node click.
	pub fn click(&mut self, id: NodeId) -> NodeClick {
		match self.pending.take() {
			None => {
				self.pending = Some(id);
				NodeClick::Selected(id)
			}
			Some(from) if from == id => NodeClick::Deselected,
			Some(from) => NodeClick::Linked { from, to: id },
		}
	}

	/// Drop the pending node if it was `id` (it was removed).
	pub fn forget(&mut self, id: NodeId) {
		if self.pending == Some(id) {
			self.pending = None;
		}
	}

	/// Drop any pending node.
	pub fn clear(&mut self) {
		self.pending = None;
	}
}

const MAX_RING: i64 = 64;

/// The grid cell closest to the origin that no node currently sits on, scanning rings of
/// growing radius. Falls back to the origin on a saturated grid.
pub fn next_free_cell(graph: &Graph) -> GridPoint {
	let taken: HashSet<(i64, i64)> = graph
		.nodes()
		.iter()
		.map(|n| (n.gx.round() as i64, n.gy.round() as i64))
		.collect();
	for r in 0..=MAX_RING {
		for gy in (-r..=r).rev() {
			for gx in -r..=r {
				if gx.abs().max(gy.abs()) != r {
					continue;
				}
				if !taken.contains(&(gx, gy)) {
					return GridPoint {
						gx: gx as f64,
						gy: gy as f64,
					};
				}
			}
		}
	}
	GridPoint { gx: 0.0, gy: 0.0 }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::NodeAttrs;

	#[test]
	fn two_clicks_link_nodes() {
		let mut sel = LinkSelection::default();
		assert_eq!(sel.click(NodeId(1)), NodeClick::Selected(NodeId(1)));
		assert_eq!(
			sel.click(NodeId(2)),
			NodeClick::Linked {
				from: NodeId(1),
				to: NodeId(2)
			}
		);
		assert_eq!(sel.pending(), None);
	}

	#[test]
	fn clicking_twice_deselects() {
		let mut sel = LinkSelection::default();
		sel.click(NodeId(1));
		assert_eq!(sel.click(NodeId(1)), NodeClick::Deselected);
		sel.click(NodeId(3));
		sel.forget(NodeId(3));
		assert_eq!(sel.pending(), None);
	}

	#[test]
	fn free_cells_spiral_out_from_origin() {
		let mut g = Graph::new();
		assert_eq!(next_free_cell(&g), GridPoint { gx: 0.0, gy: 0.0 });
		g.add_node(NodeAttrs::at(0.0, 0.0));
		assert_eq!(next_free_cell(&g), GridPoint { gx: -1.0, gy: 1.0 });
		g.add_node(NodeAttrs::at(-1.0, 1.0));
		assert_eq!(next_free_cell(&g), GridPoint { gx: 0.0, gy: 1.0 });
	}
}
