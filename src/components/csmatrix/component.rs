use leptos::ev::MouseEvent;
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::Element;

use super::render::{edge_view, grid_lines, node_view};
use super::state::{LinkSelection, NodeClick, next_free_cell};
use crate::components::meters::MeterPanel;
use crate::components::storage_sync::on_storage_change;
use crate::config::{GRAPH_STORAGE_KEY, VIEWBOX_SIZE};
use crate::graph::geometry::from_render_point;
use crate::graph::{EdgeAttrs, Graph, GraphStore, MeterKey, NodeAttrs, NodeId, RenderError};
use crate::persistence::{BrowserStorage, SlotAdapter};

/// The CSMatrix node/edge editor, persisted in `csmatrix.graph`.
#[component]
pub fn CsMatrix() -> impl IntoView {
	// What the view draws; refreshed by the store's render hook after every commit.
	let snapshot = RwSignal::new(Graph::new());
	let selection = RwSignal::new(LinkSelection::default());
	let store = StoredValue::new_local(GraphStore::open(Box::new(SlotAdapter::new(
		BrowserStorage,
		GRAPH_STORAGE_KEY,
	))));
	store.update_value(|s| {
		s.set_render_hook(Box::new(move |graph: &Graph| {
			match snapshot.try_set(graph.clone()) {
				None => Ok(()),
				Some(_) => Err(RenderError::Detached),
			}
		}))
	});
	on_storage_change(GRAPH_STORAGE_KEY, move || {
		store.try_update_value(GraphStore::reload);
		selection.try_update(LinkSelection::clear);
	});

	let pick = move |id: NodeId| {
		let Some(click) = selection.try_update(|sel| sel.click(id)) else {
			return;
		};
		if let NodeClick::Linked { from, to } = click {
			store.update_value(|s| {
				if let Err(err) = s.add_edge(EdgeAttrs::between(from, to)) {
					warn!("csmatrix: {err}");
				}
			});
		}
	};
	let remove = move |id: NodeId| {
		store.update_value(|s| {
			s.remove_node(id);
		});
		selection.update(|sel| sel.forget(id));
	};

	let on_add_node = move |_: MouseEvent| {
		store.update_value(|s| {
			let cell = next_free_cell(s.graph());
			s.add_node(NodeAttrs::at(cell.gx, cell.gy));
		});
	};
	let on_clear = move |_: MouseEvent| {
		store.update_value(GraphStore::clear);
		selection.update(LinkSelection::clear);
	};

	let on_surface_click = move |ev: MouseEvent| {
		selection.update(LinkSelection::clear);
		let Some(surface) = ev
			.current_target()
			.and_then(|t| t.dyn_into::<Element>().ok())
		else {
			return;
		};
		let rect = surface.get_bounding_client_rect();
		if rect.width() <= 0.0 || rect.height() <= 0.0 {
			return;
		}
		let (x, y) = (
			(f64::from(ev.client_x()) - rect.left()) * VIEWBOX_SIZE / rect.width(),
			(f64::from(ev.client_y()) - rect.top()) * VIEWBOX_SIZE / rect.height(),
		);
		if let Some(cell) = from_render_point(x, y, VIEWBOX_SIZE, VIEWBOX_SIZE) {
			let cell = cell.snapped();
			store.update_value(|s| {
				s.add_node(NodeAttrs::at(cell.gx, cell.gy));
			});
		}
	};

	let meters = Signal::derive(move || snapshot.with(Graph::meters));
	let on_meter = Callback::new(move |(key, delta): (MeterKey, i64)| {
		store.update_value(|s| {
			s.adjust_meter(key, delta);
		});
	});

	let counts = move || {
		snapshot.with(|g| format!("{} nodes, {} edges", g.nodes().len(), g.edges().len()))
	};
	let edges = move || {
		snapshot.with(|g| {
			g.edges()
				.iter()
				.filter_map(|edge| edge_view(edge, g))
				.collect_view()
		})
	};
	let nodes = move || {
		let pending = selection.with(LinkSelection::pending);
		snapshot.with(|g| {
			g.nodes()
				.iter()
				.map(|node| node_view(node, pending == Some(node.id), pick, remove))
				.collect_view()
		})
	};
	let view_box = format!("0 0 {VIEWBOX_SIZE} {VIEWBOX_SIZE}");

	view! {
		<div class="csmatrix">
			<div class="csmatrix-toolbar">
				<button id="btn-add-node" on:click=on_add_node>"Add node"</button>
				<button id="btn-clear" on:click=on_clear>"Clear"</button>
				<span class="csmatrix-count">{counts}</span>
			</div>
			<svg
				class="csmatrix-surface"
				viewBox=view_box
				width="100%"
				style="display: block; aspect-ratio: 1 / 1;"
				on:click=on_surface_click
			>
				<g class="grid">{grid_lines()}</g>
				<g class="edges">{edges}</g>
				<g class="nodes">{nodes}</g>
			</svg>
			<MeterPanel meters=meters on_change=on_meter />
		</div>
	}
}
