use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::config::{NODE_RADIUS, VIEWBOX_SIZE};
use crate::graph::geometry::{RenderPoint, to_render_point};
use crate::graph::{Edge, Graph, Node, NodeId};

const EDGE_COLOR: &str = "rgba(100, 180, 255, 0.7)";

fn place(node: &Node) -> RenderPoint {
	to_render_point(node.gx, node.gy, VIEWBOX_SIZE, VIEWBOX_SIZE)
}

/// Faint lines at every whole grid cell plus stronger axes.
pub fn grid_lines() -> impl IntoView {
	let origin = to_render_point(0.0, 0.0, VIEWBOX_SIZE, VIEWBOX_SIZE);
	let step = to_render_point(1.0, 0.0, VIEWBOX_SIZE, VIEWBOX_SIZE).x - origin.x;
	let cells = (VIEWBOX_SIZE / 2.0 / step).floor() as i64;
	let size = VIEWBOX_SIZE.to_string();
	(-cells..=cells)
		.map(|i| {
			let offset = i as f64 * step;
			let (x, y) = ((origin.x + offset).to_string(), (origin.y + offset).to_string());
			let class = if i == 0 { "grid-axis" } else { "grid-line" };
			view! {
				<line class=class x1=x.clone() y1="0" x2=x y2=size.clone() />
				<line class=class x1="0" y1=y.clone() x2=size.clone() y2=y />
			}
		})
		.collect_view()
}

/// A line between the two endpoint circles. `None` if an endpoint is missing.
pub fn edge_view(edge: &Edge, graph: &Graph) -> Option<impl IntoView + use<>> {
	let (from, to) = (place(graph.node(edge.from)?), place(graph.node(edge.to)?));
	let stroke = edge.color.clone().unwrap_or_else(|| EDGE_COLOR.to_string());
	let width = edge.weight.map_or(2.0, |w| (1.0 + w * 2.0).clamp(1.0, 8.0));
	let label = edge.label.clone().map(|text| {
		let (mx, my) = ((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
		view! { <text class="edge-label" x=mx.to_string() y=(my - 6.0).to_string()>{text}</text> }
	});
	Some(view! {
		<g class="edge" data-id=edge.id.to_string()>
			<line
				x1=from.x.to_string()
				y1=from.y.to_string()
				x2=to.x.to_string()
				y2=to.y.to_string()
				stroke=stroke
				stroke-width=width.to_string()
			/>
			{label}
		</g>
	})
}

/// A node circle with its label. Left click picks it for linking, right click removes it.
pub fn node_view<P, R>(
	node: &Node,
	pending: bool,
	on_pick: P,
	on_remove: R,
) -> impl IntoView + use<P, R>
where
	P: Fn(NodeId) + Copy + 'static,
	R: Fn(NodeId) + Copy + 'static,
{
	let id = node.id;
	let p = place(node);
	let class = if pending { "node pending" } else { "node" };
	view! {
		<g
			class=class
			data-id=id.to_string()
			on:click=move |ev: MouseEvent| {
				ev.stop_propagation();
				on_pick(id);
			}
			on:contextmenu=move |ev: MouseEvent| {
				ev.prevent_default();
				ev.stop_propagation();
				on_remove(id);
			}
		>
			<circle
				cx=p.x.to_string()
				cy=p.y.to_string()
				r=NODE_RADIUS.to_string()
				fill=node.color.clone()
			/>
			<text x=(p.x + NODE_RADIUS + 4.0).to_string() y=(p.y + 5.0).to_string()>
				{node.name.clone()}
			</text>
		</g>
	}
}
