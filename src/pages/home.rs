use leptos::prelude::*;

use crate::components::csmatrix::CsMatrix;

/// CSMatrix editor page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="csmatrix-page">
			<div class="graph-overlay">
				<h1>"CS Matrix"</h1>
				<p class="subtitle">
					"Click the grid to add a node. Click two nodes to link them. Right-click a node to remove it."
				</p>
			</div>
			<CsMatrix />
		</div>
	}
}
