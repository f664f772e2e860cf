use leptos::prelude::*;

use crate::components::die_toggle::DieToggle;
use crate::components::meters::MeterPanel;
use crate::components::storage_sync::on_storage_change;
use crate::config::GRAPH_STORAGE_KEY;
use crate::graph::{MeterBridge, MeterKey};
use crate::persistence::{BrowserStorage, SlotAdapter};

/// Character HUD: global meters and the die toggle.
#[component]
pub fn Chud() -> impl IntoView {
	let bridge = StoredValue::new_local(MeterBridge::new(Box::new(SlotAdapter::new(
		BrowserStorage,
		GRAPH_STORAGE_KEY,
	))));
	let meters = RwSignal::new(bridge.with_value(MeterBridge::read_meters));

	let on_change = Callback::new(move |(key, delta): (MeterKey, i64)| {
		bridge.with_value(|b| b.change(key, delta));
		meters.set(bridge.with_value(MeterBridge::read_meters));
	});
	on_storage_change(GRAPH_STORAGE_KEY, move || {
		if let Some(fresh) = bridge.try_with_value(MeterBridge::read_meters) {
			meters.try_set(fresh);
		}
	});

	view! {
		<section class="chud">
			<MeterPanel meters=meters on_change=on_change />
			<DieToggle />
		</section>
	}
}
