use std::time::Duration;

use leptos::ev::{MouseEvent, PointerEvent};
use leptos::prelude::*;
use log::warn;

use super::press::{PressOutcome, PressTracker};
use crate::config::{MAX_METER, METER_LONG_PRESS_MS};
use crate::graph::{GlobalMeters, MeterKey};

/// One meter bar. Tap adds one; long press or right click takes one away.
#[component]
pub fn MeterRow(
	meter: MeterKey,
	#[prop(into)] value: Signal<u8>,
	on_change: Callback<i64>,
) -> impl IntoView {
	let tracker = StoredValue::new(PressTracker::new());
	let timer = StoredValue::new(None::<TimeoutHandle>);

	let clear_timer = move || {
		if let Some(handle) = timer.try_update_value(Option::take).flatten() {
			handle.clear();
		}
	};

	let on_pointerdown = move |ev: PointerEvent| {
		if ev.button() == 2 {
			return;
		}
		clear_timer();
		tracker.update_value(PressTracker::press);
		let fire = move || {
			if tracker
				.try_update_value(PressTracker::long_press_elapsed)
				.unwrap_or(false)
			{
				on_change.run(-1);
			}
		};
		match set_timeout_with_handle(fire, Duration::from_millis(METER_LONG_PRESS_MS as u64)) {
			Ok(handle) => timer.set_value(Some(handle)),
			Err(err) => warn!("chud-meters: could not start hold timer: {err:?}"),
		}
	};

	let on_pointerup = move |ev: PointerEvent| {
		if ev.button() == 2 {
			return;
		}
		clear_timer();
		if tracker.try_update_value(PressTracker::release).flatten() == Some(PressOutcome::Tap) {
			on_change.run(1);
		}
	};

	let on_abort = move |_: PointerEvent| {
		clear_timer();
		tracker.update_value(PressTracker::cancel);
	};

	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		on_change.run(-1);
	};

	let fill_width = move || {
		format!(
			"width: {}%",
			f64::from(value.get()) / f64::from(MAX_METER) * 100.0
		)
	};

	view! {
		<div
			class="chud-meter-row"
			data-meter=meter.as_str()
			style=format!("--meter-accent: {}", meter.accent())
			on:pointerdown=on_pointerdown
			on:pointerup=on_pointerup
			on:pointerleave=on_abort
			on:pointercancel=on_abort
			on:contextmenu=on_contextmenu
		>
			<div class="chud-meter-fill" style=fill_width></div>
			<span class="chud-meter-label">{meter.label()}</span>
			<span class="chud-meter-value">{move || value.get()}</span>
		</div>
	}
}

/// The four global meters, in display order.
#[component]
pub fn MeterPanel(
	#[prop(into)] meters: Signal<GlobalMeters>,
	on_change: Callback<(MeterKey, i64)>,
) -> impl IntoView {
	let rows = MeterKey::ALL
		.into_iter()
		.map(|meter| {
			let value = Signal::derive(move || meters.with(|m| m.get(meter)));
			let on_row_change = Callback::new(move |delta: i64| on_change.run((meter, delta)));
			view! { <MeterRow meter=meter value=value on_change=on_row_change /> }
		})
		.collect_view();

	view! {
		<div class="chud-meters">
			<h3>"Global Meters"</h3>
			{rows}
		</div>
	}
}
