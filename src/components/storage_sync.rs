use leptos::ev;
use leptos::prelude::*;
use log::debug;
use web_sys::StorageEvent;

fn touches_key(event: &StorageEvent, key: &str) -> bool {
	changed_key_matches(event.key().as_deref(), key)
}

/// `None` means the other tab cleared all of storage, which also drops `key`.
fn changed_key_matches(changed: Option<&str>, key: &str) -> bool {
	changed.is_none_or(|changed| changed == key)
}

/// Run `handler` whenever another tab writes `key`, until the calling component is cleaned up.
pub fn on_storage_change(key: &'static str, handler: impl Fn() + 'static) {
	let handle = window_event_listener(ev::storage, move |event: StorageEvent| {
		if touches_key(&event, key) {
			debug!("storage: `{key}` changed in another tab");
			handler();
		}
	});
	on_cleanup(move || handle.remove());
}
