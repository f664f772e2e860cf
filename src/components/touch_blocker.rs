use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::{TimeoutHandle, set_timeout_with_handle};
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, Document, Element, Event, HtmlElement, MouseEvent, MouseEventInit,
	Node, TouchEvent,
};

use super::press::{TouchGuard, TouchHold};
use crate::config::{MOVE_TOLERANCE_PX, TOUCH_CONTEXTMENU_WINDOW_MS, TOUCH_TAP_MS};

/// Controls whose touches are turned into clicks and hold-for-menu.
const CONTROL_SELECTOR: &str = r#"button, a[href], [role="button"], [role="switch"]"#;

/// Drop the current text selection unless it sits inside a `.selectable` element.
fn clear_selection_unless_selectable() {
	let Some(selection) = web_sys::window().and_then(|w| w.get_selection().ok().flatten()) else {
		return;
	};
	if selection.range_count() == 0 {
		return;
	}
	let anchor: Option<Element> = selection.anchor_node().and_then(|node| {
		if node.node_type() == Node::TEXT_NODE {
			node.parent_element()
		} else {
			node.dyn_into::<Element>().ok()
		}
	});
	if anchor.is_some_and(|el| el.closest(".selectable").ok().flatten().is_some()) {
		return;
	}
	let _ = selection.remove_all_ranges();
}

fn listen(document: &Document, event: &str, passive: bool, handler: impl FnMut(Event) + 'static) {
	let closure = Closure::<dyn FnMut(Event)>::new(handler);
	let options = AddEventListenerOptions::new();
	options.set_passive(passive);
	let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
		event,
		closure.as_ref().unchecked_ref(),
		&options,
	);
	// listeners live as long as the page
	closure.forget();
}

/// The control a touch landed on, unless it opted out or sits in selectable text.
fn touched_control(ev: &Event) -> Option<HtmlElement> {
	let target = ev.target()?.dyn_into::<Element>().ok()?;
	if target.closest(".selectable").ok().flatten().is_some() {
		return None;
	}
	let control = target.closest(CONTROL_SELECTOR).ok().flatten()?;
	if control.has_attribute("data-touch-blocker-ignore") {
		return None;
	}
	control.dyn_into::<HtmlElement>().ok()
}

fn touch_point(ev: &Event) -> Option<(f64, f64)> {
	let touch = ev.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
	Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

struct HeldControl {
	gesture: TouchHold,
	control: Option<HtmlElement>,
	timer: Option<TimeoutHandle>,
}

impl HeldControl {
	fn stop_timer(&mut self) {
		if let Some(timer) = self.timer.take() {
			timer.clear();
		}
	}
}

fn open_context_menu(held: &RefCell<HeldControl>) {
	let control = {
		let mut held = held.borrow_mut();
		held.timer = None;
		if !held.gesture.hold_elapsed() {
			return;
		}
		held.control.clone()
	};
	let Some(control) = control else {
		return;
	};
	clear_selection_unless_selectable();
	let init = MouseEventInit::new();
	init.set_bubbles(true);
	if let Ok(menu) = MouseEvent::new_with_mouse_event_init_dict("contextmenu", &init) {
		let _ = control.dispatch_event(&menu);
	}
}

/// Take over touches on controls: a short touch clicks, a still hold opens the context menu,
/// and the browser's own long-press handling never starts.
fn install_control_blocker(document: &Document) {
	let held = Rc::new(RefCell::new(HeldControl {
		gesture: TouchHold::new(TOUCH_TAP_MS, MOVE_TOLERANCE_PX),
		control: None,
		timer: None,
	}));

	let on_start = held.clone();
	listen(document, "touchstart", false, move |ev| {
		let Some(control) = touched_control(&ev) else {
			return;
		};
		let Some((x, y)) = touch_point(&ev) else {
			return;
		};
		ev.prevent_default();
		let mut state = on_start.borrow_mut();
		state.stop_timer();
		state.gesture.start(js_sys::Date::now(), x, y);
		state.control = Some(control);
		let fire = on_start.clone();
		match set_timeout_with_handle(
			move || open_context_menu(&fire),
			Duration::from_millis(TOUCH_TAP_MS as u64),
		) {
			Ok(timer) => state.timer = Some(timer),
			Err(err) => warn!("touch blocker: could not start hold timer: {err:?}"),
		}
	});

	let on_move = held.clone();
	listen(document, "touchmove", true, move |ev| {
		let Some((x, y)) = touch_point(&ev) else {
			return;
		};
		let mut state = on_move.borrow_mut();
		if state.gesture.moved(x, y) {
			state.stop_timer();
		}
	});

	let on_end = held.clone();
	listen(document, "touchend", true, move |_| {
		let clicked = {
			let mut state = on_end.borrow_mut();
			state.stop_timer();
			let tap = state.gesture.end(js_sys::Date::now());
			state.control.take().filter(|_| tap)
		};
		if let Some(control) = clicked {
			control.click();
		}
	});

	listen(document, "touchcancel", true, move |_| {
		let mut state = held.borrow_mut();
		state.stop_timer();
		state.gesture.cancel();
		state.control = None;
	});
}

/// On touch devices, stop long presses from selecting text or opening the context menu.
pub fn install_touch_guards() {
	let Some(window) = web_sys::window() else {
		return;
	};
	let is_touch = js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
	if !is_touch {
		return;
	}
	let Some(document) = window.document() else {
		return;
	};
	if let Some(body) = document.body() {
		let _ = body.class_list().add_1("no-select");
	}

	let guard = Rc::new(RefCell::new(TouchGuard::new(TOUCH_CONTEXTMENU_WINDOW_MS)));
	let guard_touch = guard.clone();
	listen(&document, "touchstart", true, move |_| {
		guard_touch.borrow_mut().touched(js_sys::Date::now());
		clear_selection_unless_selectable();
	});
	listen(&document, "contextmenu", false, move |ev| {
		if guard.borrow().blocks_context_menu(js_sys::Date::now()) {
			ev.prevent_default();
		}
	});
	for event in ["selectionchange", "touchmove", "touchend", "pointerup"] {
		listen(&document, event, true, |_| clear_selection_unless_selectable());
	}
	install_control_blocker(&document);
	debug!("touch guards installed");
}
