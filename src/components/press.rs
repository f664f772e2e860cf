//! Tap vs. long-press disambiguation, independent of any DOM event type.

/// What a completed press amounted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
	/// Released before the hold threshold.
	Tap,
	/// The hold threshold passed while pressed. The long-press action has already fired from the
	/// timer; releasing reports it so the caller does not also treat it as a tap.
	LongPress,
}

/// Tracks one pointer press at a time. The long-press action is driven by an external timer
/// calling [`PressTracker::long_press_elapsed`].
#[derive(Clone, Debug, Default)]
pub struct PressTracker {
	pressed: bool,
	long_fired: bool,
}

impl PressTracker {
	/// Idle tracker.
	pub fn new() -> Self {
		Self::default()
	}

	/// Pointer went down.
	pub fn press(&mut self) {
		self.pressed = true;
		self.long_fired = false;
	}

	/// The hold timer fired. Returns `true` if this should run the long-press action.
	pub fn long_press_elapsed(&mut self) -> bool {
		if self.pressed && !self.long_fired {
			self.long_fired = true;
			return true;
		}
		false
	}

	/// Pointer went up. `None` if no press was in progress.
	pub fn release(&mut self) -> Option<PressOutcome> {
		if !std::mem::take(&mut self.pressed) {
			return None;
		}
		Some(if std::mem::take(&mut self.long_fired) {
			PressOutcome::LongPress
		} else {
			PressOutcome::Tap
		})
	}

	/// Pointer left or the press was cancelled.
	pub fn cancel(&mut self) {
		self.pressed = false;
		self.long_fired = false;
	}

	/// Whether a press is in progress.
	pub fn is_pressed(&self) -> bool {
		self.pressed
	}
}

/// Remembers recent touches so a touch-triggered `contextmenu` can be told apart from a
/// right click.
#[derive(Clone, Debug)]
pub struct TouchGuard {
	window_ms: f64,
	last_touch: Option<f64>,
}

impl TouchGuard {
	/// Guard suppressing context menus up to `window_ms` after a touch.
	pub fn new(window_ms: f64) -> Self {
		Self {
			window_ms,
			last_touch: None,
		}
	}

	/// A touch started.
	pub fn touched(&mut self, now: f64) {
		self.last_touch = Some(now);
	}

	/// Whether a `contextmenu` at `now` came from a long touch.
	pub fn blocks_context_menu(&self, now: f64) -> bool {
		self.last_touch.is_some_and(|t| now - t < self.window_ms)
	}
}

/// One touch on a control: a short touch becomes a click, a still hold becomes a context menu.
///
/// The hold itself is timed by the caller, which reports it through [`TouchHold::hold_elapsed`].
#[derive(Clone, Debug)]
pub struct TouchHold {
	tap_ms: f64,
	tolerance_px: f64,
	start: Option<(f64, f64, f64)>,
	holding: bool,
}

impl TouchHold {
	/// Touches shorter than `tap_ms` are taps; moving more than `tolerance_px` drops the hold.
	pub fn new(tap_ms: f64, tolerance_px: f64) -> Self {
		Self {
			tap_ms,
			tolerance_px,
			start: None,
			holding: false,
		}
	}

	/// A touch began at `now` on (`x`, `y`).
	pub fn start(&mut self, now: f64, x: f64, y: f64) {
		self.start = Some((now, x, y));
		self.holding = true;
	}

	/// The touch moved. Returns `true` if this move cancelled a pending hold.
	pub fn moved(&mut self, x: f64, y: f64) -> bool {
		let Some((_, sx, sy)) = self.start else {
			return false;
		};
		let far = (x - sx).abs() > self.tolerance_px || (y - sy).abs() > self.tolerance_px;
		if far && self.holding {
			self.holding = false;
			return true;
		}
		false
	}

	/// The hold timer fired. Returns `true` if the context menu should open.
	pub fn hold_elapsed(&mut self) -> bool {
		std::mem::take(&mut self.holding)
	}

	/// The touch ended at `now`. Returns `true` if it should count as a click.
	pub fn end(&mut self, now: f64) -> bool {
		self.holding = false;
		self.start
			.take()
			.is_some_and(|(t, _, _)| now - t < self.tap_ms)
	}

	/// The touch was cancelled by the browser.
	pub fn cancel(&mut self) {
		self.start = None;
		self.holding = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn quick_release_is_a_tap() {
		let mut p = PressTracker::new();
		p.press();
		assert_eq!(p.release(), Some(PressOutcome::Tap));
		assert!(!p.is_pressed());
	}

	#[test]
	fn timer_marks_long_press_once() {
		let mut p = PressTracker::new();
		p.press();
		assert!(p.long_press_elapsed());
		assert!(!p.long_press_elapsed());
		assert_eq!(p.release(), Some(PressOutcome::LongPress));
		// the next press starts clean
		p.press();
		assert_eq!(p.release(), Some(PressOutcome::Tap));
	}

	#[test]
	fn cancelled_press_reports_nothing() {
		let mut p = PressTracker::new();
		p.press();
		p.cancel();
		assert!(!p.long_press_elapsed());
		assert_eq!(p.release(), None);
	}

	#[test]
	fn context_menu_blocked_only_near_a_touch() {
		let mut g = TouchGuard::new(1000.0);
		assert!(!g.blocks_context_menu(5.0));
		g.touched(100.0);
		assert!(g.blocks_context_menu(900.0));
		assert!(!g.blocks_context_menu(1100.0));
	}

	#[test]
	fn short_touch_is_a_click() {
		let mut t = TouchHold::new(350.0, 10.0);
		t.start(1000.0, 5.0, 5.0);
		assert!(t.end(1200.0));
		// nothing pending afterwards
		assert!(!t.hold_elapsed());
		assert!(!t.end(1300.0));
	}

	#[test]
	fn still_hold_opens_menu_without_click() {
		let mut t = TouchHold::new(350.0, 10.0);
		t.start(0.0, 5.0, 5.0);
		assert!(!t.moved(12.0, 0.0));
		assert!(t.hold_elapsed());
		assert!(!t.end(400.0));
	}

	#[test]
	fn moving_away_drops_the_hold() {
		let mut t = TouchHold::new(350.0, 10.0);
		t.start(0.0, 5.0, 5.0);
		assert!(t.moved(5.0, 20.0));
		assert!(!t.moved(5.0, 40.0));
		assert!(!t.hold_elapsed());
		// a quick swipe still ends as a click
		assert!(t.end(100.0));
	}

	#[test]
	fn cancelled_touch_does_nothing() {
		let mut t = TouchHold::new(350.0, 10.0);
		t.start(0.0, 0.0, 0.0);
		t.cancel();
		assert!(!t.hold_elapsed());
		assert!(!t.end(10.0));
	}
}
