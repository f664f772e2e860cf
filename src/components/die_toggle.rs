use leptos::ev::KeyboardEvent;
use leptos::prelude::*;
use log::warn;

use crate::config::DIE_TOGGLE_KEY;
use crate::persistence::{BrowserStorage, StorageSlot};

/// Which side currently rolls the D10.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DieStance {
	/// Attack (the default).
	#[default]
	Atk,
	/// Defense.
	Def,
}

impl DieStance {
	/// Stored value. Anything but `"def"` reads as attack.
	pub fn parse(raw: Option<&str>) -> Self {
		match raw {
			Some("def") => DieStance::Def,
			_ => DieStance::Atk,
		}
	}

	/// Stored form.
	pub fn as_str(self) -> &'static str {
		match self {
			DieStance::Atk => "atk",
			DieStance::Def => "def",
		}
	}

	/// The other side.
	pub fn toggled(self) -> Self {
		match self {
			DieStance::Atk => DieStance::Def,
			DieStance::Def => DieStance::Atk,
		}
	}

	/// Read the stance slot, defaulting to attack on any failure.
	pub fn load(storage: &impl StorageSlot) -> Self {
		match storage.get(DIE_TOGGLE_KEY) {
			Ok(raw) => Self::parse(raw.as_deref()),
			Err(err) => {
				warn!("die-toggle: {err}");
				DieStance::Atk
			}
		}
	}

	/// Write the stance slot; failures only log.
	pub fn save(self, storage: &impl StorageSlot) {
		if let Err(err) = storage.set(DIE_TOGGLE_KEY, self.as_str()) {
			warn!("die-toggle: {err}");
		}
	}
}

/// ATK/DEF switch persisted in `chud.die-toggle`.
#[component]
pub fn DieToggle() -> impl IntoView {
	let (stance, set_stance) = signal(DieStance::load(&BrowserStorage));
	let flip = move || {
		let next = stance.get_untracked().toggled();
		next.save(&BrowserStorage);
		set_stance.set(next);
	};
	let on_keydown = move |ev: KeyboardEvent| {
		let key = ev.key();
		if key == "Enter" || key == " " {
			ev.prevent_default();
			flip();
		}
	};

	view! {
		<div class="die-toggle">
			<div class="die-toggle-header">
				<span>"ATK"</span>
				<span>"DEF"</span>
			</div>
			<div
				class="die-track"
				role="switch"
				tabindex="0"
				data-state=move || stance.get().as_str()
				aria-checked=move || if stance.get() == DieStance::Def { "true" } else { "false" }
				on:click=move |_| flip()
				on:keydown=on_keydown
			>
				<span>"D8"</span>
				<span>"D8"</span>
				<div class=move || format!("die-thumb pos-{}", stance.get().as_str())>"D10"</div>
			</div>
		</div>
	}
}
