//! Leptos client-side app wiring and routes, plus the CSMatrix graph core.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::info;

// Modules
mod components;
pub mod config;
pub mod graph;
mod pages;
pub mod persistence;

pub use components::die_toggle::DieStance;
pub use components::press::{PressOutcome, PressTracker, TouchGuard};

// Top-Level pages
use crate::config::AppConfig;
use crate::pages::chud::Chud;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target, then apply page-level switches.
pub fn init_logging() {
	let config = AppConfig::from_location();
	let _ = console_log::init_with_level(config.log_level);
	console_error_panic_hook::set_once();
	info!("Logging initialized");

	if config.debug_overflow {
		if let Some(root) = document().document_element() {
			let _ = root.class_list().add_1("debug-overflow");
		}
	}
	components::touch_blocker::install_touch_guards();
}

/// An app router which renders the CS Matrix, the HUD, and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Collapse: CS Matrix" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/chud") view=Chud />
			</Routes>
		</Router>
	}
}
