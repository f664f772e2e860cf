//! Shared constants and the small amount of runtime configuration read from the page URL.

use log::Level;

// Storage slots
/// Slot holding the serialized CSMatrix graph (nodes, edges, meta).
pub const GRAPH_STORAGE_KEY: &str = "csmatrix.graph";
/// Slot holding the ATK/DEF die toggle position.
pub const DIE_TOGGLE_KEY: &str = "chud.die-toggle";

// Meters
/// Upper bound of every global meter; the lower bound is 0.
pub const MAX_METER: u8 = 6;

// Geometry
/// Number of grid cells that fit across the shorter side of the rendering surface.
pub const GRID_SPAN: f64 = 10.0;
/// Width and height of the editor's SVG view box.
pub const VIEWBOX_SIZE: f64 = 1000.0;
/// Radius of a node circle in view box units.
pub const NODE_RADIUS: f64 = 18.0;

// Gestures
/// Hold time after which a meter row press counts as a long press.
pub const METER_LONG_PRESS_MS: f64 = 520.0;
/// Touches on a control shorter than this become clicks; holding this long opens its context menu.
pub const TOUCH_TAP_MS: f64 = 350.0;
/// A `contextmenu` arriving this soon after a touch is treated as a long-press menu and suppressed.
pub const TOUCH_CONTEXTMENU_WINDOW_MS: f64 = 1000.0;
/// Touch travel (px) that cancels a pending hold.
pub const MOVE_TOLERANCE_PX: f64 = 10.0;

/// Node fill colors, picked by node id when a node has no explicit color.
pub const NODE_PALETTE: &[&str] = &[
	"#f2d06b", "#ff6b9a", "#6ac7ff", "#63ffb1", "#9467bd", "#ff7f0e", "#17becf", "#bcbd22",
];

/// Runtime switches taken from the page query string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	/// Console log level (`?log=warn`).
	pub log_level: Level,
	/// Outline overflowing elements (`?debug=overflow`).
	pub debug_overflow: bool,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			log_level: Level::Debug,
			debug_overflow: false,
		}
	}
}

impl AppConfig {
	/// Parse a `?key=value&...` query string. Unknown keys and bad values are ignored.
	pub fn from_query(query: &str) -> Self {
		let mut config = Self::default();
		for pair in query.trim_start_matches('?').split('&') {
			let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
			match key {
				"debug" => config.debug_overflow = value == "overflow",
				"log" => {
					if let Ok(level) = value.parse::<Level>() {
						config.log_level = level;
					}
				}
				_ => {}
			}
		}
		config
	}

	/// Read the configuration from `window.location.search`, falling back to defaults off-browser.
	pub fn from_location() -> Self {
		web_sys::window()
			.and_then(|w| w.location().search().ok())
			.map(|q| Self::from_query(&q))
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_overrides_defaults() {
		let config = AppConfig::from_query("?debug=overflow&log=warn");
		assert!(config.debug_overflow);
		assert_eq!(config.log_level, Level::Warn);
	}

	#[test]
	fn bad_values_fall_back() {
		let config = AppConfig::from_query("?log=loud&debug=&other=1");
		assert_eq!(config, AppConfig::default());
	}
}
