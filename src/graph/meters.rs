use log::debug;
use serde_json::{Map, Value, json};

use super::types::{GlobalMeters, MeterKey};
use crate::persistence::PersistenceAdapter;

/// Reads and writes `meta.globalMeters` straight in the stored graph snapshot.
///
/// Used by widgets that live outside the editor. Only the meter keys are touched; nodes, edges,
/// and every other meta key are written back exactly as they were read.
pub struct MeterBridge {
	persistence: Box<dyn PersistenceAdapter>,
}

impl MeterBridge {
	/// Bridge over the graph slot behind `persistence`.
	pub fn new(persistence: Box<dyn PersistenceAdapter>) -> Self {
		Self { persistence }
	}

	/// Current meters, clamped. Meters missing from a stored block read as 0; with no block at
	/// all the fallback values are returned.
	pub fn read_meters(&self) -> GlobalMeters {
		let snapshot = self.persistence.load();
		let block = snapshot
			.as_ref()
			.and_then(|s| s.get("meta"))
			.and_then(|m| m.get("globalMeters"))
			.and_then(Value::as_object);
		match block {
			Some(block) => {
				let mut meters = GlobalMeters::default();
				meters.merge(block);
				meters
			}
			None => GlobalMeters::fallback(),
		}
	}

	/// Merge the four meter values into the stored snapshot, creating it if needed.
	pub fn write_meters(&self, meters: &GlobalMeters) {
		let mut root = match self.persistence.load() {
			Some(Value::Object(root)) => root,
			_ => Map::new(),
		};
		for key in ["nodes", "edges"] {
			if !root.contains_key(key) {
				root.insert(key.into(), json!([]));
			}
		}

		let mut meta = match root.get("meta") {
			Some(Value::Object(meta)) => meta.clone(),
			_ => Map::new(),
		};
		let mut block = match meta.get("globalMeters") {
			Some(Value::Object(block)) => block.clone(),
			_ => Map::new(),
		};
		for key in MeterKey::ALL {
			block.insert(key.as_str().into(), json!(meters.get(key)));
		}
		meta.insert("globalMeters".into(), Value::Object(block));
		root.insert("meta".into(), Value::Object(meta));

		self.persistence.save(&Value::Object(root));
	}

	/// Add `delta` to one meter. Skips the write when the clamped value does not change.
	/// Returns the resulting value.
	pub fn change(&self, key: MeterKey, delta: i64) -> u8 {
		let mut meters = self.read_meters();
		let current = meters.get(key);
		let next = meters.set(key, (current as i64).saturating_add(delta));
		if next == current {
			debug!("chud-meters: {} already at {current}", key.as_str());
			return next;
		}
		self.write_meters(&meters);
		next
	}
}
