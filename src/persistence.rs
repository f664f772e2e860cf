//! Storage slots and the graph persistence adapter.
//!
//! Nothing in here reports failure to its caller: the app keeps working on in-memory state
//! when the browser refuses to store anything.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use serde_json::Value;
use wasm_bindgen::JsValue;

use crate::graph::StorageError;
use crate::graph::serialize::parse_snapshot;

/// A synchronous string key-value store.
pub trait StorageSlot {
	/// Read `key`. `Ok(None)` when the key is absent.
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
	/// Write `key`.
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

fn js_message(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
	fn storage(&self) -> Result<web_sys::Storage, StorageError> {
		let window =
			web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
		window
			.local_storage()
			.map_err(|e| StorageError::Unavailable(js_message(&e)))?
			.ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
	}
}

impl StorageSlot for BrowserStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		self.storage()?
			.get_item(key)
			.map_err(|e| StorageError::Read {
				key: key.into(),
				reason: js_message(&e),
			})
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.storage()?
			.set_item(key, value)
			.map_err(|e| StorageError::Write {
				key: key.into(),
				reason: js_message(&e),
			})
	}
}

#[derive(Debug, Default)]
struct MemoryInner {
	entries: HashMap<String, String>,
	writes: usize,
	fail_writes: bool,
}

/// In-process storage. Clones share the same entries, like two handles on one browser profile.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
	/// Empty storage.
	pub fn new() -> Self {
		Self::default()
	}

	/// Make every subsequent write fail, as a full quota would.
	pub fn fail_writes(&self, fail: bool) {
		self.inner.borrow_mut().fail_writes = fail;
	}

	/// Number of successful writes so far.
	pub fn writes(&self) -> usize {
		self.inner.borrow().writes
	}
}

impl StorageSlot for MemoryStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.inner.borrow().entries.get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		let mut inner = self.inner.borrow_mut();
		if inner.fail_writes {
			return Err(StorageError::Write {
				key: key.into(),
				reason: "quota exceeded".into(),
			});
		}
		inner.entries.insert(key.into(), value.into());
		inner.writes += 1;
		Ok(())
	}
}

/// Where the graph store keeps its snapshot.
pub trait PersistenceAdapter {
	/// The stored snapshot, or `None` when the slot is empty, unreadable, or corrupt.
	fn load(&self) -> Option<Value>;
	/// Store a snapshot. Failures are logged and dropped.
	fn save(&self, snapshot: &Value);
}

/// A [`PersistenceAdapter`] over one key of a [`StorageSlot`], holding JSON text.
#[derive(Clone, Debug)]
pub struct SlotAdapter<S> {
	storage: S,
	key: String,
}

impl<S: StorageSlot> SlotAdapter<S> {
	/// Adapter for `key` in `storage`.
	pub fn new(storage: S, key: impl Into<String>) -> Self {
		Self {
			storage,
			key: key.into(),
		}
	}
}

impl<S: StorageSlot> PersistenceAdapter for SlotAdapter<S> {
	fn load(&self) -> Option<Value> {
		let text = match self.storage.get(&self.key) {
			Ok(Some(text)) => text,
			Ok(None) => return None,
			Err(err) => {
				warn!("csmatrix: failed to read `{}`: {err}", self.key);
				return None;
			}
		};
		parse_snapshot(&text)
			.map_err(|err| warn!("csmatrix: ignoring stored `{}`: {err}", self.key))
			.ok()
	}

	fn save(&self, snapshot: &Value) {
		if let Err(err) = self.storage.set(&self.key, &snapshot.to_string()) {
			warn!("csmatrix: failed to persist `{}`: {err}", self.key);
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn missing_and_corrupt_slots_load_as_none() {
		let storage = MemoryStorage::new();
		let adapter = SlotAdapter::new(storage.clone(), "csmatrix.graph");
		assert_eq!(adapter.load(), None);
		storage.set("csmatrix.graph", "{not json").unwrap();
		assert_eq!(adapter.load(), None);
		storage.set("csmatrix.graph", "42").unwrap();
		assert_eq!(adapter.load(), None);
	}

	#[test]
	fn failed_writes_are_swallowed() {
		let storage = MemoryStorage::new();
		let adapter = SlotAdapter::new(storage.clone(), "k");
		storage.fail_writes(true);
		adapter.save(&json!({"nodes": []}));
		assert_eq!(storage.writes(), 0);
		assert_eq!(adapter.load(), None);

		storage.fail_writes(false);
		adapter.save(&json!({"nodes": []}));
		assert_eq!(adapter.load(), Some(json!({"nodes": []})));
	}
}
