use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::config::{MAX_METER, NODE_PALETTE};

/// Identity of a node, unique for the lifetime of its graph instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Identity of an edge, drawn from the same counter as node ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "n{}", self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "e{}", self.0)
	}
}

/// A point on the logical grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Store-assigned identity.
	pub id: NodeId,
	/// Display label.
	pub name: String,
	/// Logical grid x.
	pub gx: f64,
	/// Logical grid y (grows upwards).
	pub gy: f64,
	/// Fill color, usually `#rrggbb`.
	pub color: String,
}

impl Node {
	/// Build a node, filling in the default name and color and zeroing non-finite coordinates.
	/// This is the only place node defaults are decided.
	pub(crate) fn normalized(
		id: NodeId,
		name: Option<String>,
		gx: f64,
		gy: f64,
		color: Option<String>,
	) -> Self {
		let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
		Self {
			id,
			name: name.unwrap_or_else(|| format!("Node {}", id.0)),
			gx: finite(gx),
			gy: finite(gy),
			color: color.unwrap_or_else(|| default_color(id).to_string()),
		}
	}
}

/// Palette color for a node that was created without one.
pub fn default_color(id: NodeId) -> &'static str {
	NODE_PALETTE[(id.0 as usize) % NODE_PALETTE.len()]
}

/// Attributes accepted by [`Graph::add_node`](super::Graph::add_node).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeAttrs {
	/// Label; defaults to `Node <id>`.
	pub name: Option<String>,
	/// Logical grid x.
	pub gx: f64,
	/// Logical grid y.
	pub gy: f64,
	/// Fill color; defaults to a palette entry.
	pub color: Option<String>,
}

impl NodeAttrs {
	/// Unnamed, default-colored node at `(gx, gy)`.
	pub fn at(gx: f64, gy: f64) -> Self {
		Self {
			gx,
			gy,
			..Self::default()
		}
	}

	/// Set the label.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Set the color.
	pub fn colored(mut self, color: impl Into<String>) -> Self {
		self.color = Some(color.into());
		self
	}
}

/// Fields to overwrite on an existing node; `None` leaves the field alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
	/// New label.
	pub name: Option<String>,
	/// New grid x.
	pub gx: Option<f64>,
	/// New grid y.
	pub gy: Option<f64>,
	/// New color.
	pub color: Option<String>,
}

/// A relation between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Store-assigned identity.
	pub id: EdgeId,
	/// Source node.
	pub from: NodeId,
	/// Target node.
	pub to: NodeId,
	/// Optional label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Optional weight.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weight: Option<f64>,
	/// Optional stroke color.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

/// Attributes accepted by [`Graph::add_edge`](super::Graph::add_edge).
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
	/// Source node.
	pub from: NodeId,
	/// Target node.
	pub to: NodeId,
	/// Optional label.
	pub label: Option<String>,
	/// Optional weight.
	pub weight: Option<f64>,
	/// Optional stroke color.
	pub color: Option<String>,
}

impl EdgeAttrs {
	/// Unstyled edge from `from` to `to`.
	pub fn between(from: NodeId, to: NodeId) -> Self {
		Self {
			from,
			to,
			label: None,
			weight: None,
			color: None,
		}
	}
}

/// The four global game-state meters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeterKey {
	/// `grit`
	Grit,
	/// `collapse`
	Collapse,
	/// `record`
	Record,
	/// `influence`
	Influence,
}

impl MeterKey {
	/// Display order used by the meter widgets.
	pub const ALL: [MeterKey; 4] = [
		MeterKey::Grit,
		MeterKey::Collapse,
		MeterKey::Record,
		MeterKey::Influence,
	];

	/// Key used inside `meta.globalMeters`.
	pub fn as_str(self) -> &'static str {
		match self {
			MeterKey::Grit => "grit",
			MeterKey::Collapse => "collapse",
			MeterKey::Record => "record",
			MeterKey::Influence => "influence",
		}
	}

	/// Human readable label.
	pub fn label(self) -> &'static str {
		match self {
			MeterKey::Grit => "Grit",
			MeterKey::Collapse => "Collapse",
			MeterKey::Record => "Record",
			MeterKey::Influence => "Influence",
		}
	}

	/// Fill color of the meter bar.
	pub fn accent(self) -> &'static str {
		match self {
			MeterKey::Grit => "#f2d06b",
			MeterKey::Collapse => "#ff6b9a",
			MeterKey::Record => "#6ac7ff",
			MeterKey::Influence => "#63ffb1",
		}
	}
}

/// Clamp any integer into `[0, MAX_METER]`.
pub fn clamp_meter(value: i64) -> u8 {
	value.clamp(0, MAX_METER as i64) as u8
}

/// Read a stored meter value defensively: numbers are rounded then clamped, numeric strings
/// are parsed, anything else reads as 0.
pub fn meter_from_value(value: &Value) -> u8 {
	let raw = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	match raw {
		Some(v) if v.is_finite() => clamp_meter(v.round() as i64),
		_ => 0,
	}
}

fn de_meter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
	Value::deserialize(deserializer).map(|v| meter_from_value(&v))
}

/// `meta.globalMeters`. Keys other than the four meters are carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalMeters {
	/// Grit.
	#[serde(default, deserialize_with = "de_meter")]
	pub grit: u8,
	/// Collapse.
	#[serde(default, deserialize_with = "de_meter")]
	pub collapse: u8,
	/// Record.
	#[serde(default, deserialize_with = "de_meter")]
	pub record: u8,
	/// Influence.
	#[serde(default, deserialize_with = "de_meter")]
	pub influence: u8,
	/// Keys written by other versions or widgets.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GlobalMeters {
	/// Values shown when no graph has stored any meters yet.
	pub fn fallback() -> Self {
		Self {
			grit: 0,
			collapse: 0,
			record: 1,
			influence: 2,
			extra: Map::new(),
		}
	}

	/// Current value of `key`.
	pub fn get(&self, key: MeterKey) -> u8 {
		match key {
			MeterKey::Grit => self.grit,
			MeterKey::Collapse => self.collapse,
			MeterKey::Record => self.record,
			MeterKey::Influence => self.influence,
		}
	}

	/// Set `key`, clamping into range. Returns the stored value.
	pub fn set(&mut self, key: MeterKey, value: i64) -> u8 {
		let value = clamp_meter(value);
		let slot = match key {
			MeterKey::Grit => &mut self.grit,
			MeterKey::Collapse => &mut self.collapse,
			MeterKey::Record => &mut self.record,
			MeterKey::Influence => &mut self.influence,
		};
		*slot = value;
		value
	}

	/// Field-wise merge of a JSON object into these meters. Known keys are clamped,
	/// unknown keys are kept verbatim.
	pub fn merge(&mut self, patch: &Map<String, Value>) {
		for (k, v) in patch {
			match MeterKey::ALL.iter().find(|m| m.as_str() == k) {
				Some(&key) => {
					self.set(key, meter_from_value(v) as i64);
				}
				None => {
					self.extra.insert(k.clone(), v.clone());
				}
			}
		}
	}
}

fn de_global_meters<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Option<GlobalMeters>, D::Error> {
	let value = Value::deserialize(deserializer)?;
	Ok(match value {
		Value::Object(map) => {
			let mut meters = GlobalMeters::default();
			meters.merge(&map);
			Some(meters)
		}
		Value::Null => None,
		other => {
			log::warn!("csmatrix: ignoring non-object globalMeters ({other})");
			None
		}
	})
}

/// Free-form graph metadata. Only `globalMeters` is interpreted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
	/// Shared meter values read by the meter widgets.
	#[serde(
		rename = "globalMeters",
		default,
		deserialize_with = "de_global_meters",
		skip_serializing_if = "Option::is_none"
	)]
	pub global_meters: Option<GlobalMeters>,
	/// Every other key, preserved across load and save.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Meta {
	/// Shallow merge: top-level keys replace, except `globalMeters`, which merges field-wise.
	pub fn merge(&mut self, patch: Map<String, Value>) {
		for (k, v) in patch {
			if k == "globalMeters" {
				if let Value::Object(fields) = &v {
					self.global_meters
						.get_or_insert_with(GlobalMeters::default)
						.merge(fields);
				} else {
					log::warn!("csmatrix: ignoring non-object globalMeters patch");
				}
			} else {
				self.extra.insert(k, v);
			}
		}
	}
}
