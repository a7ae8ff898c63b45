//! Viewer configuration embedded in the host page.

use serde::Deserialize;

use crate::topology::Threshold;

/// Settings read from `<script id="viewer-config" type="application/json">`.
///
/// Every field is optional; a missing or unparsable block yields the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
	/// Degree a node needs to be shown while filtering. Negative values mean
	/// "show all".
	pub default_threshold: Threshold,
	/// Theme name, see [`Theme::by_name`](crate::components::force_graph::Theme::by_name).
	pub theme: String,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			default_threshold: Threshold::DEFAULT,
			theme: "default".to_string(),
		}
	}
}

impl ViewerConfig {
	/// Parse a config block, falling back to defaults for missing fields.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}
