//! Zoom-dependent scaling for node discs, hit areas, and link widths.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the simulation's coordinate system. Drawn after the canvas
//!   transform, so it grows when zoomed in.
//! - **Screen-space**: canvas pixels, unaffected by zoom.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	/// How the node radius scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius, in the units `hit_behavior` implies.
	pub hit_radius: f64,
	/// How hit radius scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Tooltip font size in screen pixels.
	pub label_size: f64,
}

/// Configuration for link widths. Width grows with the log of capacity.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Width of the lowest-capacity link, in screen pixels.
	pub min_width: f64,
	/// Width of the highest-capacity link, in screen pixels.
	pub max_width: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node disc and hit area sizing.
	pub node: NodeScaleConfig,
	/// Link width range.
	pub edge: EdgeScaleConfig,
	/// Hover ring stroke width in screen pixels.
	pub ring_width: f64,
	/// Hover ring offset from the node edge in screen pixels.
	pub ring_offset: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 5.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 3.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 10.0,
				hit_behavior: ScaleBehavior::Screen,
				label_size: 12.0,
			},
			edge: EdgeScaleConfig {
				min_width: 0.5,
				max_width: 4.0,
			},
			ring_width: 1.5,
			ring_offset: 2.0,
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// Node radius in world-space.
	pub node_radius: f64,
	/// Hit detection radius in world-space.
	pub hit_radius: f64,
	/// Tooltip font (screen-space, drawn untransformed).
	pub label_font: String,
	/// Ring width in world-space.
	pub ring_width: f64,
	/// Ring offset in world-space.
	pub ring_offset: f64,
	min_link_width: f64,
	max_link_width: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_font: format!("{}px sans-serif", config.node.label_size),
			ring_width: config.ring_width / k,
			ring_offset: config.ring_offset / k,
			min_link_width: config.edge.min_width,
			max_link_width: config.edge.max_width,
		}
	}

	/// World-space width of a link with `capacity`, relative to the largest
	/// capacity in view.
	pub fn link_width(&self, capacity: u64, max_capacity: u64) -> f64 {
		let t = if max_capacity <= 1 {
			0.0
		} else {
			((capacity.max(1) as f64).ln() / (max_capacity as f64).ln()).clamp(0.0, 1.0)
		};
		(self.min_link_width + (self.max_link_width - self.min_link_width) * t) / self.k
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_radius_keeps_minimum_screen_size() {
		let config = ScaleConfig::default();
		let far = ScaledValues::new(&config, 0.1);
		assert!((far.node_radius * 0.1 - 3.0).abs() < 1e-9);

		let near = ScaledValues::new(&config, 4.0);
		assert_eq!(near.node_radius, 5.0);
	}

	#[test]
	fn hit_area_is_constant_on_screen() {
		let config = ScaleConfig::default();
		for k in [0.05, 1.0, 8.0] {
			let scale = ScaledValues::new(&config, k);
			assert!((scale.hit_radius * k - 10.0).abs() < 1e-9);
		}
	}

	#[test]
	fn link_width_grows_with_capacity() {
		let scale = ScaledValues::new(&ScaleConfig::default(), 1.0);
		let thin = scale.link_width(10, 1_000_000);
		let thick = scale.link_width(1_000_000, 1_000_000);

		assert!(thin < thick);
		assert_eq!(thick, 4.0);
		assert_eq!(scale.link_width(0, 0), 0.5);
	}
}
