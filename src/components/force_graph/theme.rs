//! Visual theming for the topology canvas.
//!
//! Node and link colors come from the data; the theme only decides how they
//! are painted and what surrounds them.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Hex when opaque, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB`, `#RGB` or `rgb()`/`rgba()` notation.
	/// Anything else becomes mid gray.
	pub fn parse_css(value: &str) -> Self {
		const FALLBACK: Color = Color::rgb(128, 128, 128);
		let value = value.trim();

		if let Some(hex) = value.strip_prefix('#') {
			let channel = |s: &str| u8::from_str_radix(s, 16).ok();
			let parsed = match hex.len() {
				6 if hex.is_ascii() => (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
				3 if hex.is_ascii() => {
					let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
					(short(0), short(1), short(2))
				}
				_ => (None, None, None),
			};
			return match parsed {
				(Some(r), Some(g), Some(b)) => Color::rgb(r, g, b),
				_ => FALLBACK,
			};
		}

		if value.starts_with("rgb") {
			let nums: Vec<&str> = value
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			let r = nums.first().and_then(|s| s.parse().ok()).unwrap_or(128);
			let g = nums.get(1).and_then(|s| s.parse().ok()).unwrap_or(128);
			let b = nums.get(2).and_then(|s| s.parse().ok()).unwrap_or(128);
			let a = nums.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);
			return Color::rgba(r, g, b, a);
		}

		FALLBACK
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the center of the radial gradient
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
}

/// Link visual style. Hue comes from each link's assigned color.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base link opacity
	pub alpha: f64,
	/// Opacity of links touching the hovered node
	pub hover_alpha: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width in screen pixels (0 = no border)
	pub border_width: f64,
	/// Border color
	pub border_color: Color,
	/// Hover ring color
	pub ring_color: Color,
	/// Tooltip text color
	pub label_color: Color,
	/// Tooltip background
	pub label_background: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Name used to select the theme from config.
	pub name: &'static str,
	/// Canvas backdrop.
	pub background: BackgroundStyle,
	/// Link opacity.
	pub edge: EdgeStyle,
	/// Node fill, border and tooltip.
	pub node: NodeStyle,
}

impl Theme {
	/// Clean modern theme (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			edge: EdgeStyle {
				alpha: 0.45,
				hover_alpha: 0.95,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				ring_color: Color::rgba(255, 255, 255, 0.8),
				label_color: Color::rgba(255, 255, 255, 0.95),
				label_background: Color::rgba(10, 12, 16, 0.75),
			},
		}
	}

	/// Darker backdrop with thin node outlines
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
			},
			edge: EdgeStyle {
				alpha: 0.35,
				hover_alpha: 0.9,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 1.0,
				border_color: Color::rgba(200, 210, 230, 0.35),
				ring_color: Color::rgba(180, 200, 255, 0.85),
				label_color: Color::rgba(230, 235, 255, 0.95),
				label_background: Color::rgba(8, 10, 18, 0.8),
			},
		}
	}

	/// Flat fills on a deep blue backdrop
	pub fn deep_sea() -> Self {
		Self {
			name: "deep_sea",
			background: BackgroundStyle {
				color: Color::rgb(15, 25, 35),
				color_secondary: Color::rgb(15, 25, 35),
				use_gradient: false,
			},
			edge: EdgeStyle {
				alpha: 0.5,
				hover_alpha: 1.0,
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				ring_color: Color::rgba(160, 220, 255, 0.8),
				label_color: Color::rgba(225, 240, 250, 0.95),
				label_background: Color::rgba(5, 12, 20, 0.8),
			},
		}
	}

	/// Look up a theme by name, falling back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			"deep_sea" => Self::deep_sea(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_css_notations() {
		assert_eq!(Color::parse_css("#ff8000"), Color::rgb(255, 128, 0));
		assert_eq!(Color::parse_css("#f80"), Color::rgb(255, 136, 0));
		assert_eq!(
			Color::parse_css("rgba(1, 2, 3, 0.5)"),
			Color::rgba(1, 2, 3, 0.5)
		);
		assert_eq!(Color::parse_css("teal"), Color::rgb(128, 128, 128));
		assert_eq!(Color::parse_css("#zzzzzz"), Color::rgb(128, 128, 128));
	}

	#[test]
	fn css_output_drops_opaque_alpha() {
		assert_eq!(Color::rgb(128, 128, 128).to_css(), "#808080");
		assert_eq!(
			Color::rgb(1, 2, 3).with_alpha(0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}

	#[test]
	fn unknown_theme_falls_back_to_default() {
		assert_eq!(Theme::by_name("midnight").name, "midnight");
		assert_eq!(Theme::by_name("nope").name, "default");
	}
}
