//! Canvas rendering for the topology view.
//!
//! Passes, back to front:
//! 1. Background (screen space)
//! 2. Links, with hovered-node links drawn last (world space)
//! 3. Nodes as regular polygons with `node_resolution` sides (world space)
//! 4. Hover ring (world space) and tooltip (screen space)

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, LinkLine, NodeInfo};
use super::theme::{Color, Theme};

/// Renders the complete view to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);
	let positions = state.positions();

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx, &scale, theme, &positions);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if let Some(idx) = state.hovered {
		draw_tooltip(state, ctx, &scale, theme, idx);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = if theme.background.use_gradient {
		ctx.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			0.0,
			state.width / 2.0,
			state.height / 2.0,
			(state.width.max(state.height)) * 0.8,
		)
		.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	let touches_hover =
		|link: &LinkLine| state.hovered.is_some_and(|h| link.source == h || link.target == h);

	for link in state.links.iter().filter(|&l| !touches_hover(l)) {
		draw_link(state, ctx, scale, positions, link, theme.edge.alpha);
	}
	for link in state.links.iter().filter(|&l| touches_hover(l)) {
		draw_link(state, ctx, scale, positions, link, theme.edge.hover_alpha);
	}
}

fn draw_link(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	link: &LinkLine,
	alpha: f64,
) {
	let (Some(&(x1, y1)), Some(&(x2, y2))) =
		(positions.get(&link.source), positions.get(&link.target))
	else {
		return;
	};

	let color = Color::parse_css(&link.color);
	ctx.set_stroke_style_str(&color.with_alpha(color.a * alpha).to_css());
	ctx.set_line_width(scale.link_width(link.capacity, state.max_capacity));
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let sides = state.tuning.node_resolution.max(3);

	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let radius = scale.node_radius * info.size;
		draw_node(ctx, scale, theme, info, x, y, radius, sides);

		if state.hovered == Some(node.index()) {
			polygon_path(ctx, x, y, radius + scale.ring_offset, sides.max(16));
			ctx.set_stroke_style_str(&theme.node.ring_color.to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}
	});
}

/// Traces a regular polygon approximating a circle.
fn polygon_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, sides: u32) {
	ctx.begin_path();
	for i in 0..sides {
		let angle = (i as f64) * 2.0 * PI / sides as f64 - PI / 2.0;
		let (px, py) = (x + radius * angle.cos(), y + radius * angle.sin());
		if i == 0 {
			ctx.move_to(px, py);
		} else {
			ctx.line_to(px, py);
		}
	}
	ctx.close_path();
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	info: &NodeInfo,
	x: f64,
	y: f64,
	radius: f64,
	sides: u32,
) {
	polygon_path(ctx, x, y, radius, sides);

	let gradient = if theme.node.use_gradient {
		ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			.ok()
	} else {
		None
	};

	match gradient {
		Some(gradient) => {
			let base = Color::parse_css(&info.color);
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&info.color),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}
}

/// Name label next to the hovered node, drawn in screen space so it stays
/// readable at any zoom.
fn draw_tooltip(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	idx: DefaultNodeIdx,
) {
	let mut anchor = None;
	state.graph.visit_nodes(|node| {
		if node.index() == idx {
			let radius = scale.node_radius * node.data.user_data.size;
			anchor = Some((
				node.x() as f64 + radius,
				node.y() as f64,
				node.data.user_data.label.clone(),
			));
		}
	});
	let Some((gx, gy, label)) = anchor else {
		return;
	};

	let (sx, sy) = state.graph_to_screen(gx, gy);
	let (x, y) = (sx + 8.0, sy - 8.0);

	ctx.set_font(&scale.label_font);
	let text_width = ctx
		.measure_text(&label)
		.map(|m| m.width())
		.unwrap_or(label.len() as f64 * 7.0);
	let height = 18.0;

	ctx.set_fill_style_str(&theme.node.label_background.to_css());
	ctx.fill_rect(x - 4.0, y - height + 4.0, text_width + 8.0, height);
	ctx.set_fill_style_str(&theme.node.label_color.to_css());
	let _ = ctx.fill_text(&label, x, y);
}
