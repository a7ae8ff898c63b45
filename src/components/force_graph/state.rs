//! Simulation state for the currently visible part of the topology.
//!
//! Wraps the `force_graph` physics simulation with per-node display metadata,
//! view transforms for pan/zoom, and drag/hover tracking. The simulation is
//! rebuilt from scratch on every [`ForceGraphState::sync`]; positions and pins
//! are carried over by node id so expanding a neighborhood does not scramble
//! the layout.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale::{ScaleConfig, ScaledValues};
use crate::topology::{PrunedView, RenderTuning};

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: String,
	/// Size multiplier (1.0 = normal, grows with degree inside the view)
	pub size: f64,
}

/// A link as drawn: endpoints in the simulation plus its data-driven style.
#[derive(Clone, Debug)]
pub struct LinkLine {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: String,
	pub capacity: u64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.05..10.0).
	pub k: f64,
}

/// Tracks a press on a node, which becomes either a click or a drag.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// Set once the pointer travels past the click tolerance.
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer travel (screen pixels) below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

#[derive(Clone, Copy)]
struct Placement {
	x: f32,
	y: f32,
	pinned: bool,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

/// Deterministic offset in `[-1, 1]²` for an id, used to spread new nodes
/// around an already placed neighbor.
fn jitter(id: &str) -> (f32, f32) {
	let hash = id
		.bytes()
		.fold(0x811c_9dc5u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
	let x = (hash & 0xffff) as f32 / 65535.0;
	let y = (hash >> 16) as f32 / 65535.0;
	(x * 2.0 - 1.0, y * 2.0 - 1.0)
}

/// Renderer-side state: simulation, camera, and pointer interaction.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub links: Vec<LinkLine>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<DefaultNodeIdx>,
	pub tuning: RenderTuning,
	/// Largest capacity among visible links, for width scaling.
	pub max_capacity: u64,
	pub width: f64,
	pub height: f64,
	ticks_remaining: u32,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	idx_to_id: HashMap<DefaultNodeIdx, String>,
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64, tuning: RenderTuning) -> Self {
		Self {
			graph: simulation(),
			links: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			tuning,
			max_capacity: 0,
			width,
			height,
			ticks_remaining: tuning.cooldown_ticks,
			id_to_idx: HashMap::new(),
			idx_to_id: HashMap::new(),
		}
	}

	/// Replace the simulated graph with `view`.
	///
	/// Nodes that were already simulated keep their position and pin; new
	/// nodes are placed next to a visible neighbor when one exists, otherwise
	/// on a ring around the origin. Restarts the cooldown budget.
	pub fn sync(&mut self, view: &PrunedView, tuning: RenderTuning) {
		let mut previous: HashMap<String, Placement> = HashMap::with_capacity(view.nodes.len());
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.id.clone(),
				Placement {
					x: node.x(),
					y: node.y(),
					pinned: node.data.is_anchor,
				},
			);
		});
		let hovered_id = self.hovered.and_then(|idx| self.idx_to_id.get(&idx).cloned());

		let mut degree: HashMap<&str, usize> = HashMap::new();
		let mut neighbor: HashMap<&str, &str> = HashMap::new();
		for edge in &view.edges {
			*degree.entry(&edge.endpoint_a).or_insert(0) += 1;
			*degree.entry(&edge.endpoint_b).or_insert(0) += 1;
			neighbor.entry(&edge.endpoint_a).or_insert(&edge.endpoint_b);
			neighbor.entry(&edge.endpoint_b).or_insert(&edge.endpoint_a);
		}
		let max_degree = degree.values().copied().max().unwrap_or(1).max(1);

		let mut graph = simulation();
		let mut id_to_idx = HashMap::with_capacity(view.nodes.len());
		let mut idx_to_id = HashMap::with_capacity(view.nodes.len());
		let count = view.nodes.len().max(1) as f64;
		let ring = 40.0 + 4.0 * count.sqrt();

		for (i, node) in view.nodes.iter().enumerate() {
			let placement = previous.get(&node.id).copied().unwrap_or_else(|| {
				let anchor = neighbor
					.get(node.id.as_str())
					.and_then(|n| previous.get(*n));
				match anchor {
					Some(p) => {
						let (jx, jy) = jitter(&node.id);
						Placement {
							x: p.x + jx * 30.0,
							y: p.y + jy * 30.0,
							pinned: false,
						}
					}
					None => {
						let angle = (i as f64) * 2.0 * PI / count;
						Placement {
							x: (ring * angle.cos()) as f32,
							y: (ring * angle.sin()) as f32,
							pinned: false,
						}
					}
				}
			});

			let node_degree = degree.get(node.id.as_str()).copied().unwrap_or(0);
			let size = 0.8 + 0.9 * (node_degree as f64 / max_degree as f64).sqrt();

			let idx = graph.add_node(NodeData {
				x: placement.x,
				y: placement.y,
				mass: 10.0,
				is_anchor: placement.pinned,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.display_name.clone(),
					color: node.color.clone(),
					size,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			idx_to_id.insert(idx, node.id.clone());
		}

		let mut links = Vec::with_capacity(view.edges.len());
		for edge in &view.edges {
			if let (Some(&source), Some(&target)) =
				(id_to_idx.get(&edge.endpoint_a), id_to_idx.get(&edge.endpoint_b))
			{
				graph.add_edge(source, target, EdgeData::default());
				links.push(LinkLine {
					source,
					target,
					color: edge.color.clone(),
					capacity: edge.capacity,
				});
			}
		}

		self.max_capacity = links.iter().map(|l| l.capacity).max().unwrap_or(0);
		self.graph = graph;
		self.links = links;
		self.hovered = hovered_id.and_then(|id| id_to_idx.get(&id).copied());
		self.id_to_idx = id_to_idx;
		self.idx_to_id = idx_to_id;
		self.tuning = tuning;
		self.ticks_remaining = tuning.cooldown_ticks;
		self.drag = DragState::default();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	/// Closest node whose hit disc contains the screen point.
	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found: Option<(DefaultNodeIdx, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let distance = (dx * dx + dy * dy).sqrt();
			let hit_radius = scale.hit_radius * node.data.user_data.size;
			if distance < hit_radius && found.is_none_or(|(_, best)| distance < best) {
				found = Some((node.index(), distance));
			}
		});
		found.map(|(idx, _)| idx)
	}

	/// Topology id of a simulated node.
	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.idx_to_id.get(&idx).map(String::as_str)
	}

	/// Simulation positions keyed by node index, for one frame of drawing.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::with_capacity(self.id_to_idx.len());
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Move the dragged node to follow the pointer.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		if !self.drag.moved {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if (dx * dx + dy * dy).sqrt() < CLICK_TOLERANCE {
				return;
			}
			self.drag.moved = true;
		}

		let (nx, ny) = (
			self.drag.node_start_x + ((sx - self.drag.start_x) / self.transform.k) as f32,
			self.drag.node_start_y + ((sy - self.drag.start_y) / self.transform.k) as f32,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = nx;
				node.data.y = ny;
				node.data.is_anchor = true;
			}
		});
	}

	/// Fix the node at its current position so the simulation no longer moves
	/// it. Pins survive later syncs.
	pub fn pin(&mut self, idx: DefaultNodeIdx) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = true;
			}
		});
	}

	/// Recenter the camera and restore 100% zoom.
	pub fn reset_view(&mut self) {
		self.transform = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k: 1.0,
		};
	}

	/// Advance the simulation one step, unless the cooldown budget is spent.
	pub fn tick(&mut self, dt: f32) {
		if self.ticks_remaining == 0 {
			return;
		}
		self.graph.update(dt);
		self.ticks_remaining -= 1;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::topology::fixtures::raw;
	use crate::topology::{InteractionController, Threshold, TopologyGraph};

	fn view(threshold: Threshold) -> PrunedView {
		let mut graph = TopologyGraph::default();
		InteractionController::new(threshold)
			.load(
				&mut graph,
				&raw(
					&["hub", "s1", "s2", "s3", "p1", "p2"],
					&[
						("hub-s1", "hub", "s1"),
						("hub-s2", "hub", "s2"),
						("hub-s3", "hub", "s3"),
						("s1-p1", "s1", "p1"),
						("p1-p2", "p1", "p2"),
					],
				),
			)
			.unwrap()
	}

	fn tuning() -> RenderTuning {
		RenderTuning::for_node_count(6)
	}

	fn position(state: &ForceGraphState, id: &str) -> (f32, f32, bool) {
		let idx = state.id_to_idx[id];
		let mut found = None;
		state.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x(), node.y(), node.data.is_anchor));
			}
		});
		found.unwrap()
	}

	#[test]
	fn sync_keeps_pins_and_places_new_nodes_near_neighbors() {
		let mut state = ForceGraphState::new(800.0, 600.0, tuning());
		state.sync(&view(Threshold::new(2)), tuning());
		assert_eq!(state.links.len(), 2);

		let hub = state.id_to_idx["hub"];
		state.graph.visit_nodes_mut(|node| {
			if node.index() == hub {
				node.data.x = 500.0;
				node.data.y = -200.0;
			}
		});
		state.pin(hub);

		state.sync(&view(Threshold::SHOW_ALL), tuning());
		assert_eq!(state.links.len(), 5);
		assert_eq!(position(&state, "hub"), (500.0, -200.0, true));

		let (x, y, pinned) = position(&state, "s2");
		assert!(!pinned);
		assert!((x - 500.0).abs() <= 30.0 && (y + 200.0).abs() <= 30.0);
	}

	#[test]
	fn hover_follows_the_node_across_syncs() {
		let mut state = ForceGraphState::new(800.0, 600.0, tuning());
		state.sync(&view(Threshold::new(2)), tuning());
		state.hovered = Some(state.id_to_idx["s1"]);

		state.sync(&view(Threshold::SHOW_ALL), tuning());
		let hovered = state.hovered.and_then(|idx| state.node_id(idx));
		assert_eq!(hovered, Some("s1"));

		state.sync(&view(Threshold::new(3)), tuning());
		assert_eq!(state.hovered, None);
	}

	#[test]
	fn small_pointer_travel_is_not_a_drag() {
		let mut state = ForceGraphState::new(800.0, 600.0, tuning());
		state.sync(&view(Threshold::SHOW_ALL), tuning());
		let (x0, y0, _) = position(&state, "p2");

		state.drag = DragState {
			active: true,
			moved: false,
			node_idx: Some(state.id_to_idx["p2"]),
			start_x: 100.0,
			start_y: 100.0,
			node_start_x: x0,
			node_start_y: y0,
		};
		state.drag_to(102.0, 101.0);
		assert!(!state.drag.moved);
		assert_eq!(position(&state, "p2"), (x0, y0, false));

		state.drag_to(120.0, 100.0);
		assert!(state.drag.moved);
		let (x, y, pinned) = position(&state, "p2");
		assert_eq!((x, y), (x0 + 20.0, y0));
		assert!(pinned);
	}

	#[test]
	fn ticks_stop_after_cooldown_budget() {
		let budget = RenderTuning {
			cooldown_ticks: 3,
			node_resolution: 8,
		};
		let mut state = ForceGraphState::new(800.0, 600.0, budget);
		state.sync(&view(Threshold::SHOW_ALL), budget);
		for _ in 0..3 {
			state.tick(0.016);
		}
		assert_eq!(state.ticks_remaining, 0);

		let before = state.positions();
		state.tick(0.016);
		assert_eq!(state.positions(), before);

		state.sync(&view(Threshold::SHOW_ALL), budget);
		assert_eq!(state.ticks_remaining, 3);
	}

	#[test]
	fn node_lookup_uses_screen_coordinates() {
		let mut state = ForceGraphState::new(800.0, 600.0, tuning());
		state.sync(&view(Threshold::SHOW_ALL), tuning());
		state.transform.k = 2.0;

		let (gx, gy, _) = position(&state, "hub");
		let (sx, sy) = state.graph_to_screen(gx as f64, gy as f64);
		let hit = state.node_at_position(sx, sy, &ScaleConfig::default());
		assert_eq!(hit.and_then(|idx| state.node_id(idx)), Some("hub"));

		state.reset_view();
		assert_eq!((state.transform.x, state.transform.y, state.transform.k), (400.0, 300.0, 1.0));
	}
}
