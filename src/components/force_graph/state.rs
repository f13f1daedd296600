use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use crate::controller::ViewCommand;
use crate::graph::{GraphSnapshot, NodeId};

const DEFAULT_FILL: &str = "#7c3aed";
const DEFAULT_BORDER: &str = "#6c2aed";
const DEFAULT_FONT: &str = "#ffffff";
const DEFAULT_EDGE: &str = "#9ca3ff";

pub const DEFAULT_NODE_SIZE: f64 = 12.0;
/// World-space slack added to a node's radius for hit testing.
pub const HIT_SLACK: f64 = 6.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

const STABILIZE_STEPS: usize = 300;
const STEP: f32 = 0.016;
const FIT_PADDING: f64 = 40.0;
const FOCUS_DURATION_MS: f64 = 800.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: String,
	pub title: Option<String>,
	pub fill: String,
	pub border: String,
	pub font: String,
	pub radius: f64,
}

#[derive(Clone, Debug)]
pub struct EdgeVisual {
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub label: Option<String>,
	pub color: String,
	pub width: f64,
	pub arrow: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	fn lerp(self, to: ViewTransform, t: f64) -> ViewTransform {
		ViewTransform {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

#[derive(Clone, Debug)]
struct CameraTween {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

fn ease_in_out_quad(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

pub struct GraphCanvasState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeVisual>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub selected: HashSet<DefaultNodeIdx>,
	pub pending: Option<DefaultNodeIdx>,
	ids: HashMap<NodeId, DefaultNodeIdx>,
	selected_ids: Vec<NodeId>,
	pending_id: Option<NodeId>,
	camera: Option<CameraTween>,
	revision: Option<u64>,
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

impl GraphCanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: simulation(),
			edges: Vec::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			selected: HashSet::new(),
			pending: None,
			ids: HashMap::new(),
			selected_ids: Vec::new(),
			pending_id: None,
			camera: None,
			revision: None,
		}
	}

	/// Rebuilds the simulation from `snapshot`. Nodes that survive keep their
	/// position; new ones are laid out on a ring around the current centroid.
	pub fn sync(&mut self, snapshot: &GraphSnapshot) {
		if self.revision == Some(snapshot.revision) {
			return;
		}
		self.revision = Some(snapshot.revision);

		let mut previous: HashMap<NodeId, (f32, f32, bool)> = HashMap::new();
		let (mut sum_x, mut sum_y) = (0.0_f64, 0.0_f64);
		self.graph.visit_nodes(|node| {
			sum_x += node.x() as f64;
			sum_y += node.y() as f64;
			previous.insert(
				node.data.user_data.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});
		let (cx, cy) = if previous.is_empty() {
			(0.0, 0.0)
		} else {
			(sum_x / previous.len() as f64, sum_y / previous.len() as f64)
		};

		let mut graph = simulation();
		let mut ids = HashMap::with_capacity(snapshot.nodes.len());
		let fresh = snapshot.nodes.iter().filter(|n| !previous.contains_key(&n.id)).count().max(1);
		let ring = 50.0 + 30.0 * (fresh as f64).sqrt();
		let mut placed = 0;

		for node in &snapshot.nodes {
			let (x, y, is_anchor) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = placed as f64 * 2.0 * PI / fresh as f64;
				placed += 1;
				((cx + ring * angle.cos()) as f32, (cy + ring * angle.sin()) as f32, false)
			});
			let (fill, border) = node
				.color
				.as_ref()
				.map(|c| (c.background.clone(), c.border.clone()))
				.unwrap_or_else(|| (DEFAULT_FILL.into(), DEFAULT_BORDER.into()));
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					title: node.title.clone(),
					fill,
					border,
					font: node.font.as_ref().map_or_else(|| DEFAULT_FONT.into(), |f| f.color.clone()),
					radius: node.size.unwrap_or(DEFAULT_NODE_SIZE) / 2.0,
				},
			});
			ids.insert(node.id.clone(), idx);
		}

		let mut edges = Vec::with_capacity(snapshot.edges.len());
		for edge in &snapshot.edges {
			let (Some(&from), Some(&to)) = (ids.get(&edge.from), ids.get(&edge.to)) else {
				continue;
			};
			graph.add_edge(from, to, EdgeData::default());
			edges.push(EdgeVisual {
				from,
				to,
				label: edge.label.clone(),
				color: edge
					.color
					.as_ref()
					.map_or_else(|| DEFAULT_EDGE.into(), |c| c.color.clone()),
				width: edge.width.unwrap_or(1.5),
				arrow: edge.arrows.as_deref().is_some_and(|a| a.contains("to")),
			});
		}

		self.graph = graph;
		self.edges = edges;
		self.ids = ids;
		self.drag = DragState::default();
		self.hover = HoverState::default();
		self.resolve_marks();
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<NodeId> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	fn position_of(&self, id: &NodeId) -> Option<(f64, f64)> {
		let idx = *self.ids.get(id)?;
		let mut pos = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pos = Some((node.x() as f64, node.y() as f64));
			}
		});
		pos
	}

	/// Positions by index, for edge drawing.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64, f64)> {
		let mut out = HashMap::with_capacity(self.ids.len());
		self.graph.visit_nodes(|node| {
			out.insert(
				node.index(),
				(node.x() as f64, node.y() as f64, node.data.user_data.radius),
			);
		});
		out
	}

	pub fn set_pending(&mut self, pending: Option<NodeId>) {
		self.pending_id = pending;
		self.resolve_marks();
	}

	fn resolve_marks(&mut self) {
		self.pending = self.pending_id.as_ref().and_then(|id| self.ids.get(id).copied());
		self.selected = self
			.selected_ids
			.iter()
			.filter_map(|id| self.ids.get(id).copied())
			.collect();
	}

	pub fn apply(&mut self, command: &ViewCommand) {
		match command {
			ViewCommand::Stabilize => {
				for _ in 0..STABILIZE_STEPS {
					self.graph.update(STEP);
				}
			}
			ViewCommand::Fit { duration_ms } => {
				if let Some(target) = self.fit_transform() {
					self.animate_to(target, *duration_ms);
				}
			}
			ViewCommand::Focus { node, scale } => {
				if let Some((x, y)) = self.position_of(node) {
					let k = scale.clamp(MIN_ZOOM, MAX_ZOOM);
					let target = ViewTransform {
						x: self.width / 2.0 - x * k,
						y: self.height / 2.0 - y * k,
						k,
					};
					self.animate_to(target, FOCUS_DURATION_MS);
				}
			}
			ViewCommand::Select(nodes) => {
				self.selected_ids = nodes.clone();
				self.resolve_marks();
			}
		}
	}

	fn fit_transform(&self) -> Option<ViewTransform> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y, r) = (node.x() as f64, node.y() as f64, node.data.user_data.radius);
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		});
		let (x0, y0, x1, y1) = bounds?;
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		Some(ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		})
	}

	fn animate_to(&mut self, to: ViewTransform, duration_ms: f64) {
		if duration_ms <= 0.0 {
			self.transform = to;
			self.camera = None;
			return;
		}
		self.camera = Some(CameraTween {
			from: self.transform,
			to,
			elapsed: 0.0,
			duration: duration_ms / 1000.0,
		});
	}

	/// User interaction takes the camera back.
	pub fn cancel_camera(&mut self) {
		self.camera = None;
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLACK {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the previous neighbourhood around while it fades out.
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.from == idx {
					self.hover.neighbors.insert(edge.to);
				} else if edge.to == idx {
					self.hover.neighbors.insert(edge.from);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		if let Some(tween) = self.camera.as_mut() {
			tween.elapsed += dt as f64;
			let t = (tween.elapsed / tween.duration).min(1.0);
			self.transform = tween.from.lerp(tween.to, ease_in_out_quad(t));
			if t >= 1.0 {
				self.camera = None;
			}
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{GraphStore, NodeId};

	fn snapshot() -> (GraphStore, GraphSnapshot) {
		let mut store = GraphStore::default();
		let a = store.add_node("A");
		let b = store.add_node("B");
		store.add_edge(a, b).unwrap();
		let snap = store.snapshot();
		(store, snap)
	}

	#[test]
	fn sync_keeps_positions_of_surviving_nodes() {
		let (mut store, snap) = snapshot();
		let mut state = GraphCanvasState::new(800.0, 600.0);
		state.sync(&snap);
		let before = state.position_of(&NodeId::from("n1")).unwrap();

		store.add_node("C");
		state.sync(&store.snapshot());
		assert_eq!(state.position_of(&NodeId::from("n1")), Some(before));
		assert_eq!(state.edges.len(), 1);
		assert!(state.position_of(&NodeId::from("n3")).is_some());
	}

	#[test]
	fn focus_centres_the_node() {
		let (_, snap) = snapshot();
		let mut state = GraphCanvasState::new(800.0, 600.0);
		state.sync(&snap);
		let (x, y) = state.position_of(&NodeId::from("n2")).unwrap();

		state.apply(&ViewCommand::Focus {
			node: NodeId::from("n2"),
			scale: 1.6,
		});
		let target = state.camera.as_ref().unwrap().to;

		assert!((target.k - 1.6).abs() < 1e-9);
		let (sx, sy) = (x * 1.6 + target.x, y * 1.6 + target.y);
		assert!((sx - 400.0).abs() < 1e-6 && (sy - 300.0).abs() < 1e-6);
	}

	#[test]
	fn marks_follow_ids_across_syncs() {
		let (mut store, snap) = snapshot();
		let mut state = GraphCanvasState::new(800.0, 600.0);
		state.sync(&snap);
		state.set_pending(Some(NodeId::from("n1")));
		state.apply(&ViewCommand::Select(vec![NodeId::from("n2")]));
		assert!(state.pending.is_some());
		assert_eq!(state.selected.len(), 1);

		store.clear();
		state.sync(&store.snapshot());
		assert!(state.pending.is_none());
		assert!(state.selected.is_empty());
	}

	#[test]
	fn easing_hits_both_ends() {
		assert_eq!(ease_in_out_quad(0.0), 0.0);
		assert_eq!(ease_in_out_quad(1.0), 1.0);
		assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-12);
	}
}
