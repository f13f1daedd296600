use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphCanvasState;

const BACKGROUND: &str = "#0f1024";
const SELECTED_RING: &str = "rgba(255, 255, 255, 0.9)";
const PENDING_RING: &str = "#fbbf24";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn dash(ctx: &CanvasRenderingContext2d, on: f64, off: f64) {
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(on),
		&JsValue::from_f64(off),
	));
}

fn solid(ctx: &CanvasRenderingContext2d) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash_len, gap, arrow_size) = (8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash_len + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let positions = state.positions();

	for edge in &state.edges {
		let (Some(&(x1, y1, r1)), Some(&(x2, y2, r2))) = (positions.get(&edge.from), positions.get(&edge.to)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted = state.is_highlighted(edge.from) && state.is_highlighted(edge.to);
		let (alpha, width) = if is_highlighted {
			(0.7 + 0.3 * t, edge.width / k * (1.0 + 0.3 * t))
		} else {
			(0.7 - 0.55 * t, edge.width / k * (1.0 - 0.3 * t))
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&edge.color);
		ctx.set_line_width(width);
		dash(ctx, dash_len, gap);
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		let head = if edge.arrow { arrow_size } else { 0.0 };
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + head), y2 - uy * (r2 + head));
		ctx.stroke();
		solid(ctx);

		if edge.arrow {
			ctx.set_fill_style_str(&edge.color);
			let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}

		if let Some(label) = &edge.label {
			ctx.set_fill_style_str("#e6eef8");
			ctx.set_font(&format!("{}px sans-serif", 9.0 / k.max(0.5)));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(label, (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 3.0 / k);
			ctx.set_text_align("start");
		}
		ctx.set_global_alpha(1.0);
	}
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	// Dimmed nodes first so the highlighted neighbourhood draws on top.
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = (1.0 - 0.7 * t, info.radius * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		disc(ctx, x, y, radius, &info.fill, &info.border, k);
		marks(state, ctx, idx, x, y, radius, k);
		label(ctx, &info.label, &info.font, x + radius + 3.0, y + 3.0, k);
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(info.radius * (1.0 + 0.35 * t), info.radius * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(info.radius * (1.0 + 0.2 * t), info.radius * (1.4 + 0.6 * t))
		} else {
			(info.radius, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		disc(ctx, x, y, radius, &info.fill, &info.border, k);
		marks(state, ctx, idx, x, y, radius, k);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		label(ctx, &info.label, &info.font, x + radius + 3.0, y + 3.0, k);
		if is_hovered && t > 0.01 {
			if let Some(title) = &info.title {
				ctx.set_global_alpha(t);
				label(ctx, title, "#c7d2fe", x + radius + 3.0, y + 3.0 + 12.0 / k.max(0.5), k);
				ctx.set_global_alpha(1.0);
			}
		}
	});
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, fill: &str, border: &str, k: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str(border);
	ctx.set_line_width(1.5 / k);
	ctx.stroke();
}

fn marks(
	state: &GraphCanvasState,
	ctx: &CanvasRenderingContext2d,
	idx: force_graph::DefaultNodeIdx,
	x: f64,
	y: f64,
	radius: f64,
	k: f64,
) {
	if state.selected.contains(&idx) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(SELECTED_RING);
		ctx.set_line_width(2.0 / k);
		ctx.stroke();
	}
	if state.pending == Some(idx) {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 6.0 / k, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(PENDING_RING);
		ctx.set_line_width(2.0 / k);
		dash(ctx, 4.0 / k, 3.0 / k);
		ctx.stroke();
		solid(ctx);
	}
}

fn label(ctx: &CanvasRenderingContext2d, text: &str, color: &str, x: f64, y: f64, k: f64) {
	if text.is_empty() {
		return;
	}
	ctx.set_fill_style_str(color);
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(text, x, y);
}
