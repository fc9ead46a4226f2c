use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::InteractionState;
use crate::canvas::{NODE_RADIUS, PackageCanvas};
use crate::model::LineStyle;

const BACKGROUND: &str = "#f4f5f7";
const LABEL: &str = "#2b2d33";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(canvas: &PackageCanvas, ui: &InteractionState, ctx: &CanvasRenderingContext2d) {
	let vp = &canvas.viewport;
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, vp.width, vp.height);
	ctx.save();
	let _ = ctx.translate(vp.transform.x, vp.transform.y);
	let _ = ctx.scale(vp.transform.k, vp.transform.k);
	draw_edges(canvas, ui, ctx);
	draw_nodes(canvas, ui, ctx);
	ctx.restore();
}

fn draw_edges(canvas: &PackageCanvas, ui: &InteractionState, ctx: &CanvasRenderingContext2d) {
	let k = canvas.viewport.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(ui.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(ui.hover.highlight_t);
	let positions = canvas.positions();
	let dashed = js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap));
	let solid = js_sys::Array::new();

	for edge in canvas.edges() {
		let (Some(p1), Some(p2)) = (positions.get(&edge.source), positions.get(&edge.target)) else {
			continue;
		};
		let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted = ui.is_highlighted(edge.source) && ui.is_highlighted(edge.target);

		// t=0: all edges at base (0.8), t=1: highlighted at 1.0, others at 0.2
		let (alpha, width) = if is_highlighted {
			(0.8 + 0.2 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.8 - 0.6 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.style.color);
		ctx.set_line_width(width);
		match edge.style.line {
			LineStyle::Dashed => {
				let _ = ctx.set_line_dash(&dashed);
				ctx.set_line_dash_offset(dash_offset);
			}
			LineStyle::Solid => {
				let _ = ctx.set_line_dash(&solid);
			}
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(p1.x + ux * NODE_RADIUS, p1.y + uy * NODE_RADIUS);
		ctx.line_to(
			p2.x - ux * (NODE_RADIUS + arrow_size),
			p2.y - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&solid);
		ctx.set_fill_style_str(edge.style.color);
		let (tip_x, tip_y) = (p2.x - ux * NODE_RADIUS, p2.y - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
	let _ = ctx.set_line_dash(&solid);
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, k: f64) {
	ctx.set_fill_style_str(LABEL);
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(label, x, y);
}

fn draw_nodes(canvas: &PackageCanvas, ui: &InteractionState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		ui.has_active_highlight(),
		ease_out_cubic(ui.hover.highlight_t),
		canvas.viewport.transform.k,
	);

	canvas.visit_nodes(|idx, info, p| {
		if has_highlight && ui.is_highlighted(idx) {
			return;
		}
		let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(info.color);
		ctx.fill();
		draw_label(ctx, &info.label, p.x + radius + 3.0, p.y + 3.0, k);
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	canvas.visit_nodes(|idx, info, p| {
		if !ui.is_highlighted(idx) {
			return;
		}
		let is_hovered = ui.is_hovered(idx);
		let is_neighbor = ui.hover.neighbors.contains(&idx) || ui.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(
				NODE_RADIUS * (1.0 + 0.35 * t),
				NODE_RADIUS * (1.8 + 1.2 * t),
			)
		} else if is_neighbor {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		} else {
			(NODE_RADIUS, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, radius * 0.3, p.x, p.y, glow_radius) {
				let alpha = if is_hovered { 0.45 * t } else { 0.25 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(0, 77, 207, {})", alpha));
				let _ = gradient.add_color_stop(0.6, &format!("rgba(0, 77, 207, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(0, 77, 207, 0)");
				ctx.begin_path();
				let _ = ctx.arc(p.x, p.y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(info.color);
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(43, 45, 51, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_label(ctx, &info.label, p.x + radius + 3.0, p.y + 3.0, k);
	});
}
