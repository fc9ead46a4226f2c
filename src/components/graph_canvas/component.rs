use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::InteractionState;
use crate::canvas::{CanvasHandle, Point};

/// A double-click on a node, with the pointer position in graph space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeActivation {
	pub node_id: String,
	pub position: Point,
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

#[component]
pub fn GraphCanvas(
	canvas: CanvasHandle,
	on_activate: Rc<dyn Fn(NodeActivation)>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let ui: Rc<RefCell<InteractionState>> = Rc::new(RefCell::new(InteractionState::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (canvas_init, ui_init, animate_init, resize_cb_init) =
		(canvas.clone(), ui.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(element) = canvas_ref.get() else {
			return;
		};
		let element: HtmlCanvasElement = element.into();
		let Some(window) = web_sys::window() else {
			log::error!("no window, canvas not started");
			return;
		};

		let (w, h) = window_size(&window).unwrap_or((800.0, 600.0));
		element.set_width(w as u32);
		element.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match element.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				log::error!("2d context unavailable");
				return;
			}
		};
		canvas_init.borrow_mut().viewport.resize(w, h);

		let (canvas_resize, element_resize) = (canvas_init.clone(), element.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
				return;
			};
			element_resize.set_width(nw as u32);
			element_resize.set_height(nh as u32);
			canvas_resize.borrow_mut().viewport.resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (canvas_anim, ui_anim, animate_inner) =
			(canvas_init.clone(), ui_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut canvas = canvas_anim.borrow_mut();
				let mut ui = ui_anim.borrow_mut();
				ui.sync_generation(canvas.generation());
				canvas.tick(0.016);
				ui.tick(0.016);
				render::render(&canvas, &ui, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let local = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let element: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = element.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let (canvas_md, ui_md) = (canvas.clone(), ui.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local(&ev) else { return };
		let canvas = canvas_md.borrow();
		let mut ui = ui_md.borrow_mut();
		match canvas.node_at_position(x, y) {
			Some(idx) => ui.begin_drag(&canvas, idx, x, y),
			None => ui.begin_pan(&canvas, x, y),
		}
	};

	let (canvas_mm, ui_mm) = (canvas.clone(), ui.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local(&ev) else { return };
		ui_mm
			.borrow_mut()
			.pointer_moved(&mut canvas_mm.borrow_mut(), x, y);
	};

	let ui_mu = ui.clone();
	let on_mouseup = move |_: MouseEvent| ui_mu.borrow_mut().release();

	let (canvas_ml, ui_ml) = (canvas.clone(), ui.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let mut ui = ui_ml.borrow_mut();
		ui.release();
		ui.set_hover(&canvas_ml.borrow(), None);
	};

	let (canvas_dc, ui_dc) = (canvas.clone(), ui.clone());
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = local(&ev) else { return };
		let activation = {
			let canvas = canvas_dc.borrow();
			canvas.node_at_position(x, y).and_then(|idx| {
				Some(NodeActivation {
					node_id: canvas.node(idx)?.id,
					position: canvas.viewport.screen_to_graph(x, y),
				})
			})
		};
		ui_dc.borrow_mut().release();
		if let Some(activation) = activation {
			log::debug!("activated {}", activation.node_id);
			on_activate(activation);
		}
	};

	let canvas_wh = canvas.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local(&ev) else { return };
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		canvas_wh.borrow_mut().viewport.zoom_at(x, y, factor);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
