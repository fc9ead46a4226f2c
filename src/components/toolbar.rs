use std::rc::Rc;

use leptos::html::Input;
use leptos::prelude::*;
use web_sys::KeyboardEvent;

/// Text field for spawning a package by name, plus a canvas reset.
#[component]
pub fn Toolbar(on_spawn: Rc<dyn Fn(String)>, on_reset: Rc<dyn Fn()>) -> impl IntoView {
	let input_ref = NodeRef::<Input>::new();

	let spawn = move || {
		if let Some(input) = input_ref.get() {
			on_spawn(input.value());
		}
	};
	let spawn = Rc::new(spawn);
	let (spawn_click, spawn_key) = (spawn.clone(), spawn);

	view! {
		<div class="toolbar">
			<input
				node_ref=input_ref
				id="spawn-input"
				type="text"
				placeholder="package, e.g. system/library"
				on:keydown=move |ev: KeyboardEvent| {
					if ev.key() == "Enter" {
						spawn_key();
					}
				}
			/>
			<button on:click=move |_| spawn_click()>"Spawn"</button>
			<button class="secondary" on:click=move |_| on_reset()>
				"Reset"
			</button>
		</div>
	}
}
