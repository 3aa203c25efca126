#![cfg(target_arch = "wasm32")]
use instant::Instant;
use showcase_core::{Scene, ShowcaseConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod fullscreen;
mod loader;
mod panel;
mod render;

use constants::{BUTTON_SELECTOR, CANVAS_SELECTOR, SAMPLING_SEED};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showcase-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn build_scene(viewport: showcase_core::Viewport) -> anyhow::Result<Rc<RefCell<Scene>>> {
    let config = ShowcaseConfig::default();
    let mut scene =
        Scene::new(config, SAMPLING_SEED).map_err(|e| anyhow::anyhow!("config: {}", e))?;
    scene.resize(viewport);
    Ok(Rc::new(RefCell::new(scene)))
}

fn start_loads(scene: &Rc<RefCell<Scene>>) {
    let tickets = scene.borrow_mut().begin_all_loads();
    for ticket in tickets {
        loader::spawn_load(Rc::downgrade(scene), ticket);
    }
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::query_canvas(&document, CANVAS_SELECTOR)?;

    // Maintain canvas internal pixel size to match CSS size * capped devicePixelRatio
    let viewport = dom::window_viewport();
    dom::sync_canvas_backing_size(&canvas, viewport);

    let scene = build_scene(viewport)?;
    dom::set_body_background(&document, scene.borrow().background());

    // Assets load while the GPU comes up; completions only touch core state
    start_loads(&scene);

    events::wire_input_handlers(events::InputWiring {
        window: window.clone(),
        document: document.clone(),
        canvas: canvas.clone(),
        scene: scene.clone(),
    });
    let buttons = events::wire_buttons(&document, BUTTON_SELECTOR, scene.clone());

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        scene: scene.clone(),
        gpu,
        canvas,
        document: document.clone(),
        buttons,
        panels: panel::PanelDom::new(document, scene.clone()),
        last_instant: Instant::now(),
        last_background: None,
    }));
    frame::start_loop(frame_ctx);
    wire_teardown(&window, scene);
    Ok(())
}

/// Dispose entities and cancel loads when the page goes away.
fn wire_teardown(window: &web::Window, scene: Rc<RefCell<Scene>>) {
    dom::add_listener(window.as_ref(), "pagehide", move |ev: web::PageTransitionEvent| {
        // a persisted page may come back from the back/forward cache
        if !ev.persisted() {
            scene.borrow_mut().teardown();
        }
    });
}
