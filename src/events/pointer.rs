use crate::dom;
use crate::fullscreen;
use showcase_core::{PointerOffset, Scene};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

// Orbit rotation per CSS pixel of drag
const ORBIT_RADIANS_PER_PX: f32 = std::f32::consts::TAU / 1000.0;

#[derive(Clone, Copy, Debug, Default)]
struct DragState {
    active: bool,
    last_x: f64,
    last_y: f64,
}

#[derive(Clone)]
pub struct InputWiring {
    pub window: web::Window,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub scene: Rc<RefCell<Scene>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    let drag = Rc::new(RefCell::new(DragState::default()));
    wire_mousemove(&w, drag.clone());
    wire_pointerdown(&w, drag.clone());
    wire_pointerup(&w, drag);
    wire_dblclick(&w);
    wire_resize(&w);
}

fn wire_mousemove(w: &InputWiring, drag: Rc<RefCell<DragState>>) {
    let window = w.window.clone();
    let w = w.clone();
    dom::add_listener(window.as_ref(), "mousemove", move |ev: web::MouseEvent| {
        let vp = w.scene.borrow().viewport();
        let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
        let pointer = PointerOffset::from_client(cx, cy, vp.css_width, vp.css_height);
        let mut scene = w.scene.borrow_mut();
        scene.set_pointer(pointer);

        let mut d = drag.borrow_mut();
        if d.active {
            let dx = (cx - d.last_x) as f32;
            let dy = (cy - d.last_y) as f32;
            scene
                .orbit_mut()
                .rotate(-dx * ORBIT_RADIANS_PER_PX, -dy * ORBIT_RADIANS_PER_PX);
            d.last_x = cx;
            d.last_y = cy;
        }
    });
}

fn wire_pointerdown(w: &InputWiring, drag: Rc<RefCell<DragState>>) {
    let scene = w.scene.clone();
    dom::add_listener(w.canvas.as_ref(), "pointerdown", move |ev: web::PointerEvent| {
        if !scene.borrow_mut().orbit_mut().enabled {
            return;
        }
        let mut d = drag.borrow_mut();
        d.active = true;
        d.last_x = ev.client_x() as f64;
        d.last_y = ev.client_y() as f64;
    });
}

fn wire_pointerup(w: &InputWiring, drag: Rc<RefCell<DragState>>) {
    dom::add_listener(w.window.as_ref(), "pointerup", move |_ev: web::PointerEvent| {
        drag.borrow_mut().active = false;
    });
}

fn wire_dblclick(w: &InputWiring) {
    let document = w.document.clone();
    let canvas = w.canvas.clone();
    dom::add_listener(w.window.as_ref(), "dblclick", move |_ev: web::MouseEvent| {
        fullscreen::toggle(&document, &canvas);
    });
}

fn wire_resize(w: &InputWiring) {
    let scene = w.scene.clone();
    let canvas = w.canvas.clone();
    dom::add_listener(w.window.as_ref(), "resize", move |_ev: web::Event| {
        let viewport = dom::window_viewport();
        dom::sync_canvas_backing_size(&canvas, viewport);
        scene.borrow_mut().resize(viewport);
    });
}
