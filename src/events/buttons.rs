use crate::dom;
use showcase_core::{ButtonFx, ButtonStyle, Scene, TriggerBindings};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Trigger buttons with their animated style, shared with the frame loop.
pub struct Buttons {
    pub elements: Vec<web::HtmlElement>,
    pub fx: Vec<ButtonFx>,
}

impl Buttons {
    /// Advance every button tween and write changed styles to the DOM.
    pub fn step(&mut self, dt: f32) {
        for (el, fx) in self.elements.iter().zip(self.fx.iter_mut()) {
            if !fx.step(dt) {
                continue;
            }
            apply_style(el, fx.style());
        }
    }
}

fn apply_style(el: &web::HtmlElement, s: ButtonStyle) {
    let style = el.style();
    _ = style.set_property("transform", &s.css_transform());
    _ = style.set_property("opacity", &format!("{:.3}", s.opacity));
}

/// Bind the `.button` elements to the scene's entities in document order and
/// start their intro animation.
pub fn wire_buttons(
    document: &web::Document,
    selector: &str,
    scene: Rc<RefCell<Scene>>,
) -> Rc<RefCell<Buttons>> {
    let elements = dom::query_all(document, selector);
    let bindings = Rc::new(TriggerBindings::for_scene(&scene.borrow()));
    if elements.len() != bindings.len() {
        log::warn!(
            "[ui] {} buttons for {} entities; extra buttons are inert",
            elements.len(),
            bindings.len()
        );
    }
    let fx: Vec<ButtonFx> = (0..elements.len()).map(ButtonFx::intro).collect();
    for (el, f) in elements.iter().zip(fx.iter()) {
        apply_style(el, f.style());
    }
    let buttons = Rc::new(RefCell::new(Buttons {
        elements: elements.clone(),
        fx,
    }));

    for (index, el) in elements.iter().enumerate() {
        let scene_c = scene.clone();
        let bindings_c = bindings.clone();
        dom::add_listener(el.as_ref(), "click", move |ev: web::MouseEvent| {
            ev.prevent_default();
            let mut scene = scene_c.borrow_mut();
            if let Some((_, skipped)) = bindings_c.activate(index, &mut scene) {
                for (id, e) in skipped {
                    log::warn!("[ui] entity {} not switched: {}", id, e);
                }
            }
        });

        let b = buttons.clone();
        dom::add_listener(el.as_ref(), "mouseenter", move |_ev: web::MouseEvent| {
            if let Some(fx) = b.borrow_mut().fx.get_mut(index) {
                fx.pointer_enter();
            }
        });
        let b = buttons.clone();
        dom::add_listener(el.as_ref(), "mouseleave", move |_ev: web::MouseEvent| {
            if let Some(fx) = b.borrow_mut().fx.get_mut(index) {
                fx.pointer_leave();
            }
        });
    }
    buttons
}
