//! DOM mirror of each entity's debug panel: a titled box of range inputs.

use crate::constants::PANEL_ROOT_ID;
use fnv::FnvHashMap;
use showcase_core::{DebugPanel, EntityId, ParamSpec, Scene, UniformField};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

struct ControlView {
    field: UniformField,
    input: web::HtmlInputElement,
    readout: web::Element,
}

struct PanelView {
    root: web::HtmlElement,
    controls: Vec<ControlView>,
    visible: bool,
}

/// Panels created so far, keyed by entity. Views are built the first time an
/// entity's panel model appears and are reused afterwards.
pub struct PanelDom {
    document: web::Document,
    scene: Rc<RefCell<Scene>>,
    views: FnvHashMap<EntityId, PanelView>,
}

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn format_value(spec: &ParamSpec, v: f32) -> String {
    if spec.step >= 1.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.3}", v)
    }
}

impl PanelDom {
    pub fn new(document: web::Document, scene: Rc<RefCell<Scene>>) -> Self {
        Self {
            document,
            scene,
            views: FnvHashMap::default(),
        }
    }

    fn container(&self) -> anyhow::Result<web::Element> {
        if let Some(el) = self.document.get_element_by_id(PANEL_ROOT_ID) {
            return Ok(el);
        }
        let el = self.document.create_element("div").map_err(js_err)?;
        el.set_id(PANEL_ROOT_ID);
        let body = self
            .document
            .body()
            .ok_or_else(|| anyhow::anyhow!("no body"))?;
        body.append_child(&el).map_err(js_err)?;
        Ok(el)
    }

    fn build(&self, id: EntityId, panel: &DebugPanel) -> anyhow::Result<PanelView> {
        let doc = &self.document;
        let root: web::HtmlElement = doc
            .create_element("div")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| anyhow::anyhow!("div is not an HtmlElement"))?;
        root.set_class_name("debug-panel");
        let style = root.style();
        _ = style.set_property("width", &format!("{}px", panel.width_px));
        _ = style.set_property("display", "none");

        let title = doc.create_element("div").map_err(js_err)?;
        title.set_class_name("debug-panel__title");
        title.set_text_content(Some(panel.title));
        root.append_child(&title).map_err(js_err)?;

        let mut controls = Vec::with_capacity(5);
        for (spec, value) in panel.controls() {
            let row = doc.create_element("label").map_err(js_err)?;
            row.set_class_name("debug-panel__row");
            let name = doc.create_element("span").map_err(js_err)?;
            name.set_text_content(Some(spec.label()));
            let input: web::HtmlInputElement = doc
                .create_element("input")
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| anyhow::anyhow!("input is not an HtmlInputElement"))?;
            input.set_type("range");
            input.set_min(&spec.min.to_string());
            input.set_max(&spec.max.to_string());
            input.set_step(&spec.step.to_string());
            input.set_value(&value.to_string());
            let readout = doc.create_element("span").map_err(js_err)?;
            readout.set_text_content(Some(&format_value(spec, value)));
            row.append_child(&name).map_err(js_err)?;
            row.append_child(&input).map_err(js_err)?;
            row.append_child(&readout).map_err(js_err)?;
            root.append_child(&row).map_err(js_err)?;

            wire_input(self.scene.clone(), id, spec, &input, &readout);
            controls.push(ControlView {
                field: spec.field,
                input,
                readout,
            });
        }
        self.container()?.append_child(&root).map_err(js_err)?;
        Ok(PanelView {
            root,
            controls,
            visible: false,
        })
    }

    /// Bring the DOM in line with the panel models. Called once per frame.
    pub fn sync(&mut self) {
        let scene = self.scene.clone();
        let scene = scene.borrow();
        for entity in scene.entities() {
            let Some(panel) = entity.panel() else {
                if let Some(view) = self.views.remove(&entity.id()) {
                    view.root.remove();
                }
                continue;
            };
            if !self.views.contains_key(&entity.id()) {
                match self.build(entity.id(), panel) {
                    Ok(view) => {
                        self.views.insert(entity.id(), view);
                    }
                    Err(e) => {
                        log::warn!("[ui] panel for {} unavailable: {:?}", entity.name(), e);
                        continue;
                    }
                }
            }
            let Some(view) = self.views.get_mut(&entity.id()) else {
                continue;
            };
            if view.visible != panel.is_visible() {
                view.visible = panel.is_visible();
                let display = if view.visible { "" } else { "none" };
                _ = view.root.style().set_property("display", display);
            }
            if !view.visible {
                continue;
            }
            for control in &view.controls {
                let value = panel.value(control.field);
                let shown = control.input.value_as_number() as f32;
                if (shown - value).abs() > f32::EPSILON {
                    control.input.set_value(&value.to_string());
                    let spec = showcase_core::debug_panel::spec_for(control.field);
                    control
                        .readout
                        .set_text_content(Some(&format_value(spec, value)));
                }
            }
        }
    }
}

fn wire_input(
    scene: Rc<RefCell<Scene>>,
    id: EntityId,
    spec: &'static ParamSpec,
    input: &web::HtmlInputElement,
    readout: &web::Element,
) {
    let input_c = input.clone();
    let readout_c = readout.clone();
    crate::dom::add_listener(input, "input", move |_ev: web::Event| {
        let raw = input_c.value_as_number() as f32;
        let stored = scene
            .borrow_mut()
            .apply_panel_value(id, spec.field, raw);
        if let Some(v) = stored {
            readout_c.set_text_content(Some(&format_value(spec, v)));
            log::debug!("[ui] {} = {}", spec.label(), v);
        }
    });
}
