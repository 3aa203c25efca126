//! Scene composition: the single owned context for camera, entities and
//! per-frame state.

use crate::asset::LoadedScene;
use crate::camera::{Camera, Viewport};
use crate::color::Rgb;
use crate::config::ShowcaseConfig;
use crate::entity::{EntityId, VisualEntity};
use crate::error::{AssetLoadError, ConfigError, EntityError};
use crate::graph::SceneGraph;
use crate::interaction::PointerOffset;
use crate::orbit::OrbitControls;
use crate::task::LoadTicket;
use crate::uniforms::UniformField;
use fnv::FnvHashMap;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Scene {
    config: ShowcaseConfig,
    camera: Camera,
    viewport: Viewport,
    orbit: OrbitControls,
    graph: SceneGraph,
    entities: Vec<VisualEntity>,
    by_name: FnvHashMap<String, EntityId>,
    background: Rgb,
    pointer: PointerOffset,
    elapsed: f32,
    rng: StdRng,
    torn_down: bool,
}

impl Scene {
    /// Validate the configuration and build every entity (unloaded).
    pub fn new(config: ShowcaseConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let viewport = Viewport::default();
        let camera = Camera::from_config(&config.camera, viewport.aspect());
        let orbit = OrbitControls::new(&config.orbit);
        let entities: Vec<VisualEntity> = config
            .entities
            .iter()
            .enumerate()
            .map(|(id, e)| {
                VisualEntity::new(id, e.clone(), config.transition.clone(), config.particle_count)
            })
            .collect();
        let by_name = entities
            .iter()
            .map(|e| (e.name().to_string(), e.id()))
            .collect();
        let background = config.initial_background;
        Ok(Self {
            config,
            camera,
            viewport,
            orbit,
            graph: SceneGraph::default(),
            entities,
            by_name,
            background,
            pointer: PointerOffset::default(),
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(seed),
            torn_down: false,
        })
    }

    #[inline]
    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[inline]
    pub fn entities(&self) -> &[VisualEntity] {
        &self.entities
    }

    #[inline]
    pub fn entity(&self, id: EntityId) -> Option<&VisualEntity> {
        self.entities.get(id)
    }

    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&VisualEntity> {
        self.entity_id(name).and_then(|id| self.entity(id))
    }

    /// Attached entities in draw order.
    pub fn attached(&self) -> impl Iterator<Item = &VisualEntity> + '_ {
        self.graph.iter().filter_map(|id| self.entities.get(id))
    }

    #[inline]
    pub fn background(&self) -> Rgb {
        self.background
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn pointer(&self) -> PointerOffset {
        self.pointer
    }

    #[inline]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    pub fn set_pointer(&mut self, pointer: PointerOffset) {
        self.pointer = pointer;
    }

    /// Record a new render surface size; updates the camera aspect.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut VisualEntity, EntityError> {
        if self.torn_down {
            return Err(EntityError::Disposed);
        }
        self.entities.get_mut(id).ok_or(EntityError::Disposed)
    }

    // ---------------- loading ----------------

    pub fn begin_load(&mut self, id: EntityId) -> Result<LoadTicket, EntityError> {
        self.entity_mut(id)?.begin_load()
    }

    pub fn retry_load(&mut self, id: EntityId) -> Result<LoadTicket, EntityError> {
        self.entity_mut(id)?.retry_load()
    }

    /// Tickets for every entity that still needs its asset.
    pub fn begin_all_loads(&mut self) -> Vec<LoadTicket> {
        (0..self.entities.len())
            .filter_map(|id| match self.begin_load(id) {
                Ok(t) => Some(t),
                Err(e) => {
                    log::warn!("[load] entity {} not loadable: {}", id, e);
                    None
                }
            })
            .collect()
    }

    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<LoadedScene, AssetLoadError>,
    ) -> Result<(), EntityError> {
        if self.torn_down {
            return Err(EntityError::Disposed);
        }
        let entity = self
            .entities
            .get_mut(ticket.entity)
            .ok_or(EntityError::StaleLoad)?;
        entity.complete_load(ticket, result, &mut self.rng, &mut self.graph)
    }

    // ---------------- visibility ----------------

    pub fn show(&mut self, id: EntityId) -> Result<(), EntityError> {
        if self.torn_down {
            return Err(EntityError::Disposed);
        }
        let entity = self.entities.get_mut(id).ok_or(EntityError::Disposed)?;
        entity.show(&mut self.graph)
    }

    pub fn hide(&mut self, id: EntityId) -> Result<(), EntityError> {
        self.entity_mut(id)?.hide()
    }

    pub fn apply_panel_value(&mut self, id: EntityId, field: UniformField, raw: f32) -> Option<f32> {
        self.entity_mut(id).ok()?.apply_panel_value(field, raw)
    }

    // ---------------- frame ----------------

    /// Advance the scene by `dt` seconds. Rendering is the caller's job.
    pub fn frame(&mut self, dt: f32) {
        if self.torn_down {
            return;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;

        for entity in self.entities.iter_mut() {
            entity.advance(dt, &mut self.graph, &mut self.background);
        }

        self.camera
            .follow_pointer(self.pointer, &self.config.camera, dt);
        self.camera.look_at(Vec3::ZERO);

        let elapsed = self.elapsed;
        for entity in self.entities.iter_mut() {
            entity.set_time(elapsed);
        }

        self.orbit.update(&mut self.camera);
    }

    /// Dispose every entity and cancel outstanding loads. Further calls are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for entity in self.entities.iter_mut() {
            entity.dispose(&mut self.graph);
        }
        self.graph.clear();
        self.torn_down = true;
        log::info!("[scene] torn down");
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        // outstanding load futures hold ticket clones; make sure they see cancellation
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MeshData;

    fn tri() -> LoadedScene {
        LoadedScene::from_mesh(
            "Tri",
            MeshData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]),
        )
    }

    fn small_config() -> ShowcaseConfig {
        ShowcaseConfig {
            particle_count: 64,
            ..ShowcaseConfig::default()
        }
    }

    #[test]
    fn new_scene_has_unloaded_entities_and_default_camera() {
        let scene = Scene::new(small_config(), 1).unwrap();
        assert_eq!(scene.entities().len(), 5);
        assert_eq!(scene.entity_id("cubeman"), Some(3));
        assert!(scene.graph().is_empty());
        assert_eq!(scene.camera().eye, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn frame_advances_clock_and_time_uniform() {
        let mut scene = Scene::new(small_config(), 1).unwrap();
        let tickets = scene.begin_all_loads();
        assert_eq!(tickets.len(), 5);
        for t in &tickets {
            scene.complete_load(t, Ok(tri())).unwrap();
        }
        // bitcoin auto-shows
        assert!(scene.entity(0).unwrap().is_active());
        scene.frame(0.25);
        scene.frame(0.25);
        assert!((scene.elapsed() - 0.5).abs() < 1e-6);
        assert_eq!(scene.entity(0).unwrap().uniforms().time, scene.elapsed());
        assert_eq!(scene.entity(1).unwrap().uniforms().time, 0.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut scene = Scene::new(small_config(), 1).unwrap();
        scene.resize(Viewport::new(1920.0, 1080.0, 1.0));
        assert!((scene.camera().aspect - 16.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn teardown_cancels_pending_loads() {
        let mut scene = Scene::new(small_config(), 1).unwrap();
        let tickets = scene.begin_all_loads();
        scene.teardown();
        assert!(tickets.iter().all(|t| t.is_cancelled()));
        assert_eq!(
            scene.complete_load(&tickets[0], Ok(tri())),
            Err(EntityError::Disposed)
        );
        assert_eq!(scene.show(0), Err(EntityError::Disposed));
        scene.frame(1.0);
        assert_eq!(scene.elapsed(), 0.0);
    }
}
