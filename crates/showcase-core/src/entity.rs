//! Visual entity: one model turned into a particle cloud with a visible/hidden
//! lifecycle.
//!
//! Lifecycle: constructed from an [`EntityConfig`] → `begin_load` hands out a
//! [`LoadTicket`] → `complete_load` derives the point cloud (and auto-shows if
//! configured) → `show`/`hide` any number of times → `dispose`.

use crate::asset::LoadedScene;
use crate::color::Rgb;
use crate::config::{EntityConfig, TransitionConfig, TransitionPolicy};
use crate::constants::INITIAL_ROTATION_X;
use crate::debug_panel::DebugPanel;
use crate::error::{AssetLoadError, EntityError};
use crate::graph::SceneGraph;
use crate::sampler::PointCloud;
use crate::task::LoadTicket;
use crate::transition::{Transition, TransitionKind};
use crate::uniforms::{ParticleUniforms, UniformField};
use glam::Mat4;
use rand::Rng;

pub type EntityId = usize;

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Ready,
    Failed(EntityError),
}

pub struct VisualEntity {
    id: EntityId,
    config: EntityConfig,
    transitions_cfg: TransitionConfig,
    particle_count: usize,
    state: LoadState,
    generation: u64,
    pending: Option<LoadTicket>,
    cloud: Option<PointCloud>,
    uniforms: ParticleUniforms,
    rotation_x: f32,
    active: bool,
    transitions: Vec<Transition>,
    panel: Option<DebugPanel>,
    disposed: bool,
}

impl VisualEntity {
    pub fn new(
        id: EntityId,
        config: EntityConfig,
        transitions_cfg: TransitionConfig,
        particle_count: usize,
    ) -> Self {
        let uniforms = ParticleUniforms::new(config.colour1, config.colour2);
        Self {
            id,
            config,
            transitions_cfg,
            particle_count,
            state: LoadState::Unloaded,
            generation: 0,
            pending: None,
            cloud: None,
            uniforms,
            rotation_x: INITIAL_ROTATION_X,
            active: false,
            transitions: Vec::new(),
            panel: None,
            disposed: false,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    #[inline]
    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[inline]
    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    #[inline]
    pub fn uniforms(&self) -> &ParticleUniforms {
        &self.uniforms
    }

    #[inline]
    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation_x)
    }

    #[inline]
    pub fn panel(&self) -> Option<&DebugPanel> {
        self.panel.as_ref()
    }

    /// True while any show/hide timeline is still running.
    pub fn in_transition(&self) -> bool {
        !self.transitions.is_empty()
    }

    // ---------------- loading ----------------

    /// Start (or restart) loading. Any earlier in-flight request is cancelled.
    pub fn begin_load(&mut self) -> Result<LoadTicket, EntityError> {
        if self.disposed {
            return Err(EntityError::Disposed);
        }
        if let LoadState::Failed(EntityError::InvalidSceneGraph(_)) = self.state {
            return Err(EntityError::NotRetryable);
        }
        if let Some(prev) = self.pending.take() {
            prev.cancel();
        }
        self.generation += 1;
        let ticket = LoadTicket::new(self.id, self.generation, self.config.source.clone());
        self.pending = Some(ticket.clone());
        self.state = LoadState::Loading;
        log::info!("[load] {} <- {}", self.config.name, self.config.source);
        Ok(ticket)
    }

    /// Restart a load that failed while fetching or decoding.
    pub fn retry_load(&mut self) -> Result<LoadTicket, EntityError> {
        match self.state {
            LoadState::Failed(EntityError::AssetLoad(_)) => self.begin_load(),
            _ => Err(EntityError::NotRetryable),
        }
    }

    /// Accept the outcome of a load. Stale or cancelled tickets are rejected
    /// without touching any state.
    pub fn complete_load<R: Rng + ?Sized>(
        &mut self,
        ticket: &LoadTicket,
        result: Result<LoadedScene, AssetLoadError>,
        rng: &mut R,
        graph: &mut SceneGraph,
    ) -> Result<(), EntityError> {
        if self.disposed {
            return Err(EntityError::Disposed);
        }
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == ticket.generation);
        if ticket.is_cancelled() || ticket.generation != self.generation || !current {
            return Err(EntityError::StaleLoad);
        }
        self.pending = None;

        let cloud = result
            .map_err(EntityError::from)
            .and_then(|scene| {
                let mesh = scene.primary_mesh()?;
                Ok(PointCloud::from_mesh(mesh, self.particle_count, rng)?)
            });
        let cloud = match cloud {
            Ok(c) => c,
            Err(e) => {
                log::error!("[load] {} failed: {}", self.config.name, e);
                self.state = LoadState::Failed(e.clone());
                return Err(e);
            }
        };

        log::info!("[load] {} ready ({} points)", self.config.name, cloud.len());
        self.cloud = Some(cloud);
        self.uniforms = ParticleUniforms::new(self.config.colour1, self.config.colour2);
        self.state = LoadState::Ready;
        if self.config.auto_show {
            self.show(graph)?;
        }
        Ok(())
    }

    // ---------------- transitions ----------------

    fn ensure_ready(&self) -> Result<(), EntityError> {
        if self.disposed {
            return Err(EntityError::Disposed);
        }
        if !self.is_ready() {
            return Err(EntityError::NotLoaded);
        }
        Ok(())
    }

    fn push_transition(&mut self, t: Transition) {
        if self.transitions_cfg.policy == TransitionPolicy::Supersede {
            self.transitions.clear();
        }
        self.transitions.push(t);
    }

    /// Attach the cloud, mark active and start the grow-in timeline.
    pub fn show(&mut self, graph: &mut SceneGraph) -> Result<(), EntityError> {
        self.ensure_ready()?;
        graph.attach(self.id);
        self.active = true;
        let t = Transition::show(&self.transitions_cfg, self.rotation_x, self.config.background);
        self.push_transition(t);
        let uniforms = &self.uniforms;
        let panel = self.panel.get_or_insert_with(|| DebugPanel::new(uniforms));
        panel.sync_from(uniforms);
        panel.set_visible(true);
        log::debug!("[entity] show {}", self.config.name);
        Ok(())
    }

    /// Start the collapse timeline; the cloud is detached when it completes.
    pub fn hide(&mut self) -> Result<(), EntityError> {
        self.ensure_ready()?;
        let t = Transition::hide(&self.transitions_cfg, self.rotation_x);
        self.push_transition(t);
        log::debug!("[entity] hide {}", self.config.name);
        Ok(())
    }

    /// Step running timelines by `dt` seconds, writing into uniforms,
    /// rotation and the page background.
    pub fn advance(&mut self, dt: f32, graph: &mut SceneGraph, background: &mut Rgb) {
        if self.transitions.is_empty() {
            return;
        }
        for t in self.transitions.iter_mut() {
            let step = t.step(self.uniforms.scale, self.rotation_x, *background, dt);
            if let Some(s) = step.scale {
                self.uniforms.scale = s;
            }
            if let Some(r) = step.rotation_x {
                self.rotation_x = r;
            }
            if let Some(bg) = step.background {
                *background = bg;
            }
            if step.scale_completed && t.kind() == TransitionKind::Hide {
                graph.detach(self.id);
                self.active = false;
                if let Some(p) = self.panel.as_mut() {
                    p.set_visible(false);
                }
            }
        }
        self.transitions.retain(|t| !t.is_finished());
        if let Some(p) = self.panel.as_mut() {
            p.sync_from(&self.uniforms);
        }
    }

    /// Push the scene clock into the time uniform while active.
    pub fn set_time(&mut self, elapsed: f32) {
        if self.active {
            self.uniforms.time = elapsed;
        }
    }

    /// Write a value from the debug panel. Returns the stored (clamped) value.
    pub fn apply_panel_value(&mut self, field: UniformField, raw: f32) -> Option<f32> {
        let uniforms = &mut self.uniforms;
        self.panel
            .as_mut()
            .map(|panel| panel.apply(field, raw, uniforms))
    }

    /// Release everything the entity owns and cancel any pending load.
    pub fn dispose(&mut self, graph: &mut SceneGraph) {
        if let Some(ticket) = self.pending.take() {
            ticket.cancel();
        }
        graph.detach(self.id);
        self.transitions.clear();
        self.cloud = None;
        self.panel = None;
        self.active = false;
        self.state = LoadState::Unloaded;
        self.disposed = true;
        log::debug!("[entity] disposed {}", self.config.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{LoadedScene, MeshData};
    use crate::error::InvalidSceneGraphError;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quad() -> LoadedScene {
        LoadedScene::from_mesh(
            "Quad",
            MeshData::new(
                vec![
                    Vec3::new(-0.5, -0.5, 0.0),
                    Vec3::new(0.5, -0.5, 0.0),
                    Vec3::new(0.5, 0.5, 0.0),
                    Vec3::new(-0.5, 0.5, 0.0),
                ],
                vec![0, 1, 2, 0, 2, 3],
            ),
        )
    }

    fn entity(auto_show: bool) -> VisualEntity {
        let cfg = EntityConfig::new("bitcoin", "./models/bitcoin.glb", "#F3654F", "#F3654F", "#0D1B2C")
            .unwrap()
            .auto_show(auto_show);
        VisualEntity::new(0, cfg, TransitionConfig::default(), 500)
    }

    fn loaded(auto_show: bool, graph: &mut SceneGraph) -> VisualEntity {
        let mut e = entity(auto_show);
        let mut rng = StdRng::seed_from_u64(1);
        let t = e.begin_load().unwrap();
        e.complete_load(&t, Ok(quad()), &mut rng, graph).unwrap();
        e
    }

    fn settle(e: &mut VisualEntity, graph: &mut SceneGraph, bg: &mut Rgb) {
        for _ in 0..120 {
            e.advance(1.0 / 60.0, graph, bg);
        }
    }

    #[test]
    fn load_builds_cloud_and_collapsed_uniforms() {
        let mut graph = SceneGraph::default();
        let e = loaded(false, &mut graph);
        assert!(e.is_ready());
        assert_eq!(e.cloud().unwrap().len(), 500);
        assert_eq!(e.uniforms().scale, 0.0);
        assert!(!e.is_active());
        assert!(graph.is_empty());
    }

    #[test]
    fn auto_show_attaches_on_load() {
        let mut graph = SceneGraph::default();
        let e = loaded(true, &mut graph);
        assert!(e.is_active());
        assert!(graph.contains(0));
        assert!(e.panel().unwrap().is_visible());
    }

    #[test]
    fn show_hide_round_trip_ends_detached() {
        let mut graph = SceneGraph::default();
        let mut bg = Rgb::BLACK;
        let mut e = loaded(false, &mut graph);
        e.show(&mut graph).unwrap();
        settle(&mut e, &mut graph, &mut bg);
        assert_eq!(e.uniforms().scale, 1.0);
        assert_eq!(bg, e.config().background);

        e.hide().unwrap();
        // still attached while collapsing
        e.advance(0.5, &mut graph, &mut bg);
        assert!(graph.contains(0) && e.is_active());
        settle(&mut e, &mut graph, &mut bg);
        assert!(!graph.contains(0));
        assert!(!e.is_active());
        assert!(!e.in_transition());
        assert!(!e.panel().unwrap().is_visible());
    }

    #[test]
    fn unloaded_entity_ignores_show_and_hide() {
        let mut graph = SceneGraph::default();
        let mut e = entity(false);
        assert_eq!(e.show(&mut graph), Err(EntityError::NotLoaded));
        assert_eq!(e.hide(), Err(EntityError::NotLoaded));
        assert!(graph.is_empty());
    }

    #[test]
    fn failed_load_can_be_retried() {
        let mut graph = SceneGraph::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut e = entity(false);
        let t = e.begin_load().unwrap();
        let err = e
            .complete_load(&t, Err(AssetLoadError::Fetch("404".into())), &mut rng, &mut graph)
            .unwrap_err();
        assert!(matches!(err, EntityError::AssetLoad(_)));
        assert!(matches!(e.load_state(), LoadState::Failed(_)));
        assert_eq!(e.show(&mut graph), Err(EntityError::NotLoaded));

        let retry = e.retry_load().unwrap();
        assert_eq!(e.retry_load().unwrap_err(), EntityError::NotRetryable);
        e.complete_load(&retry, Ok(quad()), &mut rng, &mut graph).unwrap();
        assert!(e.is_ready());
    }

    #[test]
    fn invalid_scene_graph_is_fatal() {
        let mut graph = SceneGraph::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut e = entity(true);
        let t = e.begin_load().unwrap();
        let err = e
            .complete_load(&t, Ok(LoadedScene::default()), &mut rng, &mut graph)
            .unwrap_err();
        assert_eq!(
            err,
            EntityError::InvalidSceneGraph(InvalidSceneGraphError::NoScene)
        );
        assert_eq!(e.begin_load().unwrap_err(), EntityError::NotRetryable);
        assert!(graph.is_empty());
    }

    #[test]
    fn stale_and_cancelled_tickets_are_ignored() {
        let mut graph = SceneGraph::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut e = entity(false);
        let first = e.begin_load().unwrap();
        let second = e.begin_load().unwrap();
        assert!(first.is_cancelled());
        assert_eq!(
            e.complete_load(&first, Ok(quad()), &mut rng, &mut graph),
            Err(EntityError::StaleLoad)
        );
        assert_eq!(e.load_state(), &LoadState::Loading);

        e.dispose(&mut graph);
        assert!(second.is_cancelled());
        assert_eq!(
            e.complete_load(&second, Ok(quad()), &mut rng, &mut graph),
            Err(EntityError::Disposed)
        );
        assert!(e.cloud().is_none());
    }

    #[test]
    fn time_uniform_only_moves_while_active() {
        let mut graph = SceneGraph::default();
        let mut e = loaded(false, &mut graph);
        e.set_time(2.0);
        assert_eq!(e.uniforms().time, 0.0);
        e.show(&mut graph).unwrap();
        e.set_time(2.0);
        assert_eq!(e.uniforms().time, 2.0);
    }

    #[test]
    fn panel_writes_are_clamped() {
        let mut graph = SceneGraph::default();
        let mut e = loaded(false, &mut graph);
        assert_eq!(e.apply_panel_value(UniformField::Scale, 9.0), None);
        e.show(&mut graph).unwrap();
        assert_eq!(e.apply_panel_value(UniformField::Scale, 9.0), Some(5.0));
        assert_eq!(e.uniforms().scale, 5.0);
    }
}
