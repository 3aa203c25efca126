//! Button-to-entity bindings and pointer state.

use crate::entity::EntityId;
use crate::error::EntityError;
use crate::scene::Scene;
use smallvec::SmallVec;

/// Pointer position relative to the viewport centre, each axis in [-0.5, 0.5],
/// Y pointing up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerOffset {
    pub x: f32,
    pub y: f32,
}

impl PointerOffset {
    pub fn from_client(client_x: f64, client_y: f64, width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }
        Self {
            x: (client_x / width - 0.5) as f32,
            y: -(client_y / height - 0.5) as f32,
        }
    }
}

/// Fixed, ordered mapping from trigger index to entity.
#[derive(Clone, Debug, Default)]
pub struct TriggerBindings {
    targets: SmallVec<[EntityId; 8]>,
}

impl TriggerBindings {
    pub fn new(targets: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// One trigger per entity, in configuration order.
    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(scene.entities().iter().map(|e| e.id()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[inline]
    pub fn target(&self, index: usize) -> Option<EntityId> {
        self.targets.get(index).copied()
    }

    /// Show the trigger's entity and hide every other bound entity.
    ///
    /// Unloaded entities are skipped; their errors are returned alongside the
    /// shown id so the caller can log them.
    pub fn activate(
        &self,
        index: usize,
        scene: &mut Scene,
    ) -> Option<(EntityId, Vec<(EntityId, EntityError)>)> {
        let chosen = self.target(index)?;
        let mut skipped = Vec::new();
        if let Err(e) = scene.show(chosen) {
            skipped.push((chosen, e));
        }
        for &other in self.targets.iter().filter(|id| **id != chosen) {
            if let Err(e) = scene.hide(other) {
                skipped.push((other, e));
            }
        }
        log::info!("[ui] trigger {} -> {}", index, scene.entity(chosen).map_or("?", |e| e.name()));
        Some((chosen, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_offset_is_centred_and_y_up() {
        let p = PointerOffset::from_client(0.0, 0.0, 800.0, 600.0);
        assert_eq!(p, PointerOffset { x: -0.5, y: 0.5 });
        let c = PointerOffset::from_client(400.0, 300.0, 800.0, 600.0);
        assert_eq!(c, PointerOffset::default());
        assert_eq!(
            PointerOffset::from_client(10.0, 10.0, 0.0, 0.0),
            PointerOffset::default()
        );
    }

    #[test]
    fn out_of_range_trigger_is_ignored() {
        let bindings = TriggerBindings::new([0, 1]);
        assert_eq!(bindings.target(2), None);
        assert_eq!(bindings.len(), 2);
    }
}
