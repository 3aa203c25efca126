use crate::entity::EntityId;
use smallvec::SmallVec;

/// Point clouds currently attached to the scene, in attach order.
///
/// Attaching an already attached entity is a no-op, so an entity's cloud can
/// never be drawn twice.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    attached: SmallVec<[EntityId; 8]>,
}

impl SceneGraph {
    pub fn attach(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.attached.push(id);
        true
    }

    pub fn detach(&mut self, id: EntityId) -> bool {
        let before = self.attached.len();
        self.attached.retain(|e| *e != id);
        before != self.attached.len()
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.attached.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.attached.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn clear(&mut self) {
        self.attached.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_is_idempotent() {
        let mut g = SceneGraph::default();
        assert!(g.attach(2));
        assert!(!g.attach(2));
        assert_eq!(g.len(), 1);
        assert!(g.detach(2));
        assert!(!g.detach(2));
        assert!(g.is_empty());
    }
}
