use std::cell::Cell;
use std::rc::Rc;

use crate::entity::EntityId;

/// Shared flag checked by an in-flight load before it touches entity state.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Handle for one asset load request. Completions are only accepted if the
/// ticket is the entity's latest and has not been cancelled.
#[derive(Clone, Debug)]
pub struct LoadTicket {
    pub entity: EntityId,
    pub generation: u64,
    pub source: String,
    token: CancellationToken,
}

impl LoadTicket {
    pub(crate) fn new(entity: EntityId, generation: u64, source: String) -> Self {
        Self {
            entity,
            generation,
            source,
            token: CancellationToken::new(),
        }
    }

    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation() {
        let ticket = LoadTicket::new(0, 1, "a.glb".into());
        let in_flight = ticket.clone();
        assert!(!in_flight.is_cancelled());
        ticket.cancel();
        assert!(in_flight.is_cancelled());
    }
}
