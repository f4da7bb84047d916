//! Trigger tokens and the latch that turns token changes into trigger requests.
//!
//! Hosts that cannot call `trigger_*` directly (e.g. a page that bumps a
//! counter per button click and re-renders) hand the controller their current
//! token each frame. A request fires only when the token differs from the last
//! one observed.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TriggerToken(pub u64);

/// Monotonic allocator for hosts that want the controller to mint tokens.
#[derive(Default, Debug)]
pub struct TokenAllocator {
    next: u64,
}

impl TokenAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> TriggerToken {
        let id = TriggerToken(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Remembers the last observed token for one motion kind.
#[derive(Default, Debug, Clone)]
pub struct TriggerLatch {
    last: Option<TriggerToken>,
}

impl TriggerLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `token` and report whether it is a new request. `None` never
    /// fires. A new token is consumed here whether or not the motion accepts it.
    pub fn observe(&mut self, token: Option<TriggerToken>) -> bool {
        if token == self.last {
            return false;
        }
        self.last = token;
        token.is_some()
    }

    #[inline]
    pub fn last(&self) -> Option<TriggerToken> {
        self.last
    }
}
