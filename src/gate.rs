//! Loading-state gate.
//!
//! Shows a poster overlay until enough frames have resolved to make scrubbing meaningful. The
//! `Loading -> Ready` transition happens once and is permanent, even if later frames fail.

/// Presentation state of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateState {
    Loading,
    Ready,
}

/// Result of feeding a resolved count to the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateUpdate {
    /// Still below the threshold.
    Loading,
    /// The threshold was reached by this update.
    BecameReady,
    /// Was already ready.
    Ready,
}

#[derive(Clone, Debug)]
pub struct LoadingGate {
    state: GateState,
    threshold: usize,
    poster: String,
}

impl LoadingGate {
    pub fn new(threshold: usize, poster: impl Into<String>) -> Self {
        Self {
            state: GateState::Loading,
            threshold,
            poster: poster.into(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Poster path to show above the surface, while loading.
    pub fn overlay(&self) -> Option<&str> {
        match self.state {
            GateState::Loading => Some(&self.poster),
            GateState::Ready => None,
        }
    }

    /// Feed the current resolved count.
    pub fn observe(&mut self, resolved: usize) -> GateUpdate {
        match self.state {
            GateState::Ready => GateUpdate::Ready,
            GateState::Loading if resolved >= self.threshold => {
                self.state = GateState::Ready;
                tracing::info!(
                    resolved,
                    threshold = self.threshold,
                    "player ready; overlay removed"
                );
                GateUpdate::BecameReady
            }
            GateState::Loading => GateUpdate::Loading,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/gate/gate.rs"]
mod tests;
