//! One-shot gate for the access-point discovery signal.
//!
//! NetworkManager may deliver `AccessPointAdded` more than once (one per new
//! BSS, and duplicate deliveries are possible). A provisioning attempt only
//! wants to react to the first one.

use log::warn;

/// States of a discovery wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Not armed; events are ignored.
    Idle,
    /// Armed; the next event passes.
    AwaitingDiscovery,
    /// An event has passed; later events are ignored.
    Done,
}

/// Lets exactly one discovery event through per arming.
///
/// # Example
///
/// ```rust
/// use qrwifi::{DiscoveryGate, GateState};
///
/// let mut gate = DiscoveryGate::new();
/// gate.arm();
/// assert!(gate.fire());
/// assert!(!gate.fire());
/// assert_eq!(gate.state(), GateState::Done);
/// assert_eq!(gate.ignored(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryGate {
    state: GateState,
    ignored: u32,
}

impl Default for DiscoveryGate {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryGate {
    /// Creates an unarmed gate.
    pub fn new() -> Self {
        Self {
            state: GateState::Idle,
            ignored: 0,
        }
    }

    /// Arms the gate for a new provisioning attempt.
    pub fn arm(&mut self) {
        self.state = GateState::AwaitingDiscovery;
        self.ignored = 0;
    }

    /// Records an event. Returns true only for the first event after arming.
    pub fn fire(&mut self) -> bool {
        match self.state {
            GateState::AwaitingDiscovery => {
                self.state = GateState::Done;
                true
            }
            GateState::Idle | GateState::Done => {
                self.ignored += 1;
                warn!("Ignoring discovery event in state {:?}", self.state);
                false
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Returns true once an event has passed.
    pub fn is_done(&self) -> bool {
        self.state == GateState::Done
    }

    /// Number of events ignored since the last arming.
    pub fn ignored(&self) -> u32 {
        self.ignored
    }
}
