//! Mock backend for testing.

use std::sync::Mutex;

use crate::backend::GammaBackend;
use crate::error::BackendError;
use crate::gamma::GammaTriple;

#[derive(Debug)]
struct MockState {
    gamma: GammaTriple,
    applied: Vec<GammaTriple>,
    fail_get: bool,
    fail_set: bool,
}

/// A mock gamma backend for testing.
///
/// This allows testing code that depends on [`GammaBackend`] without a
/// display. The mock serves any display name, remembers the last gamma set,
/// and records every successful [`set_gamma`](GammaBackend::set_gamma) call.
///
/// # Example
///
/// ```
/// use lumi_core::{GammaBackend, GammaTriple, MockBackend};
///
/// let mock = MockBackend::new();
/// mock.set_gamma("DP-1", GammaTriple::new(1.0, 0.75, 0.5)).unwrap();
/// assert_eq!(mock.get_gamma("DP-1").unwrap(), GammaTriple::new(1.0, 0.75, 0.5));
/// assert_eq!(mock.applied().len(), 1);
/// ```
#[derive(Debug)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    /// Create a mock whose display starts at the identity gamma.
    pub fn new() -> Self {
        Self::with_gamma(GammaTriple::IDENTITY)
    }

    /// Create a mock whose display starts at `gamma`.
    pub fn with_gamma(gamma: GammaTriple) -> Self {
        Self {
            state: Mutex::new(MockState {
                gamma,
                applied: Vec::new(),
                fail_get: false,
                fail_set: false,
            }),
        }
    }

    /// Make subsequent queries fail (or succeed again).
    pub fn fail_get(&self, fail: bool) {
        self.lock().fail_get = fail;
    }

    /// Make subsequent sets fail (or succeed again).
    pub fn fail_set(&self, fail: bool) {
        self.lock().fail_set = fail;
    }

    /// The gamma the display is currently at.
    pub fn current(&self) -> GammaTriple {
        self.lock().gamma
    }

    /// Every gamma successfully set, oldest first.
    pub fn applied(&self) -> Vec<GammaTriple> {
        self.lock().applied.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaBackend for MockBackend {
    fn get_gamma(&self, display: &str) -> Result<GammaTriple, BackendError> {
        let state = self.lock();
        if state.fail_get {
            return Err(BackendError::Unavailable(format!("query of {display} failed")));
        }
        Ok(state.gamma)
    }

    fn set_gamma(&self, display: &str, gamma: GammaTriple) -> Result<(), BackendError> {
        let mut state = self.lock();
        if state.fail_set {
            return Err(BackendError::Unavailable(format!("set of {display} failed")));
        }
        state.gamma = gamma;
        state.applied.push(gamma);
        Ok(())
    }
}
