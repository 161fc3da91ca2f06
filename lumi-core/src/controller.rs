//! Color temperature filter controller.

use log::{debug, info, warn};

use crate::backend::GammaBackend;
use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::gamma::GammaTriple;
use crate::state::{FilterMode, FilterState, validate_intensity};
use crate::store::ConfigStore;

/// Drives one display's gamma from a [`FilterState`].
///
/// Owns the in-memory state; the [`ConfigStore`] owns what is on disk. Every
/// change is computed, applied to the display, and only then persisted, so
/// the stored state never gets ahead of the display.
///
/// # Example
///
/// ```
/// use lumi_core::{FilterConfig, FilterController, FilterMode, GammaTriple, MockBackend};
///
/// let dir = tempfile::tempdir()?;
/// let config = FilterConfig::new("DP-1", dir.path().join("settings.txt"));
/// let mut controller = FilterController::new(config, MockBackend::new())?;
///
/// controller.set_mode(FilterMode::Warm)?;
/// controller.set_intensity(50)?;
/// assert_eq!(controller.backend().current(), GammaTriple::new(1.0, 0.75, 0.5));
///
/// controller.restore_original()?;
/// assert_eq!(controller.backend().current(), GammaTriple::IDENTITY);
/// assert_eq!(controller.state().mode, FilterMode::Warm);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Limitations
///
/// Two controllers on the same display or configuration file are not
/// coordinated; the last writer wins.
#[derive(Debug)]
pub struct FilterController<B: GammaBackend> {
    config: FilterConfig,
    backend: B,
    store: ConfigStore,
    state: FilterState,
    original_gamma: Option<GammaTriple>,
}

impl<B: GammaBackend> FilterController<B> {
    /// Create a ready controller.
    ///
    /// Captures the display's gamma as the original if none is stored yet,
    /// then applies the stored (or default) state. A display that cannot be
    /// queried or set is logged and left alone; the controller is still
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`FilterError::Storage`] if a freshly captured original cannot be written
    pub fn new(config: FilterConfig, backend: B) -> Result<Self, FilterError> {
        let store = ConfigStore::new(&config.config_path);
        let persisted = store.load_or_init();

        let mut controller = Self {
            config,
            backend,
            store,
            state: persisted.state,
            original_gamma: persisted.original_gamma,
        };

        match controller.apply(controller.state) {
            Ok(()) => info!(
                "applied {} filter at {}% to {}",
                controller.state.mode, controller.state.intensity, controller.config.display
            ),
            Err(e @ FilterError::Storage { .. }) => return Err(e),
            Err(e) => warn!("startup adjustment of {} not applied: {}", controller.config.display, e),
        }

        Ok(controller)
    }

    /// Get a snapshot of the current filter state.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// The gamma the current state maps to.
    pub fn current_gamma(&self) -> GammaTriple {
        self.state.gamma()
    }

    /// The captured original gamma, if any.
    pub fn original_gamma(&self) -> Option<GammaTriple> {
        self.original_gamma
    }

    /// The configuration this controller was built from.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The store backing this controller.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Set the tint intensity (0-100).
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidArgument`] if `value` is outside 0-100
    /// - [`FilterError::BackendUnavailable`] if the display could not be adjusted
    /// - [`FilterError::Storage`] if the new state could not be written
    pub fn set_intensity(&mut self, value: i32) -> Result<(), FilterError> {
        let intensity = validate_intensity(value)?;
        self.change(FilterState {
            intensity,
            ..self.state
        })
    }

    /// Set the tint direction.
    ///
    /// # Errors
    ///
    /// - [`FilterError::BackendUnavailable`] if the display could not be adjusted
    /// - [`FilterError::Storage`] if the new state could not be written
    pub fn set_mode(&mut self, mode: FilterMode) -> Result<(), FilterError> {
        self.change(FilterState { mode, ..self.state })
    }

    /// Apply the current state again, e.g. after [`restore_original`](Self::restore_original).
    pub fn reapply(&mut self) -> Result<(), FilterError> {
        self.apply(self.state)
    }

    /// Put the display back to its original gamma.
    ///
    /// The filter state is left as it was, so the next change resumes from
    /// the previous settings.
    ///
    /// # Errors
    ///
    /// - [`FilterError::OriginalUnavailable`] if no original was ever captured
    /// - [`FilterError::BackendUnavailable`] if the display could not be set
    pub fn restore_original(&self) -> Result<GammaTriple, FilterError> {
        let original = self.original_gamma.ok_or(FilterError::OriginalUnavailable)?;
        self.backend.set_gamma(&self.config.display, original)?;
        info!("original gamma {} restored on {}", original, self.config.display);
        Ok(original)
    }

    fn change(&mut self, next: FilterState) -> Result<(), FilterError> {
        self.apply(next)?;
        self.state = next;
        self.store.save_state(next)?;
        info!("filter set to {} at {}%", next.mode, next.intensity);
        Ok(())
    }

    /// Apply `state` to the display, capturing the original first if needed.
    fn apply(&mut self, state: FilterState) -> Result<(), FilterError> {
        self.ensure_original()?;

        let gamma = state.gamma();
        debug!("setting gamma {} on {}", gamma, self.config.display);
        self.backend.set_gamma(&self.config.display, gamma)?;
        Ok(())
    }

    /// No adjustment may reach the display before its original is stored.
    fn ensure_original(&mut self) -> Result<(), FilterError> {
        if self.original_gamma.is_some() {
            return Ok(());
        }

        let gamma = self.backend.get_gamma(&self.config.display)?;
        self.original_gamma = Some(self.store.capture_original(gamma)?);
        Ok(())
    }
}
