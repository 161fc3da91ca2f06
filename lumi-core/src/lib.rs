//! Warm/cool color temperature filter for a single display.
//!
//! This crate maps a user-facing filter position (mode and intensity) to an
//! RGB gamma triple, applies it to a display through a [`GammaBackend`], and
//! keeps the chosen position and the display's original gamma on disk so the
//! filter survives restarts and the original calibration can be restored.
//!
//! # Requirements
//!
//! - An X11 session with the `xrandr` utility, for [`XrandrBackend`]
//!
//! # Example
//!
//! ```no_run
//! use lumi_core::{FilterConfig, FilterController, FilterMode, XrandrBackend};
//!
//! fn main() -> Result<(), lumi_core::FilterError> {
//!     // Captures the original gamma on first run, then applies the stored state
//!     let mut controller = FilterController::new(FilterConfig::from_env(), XrandrBackend::new())?;
//!
//!     controller.set_mode(FilterMode::Warm)?;
//!     controller.set_intensity(40)?;
//!
//!     let state = controller.state();
//!     println!("Color temperature: {}% ({})", state.intensity, state.mode);
//!
//!     // Back to the calibration the display had before the first adjustment
//!     controller.restore_original()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockBackend`] to test code without a display:
//!
//! ```
//! use lumi_core::{FilterConfig, FilterController, FilterMode, GammaTriple, MockBackend};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = FilterConfig::new("DP-1", dir.path().join("settings.txt"));
//! let mut controller = FilterController::new(config, MockBackend::new()).unwrap();
//!
//! controller.set_mode(FilterMode::Cool).unwrap();
//! controller.set_intensity(100).unwrap();
//! assert_eq!(controller.backend().current(), GammaTriple::new(0.3, 0.5, 1.0));
//! ```

#![warn(missing_docs)]

mod backend;
mod config;
mod controller;
mod error;
mod gamma;
mod mock;
mod state;
mod store;
mod temperature;

// Re-export public API
pub use backend::{GammaBackend, XrandrBackend, parse_verbose_gamma};
pub use config::{CONFIG_ENV, CONFIG_FILE_NAME, DEFAULT_DISPLAY, DISPLAY_ENV, FilterConfig};
pub use controller::FilterController;
pub use error::{BackendError, FilterError};
pub use gamma::GammaTriple;
pub use mock::MockBackend;
pub use state::{DEFAULT_INTENSITY, FilterMode, FilterState, MAX_INTENSITY, MIN_INTENSITY};
pub use store::{ConfigStore, PersistedConfig};
pub use temperature::compute;
