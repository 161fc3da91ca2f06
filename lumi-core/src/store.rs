//! Durable filter configuration.
//!
//! The file is a flat `key=value` record, compatible with `settings.txt`
//! files written by earlier releases:
//!
//! ```text
//! initial_gamma=1.0,1.0,1.0
//! slider_value=50
//! filter_type=neutral
//! ```

use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::error::FilterError;
use crate::gamma::GammaTriple;
use crate::state::{FilterMode, FilterState, validate_intensity};

const KEY_INITIAL_GAMMA: &str = "initial_gamma";
const KEY_SLIDER_VALUE: &str = "slider_value";
const KEY_FILTER_TYPE: &str = "filter_type";

/// Everything that survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PersistedConfig {
    /// The display gamma before any adjustment. Written once.
    pub original_gamma: Option<GammaTriple>,
    /// The last applied filter position.
    pub state: FilterState,
}

impl PersistedConfig {
    /// Parse the stored record, recovering from malformed fields.
    ///
    /// A bad `initial_gamma` is dropped; a bad `slider_value` or
    /// `filter_type` resets the whole state to its default. Neither affects
    /// the other, so a damaged state line never loses the captured original.
    pub fn parse(contents: &str) -> Self {
        let mut original_gamma = None;
        let mut mode = None;
        let mut intensity = None;
        let mut state_corrupt = false;

        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("{}", corrupt(lineno, "expected key=value"));
                continue;
            };

            match key.trim() {
                KEY_INITIAL_GAMMA => match value.parse::<GammaTriple>() {
                    Ok(gamma) => original_gamma = Some(gamma),
                    Err(e) => warn!("line {}: {e}; original gamma dropped", lineno + 1),
                },
                KEY_SLIDER_VALUE => match value.trim().parse::<i32>() {
                    Ok(v) => match validate_intensity(v) {
                        Ok(v) => intensity = Some(v),
                        Err(e) => {
                            warn!("{}", corrupt(lineno, &e.to_string()));
                            state_corrupt = true;
                        }
                    },
                    Err(e) => {
                        warn!("{}", corrupt(lineno, &format!("slider value: {e}")));
                        state_corrupt = true;
                    }
                },
                KEY_FILTER_TYPE => match value.parse::<FilterMode>() {
                    Ok(m) => mode = Some(m),
                    Err(e) => {
                        warn!("line {}: {e}", lineno + 1);
                        state_corrupt = true;
                    }
                },
                other => debug!("ignoring unknown config key '{other}'"),
            }
        }

        let defaults = FilterState::default();
        let state = if state_corrupt {
            warn!("stored filter state is corrupt; using defaults");
            defaults
        } else {
            FilterState {
                mode: mode.unwrap_or(defaults.mode),
                intensity: intensity.unwrap_or(defaults.intensity),
            }
        };

        Self {
            original_gamma,
            state,
        }
    }

    /// Render the record in its on-disk form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(gamma) = self.original_gamma {
            out.push_str(&format!("{KEY_INITIAL_GAMMA}={gamma}\n"));
        }
        out.push_str(&format!("{KEY_SLIDER_VALUE}={}\n", self.state.intensity));
        out.push_str(&format!("{KEY_FILTER_TYPE}={}\n", self.state.mode));
        out
    }
}

fn corrupt(lineno: usize, reason: &str) -> FilterError {
    FilterError::ConfigCorrupt(format!("line {}: {reason}", lineno + 1))
}

/// File-backed store for [`PersistedConfig`].
///
/// Every write replaces the file atomically: the new record goes to a
/// temporary file in the same directory, which is synced and then renamed
/// over the old one.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored configuration, or defaults if there is none.
    ///
    /// Read and parse failures are logged and recovered from, never returned.
    pub fn load_or_init(&self) -> PersistedConfig {
        match self.read() {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!(
                    "no configuration found at {}; default settings applied",
                    self.path.display()
                );
                PersistedConfig::default()
            }
            Err(e) => {
                warn!(
                    "{}; default settings applied",
                    FilterError::ConfigCorrupt(format!("{}: {e}", self.path.display()))
                );
                PersistedConfig::default()
            }
        }
    }

    /// Record the display's original gamma, unless one is already stored.
    ///
    /// Only a missing file, or one without a usable `initial_gamma`, counts
    /// as having no original. Returns the original now on disk: `gamma`, or
    /// the one captured earlier.
    ///
    /// # Errors
    /// Returns [`FilterError::Storage`] if the existing record cannot be read
    /// or the new one cannot be written. Nothing is written in the first case.
    pub fn capture_original(&self, gamma: GammaTriple) -> Result<GammaTriple, FilterError> {
        let mut config = self.read_for_update()?;
        if let Some(existing) = config.original_gamma {
            debug!("original gamma already captured ({existing}); keeping it");
            return Ok(existing);
        }

        config.original_gamma = Some(gamma);
        self.write(&config)?;
        info!("captured original gamma {gamma}");
        Ok(gamma)
    }

    /// Store `state`, keeping the captured original untouched.
    ///
    /// # Errors
    /// Returns [`FilterError::Storage`] if the existing record cannot be read
    /// or the new one cannot be written. Nothing is written in the first case.
    pub fn save_state(&self, state: FilterState) -> Result<(), FilterError> {
        let mut config = self.read_for_update()?;
        config.state = state;
        self.write(&config)
    }

    /// `Ok(None)` only when the file does not exist.
    fn read(&self) -> io::Result<Option<PersistedConfig>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let contents = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = contents {
            warn!(
                "{} contains invalid UTF-8; affected lines are ignored",
                self.path.display()
            );
        }
        Ok(Some(PersistedConfig::parse(&contents)))
    }

    /// Read the record a write will be based on, refusing to guess.
    fn read_for_update(&self) -> Result<PersistedConfig, FilterError> {
        self.read()
            .map(Option::unwrap_or_default)
            .map_err(|source| FilterError::Storage {
                path: self.path.clone(),
                source,
            })
    }

    fn write(&self, config: &PersistedConfig) -> Result<(), FilterError> {
        let storage = |source: io::Error| FilterError::Storage {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(storage)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(storage)?;
        tmp.write_all(config.render().as_bytes()).map_err(storage)?;
        tmp.as_file().sync_all().map_err(storage)?;
        tmp.persist(&self.path).map_err(|e| storage(e.error))?;

        debug!("wrote configuration to {}", self.path.display());
        Ok(())
    }
}
