use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lumi_core::{
    ConfigStore, FilterConfig, FilterController, FilterMode, FilterState, GammaBackend,
    XrandrBackend, compute,
};

/// Warm/cool color temperature filter for one display.
///
/// Commands that change the display first re-apply the stored filter,
/// capturing the display's original gamma on the very first run. `status`
/// and `preview` never touch the display.
#[derive(Debug, Parser)]
#[command(name = "lumi", version)]
struct Cli {
    /// Display (xrandr output) to adjust [env: LUMI_DISPLAY] [default: DP-1]
    #[arg(long)]
    display: Option<String>,

    /// Settings file [env: LUMI_CONFIG] [default: <config dir>/lumi/settings.txt]
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Flags win over whatever `base` was built from.
    fn filter_config(&self, base: FilterConfig) -> FilterConfig {
        FilterConfig {
            display: self.display.clone().unwrap_or(base.display),
            config_path: self.config.clone().unwrap_or(base.config_path),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the stored filter and the display's original gamma.
    Status,
    /// Set the tint intensity (0-100).
    Intensity {
        #[arg(allow_negative_numbers = true)]
        value: i32,
    },
    /// Set the tint direction: neutral, warm or cool.
    Mode { mode: FilterMode },
    /// Put the display back to its original gamma, keeping the stored filter.
    Restore,
    /// Re-apply the stored filter.
    Apply,
    /// Print the gamma a filter position maps to, without touching the display.
    Preview {
        mode: FilterMode,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        intensity: u8,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.filter_config(FilterConfig::from_env());
    run(cli.command, config, XrandrBackend::new, &mut io::stdout().lock())
}

/// Execute `command`. The backend is only built for commands that drive the display.
fn run<B, F>(
    command: Command,
    config: FilterConfig,
    backend: F,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    B: GammaBackend,
    F: FnOnce() -> B,
{
    match command {
        Command::Preview { mode, intensity } => {
            writeln!(out, "{}", compute(mode, intensity).to_xrandr_arg())?;
            Ok(())
        }
        Command::Status => status(&config, out),
        command => {
            let controller = FilterController::new(config, backend())
                .context("failed to start the filter")?;
            drive(command, controller, out)
        }
    }
}

fn status(config: &FilterConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let stored = ConfigStore::new(&config.config_path).load_or_init();

    writeln!(out, "display:  {}", config.display)?;
    writeln!(out, "settings: {}", config.config_path.display())?;
    print_state(out, stored.state)?;
    writeln!(out, "gamma:    {}", stored.state.gamma().to_xrandr_arg())?;
    match stored.original_gamma {
        Some(original) => writeln!(out, "original: {}", original.to_xrandr_arg())?,
        None => writeln!(out, "original: not captured")?,
    }
    Ok(())
}

fn drive<B: GammaBackend>(
    command: Command,
    mut controller: FilterController<B>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Intensity { value } => {
            controller
                .set_intensity(value)
                .context("failed to set intensity")?;
            print_state(out, controller.state())
        }
        Command::Mode { mode } => {
            controller.set_mode(mode).context("failed to set mode")?;
            print_state(out, controller.state())
        }
        Command::Restore => {
            let original = controller
                .restore_original()
                .context("failed to restore the original gamma")?;
            writeln!(out, "Reset original gamma ({})", original.to_xrandr_arg())?;
            Ok(())
        }
        Command::Apply => {
            controller.reapply().context("failed to apply the filter")?;
            print_state(out, controller.state())
        }
        Command::Status | Command::Preview { .. } => {
            unreachable!("handled without a controller")
        }
    }
}

fn print_state(out: &mut impl Write, state: FilterState) -> anyhow::Result<()> {
    writeln!(out, "Color temperature: {}% ({})", state.intensity, state.mode)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumi_core::{FilterError, GammaTriple, MockBackend};
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> FilterConfig {
        FilterConfig::new("DP-1", dir.path().join("settings.txt"))
    }

    fn run_to_string<F>(command: Command, config: FilterConfig, backend: F) -> anyhow::Result<String>
    where
        F: FnOnce() -> MockBackend,
    {
        let mut out = Vec::new();
        run(command, config, backend, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn no_display() -> MockBackend {
        panic!("command must not touch the display")
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["lumi", "mode", "warm"]).unwrap();
        assert!(matches!(cli.command, Command::Mode { mode: FilterMode::Warm }));

        let cli = Cli::try_parse_from(["lumi", "intensity", "-5"]).unwrap();
        assert!(matches!(cli.command, Command::Intensity { value: -5 }));

        let cli = Cli::try_parse_from(["lumi", "preview", "cool", "100"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Preview { mode: FilterMode::Cool, intensity: 100 }
        ));

        assert!(Cli::try_parse_from(["lumi", "preview", "cool", "101"]).is_err());
        assert!(Cli::try_parse_from(["lumi"]).is_err());
    }

    #[test]
    fn test_unknown_mode_message() {
        let err = Cli::try_parse_from(["lumi", "mode", "sepia"]).unwrap_err();
        assert!(err.to_string().contains("Invalid filter mode 'sepia'"));
    }

    #[test]
    fn test_flags_override_base_config() {
        let base = FilterConfig::new("DP-1", "/base/settings.txt");

        let cli = Cli::try_parse_from(["lumi", "status"]).unwrap();
        assert_eq!(cli.filter_config(base.clone()), base);

        let cli = Cli::try_parse_from([
            "lumi", "--display", "HDMI-1", "--config", "/tmp/lumi.txt", "status",
        ])
        .unwrap();
        assert_eq!(
            cli.filter_config(base),
            FilterConfig::new("HDMI-1", "/tmp/lumi.txt")
        );
    }

    #[test]
    fn test_status_reads_without_touching_display() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let store = ConfigStore::new(&config.config_path);
        store.capture_original(GammaTriple::new(1.0, 0.9, 0.8)).unwrap();
        store
            .save_state(FilterState {
                mode: FilterMode::Warm,
                intensity: 50,
            })
            .unwrap();
        let before = std::fs::read(&config.config_path).unwrap();

        let output = run_to_string(Command::Status, config.clone(), no_display).unwrap();

        assert!(output.contains("Color temperature: 50% (warm)"));
        assert!(output.contains("gamma:    1:0.75:0.5"));
        assert!(output.contains("original: 1:0.9:0.8"));
        assert_eq!(std::fs::read(&config.config_path).unwrap(), before);
    }

    #[test]
    fn test_status_before_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let output = run_to_string(Command::Status, config.clone(), no_display).unwrap();

        assert!(output.contains("Color temperature: 50% (neutral)"));
        assert!(output.contains("original: not captured"));
        assert!(!config.config_path.exists());
    }

    #[test]
    fn test_preview_needs_no_display() {
        let dir = tempfile::tempdir().unwrap();
        let command = Command::Preview {
            mode: FilterMode::Cool,
            intensity: 100,
        };

        let output = run_to_string(command, config_in(&dir), no_display).unwrap();
        assert_eq!(output, "0.3:0.5:1\n");
    }

    #[test]
    fn test_mode_and_intensity_are_stored() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let output = run_to_string(
            Command::Mode {
                mode: FilterMode::Cool,
            },
            config.clone(),
            MockBackend::new,
        )
        .unwrap();
        assert_eq!(output, "Color temperature: 50% (cool)\n");

        let output =
            run_to_string(Command::Intensity { value: 80 }, config.clone(), MockBackend::new)
                .unwrap();
        assert_eq!(output, "Color temperature: 80% (cool)\n");

        let stored = ConfigStore::new(&config.config_path).load_or_init();
        assert_eq!(stored.state.mode, FilterMode::Cool);
        assert_eq!(stored.state.intensity, 80);
        assert_eq!(stored.original_gamma, Some(GammaTriple::IDENTITY));
    }

    #[test]
    fn test_invalid_intensity_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let err = run_to_string(Command::Intensity { value: 150 }, config.clone(), MockBackend::new)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FilterError>(),
            Some(FilterError::InvalidArgument { value: 150, .. })
        ));
        assert_eq!(
            ConfigStore::new(&config.config_path).load_or_init().state,
            FilterState::default()
        );
    }

    #[test]
    fn test_restore_reports_original() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let output = run_to_string(Command::Restore, config, || {
            MockBackend::with_gamma(GammaTriple::new(1.0, 0.9, 0.8))
        })
        .unwrap();
        assert_eq!(output, "Reset original gamma (1:0.9:0.8)\n");
    }

    #[test]
    fn test_restore_without_original_fails() {
        let dir = tempfile::tempdir().unwrap();

        let err = run_to_string(Command::Restore, config_in(&dir), || {
            let backend = MockBackend::new();
            backend.fail_get(true);
            backend
        })
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FilterError>(),
            Some(FilterError::OriginalUnavailable)
        ));
    }
}
