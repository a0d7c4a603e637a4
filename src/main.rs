//! hash-probe
//!
//! Verifies the configured password against the stored bcrypt hash, then
//! hashes a sample string to check that bcrypt works. Prints one line for
//! each step. Reads ~/.config/hash-probe/config.toml when present
//! (override with HASH_PROBE_CONFIG).

use tracing::{debug, error, warn};

use hashprobe::config::{config_path_from_env, AppConfig};
use hashprobe::error::ConfigError;
use hashprobe::report::render_lines;
use hashprobe::{init_tracing, ConfiguredHasher, Probe};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = config_path_from_env();
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg.logging);
            debug!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            let cfg = AppConfig::default();
            init_tracing(&cfg.logging);
            debug!("No config at {}, using defaults", config_path.display());
            cfg
        }
        Err(e) => {
            let cfg = AppConfig::default();
            init_tracing(&cfg.logging);
            warn!(
                "Failed to load config from {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            cfg
        }
    };

    // [hashing] only affects generation; a bad section ends up in the report
    let hasher = ConfiguredHasher::new(app_cfg.hashing.clone());
    let probe = Probe::new(hasher, app_cfg.probe.clone());

    let report = match probe.run() {
        Ok(report) => report,
        Err(e) if e.is_format_error() => {
            error!("Stored hash is malformed: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            error!("Verification failed: {}", e);
            return Err(e.into());
        }
    };

    for line in render_lines(&report, app_cfg.probe.preview_len) {
        println!("{}", line);
    }

    Ok(())
}
