//! hashprobe CLI
//!
//! ```sh
//! # Same as the hash-probe binary: verify the stored hash, hash a sample
//! hashprobe check
//!
//! # Verify an arbitrary pair
//! hashprobe verify --password 'Al3m4nJ=' --hash '$2b$12$...'
//!
//! # Generate a hash with a custom cost
//! hashprobe hash test123 --cost 10
//!
//! # Show the fields of a stored hash
//! hashprobe --json inspect '$2b$12$...'
//!
//! # Write a config file with the defaults
//! hashprobe --config ./hash-probe.toml init-config
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, error, info, warn};

use hashprobe::config::{default_config_path, AppConfig};
use hashprobe::crypto::needs_rehash;
use hashprobe::error::ConfigError;
use hashprobe::probe::Verification;
use hashprobe::report;
use hashprobe::{init_tracing, BcryptHasher, ConfiguredHasher, PasswordHasher, Probe, StoredHash};

/// bcrypt password hash verification and generation tool.
#[derive(Parser, Debug)]
#[command(
    name = "hashprobe",
    version,
    about = "Verify, generate and inspect bcrypt password hashes",
    long_about = "Verify a password against a stored bcrypt hash, check that \
                  hash generation works, and inspect encoded hashes.\n\n\
                  Default config: ~/.config/hash-probe/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "HASH_PROBE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Print `check` and `inspect` results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Verify the configured password, then hash the sample password (default).
    Check {
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        stored_hash: Option<String>,
        #[arg(long)]
        sample: Option<String>,
    },
    /// Check a password against an encoded hash.
    Verify {
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        hash: String,
    },
    /// Hash a password with a fresh random salt.
    Hash {
        password: String,
        /// Cost factor (4..=31).
        #[arg(long)]
        cost: Option<u32>,
        /// Version tag of the output (2a, 2b, 2y).
        #[arg(long)]
        scheme: Option<String>,
    },
    /// Print the version, cost, salt and digest of an encoded hash.
    Inspect { hash: String },
    /// Write the default configuration to the config path.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config.logging);

    match loaded {
        Ok(_) => debug!("Configuration loaded from {}", config_path.display()),
        Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config at {}, using defaults", config_path.display())
        }
        Err(e) => warn!(
            "Failed to load config from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    let command = cli.command.unwrap_or(Command::Check {
        password: None,
        stored_hash: None,
        sample: None,
    });
    apply_overrides(&mut config, &command);

    let result = run(command, &config, &config_path, cli.json);
    if let Err(ref e) = result {
        error!("{}", e);
    }
    result
}

/// Fold subcommand flags into the loaded configuration.
fn apply_overrides(config: &mut AppConfig, command: &Command) {
    match command {
        Command::Check {
            password,
            stored_hash,
            sample,
        } => {
            if let Some(p) = password {
                config.probe.password = p.clone();
            }
            if let Some(h) = stored_hash {
                config.probe.stored_hash = h.clone();
            }
            if let Some(s) = sample {
                config.probe.sample_password = s.clone();
            }
        }
        Command::Hash { cost, scheme, .. } => {
            if let Some(cost) = cost {
                info!("CLI override: cost = {}", cost);
                config.hashing.cost = *cost;
            }
            if let Some(scheme) = scheme {
                info!("CLI override: scheme = {}", scheme);
                config.hashing.version = scheme.clone();
            }
        }
        Command::Verify { .. } | Command::Inspect { .. } | Command::InitConfig { .. } => {}
    }
}

fn run(
    command: Command,
    config: &AppConfig,
    config_path: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let hasher = ConfiguredHasher::new(config.hashing.clone());

    match command {
        Command::Check { .. } => {
            let probe = Probe::new(hasher, config.probe.clone());
            let result = probe.run()?;
            if json {
                println!("{}", report::render_json(&result, config.probe.preview_len));
            } else {
                for line in report::render_lines(&result, config.probe.preview_len) {
                    println!("{}", line);
                }
            }
        }
        Command::Verify { password, hash } => {
            let matched = hasher.verify(&password, &hash)?;
            println!("{}", report::verification_line(&Verification { password, matched }));
        }
        Command::Hash { password, .. } => {
            println!("{}", hasher.hash(&password)?);
        }
        Command::Inspect { hash } => {
            let stored = StoredHash::parse(&hash)?;
            let current = hasher.generator().unwrap_or_else(|e| {
                warn!("Invalid [hashing] config ({}), comparing against defaults", e);
                BcryptHasher::default()
            });
            let stale = needs_rehash(&stored, &current);
            if json {
                println!("{}", report::inspect_json(&stored, stale));
            } else {
                for line in report::inspect_lines(&stored, stale) {
                    println!("{}", line);
                }
            }
        }
        Command::InitConfig { force } => {
            if config_path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                )
                .into());
            }
            AppConfig::default().save(config_path)?;
            println!("Wrote default configuration to {}", config_path.display());
        }
    }

    Ok(())
}
