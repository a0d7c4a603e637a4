//! # hash-probe
//!
//! Checks a plaintext password against a stored bcrypt hash and confirms
//! that bcrypt hash generation works.
//!
//! - **crypto**: hash format parsing, `PasswordHasher` and `BcryptHasher`
//! - **probe**: the verify-then-generate run
//! - **report**: stdout rendering of probe results
//! - **config**: optional TOML configuration
//! - **telemetry**: tracing setup

pub mod config;
pub mod crypto;
pub mod error;
pub mod probe;
pub mod report;
pub mod telemetry;

pub use config::{config_path_from_env, default_config_path, AppConfig};
pub use crypto::{BcryptHasher, ConfiguredHasher, PasswordHasher, SchemeVersion, StoredHash};
pub use error::{ConfigError, PasswordError};
pub use probe::{Probe, ProbeReport};
pub use telemetry::init_tracing;
