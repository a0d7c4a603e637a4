//! Two-step bcrypt probe
//!
//! Verifies a password against a stored hash, then hashes a sample string
//! to confirm the primitive works. A verification error is returned to the
//! caller. A hash-generation error is kept in the report.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ProbeConfig;
use crate::crypto::password::PasswordHasher;
use crate::error::{PasswordError, PasswordResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub password: String,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHash {
    pub encoded: String,
}

impl GeneratedHash {
    /// First `len` characters followed by `...`
    pub fn preview(&self, len: usize) -> String {
        let head: String = self.encoded.chars().take(len).collect();
        format!("{}...", head)
    }
}

#[derive(Debug)]
pub struct ProbeReport {
    pub verification: Verification,
    pub generation: PasswordResult<GeneratedHash>,
}

pub struct Probe<H> {
    hasher: H,
    config: ProbeConfig,
}

impl<H: PasswordHasher> Probe<H> {
    pub fn new(hasher: H, config: ProbeConfig) -> Self {
        Self { hasher, config }
    }

    pub fn verify(&self) -> PasswordResult<Verification> {
        let matched = self
            .hasher
            .verify(&self.config.password, &self.config.stored_hash)?;
        info!(matched, "Stored hash verified");
        Ok(Verification {
            password: self.config.password.clone(),
            matched,
        })
    }

    pub fn generate(&self) -> PasswordResult<GeneratedHash> {
        let encoded = self.hasher.hash(&self.config.sample_password)?;
        info!("Sample hash generated");
        Ok(GeneratedHash { encoded })
    }

    /// Run both steps. Only a verification failure is an `Err`.
    pub fn run(&self) -> Result<ProbeReport, PasswordError> {
        let verification = self.verify()?;

        let generation = self.generate();
        if let Err(ref e) = generation {
            warn!(error = %e, "Hash generation failed");
        }

        Ok(ProbeReport {
            verification,
            generation,
        })
    }
}
