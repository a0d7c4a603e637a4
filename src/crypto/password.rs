//! Password hashing utilities

use bcrypt::DEFAULT_COST;
use rand::Rng;
use tracing::debug;

use crate::config::HashingConfig;
use crate::crypto::hash_format::{SchemeVersion, StoredHash, MAX_COST, MIN_COST};
use crate::error::{PasswordError, PasswordResult};

/// bcrypt ignores everything past this many bytes of input
pub const MAX_PASSWORD_BYTES: usize = 72;

/// A one-way password hashing scheme.
pub trait PasswordHasher {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> PasswordResult<String>;

    /// Check `password` against an encoded hash.
    ///
    /// A hash that does not parse is an error, never `Ok(false)`.
    fn verify(&self, password: &str, stored_hash: &str) -> PasswordResult<bool>;
}

/// bcrypt with a fixed cost and output version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcryptHasher {
    cost: u32,
    version: SchemeVersion,
    reject_truncation: bool,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
            version: SchemeVersion::default(),
            reject_truncation: false,
        }
    }
}

impl BcryptHasher {
    pub fn new(cost: u32, version: SchemeVersion) -> PasswordResult<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::InvalidCost(cost));
        }
        if !version.can_generate() {
            return Err(PasswordError::UnsupportedVersion(version.to_string()));
        }
        Ok(Self {
            cost,
            version,
            reject_truncation: false,
        })
    }

    pub fn from_config(config: &HashingConfig) -> PasswordResult<Self> {
        let version: SchemeVersion = config
            .version
            .parse()
            .map_err(|_| PasswordError::UnsupportedVersion(config.version.clone()))?;
        Ok(Self::new(config.cost, version)?.reject_truncation(config.reject_truncation))
    }

    /// Fail on passwords longer than 72 bytes instead of hashing a prefix.
    pub fn reject_truncation(mut self, reject: bool) -> Self {
        self.reject_truncation = reject;
        self
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn version(&self) -> SchemeVersion {
        self.version
    }

    /// Hash with a caller-supplied salt. Same inputs give the same output.
    pub fn hash_with_salt(&self, password: &str, salt: [u8; 16]) -> PasswordResult<String> {
        self.check_length(password)?;

        let parts = bcrypt::hash_with_salt(password, self.cost, salt)?;
        let encoded = parts.format_for_version(self.version.to_bcrypt());

        let parsed = StoredHash::parse(&encoded)
            .map_err(|e| PasswordError::Generation(e.to_string()))?;
        if parsed.cost != self.cost || parsed.version != self.version {
            return Err(PasswordError::Generation(format!(
                "expected ${}${:02}$, got ${}${:02}$",
                self.version, self.cost, parsed.version, parsed.cost
            )));
        }

        Ok(encoded)
    }

    fn check_length(&self, password: &str) -> PasswordResult<()> {
        if self.reject_truncation && password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::PasswordTooLong(password.len()));
        }
        Ok(())
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> PasswordResult<String> {
        let salt: [u8; 16] = rand::thread_rng().gen();
        debug!(cost = self.cost, version = %self.version, "Generating bcrypt hash");
        self.hash_with_salt(password, salt)
    }

    fn verify(&self, password: &str, stored_hash: &str) -> PasswordResult<bool> {
        let parsed = StoredHash::parse(stored_hash)?;
        self.check_length(password)?;

        debug!(cost = parsed.cost, version = %parsed.version, "Verifying password");
        // bcrypt::verify compares digests in constant time
        Ok(bcrypt::verify(password, stored_hash)?)
    }
}

/// Hasher driven by the `[hashing]` config section.
///
/// Verification only needs the parameters embedded in the stored hash, so a
/// bad cost or version in the config fails generation and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfiguredHasher {
    config: HashingConfig,
}

impl ConfiguredHasher {
    pub fn new(config: HashingConfig) -> Self {
        Self { config }
    }

    /// The generation hasher, or the config error that prevents building it.
    pub fn generator(&self) -> PasswordResult<BcryptHasher> {
        BcryptHasher::from_config(&self.config)
    }
}

impl PasswordHasher for ConfiguredHasher {
    fn hash(&self, password: &str) -> PasswordResult<String> {
        self.generator()?.hash(password)
    }

    fn verify(&self, password: &str, stored_hash: &str) -> PasswordResult<bool> {
        BcryptHasher::default()
            .reject_truncation(self.config.reject_truncation)
            .verify(password, stored_hash)
    }
}

/// Whether a stored hash was produced with parameters other than the
/// hasher's current ones.
pub fn needs_rehash(stored: &StoredHash, hasher: &BcryptHasher) -> bool {
    stored.cost != hasher.cost() || stored.version != hasher.version()
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> PasswordResult<String> {
    BcryptHasher::default().hash(password)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> PasswordResult<bool> {
    BcryptHasher::default().verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> BcryptHasher {
        BcryptHasher::new(4, SchemeVersion::TwoB).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast();
        let password = "secure_password_123";
        let hashed = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hashed).unwrap());
        assert!(!hasher.verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_one_character_off() {
        let hasher = fast();
        let hashed = hasher.hash("Al3m4nJ=").unwrap();

        for candidate in ["Al3m4nJ", "al3m4nJ=", "Al3m4nJ==", "Al3m4nK="] {
            assert!(!hasher.verify(candidate, &hashed).unwrap(), "{}", candidate);
        }
    }

    #[test]
    fn test_salt_is_random() {
        let hasher = fast();
        let first = hasher.hash("test123").unwrap();
        let second = hasher.hash("test123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("test123", &first).unwrap());
        assert!(hasher.verify("test123", &second).unwrap());
    }

    #[test]
    fn test_fixed_salt_is_deterministic() {
        let hasher = fast();
        let salt = [7u8; 16];

        let a = hasher.hash_with_salt("test123", salt).unwrap();
        let b = hasher.hash_with_salt("test123", salt).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, hasher.hash_with_salt("test124", salt).unwrap());
    }

    #[test]
    fn test_output_is_self_describing() {
        let hashed = fast().hash("test123").unwrap();
        assert!(hashed.starts_with("$2b$04$"));

        let parsed = StoredHash::parse(&hashed).unwrap();
        assert_eq!(parsed.cost, 4);
        assert_eq!(parsed.version, SchemeVersion::TwoB);
    }

    #[test]
    fn test_version_selection() {
        let hasher = BcryptHasher::new(4, SchemeVersion::TwoY).unwrap();
        let hashed = hasher.hash("test123").unwrap();

        assert!(hashed.starts_with("$2y$04$"));
        // the other revisions verify the same digest
        assert!(fast().verify("test123", &hashed).unwrap());
    }

    #[test]
    fn test_default_cost_prefix() {
        let hashed = hash_password("test123").unwrap();
        assert!(hashed.starts_with("$2b$12$"));
        assert!(verify_password("test123", &hashed).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let hasher = fast();
        let good = hasher.hash("test123").unwrap();

        let truncated = &good[..good.len() - 4];
        assert!(hasher.verify("test123", truncated).unwrap_err().is_format_error());

        let wrong_prefix = good.replacen("$2b$", "$1$$", 1);
        assert!(hasher.verify("test123", &wrong_prefix).unwrap_err().is_format_error());

        assert!(hasher.verify("test123", "not a hash").is_err());
    }

    #[test]
    fn test_known_pair_matches() {
        let stored = crate::config::DEFAULT_STORED_HASH;
        assert!(verify_password("Al3m4nJ=", stored).unwrap());
        assert!(!verify_password("Al3m4nJ", stored).unwrap());
    }

    #[test]
    fn test_configured_hasher_bad_cost() {
        let hasher = ConfiguredHasher::new(HashingConfig {
            cost: 40,
            ..HashingConfig::default()
        });
        let stored = fast().hash("test123").unwrap();

        assert!(hasher.verify("test123", &stored).unwrap());
        assert!(matches!(
            hasher.hash("test123"),
            Err(PasswordError::InvalidCost(40))
        ));
    }

    #[test]
    fn test_configured_hasher_legacy_version() {
        let hasher = ConfiguredHasher::new(HashingConfig {
            cost: 4,
            version: "2x".to_string(),
            reject_truncation: true,
        });
        let stored = fast().hash("test123").unwrap();

        assert!(hasher.verify("test123", &stored).unwrap());
        assert!(hasher.verify(&"a".repeat(80), &stored).is_err());
        assert!(matches!(
            hasher.generator(),
            Err(PasswordError::UnsupportedVersion(v)) if v == "2x"
        ));
    }

    #[test]
    fn test_invalid_cost() {
        assert!(matches!(
            BcryptHasher::new(3, SchemeVersion::TwoB),
            Err(PasswordError::InvalidCost(3))
        ));
        assert!(matches!(
            BcryptHasher::new(32, SchemeVersion::TwoB),
            Err(PasswordError::InvalidCost(32))
        ));
    }

    #[test]
    fn test_legacy_version_not_generated() {
        assert!(matches!(
            BcryptHasher::new(4, SchemeVersion::TwoX),
            Err(PasswordError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_truncation_policy() {
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);

        let lenient = fast();
        let hashed = lenient.hash(&long).unwrap();
        assert!(lenient.verify(&prefix, &hashed).unwrap());

        let strict = fast().reject_truncation(true);
        assert!(matches!(
            strict.hash(&long),
            Err(PasswordError::PasswordTooLong(73))
        ));
        assert!(strict.verify(&long, &hashed).is_err());
        assert!(strict.hash(&prefix).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = HashingConfig {
            cost: 5,
            version: "2a".to_string(),
            reject_truncation: true,
        };
        let hasher = BcryptHasher::from_config(&config).unwrap();
        assert_eq!(hasher.cost(), 5);
        assert_eq!(hasher.version(), SchemeVersion::TwoA);

        let bad = HashingConfig {
            version: "3z".to_string(),
            ..HashingConfig::default()
        };
        assert!(matches!(
            BcryptHasher::from_config(&bad),
            Err(PasswordError::UnsupportedVersion(v)) if v == "3z"
        ));
    }

    #[test]
    fn test_needs_rehash() {
        let current = BcryptHasher::default();
        let stored = StoredHash::parse(crate::config::DEFAULT_STORED_HASH).unwrap();
        assert!(!needs_rehash(&stored, &current));

        let cheap = StoredHash { cost: 10, ..stored.clone() };
        assert!(needs_rehash(&cheap, &current));

        let other_version = StoredHash {
            version: SchemeVersion::TwoA,
            ..stored
        };
        assert!(needs_rehash(&other_version, &current));
    }
}
