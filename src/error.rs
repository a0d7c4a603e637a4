use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Malformed stored hash: {0}")]
    MalformedHash(String),

    #[error("Cost factor {0} not allowed (expected 4..=31)")]
    InvalidCost(u32),

    #[error("Unsupported hash version for generation: {0}")]
    UnsupportedVersion(String),

    #[error("Password is {0} bytes, bcrypt only uses the first 72")]
    PasswordTooLong(usize),

    #[error("Generated hash failed self-check: {0}")]
    Generation(String),

    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl PasswordError {
    /// Whether the error comes from the stored hash rather than the
    /// hashing primitive itself.
    pub fn is_format_error(&self) -> bool {
        matches!(self, PasswordError::MalformedHash(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type PasswordResult<T> = Result<T, PasswordError>;
