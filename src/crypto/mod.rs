pub mod hash_format;
pub mod password;

pub use hash_format::{SchemeVersion, StoredHash};
pub use password::{
    hash_password, needs_rehash, verify_password, BcryptHasher, ConfiguredHasher, PasswordHasher,
};
