//! bcrypt modular crypt format
//!
//! `$<version>$<cost>$<salt><digest>`: two-letter version tag, two-digit
//! cost, 22 chars of salt and 31 chars of digest in the bcrypt base64
//! alphabet. 60 characters in total.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PasswordError, PasswordResult};

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Length of a well-formed encoded hash
pub const ENCODED_LEN: usize = 60;
const SALT_LEN: usize = 22;
const DIGEST_LEN: usize = 31;

/// bcrypt revision tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SchemeVersion {
    #[serde(rename = "2a")]
    TwoA,
    #[serde(rename = "2b")]
    TwoB,
    #[serde(rename = "2x")]
    TwoX,
    #[serde(rename = "2y")]
    TwoY,
}

impl SchemeVersion {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::TwoA => "2a",
            Self::TwoB => "2b",
            Self::TwoX => "2x",
            Self::TwoY => "2y",
        }
    }

    /// `2x` marks hashes from the broken pre-2011 crypt_blowfish and is
    /// accepted for verification only.
    pub fn can_generate(&self) -> bool {
        !matches!(self, Self::TwoX)
    }

    pub(crate) fn to_bcrypt(self) -> bcrypt::Version {
        match self {
            Self::TwoA => bcrypt::Version::TwoA,
            Self::TwoB => bcrypt::Version::TwoB,
            Self::TwoX => bcrypt::Version::TwoX,
            Self::TwoY => bcrypt::Version::TwoY,
        }
    }
}

impl Default for SchemeVersion {
    fn default() -> Self {
        Self::TwoB
    }
}

impl fmt::Display for SchemeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for SchemeVersion {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2a" => Ok(Self::TwoA),
            "2b" => Ok(Self::TwoB),
            "2x" => Ok(Self::TwoX),
            "2y" => Ok(Self::TwoY),
            other => Err(PasswordError::MalformedHash(format!(
                "unknown version tag '{}'",
                other
            ))),
        }
    }
}

/// A parsed, validated bcrypt hash string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredHash {
    pub version: SchemeVersion,
    pub cost: u32,
    pub salt: String,
    pub digest: String,
}

impl StoredHash {
    pub fn parse(encoded: &str) -> PasswordResult<Self> {
        let malformed = |reason: &str| PasswordError::MalformedHash(reason.to_string());

        if !encoded.is_ascii() {
            return Err(malformed("non-ASCII characters"));
        }

        let body = encoded
            .strip_prefix('$')
            .ok_or_else(|| malformed("missing leading '$'"))?;

        let mut parts = body.splitn(3, '$');
        let (tag, cost, rest) = match (parts.next(), parts.next(), parts.next()) {
            (Some(tag), Some(cost), Some(rest)) => (tag, cost, rest),
            _ => return Err(malformed("expected $<version>$<cost>$<salt+digest>")),
        };

        let version: SchemeVersion = tag.parse()?;

        if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("cost must be two decimal digits"));
        }
        let cost: u32 = cost
            .parse()
            .map_err(|_| malformed("cost must be two decimal digits"))?;
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(PasswordError::MalformedHash(format!(
                "cost {} outside {}..={}",
                cost, MIN_COST, MAX_COST
            )));
        }

        if encoded.len() != ENCODED_LEN {
            return Err(PasswordError::MalformedHash(format!(
                "expected {} characters, got {}",
                ENCODED_LEN,
                encoded.len()
            )));
        }
        if let Some(c) = rest.chars().find(|c| !is_bcrypt_base64(*c)) {
            return Err(PasswordError::MalformedHash(format!(
                "invalid character '{}' in salt/digest",
                c
            )));
        }

        let (salt, digest) = rest.split_at(SALT_LEN);
        debug_assert_eq!(digest.len(), DIGEST_LEN);

        // 22 chars carry 132 bits for a 128-bit salt, 31 chars carry 186
        // bits for a 184-bit digest. The unused low bits must be zero.
        if !has_clear_tail(salt, 0x0f) {
            return Err(malformed("non-canonical salt encoding"));
        }
        if !has_clear_tail(digest, 0x03) {
            return Err(malformed("non-canonical digest encoding"));
        }

        Ok(Self {
            version,
            cost,
            salt: salt.to_string(),
            digest: digest.to_string(),
        })
    }
}

impl FromStr for StoredHash {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}${:02}${}{}",
            self.version, self.cost, self.salt, self.digest
        )
    }
}

const BCRYPT_ALPHABET: &[u8; 64] =
    b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn is_bcrypt_base64(c: char) -> bool {
    c == '.' || c == '/' || c.is_ascii_alphanumeric()
}

fn has_clear_tail(segment: &str, mask: usize) -> bool {
    segment
        .bytes()
        .last()
        .and_then(|b| BCRYPT_ALPHABET.iter().position(|a| *a == b))
        .map_or(false, |idx| idx & mask == 0)
}
