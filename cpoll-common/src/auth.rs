//! Admin credential checking
//!
//! The admin dashboard is gated by a single credential. Verification is a
//! seam ([`CredentialChecker`]) so deployments can delegate to an external
//! credential service; the shipped [`DigestCredentialChecker`] compares the
//! SHA-256 digest of the presented token with a configured digest. No secret
//! is compiled into the binary.
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies; the server wraps this in middleware.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Verifies an admin credential
#[async_trait]
pub trait CredentialChecker: Send + Sync {
    /// Ok(()) when `credential` is accepted, `Error::Auth` otherwise
    async fn verify(&self, credential: &str) -> Result<()>;
}

/// SHA-256 of `input` as 64 lowercase hex characters
///
/// # Examples
///
/// ```
/// use cpoll_common::auth::sha256_hex;
///
/// let digest = sha256_hex("correct horse");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Accepts tokens whose SHA-256 digest matches the configured digest
#[derive(Debug, Clone)]
pub struct DigestCredentialChecker {
    expected_digest: Option<String>,
}

impl DigestCredentialChecker {
    /// Build from a hex digest; `None` rejects every credential
    pub fn new(expected_digest: Option<&str>) -> Result<Self> {
        let expected_digest = match expected_digest {
            Some(digest) => {
                let digest = digest.trim().to_ascii_lowercase();
                if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(Error::Config(
                        "admin.token_sha256 must be 64 hex characters".to_string(),
                    ));
                }
                Some(digest)
            }
            None => None,
        };
        Ok(Self { expected_digest })
    }

    /// Whether any credential can succeed
    pub fn is_configured(&self) -> bool {
        self.expected_digest.is_some()
    }
}

#[async_trait]
impl CredentialChecker for DigestCredentialChecker {
    async fn verify(&self, credential: &str) -> Result<()> {
        let Some(expected) = &self.expected_digest else {
            return Err(Error::Auth("Admin access is not configured".to_string()));
        };

        if credential.is_empty() {
            return Err(Error::Auth("Missing credential".to_string()));
        }

        let presented = sha256_hex(credential);
        if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            Ok(())
        } else {
            Err(Error::Auth("Incorrect credential".to_string()))
        }
    }
}
