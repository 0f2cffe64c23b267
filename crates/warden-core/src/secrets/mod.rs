//! Secret wrappers.
//!
//! - `MasterKey`: bootstrap secret that never appears in logs and is
//!   compared in constant time.

use secrecy::{ExposeSecret, SecretBox};

/// Process-wide bootstrap secret.
///
/// Grants admin registration and master-key login. The inner value is
/// wrapped with `secrecy::SecretBox` so it is not printed in debug output.
#[derive(Clone)]
pub struct MasterKey(SecretBox<str>);

impl MasterKey {
    /// Wrap a master key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretBox::new(key.into().into_boxed_str()))
    }

    /// Check whether `candidate` equals the master key.
    ///
    /// Runs in time independent of where the first mismatch occurs.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.expose_secret().as_bytes(), candidate.as_bytes())
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterKey([REDACTED])")
    }
}

impl std::fmt::Display for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let key = MasterKey::new("bootstrap-secret");
        assert!(key.verify("bootstrap-secret"));
        assert!(!key.verify("bootstrap-secreT"));
        assert!(!key.verify("bootstrap"));
        assert!(!key.verify(""));
    }

    #[test]
    fn test_redacted_output() {
        let key = MasterKey::new("bootstrap-secret");
        assert_eq!(format!("{key:?}"), "MasterKey([REDACTED])");
        assert_eq!(key.to_string(), "[REDACTED]");
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }
}
