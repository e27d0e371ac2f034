//! The password gate in front of the shell.

use subtle::ConstantTimeEq;

/// Decides whether a credential attempt is acceptable.
pub trait CredentialVerifier {
    fn verify(&self, attempt: &[u8]) -> bool;
}

/// Compares BLAKE3 digests of the attempt and the secret.
///
/// Only the digest of the secret is kept.
#[derive(Clone)]
pub struct DigestVerifier {
    digest: [u8; blake3::OUT_LEN],
}

impl DigestVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            digest: *blake3::hash(secret).as_bytes(),
        }
    }
}

impl CredentialVerifier for DigestVerifier {
    fn verify(&self, attempt: &[u8]) -> bool {
        let attempt = blake3::hash(attempt);
        attempt.as_bytes()[..].ct_eq(&self.digest[..]).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Locked,
    Unlocked,
}

/// Locked/unlocked state. Starts locked on every boot.
pub struct Session<V: CredentialVerifier> {
    status: SessionStatus,
    verifier: V,
}

impl<V: CredentialVerifier> Session<V> {
    pub fn new(verifier: V) -> Self {
        Self {
            status: SessionStatus::Locked,
            verifier,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_unlocked(&self) -> bool {
        self.status == SessionStatus::Unlocked
    }

    /// Try to unlock with `input`, taken exactly as typed.
    ///
    /// Returns whether the session is unlocked afterwards. Attempts while
    /// already unlocked are not checked and change nothing.
    pub fn submit_credential(&mut self, input: &str) -> bool {
        if self.is_unlocked() {
            return true;
        }
        if self.verifier.verify(input.as_bytes()) {
            self.status = SessionStatus::Unlocked;
            log::info!("session: unlocked");
            true
        } else {
            log::warn!("session: rejected credential attempt");
            false
        }
    }

    pub fn lock(&mut self) {
        if self.is_unlocked() {
            self.status = SessionStatus::Locked;
            log::info!("session: locked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session<DigestVerifier> {
        Session::new(DigestVerifier::new(b"1234"))
    }

    #[test]
    fn starts_locked() {
        assert_eq!(session().status(), SessionStatus::Locked);
    }

    #[test]
    fn right_secret_unlocks() {
        let mut s = session();
        assert!(s.submit_credential("1234"));
        assert_eq!(s.status(), SessionStatus::Unlocked);
    }

    #[test]
    fn comparison_is_exact() {
        let mut s = session();
        for attempt in ["", "123", "12345", " 1234", "1234 ", "1234\n", "ABCD"] {
            assert!(!s.submit_credential(attempt), "accepted {:?}", attempt);
            assert_eq!(s.status(), SessionStatus::Locked);
        }
    }

    #[test]
    fn retries_are_unbounded() {
        let mut s = session();
        for _ in 0..100 {
            assert!(!s.submit_credential("nope"));
        }
        assert!(s.submit_credential("1234"));
    }

    #[test]
    fn lock_relocks() {
        let mut s = session();
        s.submit_credential("1234");
        s.lock();
        assert_eq!(s.status(), SessionStatus::Locked);
        s.lock();
        assert_eq!(s.status(), SessionStatus::Locked);
    }

    struct Anything;

    impl CredentialVerifier for Anything {
        fn verify(&self, _attempt: &[u8]) -> bool {
            true
        }
    }

    #[test]
    fn verifier_is_pluggable() {
        let mut s = Session::new(Anything);
        assert!(s.submit_credential("whatever"));
    }
}
