//! Credential pool for the Gemini Generative Language API.
//!
//! Secrets come from a fixed set of environment slots consulted in priority
//! order. The pool is built once at process start and injected into the
//! orchestrator; nothing re-reads the environment per request.
//!
//! A secret is a usable candidate iff it is non-empty and longer than
//! [`MIN_CREDENTIAL_LEN`] characters. Full values are never logged — only a
//! four-character suffix is surfaced for diagnostics.

use std::fmt;

/// Environment slots, most-preferred first.
pub const CREDENTIAL_SLOTS: [&str; 4] = [
    "GEMINI_API_KEY3",
    "GEMINI_API_KEY",
    "GEMINI_API_KEY2",
    "GEMINI_API_KEY_FALLBACK",
];

/// A candidate must be strictly longer than this.
pub const MIN_CREDENTIAL_LEN: usize = 10;

/// An opaque API secret with its priority rank (1-based).
#[derive(Clone)]
pub struct Credential {
    secret: String,
    rank: usize,
}

impl Credential {
    /// Priority rank, 1 = most preferred.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The full secret value. Hand this only to the transport layer.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Last four characters, prefixed with an ellipsis. Safe to log.
    pub fn masked_suffix(&self) -> String {
        let tail: String = self
            .secret
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{tail}")
    }
}

// Redact the secret from debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("rank", &self.rank)
            .field("suffix", &self.masked_suffix())
            .finish()
    }
}

/// Presence of one configured slot, for the diagnostics endpoint.
#[derive(Debug, Clone)]
pub struct SlotStatus {
    pub slot: &'static str,
    pub present: bool,
    /// Masked suffix when the slot holds a usable candidate.
    pub suffix: Option<String>,
}

/// Ordered, filtered list of usable credentials.
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    candidates: Vec<Credential>,
    slots: Vec<SlotStatus>,
}

impl CredentialPool {
    /// Read all [`CREDENTIAL_SLOTS`] from the environment.
    pub fn from_env() -> Self {
        Self::from_slots(
            CREDENTIAL_SLOTS.map(|slot| (slot, std::env::var(slot).unwrap_or_default())),
        )
    }

    /// Build a pool from explicit secret values in priority order.
    ///
    /// Entries that are empty or not longer than [`MIN_CREDENTIAL_LEN`] are
    /// dropped; the survivors keep their declared order.
    pub fn from_secrets<I, S>(secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = secrets
            .into_iter()
            .map(Into::into)
            .filter(|s| s.len() > MIN_CREDENTIAL_LEN)
            .enumerate()
            .map(|(i, secret)| Credential {
                secret,
                rank: i + 1,
            })
            .collect();
        Self {
            candidates,
            slots: Vec::new(),
        }
    }

    fn from_slots(slots: [(&'static str, String); 4]) -> Self {
        let mut statuses = Vec::with_capacity(slots.len());
        let mut candidates = Vec::new();
        for (slot, value) in slots {
            let usable = value.len() > MIN_CREDENTIAL_LEN;
            if usable {
                let credential = Credential {
                    secret: value,
                    rank: candidates.len() + 1,
                };
                statuses.push(SlotStatus {
                    slot,
                    present: true,
                    suffix: Some(credential.masked_suffix()),
                });
                candidates.push(credential);
            } else {
                statuses.push(SlotStatus {
                    slot,
                    present: false,
                    suffix: None,
                });
            }
        }
        Self {
            candidates,
            slots: statuses,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.candidates.iter()
    }

    /// The most-preferred candidate, if any.
    pub fn best(&self) -> Option<&Credential> {
        self.candidates.first()
    }

    /// Per-slot presence captured when the pool was built.
    ///
    /// Empty for pools built via [`from_secrets`](Self::from_secrets).
    pub fn slot_statuses(&self) -> &[SlotStatus] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_empty_secrets_are_filtered_out() {
        let pool = CredentialPool::from_secrets(vec![
            "",
            "short",
            "0123456789",           // exactly 10 chars: excluded
            "a-real-looking-key-1", // included
            "a-real-looking-key-2", // included
        ]);
        assert_eq!(pool.len(), 2);
        assert!(!pool.is_empty());
    }

    #[test]
    fn candidate_order_matches_declared_priority() {
        let pool = CredentialPool::from_secrets(vec![
            "priority-one-secret",
            "priority-two-secret",
            "priority-three-key!",
        ]);
        let ranks: Vec<usize> = pool.iter().map(|c| c.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(pool.best().unwrap().secret(), "priority-one-secret");
    }

    #[test]
    fn masked_suffix_shows_only_last_four_chars() {
        let pool = CredentialPool::from_secrets(vec!["AIzaSyFakeKey1234wxyz"]);
        let credential = pool.best().unwrap();
        assert_eq!(credential.masked_suffix(), "...wxyz");
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let pool = CredentialPool::from_secrets(vec!["super-secret-value-abcd"]);
        let debug = format!("{:?}", pool.best().unwrap());
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("...abcd"));
    }

    #[test]
    fn empty_pool_reports_empty() {
        let pool = CredentialPool::from_secrets(Vec::<String>::new());
        assert!(pool.is_empty());
        assert!(pool.best().is_none());
    }
}
