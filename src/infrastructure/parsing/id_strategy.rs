//! Fallback identifiers for cards whose link has no usable path segment.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::constants::catalog::FALLBACK_ID_LEN;

/// Source of ids for items without a derivable one
pub trait IdStrategy: Send + Sync {
    fn fallback_id(&self) -> String;
}

/// Random lowercase base-36 token. Not reproducible.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdStrategy;

impl IdStrategy for RandomIdStrategy {
    fn fallback_id(&self) -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        (0..FALLBACK_ID_LEN)
            .map(|_| char::from(ALPHABET[fastrand::usize(..ALPHABET.len())]))
            .collect()
    }
}

/// Deterministic `{prefix}{n}` ids, for reproducible runs
#[derive(Debug)]
pub struct SequentialIdStrategy {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdStrategy {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdStrategy for SequentialIdStrategy {
    fn fallback_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}
