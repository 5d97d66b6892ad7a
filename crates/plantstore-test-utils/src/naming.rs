//! Generated fixture names.
//!
//! The store is never reset between runs, so names carry a timestamp-derived
//! suffix. The registry also remembers every name it handed out, which keeps
//! two calls in the same microsecond (or a wrapped suffix) from colliding.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;

use crate::error::{HarnessError, HarnessResult};

/// Widest suffix a `u64` can hold.
const MAX_DIGITS: u32 = 19;

#[derive(Debug, Default)]
pub struct UniqueNames {
    issued: Mutex<HashSet<String>>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `prefix` followed by at least `digits` digits, never repeated by this
    /// registry. Once every suffix of a width is taken the suffix grows by
    /// one digit.
    pub fn next(&self, prefix: &str, digits: u32) -> HarnessResult<String> {
        let seed = Utc::now().timestamp_micros().unsigned_abs();
        let mut issued = self.issued.lock();
        for width in digits.clamp(1, MAX_DIGITS)..=MAX_DIGITS {
            let Some(modulus) = 10u64.checked_pow(width) else {
                break;
            };
            // A free suffix is at most `issued.len()` steps past the seed.
            let attempts = modulus.min(issued.len() as u64 + 1);
            let mut suffix = seed % modulus;
            for _ in 0..attempts {
                let name = format!("{prefix}{suffix:0width$}", width = width as usize);
                if issued.insert(name.clone()) {
                    return Ok(name);
                }
                suffix = (suffix + 1) % modulus;
            }
        }
        Err(HarnessError::NamesExhausted {
            prefix: prefix.to_string(),
        })
    }

    pub fn main_category(&self) -> HarnessResult<String> {
        self.next("MC", 6)
    }

    pub fn sub_category(&self) -> HarnessResult<String> {
        self.next("SC", 6)
    }

    pub fn plant(&self) -> HarnessResult<String> {
        self.next("PL", 8)
    }

    pub fn issued_count(&self) -> usize {
        self.issued.lock().len()
    }
}
