//! Statistical sampling of records.
//!
//! A sample rate of N percent lets roughly N% of records through to the
//! lookup stage. The decision is made once per record so every lookup field
//! of a record shares the same outcome.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::config::{DEFAULT_SAMPLE_RATE, FULL_SAMPLE_RATE, SAMPLE_DRAW_RANGE};

static RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^1?[0-9]{1,2}$")
        .unwrap_or_else(|e| panic!("invalid sample rate pattern: {e}"))
});

/// Validated sample rate, a percentage in `[1, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRate {
    percent: u8,
    valid: bool,
}

impl SampleRate {
    /// Parses a configured sample rate.
    ///
    /// Anything that is not an integer in `[1, 100]` is replaced by
    /// `DEFAULT_SAMPLE_RATE` (no sampling) and a warning is logged.
    pub fn parse(rate: &str) -> Self {
        let parsed = RATE_RE
            .is_match(rate)
            .then(|| rate.parse::<u8>().ok())
            .flatten()
            .filter(|p| (1..=FULL_SAMPLE_RATE).contains(p));

        match parsed {
            Some(percent) => Self {
                percent,
                valid: true,
            },
            None => {
                log::warn!(
                    "WHOIS: sample value should be between 1 and 100 - ignoring '{}' and using default value {}",
                    rate,
                    DEFAULT_SAMPLE_RATE
                );
                Self {
                    percent: FULL_SAMPLE_RATE,
                    valid: false,
                }
            }
        }
    }

    /// The effective percentage.
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// `false` when the configured rate was malformed and the default was used.
    pub fn was_valid(&self) -> bool {
        self.valid
    }

    /// Decides whether the current record should be enriched.
    ///
    /// At 100% no random number is drawn. Otherwise a uniform `j` in
    /// `[0, 100)` is drawn and the record passes when `j <= percent`.
    pub fn should_process<R: Rng>(&self, rng: &mut R) -> bool {
        if self.percent == FULL_SAMPLE_RATE {
            return true;
        }

        let j: u32 = rng.random_range(0..SAMPLE_DRAW_RANGE);
        log::warn!(
            "WHOIS: in sampling mode! j={} sample={}",
            j,
            self.percent
        );
        j <= u32::from(self.percent)
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self {
            percent: FULL_SAMPLE_RATE,
            valid: true,
        }
    }
}
