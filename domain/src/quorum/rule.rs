//! Quorum rules for consensus determination.

use serde::{Deserialize, Serialize};

/// Rule deciding how much support a winning action needs, relative to the
/// number of attempts issued for the round.
///
/// # Example
///
/// ```
/// use stepwise_domain::QuorumRule;
///
/// let rule = QuorumRule::Majority;
/// assert!(rule.is_met(3, 5));  // 3/5 > 50%
/// assert!(!rule.is_met(2, 5)); // 2/5 < 50%
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuorumRule {
    /// More than half of the attempted set must agree.
    #[default]
    Majority,

    /// Every attempt must agree.
    Unanimous,

    /// At least n attempts must agree.
    AtLeast(usize),

    /// At least this percentage of the attempted set must agree (0-100).
    Percentage(u8),
}

impl QuorumRule {
    /// Whether `support` identical actions out of `attempted` issued
    /// attempts meet this rule.
    pub fn is_met(&self, support: usize, attempted: usize) -> bool {
        if attempted == 0 {
            return false;
        }

        match self {
            QuorumRule::Majority => support > attempted / 2,
            QuorumRule::Unanimous => support == attempted,
            QuorumRule::AtLeast(n) => support >= *n,
            QuorumRule::Percentage(p) => {
                let required = (attempted as f64 * (*p as f64 / 100.0)).ceil() as usize;
                support >= required
            }
        }
    }

    /// Minimum support needed for a given attempted set size.
    pub fn min_support(&self, attempted: usize) -> usize {
        match self {
            QuorumRule::Majority => attempted / 2 + 1,
            QuorumRule::Unanimous => attempted,
            QuorumRule::AtLeast(n) => *n,
            QuorumRule::Percentage(p) => (attempted as f64 * (*p as f64 / 100.0)).ceil() as usize,
        }
    }

    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority (more than half)".to_string(),
            QuorumRule::Unanimous => "unanimous (all attempts)".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} identical actions", n),
            QuorumRule::Percentage(p) => format!("at least {}% agreement", p),
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" => Ok(QuorumRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                Ok(QuorumRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num_str = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num_str.parse().map_err(|_| "Invalid percentage")?;
                Ok(QuorumRule::Percentage(p))
            }
            _ => Err(format!(
                "Unknown quorum rule: {}. Valid: majority, unanimous, atleast:N, percentage:N or N%",
                s
            )),
        }
    }
}
