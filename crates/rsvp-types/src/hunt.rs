use std::collections::{HashMap, HashSet};

use crate::models::HuntState;

/// Awarded for using a non-GET verb on the leaderboard endpoint.
pub const FLAG_HTTP_MASTER: &str = "FLAG_07_HTTP_MASTER";
/// Handed back for any unknown flag. Never persisted.
pub const FLAG_CONSOLATION: &str = "FLAG_08_NICE_TRY";

/// A browser-side trigger and the flag it reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secret {
    pub action: &'static str,
    pub flag: &'static str,
    pub message: &'static str,
}

const SECRETS: [Secret; 6] = [
    Secret {
        action: "VINYL_SPIN",
        flag: "FLAG_01_VINYL_SPIN",
        message: "Five spins on the record. The DJ approves.",
    },
    Secret {
        action: "PORTRAIT_STILL",
        flag: "FLAG_02_PORTRAIT_STILL",
        message: "You held still long enough for the portrait to notice.",
    },
    Secret {
        action: "LOVE_KEYWORD",
        flag: "FLAG_03_LOVE_KEYWORD",
        message: "You typed the magic word.",
    },
    Secret {
        action: "FLOWER_POWER",
        flag: "FLAG_04_FLOWER_POWER",
        message: "That is a lot of the same flower. Respect.",
    },
    Secret {
        action: "UIT_COMBO",
        flag: "FLAG_05_UIT_COMBO",
        message: "U-I-T. You know where this all started.",
    },
    Secret {
        action: "GRAD_CAP",
        flag: "FLAG_06_GRAD_CAP",
        message: "Cap tossed! Congratulations are in order.",
    },
];

/// The action -> flag table plus the set of redeemable flags.
///
/// Built once at startup and shared read-only; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct SecretBook {
    by_action: HashMap<&'static str, Secret>,
    known_flags: HashSet<&'static str>,
}

impl SecretBook {
    pub fn new() -> Self {
        let by_action = SECRETS.iter().map(|s| (s.action, *s)).collect();
        let known_flags = SECRETS
            .iter()
            .map(|s| s.flag)
            .chain([FLAG_HTTP_MASTER, FLAG_CONSOLATION])
            .collect();

        Self {
            by_action,
            known_flags,
        }
    }

    /// Look up the secret behind a client-reported action. Exact match.
    pub fn reveal(&self, action: &str) -> Option<&Secret> {
        self.by_action.get(action)
    }

    pub fn is_known(&self, flag: &str) -> bool {
        self.known_flags.contains(flag)
    }

    pub fn known_count(&self) -> usize {
        self.known_flags.len()
    }

    /// The flags required for a complete hunt, in action order.
    pub fn primary_flags(&self) -> impl Iterator<Item = &'static str> {
        SECRETS.iter().map(|s| s.flag)
    }

    /// Classify a nickname's progress. `None` means no record exists.
    pub fn state_of(&self, found: Option<&[String]>) -> HuntState {
        match found {
            None => HuntState::Unknown,
            Some(found) => {
                let complete = self
                    .primary_flags()
                    .all(|flag| found.iter().any(|f| f == flag));
                if complete {
                    HuntState::Complete
                } else {
                    HuntState::InProgress
                }
            }
        }
    }
}

impl Default for SecretBook {
    fn default() -> Self {
        Self::new()
    }
}
