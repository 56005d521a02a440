use serde::{Deserialize, Serialize};

/// Two-step confirmation before mature words can be drawn.
///
/// `request` shows the first warning, each `confirm` moves one step closer,
/// `cancel` always locks again.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatureGate {
    #[default]
    Locked,
    FirstWarning,
    SecondWarning,
    Unlocked,
}

impl MatureGate {
    pub fn request(&mut self) -> MatureGate {
        if *self == MatureGate::Locked {
            *self = MatureGate::FirstWarning;
        }
        *self
    }

    pub fn confirm(&mut self) -> MatureGate {
        *self = match *self {
            MatureGate::FirstWarning => MatureGate::SecondWarning,
            MatureGate::SecondWarning => MatureGate::Unlocked,
            // Confirming without a pending warning does nothing
            other => other,
        };
        *self
    }

    pub fn cancel(&mut self) -> MatureGate {
        *self = MatureGate::Locked;
        *self
    }

    pub fn is_unlocked(&self) -> bool {
        *self == MatureGate::Unlocked
    }
}
