use crate::mode::Completion;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What happens to keystrokes past the end of the target text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OvertypePolicy {
    /// Ignore the keystroke.
    #[default]
    Reject,
    /// Accept it and count it as an extra character. Only honoured by modes
    /// that do not complete on length.
    Allow,
}

/// Whether a candidate buffer of `candidate_len` chars may replace the
/// current input for a target of `target_len` chars.
pub fn admits(
    policy: OvertypePolicy,
    completion: Completion,
    candidate_len: usize,
    target_len: usize,
) -> bool {
    if candidate_len <= target_len {
        return true;
    }
    match completion {
        Completion::Length => false,
        Completion::Countdown | Completion::Never => policy == OvertypePolicy::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_target_always_admitted() {
        for completion in [Completion::Length, Completion::Countdown, Completion::Never] {
            assert!(admits(OvertypePolicy::Reject, completion, 3, 3));
            assert!(admits(OvertypePolicy::Allow, completion, 0, 3));
        }
    }

    #[test]
    fn test_reject_policy_blocks_overtype() {
        assert!(!admits(OvertypePolicy::Reject, Completion::Never, 4, 3));
        assert!(!admits(OvertypePolicy::Reject, Completion::Countdown, 4, 3));
    }

    #[test]
    fn test_length_modes_never_overtype() {
        assert!(!admits(OvertypePolicy::Allow, Completion::Length, 4, 3));
    }

    #[test]
    fn test_allow_policy_in_open_modes() {
        assert!(admits(OvertypePolicy::Allow, Completion::Never, 5, 3));
        assert!(admits(OvertypePolicy::Allow, Completion::Countdown, 5, 3));
    }
}
