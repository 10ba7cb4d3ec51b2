use serde::{Deserialize, Serialize};

/// Classification of one position of the input against the target.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum CharOutcome {
    Correct,
    Incorrect,
    /// Typed past the end of the target.
    Extra,
    /// Target position not reached.
    Missed,
}

/// Classify position `idx`. `None` when neither buffer reaches it.
pub fn classify(target: &[char], input: &[char], idx: usize) -> Option<CharOutcome> {
    match (input.get(idx), target.get(idx)) {
        (Some(typed), Some(expected)) if typed == expected => Some(CharOutcome::Correct),
        (Some(_), Some(_)) => Some(CharOutcome::Incorrect),
        (Some(_), None) => Some(CharOutcome::Extra),
        (None, Some(_)) => Some(CharOutcome::Missed),
        (None, None) => None,
    }
}

/// A single-character change between two consecutive input buffers.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Edit {
    Append {
        index: usize,
        typed: char,
        outcome: CharOutcome,
    },
    Remove {
        index: usize,
        typed: char,
        outcome: CharOutcome,
    },
}

impl Edit {
    pub fn outcome(&self) -> CharOutcome {
        match self {
            Edit::Append { outcome, .. } | Edit::Remove { outcome, .. } => *outcome,
        }
    }
}

/// Diff `previous` into `candidate` as a sequence of single-character edits.
///
/// Characters after the common prefix are removed last-first, then the new
/// tail is appended in order. A plain keystroke yields one `Append`, a
/// backspace one `Remove`. A removed position is classified exactly as it
/// was when typed, since the target never changes during an attempt.
pub fn reconcile(target: &[char], previous: &[char], candidate: &[char]) -> Vec<Edit> {
    let prefix = previous
        .iter()
        .zip(candidate)
        .take_while(|(a, b)| a == b)
        .count();

    let mut edits = Vec::with_capacity(previous.len() - prefix + candidate.len() - prefix);

    for index in (prefix..previous.len()).rev() {
        if let Some(outcome) = classify(target, previous, index) {
            edits.push(Edit::Remove {
                index,
                typed: previous[index],
                outcome,
            });
        }
    }

    for (index, &typed) in candidate.iter().enumerate().skip(prefix) {
        if let Some(outcome) = classify(target, candidate, index) {
            edits.push(Edit::Append {
                index,
                typed,
                outcome,
            });
        }
    }

    edits
}

/// Running tallies of the current input's correctness.
///
/// Appends increment and removals decrement the matching counter, so the
/// counters always describe the buffer as it stands. `extra` is tracked
/// alongside for the result tally and does not enter accuracy.
#[derive(Clone, Debug, Copy, Default, PartialEq, Eq)]
pub struct KeystrokeCounters {
    pub correct: u32,
    pub incorrect: u32,
    pub extra: u32,
}

impl KeystrokeCounters {
    pub fn apply(&mut self, outcome: CharOutcome) {
        match outcome {
            CharOutcome::Correct => self.correct += 1,
            CharOutcome::Incorrect => self.incorrect += 1,
            CharOutcome::Extra => self.extra += 1,
            CharOutcome::Missed => {}
        }
    }

    pub fn undo(&mut self, outcome: CharOutcome) {
        match outcome {
            CharOutcome::Correct => self.correct = self.correct.saturating_sub(1),
            CharOutcome::Incorrect => self.incorrect = self.incorrect.saturating_sub(1),
            CharOutcome::Extra => self.extra = self.extra.saturating_sub(1),
            CharOutcome::Missed => {}
        }
    }

    /// Keystrokes that landed on a target position.
    pub fn scored(&self) -> u32 {
        self.correct + self.incorrect
    }
}

/// Final character tally of a test.
#[derive(Clone, Debug, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharCounts {
    pub correct: u32,
    pub incorrect: u32,
    pub extra: u32,
    pub missed: u32,
}

impl CharCounts {
    /// Combine the running counters with every target position the input
    /// never reached.
    pub fn tally(counters: &KeystrokeCounters, target: &[char], input_len: usize) -> Self {
        Self {
            correct: counters.correct,
            incorrect: counters.incorrect,
            extra: counters.extra,
            missed: target.len().saturating_sub(input_len) as u32,
        }
    }
}
