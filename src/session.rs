use crate::char_log::TimingLog;
use crate::clock::Millis;
use crate::metrics::Metrics;
use crate::mode::ModeSet;
use crate::reconciler::{reconcile, CharCounts, CharOutcome, Edit, KeystrokeCounters};

/// State of one typing attempt against one target text.
///
/// Mutated only through [`TestSession::apply`] and the timestamps the
/// engine sets on start and finish.
#[derive(Debug, Clone)]
pub struct TestSession {
    pub modes: ModeSet,
    pub started_at: Option<Millis>,
    pub finished_at: Option<Millis>,
    pub restarts: u32,
    /// Seconds, `None` for no limit.
    pub duration_limit: Option<u32>,
    target_text: String,
    target: Vec<char>,
    input: Vec<char>,
    char_log: TimingLog,
    counters: KeystrokeCounters,
}

impl TestSession {
    pub fn new(
        modes: ModeSet,
        target_text: String,
        duration_limit: Option<u32>,
        restarts: u32,
    ) -> Self {
        Self {
            modes,
            started_at: None,
            finished_at: None,
            restarts,
            duration_limit,
            target: target_text.chars().collect(),
            target_text,
            input: Vec::new(),
            char_log: TimingLog::new(),
            counters: KeystrokeCounters::default(),
        }
    }

    /// A session still waiting for its target text.
    pub fn pending(modes: ModeSet, duration_limit: Option<u32>, restarts: u32) -> Self {
        Self::new(modes, String::new(), duration_limit, restarts)
    }

    pub fn target_text(&self) -> &str {
        &self.target_text
    }

    pub fn target(&self) -> &[char] {
        &self.target
    }

    pub fn input(&self) -> &[char] {
        &self.input
    }

    pub fn input_string(&self) -> String {
        self.input.iter().collect()
    }

    pub fn char_log(&self) -> &TimingLog {
        &self.char_log
    }

    pub fn counters(&self) -> &KeystrokeCounters {
        &self.counters
    }

    pub fn has_target(&self) -> bool {
        !self.target.is_empty()
    }

    /// Diff the current input into `candidate` and fold every edit into the
    /// counters and the timing log.
    pub fn apply(&mut self, candidate: Vec<char>, now: Millis) -> Vec<Edit> {
        let edits = reconcile(&self.target, &self.input, &candidate);
        for edit in &edits {
            match *edit {
                Edit::Append { index, outcome, .. } => {
                    self.counters.apply(outcome);
                    match outcome {
                        CharOutcome::Correct | CharOutcome::Incorrect => {
                            self.char_log.record(
                                self.target[index],
                                outcome == CharOutcome::Correct,
                                now,
                            );
                        }
                        CharOutcome::Extra | CharOutcome::Missed => {
                            self.char_log.note_keystroke(now);
                        }
                    }
                }
                Edit::Remove { outcome, .. } => {
                    self.counters.undo(outcome);
                    self.char_log.note_keystroke(now);
                }
            }
        }
        self.input = candidate;
        edits
    }

    pub fn is_fully_typed(&self) -> bool {
        self.has_target() && self.input.len() == self.target.len()
    }

    pub fn elapsed_ms(&self, now: Millis) -> u64 {
        match self.started_at {
            Some(started) => self.finished_at.unwrap_or(now).saturating_sub(started),
            None => 0,
        }
    }

    /// Metrics over an explicit elapsed span.
    pub fn metrics_over(&self, elapsed_ms: u64) -> Metrics {
        if self.started_at.is_none() {
            return Metrics::compute(0, 0, 0, 0, &[]);
        }
        Metrics::compute(
            self.input.len(),
            elapsed_ms,
            self.counters.correct,
            self.counters.incorrect,
            self.char_log.rhythm(),
        )
    }

    pub fn metrics(&self, now: Millis) -> Metrics {
        self.metrics_over(self.elapsed_ms(now))
    }

    pub fn char_counts(&self) -> CharCounts {
        CharCounts::tally(&self.counters, &self.target, self.input.len())
    }

    pub fn written_words(&self) -> usize {
        count_words(self.input.iter())
    }

    pub fn total_words(&self) -> usize {
        count_words(self.target.iter())
    }
}

fn count_words<'a>(chars: impl Iterator<Item = &'a char>) -> usize {
    let mut words = 0;
    let mut in_word = false;
    for c in chars {
        if c.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            words += 1;
        }
    }
    words
}
