use crate::clock::Millis;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cumulative attempt/error/timing record for one target character.
///
/// Append-only for the life of an attempt: corrections made with backspace
/// do not remove history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharLogEntry {
    pub attempts: u32,
    pub errors: u32,
    pub deltas: Vec<u64>,
}

impl CharLogEntry {
    pub fn total_time(&self) -> u64 {
        self.deltas.iter().sum()
    }

    pub fn average_delta(&self) -> Option<f64> {
        if self.deltas.is_empty() {
            None
        } else {
            Some(self.total_time() as f64 / self.deltas.len() as f64)
        }
    }

    /// Percentage of attempts that were errors.
    pub fn error_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.errors as f64 / self.attempts as f64 * 100.0
        }
    }
}

/// Per-character log plus the session-wide keystroke rhythm.
///
/// Deltas are measured from the previous keystroke of any kind, not from the
/// previous attempt at the same character. The first keystroke of an attempt
/// logs a delta of 0 against its character and contributes nothing to the
/// rhythm sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingLog {
    entries: BTreeMap<char, CharLogEntry>,
    rhythm: Vec<u64>,
    last_keystroke: Option<Millis>,
}

impl TimingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a keystroke that has no target character (backspace, extra).
    /// Returns the delta since the previous keystroke.
    pub fn note_keystroke(&mut self, now: Millis) -> u64 {
        let delta = match self.last_keystroke {
            Some(last) => {
                let delta = now.saturating_sub(last);
                self.rhythm.push(delta);
                delta
            }
            None => 0,
        };
        self.last_keystroke = Some(now);
        delta
    }

    /// Record an attempt at target character `expected`.
    pub fn record(&mut self, expected: char, correct: bool, now: Millis) -> u64 {
        let delta = self.note_keystroke(now);
        let entry = self.entries.entry(expected).or_default();
        entry.attempts += 1;
        if !correct {
            entry.errors += 1;
        }
        entry.deltas.push(delta);
        delta
    }

    pub fn get(&self, c: char) -> Option<&CharLogEntry> {
        self.entries.get(&c)
    }

    pub fn entries(&self) -> impl Iterator<Item = (char, &CharLogEntry)> {
        self.entries.iter().map(|(c, e)| (*c, e))
    }

    /// Inter-keystroke deltas in arrival order.
    pub fn rhythm(&self) -> &[u64] {
        &self.rhythm
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flatten(&self) -> Vec<CharLogRecord> {
        self.entries
            .iter()
            .map(|(c, entry)| CharLogRecord {
                char: *c,
                attempts: entry.attempts,
                errors: entry.errors,
                total_time: entry.total_time(),
            })
            .collect()
    }
}

/// Persisted per-character summary of one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharLogRecord {
    pub char: char,
    pub attempts: u32,
    pub errors: u32,
    /// Sum of deltas in milliseconds.
    pub total_time: u64,
}

/// Per-character totals across many tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharAggregate {
    pub attempts: u64,
    pub errors: u64,
    pub total_time: u64,
    pub tests: usize,
}

impl CharAggregate {
    pub fn average_delta(&self) -> Option<f64> {
        if self.attempts == 0 {
            None
        } else {
            Some(self.total_time as f64 / self.attempts as f64)
        }
    }

    pub fn error_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.errors as f64 / self.attempts as f64 * 100.0
        }
    }
}

/// Fold char logs from several results into case-insensitive totals.
pub fn aggregate<'a, I>(logs: I) -> BTreeMap<char, CharAggregate>
where
    I: IntoIterator<Item = &'a [CharLogRecord]>,
{
    logs.into_iter()
        .enumerate()
        .flat_map(|(test, records)| records.iter().map(move |r| (test, r)))
        .into_group_map_by(|(_, record)| fold_case(record.char))
        .into_iter()
        .map(|(c, group)| {
            let tests = group.iter().map(|(test, _)| *test).unique().count();
            let agg = group.iter().fold(
                CharAggregate {
                    tests,
                    ..CharAggregate::default()
                },
                |mut acc, (_, record)| {
                    acc.attempts += record.attempts as u64;
                    acc.errors += record.errors as u64;
                    acc.total_time += record.total_time;
                    acc
                },
            );
            (c, agg)
        })
        .collect()
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_keystroke_delta_is_zero() {
        let mut log = TimingLog::new();
        assert_eq!(log.record('a', true, 1_000), 0);
        assert_eq!(log.get('a').unwrap().deltas, vec![0]);
        assert!(log.rhythm().is_empty());
    }

    #[test]
    fn test_delta_measured_from_any_previous_keystroke() {
        let mut log = TimingLog::new();
        log.record('a', true, 0);
        log.record('b', true, 120);
        log.record('a', false, 300);

        let a = log.get('a').unwrap();
        assert_eq!(a.attempts, 2);
        assert_eq!(a.errors, 1);
        assert_eq!(a.deltas, vec![0, 180]);
        assert_eq!(log.get('b').unwrap().deltas, vec![120]);
        assert_eq!(log.rhythm(), &[120, 180]);
    }

    #[test]
    fn test_backspace_counts_as_keystroke_only() {
        let mut log = TimingLog::new();
        log.record('a', false, 0);
        log.note_keystroke(100);
        log.record('a', true, 250);

        let a = log.get('a').unwrap();
        assert_eq!(a.attempts, 2);
        assert_eq!(a.deltas, vec![0, 150]);
        assert_eq!(log.rhythm(), &[100, 150]);
    }

    #[test]
    fn test_entry_invariants() {
        let mut log = TimingLog::new();
        for (i, ok) in [true, false, false, true].iter().enumerate() {
            log.record('x', *ok, i as u64 * 50);
        }
        let x = log.get('x').unwrap();
        assert!(x.errors <= x.attempts);
        assert!(x.deltas.len() as u32 <= x.attempts);
        assert_eq!(x.error_rate(), 50.0);
    }

    #[test]
    fn test_flatten_sums_deltas() {
        let mut log = TimingLog::new();
        log.record('h', true, 0);
        log.record('i', true, 200);
        log.record('h', true, 500);

        let records = log.flatten();
        assert_eq!(
            records,
            vec![
                CharLogRecord {
                    char: 'h',
                    attempts: 2,
                    errors: 0,
                    total_time: 300
                },
                CharLogRecord {
                    char: 'i',
                    attempts: 1,
                    errors: 0,
                    total_time: 200
                },
            ]
        );
    }

    #[test]
    fn test_record_serializes_char_as_string() {
        let record = CharLogRecord {
            char: 'q',
            attempts: 3,
            errors: 1,
            total_time: 420,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["char"], "q");
        assert_eq!(json["total_time"], 420);
    }

    #[test]
    fn test_aggregate_folds_case_and_counts_tests() {
        let first = vec![
            CharLogRecord {
                char: 'A',
                attempts: 2,
                errors: 1,
                total_time: 400,
            },
            CharLogRecord {
                char: 'a',
                attempts: 2,
                errors: 0,
                total_time: 200,
            },
        ];
        let second = vec![CharLogRecord {
            char: 'a',
            attempts: 4,
            errors: 1,
            total_time: 400,
        }];

        let totals = aggregate([first.as_slice(), second.as_slice()]);
        let a = &totals[&'a'];
        assert_eq!(a.attempts, 8);
        assert_eq!(a.errors, 2);
        assert_eq!(a.tests, 2);
        assert_eq!(a.average_delta(), Some(125.0));
        assert_eq!(a.error_rate(), 25.0);
        assert!(!totals.contains_key(&'A'));
    }
}
