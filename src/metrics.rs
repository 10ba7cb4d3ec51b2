//! Speed, accuracy and rhythm metrics.
//!
//! All functions are total: zero elapsed time and zero keystrokes map to
//! fixed values instead of `NaN` or infinity.

use serde::{Deserialize, Serialize};

/// Characters per "word" in WPM math.
pub const CHARS_PER_WORD: f64 = 5.0;

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

/// Population standard deviation.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;
    Some(variance.sqrt())
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Words per minute over every typed character, right or wrong.
pub fn gross_wpm(typed_chars: usize, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    (typed_chars as f64 / CHARS_PER_WORD) / (elapsed_ms as f64 / 60_000.0)
}

/// Percentage of scored keystrokes that are currently correct, to 2 places.
pub fn accuracy(correct: u32, incorrect: u32) -> f64 {
    let total = correct + incorrect;
    if total == 0 {
        return 100.0;
    }
    round_to(correct as f64 / total as f64 * 100.0, 2)
}

/// Gross WPM scaled by accuracy, rounded to a whole number.
pub fn net_wpm(gross: f64, accuracy: f64) -> f64 {
    (gross * accuracy / 100.0).round().max(0.0)
}

/// Evenness of typing rhythm in `[0, 100]`.
///
/// Takes the coefficient of variation of the inter-keystroke deltas and maps
/// it through `1 - tanh(cv + cv^3/3 + cv^5/5)`, so a perfectly steady rhythm
/// scores 100 and the score falls off quickly as variance grows. Fewer than
/// two samples, or an all-zero rhythm, count as perfectly steady.
pub fn consistency(deltas: &[u64]) -> f64 {
    if deltas.len() < 2 {
        return 100.0;
    }
    let samples: Vec<f64> = deltas.iter().map(|d| *d as f64).collect();
    let (Some(avg), Some(sd)) = (mean(&samples), std_dev(&samples)) else {
        return 100.0;
    };
    if avg <= 0.0 {
        return 100.0;
    }
    let cv = sd / avg;
    let spread = cv + cv.powi(3) / 3.0 + cv.powi(5) / 5.0;
    round_to((100.0 * (1.0 - spread.tanh())).clamp(0.0, 100.0), 2)
}

/// One evaluation of the headline metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub gross_wpm: f64,
    pub net_wpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
}

impl Metrics {
    pub fn compute(
        typed_chars: usize,
        elapsed_ms: u64,
        correct: u32,
        incorrect: u32,
        rhythm: &[u64],
    ) -> Self {
        let gross = gross_wpm(typed_chars, elapsed_ms);
        let accuracy = accuracy(correct, incorrect);
        Self {
            gross_wpm: gross,
            net_wpm: net_wpm(gross, accuracy),
            accuracy,
            consistency: consistency(rhythm),
        }
    }
}
