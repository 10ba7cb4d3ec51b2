use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single test configuration tag.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModeFlag {
    Punctuation,
    Numbers,
    Time,
    Words,
    Code,
    Zen,
    Custom,
}

impl ModeFlag {
    /// Exclusive flags replace the whole set when selected.
    pub fn is_exclusive(self) -> bool {
        matches!(self, ModeFlag::Code | ModeFlag::Zen | ModeFlag::Custom)
    }
}

/// How a test in a given mode set comes to an end on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Ends when the countdown reaches zero.
    Countdown,
    /// Ends when the input is as long as the target text.
    Length,
    /// Never ends by itself.
    Never,
}

/// The set of simultaneously active mode flags, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeSet(Vec<ModeFlag>);

impl ModeSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a set by inserting each flag in turn, so exclusivity rules apply.
    pub fn from_flags<I: IntoIterator<Item = ModeFlag>>(flags: I) -> Self {
        let mut set = Self::new();
        for flag in flags {
            set.insert(flag);
        }
        set
    }

    /// Add a flag. Exclusive flags replace the set; mixable flags evict
    /// any exclusive flag.
    pub fn insert(&mut self, flag: ModeFlag) {
        if flag.is_exclusive() {
            self.0 = vec![flag];
            return;
        }
        self.0.retain(|f| !f.is_exclusive());
        if !self.0.contains(&flag) {
            self.0.push(flag);
        }
    }

    /// Option-bar semantics: exclusive flags always select, mixable flags
    /// switch on and off.
    pub fn toggle(&mut self, flag: ModeFlag) {
        if !flag.is_exclusive() && self.0.contains(&flag) {
            self.0.retain(|f| *f != flag);
        } else {
            self.insert(flag);
        }
    }

    pub fn contains(&self, flag: ModeFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ModeFlag> + '_ {
        self.0.iter().copied()
    }

    pub fn completion(&self) -> Completion {
        if self.contains(ModeFlag::Zen) {
            Completion::Never
        } else if self.contains(ModeFlag::Time) {
            Completion::Countdown
        } else {
            Completion::Length
        }
    }

    /// Custom and code tests retype the same text after a reset.
    pub fn reuses_text(&self) -> bool {
        self.contains(ModeFlag::Custom) || self.contains(ModeFlag::Code)
    }

    /// Comma-joined flags as persisted in `test_type`.
    pub fn test_type(&self) -> String {
        self.0
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<ModeFlag> for ModeSet {
    fn from_iter<I: IntoIterator<Item = ModeFlag>>(iter: I) -> Self {
        Self::from_flags(iter)
    }
}
