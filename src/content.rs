//! Target text resolution.
//!
//! The engine only ever sees a string; [`ContentProvider`] is the seam behind
//! which word generators, fetched passages or pasted text live.

use crate::error::{ContentError, ContentResult};
use crate::mode::{ModeFlag, ModeSet};
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// Words generated for a time-only test.
pub const TIME_MODE_WORDS: usize = 200;

const NUMBER_CHANCE: f64 = 0.15;
const PUNCTUATION_CHANCE: f64 = 0.2;
const PUNCTUATION_MARKS: [char; 6] = [',', '.', ';', ':', '!', '?'];

const PUNCTUATION_SAMPLE: &str =
    "Hello, world! How are you? Let's test: commas, periods. Semicolons; colons: dashes - and more!";
const NUMBER_SAMPLE: &str =
    "In 2023, the population was 7.9 billion. 1, 2, 3, 4, 5... The code 123-456-7890 is a phone number.";
const PYTHON_SAMPLE: &str = "def greet(name):\n    print(f\"Hello, {name}!\")\n\ngreet(\"World\")";
const JAVASCRIPT_SAMPLE: &str =
    "function greet(name) {\n  console.log('Hello, ' + name + '!');\n}\ngreet('World');";
const SAMPLE_TEXTS: [&str; 5] = [
    "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs.",
    "Programming is the art of telling another human being what one wants the computer to do.",
    "Simplicity is the ultimate sophistication. Less is more. Good design is invisible.",
    "To be, or not to be, that is the question: Whether 'tis nobler in the mind to suffer the slings and arrows of outrageous fortune.",
    "The journey of a thousand miles begins with a single step. An investment in knowledge pays the best interest.",
];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn accepts(self, word: &str) -> bool {
        let len = word.chars().count();
        match self {
            Difficulty::Easy => len <= 4,
            Difficulty::Medium => len <= 7,
            Difficulty::Hard => len >= 5,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CodeLanguage {
    #[default]
    Python,
    #[value(name = "javascript")]
    JavaScript,
}

impl CodeLanguage {
    pub fn sample(self) -> &'static str {
        match self {
            CodeLanguage::Python => PYTHON_SAMPLE,
            CodeLanguage::JavaScript => JAVASCRIPT_SAMPLE,
        }
    }
}

/// Identifies one outstanding content request so late responses can be
/// recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Everything a provider needs to produce target text.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRequest {
    pub id: RequestId,
    pub modes: ModeSet,
    pub words: usize,
    /// Seconds, for duration-bound modes.
    pub duration: Option<u32>,
    pub difficulty: Difficulty,
    pub include_numbers: bool,
    pub include_punctuation: bool,
    pub language: String,
    pub code_language: CodeLanguage,
    pub custom_text: Option<String>,
}

pub trait ContentProvider {
    fn fetch(&self, request: &ContentRequest) -> ContentResult<String>;
}

/// Always returns the same text, whatever the request.
#[derive(Debug, Clone)]
pub struct StaticContent(pub String);

impl StaticContent {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }
}

impl ContentProvider for StaticContent {
    fn fetch(&self, _request: &ContentRequest) -> ContentResult<String> {
        if self.0.is_empty() {
            return Err(ContentError::EmptyText);
        }
        Ok(self.0.clone())
    }
}

/// Bundled word list.
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(name: &str) -> ContentResult<Self> {
        let file_name = format!("{}.json", name.to_lowercase());
        let file = LANG_DIR
            .get_file(&file_name)
            .ok_or_else(|| ContentError::UnsupportedLanguage(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| ContentError::UnsupportedLanguage(name.to_string()))?;
        serde_json::from_str(contents).map_err(|source| ContentError::WordList {
            name: name.to_string(),
            source,
        })
    }
}

/// Offline provider: generated words from the bundled lists plus fixed
/// passages for code, zen and the standalone punctuation/number modes.
#[derive(Debug)]
pub struct LocalContentProvider {
    rng: RefCell<StdRng>,
}

impl LocalContentProvider {
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn generate_words(&self, request: &ContentRequest, count: usize) -> ContentResult<String> {
        let language = Language::load(&request.language)?;
        let pool: Vec<&String> = language
            .words
            .iter()
            .filter(|w| request.difficulty.accepts(w))
            .collect();
        let pool = if pool.is_empty() {
            language.words.iter().collect()
        } else {
            pool
        };

        let rng = &mut *self.rng.borrow_mut();
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(base) = pool.choose(rng) else {
                break;
            };
            let mut word = (*base).clone();
            if request.include_numbers && rng.gen_bool(NUMBER_CHANCE) {
                word = rng.gen_range(0..10_000).to_string();
            }
            if request.include_punctuation && rng.gen_bool(PUNCTUATION_CHANCE) {
                if let Some(mark) = PUNCTUATION_MARKS.choose(rng) {
                    word.push(*mark);
                }
            }
            words.push(word);
        }
        Ok(words.join(" "))
    }

    fn sample_text(&self) -> String {
        let rng = &mut *self.rng.borrow_mut();
        SAMPLE_TEXTS
            .choose(rng)
            .copied()
            .unwrap_or(SAMPLE_TEXTS[0])
            .to_string()
    }
}

impl Default for LocalContentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentProvider for LocalContentProvider {
    fn fetch(&self, request: &ContentRequest) -> ContentResult<String> {
        let modes = &request.modes;
        let text = if modes.contains(ModeFlag::Code) {
            request.code_language.sample().to_string()
        } else if modes.contains(ModeFlag::Zen) {
            self.sample_text()
        } else if modes.contains(ModeFlag::Custom) {
            request.custom_text.clone().unwrap_or_default()
        } else if modes.contains(ModeFlag::Words) {
            self.generate_words(request, request.words)?
        } else if modes.contains(ModeFlag::Time) {
            self.generate_words(request, TIME_MODE_WORDS)?
        } else if modes.contains(ModeFlag::Punctuation) {
            PUNCTUATION_SAMPLE.to_string()
        } else if modes.contains(ModeFlag::Numbers) {
            NUMBER_SAMPLE.to_string()
        } else {
            self.sample_text()
        };

        if text.trim().is_empty() {
            return Err(ContentError::EmptyText);
        }
        Ok(text)
    }
}
