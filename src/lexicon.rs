//! Sentiment word lists used to bucket feedback keywords.
//!
//! The lists are configuration data: a JSON document with the arrays
//! `stopWords`, `positiveWords`, `neutralWords` and `negativeWords`. The café
//! lexicon (French, Modern Standard Arabic, Darija and a little English) ships
//! in `data/lexicon.json` and is available through [`Lexicon::bundled`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use crate::error::LexiconError;
use crate::text::char_len;

/// Tokens shorter than this (in characters) are never counted.
pub const MIN_KEYWORD_LEN: usize = 3;

const BUNDLED_JSON: &str = include_str!("../data/lexicon.json");

static BUNDLED: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::from_json_str(BUNDLED_JSON).expect("bundled lexicon is valid JSON")
});

/// Sentiment bucket a counted keyword lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// One of the four word lists of a lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordList {
    Stop,
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WordList::Stop => "stop",
            WordList::Positive => "positive",
            WordList::Neutral => "neutral",
            WordList::Negative => "negative",
        };
        f.write_str(name)
    }
}

/// A word listed in more than one list. Left for a human to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconCollision {
    pub word: String,
    pub lists: Vec<WordList>,
}

/// Entry counts per list, after deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexiconStats {
    pub stop_words: usize,
    pub positive_words: usize,
    pub neutral_words: usize,
    pub negative_words: usize,
    /// Entries containing a space; a single token can never match them.
    pub multi_word_entries: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LexiconFile {
    #[serde(default)]
    stop_words: Vec<String>,
    #[serde(default)]
    positive_words: Vec<String>,
    #[serde(default)]
    neutral_words: Vec<String>,
    #[serde(default)]
    negative_words: Vec<String>,
}

/// Immutable, deduplicated word lists.
///
/// The neutral list is informational only: any counted token that is neither
/// positive nor negative is neutral, listed or not.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    stop_words: HashSet<String>,
    positive_words: HashSet<String>,
    neutral_words: HashSet<String>,
    negative_words: HashSet<String>,
}

fn word_set<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

impl Lexicon {
    pub fn new<I, S>(stop_words: I, positive_words: I, neutral_words: I, negative_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: word_set(stop_words),
            positive_words: word_set(positive_words),
            neutral_words: word_set(neutral_words),
            negative_words: word_set(negative_words),
        }
    }

    /// The café lexicon compiled into the binary.
    pub fn bundled() -> &'static Lexicon {
        &BUNDLED
    }

    pub fn from_json_str(json: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(json)?;
        let lexicon = Self::new(
            file.stop_words,
            file.positive_words,
            file.neutral_words,
            file.negative_words,
        );
        lexicon.log_summary();
        Ok(lexicon)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loading lexicon");
        Self::from_json_str(&json)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn is_positive(&self, word: &str) -> bool {
        self.positive_words.contains(word)
    }

    pub fn is_negative(&self, word: &str) -> bool {
        self.negative_words.contains(word)
    }

    /// Buckets a normalized token, or `None` when it must not be counted.
    ///
    /// Order matters: length and stop-words first, then positive, then
    /// negative, and everything left over is neutral.
    pub fn classify(&self, token: &str) -> Option<Sentiment> {
        if char_len(token) < MIN_KEYWORD_LEN || self.is_stop_word(token) {
            return None;
        }

        if self.is_positive(token) {
            Some(Sentiment::Positive)
        } else if self.is_negative(token) {
            Some(Sentiment::Negative)
        } else {
            Some(Sentiment::Neutral)
        }
    }

    /// Every word present in two or more lists, sorted by word.
    pub fn collisions(&self) -> Vec<LexiconCollision> {
        let mut seen: BTreeMap<&str, Vec<WordList>> = BTreeMap::new();
        for (list, words) in self.lists() {
            for word in words {
                seen.entry(word.as_str()).or_default().push(list);
            }
        }

        seen.into_iter()
            .filter(|(_, lists)| lists.len() > 1)
            .map(|(word, mut lists)| {
                lists.sort();
                LexiconCollision {
                    word: word.to_string(),
                    lists,
                }
            })
            .collect()
    }

    pub fn stats(&self) -> LexiconStats {
        let multi_word_entries = self
            .lists()
            .iter()
            .flat_map(|(_, words)| words.iter())
            .filter(|w| w.contains(' '))
            .count();

        LexiconStats {
            stop_words: self.stop_words.len(),
            positive_words: self.positive_words.len(),
            neutral_words: self.neutral_words.len(),
            negative_words: self.negative_words.len(),
            multi_word_entries,
        }
    }

    fn lists(&self) -> [(WordList, &HashSet<String>); 4] {
        [
            (WordList::Stop, &self.stop_words),
            (WordList::Positive, &self.positive_words),
            (WordList::Neutral, &self.neutral_words),
            (WordList::Negative, &self.negative_words),
        ]
    }

    fn log_summary(&self) {
        let stats = self.stats();
        tracing::debug!(
            stop = stats.stop_words,
            positive = stats.positive_words,
            neutral = stats.neutral_words,
            negative = stats.negative_words,
            "Lexicon loaded"
        );

        for collision in self.collisions() {
            let lists: Vec<String> = collision.lists.iter().map(|l| l.to_string()).collect();
            tracing::warn!(
                word = %collision.word,
                lists = %lists.join(", "),
                "Lexicon word listed in several buckets; first match wins"
            );
        }
    }
}
