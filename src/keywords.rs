//! Keyword extraction and sentiment tallying over recent feedback.
//!
//! Comments inside the selected period are normalized, split into words, and
//! each word is counted in exactly one bucket (positive, neutral, negative)
//! according to the [`Lexicon`]. Each bucket is then ranked by frequency and
//! cut to the top entries.

use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::feedback::FeedbackRecord;
use crate::lexicon::{Lexicon, Sentiment};
use crate::text::{normalize, tokenize};

pub const DEFAULT_TOP_N: usize = 10;

/// Recency window ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
    Year,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown period '{0}', expected week, month or year")]
pub struct ParsePeriodError(String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(ParsePeriodError(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        };
        f.write_str(name)
    }
}

impl Period {
    /// First instant still inside the period.
    ///
    /// Months and years are calendar arithmetic: when the target month is
    /// shorter the day is clamped to its last day (Mar 31 minus one month is
    /// Feb 28/29), so the window never reaches into the following month.
    pub fn start(&self, now: NaiveDateTime) -> NaiveDateTime {
        let start = match self {
            Period::Week => now.checked_sub_signed(Duration::days(7)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::Year => now.checked_sub_months(Months::new(12)),
        };
        start.unwrap_or(NaiveDateTime::MIN)
    }

    pub fn contains(&self, date: NaiveDateTime, now: NaiveDateTime) -> bool {
        date >= self.start(now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Ranked keywords for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordReport {
    pub period: Period,
    pub period_start: NaiveDateTime,
    /// Records that fell inside the period.
    pub records_considered: usize,
    pub positive: Vec<KeywordCount>,
    pub neutral: Vec<KeywordCount>,
    pub negative: Vec<KeywordCount>,
}

impl KeywordReport {
    pub fn bucket(&self, sentiment: Sentiment) -> &[KeywordCount] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.neutral.is_empty() && self.negative.is_empty()
    }
}

/// Word counts kept in first-seen order so ties rank by discovery.
#[derive(Debug, Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<KeywordCount>,
}

impl Tally {
    fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push(KeywordCount {
                    word: word.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn into_ranked(self, top_n: usize) -> Vec<KeywordCount> {
        rank(self.entries, top_n)
    }
}

/// Sorts by count descending, keeping input order on ties, and truncates.
pub fn rank(mut counts: Vec<KeywordCount>, top_n: usize) -> Vec<KeywordCount> {
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

/// Stateless analyzer over a borrowed lexicon. Safe to share between threads.
#[derive(Debug, Clone, Copy)]
pub struct KeywordAnalyzer<'a> {
    lexicon: &'a Lexicon,
    top_n: usize,
}

impl Default for KeywordAnalyzer<'static> {
    fn default() -> Self {
        Self::new(Lexicon::bundled())
    }
}

impl<'a> KeywordAnalyzer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Tallies keywords from the records dated inside `period` before `now`.
    ///
    /// Records without a readable date are skipped; a missing comment counts
    /// as empty. Same inputs always give the same report.
    pub fn analyze(
        &self,
        records: &[FeedbackRecord],
        period: Period,
        now: NaiveDateTime,
    ) -> KeywordReport {
        let period_start = period.start(now);
        let mut positive = Tally::default();
        let mut neutral = Tally::default();
        let mut negative = Tally::default();
        let mut records_considered = 0;

        for record in records {
            let Some(date) = record.timestamp() else {
                tracing::debug!(id = record.id, "Skipping feedback without a readable date");
                continue;
            };
            if date < period_start {
                continue;
            }
            records_considered += 1;

            let cleaned = normalize(record.comment_text());
            for token in tokenize(&cleaned) {
                match self.lexicon.classify(token) {
                    Some(Sentiment::Positive) => positive.add(token),
                    Some(Sentiment::Negative) => negative.add(token),
                    Some(Sentiment::Neutral) => neutral.add(token),
                    None => {}
                }
            }
        }

        tracing::debug!(
            %period,
            records = records.len(),
            considered = records_considered,
            "Keyword analysis done"
        );

        KeywordReport {
            period,
            period_start,
            records_considered,
            positive: positive.into_ranked(self.top_n),
            neutral: neutral.into_ranked(self.top_n),
            negative: negative.into_ranked(self.top_n),
        }
    }
}
