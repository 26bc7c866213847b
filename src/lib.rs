//! Keyword sentiment analysis and rating statistics for café customer feedback.
//!
//! The admin dashboard fetches feedback from the backend, then calls into
//! [`keywords::KeywordAnalyzer`] every time the period filter changes:
//!
//! ```
//! use cafe_feedback::feedback::parse_records;
//! use cafe_feedback::keywords::{KeywordAnalyzer, Period};
//! use cafe_feedback::feedback::parse_timestamp;
//!
//! let records = parse_records(r#"[
//!     {"id": 1, "date": "2024-01-14T10:00:00", "rating": 5, "tableNumber": "3",
//!      "comment": "Café délicieux, service rapide"}
//! ]"#).unwrap();
//! let now = parse_timestamp("2024-01-15T12:00:00").unwrap();
//!
//! let report = KeywordAnalyzer::default().analyze(&records, Period::Week, now);
//! assert_eq!(report.positive[0].word, "café");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod feedback;
pub mod keywords;
pub mod lexicon;
pub mod stats;
pub mod text;

pub use error::{ClientError, ConfigError, FeedbackError, LexiconError};
pub use feedback::{Alert, FeedbackRecord};
pub use keywords::{KeywordAnalyzer, KeywordCount, KeywordReport, Period};
pub use lexicon::{Lexicon, Sentiment};
