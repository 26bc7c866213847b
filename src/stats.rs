//! Rating statistics for the dashboard cards and charts.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::feedback::{FeedbackRecord, TableNumber};
use crate::keywords::Period;

/// Ratings at or above this count as positive feedback.
pub const POSITIVE_RATING: i32 = 4;

pub const WEEKDAYS: [&str; 7] = ["Dim", "Lun", "Mar", "Mer", "Jeu", "Ven", "Sam"];

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub total: usize,
    /// Mean rating, one decimal.
    pub average_rating: f64,
    pub positive_percentage: u32,
    /// Feedback received during the last seven days.
    pub weekly_count: usize,
}

pub fn summarize(records: &[FeedbackRecord], now: NaiveDateTime) -> FeedbackSummary {
    let total = records.len();
    if total == 0 {
        return FeedbackSummary {
            total: 0,
            average_rating: 0.0,
            positive_percentage: 0,
            weekly_count: 0,
        };
    }

    let sum: i64 = records.iter().map(|r| r.rating as i64).sum();
    let positive = records.iter().filter(|r| r.rating >= POSITIVE_RATING).count();
    let weekly_count = records
        .iter()
        .filter_map(FeedbackRecord::timestamp)
        .filter(|date| Period::Week.contains(*date, now))
        .count();

    FeedbackSummary {
        total,
        average_rating: round_to(sum as f64 / total as f64, 1),
        positive_percentage: percentage(positive, total),
        weekly_count,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingBucket {
    pub rating: i32,
    pub count: usize,
    pub percentage: u32,
}

/// Share of each star rating, five stars first.
///
/// Out-of-range ratings are not bucketed but still count toward the total.
pub fn rating_distribution(records: &[FeedbackRecord]) -> Vec<RatingBucket> {
    let mut counts = [0usize; 5];
    for record in records {
        if (1..=5).contains(&record.rating) {
            counts[(record.rating - 1) as usize] += 1;
        }
    }

    (1..=5)
        .rev()
        .map(|rating| {
            let count = counts[(rating - 1) as usize];
            RatingBucket {
                rating,
                count,
                percentage: percentage(count, records.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePerformance {
    pub table: TableNumber,
    pub count: usize,
    pub average_rating: f64,
}

pub fn table_performance(records: &[FeedbackRecord]) -> Vec<TablePerformance> {
    let mut tables: BTreeMap<TableNumber, (usize, i64)> = BTreeMap::new();
    for record in records {
        let entry = tables.entry(record.table_number.canonical()).or_default();
        entry.0 += 1;
        entry.1 += record.rating as i64;
    }

    tables
        .into_iter()
        .map(|(table, (count, sum))| TablePerformance {
            table,
            count,
            average_rating: round_to(sum as f64 / count as f64, 1),
        })
        .collect()
}

/// Feedback volume and mean rating per day of the week, Sunday first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayTrend {
    pub days: Vec<String>,
    pub feedback_counts: Vec<usize>,
    pub average_ratings: Vec<f64>,
}

pub fn weekday_trend(records: &[FeedbackRecord]) -> WeekdayTrend {
    let mut counts = [0usize; 7];
    let mut sums = [0i64; 7];

    for record in records {
        let Some(date) = record.timestamp() else {
            continue;
        };
        let day = date.weekday().num_days_from_sunday() as usize;
        counts[day] += 1;
        sums[day] += record.rating as i64;
    }

    let average_ratings = counts
        .iter()
        .zip(sums.iter())
        .map(|(&count, &sum)| {
            if count == 0 {
                0.0
            } else {
                round_to(sum as f64 / count as f64, 2)
            }
        })
        .collect();

    WeekdayTrend {
        days: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
        feedback_counts: counts.to_vec(),
        average_ratings,
    }
}

/// Direction of the average rating compared with a reference week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    SignificantRise,
    SlightRise,
    Stable,
    SlightDrop,
    SignificantDrop,
}

const SIGNIFICANT_DELTA: f64 = 0.2;

impl TrendDirection {
    pub fn from_delta(current: f64, previous: f64) -> Self {
        let delta = current - previous;
        if delta > SIGNIFICANT_DELTA {
            TrendDirection::SignificantRise
        } else if delta > 0.0 {
            TrendDirection::SlightRise
        } else if delta < -SIGNIFICANT_DELTA {
            TrendDirection::SignificantDrop
        } else if delta < 0.0 {
            TrendDirection::SlightDrop
        } else {
            TrendDirection::Stable
        }
    }

    /// Dashboard caption, in French like the rest of the admin UI.
    pub fn caption(&self) -> &'static str {
        match self {
            TrendDirection::SignificantRise => {
                "La note moyenne s'améliore significativement cette semaine."
            }
            TrendDirection::SlightRise => {
                "La note moyenne s'améliore progressivement tout au long de la semaine."
            }
            TrendDirection::Stable => {
                "La note moyenne reste stable par rapport à la semaine précédente."
            }
            TrendDirection::SlightDrop => "La note moyenne diminue légèrement cette semaine.",
            TrendDirection::SignificantDrop => {
                "Attention : la note moyenne baisse de manière significative."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::RawDate;
    use chrono::NaiveDate;

    fn record(rating: i32, table: TableNumber, date: Option<&str>) -> FeedbackRecord {
        FeedbackRecord {
            id: 0,
            date: date.map(|d| RawDate::Text(d.to_string())),
            rating,
            table_number: table,
            name: None,
            comment: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<FeedbackRecord> {
        vec![
            record(5, TableNumber::Text("2".into()), Some("2024-01-14T10:00:00")), // Sun
            record(4, TableNumber::Number(2), Some("2024-01-15T09:00:00")),        // Mon
            record(2, TableNumber::Text("10".into()), Some("2024-01-01T09:00:00")), // Mon
            record(1, TableNumber::Text("terrasse".into()), None),
        ]
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample(), now());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average_rating, 3.0);
        assert_eq!(summary.positive_percentage, 50);
        assert_eq!(summary.weekly_count, 2);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[], now());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.positive_percentage, 0);
    }

    #[test]
    fn test_rating_distribution() {
        let mut records = sample();
        records.push(record(9, TableNumber::Number(1), None));
        let dist = rating_distribution(&records);
        let ratings: Vec<i32> = dist.iter().map(|b| b.rating).collect();
        assert_eq!(ratings, vec![5, 4, 3, 2, 1]);
        assert_eq!(dist[0], RatingBucket { rating: 5, count: 1, percentage: 20 });
        assert_eq!(dist[2].count, 0);
        assert_eq!(dist.iter().map(|b| b.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_table_performance_groups_text_and_numbers() {
        let tables = table_performance(&sample());
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].table, TableNumber::Number(2));
        assert_eq!(tables[0].count, 2);
        assert_eq!(tables[0].average_rating, 4.5);
        assert_eq!(tables[1].table, TableNumber::Number(10));
        assert_eq!(tables[2].table, TableNumber::Text("terrasse".into()));
    }

    #[test]
    fn test_unassigned_table_grouped_apart() {
        let records = crate::feedback::parse_records(
            r#"[
                {"id": 1, "rating": 5, "tableNumber": null},
                {"id": 2, "rating": 3, "tableNumber": null},
                {"id": 3, "rating": 4, "tableNumber": "3"}
            ]"#,
        )
        .unwrap();
        let tables = table_performance(&records);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].table, TableNumber::Number(3));
        assert_eq!(tables[1].table, TableNumber::default());
        assert_eq!(tables[1].count, 2);
        assert_eq!(tables[1].average_rating, 4.0);
    }

    #[test]
    fn test_weekday_trend() {
        let trend = weekday_trend(&sample());
        assert_eq!(trend.days[0], "Dim");
        assert_eq!(trend.feedback_counts, vec![1, 2, 0, 0, 0, 0, 0]);
        assert_eq!(trend.average_ratings[0], 5.0);
        assert_eq!(trend.average_ratings[1], 3.0);
        assert_eq!(trend.average_ratings[2], 0.0);
    }

    #[test]
    fn test_trend_direction() {
        assert_eq!(TrendDirection::from_delta(4.6, 4.3), TrendDirection::SignificantRise);
        assert_eq!(TrendDirection::from_delta(4.4, 4.3), TrendDirection::SlightRise);
        assert_eq!(TrendDirection::from_delta(4.3, 4.3), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_delta(4.2, 4.3), TrendDirection::SlightDrop);
        assert_eq!(TrendDirection::from_delta(3.9, 4.3), TrendDirection::SignificantDrop);
        assert!(TrendDirection::Stable.caption().contains("stable"));
    }
}
