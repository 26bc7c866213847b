use anyhow::{Context, Result};
use cafe_feedback::client::FeedbackClient;
use cafe_feedback::config::Config;
use cafe_feedback::feedback::{self, parse_timestamp, FeedbackRecord};
use cafe_feedback::keywords::{KeywordAnalyzer, Period};
use cafe_feedback::stats::{self, TrendDirection};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword and rating analysis for café feedback")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Source {
    /// Read records from a JSON file instead of the backend
    #[arg(long)]
    input: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, env = "FEEDBACK_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Top positive, neutral and negative keywords
    Keywords {
        #[command(flatten)]
        source: Source,

        /// week, month or year
        #[arg(long)]
        period: Option<Period>,

        /// Keywords kept per bucket
        #[arg(long)]
        top_n: Option<usize>,

        /// Lexicon JSON file
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Reference time (e.g. 2024-01-15T12:00:00), defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// Rating summary, distribution, per-table and per-weekday figures
    Stats {
        #[command(flatten)]
        source: Source,

        /// Average rating of the reference week
        #[arg(long, default_value = "4.3")]
        previous_average: f64,

        /// Reference time (e.g. 2024-01-15T12:00:00), defaults to now
        #[arg(long)]
        now: Option<String>,
    },
    /// Dashboard alerts, unread first
    Alerts {
        #[command(flatten)]
        source: Source,
    },
    /// Lexicon sizes and words listed in several buckets
    Lexicon {
        /// Lexicon JSON file
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
}

fn reference_time(raw: Option<&str>) -> Result<NaiveDateTime> {
    match raw {
        Some(raw) => parse_timestamp(raw).with_context(|| format!("Unreadable --now value: {}", raw)),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

fn client(config: &Config, source: &Source) -> FeedbackClient {
    let url = source.api_url.clone().unwrap_or_else(|| config.api_url.clone());
    FeedbackClient::new(url, config.api_token.clone())
}

async fn load_feedback(config: &Config, source: &Source) -> Result<Vec<FeedbackRecord>> {
    match &source.input {
        Some(path) => feedback::load_records(path)
            .with_context(|| format!("Failed to read feedback from {}", path.display())),
        None => {
            let client = client(config, source);
            client
                .fetch_feedback()
                .await
                .with_context(|| format!("Failed to fetch feedback from {}", client.base_url()))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Command::Keywords {
            source,
            period,
            top_n,
            lexicon,
            now,
        } => {
            if lexicon.is_some() {
                config.lexicon_path = lexicon;
            }
            let lexicon = config.load_lexicon()?;
            let now = reference_time(now.as_deref())?;
            let records = load_feedback(&config, &source).await?;

            let report = KeywordAnalyzer::new(&lexicon)
                .with_top_n(top_n.unwrap_or(config.top_n))
                .analyze(&records, period.unwrap_or(config.period), now);
            print_json(&report)?;
        }
        Command::Stats {
            source,
            previous_average,
            now,
        } => {
            let now = reference_time(now.as_deref())?;
            let records = load_feedback(&config, &source).await?;

            let summary = stats::summarize(&records, now);
            let trend = TrendDirection::from_delta(summary.average_rating, previous_average);
            print_json(&serde_json::json!({
                "summary": summary,
                "trend": trend,
                "trendCaption": trend.caption(),
                "ratingDistribution": stats::rating_distribution(&records),
                "tablePerformance": stats::table_performance(&records),
                "weekdayTrend": stats::weekday_trend(&records),
            }))?;
        }
        Command::Alerts { source } => {
            let mut alerts: Vec<feedback::Alert> = match &source.input {
                Some(path) => {
                    let json = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read alerts from {}", path.display()))?;
                    serde_json::from_str(&json).context("Invalid alerts JSON")?
                }
                None => client(&config, &source).fetch_alerts().await?,
            };
            feedback::sort_unread_first(&mut alerts);
            tracing::info!(unread = feedback::unread_count(&alerts), "Alerts loaded");
            print_json(&alerts)?;
        }
        Command::Lexicon { lexicon } => {
            if lexicon.is_some() {
                config.lexicon_path = lexicon;
            }
            let lexicon = config.load_lexicon()?;
            print_json(&serde_json::json!({
                "stats": lexicon.stats(),
                "collisions": lexicon.collisions(),
            }))?;
        }
    }

    Ok(())
}
