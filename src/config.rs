use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_SOURCE: &str = "problem.csv";
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

#[derive(Parser, Debug, Clone)]
#[command(name = "timed-quiz", version, about = "Timed quiz over a question,answer csv file")]
pub struct Args {
    /// The path to a csv file. Must have the format of 'question,answer'
    #[arg(long = "csv", default_value = DEFAULT_SOURCE, env = "QUIZ_CSV")]
    pub source_path: PathBuf,

    /// Doesn't run the quiz, prints the full quiz contents instead
    #[arg(long, env = "QUIZ_DEBUG")]
    pub debug: bool,

    /// The time limit for the whole quiz in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_SECS, env = "QUIZ_TIME_LIMIT")]
    pub time_limit: u64,
}

/// Resolved settings handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub source_path: PathBuf,
    pub debug: bool,
    pub time_limit: Duration,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            debug: false,
            time_limit: Duration::from_secs(DEFAULT_TIME_LIMIT_SECS),
        }
    }
}

impl From<Args> for QuizConfig {
    fn from(args: Args) -> Self {
        Self {
            source_path: args.source_path,
            debug: args.debug,
            time_limit: Duration::from_secs(args.time_limit),
        }
    }
}
