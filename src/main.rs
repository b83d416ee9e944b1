mod config;
mod quiz;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use log::debug;

use config::{Args, QuizConfig};
use quiz::engine::QuizEngine;
use quiz::error::QuizError;
use quiz::reader::AnswerReader;
use quiz::source::ProblemSource;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine, the flags and their defaults still apply
    dotenv().ok();
    pretty_env_logger::init();

    let config = QuizConfig::from(Args::parse());
    log::info!("Starting quiz...");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(fail(&err, &mut io::stderr())),
    }
}

async fn run(config: QuizConfig) -> Result<(), QuizError> {
    debug!(
        "Reading quiz from {}, time limit: {}s",
        config.source_path.display(),
        config.time_limit.as_secs()
    );
    let problems = ProblemSource::open(&config.source_path)?.into_problems();

    let reader = AnswerReader::stdin();
    let mut engine = QuizEngine::new(problems, config, io::stdout());
    let outcome = engine.run(&reader).await?;
    debug!(
        "Session ended ({:?}): {}/{} with {} answered",
        outcome.reason, outcome.score, outcome.total, outcome.answered
    );

    Ok(())
}

/// Reports a fatal error once on `stderr` and returns the exit code for it.
fn fail(err: &QuizError, stderr: &mut impl Write) -> u8 {
    debug!("Fatal: {err:?}");
    let _ = writeln!(stderr, "{err}");
    err.exit_code() as u8
}
