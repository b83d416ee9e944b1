use std::io::{BufRead, Write};

use log::{debug, info};

use crate::config::QuizConfig;
use crate::quiz::clock::QuizClock;
use crate::quiz::error::QuizError;
use crate::quiz::reader::{AnswerReader, PendingAnswer};
use crate::quiz::{Problem, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    TimeExpired,
    QuizComplete,
    /// Debug runs only list the problems.
    Listed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingAnswer { question_number: usize },
    QuestionResolved { question_number: usize },
    SessionEnded(EndReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub score: usize,
    pub total: usize,
    pub answered: usize,
    pub reason: EndReason,
}

pub struct QuizEngine<W> {
    quiz: Quiz,
    config: QuizConfig,
    out: W,
}

impl<W: Write> QuizEngine<W> {
    pub fn new(problems: Vec<Problem>, config: QuizConfig, out: W) -> Self {
        Self {
            quiz: Quiz::new(problems),
            config,
            out,
        }
    }

    /// Runs one session. In debug mode the problems are listed and nothing is
    /// asked; otherwise the clock is armed and every question races against it.
    pub async fn run<R>(&mut self, reader: &AnswerReader<R>) -> Result<QuizOutcome, QuizError>
    where
        R: BufRead + Send + 'static,
    {
        if self.config.debug {
            self.list_problems()?;
            return Ok(self.outcome(0, EndReason::Listed));
        }

        info!(
            "Starting quiz with {} question(s), time limit {}s",
            self.quiz.total(),
            self.config.time_limit.as_secs()
        );
        let clock = QuizClock::start(self.config.time_limit);
        self.run_with_clock(&clock, reader).await
    }

    /// Asks every remaining question against an already running clock.
    pub async fn run_with_clock<R>(
        &mut self,
        clock: &QuizClock,
        reader: &AnswerReader<R>,
    ) -> Result<QuizOutcome, QuizError>
    where
        R: BufRead + Send + 'static,
    {
        let mut answered = 0;
        let mut state = if self.quiz.total() == 0 {
            State::SessionEnded(EndReason::QuizComplete)
        } else {
            State::AwaitingAnswer { question_number: 0 }
        };

        loop {
            state = match state {
                State::AwaitingAnswer { question_number } => {
                    self.quiz.current_question = question_number;
                    let problem = &self.quiz.problems[question_number];
                    write!(
                        self.out,
                        "Question {}:\n\t{} = ",
                        question_number + 1,
                        problem.question
                    )?;
                    self.out.flush()?;

                    match race(clock, reader.request_answer()).await {
                        None => State::SessionEnded(EndReason::TimeExpired),
                        Some(reply) => {
                            answered += 1;
                            if problem.is_correct(&reply) {
                                self.quiz.score += 1;
                                debug!("Correct!");
                            } else {
                                debug!("Wrong! expected {:?}, got {:?}", problem.answer, reply.trim());
                            }
                            State::QuestionResolved { question_number }
                        }
                    }
                }
                State::QuestionResolved { question_number } => {
                    if question_number + 1 < self.quiz.total() {
                        State::AwaitingAnswer {
                            question_number: question_number + 1,
                        }
                    } else {
                        State::SessionEnded(EndReason::QuizComplete)
                    }
                }
                State::SessionEnded(reason) => {
                    debug!(
                        "{:?} at question {} with {:?} left on the clock",
                        reason,
                        self.quiz.current_question + 1,
                        clock.remaining()
                    );
                    self.report(reason)?;
                    return Ok(self.outcome(answered, reason));
                }
            };
        }
    }

    fn report(&mut self, reason: EndReason) -> Result<(), QuizError> {
        if reason == EndReason::TimeExpired {
            write!(self.out, "\nTime ran out! ")?;
        }
        writeln!(self.out, "You scored {}/{}", self.quiz.score, self.quiz.total())?;
        self.out.flush()?;
        Ok(())
    }

    fn list_problems(&mut self) -> Result<(), QuizError> {
        for (i, problem) in self.quiz.problems.iter().enumerate() {
            writeln!(
                self.out,
                "Question {}: {} = {}",
                i + 1,
                problem.question,
                problem.answer
            )?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn outcome(&self, answered: usize, reason: EndReason) -> QuizOutcome {
        QuizOutcome {
            score: self.quiz.score,
            total: self.quiz.total(),
            answered,
            reason,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

/// Waits for whichever comes first, the answer or the expiry. `None` means the
/// time ran out. Expiry is polled first, so it wins when both are ready.
async fn race(clock: &QuizClock, pending: PendingAnswer) -> Option<String> {
    tokio::select! {
        biased;
        _ = clock.expired() => None,
        reply = pending.recv() => Some(reply),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use super::*;

    fn arithmetic() -> Vec<Problem> {
        vec![Problem::new("2+2", "4"), Problem::new("3+3", "6")]
    }

    fn config(time_limit: Duration) -> QuizConfig {
        QuizConfig {
            time_limit,
            ..QuizConfig::default()
        }
    }

    async fn play(
        problems: Vec<Problem>,
        config: QuizConfig,
        input: &'static str,
    ) -> (QuizOutcome, String) {
        let reader = AnswerReader::new(Cursor::new(input));
        let mut engine = QuizEngine::new(problems, config, Vec::new());
        let outcome = tokio::time::timeout(Duration::from_secs(10), engine.run(&reader))
            .await
            .expect("session did not end")
            .unwrap();
        let printed = String::from_utf8(engine.into_output()).unwrap();
        (outcome, printed)
    }

    #[tokio::test]
    async fn all_correct_answers_score_full_marks() {
        let (outcome, printed) = play(arithmetic(), config(Duration::from_secs(60)), "4\n6\n").await;

        assert_eq!(
            outcome,
            QuizOutcome {
                score: 2,
                total: 2,
                answered: 2,
                reason: EndReason::QuizComplete,
            }
        );
        assert_eq!(
            printed,
            "Question 1:\n\t2+2 = Question 2:\n\t3+3 = You scored 2/2\n"
        );
    }

    #[tokio::test]
    async fn wrong_answers_do_not_score() {
        let (outcome, _) = play(arithmetic(), config(Duration::from_secs(60)), "5\n6\n").await;
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.answered, 2);
    }

    #[tokio::test]
    async fn replies_are_trimmed_but_case_sensitive() {
        let problems = vec![Problem::new("capital of France", "Paris")];

        let (outcome, _) = play(problems.clone(), config(Duration::from_secs(60)), "  Paris \r\n").await;
        assert_eq!(outcome.score, 1);

        let (outcome, _) = play(problems, config(Duration::from_secs(60)), "paris\n").await;
        assert_eq!(outcome.score, 0);
    }

    #[tokio::test]
    async fn zero_time_limit_ends_before_any_answer() {
        let (outcome, printed) = play(arithmetic(), config(Duration::ZERO), "4\n6\n").await;

        assert_eq!(
            outcome,
            QuizOutcome {
                score: 0,
                total: 2,
                answered: 0,
                reason: EndReason::TimeExpired,
            }
        );
        assert_eq!(printed, "Question 1:\n\t2+2 = \nTime ran out! You scored 0/2\n");
    }

    #[tokio::test]
    async fn expiry_mid_session_stops_scoring() {
        // the second answer never arrives, so the clock ends the session
        let problems = vec![
            Problem::new("2+2", "4"),
            Problem::new("3+3", "6"),
            Problem::new("4+4", "8"),
        ];
        let (outcome, printed) = play(problems, config(Duration::from_millis(200)), "4\n").await;

        assert_eq!(outcome.reason, EndReason::TimeExpired);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.answered, 1);
        assert!(printed.contains("Question 2:"));
        assert!(!printed.contains("Question 3:"));
        assert!(printed.ends_with("\nTime ran out! You scored 1/3\n"));
    }

    #[tokio::test]
    async fn clock_keeps_running_between_questions() {
        let reader = AnswerReader::new(Cursor::new("4\n"));
        let clock = QuizClock::start(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // the deadline passed before the first question was even asked
        let mut engine = QuizEngine::new(arithmetic(), config(Duration::from_secs(60)), Vec::new());
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            engine.run_with_clock(&clock, &reader),
        )
        .await
        .expect("late race never observed the expiry")
        .unwrap();

        assert_eq!(outcome.reason, EndReason::TimeExpired);
        assert_eq!(outcome.score, 0);
    }

    #[tokio::test]
    async fn score_never_exceeds_total() {
        for input in ["4\n6\n", "4\n", "", "x\ny\n", "4\n6\n8\n10\n"] {
            let (outcome, _) = play(arithmetic(), config(Duration::from_millis(100)), input).await;
            assert!(outcome.score <= outcome.answered);
            assert!(outcome.answered <= outcome.total);
        }
    }

    #[tokio::test]
    async fn debug_mode_lists_problems_without_asking() {
        let config = QuizConfig {
            debug: true,
            time_limit: Duration::ZERO,
            ..QuizConfig::default()
        };
        let (outcome, printed) = play(arithmetic(), config, "4\n6\n").await;

        assert_eq!(outcome.reason, EndReason::Listed);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.answered, 0);
        assert_eq!(printed, "Question 1: 2+2 = 4\nQuestion 2: 3+3 = 6\n");
    }

    #[tokio::test]
    async fn time_out_report_is_a_single_line() {
        let (_, printed) = play(vec![Problem::new("2+2", "4")], config(Duration::ZERO), "").await;
        assert!(printed.ends_with("\nTime ran out! You scored 0/1\n"));
        assert_eq!(printed.lines().filter(|l| l.contains("You scored")).count(), 1);
    }

    #[tokio::test]
    async fn expiry_wins_when_answer_is_also_ready() {
        let clock = QuizClock::start(Duration::ZERO);
        let winner = race(&clock, PendingAnswer::ready("4\n")).await;
        assert_eq!(winner, None);
    }

    #[tokio::test]
    async fn ready_answer_wins_while_time_remains() {
        let clock = QuizClock::start(Duration::from_secs(60));
        let winner = race(&clock, PendingAnswer::ready("4\n")).await;
        assert_eq!(winner.as_deref(), Some("4\n"));
    }

    #[tokio::test]
    async fn empty_quiz_completes_immediately() {
        let (outcome, printed) = play(Vec::new(), config(Duration::from_secs(60)), "").await;
        assert_eq!(outcome.reason, EndReason::QuizComplete);
        assert_eq!(printed, "You scored 0/0\n");
    }
}
