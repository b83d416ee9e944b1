pub mod clock;
pub mod engine;
pub mod error;
pub mod reader;
pub mod source;

/// Session state owned by the engine: the problems in file order plus the
/// running score and the index of the question currently being asked.
#[derive(Debug, Clone, Default)]
pub struct Quiz {
    pub problems: Vec<Problem>,
    pub current_question: usize,
    pub score: usize,
}

impl Quiz {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self {
            problems,
            current_question: 0,
            score: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.problems.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    pub question: String,
    pub answer: String,
}
impl Problem {
    /// The expected answer is stored trimmed so surrounding whitespace in the
    /// file never makes a correct reply count as wrong.
    pub fn new(question: impl Into<String>, answer: &str) -> Self {
        Self {
            question: question.into(),
            answer: answer.trim().to_string(),
        }
    }

    pub fn is_correct(&self, reply: &str) -> bool {
        reply.trim() == self.answer
    }
}
