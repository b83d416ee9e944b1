use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::quiz::error::{MalformedReason, QuizError};
use crate::quiz::Problem;

/// Problems decoded from a `question,answer` table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemSource {
    pub problems: Vec<Problem>,
}

impl ProblemSource {
    pub fn open(path: &Path) -> Result<Self, QuizError> {
        let file = File::open(path).map_err(|source| QuizError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::from_reader(file).map_err(|reason| QuizError::SourceMalformed {
            path: path.to_path_buf(),
            reason,
        })?;

        debug!(
            "Loaded {} problem(s) from {}",
            source.problems.len(),
            path.display()
        );
        Ok(source)
    }

    /// Decodes CSV without a header row. Every record must have as many
    /// fields as the first one; the whole table is rejected otherwise.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MalformedReason> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        Self::from_records(rows)
    }

    /// Field 0 is the question as written, field 1 the answer. Anything past
    /// the second field is ignored.
    pub fn from_records<I, R, F>(records: I) -> Result<Self, MalformedReason>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[F]>,
        F: AsRef<str>,
    {
        let problems = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| match record.as_ref() {
                [question, answer, ..] => {
                    let question: &str = question.as_ref();
                    Ok(Problem::new(question, answer.as_ref()))
                }
                fields => Err(MalformedReason::TooFewFields {
                    record: i + 1,
                    found: fields.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { problems })
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}
