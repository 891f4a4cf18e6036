//! Bulk question import from CSV uploads.
//!
//! Rows are read one at a time from a buffered file on a blocking worker.
//! Accepted columns, first non-empty candidate wins per row:
//!
//! | field           | columns                     |
//! |-----------------|-----------------------------|
//! | question text   | `questionText`, `question`  |
//! | option A..D     | `option1..4`, `optionA..D`  |
//! | correct answer  | `correctAnswer`, `correct`  |
//!
//! Rows with an empty field or an answer outside A-D are skipped. Survivors
//! are appended to the test in a single store write, so a failed import
//! leaves the test untouched.

use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use uuid::Uuid;

use crate::error::Result;
use crate::models::question::{AnswerKey, Question, QuestionOptions};
use crate::services::test_service::test_not_found;
use crate::store::TestStore;
use crate::utils::{time::now, upload};

#[derive(Debug, Default)]
pub struct ParsedQuestions {
    pub questions: Vec<Question>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

struct ColumnMap {
    question_text: Vec<usize>,
    options: [Vec<usize>; 4],
    correct_answer: Vec<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}'))
            .collect();
        let find = |candidates: &[&str]| -> Vec<usize> {
            candidates
                .iter()
                .filter_map(|c| names.iter().position(|n| n == c))
                .collect()
        };

        Self {
            question_text: find(&["questionText", "question"]),
            options: [
                find(&["option1", "optionA"]),
                find(&["option2", "optionB"]),
                find(&["option3", "optionC"]),
                find(&["option4", "optionD"]),
            ],
            correct_answer: find(&["correctAnswer", "correct"]),
        }
    }

    fn value<'r>(record: &'r StringRecord, columns: &[usize]) -> &'r str {
        columns
            .iter()
            .filter_map(|&i| record.get(i))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    fn question(&self, record: &StringRecord) -> Option<Question> {
        let question_text = Self::value(record, &self.question_text);
        let [a, b, c, d] = &self.options;
        let options = QuestionOptions {
            a: Self::value(record, a).to_string(),
            b: Self::value(record, b).to_string(),
            c: Self::value(record, c).to_string(),
            d: Self::value(record, d).to_string(),
        };
        if question_text.is_empty() || !options.all_present() {
            return None;
        }
        let correct_answer = AnswerKey::parse(Self::value(record, &self.correct_answer))?;
        Some(Question::new(question_text.to_string(), options, correct_answer))
    }
}

/// Parses CSV rows into questions. A malformed stream is an error; invalid rows are counted, not reported.
pub fn parse_questions<R: Read>(reader: R) -> Result<ParsedQuestions> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(csv.headers()?);

    let mut parsed = ParsedQuestions::default();
    let mut record = StringRecord::new();
    while csv.read_record(&mut record)? {
        match columns.question(&record) {
            Some(question) => parsed.questions.push(question),
            None => {
                parsed.skipped += 1;
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                tracing::debug!(line, "skipping invalid CSV row");
            }
        }
    }
    Ok(parsed)
}

#[derive(Clone)]
pub struct CsvImporter {
    tests: Arc<dyn TestStore>,
}

impl CsvImporter {
    pub fn new(tests: Arc<dyn TestStore>) -> Self {
        Self { tests }
    }

    /// Imports a staged upload into an owned test. The staged file is removed afterwards either way.
    pub async fn import_file(
        &self,
        admin_id: Uuid,
        test_id: Uuid,
        path: &Path,
    ) -> Result<ImportSummary> {
        let outcome = self.import(admin_id, test_id, path.to_path_buf()).await;
        upload::discard(path).await;
        outcome
    }

    async fn import(&self, admin_id: Uuid, test_id: Uuid, path: PathBuf) -> Result<ImportSummary> {
        if self.tests.find_owned(admin_id, test_id).await?.is_none() {
            return Err(test_not_found());
        }

        let parsed = tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&path)?;
            parse_questions(BufReader::new(file))
        })
        .await??;

        let summary = ImportSummary {
            imported: parsed.questions.len(),
            skipped: parsed.skipped,
        };
        if !self
            .tests
            .append_questions(admin_id, test_id, parsed.questions, now())
            .await?
        {
            return Err(test_not_found());
        }

        tracing::info!(
            %test_id,
            imported = summary.imported,
            skipped = summary.skipped,
            "CSV import finished"
        );
        Ok(summary)
    }
}
