//! # ROUGE evaluation of extractive summaries
//!
//! Candidate and reference summaries are lower-cased and stripped of non-alphanumeric characters
//! before scoring. Sentences inside a summary may be separated by `<q>`, the separator used in the
//! candidate and gold files written by `write_results`.
//!
//! ```
//! # fn main() -> anyhow::Result<()> {
//! use bertsum::evaluation::rouge_scores;
//!
//! let candidates = ["the cat sat on the mat<q>it was sunny"];
//! let references = ["the cat sat on the mat"];
//! let scores = rouge_scores(&candidates, &references)?;
//! assert_eq!(scores.rouge_1.recall, 1.0);
//! assert!(scores.rouge_1.precision < 1.0);
//! # Ok(())
//! # }
//! ```

mod rouge;

pub use rouge::{
    rouge_l, rouge_n, rouge_scores, score_summary, RougeScore, RougeScores, SENTENCE_SEPARATOR,
};

use crate::common::error::BertSumError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes candidate and gold summaries, one document per line, to `<prefix>.candidate` and
/// `<prefix>.gold` in `directory`. Line breaks inside a summary are replaced by spaces.
///
/// # Returns
///
/// * paths of the candidate and gold files
pub fn write_results<P: AsRef<Path>, S: AsRef<str>>(
    directory: P,
    prefix: &str,
    candidates: &[S],
    references: &[S],
) -> Result<(PathBuf, PathBuf), BertSumError> {
    if candidates.len() != references.len() {
        return Err(BertSumError::LengthMismatch {
            candidates: candidates.len(),
            references: references.len(),
        });
    }
    let directory = directory.as_ref();
    std::fs::create_dir_all(directory)?;
    let candidate_path = directory.join(format!("{}.candidate", prefix));
    let gold_path = directory.join(format!("{}.gold", prefix));
    write_lines(&candidate_path, candidates)?;
    write_lines(&gold_path, references)?;
    Ok((candidate_path, gold_path))
}

fn write_lines<S: AsRef<str>>(path: &Path, summaries: &[S]) -> Result<(), BertSumError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for summary in summaries {
        writeln!(writer, "{}", summary.as_ref().replace('\n', " "))?;
    }
    writer.flush()?;
    Ok(())
}
