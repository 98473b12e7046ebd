//! Generated ninja emoji names.

use crate::error::{DomainError, DomainResult};

/// Build every `FirstLast` combination from lines of `First Last`.
///
/// Blank lines are skipped; any other line must hold exactly two words.
pub fn ninja_names(source: &str) -> DomainResult<Vec<String>> {
    let mut first_names = Vec::new();
    let mut last_names = Vec::new();

    for (lineno, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(first), Some(last), None) => {
                first_names.push(first);
                last_names.push(last);
            }
            _ => {
                return Err(DomainError::validation(format!(
                    "ninja names line {} must be 'First Last', got {:?}",
                    lineno + 1,
                    line
                )));
            }
        }
    }

    Ok(first_names
        .iter()
        .flat_map(|first| last_names.iter().map(move |last| format!("{first}{last}")))
        .collect())
}
