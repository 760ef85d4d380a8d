//! Input table: which books to collect and around which ban dates.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::config::InputConfig;

/// One book/ban-date pair to collect.
///
/// The date stays as text: parsing (and rejecting) it is the collector's job,
/// so a bad row still yields a failure record instead of aborting the load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub title: String,
    pub event_date: String,
    pub state: Option<String>,
}

impl Subject {
    pub fn new(title: impl Into<String>, event_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            event_date: event_date.into(),
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read input table {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("input table {source_name} has no '{column}' column")]
    MissingColumn { source_name: String, column: String },
}

/// Load subjects from a CSV file.
pub fn load_subjects(path: &Path, columns: &InputConfig) -> Result<Vec<Subject>, LoadError> {
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Csv {
        source_name: source_name.clone(),
        source: csv::Error::from(e),
    })?;
    read_subjects(file, columns, &source_name)
}

/// Load subjects from any CSV reader. Columns are matched by header name.
pub fn read_subjects<R: Read>(
    reader: R,
    columns: &InputConfig,
    source_name: &str,
) -> Result<Vec<Subject>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let find = |name: &str| headers.iter().position(|h| h.trim() == name);
    let missing = |column: &str| LoadError::MissingColumn {
        source_name: source_name.to_string(),
        column: column.to_string(),
    };
    let title_idx = find(&columns.title_column).ok_or_else(|| missing(&columns.title_column))?;
    let date_idx = find(&columns.date_column).ok_or_else(|| missing(&columns.date_column))?;
    let state_idx = find(&columns.state_column);

    let mut subjects = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(csv_err)?;
        let title = record.get(title_idx).unwrap_or("").trim();
        let event_date = record.get(date_idx).unwrap_or("").trim();
        if title.is_empty() && event_date.is_empty() {
            continue;
        }
        let state = state_idx
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        subjects.push(Subject {
            title: title.to_string(),
            event_date: event_date.to_string(),
            state,
        });
    }
    Ok(subjects)
}

/// Three well-known bans used for trial runs.
pub fn sample_subjects() -> Vec<Subject> {
    vec![
        Subject::new("Gender Queer", "2022-09-01"),
        Subject::new("All Boys Aren't Blue", "2022-10-15"),
        Subject::new("The Bluest Eye", "2022-08-20"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEN_SAMPLE: &str = "\
Author,Book Title,State,District,Ban Date
Maia Kobabe,Gender Queer,Florida,Escambia,2022-09-01
George M. Johnson,All Boys Aren't Blue,,Polk,2022-10-15
,,,,
Toni Morrison,The Bluest Eye,Texas,Katy ISD,2022-8-20
";

    #[test]
    fn reads_columns_by_header_name() {
        let subjects = read_subjects(PEN_SAMPLE.as_bytes(), &InputConfig::default(), "pen").unwrap();
        assert_eq!(subjects.len(), 3);
        assert_eq!(
            subjects[0],
            Subject::new("Gender Queer", "2022-09-01").with_state("Florida")
        );
        assert_eq!(subjects[1].state, None);
        // Dates are passed through untouched; the collector rejects bad ones.
        assert_eq!(subjects[2].event_date, "2022-8-20");
    }

    #[test]
    fn missing_state_column_is_allowed() {
        let csv = "Book Title,Ban Date\nBeloved,2021-11-01\n";
        let subjects = read_subjects(csv.as_bytes(), &InputConfig::default(), "t").unwrap();
        assert_eq!(subjects, vec![Subject::new("Beloved", "2021-11-01")]);
    }

    #[test]
    fn missing_date_column_is_an_error() {
        let csv = "Book Title,When\nBeloved,2021-11-01\n";
        let err = read_subjects(csv.as_bytes(), &InputConfig::default(), "t").unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "Ban Date"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_column_names() {
        let columns = InputConfig {
            title_column: "Title".into(),
            date_column: "Date".into(),
            ..InputConfig::default()
        };
        let csv = "Title,Date\nMaus,2022-01-10\n";
        let subjects = read_subjects(csv.as_bytes(), &columns, "t").unwrap();
        assert_eq!(subjects[0].title, "Maus");
    }

    #[test]
    fn sample_has_three_bans() {
        let s = sample_subjects();
        assert_eq!(s.len(), 3);
        assert_eq!(s[2].title, "The Bluest Eye");
    }
}
