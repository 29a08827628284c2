use crate::domain::model::Subject;
use crate::domain::ports::SubjectSource;
use crate::utils::error::{GpaError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Reads `name,grade,credit` rows. Header names are trimmed and matched
/// case-insensitively; cell text is kept verbatim so the engine sees exactly
/// what was typed. Short rows leave the missing cells empty.
pub fn subjects_from_csv_reader<R: Read>(reader: R) -> Result<Vec<Subject>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let name_col = column("name");
    let (grade_col, credit_col) = match (column("grade"), column("credit")) {
        (Some(grade), Some(credit)) => (grade, credit),
        _ => {
            return Err(GpaError::InputParseError {
                input: headers.iter().collect::<Vec<_>>().join(","),
                reason: "CSV header must include grade and credit columns".to_string(),
            })
        }
    };

    let mut subjects = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let cell = |col: usize| record.get(col).unwrap_or("").to_string();
        subjects.push(Subject {
            name: name_col.map(cell).unwrap_or_default(),
            grade: cell(grade_col),
            credit: cell(credit_col),
        });
    }
    Ok(subjects)
}

pub fn read_subjects_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Subject>> {
    let file = std::fs::File::open(path.as_ref())?;
    let subjects = subjects_from_csv_reader(file)?;
    tracing::debug!(
        "Read {} subject(s) from {}",
        subjects.len(),
        path.as_ref().display()
    );
    Ok(subjects)
}

#[derive(Debug, Clone)]
pub struct CsvSubjectFile {
    path: PathBuf,
}

impl CsvSubjectFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubjectSource for CsvSubjectFile {
    fn load_subjects(&self) -> Result<Vec<Subject>> {
        read_subjects_csv(&self.path)
    }

    fn describe(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_rows_in_order() {
        let data = "name,grade,credit\nMath,A,3\nArt,b,4\n";
        let subjects = subjects_from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(
            subjects,
            vec![Subject::new("Math", "A", "3"), Subject::new("Art", "b", "4")]
        );
    }

    #[test]
    fn test_missing_cells_become_empty() {
        let data = " name , grade , credit \nMath,A\n,,\n";
        let subjects = subjects_from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].credit, "");
        assert!(subjects[1].is_blank());
    }

    #[test]
    fn test_header_without_credit_is_rejected() {
        let data = "subject,letter\nMath,A\n";
        assert!(matches!(
            subjects_from_csv_reader(data.as_bytes()),
            Err(crate::utils::error::GpaError::InputParseError { .. })
        ));
    }

    #[test]
    fn test_columns_in_any_order() {
        let data = "Credit,Grade\n3,a\n";
        let subjects = subjects_from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(subjects, vec![Subject::new("", "a", "3")]);
    }

    #[test]
    fn test_csv_file_source() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"name,grade,credit\n\"Lab, Optics\",C,1.5\n")
            .unwrap();

        let source = CsvSubjectFile::new(temp_file.path());
        let subjects = source.load_subjects().unwrap();
        assert_eq!(subjects[0].name, "Lab, Optics");
        assert_eq!(subjects[0].credit, "1.5");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CsvSubjectFile::new("/definitely/not/here.csv");
        assert!(matches!(
            source.load_subjects(),
            Err(crate::utils::error::GpaError::IoError(_))
        ));
    }
}
