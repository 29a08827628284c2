// Adapters layer: turn command-line arguments and files into subject snapshots.

pub mod args;
pub mod csv_input;

pub use args::{parse_subject_arg, ArgSubjects};
pub use csv_input::{read_subjects_csv, subjects_from_csv_reader, CsvSubjectFile};
