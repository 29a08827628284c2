use crate::domain::model::Subject;
use crate::domain::ports::SubjectSource;
use crate::utils::error::Result;

/// Parses one `NAME:GRADE:CREDIT` argument.
///
/// Splits on the last two colons so names may contain colons
/// (`"Lab: Optics:B:1"`). `GRADE:CREDIT` leaves the name empty and a bare
/// value is taken as the name alone.
pub fn parse_subject_arg(arg: &str) -> Subject {
    let mut parts: Vec<&str> = arg.rsplitn(3, ':').collect();
    parts.reverse();

    match parts.as_slice() {
        [name, grade, credit] => Subject::new(*name, *grade, *credit),
        [grade, credit] => Subject::new("", *grade, *credit),
        [name] => Subject::new(*name, "", ""),
        _ => Subject::default(),
    }
}

#[derive(Debug, Clone)]
pub struct ArgSubjects {
    args: Vec<String>,
}

impl ArgSubjects {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }
}

impl SubjectSource for ArgSubjects {
    fn load_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.args.iter().map(|arg| parse_subject_arg(arg)).collect())
    }

    fn describe(&self) -> String {
        format!("{} --subject argument(s)", self.args.len())
    }
}
