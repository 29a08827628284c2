use crate::core::form::{FormField, SubjectForm};
use crate::core::report::GpaReport;
use crate::domain::model::GradingSystem;
use crate::utils::error::{GpaError, Result};
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  add                          append an empty row
  remove N                     delete row N
  set N name|grade|credit VAL  edit one field of row N
  system 4.0|5.0               choose the grading system
  list                         show the rows
  calc                         compute the GPA
  result                       show the last computed GPA
  help                         this text
  quit                         leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add,
    /// Zero-based row.
    Remove(usize),
    Set {
        row: usize,
        field: FormField,
        value: String,
    },
    System(GradingSystem),
    List,
    Calc,
    Result,
    Help,
    Quit,
}

fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

fn parse_row(token: &str) -> Result<usize> {
    match token.parse::<usize>() {
        Ok(0) | Err(_) => Err(GpaError::InputParseError {
            input: token.to_string(),
            reason: "row numbers start at 1".to_string(),
        }),
        Ok(row) => Ok(row - 1),
    }
}

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let (word, rest) = next_token(line);
    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "add" => Command::Add,
        "remove" | "rm" => Command::Remove(parse_row(next_token(rest).0)?),
        "set" => {
            let (row, rest) = next_token(rest);
            let (field, rest) = next_token(rest);
            Command::Set {
                row: parse_row(row)?,
                field: field.parse()?,
                value: rest.trim().to_string(),
            }
        }
        "system" => Command::System(next_token(rest).0.parse()?),
        "list" | "ls" => Command::List,
        "calc" | "calculate" => Command::Calc,
        "result" => Command::Result,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(GpaError::InputParseError {
                input: other.to_string(),
                reason: "unknown command, type 'help'".to_string(),
            })
        }
    };
    Ok(Some(command))
}

/// Line-oriented front end over a [`SubjectForm`].
pub struct Session<R, W> {
    form: SubjectForm,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(form: SubjectForm, input: R, output: W) -> Self {
        Self {
            form,
            input,
            output,
        }
    }

    pub fn form(&self) -> &SubjectForm {
        &self.form
    }

    pub fn into_form(self) -> SubjectForm {
        self.form
    }

    /// Runs until `quit` or end of input. Bad commands are reported and skipped.
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "GPA Calculator ({} scale). Type 'help' for commands.",
            self.form.grading_system()
        )?;
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(e) = self.execute(command) {
                        if let GpaError::IoError(_) = e {
                            return Err(e);
                        }
                        tracing::debug!("command failed: {}", e);
                        writeln!(self.output, "error: {}", e.user_friendly_message())?;
                    }
                }
                Err(e) => {
                    writeln!(self.output, "error: {}", e.user_friendly_message())?;
                }
            }
        }
        writeln!(self.output)?;
        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Add => {
                let row = self.form.add_subject();
                writeln!(self.output, "added row {}", row + 1)?;
            }
            Command::Remove(row) => {
                self.form.remove_subject(row)?;
                writeln!(self.output, "removed row {}", row + 1)?;
            }
            Command::Set { row, field, value } => {
                self.form.update_field(row, field, &value)?;
                writeln!(self.output, "row {} {} = '{}'", row + 1, field, value)?;
            }
            Command::System(system) => {
                self.form.set_grading_system(system);
                writeln!(self.output, "grading system: {}", system)?;
            }
            Command::List => self.list()?,
            Command::Calc => {
                let computation = self.form.submit();
                let report =
                    GpaReport::new(&computation.snapshot.subjects, &computation.breakdown);
                write!(self.output, "{}", report.render_text())?;
            }
            Command::Result => match self.form.result() {
                Some(computation) => {
                    let stale = if self.form.is_stale() {
                        " (inputs changed since, run 'calc' to update)"
                    } else {
                        ""
                    };
                    match computation.outcome.value() {
                        Some(_) => writeln!(
                            self.output,
                            "Your GPA is: {}{}",
                            computation.outcome, stale
                        )?,
                        None => writeln!(self.output, "{}{}", computation.outcome, stale)?,
                    }
                }
                None => writeln!(self.output, "no result yet, run 'calc'")?,
            },
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        writeln!(self.output, "Grading system: {}", self.form.grading_system())?;
        if self.form.is_empty() {
            writeln!(self.output, "  (no rows, use 'add')")?;
        }
        for (position, subject) in self.form.subjects().iter().enumerate() {
            writeln!(
                self.output,
                "  {}. name='{}' grade='{}' credit='{}'",
                position + 1,
                subject.name,
                subject.grade,
                subject.credit
            )?;
        }
        if self.form.is_stale() {
            writeln!(self.output, "  (result is out of date, run 'calc')")?;
        }
        Ok(())
    }
}
