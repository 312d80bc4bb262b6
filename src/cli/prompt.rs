//! Interactive prompts used when the inputs are not given on the command line

use crate::core::{ConvertError, Result};
use std::io::{BufRead, Write};

pub const CONSENT_WARNING: &str = "This tool rewrites your project in place: it edits the csproj, \
     adds EntryPoint.cs, and replaces aws-lambda-tools-defaults.json (the old file is kept as a \
     backup). Commit or back up your work before continuing.";

/// Reads answers from `input` and writes questions to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for consent. Only an exact `yes` counts.
    pub fn confirm(&mut self) -> Result<bool> {
        self.say(CONSENT_WARNING)?;
        let answer = self.ask("Type 'yes' to continue")?;
        Ok(clean_input(&answer) == "yes")
    }

    pub fn descriptor_path(&mut self) -> Result<String> {
        self.ask_required("Path to the project file (.csproj) of your Lambda function")
    }

    pub fn handler(&mut self) -> Result<String> {
        self.ask_required("Fully qualified handler name (Namespace.Class.Method)")
    }

    pub fn handler_source(&mut self) -> Result<String> {
        self.ask_required("Path to the C# file that declares the handler")
    }

    /// Repeat the question until a non-blank answer arrives
    fn ask_required(&mut self, question: &str) -> Result<String> {
        loop {
            let answer = clean_input(&self.ask(question)?);
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}: ").map_err(prompt_io)?;
        self.output.flush().map_err(prompt_io)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(prompt_io)?;
        if read == 0 {
            return Err(ConvertError::user_input(
                "Input ended before all questions were answered",
            ));
        }
        Ok(line)
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").map_err(prompt_io)
    }
}

fn prompt_io(e: std::io::Error) -> ConvertError {
    ConvertError::io("Failed to talk to the terminal", "<stdin>", e)
}

/// Trim whitespace and surrounding quotes left over from drag-and-drop paths
pub fn clean_input(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}
