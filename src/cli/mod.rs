//! Command-line interface for aot-converter
//!
//! - Argument parsing (`Cli`)
//! - Interactive prompts (`prompt`)
//! - Runtime setup (`setup`)

pub mod prompt;
pub mod setup;

use crate::commands::ConversionRequest;
use crate::core::{ConvertError, Result};
use crate::formatting::ColorMode;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub use prompt::{clean_input, Prompter};
pub use setup::init_logging;

const POSITIONAL_COUNT: usize = 4;

#[derive(Parser, Debug)]
#[command(name = "aot-converter")]
#[command(about = "Convert an AWS Lambda .NET project to a NativeAOT executable")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// yes <PROJECT.csproj> <Namespace.Class.Method> <HANDLER.cs>
    ///
    /// Leave all four out to be asked for each one.
    #[arg(value_name = "INPUTS", num_args = 0..)]
    pub inputs: Vec<String>,

    /// Configuration file (default: search for .aot-converter.toml)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not run `dotnet add package`
    #[arg(long = "skip-packages")]
    pub skip_packages: bool,

    /// Color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value = "auto")]
    pub color: ColorMode,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

/// What the user asked for once consent has been checked
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Convert(ConversionRequest),
    Declined,
}

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    Cli::parse()
}

impl Cli {
    pub fn has_positional_inputs(&self) -> Result<bool> {
        match self.inputs.len() {
            0 => Ok(false),
            POSITIONAL_COUNT => Ok(true),
            n => Err(ConvertError::user_input(format!(
                "Expected {POSITIONAL_COUNT} arguments (yes <PROJECT.csproj> <HANDLER> <HANDLER.cs>) \
                 or none for interactive mode, got {n}"
            ))),
        }
    }

    /// Resolve the inputs from the positionals or, when there are none, the prompter
    pub fn invocation<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Invocation> {
        if self.has_positional_inputs()? {
            return Ok(from_answers(
                &self.inputs[0],
                &self.inputs[1],
                &self.inputs[2],
                &self.inputs[3],
            ));
        }

        if !prompter.confirm()? {
            return Ok(Invocation::Declined);
        }
        let descriptor = prompter.descriptor_path()?;
        let handler = prompter.handler()?;
        let source = prompter.handler_source()?;
        Ok(Invocation::Convert(request(&descriptor, &handler, &source)))
    }
}

fn from_answers(consent: &str, descriptor: &str, handler: &str, source: &str) -> Invocation {
    if clean_input(consent) == "yes" {
        Invocation::Convert(request(descriptor, handler, source))
    } else {
        Invocation::Declined
    }
}

fn request(descriptor: &str, handler: &str, source: &str) -> ConversionRequest {
    ConversionRequest {
        descriptor_path: PathBuf::from(clean_input(descriptor)),
        handler: clean_input(handler),
        handler_source: PathBuf::from(clean_input(source)),
    }
}
