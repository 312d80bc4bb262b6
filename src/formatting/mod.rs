use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    /// Apply `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` to an `Auto` choice.
    /// Explicit choices win over the environment.
    pub fn with_env(self) -> Self {
        if self != Self::Auto {
            return self;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|val| val == "1") {
            return Self::Always;
        }
        // Per no-color.org
        if env::var("NO_COLOR").is_ok() || env::var("CLICOLOR").is_ok_and(|val| val == "0") {
            return Self::Never;
        }
        self
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

pub trait OutputFormatter {
    fn success(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn info(&self, text: &str) -> String;
}

pub struct ColoredFormatter {
    use_color: bool,
}

impl ColoredFormatter {
    pub fn new(mode: ColorMode) -> Self {
        let use_color = mode.with_env().should_use_color();
        // Set colored control based on configuration
        colored::control::set_override(use_color);
        Self { use_color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn success(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, Color::Red)
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    fn info(&self, text: &str) -> String {
        text.to_string()
    }
}

fn detect_color_support() -> bool {
    // Check if we're in a dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
