use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use app::audit::{AuditRequest, InputProvider};
use app::extract::ExtractOptions;
use utils::error::{Error, Result};

/// Collects the scan root and inclusion rules from a terminal.
///
/// Each yes/no question shows its default, which an empty answer accepts.
pub struct PromptInput<R, W> {
    input: R,
    output: W,
    path: Option<PathBuf>,
    defaults: ExtractOptions,
}

impl PromptInput<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(path: Option<PathBuf>, defaults: ExtractOptions) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), path, defaults)
    }
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    /// A known `path` is used as is and not asked for.
    pub fn new(input: R, output: W, path: Option<PathBuf>, defaults: ExtractOptions) -> Self {
        Self {
            input,
            output,
            path,
            defaults,
        }
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::new("input closed before all questions were answered"));
        }
        Ok(line.trim().to_string())
    }

    fn ask_path(&mut self) -> Result<PathBuf> {
        loop {
            let answer = self.read_answer("Enter the path to scan: ")?;
            let answer = answer.trim_matches('"');
            if !answer.is_empty() {
                return Ok(PathBuf::from(answer));
            }
            writeln!(self.output, "A path is required.")?;
        }
    }

    fn ask_yes_no(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.read_answer(&format!("{} {} ", question, hint))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> InputProvider for PromptInput<R, W> {
    fn request(&mut self) -> Result<AuditRequest> {
        let root = match self.path.clone() {
            Some(path) => path,
            None => self.ask_path()?,
        };

        let options = ExtractOptions {
            include_inherited: self.ask_yes_no(
                "Include inherited permissions?",
                self.defaults.include_inherited,
            )?,
            include_system: self.ask_yes_no(
                "Include SYSTEM account permissions?",
                self.defaults.include_system,
            )?,
            include_builtin: self.ask_yes_no(
                "Include BUILTIN group permissions?",
                self.defaults.include_builtin,
            )?,
        };

        Ok(AuditRequest { root, options })
    }
}
