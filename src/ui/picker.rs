// File Picker
// Numbered menu for choosing one file from a listing

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

/// Chooses one entry from a list of file names
pub trait Picker {
    /// Index of the chosen entry, `None` when the user cancels
    fn pick(&mut self, names: &[String]) -> Result<Option<usize>>;
}

/// Terminal picker that prints a 1-based numbered list and reads a number
///
/// Empty input, `q` or end of input cancels. Anything else that is not a
/// listed number re-prompts.
pub struct NumberedPicker<R, W> {
    input: R,
    output: W,
}

impl NumberedPicker<io::StdinLock<'static>, io::Stdout> {
    /// Picker bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> NumberedPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_menu(&mut self, names: &[String]) -> io::Result<()> {
        let width = names.len().to_string().len();

        for (index, name) in names.iter().enumerate() {
            let number = format!("{:>width$}", index + 1, width = width);
            writeln!(self.output, "  {} {}", number.cyan().bold(), name)?;
        }

        Ok(())
    }
}

impl<R: BufRead, W: Write> Picker for NumberedPicker<R, W> {
    fn pick(&mut self, names: &[String]) -> Result<Option<usize>> {
        if names.is_empty() {
            writeln!(self.output, "{}", "No files to choose from.".yellow())?;
            return Ok(None);
        }

        self.print_menu(names)?;

        loop {
            write!(self.output, "Select a file [1-{}, q to quit]: ", names.len())?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read selection")?;

            // End of input
            if read == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            let answer = line.trim();
            if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            match answer.parse::<usize>() {
                Ok(number) if (1..=names.len()).contains(&number) => return Ok(Some(number - 1)),
                _ => writeln!(self.output, "{} {}", "Invalid selection:".red(), answer)?,
            }
        }
    }
}
