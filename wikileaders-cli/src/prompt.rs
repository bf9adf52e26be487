//! Operator prompts on the terminal.

use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::debug;

use wikileaders_core::{Country, CountrySelection};
use wikileaders_fetch::{RetryContext, RetryPrompt};

/// Returns true when stdin and stderr are attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

// ============================================================================
// Retry Prompt
// ============================================================================

/// Asks on stderr whether to retry a failed API request.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl RetryPrompt for StdinPrompt {
    fn confirm_retry(&self, context: &RetryContext) -> bool {
        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\nConnection error on {} ({})! Try again? 'n' to quit: ",
            context.operation, context.reason
        );
        let _ = stderr.flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => wants_retry(&answer),
        }
    }
}

/// Anything but `n` means try again.
pub fn wants_retry(answer: &str) -> bool {
    !answer.trim().eq_ignore_ascii_case("n")
}

// ============================================================================
// Country Selection
// ============================================================================

/// Asks for countries until the answer selects at least one supported code.
///
/// Fails when input ends before a valid answer.
pub fn pick_countries<R: BufRead, W: Write>(
    available: &[Country],
    mut input: R,
    mut output: W,
) -> Result<Vec<Country>> {
    let codes: Vec<&str> = available.iter().map(Country::code).collect();

    loop {
        write!(
            output,
            "\nPick one or more countries from [{}] separated by a comma or pick 'all': ",
            codes.join(", ")
        )?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            bail!("No country selected");
        }

        match CountrySelection::parse(&answer).resolve(available) {
            Ok(countries) => {
                debug!(count = countries.len(), "Countries selected");
                return Ok(countries);
            }
            Err(_) => {
                writeln!(
                    output,
                    "\nWrong input. Two letters per country, separated by a comma."
                )?;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
