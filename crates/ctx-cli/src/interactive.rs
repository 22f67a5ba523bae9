//! Interactive prompts for CLI commands
//!
//! Uses dialoguer on a terminal. When stdin is piped, a single answer line is
//! read instead so scripts can confirm with `echo y | ctx-tool remove`.

use dialoguer::Confirm;
use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::Result;

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if io::stdin().is_terminal() {
        return Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?);
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

/// Whether a typed answer means yes.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
