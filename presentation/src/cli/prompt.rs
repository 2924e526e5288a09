//! Yes/no confirmation before mutating hosts

use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    confirm_with(question, &mut stdin.lock(), &mut io::stderr())
}

/// [`confirm`] over arbitrary streams
pub fn confirm_with<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "{} {} ", question.bold(), "[y/N]".dimmed())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Describe what `block` is about to do
pub fn block_question(value: &str, hosts: &[String]) -> String {
    format!(
        "Block '{}' on {} host{} ({})?",
        value,
        hosts.len(),
        if hosts.len() == 1 { "" } else { "s" },
        hosts.join(", ")
    )
}
