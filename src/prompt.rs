//! Yes/no confirmation.
//!
//! On a terminal the question goes through `inquire`. When stdin is piped
//! (`echo n | cyber-zen gcm`) the answer is read as a plain line instead.

use inquire::InquireError;
use std::io::{self, BufRead, IsTerminal, Write};

/// Ask `question` on the terminal, defaulting to yes.
///
/// Escape or Ctrl+C declines. Without a TTY this falls back to [`confirm`]
/// over stdin/stdout.
pub fn confirm_on_terminal(question: &str) -> io::Result<bool> {
    if !io::stdin().is_terminal() {
        return confirm(io::stdin().lock(), io::stdout(), question);
    }
    match inquire::Confirm::new(question).with_default(true).prompt() {
        Ok(answer) => Ok(answer),
        Err(InquireError::NotTTY) => confirm(io::stdin().lock(), io::stdout(), question),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(InquireError::IO(e)) => Err(e),
        Err(e) => Err(io::Error::other(e.to_string())),
    }
}

/// Ask `question` and read one line of answer.
///
/// An empty answer, `y` or `yes` (any case) confirms. End of input declines.
pub fn confirm<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    question: &str,
) -> io::Result<bool> {
    write!(writer, "{question} [Y/n] ")?;
    writer.flush()?;

    let mut answer = String::new();
    if reader.read_line(&mut answer)? == 0 {
        writeln!(writer)?;
        return Ok(false);
    }
    let answer = answer.trim().to_ascii_lowercase();
    Ok(matches!(answer.as_str(), "" | "y" | "yes"))
}
