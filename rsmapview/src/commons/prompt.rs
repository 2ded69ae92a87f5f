use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Ask for a city name on `output`, reading the answer from `input`.
///
/// An empty answer or end of input means the user cancelled and gives `None`.
pub fn prompt_city<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<Option<String>> {
    write!(output, "Enter the name of the city to display: ").context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read city name")?;

    let answer = line.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer.to_string()))
    }
}
