// UI prompts and user interaction module

use colored::Colorize;
use std::io::{self, Write};

/// Ask user for confirmation with retry logic on IO errors
///
/// # Arguments
/// * `prompt` - The prompt message to display
/// * `max_attempts` - Maximum number of attempts before giving up
///
/// # Returns
/// * `Ok(true)` - User confirmed (y/yes)
/// * `Ok(false)` - User declined (n/no or any other input)
/// * `Err` - IO error after max attempts
pub fn read_confirmation(prompt: &str, max_attempts: u32) -> anyhow::Result<bool> {
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        print!("{}", prompt.white().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => return Ok(is_yes(&input)),
            Err(e) => {
                if attempt < max_attempts {
                    println!(
                        "{}",
                        format!(
                            "Error reading input (attempt {}/{}): {}",
                            attempt, max_attempts, e
                        )
                        .yellow()
                    );
                    println!("{}", "Retrying...".dimmed());
                }
                last_error = Some(e);
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to read confirmation after {} attempts: {}",
        max_attempts,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn is_yes(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("⚠️  Warning: {}", message).yellow().bold());
}

/// Display an info message
pub fn info(message: &str) {
    println!("{}", message.cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
