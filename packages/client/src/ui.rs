//! Terminal helpers.

use std::io::Write;

/// Print the prompt again after asynchronous output
pub fn redisplay_prompt(prompt: &str) {
    print!("{}", prompt);
    let _ = std::io::stdout().flush();
}
