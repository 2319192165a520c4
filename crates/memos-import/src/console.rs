//! Line-oriented operator console.

use std::fmt;
use std::io::{BufRead, Write};

use memos_import_core::{Prompt, SourceUser};

/// Reads answers from `input` and writes prompts to `output`.
///
/// Write failures are ignored: a closed terminal shows up as end of input on
/// the next read.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line.
    pub fn say(&mut self, line: impl fmt::Display) {
        let _ = writeln!(self.output, "{}", line);
    }

    fn read_line(&mut self) -> Option<String> {
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Render `prompt` and read the answer; `None` at end of input.
    pub fn ask(&mut self, prompt: Prompt<'_>) -> Option<String> {
        let _ = write!(self.output, "{}", render(prompt));
        self.read_line()
    }

    /// Ask a yes/no question; any answer starting with `y` is yes.
    pub fn confirm(&mut self, question: &str) -> Option<bool> {
        let _ = write!(self.output, "  {} (y/n): ", question);
        self.read_line()
            .map(|answer| answer.to_lowercase().starts_with('y'))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

fn user_line(index: usize, user: &SourceUser) -> String {
    format!(
        "  {}. {} ({}) [{}]",
        index + 1,
        user.display_name,
        user.username,
        user.email.as_deref().unwrap_or("(no email)")
    )
}

/// Text shown for each planner prompt.
pub fn render(prompt: Prompt<'_>) -> String {
    match prompt {
        Prompt::Selection { users } => {
            let mut text = String::from("\n=== Memos Users ===\n");
            for (i, user) in users.iter().enumerate() {
                text.push_str(&user_line(i, user));
                text.push('\n');
            }
            text.push_str(concat!(
                "\nEnter the numbers of the Memos users to migrate ",
                "(comma-separated), or 'all':\n> "
            ));
            text
        }
        Prompt::Credential { user } => format!(
            concat!(
                "\nMapping Memos user: {} ({})\n",
                "  Enter the Notes API token for this user's Notes account ",
                "(or 'login' to sign in with email and password): "
            ),
            user.display_name, user.username
        ),
        Prompt::Email { .. } => "  Notes email: ".to_string(),
        Prompt::Password { .. } => "  Notes password: ".to_string(),
    }
}
