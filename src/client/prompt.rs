use std::io::{self, BufRead, Write};

/// Blocking user interaction a view needs: notices and yes/no confirmations.
pub trait UserPrompt {
    fn alert(&self, message: &str);

    fn confirm(&self, question: &str) -> bool;
}

/// Prompt on the process' stdin/stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsolePrompt;

impl UserPrompt for ConsolePrompt {
    fn alert(&self, message: &str) {
        println!("! {message}");
    }

    fn confirm(&self, question: &str) -> bool {
        print!("{question} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
