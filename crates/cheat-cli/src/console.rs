//! Terminal console backing the interactive game.

use std::io::{self, BufRead};

use cheat_core::strategy::Console;

/// Console over stdin/stdout. Prompts re-ask until the input parses, and a
/// closed stdin turns into the neutral answer instead of spinning the loop.
pub struct StdioConsole {
    eof: bool,
}

impl StdioConsole {
    pub fn new() -> Self {
        Self { eof: false }
    }

    /// True once stdin has been exhausted.
    pub fn eof(&self) -> bool {
        self.eof
    }

    /// Shows `prompt` and returns the trimmed reply, empty at end of input.
    pub fn prompt_line(&mut self, prompt: &str) -> String {
        println!("{prompt}");
        self.read_line().unwrap_or_default()
    }

    fn read_line(&mut self) -> Option<String> {
        if self.eof {
            return None;
        }
        let mut buffer = String::new();
        match io::stdin().lock().read_line(&mut buffer) {
            Ok(0) | Err(_) => {
                self.eof = true;
                None
            }
            Ok(_) => Some(buffer.trim().to_string()),
        }
    }
}

impl Default for StdioConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdioConsole {
    fn line(&mut self, text: &str) {
        println!("{text}");
    }

    fn prompt_int(&mut self, prompt: &str) -> i64 {
        loop {
            println!("{prompt}");
            let Some(entry) = self.read_line() else {
                return 0;
            };
            match entry.parse::<i64>() {
                Ok(value) => return value,
                Err(_) => println!("Please enter a number."),
            }
        }
    }

    fn prompt_yes_no(&mut self, prompt: &str) -> bool {
        loop {
            println!("{prompt}");
            let Some(entry) = self.read_line() else {
                return false;
            };
            match entry.to_ascii_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => println!("Please answer y or n."),
            }
        }
    }
}

/// Asks for an integer in `lo..=hi`, re-asking while the answer is out of
/// bounds. `None` once stdin runs out.
pub fn prompt_int_in(console: &mut StdioConsole, prompt: &str, lo: i64, hi: i64) -> Option<i64> {
    loop {
        let value = console.prompt_int(prompt);
        if console.eof() {
            return None;
        }
        if value < lo {
            console.line("Number too small, please try again.");
        } else if value > hi {
            console.line("Number too large, please try again.");
        } else {
            return Some(value);
        }
    }
}
