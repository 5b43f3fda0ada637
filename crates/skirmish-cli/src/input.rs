//! Prompted line input.

use std::io::{BufRead, Write};

use skirmish_core::simulation::CommandSource;
use tracing::warn;

const MENU: &str = "\
=== Your Turn ===
Commands:
  move <up|down|left|right>
  use potion <1|2>   (1 = health, 2 = power)
  loot
  inspect
  end
> ";

/// Reads one command line per turn, printing the command menu first.
#[derive(Debug)]
pub struct PromptedInput<R, W> {
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> PromptedInput<R, W> {
    /// Read from `input`, prompting on `prompt`.
    pub fn new(input: R, prompt: W) -> Self {
        Self { input, prompt }
    }

    /// Give back the prompt writer.
    pub fn into_prompt(self) -> W {
        self.prompt
    }
}

impl<R: BufRead, W: Write> CommandSource for PromptedInput<R, W> {
    fn next_line(&mut self) -> Option<String> {
        if let Err(err) = write!(self.prompt, "{MENU}").and_then(|()| self.prompt.flush()) {
            warn!(%err, "could not write prompt");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(err) => {
                warn!(%err, "could not read input");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_then_runs_dry() {
        let mut source = PromptedInput::new(Cursor::new("move up\nloot\n"), Vec::new());
        assert_eq!(source.next_line().as_deref(), Some("move up\n"));
        assert_eq!(source.next_line().as_deref(), Some("loot\n"));
        assert_eq!(source.next_line(), None);
    }

    #[test]
    fn prompts_before_every_read() {
        let mut source = PromptedInput::new(Cursor::new("end\n"), Vec::new());
        source.next_line();
        source.next_line();
        let prompt = String::from_utf8(source.into_prompt()).unwrap();
        assert_eq!(prompt.matches("=== Your Turn ===").count(), 2);
        assert!(prompt.contains("use potion <1|2>"));
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let mut source = PromptedInput::new(Cursor::new("inspect"), Vec::new());
        assert_eq!(source.next_line().as_deref(), Some("inspect"));
        assert_eq!(source.next_line(), None);
    }
}
