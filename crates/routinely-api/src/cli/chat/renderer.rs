//! Terminal markdown rendering for assistant replies.
//!
//! Routines come back as markdown (numbered steps, bold product names), so
//! replies go through a `termimad` skin before printing.

use console::style;
use termimad::crossterm::style::Color;
use termimad::MadSkin;

use routinely_core::view::ChatBubble;
use routinely_types::chat::MessageRole;

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render markdown to a terminal string.
    pub fn render(&self, markdown: &str) -> String {
        format!("{}", self.skin.term_text(markdown))
    }

    /// Print one chat bubble with a role label.
    pub fn print_bubble(&self, bubble: &ChatBubble) {
        match bubble.role {
            MessageRole::User => {
                println!("  {} {}", style("You >").green().bold(), bubble.content);
            }
            MessageRole::Assistant => {
                println!("  {}", style("Routinely").cyan().bold());
                println!("{}", self.render(&bubble.content).trim_end());
            }
            MessageRole::System => {
                println!("  {}", style(&bubble.content).dim());
            }
        }
        println!();
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
