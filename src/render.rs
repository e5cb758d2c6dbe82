//! Output rendering for streamed answers.
//!
//! This module provides the renderer trait used by the chat session and a
//! plain-text implementation that redraws the visible tail of an in-flight
//! answer in place.

use std::io::{self, Stdout, Write};

use crate::chat::AnswerWindow;

/// ANSI escape code for dim text (used for the truncation marker).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering session output.
///
/// This abstraction allows for different rendering strategies: in-place ANSI
/// redraw for interactive terminals, plain output for piping, and silent
/// renderers in tests.
pub trait Renderer: Send {
    /// Redraws the visible portion of an in-flight answer.
    ///
    /// Called on an interval while streaming; consecutive states may be
    /// coalesced but content is never reordered or dropped from the final
    /// answer.
    fn draw_progress(&mut self, window: &AnswerWindow<'_>);

    /// Replaces the progress display with the final answer text.
    fn finish_answer(&mut self, text: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Called when the stream was interrupted by the user.
    fn print_interrupted(&mut self) {}
}

/// Plain text renderer with optional ANSI styling.
///
/// With ANSI enabled the streaming window is redrawn in place; without it
/// there is no progressive display and the answer is printed once final,
/// which keeps piped output clean.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    drawn: usize,
}

impl PlainTextRenderer {
    /// Creates a new renderer with ANSI styling enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new renderer with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            drawn: 0,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    /// Moves the cursor back to the top of the drawn region and clears it.
    fn clear_drawn(&mut self) {
        if self.drawn > 0 {
            print!("\r\x1b[{}A\x1b[0J", self.drawn);
            self.drawn = 0;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn draw_progress(&mut self, window: &AnswerWindow<'_>) {
        if !self.use_color {
            return;
        }
        self.clear_drawn();
        if window.elided > 0 {
            println!("{ANSI_DIM}... ({} earlier lines){ANSI_RESET}", window.elided);
            self.drawn += 1;
        }
        for line in window.lines {
            println!("{line}");
            self.drawn += 1;
        }
        if let Some(current) = window.current {
            println!("{current}");
            self.drawn += 1;
        }
        self.flush();
    }

    fn finish_answer(&mut self, text: &str) {
        self.clear_drawn();
        if !text.is_empty() {
            println!("{text}");
        }
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.clear_drawn();
        println!("{info}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_drawn();
        self.flush();
        eprintln!("Error: {error}");
    }

    fn print_interrupted(&mut self) {
        println!("[interrupted]");
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }
}
