//! Input classification for the chat session.
//!
//! Every line of input is classified exactly once into a [`Command`] before
//! the session acts on it; there is no string matching anywhere downstream.

use crate::chat::conversation::{TEMPERATURE_MAX, TEMPERATURE_MIN};

/// A classified line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch to directive mode for exactly the next input line.
    DirectiveToggle,

    /// Print the usage text.
    Help,

    /// Display the conversation state snapshot.
    DumpState,

    /// Clear the conversation.
    Reset,

    /// End the session.
    Exit,

    /// Set or clear the system directive (empty text clears it).
    SetDirective(String),

    /// Set the sampling temperature.
    SetTemperature(f32),

    /// An ordinary question for the model.
    Question(String),
}

/// Classifies one line of trimmed input.
///
/// Control tokens are matched case-insensitively and take precedence over
/// directive mode, so `bye` still exits while a directive is being entered.
/// In directive mode everything else becomes the directive text, including
/// the empty string, which clears it. A `@` followed by a three-character
/// value in the accepted temperature range sets the temperature; any other
/// `@`-input falls through and is treated as a question.
pub fn classify(input: &str, directive_mode: bool) -> Command {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "sys" => return Command::DirectiveToggle,
        "?" => return Command::Help,
        "??" => return Command::DumpState,
        "ok" | "reset" | "new" => return Command::Reset,
        "bye" | "exit" | "quit" | "q" => return Command::Exit,
        _ => {}
    }

    if directive_mode {
        return Command::SetDirective(input.to_string());
    }

    if let Some(value) = parse_temperature(input) {
        return Command::SetTemperature(value);
    }

    Command::Question(input.to_string())
}

/// Parses the `@X.X` temperature syntax.
///
/// Returns `None` for anything that is not exactly `@` plus three characters
/// parsing to a finite float within range; the caller then treats the input
/// as question text rather than reporting an error.
fn parse_temperature(input: &str) -> Option<f32> {
    let digits = input.strip_prefix('@')?;
    if digits.len() != 3 {
        return None;
    }
    let value: f32 = digits.parse().ok()?;
    if value.is_finite() && (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Returns usage text describing the recognized inputs.
pub fn help_text() -> &'static str {
    r#"Ask me questions, or type:
  sys          set the system message on the next line (empty line clears it)
  @X.X         set the sampling temperature (0.0-2.0), e.g. @0.7
  ??           show the conversation state
  ?            show this help
  ok           start a new conversation (also: reset, new)
  bye          exit (also: exit, quit, q)"#
}
