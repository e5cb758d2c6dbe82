//! Interactive terminal chat client.
//!
//! This binary provides a streaming REPL for conversing with an
//! OpenAI-compatible completion service.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the model id is required
//! chuck gpt-4
//!
//! # Start with a system message
//! chuck --system "You are a helpful coding assistant" gpt-4
//!
//! # Disable colors (useful for piping output)
//! chuck --no-color gpt-4
//! ```
//!
//! # Commands
//!
//! While chatting, plain tokens control the session:
//! - `?` - Show available commands
//! - `??` - Show the conversation state
//! - `sys` - Set the system message on the next line
//! - `@X.X` - Set the sampling temperature
//! - `ok` - Start a new conversation
//! - `bye` - Exit
//!
//! The `OPENAI_API_KEY` environment variable must be set. Ctrl-C interrupts
//! a streaming answer; what was received so far is kept.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use chuck::chat::{CancelToken, ChatArgs, ChatConfig, ChatSession, Command, classify, help_text};
use chuck::{OpenAi, PlainTextRenderer, Renderer};

/// Main entry point for the chuck binary.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = ChatArgs::from_command_line_relaxed("chuck [OPTIONS] MODEL");
    let [model] = free.as_slice() else {
        eprintln!("Usage: chuck [OPTIONS] MODEL");
        std::process::exit(1);
    };
    let config = ChatConfig::from_args(model.as_str(), args);
    let use_color = config.use_color;
    let streaming = config.streaming;

    let client = OpenAi::new(None)?;
    let mut session = ChatSession::new(client, config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling during streaming
    let cancel = CancelToken::new();

    // Set up Ctrl+C handler
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        handler_token.cancel();
    })?;

    println!("Hello, I'm Chuck (model: {}).", session.model());
    println!("Ask me questions, or type ? for help, bye to exit\n");

    let mut directive_mode = false;
    loop {
        // Rearm the interrupt flag before each input
        cancel.reset();

        let prompt = if directive_mode { "Sys: " } else { "You: " };
        let readline = rl.readline(prompt);

        match readline {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() && !directive_mode {
                    continue;
                }
                if !line.is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }

                let command = classify(&line, directive_mode);
                // Directive mode holds for exactly one input line
                directive_mode = command == Command::DirectiveToggle;

                match command {
                    Command::DirectiveToggle => {}
                    Command::Help => {
                        for line in help_text().lines() {
                            println!("    {}", line);
                        }
                    }
                    Command::DumpState => {
                        let snapshot = session.snapshot();
                        if snapshot.is_empty() {
                            renderer.print_info("(empty conversation)");
                        } else {
                            for line in snapshot {
                                println!("    {}", line);
                            }
                        }
                    }
                    Command::Reset => {
                        session.clear();
                        renderer.print_info("Conversation cleared.");
                    }
                    Command::Exit => {
                        println!("Goodbye!");
                        break;
                    }
                    Command::SetDirective(text) => {
                        if text.is_empty() {
                            session.set_directive(&text);
                            renderer.print_info("System message cleared.");
                        } else {
                            session.set_directive(&text);
                            renderer.print_info("System message set.");
                        }
                    }
                    Command::SetTemperature(value) => {
                        if session.set_temperature(value) {
                            renderer.print_info(&format!("temperature set to {value}"));
                        }
                    }
                    Command::Question(question) => {
                        println!("Chuck:");
                        if streaming {
                            let _ = session
                                .ask_streaming(&question, &mut renderer, &cancel)
                                .await;
                        } else {
                            let answer = session.ask(&question).await;
                            renderer.finish_answer(&answer);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                directive_mode = false;
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}
