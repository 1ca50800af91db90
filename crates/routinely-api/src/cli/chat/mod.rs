//! `routinely routine`: generate a routine, then chat about it.
//!
//! The first request is sent with the persisted selection. On success, an
//! interactive follow-up loop runs until `/exit` or Ctrl+D (skipped with
//! `--json` or when stdin is not a terminal).

pub mod commands;
pub mod input;
pub mod renderer;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use routinely_core::view::{render_transcript, AWAITING_MESSAGE};
use routinely_types::error::ChatError;

use crate::state::{AppState, ConcreteChatSession};

use self::commands::ChatCommand;
use self::input::{ChatInput, InputEvent};
use self::renderer::ChatRenderer;

/// Generate a routine for the current selection and enter the follow-up loop.
pub async fn run_routine(state: &AppState, json: bool) -> Result<()> {
    let products = state.selection.lock().await.selection().items().to_vec();
    let mut session = state.chat.lock().await;

    let result = if json {
        session.start_routine(&products).await
    } else {
        let spinner = awaiting_spinner();
        let result = session.start_routine(&products).await;
        spinner.finish_and_clear();
        result
    };
    let reply = result.map_err(into_report)?;

    if json {
        let result = serde_json::json!({
            "reply": reply,
            "state": session.state(),
            "transcript": render_transcript(session.transcript()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let renderer = ChatRenderer::new();
    print_banner(session.model(), products.len());
    for bubble in render_transcript(session.transcript()) {
        renderer.print_bubble(&bubble);
    }

    if !console::user_attended() {
        return Ok(());
    }

    follow_up_loop(&mut session, &renderer).await
}

async fn follow_up_loop(session: &mut ConcreteChatSession, renderer: &ChatRenderer) -> Result<()> {
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut last_failed: Option<String> = None;

    loop {
        let question = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Chat ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => match commands::parse(&text) {
                None => text,
                Some(ChatCommand::Help) => {
                    commands::print_help();
                    continue;
                }
                Some(ChatCommand::Clear) => {
                    chat_input.clear();
                    continue;
                }
                Some(ChatCommand::Exit) => {
                    println!("\n  {}", style("Chat ended.").dim());
                    break;
                }
                Some(ChatCommand::History) => {
                    println!();
                    for bubble in render_transcript(session.transcript()) {
                        renderer.print_bubble(&bubble);
                    }
                    continue;
                }
                Some(ChatCommand::Retry) => match last_failed.clone() {
                    Some(text) => text,
                    None => {
                        println!("\n  {} Nothing to retry.\n", style("i").blue().bold());
                        continue;
                    }
                },
                Some(ChatCommand::Unknown(name)) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                    continue;
                }
            },
        };

        let spinner = awaiting_spinner();
        let result = session.ask(&question).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                last_failed = None;
                println!();
                println!("  {}", style("Routinely").cyan().bold());
                println!("{}", renderer.render(&reply).trim_end());
                println!();
            }
            Err(err) => {
                print_chat_error(&err);
                if !err.is_user_correctable() {
                    last_failed = Some(question);
                }
            }
        }
    }

    Ok(())
}

fn awaiting_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(AWAITING_MESSAGE);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn print_banner(model: &str, product_count: usize) {
    println!();
    println!("  {}", style("Your personalized routine").cyan().bold());
    println!(
        "  {}  {}   {}  {}",
        style("Model:").bold(),
        style(model).dim(),
        style("Products:").bold(),
        style(product_count).dim()
    );
    println!("  {}", style("Ask follow-up questions below. /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

fn print_chat_error(err: &ChatError) {
    eprintln!("\n  {} {}", style("!").red().bold(), err.user_message());
    if !err.is_user_correctable() {
        eprintln!("  {}", style("Type /retry to send it again, /exit to quit.").dim());
    }
    eprintln!();
}

/// Wrap a chat error so the binary prints the user-facing message first.
fn into_report(err: ChatError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}
