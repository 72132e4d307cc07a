use std::io::{BufRead, Write};

use colored::Colorize;

use crate::display::{answer_buttons, guess_banner, styled_answer, transcript_table};
use crate::node::{Answer, Question};
use crate::oracle::Oracle;
use crate::session::{Session, View};

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn prompt(message: &str, default: Option<&str>, reader: &mut dyn BufRead, writer: &mut dyn Write) -> String {
    if let Some(d) = default {
        write!(writer, "{} [{}]: ", message, d).ok();
    } else {
        write!(writer, "{}: ", message).ok();
    }
    writer.flush().ok();

    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => "q".to_string(),
        Ok(_) => {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                default.unwrap_or("").to_string()
            } else {
                trimmed
            }
        }
        Err(_) => "q".to_string(),
    }
}

fn prompt_yn(message: &str, default: &str, reader: &mut dyn BufRead, writer: &mut dyn Write) -> Option<bool> {
    let answer = prompt(&format!("{} (y/n)", message), Some(default), reader, writer);
    if answer.to_lowercase() == "q" {
        return None;
    }
    Some(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Map typed input to an answer: button number, y/n, or the button label itself.
pub fn parse_answer(input: &str, question: &Question) -> Option<Answer> {
    let lower = input.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    match lower.as_str() {
        "1" | "y" | "yes" => return Some(Answer::Affirmative),
        "2" | "n" | "no" => return Some(Answer::Negative),
        _ => {}
    }
    [Answer::Affirmative, Answer::Negative]
        .into_iter()
        .find(|a| question.label(*a).to_lowercase() == lower)
}

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

struct QuitSession;

enum Action {
    Answer(Answer),
    Retry,
    Restart,
    Wait,
}

pub async fn run_interactive_session<O: Oracle>(
    session: &mut Session<O>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) {
    writeln!(writer).ok();
    writeln!(writer, "{}", "Guess \u{2014} think of a character and answer my questions".cyan().bold()).ok();
    writeln!(
        writer,
        "Type {} to restart, {} for the transcript, {} to quit.\n",
        "'r'".bold(),
        "'t'".bold(),
        "'q'".bold()
    )
    .ok();

    session.start().await;

    loop {
        let action = match next_action(session, reader, writer) {
            Ok(action) => action,
            Err(QuitSession) => {
                writeln!(writer, "\n{}\n", "Thanks for playing.".cyan().bold()).ok();
                return;
            }
        };

        match action {
            Action::Answer(answer) => {
                session.submit_answer(answer).await;
            }
            Action::Retry => {
                session.retry().await;
            }
            Action::Restart => {
                writeln!(writer, "\n{}", "--- New game ---".cyan().bold()).ok();
                session.restart().await;
            }
            Action::Wait => {}
        }
    }
}

fn next_action<O: Oracle>(
    session: &Session<O>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Action, QuitSession> {
    match session.view() {
        View::Loading => {
            writeln!(writer, "  {}", "Loading...".dimmed()).ok();
            Ok(Action::Restart)
        }
        View::Question(question) => {
            let step = session.ledger().len() + 1;
            writeln!(writer, "\n  {} {}", format!("Q{}.", step).bold(), question.prompt()).ok();
            writeln!(writer, "  {}", answer_buttons(question)).ok();

            let input = prompt("  Answer", None, reader, writer);
            match input.to_lowercase().as_str() {
                "q" => return Err(QuitSession),
                "r" => return Ok(Action::Restart),
                "t" => {
                    show_transcript(session, writer);
                    return Ok(Action::Wait);
                }
                _ => {}
            }
            match parse_answer(&input, question) {
                Some(answer) => {
                    writeln!(writer, "  {}", styled_answer(answer)).ok();
                    Ok(Action::Answer(answer))
                }
                None => {
                    writeln!(writer, "  {}", "Invalid. Answer 1/y or 2/n.".red()).ok();
                    Ok(Action::Wait)
                }
            }
        }
        View::Terminal(guess) => {
            writeln!(writer, "\n  {}", guess_banner(guess)).ok();
            show_transcript(session, writer);
            match prompt_yn("\nPlay again?", "y", reader, writer) {
                Some(true) => Ok(Action::Restart),
                _ => Err(QuitSession),
            }
        }
        View::Failed(error) => {
            writeln!(writer, "\n  {} {}", "Oracle error:".red().bold(), error).ok();
            let input = prompt("  Retry? (y/n, r to restart)", Some("y"), reader, writer);
            match input.to_lowercase().as_str() {
                "y" | "yes" => Ok(Action::Retry),
                "r" => Ok(Action::Restart),
                _ => Err(QuitSession),
            }
        }
    }
}

fn show_transcript<O: Oracle>(session: &Session<O>, writer: &mut dyn Write) {
    if session.ledger().is_empty() {
        writeln!(writer, "  {}", "No questions answered yet.".dimmed()).ok();
    } else {
        writeln!(writer, "{}", transcript_table(session.ledger())).ok();
    }
}
