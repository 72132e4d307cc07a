use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::ledger::AnswerLedger;
use crate::node::{Answer, Node, Question};

pub fn styled_answer(answer: Answer) -> String {
    match answer {
        Answer::Affirmative => answer.label().green().bold().to_string(),
        Answer::Negative => answer.label().red().bold().to_string(),
    }
}

pub fn transcript_table(ledger: &AnswerLedger) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").set_alignment(CellAlignment::Right),
        Cell::new("Question").set_alignment(CellAlignment::Left),
        Cell::new("Answer").set_alignment(CellAlignment::Center),
    ]);

    for (i, entry) in ledger.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(entry.question()),
            Cell::new(styled_answer(entry.answer())).set_alignment(CellAlignment::Center),
        ]);
    }

    table.to_string()
}

/// Button row for a question, e.g. `[1] Yes   [2] No`.
pub fn answer_buttons(question: &Question) -> String {
    format!(
        "{} {}   {} {}",
        "[1]".bold(),
        question.label(Answer::Affirmative).green(),
        "[2]".bold(),
        question.label(Answer::Negative).red()
    )
}

pub fn guess_banner(guess: &str) -> String {
    format!("I guess... {}!", guess).cyan().bold().to_string()
}

pub fn describe_node(node: &Node) -> String {
    let id = node
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    table.add_row(vec![Cell::new("id".bold().to_string()), Cell::new(id)]);

    match node {
        Node::Terminal(guess) => {
            table.add_row(vec![Cell::new("guess".bold().to_string()), Cell::new(guess.value())]);
        }
        Node::Interior(question) => {
            table.add_row(vec![Cell::new("question".bold().to_string()), Cell::new(question.prompt())]);
            for answer in [Answer::Affirmative, Answer::Negative] {
                table.add_row(vec![
                    Cell::new(answer.label().to_lowercase().bold().to_string()),
                    Cell::new(format!("{} ({})", question.branch(answer), question.label(answer))),
                ]);
            }
        }
    }

    table.to_string()
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}
