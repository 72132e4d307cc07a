mod common;

use common::{ninja_oracle, ScriptedOracle};
use guess_cli::node::NodeId;
use guess_cli::oracle::Target;
use guess_cli::play::run_interactive_session;
use guess_cli::session::{create_session, Session, View};

async fn play(session: &mut Session<ScriptedOracle>, input: &[u8]) -> String {
    colored::control::set_override(false);
    let mut reader = input;
    let mut output = Vec::new();
    run_interactive_session(session, &mut reader, &mut output).await;
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn test_quit_immediately() {
    let mut session = create_session(ninja_oracle());
    let out = play(&mut session, b"q\n").await;
    assert!(out.contains("think of a character"));
    assert!(out.contains("Is has_sword \u{2264} 0.5?"));
    assert!(out.contains("Thanks for playing."));
    assert!(session.ledger().is_empty());
}

#[tokio::test]
async fn test_full_game_to_guess() {
    let mut session = create_session(ninja_oracle());
    let out = play(&mut session, b"y\nyes\nn\n").await;
    assert!(out.contains("Is your character a ninja?"));
    assert!(out.contains("I guess... Naruto!"));
    // Transcript shown with the guess.
    assert!(out.contains("Question"));
    assert_eq!(session.ledger().len(), 2);
    assert!(matches!(session.view(), View::Terminal("Naruto")));
}

#[tokio::test]
async fn test_play_again_restarts() {
    let mut session = create_session(ninja_oracle());
    let out = play(&mut session, b"2\ny\nq\n").await;
    assert!(out.contains("I guess... Sakura!"));
    assert!(out.contains("--- New game ---"));
    assert!(session.ledger().is_empty());
    assert_eq!(
        session.oracle().calls(),
        vec![Target::Root, Target::Node(NodeId::new("n3")), Target::Root]
    );
}

#[tokio::test]
async fn test_invalid_answer_reprompts() {
    let mut session = create_session(ninja_oracle());
    let out = play(&mut session, b"maybe\nq\n").await;
    assert!(out.contains("Invalid. Answer 1/y or 2/n."));
    assert_eq!(session.oracle().calls(), vec![Target::Root]);
}

#[tokio::test]
async fn test_transcript_command() {
    let mut session = create_session(ninja_oracle());
    let out = play(&mut session, b"t\n1\nt\nq\n").await;
    assert!(out.contains("No questions answered yet."));
    assert!(out.contains("Q2."));
    assert!(out.contains("Is has_sword"));
    assert_eq!(session.ledger().len(), 1);
}

#[tokio::test]
async fn test_restart_mid_game() {
    let mut session = create_session(ninja_oracle());
    play(&mut session, b"y\nr\nq\n").await;
    assert!(session.ledger().is_empty());
    assert_eq!(session.oracle().calls().last(), Some(&Target::Root));
}

#[tokio::test]
async fn test_custom_button_labels_shown() {
    let oracle = ScriptedOracle::new(
        r#"{"question":"age ≤ 30.5 ?","right":1,"left":2,"right_label":"age > 30.5","left_label":"age ≤ 30.5"}"#,
    )
    .with_node("1", r#"{"guess":"Jiraiya"}"#);
    let mut session = create_session(oracle);
    let out = play(&mut session, b"age > 30.5\nn\n").await;
    assert!(out.contains("[1] age > 30.5"));
    assert!(out.contains("[2] age \u{2264} 30.5"));
    assert!(out.contains("I guess... Jiraiya!"));
}

#[tokio::test]
async fn test_failure_offers_retry() {
    let mut session = create_session(ninja_oracle().failing("n2", 1));
    let out = play(&mut session, b"y\ny\nq\n").await;
    assert!(out.contains("Oracle error:"));
    assert!(out.contains("HTTP 503"));
    assert!(out.contains("Is your character a ninja?"));
    assert_eq!(session.ledger().len(), 1);
}

#[tokio::test]
async fn test_eof_on_failure_quits() {
    let mut session = create_session(ninja_oracle().failing("start", 5));
    let out = play(&mut session, b"").await;
    assert!(out.contains("Oracle error:"));
    assert!(out.contains("Thanks for playing."));
}
