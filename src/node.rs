use std::fmt;

use serde::Deserialize;

use crate::error::{GuessError, GuessResult};

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Affirmative,
    Negative,
}

impl Answer {
    /// Normalized label recorded in the transcript, independent of button text.
    pub fn label(self) -> &'static str {
        match self {
            Answer::Affirmative => "Yes",
            Answer::Negative => "No",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Node identifiers
// ---------------------------------------------------------------------------

/// Opaque token naming the node reached by an answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::new(id)
    }
}

/// Oracles send ids either as integers (tree indices) or as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for NodeId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => NodeId(n.to_string()),
            RawId::Text(s) => NodeId(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire payload
// ---------------------------------------------------------------------------

/// Node payload exactly as the oracle sends it; every field is optional.
#[derive(Debug, Deserialize)]
struct RawNode {
    id: Option<RawId>,
    question: Option<String>,
    feature: Option<String>,
    threshold: Option<f64>,
    yes: Option<RawId>,
    no: Option<RawId>,
    right: Option<RawId>,
    left: Option<RawId>,
    right_label: Option<String>,
    left_label: Option<String>,
    guess: Option<String>,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: Option<NodeId>,
    prompt: String,
    yes: NodeId,
    no: NodeId,
    yes_label: String,
    no_label: String,
}

impl Question {
    pub fn id(&self) -> Option<&NodeId> {
        self.id.as_ref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn branch(&self, answer: Answer) -> &NodeId {
        match answer {
            Answer::Affirmative => &self.yes,
            Answer::Negative => &self.no,
        }
    }

    /// Button text for an answer; defaults to "Yes"/"No".
    pub fn label(&self, answer: Answer) -> &str {
        match answer {
            Answer::Affirmative => &self.yes_label,
            Answer::Negative => &self.no_label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guess {
    id: Option<NodeId>,
    guess: String,
}

impl Guess {
    pub fn id(&self) -> Option<&NodeId> {
        self.id.as_ref()
    }

    pub fn value(&self) -> &str {
        &self.guess
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Interior(Question),
    Terminal(Guess),
}

impl Node {
    /// Parse an oracle response body.
    pub fn from_json(body: &str) -> GuessResult<Node> {
        let raw: RawNode = serde_json::from_str(body)?;
        Node::resolve(raw)
    }

    pub fn id(&self) -> Option<&NodeId> {
        match self {
            Node::Interior(q) => q.id(),
            Node::Terminal(g) => g.id(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal(_))
    }

    fn resolve(raw: RawNode) -> GuessResult<Node> {
        let id = raw.id.map(NodeId::from);

        if let Some(guess) = raw.guess {
            return Ok(Node::Terminal(Guess { id, guess }));
        }
        if let Some(message) = raw.error {
            return Err(GuessError::Oracle(message));
        }

        let prompt = match raw.question.filter(|q| !q.trim().is_empty()) {
            Some(question) => question,
            None => match (raw.feature, raw.threshold) {
                (Some(feature), Some(threshold)) if !feature.trim().is_empty() => {
                    canonical_prompt(&feature, threshold)
                }
                _ => return Err(GuessError::MissingPrompt),
            },
        };

        let yes = raw
            .yes
            .or(raw.right)
            .ok_or(GuessError::MissingBranch(Answer::Affirmative))?;
        let no = raw
            .no
            .or(raw.left)
            .ok_or(GuessError::MissingBranch(Answer::Negative))?;

        Ok(Node::Interior(Question {
            id,
            prompt,
            yes: yes.into(),
            no: no.into(),
            yes_label: raw.right_label.unwrap_or_else(|| Answer::Affirmative.label().to_string()),
            no_label: raw.left_label.unwrap_or_else(|| Answer::Negative.label().to_string()),
        }))
    }
}

/// Question derived from a split: "Is {feature} ≤ {threshold}?".
pub fn canonical_prompt(feature: &str, threshold: f64) -> String {
    format!("Is {} \u{2264} {}?", feature, threshold)
}
