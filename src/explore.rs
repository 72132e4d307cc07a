use std::collections::HashSet;

use itertools::Itertools;

use crate::error::{GuessError, GuessResult};
use crate::ledger::AnswerEntry;
use crate::node::{Answer, Node, NodeId};
use crate::oracle::{Oracle, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreLimits {
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Default for ExploreLimits {
    fn default() -> Self {
        ExploreLimits {
            max_depth: 64,
            max_nodes: 10_000,
        }
    }
}

/// Answers that lead from the root to one terminal node.
pub type GuessPath = Vec<AnswerEntry>;

/// Walk the whole tree through the oracle and collect every path whose
/// terminal guess is exactly `name`. Negative branches are visited first.
pub async fn find_paths<O: Oracle + ?Sized>(
    oracle: &O,
    name: &str,
    limits: ExploreLimits,
) -> GuessResult<Vec<GuessPath>> {
    let mut paths = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut fetched = 0usize;
    let mut stack: Vec<(Target, GuessPath)> = vec![(Target::Root, Vec::new())];

    while let Some((target, path)) = stack.pop() {
        if let Target::Node(id) = &target {
            if !seen.insert(id.clone()) {
                tracing::debug!(%id, "Skipping node already visited");
                continue;
            }
        }
        if path.len() > limits.max_depth {
            return Err(GuessError::ExploreLimit {
                what: "depth",
                limit: limits.max_depth,
            });
        }
        if fetched >= limits.max_nodes {
            return Err(GuessError::ExploreLimit {
                what: "node",
                limit: limits.max_nodes,
            });
        }

        let node = oracle.fetch(&target).await?;
        fetched += 1;
        if let Some(id) = node.id() {
            seen.insert(id.clone());
        }

        match node {
            Node::Terminal(guess) => {
                if guess.value() == name {
                    paths.push(path);
                }
            }
            Node::Interior(question) => {
                for answer in [Answer::Affirmative, Answer::Negative] {
                    let mut next = path.clone();
                    next.push(AnswerEntry::new(question.prompt(), answer));
                    stack.push((Target::Node(question.branch(answer).clone()), next));
                }
            }
        }
    }

    tracing::debug!(fetched, found = paths.len(), name, "Tree exploration finished");
    Ok(paths)
}

/// Indented list of the questions on a path with the answer given to each.
pub fn describe_path(path: &[AnswerEntry]) -> String {
    path.iter()
        .map(|entry| format!("  - {} {}", entry.question(), entry.answer().label().to_uppercase()))
        .join("\n")
}
