//! Traversal controller for one game.
//!
//! A [`Session`] walks the oracle's decision tree one answer at a time.
//! All state lives in a single slot, so what the front end renders is a
//! pure function of that slot:
//!
//! | Slot      | View                      |
//! |-----------|---------------------------|
//! | `Idle`    | `Loading`                 |
//! | `Loading` | `Loading`                 |
//! | `Ready`   | `Question` or `Terminal`  |
//! | `Failed`  | `Failed`                  |
//!
//! Every request goes through `begin_*` then [`Session::complete`]. The
//! async helpers (`start`, `submit_answer`, `retry`, `restart`) sequence
//! both halves against the session's oracle; event-driven callers can run
//! the fetch elsewhere and hand the result back to `complete`.
//!
//! An answer is written to the ledger only once its successor node has
//! arrived, so the transcript never runs ahead of the displayed node.

use crate::error::{GuessError, GuessResult};
use crate::ledger::{AnswerEntry, AnswerLedger};
use crate::node::{Answer, Node, Question};
use crate::oracle::{Oracle, Target};

#[derive(Debug, Clone)]
struct Request {
    target: Target,
    /// Recorded when the fetch succeeds.
    entry: Option<AnswerEntry>,
}

#[derive(Debug)]
enum Slot {
    Idle,
    Loading(Request),
    Ready(Node),
    Failed { request: Request, error: GuessError },
}

/// An issued request. Hand it back to [`Session::complete`] with the result.
#[derive(Debug)]
pub struct Fetch {
    generation: u64,
    request: Request,
}

impl Fetch {
    pub fn target(&self) -> &Target {
        &self.request.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub enum View<'a> {
    Loading,
    Question(&'a Question),
    Terminal(&'a str),
    Failed(&'a GuessError),
}

/// What an async operation led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do in the current state; no request was made.
    Ignored,
    Question,
    Guess,
    Failed,
}

pub struct Session<O> {
    oracle: O,
    slot: Slot,
    ledger: AnswerLedger,
    generation: u64,
}

pub fn create_session<O: Oracle>(oracle: O) -> Session<O> {
    Session::new(oracle)
}

impl<O: Oracle> Session<O> {
    pub fn new(oracle: O) -> Self {
        Session {
            oracle,
            slot: Slot::Idle,
            ledger: AnswerLedger::new(),
            generation: 0,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn current(&self) -> Option<&Node> {
        match &self.slot {
            Slot::Ready(node) => Some(node),
            _ => None,
        }
    }

    pub fn view(&self) -> View<'_> {
        match &self.slot {
            Slot::Idle | Slot::Loading(_) => View::Loading,
            Slot::Ready(Node::Interior(question)) => View::Question(question),
            Slot::Ready(Node::Terminal(guess)) => View::Terminal(guess.value()),
            Slot::Failed { error, .. } => View::Failed(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.slot, Slot::Idle | Slot::Loading(_))
    }

    // -- Two-phase API --

    /// Clear the transcript and request the root. Also used for restart.
    pub fn begin_start(&mut self) -> Fetch {
        self.ledger.clear();
        self.issue(Request {
            target: Target::Root,
            entry: None,
        })
    }

    /// Request the node behind `answer`. `None` unless a question is showing.
    pub fn begin_answer(&mut self, answer: Answer) -> Option<Fetch> {
        let question = match &self.slot {
            Slot::Ready(Node::Interior(question)) => question,
            _ => {
                tracing::debug!(%answer, "Answer ignored, no question is showing");
                return None;
            }
        };
        let request = Request {
            target: Target::Node(question.branch(answer).clone()),
            entry: Some(AnswerEntry::new(question.prompt(), answer)),
        };
        Some(self.issue(request))
    }

    /// Re-issue the request that failed, if any.
    pub fn begin_retry(&mut self) -> Option<Fetch> {
        let request = match &self.slot {
            Slot::Failed { request, .. } => request.clone(),
            _ => return None,
        };
        Some(self.issue(request))
    }

    /// Apply a fetch result. Returns `false` when the fetch was superseded.
    pub fn complete(&mut self, fetch: Fetch, outcome: GuessResult<Node>) -> bool {
        if fetch.generation != self.generation || !matches!(self.slot, Slot::Loading(_)) {
            tracing::debug!(
                generation = fetch.generation,
                current = self.generation,
                "Dropping stale oracle response"
            );
            return false;
        }

        match outcome {
            Ok(node) => {
                tracing::debug!(to = ?fetch.request.target, terminal = node.is_terminal(), "Node arrived");
                if let Some(entry) = fetch.request.entry {
                    self.ledger.append(entry);
                }
                self.slot = Slot::Ready(node);
            }
            Err(error) => {
                tracing::warn!(to = ?fetch.request.target, %error, "Oracle fetch failed");
                self.slot = Slot::Failed {
                    request: fetch.request,
                    error,
                };
            }
        }
        true
    }

    fn issue(&mut self, request: Request) -> Fetch {
        self.generation += 1;
        self.slot = Slot::Loading(request.clone());
        Fetch {
            generation: self.generation,
            request,
        }
    }

    // -- Async operations --

    pub async fn start(&mut self) -> Step {
        let fetch = self.begin_start();
        self.run(fetch).await
    }

    pub async fn restart(&mut self) -> Step {
        self.start().await
    }

    pub async fn submit_answer(&mut self, answer: Answer) -> Step {
        match self.begin_answer(answer) {
            Some(fetch) => self.run(fetch).await,
            None => Step::Ignored,
        }
    }

    pub async fn retry(&mut self) -> Step {
        match self.begin_retry() {
            Some(fetch) => self.run(fetch).await,
            None => Step::Ignored,
        }
    }

    async fn run(&mut self, fetch: Fetch) -> Step {
        let outcome = self.oracle.fetch(fetch.target()).await;
        self.complete(fetch, outcome);
        match &self.slot {
            Slot::Ready(Node::Interior(_)) => Step::Question,
            Slot::Ready(Node::Terminal(_)) => Step::Guess,
            _ => Step::Failed,
        }
    }
}
