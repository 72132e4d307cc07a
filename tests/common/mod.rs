//! In-memory oracle for driving sessions without a server.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use guess_cli::error::{GuessError, GuessResult};
use guess_cli::node::{Node, NodeId};
use guess_cli::oracle::{Oracle, Target};

const ROOT_KEY: &str = "start";

#[derive(Default)]
pub struct ScriptedOracle {
    bodies: HashMap<String, String>,
    failures: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<Target>>,
}

impl ScriptedOracle {
    pub fn new(root: &str) -> Self {
        let mut oracle = ScriptedOracle::default();
        oracle.bodies.insert(ROOT_KEY.to_string(), root.to_string());
        oracle
    }

    pub fn with_node(mut self, id: &str, body: &str) -> Self {
        self.bodies.insert(id.to_string(), body.to_string());
        self
    }

    /// Make the next `times` requests for `id` fail with a 503.
    pub fn failing(self, id: &str, times: usize) -> Self {
        self.failures.lock().unwrap().insert(id.to_string(), times);
        self
    }

    pub fn calls(&self) -> Vec<Target> {
        self.calls.lock().unwrap().clone()
    }

    fn serve(&self, key: &str) -> GuessResult<Node> {
        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(GuessError::Status {
                        status: 503,
                        url: key.to_string(),
                    });
                }
            }
        }
        match self.bodies.get(key) {
            Some(body) => Node::from_json(body),
            None => Err(GuessError::Oracle(format!("unknown node {}", key))),
        }
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn root(&self) -> GuessResult<Node> {
        self.calls.lock().unwrap().push(Target::Root);
        self.serve(ROOT_KEY)
    }

    async fn node(&self, id: &NodeId) -> GuessResult<Node> {
        self.calls.lock().unwrap().push(Target::Node(id.clone()));
        self.serve(id.as_str())
    }
}

/// Three-question tree: sword → (ninja → Naruto | Kakashi) | Sakura.
pub fn ninja_oracle() -> ScriptedOracle {
    ScriptedOracle::new(r#"{"feature":"has_sword","threshold":0.5,"yes":"n2","no":"n3"}"#)
        .with_node("n2", r#"{"question":"Is your character a ninja?","yes":"n4","no":"n5"}"#)
        .with_node("n3", r#"{"guess":"Sakura"}"#)
        .with_node("n4", r#"{"guess":"Naruto"}"#)
        .with_node("n5", r#"{"guess":"Kakashi"}"#)
}
