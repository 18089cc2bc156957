use std::time::Duration;

use crate::infra::WumpusError;
use crate::planners::{AgentResponse, Percept};

/// Counters for one polling session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub rounds: u64,
    pub answered: u64,
    pub skipped: u64,
    pub busy: u64,
}

/// Trait for observing the polling loop
pub trait AgentObserver {
    /// Called once before the first request
    fn on_session_start(&mut self, agent: &str, env: &str, hint_url: &str);

    /// Called with the messages and errors of every successful response
    fn on_server_feedback(&mut self, messages: &[String], errors: &[String]);

    /// Called when a percept has been decoded, before planning
    fn on_percept(&mut self, run: &str, percept: &Percept);

    /// Called when a plan has been chosen for a run
    fn on_plan(&mut self, run: &str, response: &AgentResponse, elapsed: Duration);

    /// Called when a run cannot be answered
    fn on_percept_skipped(&mut self, run: &str, error: &WumpusError);

    /// Called before waiting on a round that produced no answers
    fn on_idle(&mut self) {}

    /// Called when the server answered 503
    fn on_server_busy(&mut self);

    /// Called when the loop stops without error
    fn on_session_end(&mut self, stats: &SessionStats);
}
