use std::time::{Duration, Instant};

use crate::infra::client::{ActRequest, ActionRequest, RunAction, ServerReply};
use crate::infra::{
    ActServer, AgentObserver, ClientError, Config, ReplayFile, SessionStats, WumpusError,
};
use crate::planners::{Agent, Percept};

/// Polls the server, answers every delivered percept, and submits the answers
/// with the next request.
pub struct Game<S: ActServer, O: AgentObserver> {
    connection: S,
    observer: O,
    agent: Agent,
    replay_file: Option<ReplayFile>,
    agent_name: String,
    env: String,
    hint_url: String,
    pwd: String,
    single_request: bool,
    idle_delay: Duration,
    busy_delay: Duration,
    max_rounds: Option<u64>,
    stats: SessionStats,
}

impl<S: ActServer, O: AgentObserver> Game<S, O> {
    pub fn new(connection: S, observer: O, config: &Config) -> Self {
        let replay_file = config.replays_folder.as_ref().and_then(|folder| {
            ReplayFile::new(folder, &config.agent, &config.env)
                .inspect(|replay| tracing::info!("Recording replay to {}", replay.path().display()))
                .inspect_err(|e| tracing::warn!("Replay recording disabled: {}", e))
                .ok()
        });

        Self {
            connection,
            observer,
            agent: Agent::new(config.search_settings()),
            replay_file,
            agent_name: config.agent.clone(),
            env: config.env.clone(),
            hint_url: config.hint_url(),
            pwd: config.pwd.clone(),
            single_request: config.single_request,
            idle_delay: config.idle_delay(),
            busy_delay: config.busy_delay(),
            max_rounds: config.max_rounds,
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn request(&self, actions: Vec<RunAction>) -> ActRequest {
        ActRequest {
            agent: self.agent_name.clone(),
            pwd: self.pwd.clone(),
            actions,
            single_request: self.single_request,
        }
    }

    /// Runs until the server rejects a request or `max_rounds` is reached.
    pub async fn run(&mut self) -> Result<SessionStats, ClientError> {
        self.observer
            .on_session_start(&self.agent_name, &self.env, &self.hint_url);

        let mut actions = Vec::new();

        loop {
            if self.max_rounds.is_some_and(|max| self.stats.rounds >= max) {
                if !actions.is_empty() {
                    self.flush(actions).await?;
                }
                break;
            }
            self.stats.rounds += 1;
            tracing::debug!(
                round = self.stats.rounds,
                actions = actions.len(),
                "Polling server"
            );

            let request = self.request(actions);
            let reply = self.connection.act(&request).await?;
            match reply {
                ServerReply::Ok(response) => {
                    self.observer
                        .on_server_feedback(&response.messages, &response.errors);

                    let requested = response.action_requests.len();
                    actions = self.answer(response.action_requests)?;
                    if actions.is_empty() {
                        // The server re-sends skipped runs.
                        if requested > 0 {
                            tracing::debug!(requested, "No run could be answered");
                        }
                        self.observer.on_idle();
                        tokio::time::sleep(self.idle_delay).await;
                    }
                }
                ServerReply::Busy => {
                    self.stats.busy += 1;
                    self.observer.on_server_busy();
                    tokio::time::sleep(self.busy_delay).await;
                    actions = request.actions;
                }
                ServerReply::Rejected { status, body } => {
                    tracing::error!("Status code {}. Stopping.", status);
                    return Err(ClientError::Rejected { status, body });
                }
            }
        }

        self.observer.on_session_end(&self.stats);
        Ok(self.stats)
    }

    /// Submits answers computed in the last round; new requests are left for the next session.
    async fn flush(&mut self, actions: Vec<RunAction>) -> Result<(), ClientError> {
        let request = self.request(actions);
        loop {
            let reply = self.connection.act(&request).await?;
            match reply {
                ServerReply::Ok(response) => {
                    self.observer
                        .on_server_feedback(&response.messages, &response.errors);
                    return Ok(());
                }
                ServerReply::Busy => {
                    self.stats.busy += 1;
                    self.observer.on_server_busy();
                    tokio::time::sleep(self.busy_delay).await;
                }
                ServerReply::Rejected { status, body } => {
                    return Err(ClientError::Rejected { status, body });
                }
            }
        }
    }

    fn answer(&mut self, requests: Vec<ActionRequest>) -> Result<Vec<RunAction>, ClientError> {
        let mut actions = Vec::with_capacity(requests.len());

        for ActionRequest { run, percept } in requests {
            let percept: Percept = match serde_json::from_value(percept) {
                Ok(percept) => percept,
                Err(e) => {
                    self.skip(&run, &WumpusError::MalformedPercept(e.to_string()));
                    continue;
                }
            };
            self.observer.on_percept(&run, &percept);

            let start = Instant::now();
            match self.agent.decide(&percept) {
                Ok(action) => {
                    self.observer.on_plan(&run, &action, start.elapsed());
                    if let Some(replay_file) = self.replay_file.as_mut() {
                        replay_file.append(&run, &percept, &action)?;
                    }
                    self.stats.answered += 1;
                    actions.push(RunAction { run, action });
                }
                Err(e) => self.skip(&run, &e),
            }
        }

        Ok(actions)
    }

    fn skip(&mut self, run: &str, error: &WumpusError) {
        self.stats.skipped += 1;
        self.observer.on_percept_skipped(run, error);
    }
}
