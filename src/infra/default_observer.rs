use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::infra::{AgentObserver, SessionStats, WumpusError};
use crate::planners::{AgentResponse, Percept};

pub struct DefaultObserver;

impl AgentObserver for DefaultObserver {
    fn on_session_start(&mut self, agent: &str, env: &str, hint_url: &str) {
        info!("Running agent {} on environment {}", agent, env);
        info!("Hint: You can see how your agent performs at {}", hint_url);
    }

    fn on_server_feedback(&mut self, messages: &[String], errors: &[String]) {
        for message in errors {
            error!("Error message from server: {}", message);
        }
        for message in messages {
            info!("Message from server: {}", message);
        }
    }

    fn on_percept(&mut self, run: &str, percept: &Percept) {
        debug!(
            run = run,
            current_cell = %percept.observations.current_cell,
            humidity = ?percept.observations.humidity,
            max_time = percept.max_time,
            "Received percept"
        );
        let _ = writeln!(io::stdout(), "{}", percept.map);
    }

    fn on_plan(&mut self, run: &str, response: &AgentResponse, elapsed: Duration) {
        let actions: Vec<&str> = response.actions.iter().map(|a| a.as_str_name()).collect();
        info!(
            run = run,
            expected_time = response.expected_time,
            "actions: {:?}",
            actions
        );
        if elapsed.as_millis() > 1000 {
            debug!(
                "⚠️  Planning for run {} took {:.2}ms",
                run,
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }

    fn on_percept_skipped(&mut self, run: &str, error: &WumpusError) {
        warn!(run = run, "Skipping run: {}", error);
    }

    fn on_idle(&mut self) {
        info!("Nothing to answer this round - waiting");
    }

    fn on_server_busy(&mut self) {
        warn!("Server is busy - retrying");
    }

    fn on_session_end(&mut self, stats: &SessionStats) {
        info!(
            rounds = stats.rounds,
            answered = stats.answered,
            skipped = stats.skipped,
            busy = stats.busy,
            "Session finished"
        );
    }
}
