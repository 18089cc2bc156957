use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::planners::{AgentResponse, Percept};

#[derive(Serialize)]
struct ReplayEntry<'a> {
    run: &'a str,
    percept: &'a Percept,
    action: &'a AgentResponse,
}

/// Append-only JSON-lines log of answered percepts.
pub struct ReplayFile {
    path: PathBuf,
    file: File,
}

impl ReplayFile {
    pub fn new(replays_folder: &str, agent: &str, env: &str) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let date_time_str = now
            .format(format_description!("[year][month][day]-[hour][minute][second]"))
            .map_err(io::Error::other)?;

        let path = Path::new(replays_folder).join(format!("{} - {} - {}.jsonl", agent, date_time_str, env));

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        Ok(ReplayFile { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, run: &str, percept: &Percept, action: &AgentResponse) -> io::Result<()> {
        let entry = ReplayEntry {
            run,
            percept,
            action,
        };
        serde_json::to_writer(&mut self.file, &entry)?;
        self.file.write_all(b"\n")?;
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Direction;
    use crate::planners::Observations;

    #[test]
    fn test_writes_one_line_per_answer() {
        let folder = std::env::temp_dir().join(format!("wumpbot-replay-{}", std::process::id()));
        let folder_str = folder.to_string_lossy().to_string();

        let mut replay = ReplayFile::new(&folder_str, "agent", "env").unwrap();
        let percept = Percept {
            map: "CW".to_string(),
            observations: Observations {
                current_cell: "C".to_string(),
                humidity: None,
            },
            max_time: 1.0,
        };
        let action = AgentResponse {
            actions: vec![Direction::East, Direction::North],
            expected_time: 0.5,
        };
        replay.append("1#0", &percept, &action).unwrap();
        replay.append("1#1", &percept, &action).unwrap();

        let file_name = replay.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("agent - "));
        assert!(file_name.ends_with(" - env.jsonl"));

        let contents = fs::read_to_string(replay.path()).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["run"], "1#1");
        assert_eq!(lines[0]["action"]["actions"][0], "GO east");
        assert_eq!(lines[0]["percept"]["max-time"], 1.0);

        fs::remove_dir_all(folder).unwrap();
    }
}
