mod agent_observer;
pub mod client;
mod config;
mod default_observer;
mod error;
mod replay;
mod types;

pub use agent_observer::{AgentObserver, SessionStats};
pub use client::{ActServer, ClientError, HttpConnection};
pub use config::{Config, ConfigError};
pub use default_observer::DefaultObserver;
pub use error::{WumpusError, WumpusResult};
pub use replay::ReplayFile;
pub use types::{Direction, Position};
