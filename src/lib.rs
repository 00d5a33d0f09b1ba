//! # proxy-config-board
//!
//! Collect proxy and VPN configuration strings, sort them by protocol and
//! keep them in an interactive, collapsible list.
//!
//! Configurations come from the clipboard or from a remote page fetched
//! through a relay. Each string is classified against a fixed precedence
//! table, grouped by protocol in first-seen order, and shown with a
//! simulated reachability check. The check is a random stand-in, not a
//! network probe.

pub mod board;
pub mod classifier;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod extractor;
pub mod grouper;
pub mod middleware;
pub mod preferences;
pub mod protocol;
pub mod relay;
pub mod server;
pub mod session;
pub mod simulator;
pub mod view;
mod utils;

pub use board::{Action, Board, Ingested, Notice, NoticeLevel, SimulationBatch};
pub use classifier::Classifier;
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{ClipboardPort, MemoryClipboard};
pub use config::{
    BoardConfig, BoardConfigBuilder, ClassificationScheme, RelayServerConfig, SimulationConfig,
};
pub use error::{BoardError, ClipboardError, IngestError, RelayError};
pub use extractor::extract_links;
pub use grouper::{group, GroupedConfigs, ProtocolGroup};
pub use middleware::RelayMiddleware;
pub use preferences::{Preferences, Theme};
pub use protocol::ProtocolId;
pub use relay::RelayClient;
pub use session::{Group, Link, PingState, PingTarget, PingTicket, Session, Source};
pub use simulator::{PingOutcome, ReachabilitySimulator, SimulatedProbe};
