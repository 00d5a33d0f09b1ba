//! The board: named handlers for each user action over a single live session.

use crate::classifier::Classifier;
use crate::clipboard::ClipboardPort;
use crate::config::BoardConfig;
use crate::error::{BoardError, IngestError};
use crate::extractor;
use crate::grouper;
use crate::preferences::{Preferences, Theme};
use crate::relay::RelayClient;
use crate::session::{PingState, PingTarget, PingTicket, Session, Source};
use crate::simulator::ReachabilitySimulator;
use crate::utils;
use crate::view;

use futures::future;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<IngestError> for Notice {
    fn from(err: IngestError) -> Self {
        if err.is_informational() {
            Notice::info(err.to_string())
        } else {
            Notice::error(err.to_string())
        }
    }
}

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    AddFromClipboard,
    FetchFromAddress(String),
    TestAll,
    TestItem(PingTarget),
    ToggleGroup(usize),
    CopyLink { group: usize, index: usize },
    CopyGroup(usize),
    ClearSource,
}

/// Summary of a completed ingestion.
#[derive(Debug)]
pub struct Ingested {
    /// Candidates found before classification.
    pub found: usize,
    /// Candidates that landed in a group.
    pub added: usize,
    /// Simulated checks started right after ingestion, if any.
    pub tests: Option<SimulationBatch>,
}

/// Handles of simulated checks started together.
///
/// Dropping the batch leaves the checks running; each one writes its own
/// result when it completes.
#[derive(Debug)]
pub struct SimulationBatch {
    handles: Vec<JoinHandle<()>>,
}

impl SimulationBatch {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait for every check in the batch to report.
    pub async fn join(self) {
        for result in future::join_all(self.handles).await {
            if let Err(e) = result {
                warn!("Simulated check task failed: {}", e);
            }
        }
    }
}

/// Owns the live session and dispatches user actions against it.
pub struct Board {
    /// The single live batch.
    session: Arc<RwLock<Session>>,
    /// Display preferences.
    preferences: Mutex<Preferences>,
    classifier: Classifier,
    relay: RelayClient,
    clipboard: Arc<dyn ClipboardPort>,
    simulator: ReachabilitySimulator,
    /// Configuration for the board.
    pub config: BoardConfig,
}

impl Board {
    /// Create a board with the given configuration and clipboard.
    pub fn new(config: BoardConfig, clipboard: Arc<dyn ClipboardPort>) -> Result<Self, BoardError> {
        let classifier = Classifier::new(config.classification)?;
        let relay = RelayClient::new(&config)?;
        let simulator = ReachabilitySimulator::new(config.simulation.clone());
        let preferences = Preferences::load(config.preferences_path.as_deref());

        info!(
            "Board ready: relay {}, {:?} classification, {} theme",
            config.relay_endpoint,
            config.classification,
            preferences.theme()
        );

        Ok(Self {
            session: Arc::new(RwLock::new(Session::new())),
            preferences: Mutex::new(preferences),
            classifier,
            relay,
            clipboard,
            simulator,
            config,
        })
    }

    /// Replace the reachability simulator, e.g. with a seeded one.
    pub fn with_simulator(mut self, simulator: ReachabilitySimulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// Read access to the live session.
    pub fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn theme(&self) -> Theme {
        self.preferences.lock().theme()
    }

    /// Render the live session as text.
    pub fn render(&self) -> String {
        view::render(&self.session.read())
    }

    /// Run one action and turn its result into a notice.
    ///
    /// Nothing here is fatal: every error becomes an error notice. Actions
    /// with no user-visible feedback return `None`.
    pub async fn dispatch(&self, action: Action) -> Option<Notice> {
        debug!("Dispatching {:?}", action);
        let result = match action {
            Action::ToggleTheme => {
                self.toggle_theme();
                return None;
            }
            Action::AddFromClipboard => self
                .add_from_clipboard()
                .await
                .map(|ingested| Notice::info(format!("Added {} configuration(s).", ingested.added))),
            Action::FetchFromAddress(address) => {
                self.fetch_from_address(&address).await.map(|ingested| {
                    let message = if ingested.tests.is_some() {
                        format!("Found and grouped {} links. Now testing...", ingested.found)
                    } else {
                        format!("Found and grouped {} links.", ingested.found)
                    };
                    Notice::info(message)
                })
            }
            Action::TestAll => self
                .test_all()
                .map(|batch| Notice::info(format!("Testing {} item(s)...", batch.len()))),
            Action::TestItem(target) => self.test_item(target).map(|_| Notice::info("Testing...")),
            Action::ToggleGroup(index) => match self.toggle_group(index) {
                Ok(_) => return None,
                Err(e) => Err(e),
            },
            Action::CopyLink { group, index } => self
                .copy_link(group, index)
                .await
                .map(|_| Notice::info("Link copied to clipboard!")),
            Action::CopyGroup(index) => self
                .copy_group(index)
                .await
                .map(|_| Notice::info("All links copied!")),
            Action::ClearSource => {
                self.clear_source();
                Ok(Notice::info("Source cleared."))
            }
        };

        Some(result.unwrap_or_else(|err| {
            warn!("Action failed: {}", err);
            Notice::from(err)
        }))
    }

    /// Switch between light and dark display.
    pub fn toggle_theme(&self) -> Theme {
        self.preferences.lock().toggle_theme()
    }

    /// Replace the list with the configurations found in the clipboard.
    ///
    /// If the clipboard holds no candidates, or none of them is recognised,
    /// the list is left as it was.
    pub async fn add_from_clipboard(&self) -> Result<Ingested, IngestError> {
        let text = self
            .clipboard
            .read_text()
            .await
            .map_err(IngestError::Clipboard)?;

        let candidates = utils::split_clipboard_text(&text);
        if candidates.is_empty() {
            return Err(IngestError::NoClipboardConfigs);
        }

        let found = candidates.len();
        let grouped = grouper::group(candidates, &self.classifier);
        if grouped.is_empty() {
            return Err(IngestError::NoKnownProtocols);
        }

        let added = grouped.total_links();
        info!("Clipboard: {} of {} candidates recognised", added, found);
        self.session.write().replace(Source::Clipboard, grouped);

        Ok(Ingested {
            found,
            added,
            tests: None,
        })
    }

    /// Fetch `address` through the relay and replace the list with the
    /// configuration links found on the page.
    ///
    /// The list is emptied as soon as the fetch starts and stays empty if it
    /// fails. A fetch overtaken by another fetch or a clear is discarded.
    pub async fn fetch_from_address(&self, address: &str) -> Result<Ingested, IngestError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(IngestError::EmptyAddress);
        }

        info!("Fetching from {}", address);
        let generation = {
            let mut session = self.session.write();
            session.begin_remote(address);
            session.generation()
        };

        let markup = self.relay.fetch_markup(address).await?;
        let links = extractor::extract_links(&markup, &self.classifier);
        if links.is_empty() {
            return Err(IngestError::NoPageLinks);
        }

        let found = links.len();
        let grouped = grouper::group(links, &self.classifier);
        let added = grouped.total_links();
        {
            let mut session = self.session.write();
            if session.generation() != generation {
                warn!("Discarding results from {}: list changed while fetching", address);
                return Err(IngestError::Superseded);
            }
            session.replace(Source::Remote(address.to_string()), grouped);
        }

        let tests = if self.config.auto_test_after_fetch {
            self.test_all().ok()
        } else {
            None
        };

        Ok(Ingested {
            found,
            added,
            tests,
        })
    }

    /// Start a simulated check of every group and every link.
    pub fn test_all(&self) -> Result<SimulationBatch, IngestError> {
        let tickets = {
            let mut session = self.session.write();
            let tickets = session.ping_tickets();
            for ticket in &tickets {
                session.record_ping(ticket, PingState::Testing);
            }
            tickets
        };

        if tickets.is_empty() {
            return Err(IngestError::NothingToTest);
        }

        info!("Starting {} simulated checks", tickets.len());
        Ok(SimulationBatch {
            handles: tickets.into_iter().map(|t| self.spawn_check(t)).collect(),
        })
    }

    /// Start a simulated check of one group or link.
    pub fn test_item(&self, target: PingTarget) -> Result<SimulationBatch, IngestError> {
        let ticket = {
            let mut session = self.session.write();
            let ticket = PingTicket {
                generation: session.generation(),
                target,
            };
            if !session.record_ping(&ticket, PingState::Testing) {
                return Err(IngestError::UnknownItem);
            }
            ticket
        };

        Ok(SimulationBatch {
            handles: vec![self.spawn_check(ticket)],
        })
    }

    // The probe is drawn before spawning so checks sample in ticket order.
    fn spawn_check(&self, ticket: PingTicket) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let probe = self.simulator.draw();

        tokio::spawn(async move {
            tokio::time::sleep(probe.delay).await;
            if !session.write().record_ping(&ticket, probe.outcome.into()) {
                debug!("Check for {:?} finished after its list was replaced", ticket.target);
            }
        })
    }

    /// Expand or collapse one group.
    pub fn toggle_group(&self, index: usize) -> Result<bool, IngestError> {
        self.session
            .write()
            .toggle_expanded(index)
            .ok_or(IngestError::UnknownItem)
    }

    /// Copy one link to the clipboard.
    pub async fn copy_link(&self, group: usize, index: usize) -> Result<(), IngestError> {
        let text = self
            .session
            .read()
            .link_text(group, index)
            .map(str::to_string)
            .ok_or(IngestError::UnknownItem)?;

        self.clipboard
            .write_text(&text)
            .await
            .map_err(|source| IngestError::Copy {
                what: "link",
                source,
            })
    }

    /// Copy every link of a group to the clipboard, one per line.
    pub async fn copy_group(&self, index: usize) -> Result<(), IngestError> {
        let text = self
            .session
            .read()
            .group_text(index)
            .ok_or(IngestError::UnknownItem)?;

        self.clipboard
            .write_text(&text)
            .await
            .map_err(|source| IngestError::Copy {
                what: "links",
                source,
            })
    }

    /// Forget the source and every group.
    pub fn clear_source(&self) {
        self.session.write().clear();
        info!("Source cleared");
    }
}
