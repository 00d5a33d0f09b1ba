//! The live list of protocol groups and its interactive state.

use crate::grouper::GroupedConfigs;
use crate::protocol::ProtocolId;

use log::{debug, info};
use std::fmt;

/// Where the current list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Clipboard,
    /// Address fetched through the relay.
    Remote(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Clipboard => f.write_str("clipboard"),
            Source::Remote(address) => f.write_str(address),
        }
    }
}

/// Result of the simulated reachability check for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PingState {
    #[default]
    NotTested,
    Testing,
    /// Simulated latency in milliseconds.
    Success(u32),
    Failed,
}

/// One configuration string shown inside a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub text: String,
    pub ping: PingState,
}

/// A protocol group as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub protocol: ProtocolId,
    pub links: Vec<Link>,
    pub expanded: bool,
    /// Aggregate state shown in the group header.
    pub ping: PingState,
}

impl Group {
    fn new(protocol: ProtocolId, links: Vec<String>) -> Self {
        Self {
            protocol,
            links: links
                .into_iter()
                .map(|text| Link {
                    text,
                    ping: PingState::NotTested,
                })
                .collect(),
            expanded: false,
            ping: PingState::NotTested,
        }
    }
}

/// Item a reachability check reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingTarget {
    Group(usize),
    Link { group: usize, index: usize },
}

/// A ping target bound to the session generation it was issued for.
///
/// Writes through a ticket from an older generation are ignored, so timers
/// still pending when the list is replaced cannot touch the new list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingTicket {
    pub generation: u64,
    pub target: PingTarget,
}

/// The single live batch of groups.
#[derive(Debug, Default)]
pub struct Session {
    groups: Vec<Group>,
    source: Option<Source>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a freshly grouped batch.
    ///
    /// Ping states start over and every group starts collapsed.
    pub fn replace(&mut self, source: Source, grouped: GroupedConfigs) {
        self.generation += 1;
        self.groups = grouped
            .into_iter()
            .map(|g| Group::new(g.protocol, g.links))
            .collect();
        info!(
            "Session replaced from {}: {} groups, {} links",
            source,
            self.groups.len(),
            self.total_links()
        );
        self.source = Some(source);
    }

    /// Point the session at a remote address and empty the list until the
    /// fetch completes.
    pub fn begin_remote(&mut self, address: impl Into<String>) {
        self.generation += 1;
        self.groups.clear();
        self.source = Some(Source::Remote(address.into()));
    }

    /// Drop the source and every group.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.groups.clear();
        self.source = None;
        debug!("Session cleared (generation {})", self.generation);
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_links(&self) -> usize {
        self.groups.iter().map(|g| g.links.len()).sum()
    }

    /// Flip the expanded flag of one group. Other groups are untouched.
    pub fn toggle_expanded(&mut self, index: usize) -> Option<bool> {
        let group = self.groups.get_mut(index)?;
        group.expanded = !group.expanded;
        Some(group.expanded)
    }

    /// Text of one link, for copying.
    pub fn link_text(&self, group: usize, index: usize) -> Option<&str> {
        self.groups
            .get(group)?
            .links
            .get(index)
            .map(|l| l.text.as_str())
    }

    /// Every link of a group joined by newlines, for copying.
    pub fn group_text(&self, group: usize) -> Option<String> {
        let group = self.groups.get(group)?;
        Some(
            group
                .links
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Tickets for every group header and every link in the current list.
    pub fn ping_tickets(&self) -> Vec<PingTicket> {
        let mut tickets = Vec::new();
        for (g, group) in self.groups.iter().enumerate() {
            tickets.push(self.ticket(PingTarget::Group(g)));
            for index in 0..group.links.len() {
                tickets.push(self.ticket(PingTarget::Link { group: g, index }));
            }
        }
        tickets
    }

    fn ticket(&self, target: PingTarget) -> PingTicket {
        PingTicket {
            generation: self.generation,
            target,
        }
    }

    /// Current state of a ticket's target, if it still exists.
    pub fn ping_state(&self, ticket: &PingTicket) -> Option<PingState> {
        if ticket.generation != self.generation {
            return None;
        }
        match ticket.target {
            PingTarget::Group(g) => self.groups.get(g).map(|g| g.ping),
            PingTarget::Link { group, index } => self
                .groups
                .get(group)
                .and_then(|g| g.links.get(index))
                .map(|l| l.ping),
        }
    }

    /// Store a ping state. Returns `false` when the ticket is stale.
    pub fn record_ping(&mut self, ticket: &PingTicket, state: PingState) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping ping result for generation {} (live generation {})",
                ticket.generation, self.generation
            );
            return false;
        }
        let slot = match ticket.target {
            PingTarget::Group(g) => self.groups.get_mut(g).map(|g| &mut g.ping),
            PingTarget::Link { group, index } => self
                .groups
                .get_mut(group)
                .and_then(|g| g.links.get_mut(index))
                .map(|l| &mut l.ping),
        };
        match slot {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }
}
