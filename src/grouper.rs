//! Partitioning configuration strings into protocol groups.

use crate::classifier::Classifier;
use crate::protocol::ProtocolId;

use log::debug;
use std::collections::HashMap;

/// Configuration strings of one protocol, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolGroup {
    pub protocol: ProtocolId,
    pub links: Vec<String>,
}

/// Ordered mapping from protocol to its configurations.
///
/// Groups appear in the order their protocol was first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedConfigs {
    groups: Vec<ProtocolGroup>,
    index: HashMap<ProtocolId, usize>,
}

impl GroupedConfigs {
    fn push(&mut self, protocol: ProtocolId, config: String) {
        match self.index.get(&protocol) {
            Some(&i) => self.groups[i].links.push(config),
            None => {
                self.index.insert(protocol, self.groups.len());
                self.groups.push(ProtocolGroup {
                    protocol,
                    links: vec![config],
                });
            }
        }
    }

    /// Look up the group for a protocol.
    pub fn get(&self, protocol: ProtocolId) -> Option<&ProtocolGroup> {
        self.index.get(&protocol).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtocolGroup> {
        self.groups.iter()
    }

    /// Protocols in first-seen order.
    pub fn protocols(&self) -> Vec<ProtocolId> {
        self.groups.iter().map(|g| g.protocol).collect()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of configurations across all groups.
    pub fn total_links(&self) -> usize {
        self.groups.iter().map(|g| g.links.len()).sum()
    }
}

impl IntoIterator for GroupedConfigs {
    type Item = ProtocolGroup;
    type IntoIter = std::vec::IntoIter<ProtocolGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Classify each configuration and group it by protocol.
///
/// Unrecognized entries are dropped; compare the input length with
/// [`GroupedConfigs::total_links`] to learn how many.
pub fn group<I, S>(configs: I, classifier: &Classifier) -> GroupedConfigs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut grouped = GroupedConfigs::default();
    let mut dropped = 0usize;

    for config in configs {
        let config = config.into();
        match classifier.classify(&config) {
            ProtocolId::Unrecognized => dropped += 1,
            protocol => grouped.push(protocol, config),
        }
    }

    debug!(
        "Grouped {} configurations into {} groups ({} unrecognized)",
        grouped.total_links(),
        grouped.len(),
        dropped
    );
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassificationScheme;

    fn classifier() -> Classifier {
        Classifier::new(ClassificationScheme::Strict).unwrap()
    }

    #[test]
    fn test_first_seen_order() {
        let grouped = group(["trojan://a", "ss://b", "trojan://c"], &classifier());
        assert_eq!(
            grouped.protocols(),
            vec![ProtocolId::Trojan, ProtocolId::Shadowsocks]
        );
        assert_eq!(
            grouped.get(ProtocolId::Trojan).unwrap().links,
            vec!["trojan://a", "trojan://c"]
        );
        assert_eq!(grouped.get(ProtocolId::Shadowsocks).unwrap().links, vec!["ss://b"]);
    }

    #[test]
    fn test_unrecognized_dropped() {
        let input = vec!["vless://a", "garbage", "", "vless://b"];
        let grouped = group(input.clone(), &classifier());
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.total_links(), 2);
        assert_eq!(input.len() - grouped.total_links(), 2);
        assert!(grouped.get(ProtocolId::Unrecognized).is_none());
    }

    #[test]
    fn test_empty_input() {
        let grouped = group(Vec::<String>::new(), &classifier());
        assert!(grouped.is_empty());
        assert_eq!(grouped.total_links(), 0);
    }

    #[test]
    fn test_block_configs_grouped() {
        let wg = "[Interface]\nPrivateKey = k=\n[Peer]\nEndpoint = a:51820";
        let grouped = group([wg, "socks5://1.1.1.1:1080"], &classifier());
        assert_eq!(
            grouped.protocols(),
            vec![ProtocolId::WireGuard, ProtocolId::Socks5]
        );
        let wireguard = grouped.into_iter().next().unwrap();
        assert_eq!(wireguard.links, vec![wg]);
    }
}
