//! Protocol classification of configuration strings.
//!
//! A [`Classifier`] holds an ordered matcher table. Several formats are
//! structurally ambiguous (a text block can mention both `[Interface]` and
//! `openvpn`), so the first matcher in the table wins.

use crate::config::ClassificationScheme;
use crate::protocol::ProtocolId;

use regex::{Regex, RegexBuilder};

/// One row of the precedence table. Every pattern must match.
#[derive(Debug, Clone)]
struct Matcher {
    protocol: ProtocolId,
    patterns: Vec<Regex>,
}

impl Matcher {
    fn new(protocol: ProtocolId, patterns: &[&str]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { protocol, patterns })
    }

    /// Case-insensitive `scheme://` prefix, after leading whitespace.
    fn scheme(protocol: ProtocolId, schemes: &[&str]) -> Result<Self, regex::Error> {
        let alternatives = schemes
            .iter()
            .map(|s| regex::escape(&format!("{}://", s)))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"^\s*(?:{})", alternatives))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            protocol,
            patterns: vec![pattern],
        })
    }

    /// Case-insensitive substring anywhere in the text.
    fn contains(protocol: ProtocolId, needle: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            protocol,
            patterns: vec![pattern],
        })
    }

    fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().all(|p| p.is_match(text))
    }
}

/// Maps configuration strings to a [`ProtocolId`].
#[derive(Debug, Clone)]
pub struct Classifier {
    scheme: ClassificationScheme,
    matchers: Vec<Matcher>,
}

impl Classifier {
    /// Build the precedence table for the given scheme.
    pub fn new(scheme: ClassificationScheme) -> Result<Self, regex::Error> {
        let matchers = match scheme {
            ClassificationScheme::Strict => strict_table()?,
            ClassificationScheme::Loose => loose_table()?,
        };
        Ok(Self { scheme, matchers })
    }

    /// The scheme this classifier was built with.
    pub fn scheme(&self) -> ClassificationScheme {
        self.scheme
    }

    /// Classify one configuration string.
    ///
    /// Never fails: text no matcher accepts is [`ProtocolId::Unrecognized`].
    pub fn classify(&self, text: &str) -> ProtocolId {
        self.matchers
            .iter()
            .find(|m| m.is_match(text))
            .map(|m| m.protocol)
            .unwrap_or(ProtocolId::Unrecognized)
    }

    /// Whether a hyperlink target should be harvested from fetched markup.
    pub fn is_extractable(&self, href: &str) -> bool {
        self.classify(href).is_extractable()
    }

    /// Protocols in precedence order.
    pub fn precedence(&self) -> Vec<ProtocolId> {
        self.matchers.iter().map(|m| m.protocol).collect()
    }
}

fn strict_table() -> Result<Vec<Matcher>, regex::Error> {
    Ok(vec![
        Matcher::scheme(ProtocolId::Vless, &["vless"])?,
        Matcher::scheme(ProtocolId::Vmess, &["vmess"])?,
        Matcher::scheme(ProtocolId::Trojan, &["trojan"])?,
        Matcher::scheme(ProtocolId::Shadowsocks, &["ss"])?,
        Matcher::scheme(ProtocolId::ShadowsocksR, &["ssr"])?,
        Matcher::scheme(ProtocolId::Hysteria2, &["hysteria2"])?,
        Matcher::new(
            ProtocolId::MtProto,
            &[r"(?i)^\s*tg://proxy\?(?:[^#]*&)?server="],
        )?,
        Matcher::scheme(ProtocolId::Socks5, &["socks5"])?,
        Matcher::new(
            ProtocolId::WireGuard,
            &[r"\[Interface\]", r"(?m)^\s*PrivateKey\s*="],
        )?,
        Matcher::contains(ProtocolId::OpenVpn, "openvpn")?,
        Matcher::scheme(ProtocolId::Http, &["http", "https"])?,
        Matcher::contains(ProtocolId::L2tpIpsec, "l2tp")?,
        Matcher::contains(ProtocolId::Sstp, "sstp")?,
        Matcher::contains(ProtocolId::Ikev2, "ikev2")?,
        Matcher::contains(ProtocolId::Pptp, "pptp")?,
        Matcher::new(ProtocolId::Reality, &[r"reality-opts"])?,
    ])
}

fn loose_table() -> Result<Vec<Matcher>, regex::Error> {
    Ok(vec![
        Matcher::contains(ProtocolId::Vless, "vless://")?,
        Matcher::contains(ProtocolId::Vmess, "vmess://")?,
        Matcher::contains(ProtocolId::Trojan, "trojan://")?,
        Matcher::contains(ProtocolId::Shadowsocks, "ss://")?,
        Matcher::contains(ProtocolId::ShadowsocksR, "ssr://")?,
        Matcher::contains(ProtocolId::Hysteria2, "hysteria2://")?,
        Matcher::contains(ProtocolId::MtProto, "tg://proxy")?,
        Matcher::contains(ProtocolId::Socks5, "socks5://")?,
        Matcher::contains(ProtocolId::WireGuard, "[Interface]")?,
        Matcher::new(ProtocolId::OpenVpn, &[r"(?im)^client"])?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict() -> Classifier {
        Classifier::new(ClassificationScheme::Strict).unwrap()
    }

    #[test]
    fn test_scheme_prefixes() {
        let c = strict();
        assert_eq!(c.classify("vless://uuid@host:443#V"), ProtocolId::Vless);
        assert_eq!(c.classify("VMESS://eyJhZGQiOiIxIn0="), ProtocolId::Vmess);
        assert_eq!(c.classify("trojan://pw@host:443"), ProtocolId::Trojan);
        assert_eq!(c.classify("ss://YWVz@1.1.1.1:8888#S"), ProtocolId::Shadowsocks);
        assert_eq!(c.classify("ssr://abcdef"), ProtocolId::ShadowsocksR);
        assert_eq!(c.classify("hysteria2://pw@h:443"), ProtocolId::Hysteria2);
        assert_eq!(c.classify("socks5://1.2.3.4:1080"), ProtocolId::Socks5);
        assert_eq!(c.classify("https://example.com/sub"), ProtocolId::Http);
        assert_eq!(c.classify("http://1.2.3.4:8080"), ProtocolId::Http);
        assert_eq!(c.classify("  trojan://pw@host:443"), ProtocolId::Trojan);
    }

    #[test]
    fn test_scheme_must_be_prefix() {
        let c = strict();
        assert_eq!(c.classify("see vless://x"), ProtocolId::Unrecognized);
        assert_eq!(c.classify("ssh://host"), ProtocolId::Unrecognized);
    }

    #[test]
    fn test_mtproto_requires_server_key() {
        let c = strict();
        assert_eq!(
            c.classify("tg://proxy?server=1.2.3.4&port=443&secret=ee"),
            ProtocolId::MtProto
        );
        assert_eq!(
            c.classify("TG://PROXY?port=443&server=1.2.3.4"),
            ProtocolId::MtProto
        );
        assert_eq!(c.classify("tg://proxy?port=443"), ProtocolId::Unrecognized);
    }

    #[test]
    fn test_wireguard_needs_both_markers() {
        let c = strict();
        let block = "PrivateKey = abc=\nAddress = 10.0.0.2/32\n[Interface]\n";
        assert_eq!(c.classify(block), ProtocolId::WireGuard);
        assert_eq!(c.classify("[Interface]\nAddress = 10.0.0.2/32"), ProtocolId::Unrecognized);
    }

    #[test]
    fn test_wireguard_wins_over_openvpn() {
        let c = strict();
        let block = "# exported from openvpn tools\n[Interface]\nPrivateKey = abc=\n";
        assert_eq!(c.classify(block), ProtocolId::WireGuard);
    }

    #[test]
    fn test_named_vpn_substrings() {
        let c = strict();
        assert_eq!(c.classify("client\nproto udp\n# OpenVPN profile"), ProtocolId::OpenVpn);
        assert_eq!(c.classify("L2TP server 10.0.0.1 psk"), ProtocolId::L2tpIpsec);
        assert_eq!(c.classify("type=SSTP host=a"), ProtocolId::Sstp);
        assert_eq!(c.classify("IKEv2 gateway"), ProtocolId::Ikev2);
        assert_eq!(c.classify("pptp vpn.example.com"), ProtocolId::Pptp);
    }

    #[test]
    fn test_scheme_beats_reality_substring() {
        let c = strict();
        assert_eq!(
            c.classify("vless://u@h:443?security=reality&reality-opts=x"),
            ProtocolId::Vless
        );
        assert_eq!(c.classify("reality-opts:\n  public-key: k"), ProtocolId::Reality);
    }

    #[test]
    fn test_classify_is_total_and_deterministic() {
        let c = strict();
        for input in ["", "   ", "not-a-config", "://", "\n\n", "vless://"] {
            let first = c.classify(input);
            assert_eq!(first, c.classify(input));
        }
        assert_eq!(c.classify(""), ProtocolId::Unrecognized);
    }

    #[test]
    fn test_precedence_order() {
        let c = strict();
        assert_eq!(c.precedence(), ProtocolId::ALL.to_vec());
    }

    #[test]
    fn test_loose_scheme() {
        let c = Classifier::new(ClassificationScheme::Loose).unwrap();
        assert_eq!(c.scheme(), ClassificationScheme::Loose);
        assert_eq!(c.classify("see vless://x"), ProtocolId::Vless);
        assert_eq!(c.classify("tg://proxy?port=443"), ProtocolId::MtProto);
        assert_eq!(c.classify("[interface]\naddress = x"), ProtocolId::WireGuard);
        assert_eq!(c.classify("dev tun\nclient\nremote a 1194"), ProtocolId::OpenVpn);
        assert_eq!(c.classify("https://example.com"), ProtocolId::Unrecognized);
        assert_eq!(c.classify("reality-opts"), ProtocolId::Unrecognized);
    }

    #[test]
    fn test_extractable_links() {
        let c = strict();
        assert!(c.is_extractable("vless://x"));
        assert!(c.is_extractable("tg://proxy?server=a&port=1"));
        assert!(!c.is_extractable("https://example.com"));
        assert!(!c.is_extractable("javascript:void(0)"));
    }
}
