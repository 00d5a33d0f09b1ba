//! Protocol identities and their display metadata.

use std::fmt;

/// Protocol family a configuration string belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolId {
    Vless,
    Vmess,
    Trojan,
    Shadowsocks,
    ShadowsocksR,
    Hysteria2,
    MtProto,
    Socks5,
    WireGuard,
    OpenVpn,
    Http,
    L2tpIpsec,
    Sstp,
    Ikev2,
    Pptp,
    Reality,
    /// Fallback for text no matcher recognised.
    Unrecognized,
}

impl ProtocolId {
    /// Every recognisable identity, in the default precedence order.
    pub const ALL: [ProtocolId; 16] = [
        ProtocolId::Vless,
        ProtocolId::Vmess,
        ProtocolId::Trojan,
        ProtocolId::Shadowsocks,
        ProtocolId::ShadowsocksR,
        ProtocolId::Hysteria2,
        ProtocolId::MtProto,
        ProtocolId::Socks5,
        ProtocolId::WireGuard,
        ProtocolId::OpenVpn,
        ProtocolId::Http,
        ProtocolId::L2tpIpsec,
        ProtocolId::Sstp,
        ProtocolId::Ikev2,
        ProtocolId::Pptp,
        ProtocolId::Reality,
    ];

    /// Short identifier, stable across releases.
    pub fn id(&self) -> &'static str {
        match self {
            ProtocolId::Vless => "VLESS",
            ProtocolId::Vmess => "VMess",
            ProtocolId::Trojan => "Trojan",
            ProtocolId::Shadowsocks => "SS",
            ProtocolId::ShadowsocksR => "SSR",
            ProtocolId::Hysteria2 => "Hysteria2",
            ProtocolId::MtProto => "MTProto",
            ProtocolId::Socks5 => "SOCKS5",
            ProtocolId::WireGuard => "WireGuard",
            ProtocolId::OpenVpn => "OpenVPN",
            ProtocolId::Http => "HTTP/HTTPS",
            ProtocolId::L2tpIpsec => "L2TP/IPSec",
            ProtocolId::Sstp => "SSTP",
            ProtocolId::Ikev2 => "IKEv2",
            ProtocolId::Pptp => "PPTP",
            ProtocolId::Reality => "REALITY",
            ProtocolId::Unrecognized => "Unrecognized",
        }
    }

    /// Human readable name shown in group headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProtocolId::Shadowsocks => "Shadowsocks",
            ProtocolId::ShadowsocksR => "ShadowsocksR",
            other => other.id(),
        }
    }

    /// Material icon name for the group header.
    pub fn icon(&self) -> &'static str {
        match self {
            ProtocolId::Vless | ProtocolId::Vmess => "hub",
            ProtocolId::Trojan => "vpn_key",
            ProtocolId::Shadowsocks | ProtocolId::ShadowsocksR => "dns",
            ProtocolId::WireGuard => "security",
            ProtocolId::MtProto => "send",
            ProtocolId::Hysteria2 => "bolt",
            ProtocolId::Socks5 => "settings_ethernet",
            ProtocolId::Http => "http",
            ProtocolId::OpenVpn => "lock_open",
            ProtocolId::L2tpIpsec => "vpn_lock",
            ProtocolId::Sstp => "lock",
            ProtocolId::Ikev2 => "key",
            ProtocolId::Pptp => "router",
            ProtocolId::Reality | ProtocolId::Unrecognized => "shield",
        }
    }

    /// Whether configurations of this family are single-line `scheme://` links.
    pub fn is_link_style(&self) -> bool {
        matches!(
            self,
            ProtocolId::Vless
                | ProtocolId::Vmess
                | ProtocolId::Trojan
                | ProtocolId::Shadowsocks
                | ProtocolId::ShadowsocksR
                | ProtocolId::Hysteria2
                | ProtocolId::MtProto
                | ProtocolId::Socks5
                | ProtocolId::Http
        )
    }

    /// Whether hyperlinks of this family are harvested from fetched pages.
    ///
    /// HTTP/HTTPS is link-style but excluded: every navigation link on a page
    /// would match it.
    pub fn is_extractable(&self) -> bool {
        self.is_link_style() && *self != ProtocolId::Http
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ProtocolId::Shadowsocks.display_name(), "Shadowsocks");
        assert_eq!(ProtocolId::Shadowsocks.id(), "SS");
        assert_eq!(ProtocolId::Http.to_string(), "HTTP/HTTPS");
    }

    #[test]
    fn test_icon_fallback() {
        assert_eq!(ProtocolId::Reality.icon(), "shield");
        assert_eq!(ProtocolId::Unrecognized.icon(), "shield");
        assert_eq!(ProtocolId::Pptp.icon(), "router");
    }

    #[test]
    fn test_extractable_excludes_http() {
        assert!(ProtocolId::Http.is_link_style());
        assert!(!ProtocolId::Http.is_extractable());
        assert!(ProtocolId::MtProto.is_extractable());
        assert!(!ProtocolId::WireGuard.is_extractable());
    }
}
