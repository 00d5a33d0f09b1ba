//! Plain-text rendering of the grouped list.

use crate::session::{Group, PingState, Session};

use std::fmt::Write;

/// Label shown for a ping state.
pub fn ping_label(state: PingState) -> String {
    match state {
        PingState::NotTested | PingState::Failed => "n/a".to_string(),
        PingState::Testing => "...".to_string(),
        PingState::Success(ms) => format!("{}ms", ms),
    }
}

/// Render the session as text, one header per group, links under expanded groups.
pub fn render(session: &Session) -> String {
    let mut out = String::new();

    if let Some(source) = session.source() {
        let _ = writeln!(out, "Source: {}", source);
    }
    for (index, group) in session.groups().iter().enumerate() {
        render_group(&mut out, index, group);
    }
    out
}

fn render_group(out: &mut String, index: usize, group: &Group) {
    let _ = writeln!(
        out,
        "[{}] {} {} - {} configurations found  {} {}",
        index,
        group.protocol.icon(),
        group.protocol.display_name(),
        group.links.len(),
        ping_label(group.ping),
        if group.expanded { "expand_less" } else { "expand_more" },
    );
    if !group.expanded {
        return;
    }
    for link in &group.links {
        let _ = writeln!(out, "    {}  ({})", link.text, ping_label(link.ping));
    }
    let _ = writeln!(out, "    Copy All {} Links", group.protocol.display_name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::config::ClassificationScheme;
    use crate::grouper::group;
    use crate::session::Source;

    #[test]
    fn test_ping_labels() {
        assert_eq!(ping_label(PingState::NotTested), "n/a");
        assert_eq!(ping_label(PingState::Testing), "...");
        assert_eq!(ping_label(PingState::Success(87)), "87ms");
        assert_eq!(ping_label(PingState::Failed), "n/a");
    }

    #[test]
    fn test_render_collapsed_and_expanded() {
        let classifier = Classifier::new(ClassificationScheme::Strict).unwrap();
        let mut session = Session::new();
        session.replace(
            Source::Clipboard,
            group(["trojan://a", "ss://b", "trojan://c"], &classifier),
        );
        session.toggle_expanded(0);

        let text = render(&session);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Source: clipboard");
        assert_eq!(
            lines[1],
            "[0] vpn_key Trojan - 2 configurations found  n/a expand_less"
        );
        assert_eq!(lines[2], "    trojan://a  (n/a)");
        assert_eq!(lines[4], "    Copy All Trojan Links");
        assert_eq!(
            lines[5],
            "[1] dns Shadowsocks - 1 configurations found  n/a expand_more"
        );
        assert_eq!(lines.len(), 6);
    }
}
