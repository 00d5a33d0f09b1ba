//! Utility functions for turning pasted text into configuration candidates.

/// Split pasted text into configuration candidates.
///
/// The text is cut into blocks at blank lines. Inside a block every line
/// containing `://` is a link on its own; the other lines are kept together
/// as one text block (a WireGuard or OpenVPN profile, say). A block opening
/// with a `[Section]` header other than `[Interface]` continues the previous
/// text block, so `[Peer]` sections stay with their interface.
pub(crate) fn split_clipboard_text(content: &str) -> Vec<String> {
    let mut configs: Vec<String> = Vec::new();
    let mut last_text_block: Option<usize> = None;

    for block in blocks(content) {
        let mut text_lines: Vec<&str> = Vec::new();
        let mut text_slot: Option<usize> = None;

        for line in block {
            if line.contains("://") {
                configs.push(line.trim().to_string());
            } else {
                if text_slot.is_none() {
                    text_slot = Some(configs.len());
                    configs.push(String::new());
                }
                text_lines.push(line);
            }
        }

        let Some(slot) = text_slot else {
            continue;
        };
        let text = text_lines.join("\n");

        let continues_previous = is_continuation_header(text_lines[0]);
        match last_text_block {
            Some(previous) if continues_previous => {
                configs[previous].push_str("\n\n");
                configs[previous].push_str(&text);
                configs.remove(slot);
            }
            _ => {
                configs[slot] = text;
                last_text_block = Some(slot);
            }
        }
    }

    configs
}

fn is_continuation_header(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('[') && line.ends_with(']') && line != "[Interface]"
}

/// Blank-line separated groups of non-empty lines, right-trimmed.
fn blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in content.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}
