//! Parsing of a single free-form release body, as written on GitHub releases.

use super::Section;

/// Wrapper header GitHub puts around generated notes, it never names a section.
const WRAPPER_HEADER: &str = "What's Changed";

/// Split one release body into named sections and changes outside of any section.
///
/// Headers (`#` to `###`) open sections, `- ` and `* ` bullets fill them. A section only
/// makes it into the result once it has at least one change. Bullets crediting someone
/// (`@user ...`) are dropped.
#[must_use]
pub fn parse(body: &str) -> (Vec<Section>, Vec<String>) {
    let mut sections = Vec::new();
    let mut ungrouped = Vec::new();
    let mut current: Option<Section> = None;

    for line in body.lines() {
        let line = line.trim();

        if let Some(name) = header_text(line) {
            if name == WRAPPER_HEADER {
                continue;
            }
            flush(&mut sections, current.take());
            current = Some(Section::new(name));
            continue;
        }

        let Some(change) = bullet_text(line) else {
            continue;
        };
        if change.is_empty() || change.starts_with('@') {
            continue;
        }
        match current.as_mut() {
            Some(section) => section.changes.push(change.to_string()),
            None => ungrouped.push(change.to_string()),
        }
    }
    flush(&mut sections, current);

    (sections, ungrouped)
}

fn flush(sections: &mut Vec<Section>, section: Option<Section>) {
    if let Some(section) = section.filter(|section| !section.changes.is_empty()) {
        sections.push(section);
    }
}

/// The text of a `#`, `##`, or `###` header line, trimmed.
fn header_text(line: &str) -> Option<&str> {
    let level = line.bytes().take_while(|byte| *byte == b'#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    #[allow(clippy::indexing_slicing)] // `level` bytes are all ASCII '#'
    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

fn bullet_text(line: &str) -> Option<&str> {
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* "))
}
