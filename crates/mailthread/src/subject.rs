//! Subject normalization for weak thread linking
//!
//! Normalized subjects are equality keys only; they are never shown to
//! a user. Display-facing prefixing lives in [`crate::compose`].

/// Reply/forward markers stripped during normalization, matched
/// case-insensitively. Mail clients localize these, so the set covers
/// the locales the panel sees in practice; site-local additions come in
/// through [`crate::config::PanelConfig::extra_subject_markers`].
const REPLY_MARKERS: &[&str] = &[
    "re", "fwd", "fw", "aw", "wg", "r", "vs", "risposta", "inoltro", "rif", "i",
];

/// Normalize a subject line into a weak linking key.
///
/// Strips stacked reply/forward markers ("Re: Fwd: ..." loses both),
/// collapses runs of whitespace to a single space, trims, and
/// lower-cases. `None` and empty input normalize to `""`.
pub fn normalize_subject(subject: Option<&str>) -> String {
    normalize_subject_with(subject, &[])
}

/// Normalize with additional site-local markers merged into the
/// built-in set.
pub fn normalize_subject_with(subject: Option<&str>, extra_markers: &[String]) -> String {
    let Some(subject) = subject else {
        return String::new();
    };

    let mut rest = subject.trim();
    loop {
        match strip_marker(rest, extra_markers) {
            Some(stripped) => rest = stripped,
            None => break,
        }
    }

    rest.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip one leading marker, with or without its colon. Returns `None`
/// when the input does not start with a marker.
fn strip_marker<'a>(s: &'a str, extra_markers: &[String]) -> Option<&'a str> {
    let builtin = REPLY_MARKERS.iter().copied();
    let extra = extra_markers.iter().map(String::as_str);

    for marker in builtin.chain(extra) {
        let Some(rest) = strip_prefix_ignore_case(s, marker) else {
            continue;
        };
        // The marker must be delimited by a colon or whitespace so a
        // subject like "Reminder" is not eaten by "re".
        if let Some(rest) = rest.strip_prefix(':') {
            return Some(rest.trim_start());
        }
        if rest.starts_with(char::is_whitespace) {
            // Bare marker followed by a colon further on ("Re :") still
            // counts; a plain word does not.
            let after = rest.trim_start();
            if let Some(after) = after.strip_prefix(':') {
                return Some(after.trim_start());
            }
        }
    }
    None
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
