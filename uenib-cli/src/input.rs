//! Stdin event lines
//!
//! A line is either `<gnb> <event>` or just `<event>`, in which case the
//! event is published for the default gNB. Blank lines and lines starting
//! with `#` are skipped.

/// Event to publish, as read from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub gnb: String,
    pub event: String,
}

/// Parses one input line. Returns `None` for lines carrying no event.
pub fn parse_input_line(line: &str, default_gnb: &str) -> Option<InputEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (gnb, event) = match line.split_once(char::is_whitespace) {
        Some((gnb, event)) => (gnb, event.trim()),
        None => (default_gnb, line),
    };
    Some(InputEvent {
        gnb: gnb.to_string(),
        event: event.to_string(),
    })
}
