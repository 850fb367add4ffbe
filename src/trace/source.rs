//! Event sources.
//!
//! The analyses never decode raw trace bytes themselves: they pull an
//! already-decoded event sequence through [`EventSource`]. A source failure
//! is handed back to the caller untouched.

use super::event::Event;
use crate::utils::config::EVENT_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Producer of a decoded event sequence
pub trait EventSource {
    /// Produce the full event sequence, or the reason it could not be produced
    fn events(&self) -> Result<Cow<'_, [Event]>, ParseError>;
}

impl EventSource for [Event] {
    fn events(&self) -> Result<Cow<'_, [Event]>, ParseError> {
        Ok(Cow::Borrowed(self))
    }
}

impl EventSource for Vec<Event> {
    fn events(&self) -> Result<Cow<'_, [Event]>, ParseError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

/// A trace exported as JSON on disk
///
/// Accepts either a top-level array of events or an object holding the
/// array under one of [`EVENT_FIELD_NAMES`].
#[derive(Debug, Clone)]
pub struct JsonTraceFile {
    path: PathBuf,
}

impl JsonTraceFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for JsonTraceFile {
    fn events(&self) -> Result<Cow<'_, [Event]>, ParseError> {
        debug!("Reading trace events from: {}", self.path.display());

        let file = File::open(&self.path)?;
        let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

        parse_events(&raw).map(Cow::Owned)
    }
}

/// Parse a JSON trace document into events
///
/// # Errors
/// * `ParseError::InvalidFormat` - no event array found
/// * `ParseError::JsonError` - an event has the wrong shape
/// * `ParseError::DanglingLink` - a link points outside the sequence or at itself
pub fn parse_events(raw: &serde_json::Value) -> Result<Vec<Event>, ParseError> {
    let list = match raw {
        serde_json::Value::Array(_) => raw,
        serde_json::Value::Object(obj) => EVENT_FIELD_NAMES
            .iter()
            .find_map(|name| obj.get(*name).filter(|v| v.is_array()))
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "No event array found (expected one of: {})",
                    EVENT_FIELD_NAMES.join(", ")
                ))
            })?,
        _ => {
            return Err(ParseError::InvalidFormat(
                "Trace must be a JSON array or object".to_string(),
            ))
        }
    };

    let events = Vec::<Event>::deserialize(list)?;
    validate_links(&events)?;

    debug!("Parsed {} trace events", events.len());
    Ok(events)
}

/// Every link must name another event of the same sequence
fn validate_links(events: &[Event]) -> Result<(), ParseError> {
    for (idx, ev) in events.iter().enumerate() {
        if let Some(link) = ev.link {
            if link >= events.len() || link == idx {
                return Err(ParseError::DanglingLink { event: idx, link });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::event::EventKind;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_events_array() {
        let raw = json!([
            {"kind": "block_net", "ts": 100, "stack_id": 7,
             "stack": [{"pc": 4096, "file": "a.go", "func": "f", "line": 10}], "link": 1},
            {"kind": "unblock", "ts": 200}
        ]);

        let events = parse_events(&raw).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::BlockNet);
        assert_eq!(events[0].stack[0].func, "f");
        assert_eq!(events[0].link, Some(1));
    }

    #[test]
    fn test_parse_events_object() {
        let raw = json!({"events": [{"kind": "create", "ts": 1}]});
        let events = parse_events(&raw).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Create);
    }

    #[test]
    fn test_parse_events_missing_array() {
        let raw = json!({"foo": 1});
        assert!(matches!(parse_events(&raw), Err(ParseError::InvalidFormat(_))));

        let raw = json!(42);
        assert!(matches!(parse_events(&raw), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_events_dangling_link() {
        let raw = json!([{"kind": "block_net", "ts": 1, "link": 5}]);
        assert!(matches!(
            parse_events(&raw),
            Err(ParseError::DanglingLink { event: 0, link: 5 })
        ));

        let raw = json!([{"kind": "block_net", "ts": 1, "link": 0}]);
        assert!(matches!(parse_events(&raw), Err(ParseError::DanglingLink { .. })));
    }

    #[test]
    fn test_parse_events_bad_event_shape() {
        let raw = json!([{"kind": "block_net"}]);
        assert!(matches!(parse_events(&raw), Err(ParseError::JsonError(_))));
    }

    #[test]
    fn test_json_trace_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"kind": "syscall", "ts": 3}}]"#).unwrap();

        let source = JsonTraceFile::new(file.path());
        let events = source.events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Syscall);
    }

    #[test]
    fn test_json_trace_file_missing() {
        let source = JsonTraceFile::new("/nonexistent/trace.json");
        assert!(matches!(source.events(), Err(ParseError::Io(_))));
    }

    #[test]
    fn test_slice_source_borrows() {
        let events = vec![Event::new(EventKind::Unblock, 1)];
        let produced = events.events().unwrap();
        assert!(matches!(produced, Cow::Borrowed(_)));
    }
}
