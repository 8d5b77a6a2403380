use crate::error::ParseError;
use crate::model::ConversationEvent;

/// Parse a JSONL feed into events.
///
/// # Functional Core
/// Pure function - no I/O, just string parsing.
///
/// # Errors
/// Returns ParseError naming the first malformed line.
/// Skips empty lines gracefully.
pub fn parse_feed(content: &str) -> Result<Vec<ConversationEvent>, ParseError> {
    let mut events = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<ConversationEvent>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => {
                return Err(ParseError::Json(format!("line {}: {}", line_num + 1, e)));
            }
        }
    }

    Ok(events)
}

/// Parse a JSONL chunk, keeping every well-formed line.
///
/// Used on live tails where one bad line must not drop the rest of the batch.
pub fn parse_feed_lenient(content: &str) -> (Vec<ConversationEvent>, Vec<ParseError>) {
    let mut events = Vec::new();
    let mut errors = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<ConversationEvent>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => errors.push(ParseError::Json(format!("line {}: {}", line_num + 1, e))),
        }
    }

    (events, errors)
}

/// Serialize one event as a single JSONL line (trailing newline included).
pub fn to_feed_line(event: &ConversationEvent) -> Result<String, ParseError> {
    let mut line = serde_json::to_string(event).map_err(|e| ParseError::Json(e.to_string()))?;
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"
{"type":"human","id":"m0","content":"what is 6*7?"}
{"type":"ai","id":"m1","content":"","tool_calls":[{"id":"a1","name":"calc"}]}

{"type":"tool","id":"m2","tool_call_id":"a1","status":"success","content":"42"}
"#;

    #[test]
    fn parses_mixed_feed_skipping_blank_lines() {
        let events = parse_feed(FEED).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].kind_label(), "ai");
    }

    #[test]
    fn strict_parse_reports_line_number() {
        let content = "{\"type\":\"human\",\"id\":\"m0\",\"content\":\"hi\"}\n{broken\n";
        let err = parse_feed(content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(parse_feed(r#"{"type":"system","id":"s","content":"x"}"#).is_err());
    }

    #[test]
    fn lenient_parse_keeps_good_lines() {
        let content = "{broken\n{\"type\":\"human\",\"id\":\"m0\",\"content\":\"hi\"}\n";
        let (events, errors) = parse_feed_lenient(content);
        assert_eq!(events.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn feed_line_round_trips() {
        let event = parse_feed(FEED).unwrap().remove(2);
        let line = to_feed_line(&event).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(parse_feed(&line).unwrap(), vec![event]);
    }
}
