//! Domain-specific assertion macros for chatsift harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! session whose structure is wrong.

/// Assert the structural invariants every `ParsedData` must hold:
/// `total_messages` equals the sum of session sizes, each session is sorted
/// ascending by timestamp, and no message has empty content.
#[macro_export]
macro_rules! assert_parsed_invariants {
    ($data:expr) => {{
        let data: &chatsift_core::ParsedData = &$data;
        let sum: usize = data.sessions.iter().map(|s| s.message_count()).sum();
        pretty_assertions::assert_eq!(
            data.total_messages, sum,
            "assert_parsed_invariants! failed: total_messages disagrees with session sizes"
        );
        for session in &data.sessions {
            let msgs = session.messages();
            if let Some(w) = msgs.windows(2).find(|w| w[0].timestamp > w[1].timestamp) {
                panic!(
                    "assert_parsed_invariants! failed: session {:?} out of order: {} > {}",
                    session.name, w[0].timestamp, w[1].timestamp
                );
            }
            if let Some(m) = msgs.iter().find(|m| m.content.is_empty()) {
                panic!(
                    "assert_parsed_invariants! failed: session {:?} has empty message {:?}",
                    session.name, m.id
                );
            }
        }
    }};
}

/// Assert session names in order.
///
/// ```rust
/// assert_session_names!(data, ["Amy", "Hiking"]);
/// ```
#[macro_export]
macro_rules! assert_session_names {
    ($data:expr, [$($name:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $data.sessions.iter().map(|s| s.name.as_str()).collect();
        let expected: Vec<&str> = vec![$($name),*];
        pretty_assertions::assert_eq!(actual, expected, "assert_session_names! failed");
    }};
}

/// Assert the contents of one session's messages, in order.
#[macro_export]
macro_rules! assert_contents {
    ($session:expr, [$($content:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $session.messages().iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<&str> = vec![$($content),*];
        pretty_assertions::assert_eq!(
            actual, expected,
            "assert_contents! failed for session {:?}", $session.name
        );
    }};
}
