//! Chat state: the message log, the per-user aggregate, avatar colors and
//! the snapshot codec that persists both halves.

use serde::{Deserialize, Serialize};

pub mod avatar;
pub mod codec;
pub mod stats;
pub mod store;

/// Name substituted when a post arrives with an empty display name.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";
/// Author of the seeded welcome message. Reserved: user posts under this
/// name are recorded as [`ANONYMOUS_USERNAME`].
pub const SYSTEM_USERNAME: &str = "System";
pub const WELCOME_TEXT: &str = "Welcome to the chat!";

/// `HH:MM:SS`, local wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub username: String,
    pub text: String,
    pub timestamp: String,
}

pub trait Clock {
    fn timestamp(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Append-only, chronological log of accepted messages.
pub struct MessageStore {
    messages: Vec<Message>,
    clock: Box<dyn Clock>,
}

impl MessageStore {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            messages: Vec::new(),
            clock,
        }
    }

    /// Accept a post and append it to the tail of the log.
    ///
    /// Returns `None` without touching the log when `text` is blank. An empty
    /// or reserved `username` is recorded as [`ANONYMOUS_USERNAME`].
    pub fn post(&mut self, username: &str, text: &str) -> Option<Message> {
        let username = match username.trim() {
            "" | SYSTEM_USERNAME => ANONYMOUS_USERNAME,
            name => name,
        };
        self.append(username, text)
    }

    /// Post under [`SYSTEM_USERNAME`]; only the welcome seed goes through here.
    pub fn post_system(&mut self, text: &str) -> Option<Message> {
        self.append(SYSTEM_USERNAME, text)
    }

    fn append(&mut self, username: &str, text: &str) -> Option<Message> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let message = Message {
            username: username.to_string(),
            text: text.to_string(),
            timestamp: self.clock.timestamp(),
        };
        self.messages.push(message.clone());
        Some(message)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Swap in a log loaded from a snapshot.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that returns `00:00:NN`, advancing one second per call.
    #[derive(Clone, Default)]
    pub struct StepClock {
        ticks: Rc<Cell<u32>>,
    }

    impl Clock for StepClock {
        fn timestamp(&self) -> String {
            let tick = self.ticks.get();
            self.ticks.set(tick + 1);
            format!("00:{:02}:{:02}", (tick / 60) % 60, tick % 60)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StepClock;
    use super::*;

    fn store() -> MessageStore {
        MessageStore::new(Box::new(StepClock::default()))
    }

    #[test]
    fn post_appends_in_chronological_order() {
        let mut store = store();
        store.post("Alice", "first").expect("non-empty post should be accepted");
        store.post("Bob", "second").expect("non-empty post should be accepted");

        let texts: Vec<&str> = store.all().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert_eq!(store.all()[0].timestamp, "00:00:00");
        assert_eq!(store.all()[1].timestamp, "00:00:01");
    }

    #[test]
    fn post_rejects_blank_text() {
        let mut store = store();
        assert!(store.post("Alice", "").is_none());
        assert!(store.post("Alice", "   \t\n").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn post_substitutes_anonymous_for_empty_name() {
        let mut store = store();
        let message = store.post("", "hello").expect("post should be accepted");
        assert_eq!(message.username, ANONYMOUS_USERNAME);

        let message = store.post("  ", "again").expect("post should be accepted");
        assert_eq!(message.username, ANONYMOUS_USERNAME);
    }

    #[test]
    fn post_reserves_system_name() {
        let mut store = store();
        let message = store.post(" System ", "not the system").expect("post should be accepted");
        assert_eq!(message.username, ANONYMOUS_USERNAME);

        let welcome = store.post_system(WELCOME_TEXT).expect("welcome should be accepted");
        assert_eq!(welcome.username, SYSTEM_USERNAME);
        assert!(store.post_system("  ").is_none());
    }

    #[test]
    fn post_trims_surrounding_whitespace() {
        let mut store = store();
        let message = store.post(" Alice ", "  hi there  ").expect("post should be accepted");
        assert_eq!(message.username, "Alice");
        assert_eq!(message.text, "hi there");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut store = store();
        store.post("Alice", "hello");
        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn system_clock_uses_hh_mm_ss() {
        let stamp = SystemClock.timestamp();
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.as_bytes()[2], b':');
        assert_eq!(stamp.as_bytes()[5], b':');
    }
}
