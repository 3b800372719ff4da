//! Inbound conversation events.

/// An event delivered to the dispatcher for one requester.
///
/// The transport translates platform updates into these; the two command
/// variants are always available regardless of conversation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The start/reset command.
    Start,
    /// The cancel command.
    Cancel,
    /// A menu selection, carrying the choice token.
    Selection(String),
    /// A free-text message.
    Text(String),
}
