use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of order operations the NLU front end can request.
///
/// The front end classifies each utterance and sends the intent's display
/// name in the webhook payload; anything outside this set is answered with
/// the fixed fallback reply and touches no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Merge items into the session's in-progress order
    AddToOrder,
    /// Take one unit of each named item out of the in-progress order
    RemoveFromOrder,
    /// Commit the in-progress order to the persistent store
    CompleteOrder,
    /// Look up the status of an already-placed order
    TrackOrder,
}

impl Intent {
    /// Parse an NLU intent display name. Matching is exact and
    /// case-sensitive; unknown names return `None`.
    pub fn from_display_name(name: &str) -> Option<Self> {
        match name {
            "order.add" => Some(Self::AddToOrder),
            "order.remove" => Some(Self::RemoveFromOrder),
            "order.complete" => Some(Self::CompleteOrder),
            "track.order" => Some(Self::TrackOrder),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::AddToOrder => "order.add",
            Self::RemoveFromOrder => "order.remove",
            Self::CompleteOrder => "order.complete",
            Self::TrackOrder => "track.order",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_four_known_intents() {
        assert_eq!(Intent::from_display_name("order.add"), Some(Intent::AddToOrder));
        assert_eq!(Intent::from_display_name("order.remove"), Some(Intent::RemoveFromOrder));
        assert_eq!(Intent::from_display_name("order.complete"), Some(Intent::CompleteOrder));
        assert_eq!(Intent::from_display_name("track.order"), Some(Intent::TrackOrder));
    }

    #[test]
    fn matching_is_case_sensitive_and_exact() {
        assert_eq!(Intent::from_display_name("Order.Add"), None);
        assert_eq!(Intent::from_display_name("order.add "), None);
        assert_eq!(Intent::from_display_name("order.cancel"), None);
        assert_eq!(Intent::from_display_name(""), None);
    }

    #[test]
    fn display_round_trips() {
        for intent in [
            Intent::AddToOrder,
            Intent::RemoveFromOrder,
            Intent::CompleteOrder,
            Intent::TrackOrder,
        ] {
            assert_eq!(Intent::from_display_name(intent.display_name()), Some(intent));
        }
    }
}
