//! Visit event model for asynchronous visit recording.

use chrono::{DateTime, Utc};

/// An in-memory representation of a successful redirect, handed from the
/// redirect handler to [`crate::domain::visit_worker::run_visit_worker`]
/// through a bounded channel.
///
/// The event is created only after the redirect decision is final, so a slow
/// or failing enrichment never affects the response.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub short_url: String,
    pub client_ip: String,
    pub user_agent: Option<String>,
    pub visited_at: DateTime<Utc>,
}

impl VisitEvent {
    /// Creates a new visit event stamped with the current time.
    pub fn new(short_url: String, client_ip: String, user_agent: Option<&str>) -> Self {
        Self {
            short_url,
            client_ip,
            user_agent: user_agent.map(|s| s.to_string()),
            visited_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_event_creation() {
        let event = VisitEvent::new(
            "ab1cd".to_string(),
            "203.0.113.7".to_string(),
            Some("Mozilla/5.0"),
        );

        assert_eq!(event.short_url, "ab1cd");
        assert_eq!(event.client_ip, "203.0.113.7");
        assert_eq!(event.user_agent, Some("Mozilla/5.0".to_string()));
        assert!(event.visited_at <= Utc::now());
    }

    #[test]
    fn test_visit_event_without_user_agent() {
        let event = VisitEvent::new("ab1cd".to_string(), "10.0.0.1".to_string(), None);
        assert!(event.user_agent.is_none());
    }
}
