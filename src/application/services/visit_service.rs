//! Read side of the visit log: click counts and per-client history.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::VisitLog;
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

/// Queries over recorded visits.
pub struct VisitService {
    visits: Arc<dyn VisitRepository>,
}

impl VisitService {
    pub fn new(visits: Arc<dyn VisitRepository>) -> Self {
        Self { visits }
    }

    /// Number of recorded visits for a code. Unknown codes count zero.
    pub async fn click_count(&self, short_url: &str) -> Result<i64, AppError> {
        self.visits.count_by_short_url(short_url).await
    }

    /// All visits made from `client_ip`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the address has no visits.
    pub async fn visits_by_client(&self, client_ip: &str) -> Result<Vec<VisitLog>, AppError> {
        let visits = self.visits.find_by_client_ip(client_ip).await?;

        if visits.is_empty() {
            return Err(AppError::not_found(
                "No visit logs found for this client IP",
                json!({ "client_ip": client_ip }),
            ));
        }

        Ok(visits)
    }
}
