//! JSON acknowledgment returned instead of a redirect for API clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct RedirectAck {
    pub message: String,
    pub redirect_to: String,
    pub short_code: String,
    pub domain: String,
}
