//! Background worker that enriches and persists visit events.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::entities::{NewVisitLog, VisitLog};
use crate::domain::geo_locator::{GeoInfo, GeoLocator};
use crate::domain::repositories::VisitRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::utils::user_agent::parse_user_agent;

/// Number of store write retries after the first attempt.
const MAX_RETRIES: usize = 3;

/// Consumes visit events until every sender is dropped, then waits for the
/// visits still in flight before returning.
///
/// At most `concurrency` events are processed at once; each one runs in its
/// own task so a slow geolocation lookup only delays its own visit.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    visits: Arc<dyn VisitRepository>,
    geo: Arc<dyn GeoLocator>,
    concurrency: usize,
) {
    let permits = concurrency.clamp(1, u32::MAX as usize) as u32;
    let semaphore = Arc::new(Semaphore::new(permits as usize));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let visits = visits.clone();
        let geo = geo.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let short_url = event.short_url.clone();

            if let Err(e) = record_visit(event, visits.as_ref(), geo.as_ref()).await {
                warn!(short_url = %short_url, error = %e, "Dropping visit after retries");
            }
        });
    }

    // Every spawned task holds a permit until its visit is stored.
    if semaphore.acquire_many(permits).await.is_err() {
        warn!("Visit worker semaphore closed before draining");
    }

    info!("Visit worker stopped");
}

/// Enriches a single event and stores it, retrying transient store failures.
///
/// Geolocation failures are absorbed and replaced by [`GeoInfo::unknown`].
///
/// # Errors
///
/// Returns the last store error once retries are exhausted.
pub async fn record_visit(
    event: VisitEvent,
    visits: &dyn VisitRepository,
    geo: &dyn GeoLocator,
) -> Result<VisitLog, AppError> {
    let agent = parse_user_agent(event.user_agent.as_deref());

    let location = match geo.locate(&event.client_ip).await {
        Ok(location) => location,
        Err(e) => {
            debug!(ip = %event.client_ip, error = %e, "Geo lookup failed");
            GeoInfo::unknown()
        }
    };

    let new_visit = NewVisitLog {
        short_url: event.short_url,
        client_ip: event.client_ip,
        city: location.city,
        country: location.country,
        latitude: location.latitude,
        longitude: location.longitude,
        device: agent.device,
        os: agent.os,
        browser: agent.browser,
        visited_at: event.visited_at,
    };

    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(std::time::Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    Retry::start(strategy, move || visits.insert(new_visit.clone())).await
}
