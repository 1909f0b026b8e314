/// HTTP request runner for elevation providers.
///
/// Owns at most one outstanding GET at a time. The fetch runs on a small
/// worker pool so the event-loop thread never blocks; the outcome comes back
/// as an `Event::RequestFinished` message on the daemon channel.
///
/// Redirects are followed here rather than inside reqwest so the hop count
/// can be capped and each hop logged; the `Location` target is resolved
/// against the URL that issued it, covering both absolute and relative
/// targets.
///
/// Cancellation is supersession: `start` bumps the active attempt id, and a
/// completing worker checks its own id against the active one before
/// delivering. A superseded attempt's response is dropped on the worker
/// thread and never reaches the monitor.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Url;
use reqwest::header::LOCATION;
use reqwest::redirect;
use threadpool::ThreadPool;
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::model::{Event, FetchOutcome, HttpError};

/// Two workers: one for the live attempt, one spare so a superseded fetch
/// still waiting on its socket cannot delay the attempt that replaced it.
const FETCH_WORKERS: usize = 2;

pub struct RequestRunner {
    client: reqwest::blocking::Client,
    workers: ThreadPool,
    events: Sender<Event>,
    /// Id of the attempt whose outcome may still be delivered.
    active: Arc<AtomicU64>,
    next_attempt: u64,
    max_redirects: usize,
}

impl RequestRunner {
    pub fn new(config: &TransportConfig, events: Sender<Event>) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            workers: ThreadPool::new(FETCH_WORKERS),
            events,
            active: Arc::new(AtomicU64::new(0)),
            next_attempt: 0,
            max_redirects: config.max_redirects,
        })
    }

    /// Starts a GET for `url`, superseding any outstanding attempt, and
    /// returns the new attempt id. The caller does not block; the outcome
    /// arrives later on the event channel.
    pub fn start(&mut self, url: &str) -> u64 {
        self.next_attempt += 1;
        let attempt = self.next_attempt;
        self.active.store(attempt, Ordering::SeqCst);

        let client = self.client.clone();
        let events = self.events.clone();
        let active = Arc::clone(&self.active);
        let max_redirects = self.max_redirects;
        let url = url.to_string();
        let issued_at = Utc::now();

        self.workers.execute(move || {
            let started = Instant::now();
            let result = fetch_following_redirects(&client, &url, max_redirects);
            let elapsed = started.elapsed();

            if active.load(Ordering::SeqCst) != attempt {
                debug!(attempt, %url, "dropping response for superseded attempt");
                return;
            }

            let outcome = FetchOutcome {
                attempt,
                url,
                issued_at,
                result,
                elapsed,
            };
            if events.send(Event::RequestFinished(outcome)).is_err() {
                warn!(attempt, "event loop is gone; discarding response");
            }
        });

        attempt
    }
}

/// Issues the GET, re-issuing against resolved `Location` targets until a
/// non-redirect response arrives or the hop cap is exhausted.
fn fetch_following_redirects(
    client: &reqwest::blocking::Client,
    url: &str,
    max_redirects: usize,
) -> Result<String, HttpError> {
    let mut current = Url::parse(url).map_err(|e| HttpError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    // One initial request plus up to max_redirects follow-ups.
    for _ in 0..=max_redirects {
        let response = client.get(current.clone()).send()?;
        let status = response.status();

        if status.is_redirection() {
            let target = redirect_target(&response, &current)?;
            current = current
                .join(&target)
                .map_err(|e| HttpError::InvalidRedirect {
                    target,
                    reason: e.to_string(),
                })?;
            debug!(%status, next = %current, "following redirect");
            continue;
        }

        if !status.is_success() {
            return Err(HttpError::Status {
                status,
                url: current.to_string(),
            });
        }

        return Ok(response.text()?);
    }

    Err(HttpError::TooManyRedirects {
        limit: max_redirects,
    })
}

fn redirect_target(
    response: &reqwest::blocking::Response,
    current: &Url,
) -> Result<String, HttpError> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| HttpError::MissingLocation {
            url: current.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
