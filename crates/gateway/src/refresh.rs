//! Single-flight session refresh.
//!
//! Any number of concurrent 401s collapse into one call to the renewal
//! endpoint. The first caller starts the call; everyone arriving while it is
//! outstanding awaits the same shared outcome.

use crate::events::SessionEvents;
use crate::{HttpRequest, Transport};
use futures::future::{BoxFuture, FutureExt, Shared};
use signals_core::TransportError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

type SharedOutcome = Shared<BoxFuture<'static, bool>>;

struct InFlight {
    generation: u64,
    outcome: SharedOutcome,
}

#[derive(Default)]
struct RefreshSlot {
    generation: u64,
    in_flight: Option<InFlight>,
}

/// Renews the session through the refresh endpoint, at most one call at a time.
///
/// The renewal runs on its own task: callers that stop waiting do not cancel
/// it, and its slot is cleared once it settles whatever the outcome.
pub struct SessionRefresher {
    transport: Arc<dyn Transport>,
    request: HttpRequest,
    timeout: Option<Duration>,
    events: Arc<SessionEvents>,
    slot: Arc<Mutex<RefreshSlot>>,
}

impl SessionRefresher {
    pub fn new(
        transport: Arc<dyn Transport>,
        request: HttpRequest,
        timeout: Option<Duration>,
        events: Arc<SessionEvents>,
    ) -> Self {
        Self {
            transport,
            request,
            timeout,
            events,
            slot: Arc::new(Mutex::new(RefreshSlot::default())),
        }
    }

    /// Returns `true` if the session was renewed.
    ///
    /// On refusal, session-expired subscribers have already been notified
    /// (once for the whole burst) by the time this resolves.
    pub async fn refresh(&self) -> bool {
        let outcome = {
            let mut slot = lock(&self.slot);
            match &slot.in_flight {
                Some(in_flight) => {
                    tracing::debug!(generation = in_flight.generation, "joining in-flight refresh");
                    in_flight.outcome.clone()
                }
                None => {
                    slot.generation += 1;
                    let generation = slot.generation;
                    let outcome = self.start(generation);
                    slot.in_flight = Some(InFlight {
                        generation,
                        outcome: outcome.clone(),
                    });
                    outcome
                }
            }
        };

        outcome.await
    }

    /// True while a renewal call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        lock(&self.slot).in_flight.is_some()
    }

    // The call is spawned on first poll, after the slot lock is released.
    fn start(&self, generation: u64) -> SharedOutcome {
        let transport = Arc::clone(&self.transport);
        let request = self.request.clone();
        let timeout = self.timeout;
        let events = Arc::clone(&self.events);
        let slot = Arc::clone(&self.slot);

        async move {
            tracing::info!(generation, url = %request.url, "refreshing session");

            let task = tokio::spawn(async move {
                let reset = ResetOnSettle { slot, generation };
                let renewed = probe(transport.as_ref(), request, timeout).await;
                drop(reset);

                if renewed {
                    tracing::info!(generation, "session renewed");
                } else {
                    tracing::warn!(generation, "session refresh refused, notifying subscribers");
                    events.notify();
                }
                renewed
            });

            match task.await {
                Ok(renewed) => renewed,
                Err(e) => {
                    tracing::warn!(error = %e, "refresh task did not complete");
                    false
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for SessionRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRefresher")
            .field("url", &self.request.url)
            .field("timeout", &self.timeout)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

/// Clears the slot when the renewal settles, including on panic or abort.
struct ResetOnSettle {
    slot: Arc<Mutex<RefreshSlot>>,
    generation: u64,
}

impl Drop for ResetOnSettle {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        if slot
            .in_flight
            .as_ref()
            .is_some_and(|f| f.generation == self.generation)
        {
            slot.in_flight = None;
        }
    }
}

/// Boolean renewal probe: any error or non-2xx is a refusal.
async fn probe(
    transport: &dyn Transport,
    request: HttpRequest,
    timeout: Option<Duration>,
) -> bool {
    let send = transport.send(request);
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, send)
            .await
            .unwrap_or(Err(TransportError::Timeout)),
        None => send.await,
    };

    match result {
        Ok(response) if response.is_success() => true,
        Ok(response) => {
            tracing::debug!(status = response.status, "refresh endpoint rejected session");
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "refresh call failed");
            false
        }
    }
}

fn lock(slot: &Mutex<RefreshSlot>) -> MutexGuard<'_, RefreshSlot> {
    // No code runs under this lock that can leave the slot half-written.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HttpResponse, Method};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Holds every call until released, then answers with `status`.
    struct GatedTransport {
        calls: AtomicUsize,
        release: Notify,
        status: u16,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(HttpResponse::new(self.status, Vec::new()))
        }
    }

    fn refresh_request() -> HttpRequest {
        HttpRequest {
            method: Method::POST,
            url: "http://test/auth/refresh".into(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn refresher(transport: Arc<dyn Transport>, timeout: Option<Duration>) -> SessionRefresher {
        SessionRefresher::new(transport, refresh_request(), timeout, SessionEvents::new())
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_call() {
        let transport = Arc::new(GatedTransport {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
            status: 200,
        });
        let refresher = refresher(transport.clone(), None);

        let waiters = async {
            futures::join!(refresher.refresh(), refresher.refresh(), refresher.refresh())
        };
        let release = async {
            while transport.calls.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
            assert!(refresher.is_refreshing());
            transport.release.notify_one();
        };

        let ((a, b, c), ()) = tokio::join!(waiters, release);
        assert!(a && b && c);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!(!refresher.is_refreshing());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_counts_as_refusal_and_resets() {
        let transport = Arc::new(GatedTransport {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
            status: 200,
        });
        let refresher = refresher(transport.clone(), Some(Duration::from_secs(5)));

        assert!(!refresher.refresh().await);
        assert!(!refresher.is_refreshing());

        // A later 401 starts a brand new call.
        assert!(!refresher.refresh().await);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }
}
