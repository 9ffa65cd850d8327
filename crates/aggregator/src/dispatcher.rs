//! Notification dispatch: candidate selection, grouping, and bookkeeping.

use std::collections::{BTreeMap, HashSet};

use alert_core::{Alert, HazardType, Severity};
use alert_store::{history, notified, Store};
use tracing::{debug, warn};

use crate::gateway::{
    DispatchError, Notification, NotificationGateway, NotificationId, NotificationPayload,
};

/// Default window within which an event is fresh enough to notify about.
/// Keeps a first run from re-announcing weeks of backfilled events.
pub const DEFAULT_RECENCY_WINDOW_MS: i64 = 60 * 60 * 1000;

/// What one dispatch pass did.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Number of notifications handed to the gateway.
    pub notifications_sent: usize,
    /// Alerts (pre-grouping) that were notified this pass, in dispatch
    /// order; these belong in the history log.
    pub newly_notified: Vec<Alert>,
}

/// Compares an aggregated alert list against the notified-id set and raises
/// at most one notification per alert, collapsing per-type bursts into one
/// grouped notification.
pub struct NotificationDispatcher<G> {
    gateway: G,
    pub(crate) recency_window_ms: i64,
}

impl<G: NotificationGateway> NotificationDispatcher<G> {
    /// Create a dispatcher with the default recency window.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            recency_window_ms: DEFAULT_RECENCY_WINDOW_MS,
        }
    }

    /// Create a dispatcher with a custom recency window.
    pub fn with_recency_window(gateway: G, recency_window_ms: i64) -> Self {
        Self {
            gateway,
            recency_window_ms,
        }
    }

    /// Get the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Select the alerts that warrant a notification.
    ///
    /// High severity, not synthetic, not already notified, and recent
    /// enough that the event is still actionable.
    fn candidates<'a>(
        &self,
        alerts: &'a [Alert],
        notified_ids: &HashSet<String>,
        now_ms: i64,
    ) -> Vec<&'a Alert> {
        alerts
            .iter()
            .filter(|a| {
                a.severity == Severity::High
                    && !a.is_test
                    && !notified_ids.contains(&a.id)
                    && a.is_recent(now_ms, self.recency_window_ms)
            })
            .collect()
    }

    /// Run one dispatch pass over the merged list.
    ///
    /// Each candidate's id lands in `notified_ids` (and the durable set,
    /// when a store is given) only after its notification was handed to the
    /// gateway; a gateway failure leaves the bucket eligible for the next
    /// cycle. Store failures are logged and skipped, trading a possible
    /// duplicate notification after a restart for never losing one.
    pub async fn dispatch(
        &self,
        alerts: &[Alert],
        notified_ids: &mut HashSet<String>,
        store: Option<&Store>,
        now_ms: i64,
    ) -> DispatchOutcome {
        let candidates = self.candidates(alerts, notified_ids, now_ms);
        if candidates.is_empty() {
            return DispatchOutcome::default();
        }

        debug!("{} alert(s) eligible for notification", candidates.len());

        // Bucket by hazard type; BTreeMap keeps dispatch order deterministic.
        let mut buckets: BTreeMap<HazardType, Vec<&Alert>> = BTreeMap::new();
        for alert in candidates {
            buckets.entry(alert.hazard).or_default().push(alert);
        }

        let mut outcome = DispatchOutcome::default();

        for (hazard, bucket) in buckets {
            let notification = if let [only] = bucket.as_slice() {
                Notification {
                    title: format!("🚨 {}", only.title),
                    body: only.description.clone(),
                    payload: NotificationPayload::Single {
                        alert_id: only.id.clone(),
                    },
                }
            } else {
                Notification {
                    title: format!("🚨 {} {} alerts", bucket.len(), hazard),
                    body: format!(
                        "{} high-severity {} alerts were detected near you. Open the app for details.",
                        bucket.len(),
                        hazard
                    ),
                    payload: NotificationPayload::Grouped {
                        alert_type: hazard,
                        count: bucket.len(),
                    },
                }
            };

            match self.gateway.send(notification).await {
                Ok(id) => {
                    debug!("Dispatched {} notification {}", hazard, id);
                    outcome.notifications_sent += 1;

                    for alert in bucket {
                        notified_ids.insert(alert.id.clone());
                        outcome.newly_notified.push(alert.clone());

                        if let Some(store) = store {
                            if let Err(e) = notified::mark_notified(store.pool(), &alert.id).await {
                                warn!("Failed to persist notified id {}: {}", alert.id, e);
                            }
                            if let Err(e) = history::append_history(store.pool(), alert).await {
                                warn!("Failed to append history for {}: {}", alert.id, e);
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to dispatch {} notification: {}", hazard, e);
                }
            }
        }

        outcome
    }

    /// Send a synthetic test alert immediately, bypassing candidate
    /// selection and the notified-id set entirely.
    pub async fn dispatch_test(&self, alert: &Alert) -> Result<NotificationId, DispatchError> {
        self.gateway
            .send(Notification {
                title: format!("🧪 {}", alert.title),
                body: alert.description.clone(),
                payload: NotificationPayload::Single {
                    alert_id: alert.id.clone(),
                },
            })
            .await
    }
}
