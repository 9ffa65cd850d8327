//! The aggregation engine: one fetch→merge→notify cycle at a time.

use std::collections::HashSet;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alert_core::{
    now_ms, Alert, HazardSource, HazardType, Severity, SourceQuery, DEFAULT_COORDINATES,
};
use alert_store::{history, notified, Store};
use futures::future::join_all;
use regional_source::{NationalFeed, PacificFeed, ReliefFeed};
use seismic_source::SeismicSource;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};
use weather_source::WeatherSource;

use crate::dispatcher::NotificationDispatcher;
use crate::error::EngineError;
use crate::gateway::NotificationGateway;
use crate::preferences::PreferenceStore;
use crate::retry::RetryPolicy;
use crate::test_alert::build_test_alert;

/// Where the engine currently is in its cycle.
///
/// `Failed` is the resting state after a cycle exhausted its retry budget;
/// the next trigger moves it back through `Fetching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Fetching,
    Merging,
    Notifying,
    Failed,
}

/// Tunable engine constants.
///
/// The debounce and recency windows were inherited as informal constants;
/// they are configuration here, not invariants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum age of the last successful cycle before a non-forced trigger
    /// fetches again.
    pub debounce: Duration,
    /// Per-adapter deadline applied on top of whatever the adapter itself
    /// enforces.
    pub source_timeout: Duration,
    /// How fresh an event must be to notify about it.
    pub recency_window_ms: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(5 * 60),
            source_timeout: Duration::from_secs(12),
            recency_window_ms: 60 * 60 * 1000,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `AGGREGATOR_DEBOUNCE_SECS` - Debounce window (default: 300)
    /// - `AGGREGATOR_SOURCE_TIMEOUT_SECS` - Per-adapter deadline (default: 12)
    /// - `AGGREGATOR_RECENCY_WINDOW_SECS` - Notification freshness window
    ///   (default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let debounce = env::var("AGGREGATOR_DEBOUNCE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.debounce);

        let source_timeout = env::var("AGGREGATOR_SOURCE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.source_timeout);

        let recency_window_ms = env::var("AGGREGATOR_RECENCY_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .map(|secs| secs * 1000)
            .unwrap_or(defaults.recency_window_ms);

        Self {
            debounce,
            source_timeout,
            recency_window_ms,
        }
    }
}

/// Coordinates every aggregation cycle.
///
/// The engine owns the only mutable view of the current alert list, the
/// notification history, and the notified-id set. Consumers read copies;
/// the one cycle allowed in flight at a time is the only writer.
pub struct AggregationEngine<G: NotificationGateway> {
    sources: Vec<Arc<dyn HazardSource>>,
    preferences: PreferenceStore,
    store: Option<Store>,
    dispatcher: NotificationDispatcher<G>,
    retry: RetryPolicy,
    config: EngineConfig,

    alerts: RwLock<Vec<Alert>>,
    notification_history: RwLock<Vec<Alert>>,
    notified_ids: RwLock<HashSet<String>>,
    phase: RwLock<EnginePhase>,
    last_fetch_ms: RwLock<Option<i64>>,
    loading: AtomicBool,
    degraded: AtomicBool,

    /// Held for the duration of a cycle; a trigger that cannot take it
    /// immediately no-ops instead of queueing a duplicate cycle.
    cycle_lock: Mutex<()>,
}

impl<G: NotificationGateway> AggregationEngine<G> {
    /// Create an engine over the given sources.
    ///
    /// Sources are fetched in the order given; merge ties keep that order.
    pub fn new(sources: Vec<Arc<dyn HazardSource>>, gateway: G) -> Self {
        let config = EngineConfig::default();
        Self {
            sources,
            preferences: PreferenceStore::new(),
            store: None,
            dispatcher: NotificationDispatcher::with_recency_window(
                gateway,
                config.recency_window_ms,
            ),
            retry: RetryPolicy::default(),
            config,
            alerts: RwLock::new(Vec::new()),
            notification_history: RwLock::new(Vec::new()),
            notified_ids: RwLock::new(HashSet::new()),
            phase: RwLock::new(EnginePhase::Idle),
            last_fetch_ms: RwLock::new(None),
            loading: AtomicBool::new(false),
            degraded: AtomicBool::new(false),
            cycle_lock: Mutex::new(()),
        }
    }

    /// Create an engine with the standard feed set, configured from
    /// environment variables.
    ///
    /// The standard set is the seismic catalog, the weather feed, and the
    /// three regional feeds, in that order.
    pub fn from_env(gateway: G) -> Self {
        let sources: Vec<Arc<dyn HazardSource>> = vec![
            Arc::new(SeismicSource::from_env()),
            Arc::new(WeatherSource::from_env()),
            Arc::new(NationalFeed::new()),
            Arc::new(PacificFeed::new()),
            Arc::new(ReliefFeed::new()),
        ];
        Self::new(sources, gateway).with_config(EngineConfig::from_env())
    }

    /// Back the engine (and its preference cache) with a durable store.
    ///
    /// Call before [`Self::load`].
    pub fn with_store(mut self, store: Store) -> Self {
        self.preferences = PreferenceStore::with_store(store.clone());
        self.store = Some(store);
        self
    }

    /// Replace the engine configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.dispatcher.recency_window_ms = config.recency_window_ms;
        self.config = config;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Access the preference store, e.g. for a settings screen.
    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Load persisted state: preferences first, then the notified-id set
    /// and the notification history.
    ///
    /// Must complete before the first fetch. Startup reads are the one
    /// place a store failure propagates; afterwards the engine degrades
    /// instead of failing.
    pub async fn load(&self) -> Result<(), EngineError> {
        self.preferences.load().await;

        if let Some(store) = &self.store {
            let ids = notified::load_notified_ids(store.pool()).await?;
            debug!("Loaded {} notified id(s)", ids.len());
            *self.notified_ids.write().await = ids;

            let stored = history::list_history(store.pool()).await?;
            debug!("Loaded {} history entr(ies)", stored.len());
            *self.notification_history.write().await = stored;
        }

        Ok(())
    }

    /// Run an aggregation cycle for the given position, unless one is
    /// already in flight or the debounce window still covers the last one.
    pub async fn fetch_alerts(&self, latitude: f64, longitude: f64) {
        self.trigger(latitude, longitude, false).await;
    }

    /// Run an aggregation cycle now, bypassing the debounce. Still subject
    /// to the single-flight rule: a refresh during a running cycle no-ops.
    pub async fn refresh(&self, latitude: f64, longitude: f64) {
        self.trigger(latitude, longitude, true).await;
    }

    async fn trigger(&self, latitude: f64, longitude: f64, force: bool) {
        // Single-flight: the cycle in flight owns all shared state. A
        // concurrent trigger coalesces into its result by doing nothing.
        let Ok(_cycle) = self.cycle_lock.try_lock() else {
            debug!("Aggregation cycle already in flight, ignoring trigger");
            return;
        };

        if !force && !self.debounce_expired().await {
            debug!("Debounce window still open, skipping fetch");
            return;
        }

        self.degraded.store(false, Ordering::SeqCst);
        let (lat, lon) = self.sanitize_coordinates(latitude, longitude);

        self.loading.store(true, Ordering::SeqCst);

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.run_cycle(lat, lon).await {
                Ok(()) => {
                    self.set_phase(EnginePhase::Idle).await;
                    break;
                }
                Err(e) if self.retry.should_retry(attempts) => {
                    let delay = self.retry.delay_for_attempt(attempts - 1);
                    warn!(
                        "Aggregation cycle failed (attempt {}): {}; retrying in {:?}",
                        attempts, e, delay
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    error!(
                        "Aggregation cycle failed after {} attempts, keeping last-known list: {}",
                        attempts, e
                    );
                    self.degraded.store(true, Ordering::SeqCst);
                    self.set_phase(EnginePhase::Failed).await;
                    break;
                }
            }
        }

        self.loading.store(false, Ordering::SeqCst);
    }

    async fn run_cycle(&self, latitude: f64, longitude: f64) -> Result<(), EngineError> {
        self.set_phase(EnginePhase::Fetching).await;

        let prefs = self.preferences.get().await;
        let query = SourceQuery {
            latitude,
            longitude,
            radius_km: prefs.alert_radius_km,
            regional_only: prefs.regional_only,
        };

        let enabled: Vec<&Arc<dyn HazardSource>> = self
            .sources
            .iter()
            .filter(|s| s.enabled(&prefs))
            .collect();

        // All-complete barrier: a fast feed never drops a slow one's data.
        let results = join_all(enabled.iter().map(|source| async move {
            match timeout(self.config.source_timeout, source.fetch(&query)).await {
                Ok(alerts) => {
                    debug!("{} returned {} alert(s)", source.name(), alerts.len());
                    Some(alerts)
                }
                Err(_) => {
                    warn!("{} timed out after {:?}", source.name(), self.config.source_timeout);
                    None
                }
            }
        }))
        .await;

        if !results.is_empty() && results.iter().all(|r| r.is_none()) {
            return Err(EngineError::AllSourcesFailed);
        }

        self.set_phase(EnginePhase::Merging).await;

        let mut merged: Vec<Alert> = results.into_iter().flatten().flatten().collect();
        merged.retain(|a| !a.is_test && prefs.allows(a.hazard));
        if prefs.high_severity_only {
            merged.retain(|a| a.severity == Severity::High);
        }

        // Unique-id invariant across feeds; first feed wins.
        let mut seen = HashSet::new();
        merged.retain(|a| seen.insert(a.id.clone()));

        // Stable sort keeps feed order for equal timestamps.
        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        // Test alerts are never refetched, only carried forward, and always
        // lead the list.
        let mut next: Vec<Alert> = self
            .alerts
            .read()
            .await
            .iter()
            .filter(|a| a.is_test)
            .cloned()
            .collect();
        next.extend(merged);

        if prefs.notifications_enabled {
            self.set_phase(EnginePhase::Notifying).await;

            let mut notified_ids = self.notified_ids.write().await;
            let outcome = self
                .dispatcher
                .dispatch(&next, &mut notified_ids, self.store.as_ref(), now_ms())
                .await;
            drop(notified_ids);

            if !outcome.newly_notified.is_empty() {
                info!(
                    "Sent {} notification(s) covering {} alert(s)",
                    outcome.notifications_sent,
                    outcome.newly_notified.len()
                );
                let mut log = self.notification_history.write().await;
                for alert in outcome.newly_notified {
                    log.insert(0, alert);
                }
            }
        }

        *self.alerts.write().await = next;
        *self.last_fetch_ms.write().await = Some(now_ms());

        Ok(())
    }

    async fn debounce_expired(&self) -> bool {
        let Some(last) = *self.last_fetch_ms.read().await else {
            return true;
        };
        if self.alerts.read().await.is_empty() {
            return true;
        }
        now_ms() - last >= self.config.debounce.as_millis() as i64
    }

    /// Replace unusable coordinates with the fixed reference point rather
    /// than showing nothing; availability wins for a disaster-alert tool.
    fn sanitize_coordinates(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let usable = latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= 90.0
            && longitude.abs() <= 180.0;
        if usable {
            (latitude, longitude)
        } else {
            warn!(
                "Unusable coordinates ({}, {}); using reference location",
                latitude, longitude
            );
            self.degraded.store(true, Ordering::SeqCst);
            DEFAULT_COORDINATES
        }
    }

    async fn set_phase(&self, phase: EnginePhase) {
        *self.phase.write().await = phase;
    }

    /// Mark an alert in the current list as read. In-memory only; alerts
    /// themselves are never persisted.
    pub async fn mark_as_read(&self, alert_id: &str) {
        let mut alerts = self.alerts.write().await;
        if let Some(alert) = alerts.iter_mut().find(|a| a.id == alert_id) {
            alert.is_read = true;
        }
    }

    /// Inject a synthetic alert of the requested hazard type and notify for
    /// it immediately.
    ///
    /// The alert goes to the head of the live list and into the history
    /// (memory and store), but never touches the notified-id set. The list
    /// is updated even when the gateway rejects the send, so the error only
    /// reports the missing notification.
    pub async fn trigger_test_alert(&self, kind: &str) -> Result<Alert, EngineError> {
        let alert = build_test_alert(HazardType::parse(kind), now_ms());
        info!("Injecting test alert {}", alert.id);

        self.alerts.write().await.insert(0, alert.clone());
        self.notification_history.write().await.insert(0, alert.clone());

        if let Some(store) = &self.store {
            if let Err(e) = history::append_history(store.pool(), &alert).await {
                warn!("Failed to persist test alert history entry: {}", e);
            }
        }

        self.dispatcher.dispatch_test(&alert).await?;
        Ok(alert)
    }

    /// Clear the notification history, in memory and in the store.
    pub async fn clear_notification_history(&self) {
        self.notification_history.write().await.clear();

        if let Some(store) = &self.store {
            if let Err(e) = history::clear_history(store.pool()).await {
                warn!("Failed to clear persisted history: {}", e);
            }
        }
    }

    /// The current alert list: test alerts first, then newest first.
    pub async fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }

    /// The notification history, newest first.
    pub async fn notification_history(&self) -> Vec<Alert> {
        self.notification_history.read().await.clone()
    }

    /// Whether a cycle is currently running.
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Whether the engine substituted input or gave up on a cycle since the
    /// last successful full pass; drives the UI's degraded-data banner.
    pub fn degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Where the engine is in its cycle.
    pub async fn phase(&self) -> EnginePhase {
        *self.phase.read().await
    }

    /// Epoch milliseconds of the last successful cycle, for UI display.
    pub async fn last_fetch_ms(&self) -> Option<i64> {
        *self.last_fetch_ms.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        DispatchError, Notification, NotificationId, NotificationPayload, Permission,
    };
    use alert_core::{async_trait, Preferences};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;

    const BANGKOK: (f64, f64) = (13.7563, 100.5018);

    fn live_alert(id: &str, hazard: HazardType, severity: Severity, age_ms: i64) -> Alert {
        let now = now_ms();
        Alert {
            id: id.to_string(),
            title: format!("{} {}", hazard, id),
            description: "details".to_string(),
            hazard,
            severity,
            latitude: 14.2,
            longitude: 100.6,
            location: "Near Bangkok".to_string(),
            timestamp: now - age_ms,
            source: "test feed".to_string(),
            source_url: None,
            recommendations: None,
            magnitude: None,
            depth: None,
            is_read: false,
            is_test: false,
        }
    }

    /// Feed double returning a fixed list.
    struct StaticSource {
        name: &'static str,
        alerts: Vec<Alert>,
        fetches: AtomicUsize,
    }

    impl StaticSource {
        fn new(name: &'static str, alerts: Vec<Alert>) -> Arc<Self> {
            Arc::new(Self {
                name,
                alerts,
                fetches: AtomicUsize::new(0),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HazardSource for StaticSource {
        async fn fetch(&self, _query: &SourceQuery) -> Vec<Alert> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.alerts.clone()
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    /// Feed double gated by the weather category flag.
    struct WeatherGatedSource {
        inner: Arc<StaticSource>,
    }

    #[async_trait]
    impl HazardSource for WeatherGatedSource {
        async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
            self.inner.fetch(query).await
        }

        fn name(&self) -> &str {
            "WeatherGatedSource"
        }

        fn enabled(&self, preferences: &Preferences) -> bool {
            preferences.weather_alerts
        }
    }

    /// Feed double recording the queries it receives.
    #[derive(Default)]
    struct RecordingSource {
        queries: StdMutex<Vec<SourceQuery>>,
    }

    #[async_trait]
    impl HazardSource for RecordingSource {
        async fn fetch(&self, query: &SourceQuery) -> Vec<Alert> {
            self.queries.lock().unwrap().push(*query);
            Vec::new()
        }

        fn name(&self) -> &str {
            "RecordingSource"
        }
    }

    /// Feed double that never answers inside the engine's deadline.
    struct StalledSource;

    #[async_trait]
    impl HazardSource for StalledSource {
        async fn fetch(&self, _query: &SourceQuery) -> Vec<Alert> {
            sleep(Duration::from_secs(600)).await;
            Vec::new()
        }

        fn name(&self) -> &str {
            "StalledSource"
        }
    }

    /// Gateway double recording every send.
    #[derive(Default)]
    struct RecordingGateway {
        sent: StdMutex<Vec<Notification>>,
    }

    impl RecordingGateway {
        fn sent(&self) -> Vec<Notification> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationGateway for Arc<RecordingGateway> {
        async fn request_permission(&self) -> Permission {
            Permission::Granted
        }

        async fn send(&self, notification: Notification) -> Result<NotificationId, DispatchError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(notification);
            Ok(NotificationId(format!("rec-{}", sent.len())))
        }
    }

    fn engine_with(
        sources: Vec<Arc<dyn HazardSource>>,
    ) -> (AggregationEngine<Arc<RecordingGateway>>, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::default());
        (AggregationEngine::new(sources, gateway.clone()), gateway)
    }

    async fn memory_store() -> Store {
        let store = Store::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_end_to_end_single_high_severity_event() {
        // Preferences: earthquakes on, weather off, no severity filter,
        // 300 km radius. The seismic feed returns one M6.2 event 50 km out.
        let mut quake = live_alert("usgs-m62", HazardType::Earthquake, Severity::High, 60_000);
        quake.magnitude = Some(6.2);
        quake.latitude = 14.2;
        quake.longitude = 100.6;

        let seismic = StaticSource::new("seismic", vec![quake]);
        let weather = Arc::new(WeatherGatedSource {
            inner: StaticSource::new("weather", vec![live_alert(
                "weather-storm",
                HazardType::Storm,
                Severity::Medium,
                30_000,
            )]),
        });

        let (engine, gateway) = engine_with(vec![seismic, weather.clone()]);
        engine
            .preferences()
            .update(|p| {
                p.weather_alerts = false;
                p.alert_radius_km = 300.0;
            })
            .await;

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        // The weather feed never ran
        assert_eq!(weather.inner.fetch_count(), 0);

        // The merged list is exactly the quake
        let alerts = engine.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "usgs-m62");

        // Exactly one individual notification, one id tracked
        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].payload,
            NotificationPayload::Single {
                alert_id: "usgs-m62".to_string()
            }
        );
        assert_eq!(engine.notified_ids.read().await.len(), 1);
        assert_eq!(engine.notification_history().await.len(), 1);
        assert_eq!(engine.phase().await, EnginePhase::Idle);
        assert!(!engine.loading());
        assert!(!engine.degraded());
    }

    #[tokio::test]
    async fn test_invalid_coordinates_fall_back_to_reference_point() {
        let recording = Arc::new(RecordingSource::default());
        let (engine, _) = engine_with(vec![recording.clone()]);

        engine.fetch_alerts(f64::NAN, f64::NAN).await;

        let queries = recording.queries.lock().unwrap().clone();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].latitude, DEFAULT_COORDINATES.0);
        assert_eq!(queries[0].longitude, DEFAULT_COORDINATES.1);
        assert!(engine.degraded());
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_fall_back_too() {
        let recording = Arc::new(RecordingSource::default());
        let (engine, _) = engine_with(vec![recording.clone()]);

        engine.fetch_alerts(123.0, 500.0).await;

        let queries = recording.queries.lock().unwrap().clone();
        assert_eq!(queries[0].latitude, DEFAULT_COORDINATES.0);
    }

    #[tokio::test]
    async fn test_test_alert_stays_first_across_cycles() {
        let fresh = live_alert("new-quake", HazardType::Earthquake, Severity::Low, 1_000);
        let source = StaticSource::new("seismic", vec![fresh]);
        let (engine, _) = engine_with(vec![source]);

        engine.trigger_test_alert("flood").await.unwrap();
        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        engine.refresh(BANGKOK.0, BANGKOK.1).await;

        let alerts = engine.alerts().await;
        assert!(alerts[0].is_test);
        assert_eq!(alerts[0].hazard, HazardType::Flood);
        // The live alert follows the carried-forward test alert
        assert_eq!(alerts[1].id, "new-quake");
    }

    #[tokio::test]
    async fn test_high_severity_only_filters_merged_list() {
        let source = StaticSource::new(
            "mixed",
            vec![
                live_alert("hi", HazardType::Flood, Severity::High, 1_000),
                live_alert("med", HazardType::Flood, Severity::Medium, 1_000),
                live_alert("lo", HazardType::Flood, Severity::Low, 1_000),
            ],
        );
        let (engine, _) = engine_with(vec![source]);
        engine.preferences().update(|p| p.high_severity_only = true).await;

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        let alerts = engine.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert!(alerts.iter().all(|a| a.severity == Severity::High));
    }

    #[tokio::test]
    async fn test_disabled_categories_are_dropped_from_merge() {
        let source = StaticSource::new(
            "mixed",
            vec![
                live_alert("f", HazardType::Flood, Severity::Low, 1_000),
                live_alert("t", HazardType::Tsunami, Severity::Low, 1_000),
            ],
        );
        let (engine, _) = engine_with(vec![source]);
        engine.preferences().update(|p| p.flood_alerts = false).await;

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        let alerts = engine.alerts().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].hazard, HazardType::Tsunami);
    }

    #[tokio::test]
    async fn test_duplicate_ids_across_feeds_collapse() {
        let winner = live_alert("dup", HazardType::Storm, Severity::Low, 1_000);
        let a = StaticSource::new("first", vec![winner.clone()]);
        let b = StaticSource::new(
            "second",
            vec![live_alert("dup", HazardType::Storm, Severity::Low, 2_000)],
        );
        let (engine, _) = engine_with(vec![a, b]);

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        let alerts = engine.alerts().await;
        assert_eq!(alerts.len(), 1);
        // First feed wins the tie
        assert_eq!(alerts[0].timestamp, winner.timestamp);
    }

    #[tokio::test]
    async fn test_merge_orders_newest_first() {
        let source = StaticSource::new(
            "feed",
            vec![
                live_alert("older", HazardType::Flood, Severity::Low, 50_000),
                live_alert("newest", HazardType::Storm, Severity::Low, 1_000),
                live_alert("middle", HazardType::Drought, Severity::Low, 10_000),
            ],
        );
        let (engine, _) = engine_with(vec![source]);

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        let ids: Vec<_> = engine.alerts().await.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, ["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_debounce_skips_and_refresh_bypasses() {
        let source = StaticSource::new(
            "feed",
            vec![live_alert("a", HazardType::Flood, Severity::Low, 1_000)],
        );
        let (engine, _) = engine_with(vec![source.clone()]);

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        assert_eq!(source.fetch_count(), 1);

        engine.refresh(BANGKOK.0, BANGKOK.1).await;
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_notifications_disabled_sends_nothing() {
        let source = StaticSource::new(
            "feed",
            vec![live_alert("hi", HazardType::Flood, Severity::High, 1_000)],
        );
        let (engine, gateway) = engine_with(vec![source]);
        engine.preferences().update(|p| p.notifications_enabled = false).await;

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        assert!(gateway.sent().is_empty());
        assert!(engine.notification_history().await.is_empty());
        // The alert still shows in the list
        assert_eq!(engine.alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_sources_exhaust_retries_and_keep_last_list() {
        let good = StaticSource::new(
            "feed",
            vec![live_alert("keep", HazardType::Flood, Severity::Low, 1_000)],
        );
        let (engine, _) = engine_with(vec![good]);
        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        assert_eq!(engine.alerts().await.len(), 1);

        let stalled: Vec<Arc<dyn HazardSource>> = vec![Arc::new(StalledSource)];
        let gateway = Arc::new(RecordingGateway::default());
        let failing = AggregationEngine::new(stalled, gateway)
            .with_config(EngineConfig {
                source_timeout: Duration::from_millis(20),
                ..EngineConfig::default()
            })
            .with_retry_policy(RetryPolicy {
                max_attempts: 2,
                initial_delay: Duration::from_millis(1),
                ..RetryPolicy::default()
            });

        failing.fetch_alerts(BANGKOK.0, BANGKOK.1).await;

        assert_eq!(failing.phase().await, EnginePhase::Failed);
        assert!(failing.degraded());
        assert!(!failing.loading());
        assert!(failing.last_fetch_ms().await.is_none());
    }

    #[tokio::test]
    async fn test_mark_as_read_touches_memory_only() {
        let source = StaticSource::new(
            "feed",
            vec![live_alert("a", HazardType::Flood, Severity::Low, 1_000)],
        );
        let (engine, _) = engine_with(vec![source]);

        engine.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        engine.mark_as_read("a").await;

        assert!(engine.alerts().await[0].is_read);
        // Unknown ids are ignored
        engine.mark_as_read("missing").await;
    }

    #[tokio::test]
    async fn test_test_alert_never_touches_notified_set() {
        let (engine, gateway) = engine_with(vec![]);

        let alert = engine.trigger_test_alert("tsunami").await.unwrap();
        assert!(alert.is_test);

        assert!(engine.notified_ids.read().await.is_empty());
        assert_eq!(engine.notification_history().await.len(), 1);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].title.starts_with("🧪"));
    }

    #[tokio::test]
    async fn test_unknown_test_alert_kind_falls_back_to_earthquake() {
        let (engine, _) = engine_with(vec![]);
        let alert = engine.trigger_test_alert("meteor").await.unwrap();
        assert_eq!(alert.hazard, HazardType::Earthquake);
    }

    #[tokio::test]
    async fn test_clear_notification_history() {
        let store = memory_store().await;
        let gateway = Arc::new(RecordingGateway::default());
        let engine = AggregationEngine::new(vec![], gateway).with_store(store.clone());
        engine.load().await.unwrap();

        engine.trigger_test_alert("storm").await.unwrap();
        assert_eq!(engine.notification_history().await.len(), 1);
        assert_eq!(history::list_history(store.pool()).await.unwrap().len(), 1);

        engine.clear_notification_history().await;
        assert!(engine.notification_history().await.is_empty());
        assert!(history::list_history(store.pool()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notified_ids_survive_restart() {
        let store = memory_store().await;
        let source = || {
            StaticSource::new(
                "feed",
                vec![live_alert("hi", HazardType::Flood, Severity::High, 1_000)],
            )
        };

        let first_gateway = Arc::new(RecordingGateway::default());
        let first = AggregationEngine::new(vec![source()], first_gateway.clone())
            .with_store(store.clone());
        first.load().await.unwrap();
        first.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        assert_eq!(first_gateway.sent().len(), 1);

        // A fresh engine over the same store must not re-notify
        let second_gateway = Arc::new(RecordingGateway::default());
        let second = AggregationEngine::new(vec![source()], second_gateway.clone())
            .with_store(store.clone());
        second.load().await.unwrap();
        second.fetch_alerts(BANGKOK.0, BANGKOK.1).await;
        assert!(second_gateway.sent().is_empty());

        // History carried over from the first session
        assert_eq!(second.notification_history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_test_alerts_do_not_survive_restart() {
        let store = memory_store().await;

        let first = AggregationEngine::new(vec![], Arc::new(RecordingGateway::default()))
            .with_store(store.clone());
        first.load().await.unwrap();
        first.trigger_test_alert("volcano").await.unwrap();
        assert_eq!(first.alerts().await.len(), 1);

        // Session-scoped: the live list starts empty after a restart even
        // though the history keeps the record
        let second = AggregationEngine::new(vec![], Arc::new(RecordingGateway::default()))
            .with_store(store.clone());
        second.load().await.unwrap();
        assert!(second.alerts().await.is_empty());
        assert_eq!(second.notification_history().await.len(), 1);
    }
}
