//! Periodic background refresh of the dashboard statistics.
//!
//! Each tick is best effort: it is skipped when the window is hidden, when the
//! location is not a dashboard, or when the previous fetch is still running.
//! Failures are logged and the next tick simply tries again.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::SystemTime,
};

use tracing::{debug, warn};

use super::{
    kawadi::{ClientError, FetchMode, KawadiClient},
    markup::{extract_chart_data, extract_stat_cards},
};
use crate::domain::{is_dashboard_path, ChartData, StatCard};

/// Source of dashboard markup.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_background(&self, path: &str) -> Result<String, ClientError>;
}

impl PageSource for KawadiClient {
    async fn fetch_background(&self, path: &str) -> Result<String, ClientError> {
        self.fetch_page(path, FetchMode::Background)
            .await
            .map(|page| page.html)
    }
}

/// Whether the user can currently see the window.
#[allow(async_fn_in_trait)]
pub trait VisibilityProbe {
    async fn is_visible(&self) -> bool;
}

/// Fresh dashboard content parsed from one background fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSnapshot {
    pub cards: Vec<StatCard>,
    pub charts: ChartData,
    pub fetched_at: SystemTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Hidden,
    NotDashboard,
    InFlight,
}

#[derive(Debug)]
pub enum TickOutcome {
    Skipped(SkipReason),
    Refreshed(DashboardSnapshot),
    Failed(ClientError),
}

/// Shared "a refresh is running" flag.
#[derive(Clone, Debug, Default)]
pub struct RefreshGate {
    busy: Arc<AtomicBool>,
}

impl RefreshGate {
    fn try_enter(&self) -> Option<GateGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate when the fetch finishes or its task is dropped.
struct GateGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

pub struct DashboardRefresher<S, V> {
    source: S,
    visibility: V,
    gate: RefreshGate,
}

impl<S: PageSource, V: VisibilityProbe> DashboardRefresher<S, V> {
    pub fn new(source: S, visibility: V, gate: RefreshGate) -> Self {
        Self {
            source,
            visibility,
            gate,
        }
    }

    /// Runs one refresh attempt for `location`, the server path the user is
    /// currently looking at.
    pub async fn tick(&self, location: &str) -> TickOutcome {
        if !self.visibility.is_visible().await {
            debug!(event = "refresh.tick_skipped", reason = "hidden");
            return TickOutcome::Skipped(SkipReason::Hidden);
        }
        if !is_dashboard_path(location) {
            debug!(event = "refresh.tick_skipped", reason = "not_dashboard", location);
            return TickOutcome::Skipped(SkipReason::NotDashboard);
        }
        let Some(_guard) = self.gate.try_enter() else {
            debug!(event = "refresh.tick_skipped", reason = "in_flight");
            return TickOutcome::Skipped(SkipReason::InFlight);
        };

        match self.fetch_snapshot(location).await {
            Ok(snapshot) => {
                debug!(
                    event = "refresh.tick_completed",
                    location,
                    cards = snapshot.cards.len()
                );
                TickOutcome::Refreshed(snapshot)
            }
            Err(err) => {
                warn!(event = "refresh.tick_failed", location, error = %err);
                TickOutcome::Failed(err)
            }
        }
    }

    async fn fetch_snapshot(&self, location: &str) -> Result<DashboardSnapshot, ClientError> {
        let html = self.source.fetch_background(location).await?;
        Ok(parse_snapshot(&html, SystemTime::now())?)
    }
}

pub fn parse_snapshot(
    html: &str,
    fetched_at: SystemTime,
) -> Result<DashboardSnapshot, super::markup::MarkupError> {
    Ok(DashboardSnapshot {
        cards: extract_stat_cards(html)?,
        charts: extract_chart_data(html)?,
        fetched_at,
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use tokio::sync::Notify;

    use super::*;
    use crate::domain::{StatBoard, StatKey};

    const PAGE: &str = r#"
        <div class="card bg-primary"><h3>7</h3></div>
        <div class="card bg-warning"><h3>Rs. 40.00</h3></div>
    "#;

    struct FakeSource {
        calls: Rc<Cell<usize>>,
        gate: Option<Rc<Notify>>,
        fail: bool,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: Rc::new(Cell::new(0)),
                gate: None,
                fail: false,
            }
        }
    }

    impl PageSource for FakeSource {
        async fn fetch_background(&self, _path: &str) -> Result<String, ClientError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ClientError::InvalidUrl(url::ParseError::EmptyHost));
            }
            Ok(PAGE.to_string())
        }
    }

    struct FixedVisibility(bool);

    impl VisibilityProbe for FixedVisibility {
        async fn is_visible(&self) -> bool {
            self.0
        }
    }

    #[tokio::test]
    async fn hidden_window_issues_no_fetch() {
        let source = FakeSource::new();
        let calls = Rc::clone(&source.calls);
        let refresher =
            DashboardRefresher::new(source, FixedVisibility(false), RefreshGate::default());

        let outcome = refresher.tick("customer/").await;

        assert!(matches!(outcome, TickOutcome::Skipped(SkipReason::Hidden)));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn non_dashboard_location_is_skipped() {
        let source = FakeSource::new();
        let calls = Rc::clone(&source.calls);
        let refresher =
            DashboardRefresher::new(source, FixedVisibility(true), RefreshGate::default());

        let outcome = refresher.tick("request-pickup/").await;

        assert!(matches!(outcome, TickOutcome::Skipped(SkipReason::NotDashboard)));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn visible_dashboard_tick_patches_by_key() {
        let refresher =
            DashboardRefresher::new(FakeSource::new(), FixedVisibility(true), RefreshGate::default());

        let TickOutcome::Refreshed(snapshot) = refresher.tick("customer/").await else {
            panic!("expected a refreshed snapshot");
        };

        let mut board = StatBoard::from_cards([
            StatCard { key: StatKey::Primary, inner_html: "<h3>6</h3>".into() },
            StatCard { key: StatKey::Success, inner_html: "<h3>1</h3>".into() },
        ]);
        let changed = board.apply(snapshot.cards);

        assert_eq!(changed, vec![StatKey::Primary]);
        assert_eq!(board.get(StatKey::Primary).unwrap().inner_html, "<h3>7</h3>");
        assert_eq!(board.get(StatKey::Success).unwrap().inner_html, "<h3>1</h3>");
    }

    #[tokio::test]
    async fn overlapping_tick_is_skipped_while_fetch_in_flight() {
        let notify = Rc::new(Notify::new());
        let mut source = FakeSource::new();
        source.gate = Some(Rc::clone(&notify));
        let calls = Rc::clone(&source.calls);
        let gate = RefreshGate::default();
        let refresher = DashboardRefresher::new(source, FixedVisibility(true), gate.clone());

        let (first, second) = tokio::join!(refresher.tick("customer/"), async {
            tokio::task::yield_now().await;
            assert!(gate.is_busy());
            let outcome = refresher.tick("customer/").await;
            notify.notify_one();
            outcome
        });

        assert!(matches!(first, TickOutcome::Refreshed(_)));
        assert!(matches!(second, TickOutcome::Skipped(SkipReason::InFlight)));
        assert_eq!(calls.get(), 1);
        assert!(!gate.is_busy());
    }

    #[tokio::test]
    async fn failure_releases_gate_for_next_tick() {
        let mut source = FakeSource::new();
        source.fail = true;
        let gate = RefreshGate::default();
        let refresher = DashboardRefresher::new(source, FixedVisibility(true), gate.clone());

        assert!(matches!(refresher.tick("customer/").await, TickOutcome::Failed(_)));
        assert!(!gate.is_busy());
        assert!(matches!(refresher.tick("customer/").await, TickOutcome::Failed(_)));
    }
}
