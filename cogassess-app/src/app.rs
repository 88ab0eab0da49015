use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cogassess_cache::asset_count;
use cogassess_experiment::{AssessmentError, AssessmentStateMachine, SessionConfig};
use cogassess_timing::{Clock, MonotonicClock, TickRecorder, TickStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

pub type Machine<C = MonotonicClock> = AssessmentStateMachine<C, StdRng>;

/// One participant's session. Each is locked on its own, so a slow request on
/// one session never stalls another.
pub struct Session<C: Clock = MonotonicClock> {
    pub machine: Machine<C>,
}

pub type SharedSession<C = MonotonicClock> = Arc<Mutex<Session<C>>>;

/// Every session shares `clock`.
pub struct AppState<C: Clock = MonotonicClock> {
    pub config: SessionConfig,
    pub clock: C,
    sessions: RwLock<HashMap<String, SharedSession<C>>>,
    seeds: Mutex<StdRng>,
    ticks: Mutex<TickRecorder>,
}

impl AppState<MonotonicClock> {
    pub fn new(config: SessionConfig, seed: Option<u64>) -> Result<Self, AssessmentError> {
        Self::with_clock(config, MonotonicClock::new(), seed)
    }
}

impl<C: Clock> AppState<C> {
    /// Builds one throwaway session so a bad config or a short trial pool
    /// fails at startup rather than on the first participant.
    pub fn with_clock(
        config: SessionConfig,
        clock: C,
        seed: Option<u64>,
    ) -> Result<Self, AssessmentError> {
        AssessmentStateMachine::new(config.clone(), clock.clone(), StdRng::seed_from_u64(0))?;
        info!(assets = asset_count(), "stimulus assets registered");

        let seeds = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            clock,
            sessions: RwLock::new(HashMap::new()),
            seeds: Mutex::new(seeds),
            ticks: Mutex::new(TickRecorder::default()),
        })
    }

    pub async fn create_session(&self) -> Result<String, AssessmentError> {
        let (id, session_seed) = {
            let mut rng = self.seeds.lock().await;
            (format!("session_{:016x}", rng.random::<u64>()), rng.random::<u64>())
        };
        let machine = AssessmentStateMachine::new(
            self.config.clone(),
            self.clock.clone(),
            StdRng::seed_from_u64(session_seed),
        )?;
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(Session { machine })));
        info!(session = %id, "session created");
        Ok(id)
    }

    pub async fn session(&self, id: &str) -> Option<SharedSession<C>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Abandons a session. Nothing is flushed.
    pub async fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session = %id, "session closed");
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Observes every unfinished session once so deadlines and time gates fire
    /// without waiting for the participant's next request.
    pub async fn tick_all(&self) {
        let sessions: Vec<(String, SharedSession<C>)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, s)| (id.clone(), Arc::clone(s)))
            .collect();

        for (id, session) in sessions {
            let mut session = session.lock().await;
            if session.machine.is_complete() {
                continue;
            }
            if let Err(e) = session.machine.observe() {
                warn!(session = %id, error = %e, "tick failed");
            }
        }
    }

    pub async fn record_tick(&self, interval: Duration) {
        self.ticks.lock().await.record(interval);
    }

    pub async fn tick_stats(&self) -> TickStats {
        self.ticks.lock().await.stats()
    }
}

/// Ticks all sessions at the configured cadence. The tick interval is the
/// upper bound on how late a timeout is noticed for an idle participant.
pub fn spawn_ticker<C: Clock + 'static>(state: Arc<AppState<C>>) -> JoinHandle<()> {
    let period = state.config.tick_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();
        debug!(period_ms = period.as_millis() as u64, "ticker started");
        loop {
            interval.tick().await;
            let now = Instant::now();
            state.record_tick(now - last).await;
            last = now;
            state.tick_all().await;
        }
    })
}
