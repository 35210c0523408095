use tracing::{info, instrument, warn};

use crate::{
    session::{record::SessionRecord, slot::SlotStorage, store::SessionStore},
    utils::clock::Clock,
};

use super::{
    duration::SessionMinutes,
    notify::{Notifier, COMPLETION_BODY, COMPLETION_TITLE},
    state::{FinishedSession, SessionTimer, StopReason, Tick, TimerError},
};

/// How a session ended and what got stored for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStop {
    pub reason: StopReason,
    pub elapsed: u32,
    /// `None` when nothing was stored, either because no time elapsed or the write failed.
    pub record: Option<SessionRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Idle,
    Running(u32),
    Stopped(SessionStop),
}

/// Control surface of the timer. Binds [SessionTimer] to the store, so every session that stops
/// with time on it is recorded, and to the notifier for natural completions.
pub struct SessionController<S: SlotStorage> {
    timer: SessionTimer,
    store: SessionStore<S>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
}

impl<S: SlotStorage> SessionController<S> {
    pub fn new(store: SessionStore<S>, notifier: Box<dyn Notifier>, clock: Box<dyn Clock>) -> Self {
        Self {
            timer: SessionTimer::new(),
            store,
            notifier,
            clock,
        }
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Starts a session of `minutes` minutes. Invalid durations and starting while running are
    /// rejected without touching any state.
    pub fn start_timer(&mut self, minutes: i64) -> Result<u32, TimerError> {
        let minutes = SessionMinutes::try_from(minutes)
            .inspect_err(|e| warn!("Rejected session duration: {e}"))?;
        self.start_session(minutes)
    }

    pub fn start_session(&mut self, minutes: SessionMinutes) -> Result<u32, TimerError> {
        self.timer
            .start(minutes)
            .inspect(|_| info!("Started a {} minute session", minutes.minutes()))
            .inspect_err(|e| warn!("Can't start a session: {e}"))
    }

    pub async fn tick(&mut self) -> Progress {
        match self.timer.tick() {
            Tick::Idle => Progress::Idle,
            Tick::Running { remaining } => Progress::Running(remaining),
            Tick::Expired(finished) => Progress::Stopped(self.finish(finished).await),
        }
    }

    /// Stops the running session. Returns `None` if there was nothing to stop.
    pub async fn stop_timer(&mut self, reason: StopReason) -> Option<SessionStop> {
        let finished = self.timer.stop(reason)?;
        Some(self.finish(finished).await)
    }

    #[instrument(skip(self))]
    async fn finish(&mut self, finished: FinishedSession) -> SessionStop {
        info!("Session {}", finished.reason);
        let record = SessionRecord::new(self.clock.time(), finished.elapsed.into());
        let stored = self.store.add(record.clone()).await;

        if finished.reason == StopReason::Completed {
            if let Err(e) = self.notifier.notify(COMPLETION_TITLE, COMPLETION_BODY) {
                warn!("Failed to deliver notification {e:?}");
            }
        }

        SessionStop {
            reason: finished.reason,
            elapsed: finished.elapsed,
            record: stored.then_some(record),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use chrono::{DateTime, TimeZone, Utc};
    use mockall::predicate::{always, eq};

    use crate::{
        session::{slot::MemorySlot, store::SessionStore},
        timer::{
            duration::DurationError,
            notify::{MockNotifier, COMPLETION_TITLE},
            state::{StopReason, TimerError},
        },
        utils::{clock::FixedClock, logging::TEST_LOGGING},
    };

    use super::{Progress, SessionController};

    fn end_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 5, 10, 0, 0).unwrap()
    }

    fn controller(
        slot: Arc<MemorySlot>,
        notifier: MockNotifier,
    ) -> SessionController<Arc<MemorySlot>> {
        SessionController::new(
            SessionStore::new(slot),
            Box::new(notifier),
            Box::new(FixedClock(end_time())),
        )
    }

    fn silent() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        notifier
    }

    #[tokio::test]
    async fn test_controller_completed_session() {
        *TEST_LOGGING;
        let slot = Arc::new(MemorySlot::default());
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(COMPLETION_TITLE), always())
            .times(1)
            .returning(|_, _| Ok(()));
        let mut controller = controller(slot.clone(), notifier);

        assert_eq!(controller.start_timer(1), Ok(60));
        for _ in 0..59 {
            assert!(matches!(controller.tick().await, Progress::Running(_)));
        }
        let Progress::Stopped(stop) = controller.tick().await else {
            panic!("Session should have expired on the 60th tick");
        };

        assert_eq!(stop.reason, StopReason::Completed);
        assert_eq!(stop.elapsed, 60);
        let records = controller.store().all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_seconds, 60);
        assert_eq!(records[0].date, end_time());
        assert_eq!(stop.record.as_ref(), Some(&records[0]));
    }

    #[tokio::test]
    async fn test_controller_rejects_start_while_running() {
        let slot = Arc::new(MemorySlot::default());
        let mut controller = controller(slot, silent());

        controller.start_timer(1).unwrap();
        controller.tick().await;

        assert_eq!(controller.start_timer(1), Err(TimerError::AlreadyRunning));
        assert_eq!(controller.store().count().await, 0);
        // The original countdown is untouched.
        assert_eq!(controller.tick().await, Progress::Running(58));
    }

    #[tokio::test]
    async fn test_controller_rejects_invalid_duration() {
        let slot = Arc::new(MemorySlot::default());
        let mut controller = controller(slot.clone(), silent());

        for minutes in [0, -1, 241] {
            assert_eq!(
                controller.start_timer(minutes),
                Err(TimerError::InvalidDuration(DurationError::OutOfRange(minutes)))
            );
        }
        assert!(!controller.timer().is_running());
        assert_eq!(controller.tick().await, Progress::Idle);
        assert_eq!(slot.contents(), None);
    }

    #[tokio::test]
    async fn test_controller_user_ended_session() {
        let slot = Arc::new(MemorySlot::default());
        let mut controller = controller(slot, silent());

        controller.start_timer(2).unwrap();
        for _ in 0..30 {
            controller.tick().await;
        }
        let stop = controller.stop_timer(StopReason::UserEnded).await.unwrap();

        assert_eq!(stop.reason, StopReason::UserEnded);
        assert_eq!(stop.elapsed, 30);
        let records = controller.store().all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_seconds, 30);
    }

    #[tokio::test]
    async fn test_controller_immediate_stop_stores_nothing() {
        let slot = Arc::new(MemorySlot::default());
        let mut controller = controller(slot, silent());

        controller.start_timer(5).unwrap();
        let stop = controller.stop_timer(StopReason::UserEnded).await.unwrap();

        assert_eq!(stop.elapsed, 0);
        assert_eq!(stop.record, None);
        assert_eq!(controller.store().count().await, 0);
        assert_eq!(controller.stop_timer(StopReason::UserEnded).await, None);
    }

    #[tokio::test]
    async fn test_controller_notification_failure_still_records() {
        *TEST_LOGGING;
        let slot = Arc::new(MemorySlot::default());
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .times(1)
            .returning(|_, _| Err(anyhow!("notifications are denied")));
        let mut controller = controller(slot, notifier);

        controller.start_timer(1).unwrap();
        let mut last = Progress::Idle;
        for _ in 0..60 {
            last = controller.tick().await;
        }

        assert!(matches!(last, Progress::Stopped(ref stop) if stop.record.is_some()));
        assert_eq!(controller.store().count().await, 1);
    }
}
