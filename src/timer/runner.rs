use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::session::slot::SlotStorage;

use super::{
    controller::{Progress, SessionController, SessionStop},
    duration::SessionMinutes,
    state::{StopReason, TimerError},
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Runs one session from start to end, ticking the controller once per second. `on_tick` gets the
/// remaining seconds right after the start and after every tick.
///
/// Cancelling `shutdown` ends the session as [StopReason::UserEnded]. Cancellation is checked
/// before every tick, so no tick is applied once it has been observed.
pub async fn run_session<S: SlotStorage>(
    controller: &mut SessionController<S>,
    minutes: SessionMinutes,
    shutdown: CancellationToken,
    mut on_tick: impl FnMut(u32),
) -> Result<SessionStop, TimerError> {
    let remaining = controller.start_session(minutes)?;
    on_tick(remaining);

    // Ticks follow a fixed schedule so slow iterations don't make the countdown drift.
    let mut next_tick = controller.clock().instant();
    loop {
        next_tick += TICK_INTERVAL;

        let interrupted = tokio::select! {
            biased;
            _ = shutdown.cancelled() => true,
            _ = controller.clock().sleep_until(next_tick) => false,
        };

        if interrupted {
            info!("Session interrupted");
            return controller
                .stop_timer(StopReason::UserEnded)
                .await
                .ok_or(TimerError::NotRunning);
        }

        match controller.tick().await {
            Progress::Running(remaining) => {
                debug!("{remaining} seconds remaining");
                on_tick(remaining)
            }
            Progress::Stopped(stop) => {
                on_tick(0);
                return Ok(stop);
            }
            Progress::Idle => return Err(TimerError::NotRunning),
        }
    }
}
