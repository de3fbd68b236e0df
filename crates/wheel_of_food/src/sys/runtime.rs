use crate::events::AppEvent;
use crate::wheel::{SpinPlan, SpinTick, Wheel};
use async_channel::Sender;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// A running spin. Cancelling it, or dropping it, stops the frame task and leaves the wheel
/// idle without emitting a result. Once this spin has finished, neither touches the wheel, so
/// an old handle cannot stop a newer spin.
pub struct SpinHandle {
    plan: SpinPlan,
    task: JoinHandle<()>,
    wheel: Arc<Mutex<Wheel>>,
}

impl SpinHandle {
    pub fn plan(&self) -> &SpinPlan {
        &self.plan
    }

    pub fn cancel(&mut self) -> bool {
        self.task.abort();
        self.wheel.lock().cancel_spin(self.plan.id)
    }
}

impl Drop for SpinHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts a spin and drives it on the tokio runtime, publishing a [`AppEvent::Frame`] per
/// display frame and a final [`AppEvent::SpinFinished`]. Returns `None` when the wheel refused
/// to spin (already spinning, or empty).
pub fn start_spin<R: Rng + ?Sized>(
    wheel: Arc<Mutex<Wheel>>,
    rng: &mut R,
    tx: Sender<AppEvent>,
) -> Option<SpinHandle> {
    let plan = wheel.lock().spin(rng)?;
    let task = tokio::spawn(drive(wheel.clone(), plan.id, tx, Instant::now()));
    Some(SpinHandle { plan, task, wheel })
}

async fn drive(wheel: Arc<Mutex<Wheel>>, id: u64, tx: Sender<AppEvent>, started: Instant) {
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        let event = {
            let mut wheel = wheel.lock();
            if wheel.plan().is_none_or(|plan| plan.id != id) {
                // cancelled, possibly replaced by a newer spin
                break;
            }
            match wheel.tick(started.elapsed()) {
                Some(SpinTick::Frame { rotation }) => AppEvent::Frame {
                    rotation,
                    pointer: wheel.pointer_index(),
                },
                Some(SpinTick::Finished { winner, .. }) => AppEvent::SpinFinished(winner),
                None => break,
            }
        };

        let finished = matches!(event, AppEvent::SpinFinished(_));
        if tx.send(event).await.is_err() {
            log::debug!("Event receiver gone; stopping spin");
            wheel.lock().cancel_spin(id);
            break;
        }
        if finished {
            break;
        }
    }
}
