use crate::events::WheelEvent;
use crate::surface::PresentationSurface;
use crate::wheel::{Tick, Wheel, WheelError};
use async_channel::Sender;
use rand::Rng;
use std::future::{self, Future};
use std::time::Duration;

/// Waits between spin steps. Swapped out in tests so a spin runs without real delays.
pub trait Timer {
    fn wait(&mut self, delay: Duration) -> impl Future<Output = ()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn wait(&mut self, delay: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(delay)
    }
}

/// Returns at once and remembers every delay it was asked for.
#[derive(Debug, Clone, Default)]
pub struct ImmediateTimer {
    pub delays: Vec<Duration>,
}

impl Timer for ImmediateTimer {
    fn wait(&mut self, delay: Duration) -> impl Future<Output = ()> {
        self.delays.push(delay);
        future::ready(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinResult {
    Settled(usize),
    Cancelled,
}

async fn publish(events: Option<&Sender<WheelEvent>>, event: WheelEvent) {
    if let Some(tx) = events
        && tx.send(event).await.is_err()
    {
        log::debug!("No one is listening for wheel events");
    }
}

/// Starts a spin and ticks it to the end, waiting on `timer` between steps.
pub async fn run_spin<T, S, R, M>(
    wheel: &mut Wheel<T, S, R>,
    timer: &mut M,
    events: Option<&Sender<WheelEvent>>,
) -> Result<SpinResult, WheelError>
where
    S: PresentationSurface,
    R: Rng,
    M: Timer,
{
    let token = wheel.spin();
    if let Some(plan) = wheel.spin_state().plan().copied() {
        publish(
            events,
            WheelEvent::SpinStarted {
                target: plan.target,
                total_steps: plan.total_steps,
            },
        )
        .await;
    }

    loop {
        match wheel.tick(token)? {
            Tick::Continue { delay } => timer.wait(delay).await,
            Tick::Settled { index } => {
                let label = wheel.label_of(index).unwrap_or_default();
                publish(events, WheelEvent::Settled { index, label }).await;
                return Ok(SpinResult::Settled(index));
            }
            Tick::Stale => {
                publish(events, WheelEvent::Cancelled).await;
                return Ok(SpinResult::Cancelled);
            }
        }
    }
}

/// Like [`run_spin`], but cancels the wheel as soon as `stop` completes.
pub async fn run_spin_until<T, S, R, M, F>(
    wheel: &mut Wheel<T, S, R>,
    timer: &mut M,
    events: Option<&Sender<WheelEvent>>,
    stop: F,
) -> Result<SpinResult, WheelError>
where
    S: PresentationSurface,
    R: Rng,
    M: Timer,
    F: Future<Output = ()>,
{
    let finished = tokio::select! {
        result = run_spin(wheel, timer, events) => Some(result),
        _ = stop => None,
    };

    match finished {
        Some(result) => result,
        None => {
            wheel.cancel();
            publish(events, WheelEvent::Cancelled).await;
            Ok(SpinResult::Cancelled)
        }
    }
}
