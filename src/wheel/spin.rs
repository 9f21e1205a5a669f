use super::error::ConfigurationError;
use super::picker::rotation_for;
use super::{
    BASE_REVOLUTIONS, EASE_OUT_EXPONENT, EXTRA_REVOLUTIONS, FULL_TURN, MAX_REVOLUTIONS,
    MAX_STEP_DELAY_MS, MIN_STEP_DELAY_MS,
};
use rand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Settled,
}

/// Ease-out curve for the delay between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easing {
    pub exponent: f64,
}

impl Easing {
    pub const QUADRATIC: Self = Self { exponent: 2.0 };
    pub const QUARTIC: Self = Self { exponent: 4.0 };

    /// `min + floor((max - min) * (step / total)^exponent)`, in milliseconds.
    pub fn delay(&self, step: u32, total: u32, min: Duration, max: Duration) -> Duration {
        if total == 0 {
            return min;
        }
        let progress = (f64::from(step) / f64::from(total)).clamp(0.0, 1.0);
        let span = max.saturating_sub(min).as_millis() as f64;
        let extra = (span * progress.powf(self.exponent)).floor() as u64;
        min + Duration::from_millis(extra)
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self {
            exponent: EASE_OUT_EXPONENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTimings {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub easing: Easing,
    /// Full turns every spin makes at least.
    pub base_revolutions: usize,
    /// Upper bound on the random extra turns, drawn in whole slots.
    pub extra_revolutions: usize,
}

impl Default for SpinTimings {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(MIN_STEP_DELAY_MS),
            max_delay: Duration::from_millis(MAX_STEP_DELAY_MS),
            easing: Easing::default(),
            base_revolutions: BASE_REVOLUTIONS,
            extra_revolutions: EXTRA_REVOLUTIONS,
        }
    }
}

impl SpinTimings {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.min_delay > self.max_delay {
            return Err(ConfigurationError::InvalidDelays {
                min: self.min_delay.as_millis() as u64,
                max: self.max_delay.as_millis() as u64,
            });
        }
        let exponent = self.easing.exponent;
        if !(exponent > 0.0) || !exponent.is_finite() {
            return Err(ConfigurationError::InvalidExponent(exponent));
        }
        let turns = self
            .base_revolutions
            .checked_add(self.extra_revolutions)
            .filter(|&t| t <= MAX_REVOLUTIONS);
        if turns.is_none() {
            return Err(ConfigurationError::TooManyRevolutions {
                base: self.base_revolutions,
                extra: self.extra_revolutions,
                max: MAX_REVOLUTIONS,
            });
        }
        Ok(())
    }

    pub fn delay(&self, step: u32, total: u32) -> Duration {
        self.easing
            .delay(step, total, self.min_delay, self.max_delay)
    }
}

/// How far a spin goes and where it lands, fixed before the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinPlan {
    /// Displayable position that ends under the indicator.
    pub target: usize,
    /// Slots passed under the indicator.
    pub slots: usize,
    /// One-degree steps to take.
    pub total_steps: u32,
}

impl SpinPlan {
    /// Draws `slots = base * n + floor(extra * r * n)` and works out the target
    /// and the exact number of steps from `rotation` to that target's slot.
    pub fn draw<R: Rng + ?Sized>(
        n: usize,
        selected: usize,
        rotation: u16,
        timings: &SpinTimings,
        rng: &mut R,
    ) -> Self {
        let r: f64 = rng.random();
        let extra = (timings.extra_revolutions as f64 * r * n as f64).floor() as usize;
        Self::with_slots(
            n,
            selected,
            rotation,
            timings.base_revolutions.saturating_mul(n).saturating_add(extra),
        )
    }

    pub fn with_slots(n: usize, selected: usize, rotation: u16, slots: usize) -> Self {
        let n = n.max(1);
        let turn = i64::from(FULL_TURN);

        // every slot moves the indicator one item back
        let target = (selected % n + n - slots % n) % n;
        let remainder = (i64::from(rotation_for(target, n)) - i64::from(rotation)).rem_euclid(turn);
        // saturates for slot counts no validated timing can produce
        let total_steps = u32::try_from(slots / n)
            .unwrap_or(u32::MAX)
            .saturating_mul(u32::from(FULL_TURN))
            .saturating_add(remainder as u32);

        Self {
            target,
            slots,
            total_steps,
        }
    }
}

/// Identifies one chain of ticks. Ticks from an older chain are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpinToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Schedule the next tick after `delay`.
    Continue { delay: Duration },
    /// The spin is over; `index` is the displayable position under the indicator.
    Settled { index: usize },
    /// The token belongs to a spin that was restarted or cancelled.
    Stale,
}

#[derive(Debug, Default)]
pub struct SpinState {
    phase: SpinPhase,
    generation: u64,
    plan: Option<SpinPlan>,
    step: u32,
}

impl SpinState {
    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        self.plan.as_ref()
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Replaces any running spin. The previous token goes stale.
    pub fn start(&mut self, plan: SpinPlan) -> SpinToken {
        self.generation += 1;
        self.plan = Some(plan);
        self.step = 0;
        self.phase = SpinPhase::Spinning;
        SpinToken(self.generation)
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.plan = None;
        self.step = 0;
        self.phase = SpinPhase::Idle;
    }

    pub fn is_live(&self, token: SpinToken) -> bool {
        self.phase == SpinPhase::Spinning && token.0 == self.generation
    }

    /// Counts one step that has already been taken and painted.
    pub fn complete_step(&mut self, timings: &SpinTimings) -> Tick {
        let Some(plan) = self.plan else {
            return Tick::Stale;
        };

        self.step += 1;
        if self.step < plan.total_steps {
            Tick::Continue {
                delay: timings.delay(self.step, plan.total_steps),
            }
        } else {
            self.phase = SpinPhase::Settled;
            Tick::Settled { index: plan.target }
        }
    }
}
