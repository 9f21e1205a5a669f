#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    SpinStarted { target: usize, total_steps: u32 },
    Settled { index: usize, label: String },
    Cancelled,
}
