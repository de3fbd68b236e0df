use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

pub mod animation;
pub mod model;
pub mod theme;
pub mod view;

pub use animation::{SpinAnimation, ease_out_cubic};
pub use model::{SpinPlan, SpinTick, Wheel, WheelSlice};
pub use theme::WHEEL_COLORS;

pub const FULL_TURN: f64 = TAU;
pub const POINTER_ANGLE: f64 = -FRAC_PI_2; // pointer sits at the top
pub const MIN_SPIN_DURATION: Duration = Duration::from_millis(3000);
pub const MAX_SPIN_DURATION: Duration = Duration::from_millis(5000);
pub const MIN_EXTRA_TURNS: u32 = 4;
/// The slice alignment adds up to one more turn, so a spin covers 4 to 6 turns in total.
pub const MAX_EXTRA_TURNS: u32 = 5;
pub const LABEL_MAX_CHARS: usize = 18;
