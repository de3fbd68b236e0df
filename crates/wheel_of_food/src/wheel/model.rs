use super::animation::SpinAnimation;
use super::theme;
use super::{
    FULL_TURN, MAX_EXTRA_TURNS, MAX_SPIN_DURATION, MIN_EXTRA_TURNS, MIN_SPIN_DURATION,
    POINTER_ANGLE,
};
use nearby::Restaurant;
use palette::Srgb;
use rand::Rng;
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct WheelSlice {
    pub restaurant: Restaurant,
    pub color: Srgb<u8>,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl WheelSlice {
    /// Equal contiguous slices in list order. The last one closes exactly at a full turn.
    pub fn build(restaurants: &[Restaurant]) -> Vec<Self> {
        let count = restaurants.len();
        let step = slice_angle(count);

        restaurants
            .iter()
            .enumerate()
            .map(|(i, restaurant)| Self {
                restaurant: restaurant.clone(),
                color: theme::slice_color(i),
                start_angle: i as f64 * step,
                end_angle: if i + 1 == count {
                    FULL_TURN
                } else {
                    (i + 1) as f64 * step
                },
            })
            .collect()
    }

    pub fn contains(&self, angle: f64) -> bool {
        let a = angle.rem_euclid(FULL_TURN);
        a >= self.start_angle && a < self.end_angle
    }
}

pub fn slice_angle(count: usize) -> f64 {
    if count == 0 {
        return FULL_TURN;
    }
    FULL_TURN / count as f64
}

/// Rotation that puts the centre of slice `winner` under the pointer: `extra_turns` full turns
/// past `current`, plus less than one more turn to align the slice.
pub fn target_rotation(current: f64, winner: usize, count: usize, extra_turns: u32) -> f64 {
    let step = slice_angle(count);
    let base = -(winner as f64 * step + step / 2.0) - FRAC_PI_2;
    let floor = current + f64::from(extra_turns) * FULL_TURN;
    floor + (base - current).rem_euclid(FULL_TURN)
}

/// Index of the slice under the pointer when the wheel is rotated by `rotation`.
pub fn pointer_index(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let angle = (POINTER_ANGLE - rotation).rem_euclid(FULL_TURN);
    let idx = (angle / slice_angle(count)).floor() as usize;
    Some(idx.min(count - 1))
}

/// What a spin will do, decided entirely before the animation starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    /// Distinguishes this spin from earlier and later ones on the same wheel.
    pub id: u64,
    pub winner: usize,
    pub duration: Duration,
    pub extra_turns: u32,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinTick {
    Frame { rotation: f64 },
    Finished { rotation: f64, winner: Restaurant },
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Spinning {
        plan: SpinPlan,
        animation: SpinAnimation,
    },
}

#[derive(Debug, Clone)]
pub struct Wheel {
    slices: Vec<WheelSlice>,
    rotation: f64,
    phase: Phase,
    spins: u64,
}

impl Wheel {
    pub fn new(restaurants: &[Restaurant]) -> Self {
        Self {
            slices: WheelSlice::build(restaurants),
            rotation: 0.0,
            phase: Phase::Idle,
            spins: 0,
        }
    }

    /// Rebuilds the slices. A spin in progress is abandoned without a result.
    pub fn set_restaurants(&mut self, restaurants: &[Restaurant]) {
        if self.cancel() {
            log::debug!("Wheel contents changed mid-spin; spin abandoned");
        }
        self.slices = WheelSlice::build(restaurants);
    }

    pub fn slices(&self) -> &[WheelSlice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, Phase::Spinning { .. })
    }

    pub fn plan(&self) -> Option<&SpinPlan> {
        match &self.phase {
            Phase::Spinning { plan, .. } => Some(plan),
            Phase::Idle => None,
        }
    }

    pub fn pointer_index(&self) -> Option<usize> {
        pointer_index(self.rotation, self.slices.len())
    }

    pub fn slice_under_pointer(&self) -> Option<&WheelSlice> {
        self.pointer_index().and_then(|i| self.slices.get(i))
    }

    /// Starts a spin. Does nothing while already spinning or when there is nothing to pick.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SpinPlan> {
        if self.is_spinning() || self.slices.is_empty() {
            return None;
        }

        let count = self.slices.len();
        let winner = rng.random_range(0..count);
        let extra_turns = rng.random_range(MIN_EXTRA_TURNS..=MAX_EXTRA_TURNS);
        let duration = Duration::from_millis(rng.random_range(
            MIN_SPIN_DURATION.as_millis() as u64..=MAX_SPIN_DURATION.as_millis() as u64,
        ));
        let target = target_rotation(self.rotation, winner, count, extra_turns);
        self.spins += 1;

        let plan = SpinPlan {
            id: self.spins,
            winner,
            duration,
            extra_turns,
            target,
        };
        log::debug!("Spin planned: {:?}", plan);

        self.phase = Phase::Spinning {
            animation: SpinAnimation::new(self.rotation, target, duration),
            plan: plan.clone(),
        };
        Some(plan)
    }

    /// Advances the spin to `elapsed` since it started. Returns `None` while idle.
    pub fn tick(&mut self, elapsed: Duration) -> Option<SpinTick> {
        let Phase::Spinning { plan, animation } = &self.phase else {
            return None;
        };

        self.rotation = animation.sample(elapsed);
        if !animation.is_finished(elapsed) {
            return Some(SpinTick::Frame {
                rotation: self.rotation,
            });
        }

        let winner = self.slices[plan.winner].restaurant.clone();
        self.phase = Phase::Idle;
        Some(SpinTick::Finished {
            rotation: self.rotation,
            winner,
        })
    }

    /// Stops a spin in progress; the wheel keeps its current rotation. Returns whether a
    /// spin was actually stopped.
    pub fn cancel(&mut self) -> bool {
        let was_spinning = self.is_spinning();
        self.phase = Phase::Idle;
        was_spinning
    }

    /// Like [`Wheel::cancel`], but only when spin `id` is the one in progress.
    pub fn cancel_spin(&mut self, id: u64) -> bool {
        if self.plan().is_some_and(|plan| plan.id == id) {
            self.cancel()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearby::{Coordinate, Cuisine, PlaceId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: PlaceId::from(id),
            name: format!("Place {id}"),
            cuisine: Cuisine::Other,
            types: Vec::new(),
            location: Coordinate::default(),
            rating: None,
            price_level: None,
            open_now: None,
            today_hours: None,
            distance_miles: 1.0,
        }
    }

    fn restaurants(n: usize) -> Vec<Restaurant> {
        (0..n).map(|i| restaurant(&i.to_string())).collect()
    }

    fn run_to_end(wheel: &mut Wheel) -> Restaurant {
        let duration = wheel.plan().unwrap().duration;
        let mut elapsed = Duration::ZERO;
        loop {
            match wheel.tick(elapsed) {
                Some(SpinTick::Frame { .. }) => elapsed += Duration::from_millis(16),
                Some(SpinTick::Finished { winner, .. }) => return winner,
                None => panic!("wheel went idle without a result"),
            }
            assert!(elapsed <= duration + Duration::from_millis(16));
        }
    }

    #[test]
    fn test_slices_partition_the_circle() {
        for n in 1..=20 {
            let slices = WheelSlice::build(&restaurants(n));
            assert_eq!(slices.len(), n);
            assert_eq!(slices[0].start_angle, 0.0);
            assert_eq!(slices[n - 1].end_angle, FULL_TURN);
            for pair in slices.windows(2) {
                assert_eq!(pair[0].end_angle, pair[1].start_angle);
            }
            for (i, slice) in slices.iter().enumerate() {
                assert_eq!(slice.restaurant.id.as_str(), i.to_string());
                assert!(slice.end_angle > slice.start_angle);
            }
        }
    }

    #[test]
    fn test_slice_colors_cycle() {
        let slices = WheelSlice::build(&restaurants(12));
        assert_eq!(slices[10].color, slices[0].color);
        assert_eq!(slices[11].color, slices[1].color);
        assert_ne!(slices[0].color, slices[1].color);
    }

    #[test]
    fn test_slice_contains() {
        let slices = WheelSlice::build(&restaurants(4));
        assert!(slices[0].contains(0.0));
        assert!(!slices[0].contains(FRAC_PI_2));
        assert!(slices[1].contains(FRAC_PI_2));
        assert!(slices[3].contains(-0.1));
    }

    #[test]
    fn test_target_lands_pointer_on_winner() {
        for count in 1..=20 {
            for winner in 0..count {
                for current in [0.0, 3.3, -12.0, 250.7] {
                    let target = target_rotation(current, winner, count, 5);
                    assert_eq!(pointer_index(target, count), Some(winner));
                    assert!(target >= current + 5.0 * FULL_TURN);
                    assert!(target <= current + 6.0 * FULL_TURN);
                }
            }
        }
    }

    #[test]
    fn test_target_never_short_of_extra_turns() {
        let mut current = 0.0;
        for step in 0..2000 {
            let count = step % 20 + 1;
            let winner = (step * 7) % count;
            let extra = 4 + (step % 2) as u32;
            let target = target_rotation(current, winner, count, extra);
            assert!(target >= current + f64::from(extra) * FULL_TURN, "step {step}");
            assert_eq!(pointer_index(target, count), Some(winner));
            current = target;
        }
    }

    #[test]
    fn test_spin_on_empty_wheel_is_noop() {
        let mut wheel = Wheel::new(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(wheel.spin(&mut rng).is_none());
        assert!(!wheel.is_spinning());
        assert!(wheel.tick(Duration::from_secs(10)).is_none());
        assert_eq!(wheel.rotation(), 0.0);
    }

    #[test]
    fn test_single_restaurant_always_wins() {
        let only = restaurants(1);
        let mut wheel = Wheel::new(&only);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5 {
            wheel.spin(&mut rng).unwrap();
            assert_eq!(run_to_end(&mut wheel), only[0]);
            assert!(!wheel.is_spinning());
        }
    }

    #[test]
    fn test_spin_plan_bounds() {
        let mut wheel = Wheel::new(&restaurants(7));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let start = wheel.rotation();
            let plan = wheel.spin(&mut rng).unwrap();
            assert!(plan.winner < 7);
            assert!((MIN_EXTRA_TURNS..=MAX_EXTRA_TURNS).contains(&plan.extra_turns));
            assert!(plan.duration >= MIN_SPIN_DURATION && plan.duration <= MAX_SPIN_DURATION);
            assert!(plan.target >= start + f64::from(plan.extra_turns) * FULL_TURN);
            let turns = (plan.target - start) / FULL_TURN;
            assert!((4.0..=6.0).contains(&turns), "turns {turns}");
            wheel.tick(plan.duration).unwrap();
        }
    }

    #[test]
    fn test_winner_is_fixed_and_under_pointer() {
        let list = restaurants(9);
        let mut wheel = Wheel::new(&list);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..10 {
            let plan = wheel.spin(&mut rng).unwrap();
            let winner = run_to_end(&mut wheel);
            assert_eq!(winner, list[plan.winner]);
            assert_eq!(wheel.rotation(), plan.target);
            assert_eq!(wheel.pointer_index(), Some(plan.winner));
        }
    }

    #[test]
    fn test_spin_while_spinning_is_noop() {
        let mut wheel = Wheel::new(&restaurants(3));
        let mut rng = StdRng::seed_from_u64(9);

        let plan = wheel.spin(&mut rng).unwrap();
        assert!(wheel.spin(&mut rng).is_none());
        assert_eq!(wheel.plan(), Some(&plan));
    }

    #[test]
    fn test_frames_move_towards_target() {
        let mut wheel = Wheel::new(&restaurants(5));
        let mut rng = StdRng::seed_from_u64(11);
        let plan = wheel.spin(&mut rng).unwrap();

        let half = plan.duration / 2;
        match wheel.tick(half) {
            Some(SpinTick::Frame { rotation }) => {
                assert!(rotation > 0.0 && rotation < plan.target);
                // ease-out: past the halfway point of the distance at half time
                assert!(rotation > plan.target / 2.0);
            }
            other => panic!("expected a frame, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_emits_nothing() {
        let mut wheel = Wheel::new(&restaurants(4));
        let mut rng = StdRng::seed_from_u64(5);
        let plan = wheel.spin(&mut rng).unwrap();
        wheel.tick(plan.duration / 3);
        let frozen = wheel.rotation();

        assert!(wheel.cancel());
        assert!(!wheel.cancel());
        assert!(wheel.tick(plan.duration).is_none());
        assert_eq!(wheel.rotation(), frozen);
    }

    #[test]
    fn test_cancel_spin_ignores_other_spins() {
        let mut wheel = Wheel::new(&restaurants(4));
        let mut rng = StdRng::seed_from_u64(5);

        let first = wheel.spin(&mut rng).unwrap();
        run_to_end(&mut wheel);
        let second = wheel.spin(&mut rng).unwrap();
        assert_ne!(first.id, second.id);

        assert!(!wheel.cancel_spin(first.id));
        assert!(wheel.is_spinning());
        assert!(wheel.cancel_spin(second.id));
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn test_set_restaurants_rebuilds_and_abandons_spin() {
        let mut wheel = Wheel::new(&restaurants(4));
        let mut rng = StdRng::seed_from_u64(5);
        wheel.spin(&mut rng).unwrap();

        wheel.set_restaurants(&restaurants(2));
        assert!(!wheel.is_spinning());
        assert_eq!(wheel.len(), 2);
        assert!(wheel.spin(&mut rng).unwrap().winner < 2);
    }
}
