use super::{Circuit, Driver, Vehicle, VehicleOutcome};

/// Why a race loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RaceEnd {
    /// Every vehicle crashed or finished.
    AllInactive,
    /// The tick budget ran out with vehicles still driving.
    BudgetExhausted,
    /// The caller asked to stop between ticks.
    Interrupted,
}

/// Lockstep simulation of one generation of vehicles on a shared circuit.
///
/// Every vehicle is updated once per tick, in order, before the tick counter
/// advances. Vehicles never observe each other.
#[derive(Debug)]
pub struct Race<'a, D> {
    circuit: &'a Circuit,
    vehicles: Vec<Vehicle<D>>,
    tick: usize,
    tick_budget: usize,
}

impl<'a, D> Race<'a, D>
where
    D: Driver,
{
    /// Lines up one vehicle per driver at the circuit's start pose.
    pub fn new<I>(circuit: &'a Circuit, drivers: I, tick_budget: usize) -> Self
    where
        I: IntoIterator<Item = D>,
    {
        let vehicles = drivers
            .into_iter()
            .map(|driver| Vehicle::new(circuit, driver))
            .collect();
        Self {
            circuit,
            vehicles,
            tick: 0,
            tick_budget,
        }
    }

    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle<D>] {
        &self.vehicles
    }

    /// Ticks elapsed so far.
    #[must_use]
    pub fn tick(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn tick_budget(&self) -> usize {
        self.tick_budget
    }

    /// Number of vehicles still driving.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.status().is_alive())
            .count()
    }

    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.status().is_finished())
            .count()
    }

    /// Returns the reason the race is over, if it is.
    #[must_use]
    pub fn end(&self) -> Option<RaceEnd> {
        if self.alive_count() == 0 {
            Some(RaceEnd::AllInactive)
        } else if self.tick >= self.tick_budget {
            Some(RaceEnd::BudgetExhausted)
        } else {
            None
        }
    }

    /// Advances every vehicle by one tick. Does nothing once the race is over.
    pub fn step(&mut self) {
        if self.end().is_some() {
            return;
        }
        for vehicle in &mut self.vehicles {
            vehicle.update(self.circuit);
        }
        self.tick += 1;
    }

    /// Runs until the race is over or `should_stop` returns `true` between ticks.
    pub fn run<F>(&mut self, mut should_stop: F) -> RaceEnd
    where
        F: FnMut() -> bool,
    {
        loop {
            if let Some(end) = self.end() {
                tracing::debug!(
                    ?end,
                    tick = self.tick,
                    finished = self.finished_count(),
                    "race over"
                );
                return end;
            }
            if should_stop() {
                return RaceEnd::Interrupted;
            }
            self.step();
        }
    }

    /// Snapshot of every vehicle's state, in lineup order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<VehicleOutcome> {
        self.vehicles.iter().map(Vehicle::outcome).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        SensorReadings,
        core::{TrackLayout, TrackMask, Vec2},
        engine::{CrashCause, VehicleParams, VehicleStatus},
    };

    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Constant(f32);

    impl Driver for Constant {
        fn steer(&self, _readings: &SensorReadings) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_identical_drivers_identical_outcomes() {
        let circuit = Circuit::new(&TrackLayout::default(), VehicleParams::default()).unwrap();
        let mut race = Race::new(&circuit, [Constant(0.0); 4], 500);
        race.run(|| false);
        let outcomes = race.outcomes();
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_race_ends_when_everyone_crashed() {
        // driving straight off the default start leaves the road quickly
        let circuit = Circuit::new(&TrackLayout::default(), VehicleParams::default()).unwrap();
        let mut race = Race::new(&circuit, [Constant(0.0), Constant(0.0)], 2000);
        let end = race.run(|| false);
        assert_eq!(end, RaceEnd::AllInactive);
        assert!(race.tick() < 2000);
        assert!(
            race.vehicles()
                .iter()
                .all(|v| v.status() == VehicleStatus::Crashed(CrashCause::Collision))
        );
    }

    #[test]
    fn test_race_respects_budget() {
        let mask = TrackMask::from_fn(2000, 2000, |_, _| true);
        let params = VehicleParams {
            start_position: Vec2::new(1000.0, 200.0),
            start_heading: 0.0,
            speed: 1.0,
            ..VehicleParams::default()
        };
        let circuit = Circuit::with_mask(mask, Vec2::new(1000.0, 1000.0), params).unwrap();
        let mut race = Race::new(&circuit, [Constant(0.0)], 25);
        assert_eq!(race.run(|| false), RaceEnd::BudgetExhausted);
        assert_eq!(race.tick(), 25);
        assert_eq!(race.outcomes()[0].ticks_alive, 25);

        // stepping a finished race is a no-op
        race.step();
        assert_eq!(race.tick(), 25);
    }

    #[test]
    fn test_race_can_be_interrupted() {
        let circuit = Circuit::new(&TrackLayout::default(), VehicleParams::default()).unwrap();
        let mut race = Race::new(&circuit, [Constant(0.0)], 2000);
        let mut calls = 0;
        let end = race.run(|| {
            calls += 1;
            calls > 3
        });
        assert_eq!(end, RaceEnd::Interrupted);
        assert_eq!(race.tick(), 3);
    }

    #[test]
    fn test_empty_race_is_over() {
        let circuit = Circuit::new(&TrackLayout::default(), VehicleParams::default()).unwrap();
        let mut race = Race::new(&circuit, Vec::<Constant>::new(), 10);
        assert_eq!(race.run(|| false), RaceEnd::AllInactive);
        assert_eq!(race.tick(), 0);
    }
}
