use serde::{Deserialize, Serialize};

use crate::{
    TrackError,
    core::{Vec2, wrap_angle},
};

use super::{Circuit, RayHit, SENSOR_COUNT, SensorParams, SensorReadings};

const DEFAULT_START_POSITION: Vec2 = Vec2::new(150.0, 150.0);
const DEFAULT_START_HEADING: f32 = -10.0;
const DEFAULT_SPEED: f32 = 6.0;
const DEFAULT_SCALE: f32 = 1.5;
const DEFAULT_NOSE_OFFSET: f32 = 10.0;

const DEFAULT_COLLISION_READING: f32 = 5.0;
// The three thresholds below are calibrated for the default track shape.
const DEFAULT_WRONG_WAY_PROGRESS: f32 = -0.2;
const DEFAULT_FINISH_PROGRESS: f32 = 12.5;
const DEFAULT_SPIN_MIN_DISTANCE: f32 = 400.0;
const DEFAULT_SPIN_LIMIT: f32 = 360.0;
const DEFAULT_WRONG_WAY_PENALTY: f32 = -5.0;
const DEFAULT_SPIN_PENALTY: f32 = -2.0;

/// Chooses a steering delta from sensor readings.
pub trait Driver {
    /// Returns the heading change for this tick, in degrees.
    fn steer(&self, readings: &SensorReadings) -> f32;
}

impl<D> Driver for &D
where
    D: Driver + ?Sized,
{
    fn steer(&self, readings: &SensorReadings) -> f32 {
        (**self).steer(readings)
    }
}

/// Start pose, kinematics and elimination rules shared by all vehicles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    pub start_position: Vec2,
    /// Start heading in degrees.
    pub start_heading: f32,
    /// Distance covered per tick.
    pub speed: f32,
    pub scale: f32,
    /// Distance from the vehicle center to its sensors, before scaling.
    pub nose_offset: f32,
    pub sensors: SensorParams,
    /// Any normalized reading below this is a collision.
    pub collision_reading: f32,
    /// Net angular progress (radians) below which the vehicle is driving the wrong way.
    pub wrong_way_progress: f32,
    /// Progress forced onto wrong-way vehicles.
    pub wrong_way_penalty: f32,
    /// Angular progress (radians) needed to finish.
    pub finish_progress: f32,
    /// Accumulated turning (degrees) that triggers a spin check.
    pub spin_limit: f32,
    /// Minimum distance that must be covered between spin checks.
    pub spin_min_distance: f32,
    /// Progress forced onto spinning vehicles.
    pub spin_penalty: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            start_position: DEFAULT_START_POSITION,
            start_heading: DEFAULT_START_HEADING,
            speed: DEFAULT_SPEED,
            scale: DEFAULT_SCALE,
            nose_offset: DEFAULT_NOSE_OFFSET,
            sensors: SensorParams::default(),
            collision_reading: DEFAULT_COLLISION_READING,
            wrong_way_progress: DEFAULT_WRONG_WAY_PROGRESS,
            wrong_way_penalty: DEFAULT_WRONG_WAY_PENALTY,
            finish_progress: DEFAULT_FINISH_PROGRESS,
            spin_limit: DEFAULT_SPIN_LIMIT,
            spin_min_distance: DEFAULT_SPIN_MIN_DISTANCE,
            spin_penalty: DEFAULT_SPIN_PENALTY,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), TrackError> {
        let SensorParams { range, step, .. } = self.sensors;
        if range.is_nan() || step.is_nan() || range <= 0.0 || step <= 0.0 {
            return Err(TrackError::InvalidSensor { range, step });
        }
        if self.speed.is_nan() || self.speed <= 0.0 {
            return Err(TrackError::InvalidSpeed { speed: self.speed });
        }
        Ok(())
    }
}

/// Why a vehicle was eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum CrashCause {
    /// A sensor reading dropped below the collision threshold.
    #[display("collision")]
    Collision,
    /// Net progress went backwards past the start line.
    #[display("wrong way")]
    WrongWay,
    /// Turned a full circle without covering enough ground.
    #[display("spin")]
    Spin,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum VehicleStatus {
    Alive,
    Crashed(CrashCause),
    Finished,
}

/// Terminal (or budget-exhausted) state of a vehicle, as seen by fitness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleOutcome {
    pub status: VehicleStatus,
    pub ticks_alive: usize,
    pub angular_progress: f32,
    pub distance_traveled: f32,
}

impl VehicleOutcome {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    #[must_use]
    pub fn is_crashed(&self) -> bool {
        self.status.is_crashed()
    }
}

/// One simulated car and the driver steering it.
///
/// Mutated only through [`Vehicle::update`]; frozen once it crashes or finishes.
#[derive(Debug, Clone)]
pub struct Vehicle<D> {
    driver: D,
    status: VehicleStatus,
    position: Vec2,
    heading: f32,
    speed: f32,
    ticks_alive: usize,
    distance_traveled: f32,
    angular_progress: f32,
    last_center_angle: f32,
    spin_accumulator: f32,
    distance_at_spin_reset: f32,
    sensor_hits: Option<[RayHit; SENSOR_COUNT]>,
}

impl<D> Vehicle<D>
where
    D: Driver,
{
    /// Places a fresh vehicle at the circuit's start pose.
    pub fn new(circuit: &Circuit, driver: D) -> Self {
        let params = circuit.params();
        Self::with_pose(circuit, driver, params.start_position, params.start_heading)
    }

    /// Places a fresh vehicle at an arbitrary pose.
    pub fn with_pose(circuit: &Circuit, driver: D, position: Vec2, heading: f32) -> Self {
        Self {
            driver,
            status: VehicleStatus::Alive,
            position,
            heading,
            speed: circuit.params().speed,
            ticks_alive: 0,
            distance_traveled: 0.0,
            angular_progress: 0.0,
            last_center_angle: position.angle_from(circuit.center()),
            spin_accumulator: 0.0,
            distance_at_spin_reset: 0.0,
            sensor_hits: None,
        }
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[must_use]
    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    #[must_use]
    pub fn ticks_alive(&self) -> usize {
        self.ticks_alive
    }

    #[must_use]
    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    #[must_use]
    pub fn angular_progress(&self) -> f32 {
        self.angular_progress
    }

    /// Sensor hits from the latest tick, for display.
    #[must_use]
    pub fn sensor_hits(&self) -> Option<&[RayHit; SENSOR_COUNT]> {
        self.sensor_hits.as_ref()
    }

    /// Point the sensor rays start from.
    #[must_use]
    pub fn sensor_origin(&self, params: &VehicleParams) -> Vec2 {
        self.position + Vec2::from_heading(self.heading) * (params.nose_offset * params.scale)
    }

    #[must_use]
    pub fn outcome(&self) -> VehicleOutcome {
        VehicleOutcome {
            status: self.status,
            ticks_alive: self.ticks_alive,
            angular_progress: self.angular_progress,
            distance_traveled: self.distance_traveled,
        }
    }

    /// Advances the vehicle by one tick.
    ///
    /// Does nothing once the vehicle has crashed or finished.
    pub fn update(&mut self, circuit: &Circuit) -> VehicleStatus {
        if !self.status.is_alive() {
            return self.status;
        }
        let params = circuit.params();
        self.ticks_alive += 1;

        let origin = self.sensor_origin(params);
        let (hits, readings) = params.sensors.scan(circuit.mask(), origin, self.heading);
        self.sensor_hits = Some(hits);

        if readings.iter().any(|r| *r < params.collision_reading) {
            self.status = VehicleStatus::Crashed(CrashCause::Collision);
            return self.status;
        }

        self.update_lap_progress(circuit);
        if !self.status.is_alive() {
            return self.status;
        }

        let steering = self.driver.steer(&readings);
        self.heading += steering;
        self.check_spin(params, steering);

        self.position += Vec2::from_heading(self.heading) * self.speed;
        self.distance_traveled += self.speed;
        self.status
    }

    fn update_lap_progress(&mut self, circuit: &Circuit) {
        let params = circuit.params();
        let angle = self.position.angle_from(circuit.center());
        self.angular_progress += wrap_angle(angle - self.last_center_angle);
        self.last_center_angle = angle;

        if self.angular_progress < params.wrong_way_progress {
            self.angular_progress = params.wrong_way_penalty;
            self.status = VehicleStatus::Crashed(CrashCause::WrongWay);
        } else if self.angular_progress >= params.finish_progress {
            self.status = VehicleStatus::Finished;
        }
    }

    fn check_spin(&mut self, params: &VehicleParams, steering: f32) {
        self.spin_accumulator += steering;
        if self.spin_accumulator.abs() < params.spin_limit {
            return;
        }
        let covered = self.distance_traveled - self.distance_at_spin_reset;
        if covered < params.spin_min_distance {
            self.angular_progress = params.spin_penalty;
            self.status = VehicleStatus::Crashed(CrashCause::Spin);
        }
        self.spin_accumulator = 0.0;
        self.distance_at_spin_reset = self.distance_traveled;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::core::{TrackLayout, TrackMask};

    use super::*;

    /// Always steers by the same amount.
    #[derive(Debug)]
    struct Constant(f32);

    impl Driver for Constant {
        fn steer(&self, _readings: &SensorReadings) -> f32 {
            self.0
        }
    }

    /// Records how often it was consulted.
    #[derive(Debug, Default)]
    struct Counting(Cell<usize>);

    impl Driver for Counting {
        fn steer(&self, _readings: &SensorReadings) -> f32 {
            self.0.set(self.0.get() + 1);
            0.0
        }
    }

    fn default_circuit() -> Circuit {
        Circuit::new(&TrackLayout::default(), VehicleParams::default()).unwrap()
    }

    /// Open 1000x1000 field centered on (500, 500).
    fn open_circuit(params: VehicleParams) -> Circuit {
        let mask = TrackMask::from_fn(1000, 1000, |_, _| true);
        Circuit::with_mask(mask, Vec2::new(500.0, 500.0), params).unwrap()
    }

    #[test]
    fn test_facing_wall_crashes_on_first_tick() {
        // only a small pocket of road around the start, the nose is in the wall
        let params = VehicleParams {
            start_position: Vec2::new(50.0, 50.0),
            start_heading: 0.0,
            ..VehicleParams::default()
        };
        let mask = TrackMask::from_fn(100, 100, |x, y| x.abs_diff(50) <= 2 && y.abs_diff(50) <= 2);
        let circuit = Circuit::with_mask(mask, Vec2::new(0.0, 0.0), params).unwrap();

        let driver = Counting::default();
        let mut vehicle = Vehicle::new(&circuit, &driver);
        let status = vehicle.update(&circuit);

        assert_eq!(status, VehicleStatus::Crashed(CrashCause::Collision));
        assert_eq!(vehicle.ticks_alive(), 1);
        assert_eq!(vehicle.distance_traveled(), 0.0);
        assert_eq!(vehicle.position(), Vec2::new(50.0, 50.0));
        assert!(vehicle.sensor_hits().unwrap().iter().all(|h| h.distance == 0.0));
        assert_eq!(driver.0.get(), 0);
    }

    #[test]
    fn test_terminal_vehicle_is_frozen() {
        let params = VehicleParams {
            start_position: Vec2::new(50.0, 50.0),
            ..VehicleParams::default()
        };
        let mask = TrackMask::from_fn(100, 100, |x, y| x == 50 && y == 50);
        let circuit = Circuit::with_mask(mask, Vec2::ZERO, params).unwrap();
        let mut vehicle = Vehicle::new(&circuit, Constant(0.0));
        vehicle.update(&circuit);
        let before = vehicle.outcome();
        for _ in 0..10 {
            vehicle.update(&circuit);
        }
        assert_eq!(vehicle.outcome(), before);
    }

    #[test]
    fn test_straight_driving_moves_at_constant_speed() {
        let params = VehicleParams {
            start_position: Vec2::new(500.0, 100.0),
            start_heading: 0.0,
            ..VehicleParams::default()
        };
        let circuit = open_circuit(params);
        let mut vehicle = Vehicle::new(&circuit, Constant(0.0));
        for _ in 0..10 {
            assert_eq!(vehicle.update(&circuit), VehicleStatus::Alive);
        }
        assert_eq!(vehicle.ticks_alive(), 10);
        assert_eq!(vehicle.distance_traveled(), 60.0);
        assert!((vehicle.position().x - 560.0).abs() < 1e-3);
        assert!((vehicle.position().y - 100.0).abs() < 1e-3);
        // moving right above the center is clockwise on screen: forward progress
        assert!(vehicle.angular_progress() > 0.0);
    }

    #[test]
    fn test_wrong_way_penalty() {
        // above the center, heading left is counter-clockwise on screen
        let params = VehicleParams {
            start_position: Vec2::new(500.0, 100.0),
            start_heading: 180.0,
            speed: 20.0,
            ..VehicleParams::default()
        };
        let circuit = open_circuit(params);
        let mut vehicle = Vehicle::new(&circuit, Constant(0.0));
        let mut status = VehicleStatus::Alive;
        for _ in 0..100 {
            status = vehicle.update(&circuit);
            if !status.is_alive() {
                break;
            }
        }
        assert_eq!(status, VehicleStatus::Crashed(CrashCause::WrongWay));
        assert_eq!(vehicle.angular_progress(), -5.0);
    }

    #[test]
    fn test_forward_progress_finishes() {
        let params = VehicleParams {
            start_position: Vec2::new(500.0, 100.0),
            start_heading: 0.0,
            finish_progress: 0.5,
            ..VehicleParams::default()
        };
        let circuit = open_circuit(params);
        let mut vehicle = Vehicle::new(&circuit, Constant(0.0));
        let mut status = VehicleStatus::Alive;
        while status.is_alive() && vehicle.ticks_alive() < 1000 {
            status = vehicle.update(&circuit);
        }
        assert_eq!(status, VehicleStatus::Finished);
        assert!(vehicle.angular_progress() >= 0.5);

        // finishing stops motion on that tick
        let distance = vehicle.distance_traveled();
        assert_eq!(distance, (vehicle.ticks_alive() - 1) as f32 * 6.0);
    }

    #[test]
    fn test_spinning_in_place_is_eliminated() {
        let params = VehicleParams {
            start_position: Vec2::new(500.0, 150.0),
            start_heading: 180.0,
            ..VehicleParams::default()
        };
        let circuit = open_circuit(params);
        // full circle every 8 ticks, only 48 units covered
        let mut vehicle = Vehicle::new(&circuit, Constant(45.0));
        let mut status = VehicleStatus::Alive;
        for _ in 0..8 {
            status = vehicle.update(&circuit);
        }
        assert_eq!(status, VehicleStatus::Crashed(CrashCause::Spin));
        assert_eq!(vehicle.angular_progress(), -2.0);
        assert_eq!(vehicle.ticks_alive(), 8);
    }

    #[test]
    fn test_wide_turns_are_not_spins() {
        let params = VehicleParams {
            start_position: Vec2::new(500.0, 150.0),
            start_heading: 180.0,
            spin_min_distance: 30.0,
            ..VehicleParams::default()
        };
        let circuit = open_circuit(params);
        let mut vehicle = Vehicle::new(&circuit, Constant(45.0));
        for _ in 0..8 {
            vehicle.update(&circuit);
        }
        // 42 units covered before the check on the 8th tick
        assert!(vehicle.status().is_alive());
    }

    /// Turns a full circle in 10 degree steps, then keeps turning in 90 degree steps.
    #[derive(Debug, Default)]
    struct Tightening(Cell<usize>);

    impl Driver for Tightening {
        fn steer(&self, _readings: &SensorReadings) -> f32 {
            let calls = self.0.get() + 1;
            self.0.set(calls);
            if calls <= 36 { 10.0 } else { 90.0 }
        }
    }

    #[test]
    fn test_spin_check_resets_after_surviving() {
        let params = VehicleParams {
            start_position: Vec2::new(500.0, 300.0),
            start_heading: 180.0,
            wrong_way_progress: -1e9,
            finish_progress: 1e9,
            spin_min_distance: 200.0,
            ..VehicleParams::default()
        };
        let circuit = open_circuit(params);
        let mut vehicle = Vehicle::new(&circuit, Tightening::default());
        for _ in 0..36 {
            assert_eq!(vehicle.update(&circuit), VehicleStatus::Alive);
        }
        // first circle covered 210 units, the next one starts counting from there
        for _ in 0..3 {
            assert_eq!(vehicle.update(&circuit), VehicleStatus::Alive);
        }
        assert_eq!(
            vehicle.update(&circuit),
            VehicleStatus::Crashed(CrashCause::Spin)
        );
        assert_eq!(vehicle.ticks_alive(), 40);
        assert_eq!(vehicle.angular_progress(), -2.0);
    }

    #[test]
    fn test_default_start_is_clear() {
        let circuit = default_circuit();
        let mut vehicle = Vehicle::new(&circuit, Constant(0.0));
        assert_eq!(vehicle.update(&circuit), VehicleStatus::Alive);
        let readings: Vec<f32> = vehicle
            .sensor_hits()
            .unwrap()
            .iter()
            .map(|h| circuit.params().sensors.normalize(h.distance))
            .collect();
        assert!(readings.iter().all(|r| *r >= 5.0), "{readings:?}");
    }
}
