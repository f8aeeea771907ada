#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::float_cmp)]

use pendulum::{MIN_SPRING_LENGTH, Motion, Parameter, Simulation, SimulationParameters};
use proptest::prelude::*;

/// Parameter sets that keep the spring well away from the length floor and
/// the oscillation well resolved by the 1 ms step.
fn tame_parameters() -> impl Strategy<Value = SimulationParameters> {
    (
        0.5f64..3.0,
        20.0f64..200.0,
        0.5f64..2.0,
        1.0f64..1.5,
        -1.0f64..1.0,
        1.0f64..20.0,
    )
        .prop_map(|(mass, k, r0, stretch, angle, gravity)| {
            SimulationParameters::default()
                .with_mass(mass)
                .with_spring_constant(k)
                .with_natural_length(r0)
                .with_initial_length(r0 * stretch)
                .with_initial_angle(angle)
                .with_gravity(gravity)
        })
}

fn resting_energy(params: &SimulationParameters) -> f64 {
    Motion {
        spring_length: params.equilibrium_length(0.0),
        ..Motion::default()
    }
    .mechanical_energy(params)
}

// =============================================================================
// Determinism
// =============================================================================

proptest! {
    #[test]
    fn repeated_runs_are_identical(
        params in tame_parameters(),
        damping in 0.0f64..1.0,
        steps in 1u64..2000,
    ) {
        let params = params.with_damping(damping);
        let mut a = Simulation::new(params);
        let mut b = Simulation::new(params);
        a.advance(steps);
        b.advance(steps);
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn split_advance_equals_single_advance(
        params in tame_parameters(),
        first in 0u64..500,
        second in 0u64..500,
    ) {
        let mut split = Simulation::new(params);
        split.advance(first);
        split.advance(second);

        let mut whole = Simulation::new(params);
        whole.advance(first + second);

        prop_assert_eq!(split.snapshot(), whole.snapshot());
    }

    #[test]
    fn reset_then_rerun_reproduces(params in tame_parameters(), steps in 1u64..1000) {
        let mut sim = Simulation::new(params);
        sim.advance(steps);
        let first = sim.snapshot();

        sim.reset();
        sim.advance(steps);
        prop_assert_eq!(sim.snapshot(), first);
    }
}

// =============================================================================
// Energy
// =============================================================================

proptest! {
    #[test]
    fn damped_energy_never_rises(params in tame_parameters(), damping in 0.05f64..1.0) {
        let params = params.with_damping(damping);
        let mut sim = Simulation::new(params);
        let swing = (sim.energy() - resting_energy(&params)).abs();
        let tolerance = 1e-9 + 1e-6 * swing;

        let mut previous = sim.energy();
        // Four simulated seconds, checked every half second
        for _ in 0..8 {
            sim.advance(500);
            let energy = sim.energy();
            prop_assert!(
                energy <= previous + tolerance,
                "energy rose: {} -> {} ({})",
                previous, energy, params
            );
            previous = energy;
        }
    }

    #[test]
    fn undamped_energy_is_conserved(params in tame_parameters()) {
        let params = params.with_damping(0.0);
        let mut sim = Simulation::new(params);
        let initial = sim.energy();
        let swing = (initial - resting_energy(&params)).abs();

        sim.advance(2000);
        let drift = (sim.energy() - initial).abs();
        prop_assert!(
            drift <= 1e-9 + 1e-5 * swing,
            "drift {} for swing {} ({})",
            drift, swing, params
        );
    }
}

// =============================================================================
// Spring-length floor
// =============================================================================

proptest! {
    #[test]
    fn spring_length_never_below_floor(
        mass in 0.01f64..10.0,
        k in 0.0f64..5000.0,
        r0 in 0.0f64..3.0,
        r_init in 0.1f64..5.0,
        angle in -3.2f64..3.2,
        damping in 0.0f64..5.0,
        gravity in 0.0f64..30.0,
    ) {
        let params = SimulationParameters {
            mass,
            spring_constant: k,
            natural_length: r0,
            initial_length: r_init,
            initial_angle: angle,
            damping,
            gravity,
        };
        let mut sim = Simulation::new(params);
        for _ in 0..500 {
            sim.step();
            let r = sim.snapshot().spring_length();
            prop_assert!(r >= MIN_SPRING_LENGTH, "R = {}", r);
        }
    }
}

// =============================================================================
// Snapshot self-consistency
// =============================================================================

proptest! {
    #[test]
    fn snapshot_fields_agree_with_motion(
        params in tame_parameters(),
        steps in 0u64..1500,
    ) {
        let mut sim = Simulation::new(params);
        sim.advance(steps);
        let state = sim.snapshot();
        let motion = sim.motion();

        prop_assert_eq!(state.motion(), motion);
        prop_assert_eq!(state.value(Parameter::Time), sim.time());

        let r = state.spring_length();
        let phi = state.angle();
        prop_assert!((state.x() - r * phi.sin()).abs() < 1e-12);
        prop_assert!((state.y() - r * phi.cos()).abs() < 1e-12);
        prop_assert!((state.x().hypot(state.y()) - r).abs() < 1e-9);
        prop_assert!(
            (state.spring_force() - params.spring_constant * (r - params.natural_length)).abs()
                < 1e-9
        );
        prop_assert_eq!(state.gravity_force(), params.mass * params.gravity);
        prop_assert!(state.velocity() >= 0.0);
        prop_assert!(state.acceleration() >= 0.0);
    }
}
