//! Integration test: two P-only controlled tanks in series.
//!
//! Network: Inflow --> Tank 1 --[Pump 1]--> Tank 2 --[Pump 2]--> Process
//!
//! Demonstrates:
//! - Pulsed inflow (115 gpm for 3 h of every 12 h, 100 gpm otherwise)
//! - Each pump's flow swing is smaller than the flow feeding its tank
//! - Implicit and explicit stepping agree at the reference half-second step

use lf_controls::{LevelController, LevelControllerParams, StepScheme};
use lf_sim::{InflowProfile, SimOptions, TankCascade, run_cascade};

fn reference_cascade() -> TankCascade {
    // Tank 1: 1000 gal over 5 ft
    let tank1 =
        LevelController::new(LevelControllerParams::default().with_init_level(2.5)).unwrap();
    // Tank 2: 2500 gal over 6 ft, narrow pump span
    let tank2 = LevelController::new(
        LevelControllerParams::default()
            .with_levels(0.0, 6.0)
            .with_flows(103.0, 105.0)
            .with_full_volume(2500.0),
    )
    .unwrap();
    TankCascade::new()
        .with_tank("tank1", tank1)
        .with_tank("tank2", tank2)
}

#[test]
fn cascade_smooths_pulsed_inflow() {
    let mut cascade = reference_cascade();
    let opts = SimOptions {
        record_every: 60,
        ..SimOptions::default()
    };

    let record = run_cascade(&mut cascade, &InflowProfile::default(), &opts).unwrap();
    assert_eq!(record.tank_count(), 2);
    // Every 60th step plus the final one.
    assert_eq!(record.len(), 259_200 / 60 + 1);

    let summary = record.summary().unwrap();
    let inflow = summary.inflow;
    let pump1 = summary.tanks[0].outflow;
    let pump2 = summary.tanks[1].outflow;

    assert_eq!(inflow.swing, 15.0);
    assert!(pump1.swing < inflow.swing, "pump 1 swing {}", pump1.swing);
    assert!(pump2.swing < pump1.swing, "pump 2 swing {}", pump2.swing);
    assert!(pump2.min >= 103.0 && pump2.max <= 105.0);

    // Tank 1 stays inside its sensor span for this disturbance.
    let level1 = summary.tanks[0].level;
    assert!(level1.min > 0.0 && level1.max < 5.0, "{level1:?}");
}

#[test]
fn tank1_tracks_inflow_steady_state_by_end_of_pulse() {
    // Tank 1 time constant is 3000 s, so 3 h of pulse is several time constants.
    let mut cascade = reference_cascade();
    let opts = SimOptions {
        t_end: 3.0 * 3600.0,
        ..SimOptions::default()
    };

    let record = run_cascade(&mut cascade, &InflowProfile::default(), &opts).unwrap();
    let last_level = *record.levels[0].last().unwrap();
    let steady = cascade.tank(0).unwrap().steady_state_level(115.0).unwrap();
    assert!(last_level < steady);
    assert!(steady - last_level < 0.1, "level {last_level} vs {steady}");
}

#[test]
fn schemes_agree_at_small_timestep() {
    let opts = SimOptions {
        t_end: 12.0 * 3600.0,
        record_every: 120,
        ..SimOptions::default()
    };

    let mut implicit = reference_cascade();
    let a = run_cascade(&mut implicit, &InflowProfile::default(), &opts).unwrap();

    let mut explicit = reference_cascade();
    let b = run_cascade(
        &mut explicit,
        &InflowProfile::default(),
        &SimOptions {
            scheme: StepScheme::Explicit,
            ..opts
        },
    )
    .unwrap();

    assert_eq!(a.len(), b.len());
    for (tank_a, tank_b) in a.levels.iter().zip(&b.levels) {
        for (la, lb) in tank_a.iter().zip(tank_b) {
            assert!((la - lb).abs() < 1e-3, "implicit {la} vs explicit {lb}");
        }
    }
}

#[test]
fn explicit_run_past_stability_limit_never_settles() {
    // Tank 1 explicit limit is 6000 s. At 10000 s per step the explicit level
    // keeps bouncing between the pump limits; implicit settles at 3.125 ft.
    let single = || {
        TankCascade::new().with_tank(
            "tank1",
            LevelController::new(LevelControllerParams::default().with_init_level(2.5)).unwrap(),
        )
    };
    let opts = SimOptions {
        dt: 10_000.0,
        t_end: 100_000.0,
        ..SimOptions::default()
    };
    let inflow = InflowProfile::Constant { flow: 110.0 };
    let steady = 3.125;

    let implicit = run_cascade(&mut single(), &inflow, &opts).unwrap();
    let last = *implicit.levels[0].last().unwrap();
    assert!((last - steady).abs() < 1e-3, "implicit level {last}");

    let explicit = run_cascade(
        &mut single(),
        &inflow,
        &SimOptions {
            scheme: StepScheme::Explicit,
            ..opts
        },
    )
    .unwrap();
    assert_eq!(explicit.len(), 10);
    for level in &explicit.levels[0][5..] {
        assert!((level - steady).abs() > 1.0, "explicit level {level}");
    }
}
