use approx::assert_abs_diff_eq;
use falsi::expression::{compile, CompileError};
use falsi::root_finding::common::round_to;
use falsi::root_finding::{
    EngineState, IterateOutcome, IterationRecord, Simulation, SimulationCfg, SimulationError,
    TerminationReason, ZeroDivision,
};

type FalsiResult = Result<(), SimulationError>;

fn started(formula: &str, x1: f64, x2: f64, precision: u32) -> Simulation {
    let mut sim = Simulation::default();
    sim.start(formula, x1, x2, precision).unwrap();
    sim
}

fn assert_mid_inside(r: &IterationRecord) {
    assert!(r.left < r.mid && r.mid < r.right, "mid {} outside ({}, {})", r.mid, r.left, r.right);
}

#[test]
fn fresh_simulation_is_uninitialized() {
    let sim = Simulation::default();
    assert_eq!(sim.state(), EngineState::Uninitialized);
    assert!(!sim.is_started());
    assert!(sim.history().is_empty());
    assert_eq!(sim.precision(), SimulationCfg::DEFAULT_PRECISION);
    assert_eq!(sim.formula(), "");
}

#[test]
fn quadratic_seed_record() -> FalsiResult {
    let mut sim = Simulation::default();
    let report = sim.start("x**2 - 4", 0.0, 5.0, 4)?;

    let r = report.record;
    assert_eq!(r.left, 0.0);
    assert_eq!(r.right, 5.0);
    assert_eq!(r.f_left, -4.0);
    assert_eq!(r.f_right, 21.0);
    assert_eq!(r.mid, 0.8);
    assert_eq!(r.f_mid, -3.36);
    assert!(report.warning.is_none());

    assert_eq!(sim.history(), &[r]);
    assert_eq!(sim.precision(), 4);
    assert_eq!(sim.formula(), "x**2 - 4");
    assert_eq!(sim.state(), EngineState::Ready);
    Ok(())
}

#[test]
fn quadratic_first_iteration() -> FalsiResult {
    let mut sim = started("x**2 - 4", 0.0, 5.0, 4);

    let outcome = sim.iterate()?;
    let IterateOutcome::Appended { number, record } = outcome else {
        panic!("expected a new record, got {outcome:?}");
    };

    assert_eq!(number, 2);
    assert_eq!(record.left, 0.8);
    assert_eq!(record.right, 5.0);
    assert_eq!(record.f_left, -3.36);
    assert_eq!(record.f_right, 21.0);
    assert_eq!(record.mid, 1.3793);
    assert_eq!(record.f_mid, -2.0975);
    Ok(())
}

#[test]
fn quadratic_converges_to_two() -> FalsiResult {
    let mut sim = started("x**2 - 4", 0.0, 5.0, 4);
    let report = sim.run(Some(50))?;

    assert_eq!(report.termination_reason, TerminationReason::Converged);
    assert_eq!(report.record.mid, 2.0);
    assert_eq!(report.record.f_mid, 0.0);
    assert_eq!(sim.state(), EngineState::Converged);
    assert_eq!(sim.history().len(), report.appended + 1);

    for r in sim.history() {
        assert_mid_inside(r);
    }

    // estimates approach the root monotonically from the left
    let mids: Vec<f64> = sim.history().iter().map(|r| r.mid).collect();
    assert!(mids.windows(2).all(|w| w[0] <= w[1]));
    Ok(())
}

#[test]
fn exact_root_seed_is_already_converged() -> FalsiResult {
    let mut sim = Simulation::default();
    let seed = sim.start("x", -1.0, 1.0, 6)?.record;
    assert_eq!(seed.mid, 0.0);
    assert_eq!(seed.f_mid, 0.0);
    assert_eq!(sim.state(), EngineState::Converged);

    let outcome = sim.iterate()?;
    assert_eq!(outcome, IterateOutcome::AlreadyConverged { record: seed });
    assert_eq!(outcome.record(), &seed);
    assert_eq!(sim.history().len(), 1);

    // stays terminal
    assert!(matches!(sim.iterate()?, IterateOutcome::AlreadyConverged { .. }));
    assert_eq!(sim.history().len(), 1);
    Ok(())
}

#[test]
fn constant_formula_is_invalid_variable() {
    let mut sim = Simulation::default();
    let err = sim.start("1", 0.0, 1.0, 4).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Compile(CompileError::InvalidVariable { ref found }) if found.is_empty()
    ));
    assert!(!sim.is_started());
}

#[test]
fn foreign_variable_is_invalid_variable() {
    let mut sim = Simulation::default();
    let err = sim.start("x + y", 0.0, 1.0, 4).unwrap_err();
    assert_eq!(
        err,
        SimulationError::Compile(CompileError::InvalidVariable { found: vec!["y".to_string()] })
    );
}

#[test]
fn malformed_formula_is_parse_error() {
    let mut sim = Simulation::default();
    let err = sim.start("x**2 -", 0.0, 1.0, 4).unwrap_err();
    assert!(matches!(err, SimulationError::Compile(CompileError::Parse { .. })));
}

#[test]
fn equal_seed_values_divide_by_zero() {
    let mut sim = Simulation::default();
    let err = sim.start("x**2", -2.0, 2.0, 4).unwrap_err();
    assert!(matches!(err, SimulationError::DivisionByZero(ZeroDivision::Estimate { .. })));
    assert_eq!(sim.state(), EngineState::Uninitialized);
}

#[test]
fn same_sign_seed_warns_but_starts() -> FalsiResult {
    let mut sim = Simulation::default();
    let report = sim.start("x**2 + 1", 0.0, 1.0, 4)?;

    let warning = report.warning.expect("expected same-sign warning");
    assert_eq!(warning.f_left, 1.0);
    assert_eq!(warning.f_right, 2.0);
    assert_eq!(report.record.mid, -1.0);
    assert_eq!(report.record.f_mid, 2.0);
    assert!(sim.is_started());
    Ok(())
}

#[test]
fn zero_endpoint_does_not_warn() -> FalsiResult {
    let mut sim = Simulation::default();
    let report = sim.start("x - 1", 1.0, 3.0, 4)?;
    assert!(report.warning.is_none());
    assert_eq!(report.record.mid, 1.0);
    Ok(())
}

#[test]
fn iterate_before_start_fails() {
    let mut sim = Simulation::default();
    assert_eq!(sim.iterate().unwrap_err(), SimulationError::NotStarted);
    assert_eq!(sim.run(None).unwrap_err(), SimulationError::NotStarted);
}

#[test]
fn iterate_division_by_zero_appends_nothing() -> FalsiResult {
    // seed mid lands on 2, so the next bracket is [-2, 2] with f = 4 at both ends
    let mut sim = Simulation::default();
    let seed = sim.start("x**2", -2.0, 1.0, 4)?.record;
    assert_eq!(seed.mid, 2.0);

    let before = sim.history().to_vec();
    let err = sim.iterate().unwrap_err();
    assert!(matches!(err, SimulationError::DivisionByZero(ZeroDivision::Estimate { .. })));
    assert_eq!(sim.history(), before.as_slice());
    assert_eq!(sim.precision(), 4);
    Ok(())
}

#[test]
fn unbounded_precision_stores_unrounded_values() -> FalsiResult {
    let mut sim = Simulation::default();
    let seed = sim.start("x**2 - 4", 0.0, 5.0, u32::MAX)?.record;
    assert_abs_diff_eq!(seed.mid, 0.8, epsilon = 1e-12);
    assert_eq!(seed.f_right, 21.0);
    assert_eq!(sim.precision(), u32::MAX);

    assert!(matches!(sim.iterate()?, IterateOutcome::Appended { number: 2, .. }));
    Ok(())
}

#[test]
fn cancelling_formula_is_accepted_but_cannot_start() {
    // no algebraic simplification: `x - x` still mentions `x`
    let f = compile("x - x").unwrap();
    assert_eq!(f.eval(3.0), 0.0);

    let mut sim = Simulation::default();
    let err = sim.start("x - x", 0.0, 1.0, 4).unwrap_err();
    assert!(matches!(err, SimulationError::DivisionByZero(ZeroDivision::Estimate { .. })));
}

#[test]
fn formula_division_by_zero_at_seed_fails() {
    let mut sim = Simulation::default();
    let err = sim.start("1/x", 0.0, 1.0, 4).unwrap_err();
    assert_eq!(err, SimulationError::DivisionByZero(ZeroDivision::Formula { x: 0.0 }));

    let err = sim.start("1/(x-1) + x", 1.0, 3.0, 4).unwrap_err();
    assert_eq!(err, SimulationError::DivisionByZero(ZeroDivision::Formula { x: 1.0 }));

    // `0**-1` and `cot(0)` divide by zero too
    let err = sim.start("x**-1 - 1", 0.0, 2.0, 4).unwrap_err();
    assert_eq!(err, SimulationError::DivisionByZero(ZeroDivision::Formula { x: 0.0 }));
    let err = sim.start("cot(x) - 1", 0.0, 1.0, 4).unwrap_err();
    assert_eq!(err, SimulationError::DivisionByZero(ZeroDivision::Formula { x: 0.0 }));
    assert_eq!(sim.state(), EngineState::Uninitialized);
}

#[test]
fn formula_division_by_zero_at_estimate_fails() {
    // f(-1) = -1 and f(1) = 1 put the estimate on the pole at 0
    let mut sim = Simulation::default();
    let err = sim.start("x + sign(x) - 1/x", -1.0, 1.0, 4).unwrap_err();
    assert_eq!(err, SimulationError::DivisionByZero(ZeroDivision::Formula { x: 0.0 }));
    assert!(!sim.is_started());
}

#[test]
fn non_finite_seed_evaluation_fails() {
    let mut sim = Simulation::default();
    let err = sim.start("sqrt(x) - 2", -1.0, 5.0, 4).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::NonFiniteEvaluation { x, fx } if x == -1.0 && fx.is_nan()
    ));

    // overflow is not a division
    let err = sim.start("exp(x) - 1", -1.0, 1000.0, 4).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::NonFiniteEvaluation { x, fx } if x == 1000.0 && fx.is_infinite()
    ));
}

#[test]
fn failed_start_leaves_state_untouched() -> FalsiResult {
    let mut sim = started("x**2 - 4", 0.0, 5.0, 4);
    sim.iterate()?;
    let history = sim.history().to_vec();

    let failures = [
        ("x + y", 0.0, 1.0),
        ("x**2 -", 0.0, 1.0),
        ("x**2", -2.0, 2.0),
        ("1/x", 0.0, 1.0),
    ];
    for (formula, x1, x2) in failures {
        assert!(sim.start(formula, x1, x2, 7).is_err(), "formula={formula}");
        assert_eq!(sim.history(), history.as_slice(), "formula={formula}");
        assert_eq!(sim.precision(), 4, "formula={formula}");
        assert_eq!(sim.formula(), "x**2 - 4", "formula={formula}");
    }

    // the cached function is still the old one
    let f = sim.function().expect("started");
    assert_eq!(f.eval(3.0), 5.0);
    Ok(())
}

#[test]
fn start_resets_history_to_one_record() -> FalsiResult {
    let mut sim = started("x**2 - 4", 0.0, 5.0, 4);
    for expected in 2..=5 {
        sim.iterate()?;
        assert_eq!(sim.history().len(), expected);
    }

    sim.start("x**3 - 2", 1.0, 2.0, 3)?;
    assert_eq!(sim.history().len(), 1);
    assert_eq!(sim.precision(), 3);
    assert_eq!(sim.formula(), "x**3 - 2");
    Ok(())
}

#[test]
fn start_rounds_bracket_points() -> FalsiResult {
    let mut sim = Simulation::default();
    let r = sim.start("x - 1", 0.123456, 2.987654, 2)?.record;
    assert_eq!(r.left, 0.12);
    assert_eq!(r.right, 2.99);
    assert_eq!(r.f_left, -0.88);
    assert_eq!(r.f_right, 1.99);
    Ok(())
}

#[test]
fn stored_values_are_rounded_raw_values() -> FalsiResult {
    let precision = 3;
    let mut sim = started("x**3 - 2", 1.0, 2.0, precision);
    sim.iterate()?;
    sim.iterate()?;

    let f = compile("x**3 - 2")?;
    for r in sim.history() {
        assert_eq!(r.f_left,  round_to(f.eval(r.left), precision));
        assert_eq!(r.f_right, round_to(f.eval(r.right), precision));
        assert_eq!(r.f_mid,   round_to(f.eval(r.mid), precision));
        for v in [r.left, r.right, r.mid, r.f_left, r.f_right, r.f_mid] {
            assert_eq!(round_to(v, precision), v);
        }
    }

    let seed = sim.history()[0];
    assert_eq!(seed.mid, 1.143);
    assert_eq!(seed.f_mid, -0.507);
    Ok(())
}

#[test]
fn bracket_narrowing_follows_sign_rule() -> FalsiResult {
    for (formula, x1, x2) in [("x**3 - x - 2", 1.0, 2.0), ("cos(x) - x", 0.0, 1.0), ("exp(-x) - x", 0.0, 2.0)] {
        let mut sim = started(formula, x1, x2, 10);
        for _ in 0..4 {
            if let IterateOutcome::AlreadyConverged { .. } = sim.iterate()? {
                break;
            }
        }

        for w in sim.history().windows(2) {
            let (prev, next) = (w[0], w[1]);
            if (prev.f_mid > 0.0) == (prev.f_right > 0.0) {
                assert_eq!(next.left,  prev.left, "formula={formula}");
                assert_eq!(next.right, prev.mid,  "formula={formula}");
            } else {
                assert_eq!(next.left,  prev.mid,   "formula={formula}");
                assert_eq!(next.right, prev.right, "formula={formula}");
            }
        }

        for r in sim.history() {
            assert!(r.f_left * r.f_right < 0.0, "formula={formula}");
            assert_mid_inside(r);
        }
    }
    Ok(())
}

#[test]
fn cubic_root_estimate() -> FalsiResult {
    let mut sim = started("x**3 - x - 2", 1.0, 2.0, 10);
    let report = sim.run(Some(40))?;
    assert_abs_diff_eq!(report.record.mid, 1.5213797068, epsilon = 1e-6);
    Ok(())
}

#[test]
fn run_stops_at_iteration_limit() -> FalsiResult {
    let mut sim = started("x**2 - 4", 0.0, 5.0, 8);
    let report = sim.run(Some(3))?;

    assert_eq!(report.appended, 3);
    assert_eq!(report.termination_reason, TerminationReason::IterationLimit);
    assert_eq!(sim.history().len(), 4);
    assert_eq!(Some(&report.record), sim.latest());
    Ok(())
}

#[test]
fn run_uses_configured_max_iter() -> FalsiResult {
    let cfg = SimulationCfg::new().set_max_iter(2).unwrap();
    let mut sim = Simulation::new(cfg);
    sim.start("x**2 - 4", 0.0, 5.0, 8)?;

    assert_eq!(sim.cfg().max_iter(), 2);
    let report = sim.run(None)?;
    assert_eq!(report.appended, 2);
    assert_eq!(sim.history().len(), 3);
    Ok(())
}

#[test]
fn run_on_converged_simulation_appends_nothing() -> FalsiResult {
    let mut sim = started("x", -1.0, 1.0, 4);
    let report = sim.run(None)?;
    assert_eq!(report.appended, 0);
    assert_eq!(report.termination_reason, TerminationReason::Converged);
    Ok(())
}

#[test]
fn table_rows_number_from_one() -> FalsiResult {
    let mut sim = started("x**2 - 4", 0.0, 5.0, 4);
    sim.iterate()?;

    let row = sim.history()[1].row(2);
    assert_eq!(row.number, 2);
    let text = row.to_string();
    assert!(text.trim_start().starts_with('2'));
    assert!(text.contains("1.3793"));
    assert!(text.contains("-2.0975"));
    Ok(())
}
