use cbcbridge_cbc::{CbcModel, ObjectiveSense, SolutionStatus};

#[test]
fn test_minimize_integer_simple() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // minimize x subject to x >= 1.5, x integer
    let mut model = CbcModel::new();
    model.set_log_level(0);
    let x = model.add_integer_col(0.0, 10.0, 1.0);
    model
        .add_row(1.5, f64::INFINITY, [(x, 1.0)])
        .expect("failed to add row");
    model.set_objective_sense(ObjectiveSense::Minimize);

    let status = model.solve();
    assert_eq!(status, SolutionStatus::Optimal);

    let x_value = model.col_values().expect("missing solution")[x];
    assert!(
        (x_value - 2.0).abs() < 1e-6,
        "Expected integer x = 2.0, got {}",
        x_value
    );
}

#[test]
fn test_integer_variable_is_enforced() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let mut model = CbcModel::new();
    model.set_log_level(0);
    let x = model.add_integer_col(0.0, 10.0, 1.0);
    model
        .add_row(f64::NEG_INFINITY, 1.5, [(x, 1.0)])
        .expect("failed to add row");
    model.set_objective_sense(ObjectiveSense::Maximize);

    let status = model.solve();
    assert_eq!(status, SolutionStatus::Optimal);

    let x_value = model.col_values().expect("missing solution")[x];
    assert!(
        (x_value - 1.0).abs() < 1e-6,
        "Expected integer x = 1.0, got {}",
        x_value
    );
}

#[test]
fn test_contradictory_rows_are_infeasible() {
    let mut model = CbcModel::new();
    model.set_log_level(0);
    let x = model.add_integer_col(0.0, 10.0, 1.0);
    let y = model.add_integer_col(0.0, 10.0, 1.0);
    model
        .add_row(5.0, f64::INFINITY, [(x, 1.0), (y, 1.0)])
        .expect("failed to add row");
    model
        .add_row(f64::NEG_INFINITY, 3.0, [(x, 1.0), (y, 1.0)])
        .expect("failed to add row");

    assert_eq!(model.solve(), SolutionStatus::Infeasible);
}

#[test]
fn test_row_with_unknown_column_is_rejected() {
    let mut model = CbcModel::new();
    let x = model.add_col(0.0, 1.0, 1.0);

    assert!(model.add_row(0.0, 1.0, [(x, 1.0), (x + 1, 2.0)]).is_err());
    assert_eq!(model.rows(), 0);
}

#[test]
fn test_unbounded_column_is_not_optimal() {
    let mut model = CbcModel::new();
    model.set_log_level(0);
    model.add_col(0.0, f64::INFINITY, 1.0);
    model.set_objective_sense(ObjectiveSense::Maximize);

    assert_eq!(model.solve(), SolutionStatus::Unbounded);
}
