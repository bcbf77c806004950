mod common;

use std::fs;

use finance_store::domain::UserPatch;

use common::setup_test_env;

#[test]
fn transactions_export_to_a_csv_file() {
    let (app, manager) = setup_test_env();
    let path = manager.config_path().with_file_name("transacciones.csv");

    let file = fs::File::create(&path).unwrap();
    app.store().export_transactions_csv(file).expect("export");

    let csv = fs::read_to_string(&path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        r#""Fecha","Descripción","Categoría","Tipo","Monto","ID""#
    );
    assert!(csv.contains(r#""Salario mensual","Salario","Ingreso","2.500.000 COP""#));
    assert_eq!(lines.count(), 5);
}

#[test]
fn english_profile_switches_labels() {
    let (mut app, _) = setup_test_env();
    app.store_mut().update_user(UserPatch {
        language: Some("en-US".into()),
        currency: Some("USD".into()),
        ..UserPatch::default()
    });

    let mut goals = Vec::new();
    app.store().export_goals_csv(&mut goals).unwrap();
    let goals = String::from_utf8(goals).unwrap();
    assert!(goals.starts_with(r#""Title","Description","Target""#));
    assert!(goals.contains(r#""5,000,000.00 USD""#), "{goals}");

    let mut report = Vec::new();
    app.store().export_report_csv(&mut report).unwrap();
    let report = String::from_utf8(report).unwrap();
    assert!(report.contains(r#""Total goals","4""#), "{report}");
}
