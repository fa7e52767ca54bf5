use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("painel").unwrap();
    cmd.arg("--data-dir").arg("tests/data");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let out = cmd()
        .arg("--json")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).expect("valid json output")
}

fn rows(table: &Value) -> &Vec<Value> {
    table["rows"].as_array().expect("rows array")
}

#[test]
fn check_loads_every_dataset() {
    cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(contains("all 10 datasets loaded"));
}

#[test]
fn check_json_reports_columns() {
    let report = run_json(&["check"]);
    let datasets = report.as_array().unwrap();
    assert_eq!(datasets.len(), 10);

    let movements = datasets
        .iter()
        .find(|d| d["dataset"] == "caged_movimentacao")
        .unwrap();
    assert_eq!(movements["rows"], 6);
    assert_eq!(movements["columns"][1], "mes");
}

#[test]
fn missing_data_dir_is_fatal() {
    Command::cargo_bin("painel")
        .unwrap()
        .args(["--data-dir", "tests/nao-existe", "check"])
        .assert()
        .failure()
        .stderr(contains("loading datasets"));
}

#[test]
fn charts_lists_bindings() {
    cmd()
        .arg("charts")
        .assert()
        .success()
        .stdout(contains("fig-admissoes-desligamentos"))
        .stdout(contains("filtro-ano-caged-secao"));
}

#[test]
fn year_options_are_descending_after_sentinel() {
    let options = run_json(&["options", "filtro-ano-caged-secao"]);
    assert_eq!(options, serde_json::json!(["Todos", "2022", "2021"]));
}

#[test]
fn latin1_sector_labels_are_decoded() {
    let options = run_json(&["options", "filtro-cnae-caged-saldo"]);
    assert_eq!(options, serde_json::json!(["Todos", "Comércio", "Indústria"]));
}

#[test]
fn admissions_separations_drop_unmatched_month() {
    let table = run_json(&["input", "filtro-cnae-caged-movimentacao", "Comércio"]);
    assert_eq!(table["chart_id"], "fig-admissoes-desligamentos");
    assert_eq!(
        table["rows"],
        serde_json::json!([
            { "mes": 1, "tipo": "admissoes", "valor": 2 },
            { "mes": 1, "tipo": "desligamentos", "valor": 1 }
        ])
    );
}

#[test]
fn sector_filter_sums_by_year() {
    let table = run_json(&["chart", "fig-saldo-anual", "--select", "Indústria"]);
    let rows = rows(&table);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["ano"], 2021);
    assert_eq!(rows[0]["saldo_movimentacao"], -20);
    assert_eq!(rows[1]["saldo_movimentacao"], 35);
}

#[test]
fn ranking_chart_orders_by_measure() {
    let table = run_json(&["chart", "fig-caged-saldo-secao"]);
    let rows = rows(&table);
    assert_eq!(rows[0]["cnae_2_descricao_secao"], "Indústria");
    assert_eq!(rows[0]["saldo_movimentacao"], 15);
    assert_eq!(rows[1]["saldo_movimentacao"], 240);
    assert_eq!(table["kind"], "horizontal_bar");
}

#[test]
fn mean_chart_groups_year_and_series() {
    let table = run_json(&["chart", "fig-caged-salario-medio"]);
    let rows = rows(&table);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["salario_medio"], 2200.0);
    assert_eq!(rows[1]["variable"], "desligamentos");
    assert_eq!(rows[2]["ano"], 2022);
}

#[test]
fn absent_selection_gives_empty_rows() {
    let table = run_json(&["input", "filtro-ano-caged-idade", "1990"]);
    assert!(rows(&table).is_empty());
}

#[test]
fn text_output_carries_source() {
    cmd()
        .args(["chart", "fig-rais-anual"])
        .assert()
        .success()
        .stdout(contains("Fonte: RAIS Estabelecimentos"));
}

#[test]
fn unknown_chart_fails() {
    cmd()
        .args(["chart", "fig-inexistente"])
        .assert()
        .failure()
        .stderr(contains("Unknown chart"));
}
