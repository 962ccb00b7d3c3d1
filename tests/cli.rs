use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use balance::models::Money;
use balance::storage::load_goals;

const TRANSACTIONS: &str = "\
date,type,amount,category,person
2025-01-01,income,5000,Salario,ana
2025-01-15,expense,2000,Arriendo,luis
2025-02-01,ingreso,5000,Salario,ana
2025-02-10,gasto,4500,Viaje,luis
";

const GOALS: &str = "\
- id: sav_emergency
  name: Emergencia
  priority_tier: 1
  target_amount: 10000
  monthly_contribution_cap: 2000
- id: sav_trip
  name: Viaje Londres
  priority_tier: 2
  target_amount: 800
- id: sav_car
  name: Carro
  priority_tier: 2
  target_amount: 5000
";

const BUDGETS: &str = "\
- category: Arriendo
  amount: 1800
- category: Viaje
  month: 2025-02
  amount: 5000
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("transactions.csv"), TRANSACTIONS).unwrap();
        fs::write(dir.path().join("goals.yaml"), GOALS).unwrap();
        fs::write(dir.path().join("budgets.yaml"), BUDGETS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config_dir(&self) -> PathBuf {
        self.path("config")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("balance").unwrap();
        cmd.env("BALANCE_CLI_DATA_DIR", self.config_dir())
            .env_remove("BALANCE_LOG")
            .env_remove("BALANCE_TRANSACTIONS")
            .env_remove("BALANCE_GOALS")
            .env_remove("BALANCE_BUDGETS")
            .env_remove("BALANCE_DEBTS");
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn summary_prints_each_month() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["summary", "--transactions", arg(&fx.path("transactions.csv"))])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01"))
        .stdout(predicate::str::contains("$3000.00"))
        .stdout(predicate::str::contains("$500.00"))
        .stdout(predicate::str::contains("60.0%"));
}

#[test]
fn summary_exports_csv() {
    let fx = Fixture::new();
    let out = fx.path("summary.csv");

    fx.cmd()
        .args(["summary", "-t", arg(&fx.path("transactions.csv")), "-o", arg(&out)])
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.contains("2025-02,5000.00,4500.00,500.00,0.100"));
}

#[test]
fn spending_top_category() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "spending",
            "--transactions",
            arg(&fx.path("transactions.csv")),
            "--top",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Viaje"))
        .stdout(predicate::str::contains("Arriendo").not());
}

#[test]
fn spending_rejects_inverted_range() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "spending",
            "-t",
            arg(&fx.path("transactions.csv")),
            "--from",
            "2025-03",
            "--to",
            "2025-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is after"));
}

#[test]
fn budget_status_for_month() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "budget",
            "-t",
            arg(&fx.path("transactions.csv")),
            "--budgets",
            arg(&fx.path("budgets.yaml")),
            "--month",
            "2025-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget Status: 2025-01"))
        .stdout(predicate::str::contains("OVER"))
        .stdout(predicate::str::contains("Viaje").not());
}

#[test]
fn savings_preview_leaves_goals_untouched() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "savings",
            "-t",
            arg(&fx.path("transactions.csv")),
            "-g",
            arg(&fx.path("goals.yaml")),
            "--ledger",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emergencia"))
        .stdout(predicate::str::contains("Monthly Allocation"))
        .stdout(predicate::str::contains("sav_trip: $500.00"));

    assert_eq!(fs::read_to_string(fx.path("goals.yaml")).unwrap(), GOALS);
    assert!(!fx.config_dir().join("audit.log").exists());
}

#[test]
fn savings_apply_updates_goals_and_audit_log() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "savings",
            "-t",
            arg(&fx.path("transactions.csv")),
            "-g",
            arg(&fx.path("goals.yaml")),
            "--apply",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied allocation to 3 goal(s)"));

    // January: 3000 net, 2000 to the emergency fund, 500 to each tier 2 goal.
    // February: 500 net, all of it to the emergency fund.
    let goals = load_goals(&fx.path("goals.yaml")).unwrap();
    assert_eq!(goals[0].current_amount, Money::from_units(2500));
    assert_eq!(goals[1].current_amount, Money::from_units(500));
    assert_eq!(goals[2].current_amount, Money::from_units(500));

    let audit = fs::read_to_string(fx.config_dir().join("audit.log")).unwrap();
    assert_eq!(audit.lines().count(), 3);
    assert!(audit.contains("\"operation\":\"allocate\""));
}

#[test]
fn savings_apply_conflicts_with_from_zero() {
    let fx = Fixture::new();

    fx.cmd()
        .args([
            "savings",
            "-t",
            arg(&fx.path("transactions.csv")),
            "-g",
            arg(&fx.path("goals.yaml")),
            "--apply",
            "--from-zero",
        ])
        .assert()
        .failure();
}

#[test]
fn malformed_date_rejects_batch() {
    let fx = Fixture::new();
    let bad = fx.path("bad.csv");
    fs::write(
        &bad,
        "date,type,amount,category\n2025-01-01,income,100,Salario\n2025-13-45,expense,10,Mercado\n",
    )
    .unwrap();

    fx.cmd()
        .args(["summary", "-t", arg(&bad)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 3"))
        .stderr(predicate::str::contains("2025-13-45"));
}

#[test]
fn missing_transactions_file_fails() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["summary", "-t", arg(&fx.path("nope.csv"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found").or(predicate::str::contains("nope.csv")));
}

#[test]
fn init_writes_settings_and_sample_goals() {
    let fx = Fixture::new();

    fx.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample goals written"));

    assert!(fx.config_dir().join("config.json").exists());
    let goals = load_goals(&fx.config_dir().join("data").join("goals.yaml")).unwrap();
    assert_eq!(goals.len(), 4);
    assert_eq!(goals[0].id.as_str(), "sav_emergency");

    fx.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized:       true"));
}

#[test]
fn malformed_amount_rejects_batch() {
    let fx = Fixture::new();
    let bad = fx.path("bad_amount.csv");
    fs::write(
        &bad,
        "date,type,amount,category\n2025-01-01,income,12.5€,Salario\n2025-01-02,expense,999999999999999999,Mercado\n",
    )
    .unwrap();

    fx.cmd()
        .args(["summary", "-t", arg(&bad)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 2"))
        .stderr(predicate::str::contains("invalid amount"));
}

const DEBTS: &str = "\
- id: car-debt-1
  entity: Carro
  initial_amount: 1000
  balance: 1000
  remaining_installments: 5
";

#[test]
fn debts_apply_installments_from_expenses() {
    let fx = Fixture::new();
    fs::write(fx.path("debts.yaml"), DEBTS).unwrap();
    fs::write(
        fx.path("car.csv"),
        "date,type,amount,category\n2025-01-05,gasto,400,Carro\n2025-02-05,gasto,400,Carro\n2025-02-09,gasto,80,Mercado\n",
    )
    .unwrap();

    fx.cmd()
        .args([
            "debts",
            "--debts",
            arg(&fx.path("debts.yaml")),
            "--installments",
            "-t",
            arg(&fx.path("car.csv")),
            "--apply",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installments"))
        .stdout(predicate::str::contains("Applied installments to 1 debt(s)"));

    let debts = balance::storage::load_debts(&fx.path("debts.yaml")).unwrap();
    assert_eq!(debts[0].balance, Money::from_units(200));
    assert_eq!(debts[0].remaining_installments, Some(3));

    let audit = fs::read_to_string(fx.config_dir().join("audit.log")).unwrap();
    assert!(audit.contains("\"operation\":\"amortize\""));
}

#[test]
fn amortize_past_balance_marks_debt_paid() {
    let fx = Fixture::new();
    fs::write(fx.path("debts.yaml"), DEBTS).unwrap();

    fx.cmd()
        .args(["amortize", "car-debt-1", "1500", "--debts", arg(&fx.path("debts.yaml"))])
        .assert()
        .success()
        .stdout(predicate::str::contains("Only $1000.00 was owed"))
        .stdout(predicate::str::contains("Carro is fully paid"));

    let debts = balance::storage::load_debts(&fx.path("debts.yaml")).unwrap();
    assert_eq!(debts[0].balance, Money::zero());
    assert!(debts[0].is_paid());
}

#[test]
fn amortize_unknown_debt_fails() {
    let fx = Fixture::new();
    fs::write(fx.path("debts.yaml"), DEBTS).unwrap();

    fx.cmd()
        .args(["amortize", "nope", "10", "--debts", arg(&fx.path("debts.yaml"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Debt not found: nope"));
}
