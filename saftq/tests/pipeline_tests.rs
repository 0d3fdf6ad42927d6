use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Abstraction for managing a saftq test environment.
struct SaftqTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

const HEADER: &str = "InvoiceDate,ProductCode,ProductDescription,Quantity,UnitPrice,CreditAmount,LineNumber,TaxPercentage";

impl SaftqTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        Ok(Self { _tmp: tmp, root })
    }

    fn write_csv(&self, name: &str, rows: &[&str]) -> Result<PathBuf> {
        let mut content = format!("{HEADER}\n");
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        let path = self.root.join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn saftq(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("saftq"));
        cmd.current_dir(&self.root);
        cmd
    }
}

fn clean_rows() -> Vec<&'static str> {
    vec![
        "2024-01-02,P1,Pao de Trigo,2,1.5,3.0,1,23",
        "2024-01-03,P2,Croissant,1,4.0,4.0,2,23",
        "2024-01-03,P3,Bolo de Arroz,3,1.2,3.6,3,6",
    ]
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

#[test]
fn test_run_produces_output_and_reports() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    let input = env.write_csv("vendas.csv", &clean_rows())?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(env.path("limpo.csv"))
        .arg("--report-dir")
        .arg(env.path("relatorios"))
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    assert!(env.path("limpo.csv").exists());

    let report = read_json(&env.path("relatorios/quality_report.json"))?;
    assert_eq!(report["dataset"], "vendas");
    assert_eq!(report["total"], 23);
    assert_eq!(report["status"], "Excelente");

    let summary = read_json(&env.path("relatorios/pipeline_summary.json"))?;
    assert_eq!(summary["rows_in"], 3);
    assert_eq!(summary["rows_out"], 3);
    Ok(())
}

#[test]
fn test_run_missing_input_fails_with_message() -> Result<()> {
    let env = SaftqTestEnv::new()?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(env.path("nao_existe.csv"))
        .arg("--output")
        .arg(env.path("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    Ok(())
}

#[test]
fn test_run_unsupported_format_fails() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    std::fs::write(env.path("vendas.parquet"), b"junk")?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(env.path("vendas.parquet"))
        .arg("--output")
        .arg(env.path("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported"));
    Ok(())
}

#[test]
fn test_run_quality_failures_do_not_fail_the_command() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    // Billing mismatch: 2 * 1.5 != 9.9. The row survives cleaning, so the
    // consistency check must flag it in the report while the run succeeds.
    let input = env.write_csv(
        "vendas.csv",
        &[
            "2024-01-02,P1,Pao de Trigo,2,1.5,9.9,1,23",
            "2024-01-03,P2,Croissant,1,4.0,4.0,2,23",
        ],
    )?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(env.path("limpo.csv"))
        .arg("--report-dir")
        .arg(env.path("relatorios"))
        .assert()
        .success();

    let report = read_json(&env.path("relatorios/quality_report.json"))?;
    assert!(report["failed"].as_u64().unwrap() >= 1);
    let failing: Vec<&str> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["passed"] == false)
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert!(failing.iter().any(|name| name.contains("billing")));
    Ok(())
}

#[test]
fn test_run_full_clean_removes_duplicates() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    let mut rows = clean_rows();
    rows.push("2024-01-02,P1,Pao de Trigo,2,1.5,3.0,1,23"); // exact duplicate

    let input = env.write_csv("vendas.csv", &rows)?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(env.path("limpo.csv"))
        .arg("--report-dir")
        .arg(env.path("relatorios"))
        .arg("--full-clean")
        .assert()
        .success();

    let summary = read_json(&env.path("relatorios/pipeline_summary.json"))?;
    assert_eq!(summary["rows_in"], 4);
    assert_eq!(summary["rows_out"], 3);
    Ok(())
}

#[test]
fn test_env_overrides_billing_tolerance() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    // 2 * 1.5 = 3.0; CreditAmount 3.4 deviates by 0.4, outside the default
    // 0.01 tolerance but inside an overridden 0.5.
    let input = env.write_csv(
        "vendas.csv",
        &["2024-01-02,P1,Pao de Trigo,2,1.5,3.4,1,23"],
    )?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(env.path("limpo.csv"))
        .arg("--report-dir")
        .arg(env.path("relatorios"))
        .env("SAFTQ_BILLING_TOLERANCE", "0.5")
        .assert()
        .success();

    let report = read_json(&env.path("relatorios/quality_report.json"))?;
    let billing = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "consistent billing")
        .unwrap();
    assert_eq!(billing["passed"], true);
    Ok(())
}

#[test]
fn test_env_override_coerce_policy_drop_row() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    let mut rows = clean_rows();
    rows.push("not-a-date,P4,Mil Folhas,1,2.0,2.0,4,23"); // unparseable date

    let input = env.write_csv("vendas.csv", &rows)?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(env.path("limpo.csv"))
        .arg("--report-dir")
        .arg(env.path("relatorios"))
        .env("SAFTQ_COERCE_POLICY", "drop_row")
        .assert()
        .success();

    // Under the default nullify policy the row would survive with a null
    // date; drop_row removes it entirely.
    let summary = read_json(&env.path("relatorios/pipeline_summary.json"))?;
    assert_eq!(summary["rows_in"], 4);
    assert_eq!(summary["rows_out"], 3);
    assert_eq!(summary["coercion_failures"], 1);
    Ok(())
}

#[test]
fn test_env_override_unknown_policy_is_ignored() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    let mut rows = clean_rows();
    rows.push("not-a-date,P4,Mil Folhas,1,2.0,2.0,4,23");

    let input = env.write_csv("vendas.csv", &rows)?;

    env.saftq()
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(env.path("limpo.csv"))
        .arg("--report-dir")
        .arg(env.path("relatorios"))
        .env("SAFTQ_COERCE_POLICY", "banana")
        .assert()
        .success();

    // Unknown values fall back to the configured default (nullify), so the
    // bad-date row is kept with its cell nulled.
    let summary = read_json(&env.path("relatorios/pipeline_summary.json"))?;
    assert_eq!(summary["rows_in"], 4);
    assert_eq!(summary["rows_out"], 4);
    assert_eq!(summary["coercion_failures"], 1);
    Ok(())
}

#[test]
fn test_check_reports_status_without_cleaning() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    let input = env.write_csv("vendas.csv", &clean_rows())?;

    env.saftq()
        .arg("check")
        .arg("--input")
        .arg(&input)
        .arg("--report")
        .arg(env.path("auditoria.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Excelente"));

    // The audited file is untouched
    let report = read_json(&env.path("auditoria.json"))?;
    assert_eq!(report["total"], 23);
    assert!(input.exists());
    Ok(())
}

#[test]
fn test_inspect_lists_columns() -> Result<()> {
    let env = SaftqTestEnv::new()?;
    let input = env.write_csv("vendas.csv", &clean_rows())?;

    env.saftq()
        .arg("inspect")
        .arg("--input")
        .arg(&input)
        .arg("--limit")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("InvoiceDate"))
        .stdout(predicate::str::contains("Croissant"))
        .stdout(predicate::str::contains("3 rows x 8 columns"));
    Ok(())
}
