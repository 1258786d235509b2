use chrono::{Duration, NaiveTime, Utc};
use lifelog_core::{Database, HealthMetric};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_data: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_data = base.join("xdg-data");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_data).expect("failed to create XDG_DATA_HOME");
        fs::create_dir_all(xdg_config.join("lifelog")).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        // Pin the calendar so "today" matches the timestamps below
        fs::write(
            xdg_config.join("lifelog/config.toml"),
            "[analytics]\ntimezone = \"utc\"\ndefault_range = \"week\"\n",
        )
        .expect("failed to write config");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_data,
            xdg_config,
            xdg_state,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.xdg_data.join("lifelog/data.db")
    }
}

fn run_bin(env: &CliTestEnv, bin_name: &str, args: &[&str]) -> Output {
    let bin_path = match bin_name {
        "lifelog" => PathBuf::from(assert_cmd::cargo::cargo_bin!("lifelog")),
        "lifelog-analytics" => PathBuf::from(assert_cmd::cargo::cargo_bin!("lifelog-analytics")),
        "lifelog-export" => PathBuf::from(assert_cmd::cargo::cargo_bin!("lifelog-export")),
        _ => panic!("unsupported binary in test harness: {bin_name}"),
    };

    let mut command = Command::new(bin_path);

    command
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_DATA_HOME", &env.xdg_data)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute {bin_name}: {e}"))
}

fn assert_success(bin_name: &str, args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "{bin_name} {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

fn run_ok(env: &CliTestEnv, bin_name: &str, args: &[&str]) -> String {
    let output = run_bin(env, bin_name, args);
    assert_success(bin_name, args, &output);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Id printed in parentheses at the end of a "Logged ..." line.
fn logged_id(stdout: &str) -> String {
    let line = stdout.trim();
    let open = line.rfind('(').expect("no id in output");
    line[open + 1..line.len() - 1].to_string()
}

/// An RFC3339 timestamp on today's UTC date.
fn today_at(hour: u32) -> String {
    Utc::now()
        .date_naive()
        .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .and_utc()
        .to_rfc3339()
}

fn days_ago_at(days: i64, hour: u32) -> String {
    (Utc::now().date_naive() - Duration::days(days))
        .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .and_utc()
        .to_rfc3339()
}

#[test]
fn today_summarizes_logged_entries() {
    let env = CliTestEnv::new();
    let morning = today_at(1);
    let noon = today_at(2);

    run_ok(&env, "lifelog", &["mood", "8", "--at", morning.as_str()]);
    run_ok(&env, "lifelog", &["mood", "6", "--notes", "tired", "--at", noon.as_str()]);
    run_ok(
        &env,
        "lifelog",
        &["meal", "Oatmeal", "--calories", "300", "-m", "breakfast", "--at", morning.as_str()],
    );
    run_ok(&env, "lifelog", &["income", "100", "--at", morning.as_str()]);
    run_ok(
        &env,
        "lifelog",
        &["expense", "40.5", "-d", "groceries", "--at", noon.as_str()],
    );
    run_ok(&env, "lifelog", &["health", "steps", "5400", "--at", noon.as_str()]);

    let json = run_ok(&env, "lifelog", &["today", "--format", "json"]);
    let summary: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");

    assert_eq!(summary["mood_average"], 7.0);
    assert_eq!(summary["mood_count"], 2);
    assert_eq!(summary["total_calories"], 300.0);
    assert_eq!(summary["total_income"], 100.0);
    assert_eq!(summary["total_expenses"], 40.5);
    assert_eq!(summary["net_amount"], 59.5);
    assert_eq!(summary["steps"], 5400.0);

    let text = run_ok(&env, "lifelog", &["today"]);
    assert!(text.contains("Net:       +59.50"), "got:\n{text}");
    assert!(text.contains("Steps:     5,400"), "got:\n{text}");
}

#[test]
fn invalid_mood_is_rejected_and_not_stored() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, "lifelog", &["mood", "11"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mood"), "got:\n{stderr}");

    let db = Database::open(&env.db_path()).expect("failed to open db");
    db.migrate().expect("failed to migrate db");
    assert_eq!(db.count_entries().expect("failed to count").mood, 0);
}

#[test]
fn delete_removes_record_once() {
    let env = CliTestEnv::new();

    let stdout = run_ok(&env, "lifelog", &["mood", "5"]);
    let id = logged_id(&stdout);

    run_ok(&env, "lifelog", &["delete", "mood", id.as_str()]);

    let again = run_bin(&env, "lifelog", &["delete", "mood", id.as_str()]);
    assert!(!again.status.success());
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(stderr.contains("not found"), "got:\n{stderr}");
}

#[test]
fn health_readings_replace_same_day() {
    let env = CliTestEnv::new();

    run_ok(&env, "lifelog", &["health", "steps", "3000", "--at", today_at(1).as_str()]);
    run_ok(&env, "lifelog", &["health", "steps", "7000", "--at", today_at(2).as_str()]);

    let db = Database::open(&env.db_path()).expect("failed to open db");
    db.migrate().expect("failed to migrate db");
    let readings = db
        .recent_health(HealthMetric::Steps, 10)
        .expect("failed to list readings");
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].value, 7000.0);
}

#[test]
fn analytics_week_report_is_gapless() {
    let env = CliTestEnv::new();

    run_ok(&env, "lifelog", &["mood", "4", "--at", days_ago_at(3, 9).as_str()]);
    run_ok(&env, "lifelog", &["mood", "8", "--at", today_at(1).as_str()]);
    run_ok(&env, "lifelog", &["income", "250", "--at", days_ago_at(7, 9).as_str()]);
    // Outside the week
    run_ok(&env, "lifelog", &["expense", "999", "--at", days_ago_at(8, 9).as_str()]);

    let args = ["--range", "week", "--format", "json"];
    let json = run_ok(&env, "lifelog-analytics", &args);
    let report: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");

    let mood = report["mood_trend"]["points"].as_array().expect("points");
    assert_eq!(mood.len(), 8);
    assert_eq!(report["finance_trend"].as_array().expect("finance").len(), 8);
    assert_eq!(report["health_trend"]["points"].as_array().expect("health").len(), 8);

    assert_eq!(report["summary"]["avg_mood"], 6.0);
    assert_eq!(report["summary"]["total_income"], 250.0);
    assert_eq!(report["summary"]["total_expenses"], 0.0);
    assert!(report["summary"]["avg_calories"].is_null());
    assert!(report["unavailable"].as_array().expect("unavailable").is_empty());

    let text = run_ok(&env, "lifelog-analytics", &[]);
    assert!(text.contains("Analytics: last week"), "got:\n{text}");
    assert!(text.contains("Average calories:  —"), "got:\n{text}");
}

#[test]
fn export_writes_selected_sections() {
    let env = CliTestEnv::new();

    run_ok(&env, "lifelog", &["mood", "7", "--notes", "a \"good\" day", "--at", today_at(1).as_str()]);
    run_ok(&env, "lifelog", &["expense", "12", "-c", "food", "--at", today_at(2).as_str()]);

    let csv = run_ok(&env, "lifelog-export", &["--range", "month"]);
    assert!(csv.starts_with("MOOD DATA\nDate,Time,Mood Level,Notes\n"), "got:\n{csv}");
    assert!(csv.contains(",7,\"a \"\"good\"\" day\"\n"), "got:\n{csv}");
    assert!(csv.contains("FINANCIAL DATA\n"));
    assert!(!csv.contains("NUTRITION DATA"));

    let without_mood = run_ok(&env, "lifelog-export", &["--no-mood"]);
    assert!(without_mood.starts_with("FINANCIAL DATA\n"), "got:\n{without_mood}");

    let out_dir = env.home.join("exports");
    fs::create_dir_all(&out_dir).expect("failed to create export dir");
    let dir_arg = out_dir.to_string_lossy().into_owned();
    let output = run_bin(&env, "lifelog-export", &["--dir", dir_arg.as_str()]);
    assert_success("lifelog-export", &["--dir", dir_arg.as_str()], &output);

    let written: Vec<_> = fs::read_dir(&out_dir)
        .expect("failed to read export dir")
        .map(|e| e.expect("bad entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("lifelog_export_week_"), "got {:?}", written);
}

#[test]
fn edit_replaces_meal_and_transaction() {
    let env = CliTestEnv::new();
    let at = today_at(1);

    let stdout = run_ok(
        &env,
        "lifelog",
        &["meal", "Toast", "--calories", "150", "--at", at.as_str()],
    );
    let meal_id = logged_id(&stdout);
    let stdout = run_ok(&env, "lifelog", &["expense", "20", "--at", at.as_str()]);
    let money_id = logged_id(&stdout);

    run_ok(
        &env,
        "lifelog",
        &["edit", "meal", meal_id.as_str(), "Toast", "--calories", "260"],
    );
    run_ok(&env, "lifelog", &["edit", "income", money_id.as_str(), "35"]);

    let json = run_ok(&env, "lifelog", &["today", "--format", "json"]);
    let summary: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");
    assert_eq!(summary["total_calories"], 260.0);
    assert_eq!(summary["total_income"], 35.0);
    assert_eq!(summary["total_expenses"], 0.0);

    let missing = run_bin(&env, "lifelog", &["edit", "income", "no-such-id", "5"]);
    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(stderr.contains("not found"), "got:\n{stderr}");
}
