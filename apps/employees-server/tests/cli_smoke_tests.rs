//! CLI smoke tests for the employees-server binary
//!
//! These run the built binary and check help output, configuration
//! validation and a real startup that answers `/health`.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::{sleep, timeout, Instant};

/// Helper to run the employees-server binary with given arguments
fn run_employees_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_employees-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute employees-server")
}

/// Write a config whose home_dir points into the temp dir.
fn write_config(dir: &Path, name: &str, body: &str) -> String {
    let home = dir.join("home");
    let content = format!(
        "server:\n  home_dir: \"{}\"\n  host: \"127.0.0.1\"\n  port: 8080\n{}",
        home.to_string_lossy().replace('\\', "/"),
        body
    );
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

const LOGGING: &str = r#"
logging:
  default:
    console_level: error
    file: "logs/employees.log"
    file_level: info
    max_backups: 3
    max_size_mb: 10
"#;

#[test]
fn test_cli_help_command() {
    let output = run_employees_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("employees-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_employees_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("employees-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_employees_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("unrecognized"),
        "Should contain error message about invalid command: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_employees_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config file not found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_flag_short_form() {
    let output = run_employees_server(&["-c", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "{}", stderr);
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_employees_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("YAML") || stderr.contains("parse"),
        "Should mention YAML parsing issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!("database:\n  url: \"sqlite://database/test.db\"\n{LOGGING}");
    let config_path = write_config(temp_dir.path(), "valid.yaml", &body);

    let output = run_employees_server(&["--config", &config_path, "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success(), "Should succeed with valid config");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"), "{}", stdout);
}

#[test]
fn test_cli_check_rejects_unknown_database_scheme() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!("database:\n  url: \"mysql://localhost/db\"\n{LOGGING}");
    let config_path = write_config(temp_dir.path(), "mysql.yaml", &body);

    let output = run_employees_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown DSN"), "{}", stderr);
}

#[test]
fn test_cli_mock_flag_overrides_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!("database:\n  url: \"mysql://localhost/nonexistent\"\n{LOGGING}");
    let config_path = write_config(temp_dir.path(), "mock.yaml", &body);

    let output = run_employees_server(&["--config", &config_path, "--mock", "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(
        output.status.success(),
        "Should succeed with mock database even if the configured one is unusable"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sqlite::memory:"), "{}", stdout);
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!("database:\n  url: \"sqlite://database/test.db\"\n{LOGGING}");
    let config_path = write_config(temp_dir.path(), "print.yaml", &body);

    let output = run_employees_server(&["--config", &config_path, "--port", "9123", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9123"), "{}", stdout);
}

#[test]
fn test_cli_run_rejects_invalid_bind_address() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let home = temp_dir.path().join("home");
    let content = format!(
        "server:\n  home_dir: \"{}\"\n  host: \"not a host\"\n  port: 8080\ndatabase:\n  url: \"sqlite::memory:\"\n{LOGGING}",
        home.to_string_lossy().replace('\\', "/"),
    );
    let config_path = temp_dir.path().join("badhost.yaml");
    std::fs::write(&config_path, content).expect("Failed to write config file");

    let output = run_employees_server(&["--config", config_path.to_str().unwrap(), "run"]);

    assert!(!output.status.success(), "Should fail with invalid bind address");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid bind address"), "{}", stderr);
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_employees_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Start the server"));

    let output = run_employees_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Check configuration"));
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Failed to find a free port")
}

async fn http_get(port: u16, path: &str) -> std::io::Result<String> {
    let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", port)).await?;
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await?;
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

#[tokio::test]
async fn test_cli_run_with_mock_database_serves_health() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = format!("database:\n  url: \"sqlite://database/unused.db\"\n{LOGGING}");
    let config_path = write_config(temp_dir.path(), "run.yaml", &body);
    let port = free_port();

    let mut child = tokio::process::Command::new(env!("CARGO_BIN_EXE_employees-server"))
        .args(["--config", &config_path, "--mock", "--port", &port.to_string(), "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn employees-server");

    let deadline = Instant::now() + Duration::from_secs(20);
    let health = loop {
        if let Ok(resp) = http_get(port, "/health").await {
            break resp;
        }
        assert!(Instant::now() < deadline, "server did not come up in time");
        sleep(Duration::from_millis(100)).await;
    };
    assert!(health.starts_with("HTTP/1.1 200"), "{}", health);
    assert!(health.contains("\"status\":\"healthy\""), "{}", health);
    assert!(health.to_ascii_lowercase().contains("x-request-id:"), "{}", health);

    let list = http_get(port, "/api/v1/employees").await.expect("list request");
    assert!(list.starts_with("HTTP/1.1 200"), "{}", list);
    assert!(list.ends_with("[]"), "{}", list);

    child.start_kill().expect("Failed to stop server");
    let _ = timeout(Duration::from_secs(5), child.wait()).await;
}
