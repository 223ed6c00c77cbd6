use assert_cmd::prelude::*;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

const USER_JSON: &str = r#"{"id": "u1", "email": "a@b.com", "full_name": "Ada", "is_active": true, "is_superuser": false}"#;

/// Nothing listens on the discard port, so requests fail fast
const UNREACHABLE_HOST: &str = "http://127.0.0.1:9";

struct Workspace {
    _temp: TempDir,
    config: PathBuf,
    token_file: PathBuf,
}

fn workspace(stored_token: Option<&str>) -> Workspace {
    let temp = tempdir().expect("failed to create temp dir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, "session:\n  validation_timeout_secs: 5\n").expect("failed to write config");

    let token_file = temp.path().join("session.yaml");
    if let Some(token) = stored_token {
        fs::write(&token_file, format!("access_token: {}\n", token)).expect("failed to write token");
    }

    Workspace {
        _temp: temp,
        config,
        token_file,
    }
}

fn sessiongate(config: &Path, api_host: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sessiongate"));
    cmd.arg("--config")
        .arg(config)
        .arg("--api-host")
        .arg(api_host)
        .env_remove("SESSIONGATE_CONFIG")
        .env_remove("SESSIONGATE_API_HOST")
        .env_remove("SESSIONGATE_FORMAT")
        .env_remove("SESSIONGATE_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn stored_token(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    contents
        .lines()
        .find_map(|line| line.strip_prefix("access_token:"))
        .map(|value| value.trim().to_string())
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn routes_lists_every_route() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(None);

    sessiongate(&ws.config, UNREACHABLE_HOST)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/recover-password"))
        .stdout(predicate::str::contains("protected"))
        .stdout(predicate::str::contains("SUPERUSER"));

    Ok(())
}

#[test]
fn routes_json_uses_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(None);

    let output = sessiongate(&ws.config, UNREACHABLE_HOST)
        .args(["routes", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["meta"]["command"], "routes");
    assert_eq!(value["data"].as_array().map(Vec::len), Some(10));
    assert_eq!(value["data"][1]["path"], "/dashboard");
    assert_eq!(value["data"][1]["access"], "protected");

    Ok(())
}

#[test]
fn visit_protected_without_token_redirects_to_login() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let me = server.mock("GET", "/api/v1/users/me").expect(0).create();
    let ws = workspace(None);

    let output = sessiongate(&ws.config, &server.url())
        .args(["visit", "/items", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["route"], "items");
    assert_eq!(value["data"]["decision"]["decision"], "redirect");
    assert_eq!(value["data"]["decision"]["route"], "login");
    assert_eq!(value["data"]["location"], "login");
    assert_eq!(value["data"]["session"]["status"], "unauthenticated");

    me.assert();
    Ok(())
}

#[test]
fn visit_unknown_path_renders_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(None);

    let output = sessiongate(&ws.config, UNREACHABLE_HOST)
        .args(["visit", "/does/not/exist", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["class"], "neutral");
    assert_eq!(value["data"]["decision"]["decision"], "render");
    assert_eq!(value["data"]["decision"]["route"], "not_found");

    Ok(())
}

#[test]
fn visit_protected_with_valid_token_renders() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let me = server
        .mock("GET", "/api/v1/users/me")
        .match_header("authorization", "Bearer abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USER_JSON)
        .expect(1)
        .create();
    let ws = workspace(Some("abc123"));

    sessiongate(&ws.config, &server.url())
        .args(["visit", "/items"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Items"))
        .stdout(predicate::str::contains("Signed in as Ada"));

    me.assert();
    assert_eq!(stored_token(&ws.token_file).as_deref(), Some("abc123"));
    Ok(())
}

#[test]
fn authenticated_visit_to_login_redirects_to_dashboard() -> Result<(), Box<dyn std::error::Error>>
{
    let mut server = mockito::Server::new();
    let _me = server
        .mock("GET", "/api/v1/users/me")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USER_JSON)
        .create();
    let ws = workspace(Some("abc123"));

    let output = sessiongate(&ws.config, &server.url())
        .args(["visit", "/login", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["decision"]["decision"], "redirect");
    assert_eq!(value["data"]["decision"]["route"], "dashboard");
    assert_eq!(value["data"]["session"]["user"]["id"], "u1");

    Ok(())
}

#[test]
fn status_with_rejected_token_clears_store() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let me = server
        .mock("GET", "/api/v1/users/me")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Could not validate credentials"}"#)
        .expect(1)
        .create();
    let ws = workspace(Some("expired"));

    let output = sessiongate(&ws.config, &server.url())
        .args(["status", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["status"], "unauthenticated");
    assert!(value["data"]["user"].is_null());

    me.assert();
    assert_eq!(stored_token(&ws.token_file), None);
    Ok(())
}

#[test]
fn status_with_unreachable_backend_signs_out() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(Some("abc123"));

    sessiongate(&ws.config, UNREACHABLE_HOST)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));

    assert_eq!(stored_token(&ws.token_file), None);
    Ok(())
}

#[test]
fn login_stores_token_and_lands_on_dashboard() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/api/v1/login/access-token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "a@b.com".into()),
            Matcher::UrlEncoded("password".into(), "x".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "newtok", "token_type": "bearer"}"#)
        .expect(1)
        .create();
    let me = server
        .mock("GET", "/api/v1/users/me")
        .match_header("authorization", "Bearer newtok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(USER_JSON)
        .expect(1)
        .create();
    let ws = workspace(None);

    let output = sessiongate(&ws.config, &server.url())
        .args(["login", "--email", "a@b.com", "--password", "x", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["user"]["email"], "a@b.com");
    assert_eq!(value["data"]["location"], "dashboard");

    login.assert();
    me.assert();
    assert_eq!(stored_token(&ws.token_file).as_deref(), Some("newtok"));
    Ok(())
}

#[test]
fn login_with_wrong_password_reports_detail() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _login = server
        .mock("POST", "/api/v1/login/access-token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Incorrect email or password"}"#)
        .create();
    let ws = workspace(None);

    sessiongate(&ws.config, &server.url())
        .args(["login", "--email", "a@b.com", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect email or password"));

    assert_eq!(stored_token(&ws.token_file), None);
    Ok(())
}

#[test]
fn login_rejects_malformed_email_without_request() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/api/v1/login/access-token")
        .expect(0)
        .create();
    let ws = workspace(None);

    sessiongate(&ws.config, &server.url())
        .args(["login", "--email", "not-an-email", "--password", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email address"));

    login.assert();
    Ok(())
}

#[test]
fn logout_works_offline() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(Some("abc123"));

    sessiongate(&ws.config, UNREACHABLE_HOST)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    assert_eq!(stored_token(&ws.token_file), None);

    // Signing out twice is fine
    sessiongate(&ws.config, UNREACHABLE_HOST)
        .arg("logout")
        .assert()
        .success();

    Ok(())
}

#[test]
fn signup_redirects_to_login_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let signup = server
        .mock("POST", "/api/v1/users/signup")
        .match_body(Matcher::PartialJsonString(
            r#"{"email": "new@b.com", "password": "longenough"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "u9", "email": "new@b.com", "is_active": true, "is_superuser": false}"#)
        .expect(1)
        .create();
    let login = server
        .mock("POST", "/api/v1/login/access-token")
        .expect(0)
        .create();
    let ws = workspace(None);

    let output = sessiongate(&ws.config, &server.url())
        .args([
            "signup",
            "--email",
            "new@b.com",
            "--password",
            "longenough",
            "--format",
            "json",
        ])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["outcome"], "awaiting_login");
    assert_eq!(value["data"]["user"]["id"], "u9");

    signup.assert();
    login.assert();
    assert_eq!(stored_token(&ws.token_file), None);
    Ok(())
}

#[test]
fn signup_with_auto_login_policy_stores_token() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let signup = server
        .mock("POST", "/api/v1/users/signup")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "u9", "email": "new@b.com", "is_active": true, "is_superuser": false}"#)
        .expect(1)
        .create();
    let login = server
        .mock("POST", "/api/v1/login/access-token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "new@b.com".into()),
            Matcher::UrlEncoded("password".into(), "longenough".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "signup-tok", "token_type": "bearer"}"#)
        .expect(1)
        .create();
    let me = server
        .mock("GET", "/api/v1/users/me")
        .match_header("authorization", "Bearer signup-tok")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "u9", "email": "new@b.com", "is_active": true, "is_superuser": false}"#)
        .expect(1)
        .create();
    let ws = workspace(None);

    sessiongate(&ws.config, &server.url())
        .args(["config", "set-signup-policy", "auto-login"])
        .assert()
        .success();
    assert!(fs::read_to_string(&ws.config)?.contains("signup_policy: auto_login"));

    let output = sessiongate(&ws.config, &server.url())
        .args([
            "signup",
            "--email",
            "new@b.com",
            "--password",
            "longenough",
            "--format",
            "json",
        ])
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["outcome"], "signed_in");
    assert_eq!(value["data"]["user"]["email"], "new@b.com");

    signup.assert();
    login.assert();
    me.assert();
    assert_eq!(stored_token(&ws.token_file).as_deref(), Some("signup-tok"));
    Ok(())
}

#[test]
fn signup_rejects_short_password_without_request() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let signup = server.mock("POST", "/api/v1/users/signup").expect(0).create();
    let ws = workspace(None);

    sessiongate(&ws.config, &server.url())
        .args(["signup", "--email", "new@b.com", "--password", "short"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    signup.assert();
    Ok(())
}

#[test]
fn recover_sends_email() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let recover = server
        .mock(
            "POST",
            Matcher::Regex(r"^/api/v1/password-recovery/a(@|%40)b\.com$".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Password recovery email sent"}"#)
        .expect(1)
        .create();
    let ws = workspace(None);

    sessiongate(&ws.config, &server.url())
        .args(["recover", "a@b.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password recovery email sent"));

    recover.assert();
    Ok(())
}

#[test]
fn reset_password_posts_token() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let reset = server
        .mock("POST", "/api/v1/reset-password/")
        .match_body(Matcher::Json(serde_json::json!({
            "token": "reset-token",
            "new_password": "longenough"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Password updated successfully"}"#)
        .expect(1)
        .create();
    let ws = workspace(None);

    sessiongate(&ws.config, &server.url())
        .args([
            "reset-password",
            "--token",
            "reset-token",
            "--new-password",
            "longenough",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password updated successfully"));

    reset.assert();
    Ok(())
}

#[test]
fn config_set_host_is_used_by_show() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(None);

    Command::new(assert_cmd::cargo::cargo_bin!("sessiongate"))
        .args(["config", "set-host", "https://api.example.com/"])
        .arg("--config")
        .arg(&ws.config)
        .env_remove("SESSIONGATE_API_HOST")
        .assert()
        .success();

    let output = Command::new(assert_cmd::cargo::cargo_bin!("sessiongate"))
        .args(["config", "show", "--format", "json"])
        .arg("--config")
        .arg(&ws.config)
        .env_remove("SESSIONGATE_API_HOST")
        .output()?;
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["data"]["effective_api_host"], "https://api.example.com");
    assert_eq!(value["data"]["session"]["validation_timeout_secs"], 5);

    Ok(())
}

#[test]
fn completion_generates_script() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("sessiongate"))
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sessiongate"));

    Ok(())
}

#[test]
fn malformed_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace(None);
    fs::write(&ws.config, "session: [not, a, map]\n")?;

    sessiongate(&ws.config, UNREACHABLE_HOST)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));

    Ok(())
}
