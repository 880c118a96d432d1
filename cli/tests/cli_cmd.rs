use std::process::Command;

/// Runs the binary from an empty directory with no keys or config in the environment.
fn run_vibecut(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().expect("tempdir");
    Command::new(env!("CARGO_BIN_EXE_vibecut"))
        .args(args)
        .current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("VIDEODB_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("VIBECUT_COLLECTION")
        .env_remove("LOG_FILE")
        .output()
        .expect("failed to run vibecut binary")
}

#[test]
fn cli_help_succeeds() {
    let out = run_vibecut(&["--help"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("VibeCut"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("presets"));
}

#[test]
fn cli_presets_json_lists_three() {
    let out = run_vibecut(&["presets", "--json"]);
    assert!(out.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("presets output is JSON");
    let names: Vec<&str> = value
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|p| p["preset"].as_str())
        .collect();
    assert_eq!(names, vec!["highlights", "reels", "custom"]);
}

#[test]
fn cli_presets_text() {
    let out = run_vibecut(&["presets"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Social Media Reel"));
    assert!(stdout.contains("9:16"));
}

#[test]
fn cli_run_without_keys_reports_missing_configuration() {
    let out = run_vibecut(&["run", "Create a 30-second highlight reel", "--collection", "c1"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing required configuration"), "{}", stderr);
    assert!(stderr.contains("VIDEODB_API_KEY"), "{}", stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "{}", stderr);
}

#[test]
fn cli_run_unknown_preset_fails_before_settings() {
    let out = run_vibecut(&[
        "run",
        "make a vlog",
        "--collection",
        "c1",
        "--preset",
        "documentary",
    ]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown preset"), "{}", stderr);
}

#[test]
fn cli_run_requires_collection() {
    let out = run_vibecut(&["run", "Create a highlight reel"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--collection"), "{}", stderr);
}

#[test]
fn cli_ingest_rejects_unsupported_format() {
    let out = Command::new(env!("CARGO_BIN_EXE_vibecut"))
        .args(["ingest", "https://example.com/notes.txt", "--collection", "c1"])
        .env("VIDEODB_API_KEY", "vdb-test")
        .env("OPENAI_API_KEY", "sk-test")
        .env("VIDEODB_BASE_URL", "http://127.0.0.1:1")
        .env_remove("LOG_FILE")
        .output()
        .expect("failed to run vibecut binary");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unsupported video format"), "{}", stderr);
}

/// **Scenario**: every URL is attempted; each failure is listed on stderr with a summary.
#[test]
fn cli_ingest_reports_every_failed_url() {
    let out = Command::new(env!("CARGO_BIN_EXE_vibecut"))
        .args([
            "ingest",
            "https://example.com/notes.txt",
            "https://example.com/match.mp4",
            "--collection",
            "c1",
        ])
        .env("VIDEODB_API_KEY", "vdb-test")
        .env("OPENAI_API_KEY", "sk-test")
        .env("VIDEODB_BASE_URL", "http://127.0.0.1:1")
        .env_remove("LOG_FILE")
        .output()
        .expect("failed to run vibecut binary");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("https://example.com/notes.txt: "), "{}", stderr);
    assert!(stderr.contains("https://example.com/match.mp4: "), "{}", stderr);
    assert!(stderr.contains("2 of 2 videos failed"), "{}", stderr);
}
