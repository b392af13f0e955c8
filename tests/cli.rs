use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ycnews"))
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run ycnews")
}

fn write_config(dir: &Path, api_base_url: &str) -> std::path::PathBuf {
    let path = dir.join("test-config.ron");
    let content = format!(
        "(api_base_url: {:?}, cache_dir: Some({:?}))",
        api_base_url,
        dir.join("cache").display().to_string()
    );
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn prints_version() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "stdout was: {}",
        stdout.trim()
    );
}

#[test]
fn prints_help() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("--view-comments"));
    assert!(stdout.contains("--preview"));
}

#[test]
fn bad_line_reports_error_without_failing() {
    let home = tempfile::tempdir().unwrap();
    let output = run(home.path(), &["--preview", "--line", "no id here"]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("invalid item token"), "stderr was: {stderr}");
    // cache directory is created under HOME
    assert!(home.path().join(".cache/ycnews").is_dir());
}

#[test]
fn list_and_preview_against_mock_api() {
    let mut server = mockito::Server::new();
    let _ids = server
        .mock("GET", "/v0/topstories.json")
        .with_status(200)
        .with_body("[8863]")
        .create();
    let item = server
        .mock("GET", "/v0/item/8863.json")
        .with_status(200)
        .with_body(
            r#"{"by": "dhouston", "id": 8863, "kids": [9224], "score": 104,
                "time": 1175714200, "title": "My YC app: Dropbox", "type": "story",
                "url": "http://www.getdropbox.com/u/2/screencast.html"}"#,
        )
        .expect(1)
        .create();

    let home = tempfile::tempdir().unwrap();
    let config = write_config(home.path(), &format!("{}/v0/", server.url()));
    let config = config.to_str().unwrap();

    let output = run(home.path(), &["--config", config, "--list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    let line = stdout.lines().next().expect("one story line");
    assert!(line.ends_with("My YC app: Dropbox [8863]"), "line was: {line}");

    // the preview callback gets the line back and is answered from the cache
    let output = run(home.path(), &["--config", config, "--preview", "--line", line]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("by:    dhouston"));
    assert!(stdout.contains("id:       8863"));
    assert!(stdout.contains("comments: 1"));

    item.assert();
    assert!(home.path().join("cache/item-8863.json").is_file());
    assert!(home.path().join("cache/logs").is_dir());
}

#[test]
fn broken_explicit_config_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("broken.ron");
    fs::write(&config, "(wrap_width: ").unwrap();

    let output = run(home.path(), &["--config", config.to_str().unwrap(), "--list"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("cannot parse config"), "stderr was: {stderr}");
    assert!(stderr.contains("broken.ron"), "stderr was: {stderr}");
}

#[cfg(unix)]
#[test]
fn interactive_mode_hands_config_to_selector_callbacks() {
    use std::os::unix::fs::PermissionsExt;

    let home = tempfile::tempdir().unwrap();
    let record = home.path().join("selector.log");
    let selector = home.path().join("fzf");
    fs::write(
        &selector,
        format!(
            "#!/bin/sh\n\
             {{\n\
             printf 'DEFAULT=%s\\n' \"$FZF_DEFAULT_COMMAND\"\n\
             for a in \"$@\"; do printf 'ARG=%s\\n' \"$a\"; done\n\
             }} > '{}'\n\
             exit 130\n",
            record.display()
        ),
    )
    .unwrap();
    fs::set_permissions(&selector, fs::Permissions::from_mode(0o755)).unwrap();

    let config = home.path().join("my.ron");
    fs::write(
        &config,
        format!(
            "(api_base_url: \"http://127.0.0.1:9/v0/\", pager: \"more\", selector: {:?})",
            selector.display().to_string()
        ),
    )
    .unwrap();
    let config = config.to_str().unwrap();

    let output = run(home.path(), &["--config", config, "--stories", "ask"]);
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.is_empty(), "stderr was: {stderr}");

    let recorded = fs::read_to_string(&record).expect("selector ran");
    let lines: Vec<_> = recorded.lines().collect();
    let default = lines[0];
    let list = format!("--config {config} --list --stories ask");
    assert!(default.starts_with("DEFAULT="), "{default}");
    assert!(default.ends_with(&list), "{default}");
    assert!(lines.contains(&"ARG=--ansi"));

    let callbacks: Vec<_> = lines.iter().filter(|l| l.contains("--line {}")).collect();
    assert_eq!(callbacks.len(), 5, "{recorded}");
    for line in &callbacks {
        assert!(line.contains(&format!("--config {config} ")), "{line}");
    }
    let enter = lines
        .iter()
        .find(|l| l.starts_with("ARG=--bind=enter:execute("))
        .expect("enter binding");
    assert!(enter.ends_with("--view-comments --line {} | more)"), "{enter}");
}
