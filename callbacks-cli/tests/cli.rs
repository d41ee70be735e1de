// Runs the built binary and checks what it prints
use std::io::Write;
use std::process::{Command, Output};

const EXPECTED: &str = "Hello world!\nHello from handler 1\nHello from handler 2\n";

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_callbacks-cli"))
        .args(args)
        .output()
        .expect("failed to run callbacks-cli")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn default_run_prints_greeting_then_handlers() {
    let output = run_cli(&[]);
    assert!(output.status.success());
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), EXPECTED);
}

#[test]
fn ffi_run_matches_native_output() {
    let output = run_cli(&["--ffi", "-vv"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), EXPECTED);

    // Logs stay on stderr
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("C interface"));
}

#[test]
fn rounds_flag_repeats_dispatch() {
    let output = run_cli(&["--rounds", "2", "-q"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Hello world!\nHello from handler 1\nHello from handler 2\nHello from handler 1\nHello from handler 2\n"
    );
}

#[test]
fn config_file_drives_handlers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
greeting = "Start"

[[handlers]]
message = "first"

[[handlers]]
message = "second"

[[handlers]]
message = "third"
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let output = run_cli(&["--config", path, "-q"]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Start\nfirst\nsecond\nthird\n");
}

#[test]
fn print_config_emits_json() {
    let output = run_cli(&["--print-config", "--rounds", "3", "-q"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["rounds"], 3);
    assert_eq!(value["greeting"], "Hello world!");
}

#[test]
fn missing_plugin_library_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[[handlers]]\nlibrary = \"/nonexistent/libplugin.so\"\nsymbol = \"on_dispatch\""
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let output = run_cli(&["--config", path, "-q"]);
    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn plugin_handler_runs_in_registration_order() {
    let plugin = env!("CALLBACKS_FIXTURE_PLUGIN");
    if plugin.is_empty() {
        println!("Plugin fixture not built, skipping");
        return;
    }

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
rounds = 2

[[handlers]]
message = "before"

[[handlers]]
library = "{}"
symbol = "fixture_on_dispatch"

[[handlers]]
message = "after"
"#,
        plugin
    )
    .unwrap();

    let path = file.path().to_str().unwrap();
    let expected = "Hello world!\nbefore\nHello from plugin\nafter\nbefore\nHello from plugin\nafter\n";

    for extra in [None, Some("--ffi")] {
        let mut args = vec!["--config", path, "-q"];
        args.extend(extra);

        let output = run_cli(&args);
        assert!(output.status.success(), "args = {:?}", args);
        assert_eq!(stdout_of(&output), expected, "args = {:?}", args);
    }
}
