use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_r-pickle");

fn run(file: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .arg(file)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute process")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_append_then_decode() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    let output = run(
        &file,
        &["append", "bool:true", "int:-42", "string:hello world", "data:deadbeef"],
    );
    assert!(output.status.success(), "Append failed: {:?}", output);

    let output = run(&file, &["decode", "0", "bool", "int", "string", "data"]);
    assert!(output.status.success(), "Decode failed: {:?}", output);

    let stdout = stdout_of(&output);
    assert!(stdout.contains("bool:true"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("int:-42"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("string:hello world"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("data:deadbeef"), "Unexpected output: {}", stdout);
    assert!(!stdout.contains("UNREAD"), "Every field was decoded");
}

#[test]
fn test_file_contents_are_plain_pickles() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    assert!(run(&file, &["append", "u32:7"]).status.success());
    assert!(run(&file, &["append", "string:second"]).status.success());

    let bytes = std::fs::read(&file).unwrap();
    let mut slices = r_pickle::PickleSlices::new(&bytes);

    let (_, first) = slices.next().expect("first pickle");
    assert_eq!(first.iter().read_u32(), Some(7));
    let (offset, second) = slices.next().expect("second pickle");
    assert_eq!(offset, 8);
    assert_eq!(second.iter().read_string().as_deref(), Some("second"));
    assert!(slices.next().is_none());
}

#[test]
fn test_list_and_info() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    for field in ["int:1", "int:2", "bytes:0102030405"] {
        assert!(run(&file, &["append", field]).status.success());
    }

    let output = run(&file, &["list"]);
    assert!(output.status.success(), "List failed: {:?}", output);
    let stdout = stdout_of(&output);
    let rows: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    assert_eq!(rows.len(), 3, "Unexpected listing: {}", stdout);

    let output = run(&file, &["info"]);
    assert!(output.status.success(), "Info failed: {:?}", output);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("PICKLES:"), "Unexpected output: {}", stdout);
    assert!(
        stdout.lines().any(|line| line.starts_with("PICKLES:") && line.trim_end().ends_with('3')),
        "Unexpected output: {}",
        stdout
    );
}

#[test]
fn test_trailing_garbage_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    assert!(run(&file, &["append", "int:1"]).status.success());
    let mut bytes = std::fs::read(&file).unwrap();
    bytes.extend_from_slice(&[0xff, 0xff]);
    std::fs::write(&file, &bytes).unwrap();

    let output = run(&file, &["list"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("2 trailing byte(s)"));
}

#[test]
fn test_decode_with_wrong_kinds_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    assert!(run(&file, &["append", "int:-2"]).status.success());

    // A negative int is not a valid string length
    let output = run(&file, &["decode", "0", "string"]);
    assert!(!output.status.success(), "Expected decode failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not be read"), "Unexpected error: {}", stderr);

    let output = run(&file, &["decode", "5", "int"]);
    assert!(!output.status.success(), "Expected out-of-range failure");
}

#[test]
fn test_max_size_is_enforced() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    let blob = "ab".repeat(2048);
    let field = format!("data:{}", blob);

    let output = run(&file, &["--max-size", "1k", "append", field.as_str()]);
    assert!(!output.status.success(), "Oversized append must fail");
    assert!(!file.exists(), "Nothing written on failure");

    assert!(run(&file, &["append", field.as_str()]).status.success());
    let output = run(&file, &["list", "--max-size", "1kb"]);
    assert!(!output.status.success(), "Oversized pickle must be rejected");
}

#[test]
fn test_bad_arguments_are_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("data.pkl");

    assert!(!run(&file, &["append", "int:notanumber"]).status.success());
    assert!(!run(&file, &["append", "data:xyz"]).status.success());
    assert!(!run(&file, &["append"]).status.success());
    assert!(!run(&file, &["list"]).status.success(), "Missing file");
    assert!(!run(&file, &["--max-size", "12q", "info"]).status.success());
}

#[test]
fn test_read_commands_need_a_pickle_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.pkl");

    for command in ["list", "info"] {
        let output = run(&missing, &[command]);
        assert!(!output.status.success(), "{} on a missing file", command);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("no pickle file at"), "Unexpected error: {}", stderr);
        assert!(!missing.exists(), "Read commands never create the file");
    }

    let output = run(dir.path(), &["list"]);
    assert!(!output.status.success(), "A directory is not a pickle file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a regular file"), "Unexpected error: {}", stderr);

    let empty = dir.path().join("empty.pkl");
    std::fs::write(&empty, b"").unwrap();
    assert!(run(&empty, &["list"]).status.success(), "An empty file holds no pickles");
}
