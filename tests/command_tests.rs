use sched_trace_pprof::commands::{execute_all, execute_profile, validate_args, ProfileArgs};
use sched_trace_pprof::output::{read_pprof, read_profile_json};
use sched_trace_pprof::AnalysisKind;
use std::path::{Path, PathBuf};

const TRACE: &str = r#"{"events": [
    {"kind": "block_sync", "ts": 0, "stack_id": 1,
     "stack": [{"pc": 16, "file": "sync/mutex.go", "func": "Lock", "line": 81},
               {"pc": 32, "file": "main.go", "func": "main", "line": 9}], "link": 1},
    {"kind": "unblock", "ts": 500, "stack_id": 2,
     "stack": [{"pc": 48, "file": "sync/mutex.go", "func": "Unlock", "line": 90}], "link": 2},
    {"kind": "start", "ts": 520}
]}"#;

fn write_trace(dir: &Path) -> PathBuf {
    let path = dir.join("trace.json");
    std::fs::write(&path, TRACE).unwrap();
    path
}

#[test]
fn test_validate_args_valid() {
    let args = ProfileArgs {
        input: PathBuf::from("trace.json"),
        kind: AnalysisKind::Block,
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_empty_input() {
    let args = ProfileArgs {
        input: PathBuf::new(),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_top_stacks_zero() {
    let args = ProfileArgs {
        top_stacks: 0,
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_execute_profile_writes_pprof_and_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let args = ProfileArgs {
        input: write_trace(temp_dir.path()),
        kind: AnalysisKind::Block,
        output: temp_dir.path().join("block.pb.gz"),
        output_json: Some(temp_dir.path().join("block.json")),
        print_summary: true,
        ..Default::default()
    };

    let profile = execute_profile(args).unwrap();
    assert_eq!(profile.sample.len(), 1);
    assert_eq!(profile.sample[0].value, vec![1, 500]);
    assert!(profile.time_nanos > 0);

    let from_pprof = read_pprof(temp_dir.path().join("block.pb.gz")).unwrap();
    let from_json = read_profile_json(temp_dir.path().join("block.json")).unwrap();
    assert_eq!(from_pprof, profile);
    assert_eq!(from_json, profile);
}

#[test]
fn test_execute_profile_without_timestamp() {
    let temp_dir = tempfile::tempdir().unwrap();
    let args = ProfileArgs {
        input: write_trace(temp_dir.path()),
        kind: AnalysisKind::Sched,
        output: temp_dir.path().join("sched.pb.gz"),
        stamp_time: false,
        ..Default::default()
    };

    let profile = execute_profile(args).unwrap();
    assert_eq!(profile.time_nanos, 0);
    assert_eq!(profile.sample[0].value, vec![1, 20]);
}

#[test]
fn test_execute_profile_missing_trace_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("io.pb.gz");
    let args = ProfileArgs {
        input: temp_dir.path().join("missing.json"),
        output: output.clone(),
        ..Default::default()
    };

    assert!(execute_profile(args).is_err());
    assert!(!output.exists());
}

#[test]
fn test_execute_all_writes_four_profiles() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_trace(temp_dir.path());
    let out_dir = temp_dir.path().join("profiles");

    let written = execute_all(&input, &out_dir, false).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["io.pb.gz", "block.pb.gz", "syscall.pb.gz", "sched.pb.gz"]);

    let io = read_pprof(&written[0]).unwrap();
    assert!(io.sample.is_empty());
    assert_eq!(io.sample_type.len(), 2);

    let block = read_pprof(&written[1]).unwrap();
    assert_eq!(block.sample.len(), 1);
}
