use std::{
    fs,
    process::{Command, Output},
};

use bin2src::{decode, parse_size};

fn bin2src(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bin2src"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn missing_arguments_fail_with_usage_on_stderr() {
    let out = bin2src(&["img".as_ref(), "in.png".as_ref()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(!out.stderr.is_empty());
}

#[test]
fn missing_input_fails_without_creating_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.bin");
    let output = dir.path().join("out.rs");

    let out = bin2src(&["img".as_ref(), input.as_os_str(), output.as_os_str()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("nope.bin"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn success_is_silent_and_output_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blob.bin");
    let output = dir.path().join("blob.c");
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    fs::write(&input, &data).unwrap();

    let out = bin2src(&[
        "blob".as_ref(),
        input.as_os_str(),
        output.as_os_str(),
        "--lang".as_ref(),
        "c".as_ref(),
    ]);

    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());

    let src = fs::read_to_string(&output).unwrap();
    assert_eq!(parse_size(&src, "blob"), Some(1000));
    assert_eq!(decode(&src).unwrap(), data);
}

#[test]
fn help_exits_successfully() {
    let out = bin2src(&["--help".as_ref()]);

    assert_eq!(out.status.code(), Some(0));
    assert!(!out.stdout.is_empty());
}
