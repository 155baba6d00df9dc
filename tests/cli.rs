//! Binary-level tests for `webapp-bundler`.

use assert_cmd::Command;
use base64::{Engine, engine::general_purpose::STANDARD};
use predicates::prelude::*;
use webapp_bundler::{bundler::KeyPair, metadata::{Bundle, BundleMetadata}};

const FIXTURE_SITE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/site");

fn bundler() -> Command {
    let mut cmd = Command::cargo_bin("webapp-bundler").unwrap();
    for var in [
        "BUNDLE_INPUT",
        "BUNDLE_OUTPUT",
        "BUNDLE_MANIFEST",
        "BUNDLE_VERSION",
        "BUNDLE_MAX_SIZE",
        "BUNDLE_SIGNING_KEY",
        "BUNDLE_SIGNING_SEED",
        "BUNDLE_SIGNING_SECRET",
        "BUNDLE_SIGNING_KEY_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn writes_bundle_and_manifest() {
    let out = tempfile::tempdir().unwrap();
    let bundle_path = out.path().join("dist").join("bundle.zip");
    let manifest_path = out.path().join("dist").join("bundle.json");
    let seed = STANDARD.encode([11u8; 32]);

    bundler()
        .arg("--input")
        .arg(FIXTURE_SITE)
        .arg("--output")
        .arg(&bundle_path)
        .arg("--manifest")
        .arg(&manifest_path)
        .args(["--bundle-version", "3.1.4"])
        .env("BUNDLE_SIGNING_SEED", &seed)
        .env("BUNDLE_SIGNING_KEY_PATH", out.path().join("signing.key"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Bundle written to"))
        .stdout(predicate::str::contains("created with 6 files"))
        .stdout(predicate::str::contains(
            KeyPair::from_seed(&[11u8; 32]).verifying_key_base64(),
        ));

    let content = std::fs::read(&bundle_path).unwrap();
    let metadata: BundleMetadata =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(metadata.version, "3.1.4");

    let bundle = Bundle::from_parts(metadata, content);
    let key = KeyPair::from_seed(&[11u8; 32]).verifying_key();
    assert!(bundle.verify_signature(&key).is_ok());
    assert_eq!(bundle.verify_files().unwrap().len(), 6);
    assert!(!out.path().join("signing.key").exists());
}

#[test]
fn missing_input_fails() {
    let out = tempfile::tempdir().unwrap();

    bundler()
        .arg("--input")
        .arg(out.path().join("does-not-exist"))
        .arg("--output")
        .arg(out.path().join("bundle.zip"))
        .args(["--signing-secret", "s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path not found"));

    assert!(!out.path().join("bundle.zip").exists());
}

#[test]
fn malformed_key_is_fatal() {
    let out = tempfile::tempdir().unwrap();

    bundler()
        .arg("--input")
        .arg(FIXTURE_SITE)
        .arg("--output")
        .arg(out.path().join("bundle.zip"))
        .env("BUNDLE_SIGNING_KEY", STANDARD.encode([1u8; 40]))
        .env("BUNDLE_SIGNING_SECRET", "would otherwise work")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 64 bytes, got 40"))
        .stderr(predicate::str::contains("hint:"));

    assert!(!out.path().join("bundle.zip").exists());
}

#[test]
fn oversized_bundle_fails() {
    let out = tempfile::tempdir().unwrap();

    bundler()
        .arg("--input")
        .arg(FIXTURE_SITE)
        .arg("--output")
        .arg(out.path().join("bundle.zip"))
        .args(["--max-size", "16", "--signing-secret", "s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds maximum of 16 bytes"));
}

#[test]
fn generates_and_reuses_key_file() {
    let out = tempfile::tempdir().unwrap();
    let key_path = out.path().join("keys").join("signing.key");

    let run = || {
        let output = bundler()
            .arg("--input")
            .arg(FIXTURE_SITE)
            .arg("--output")
            .arg(out.path().join("bundle.zip"))
            .arg("--key-file")
            .arg(&key_path)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let first = run();
    assert!(key_path.exists());
    let second = run();

    let key_line = |stdout: &str| {
        stdout
            .lines()
            .find(|l| l.starts_with("Verifying key:"))
            .map(str::to_string)
    };
    assert_eq!(key_line(&first), key_line(&second));
    assert!(key_line(&first).is_some());
}

#[test]
fn unsaved_generated_key_is_printed_with_its_path() {
    let out = tempfile::tempdir().unwrap();
    let blocker = out.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let key_path = blocker.join("signing.key");
    let bundle_path = out.path().join("bundle.zip");
    let manifest_path = out.path().join("bundle.json");

    let output = bundler()
        .arg("--input")
        .arg(FIXTURE_SITE)
        .arg("--output")
        .arg(&bundle_path)
        .arg("--manifest")
        .arg(&manifest_path)
        .arg("--key-file")
        .arg(&key_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("CRITICAL"));
    assert!(stderr.contains(&key_path.display().to_string()));
    assert!(!key_path.exists());

    let printed_key = stderr
        .lines()
        .skip_while(|l| !l.contains("Save the following private key"))
        .nth(1)
        .unwrap()
        .trim();
    let bytes: [u8; 64] = STANDARD.decode(printed_key).unwrap().try_into().unwrap();
    let keypair = KeyPair::from_private_key(&bytes, "printed key").unwrap();

    let verifying_line = format!("Verifying key: {}", keypair.verifying_key_base64());
    assert!(stdout.lines().any(|l| l == verifying_line));

    let metadata: BundleMetadata =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    let bundle = Bundle::from_parts(metadata, std::fs::read(&bundle_path).unwrap());
    assert!(bundle.verify_signature(&keypair.verifying_key()).is_ok());
}
