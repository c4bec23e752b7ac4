//! A disposer that panics takes the whole process down. Each test re-runs
//! itself in a child process so the abort can be observed from outside.

use std::{env, process::Command};

use tenure::heap;

const CHILD_ENV: &str = "TENURE_DISPOSER_PANIC_CHILD";

struct Noisy(&'static str);

impl Drop for Noisy {
    fn drop(&mut self) {
        println!("dropped {}", self.0);
    }
}

struct Exploding;

impl Drop for Exploding {
    fn drop(&mut self) {
        println!("exploding");
        panic!("destructor failed");
    }
}

/// Runs `test` in a child process, returning whether it aborted and its stdout.
fn run_child(test: &str) -> (bool, String) {
    let output = Command::new(env::current_exe().unwrap())
        .args(["--exact", test, "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();

    #[cfg(unix)]
    let aborted = {
        use std::os::unix::process::ExitStatusExt;
        output.status.signal() == Some(6)
    };
    #[cfg(not(unix))]
    let aborted = !output.status.success();

    (aborted, String::from_utf8_lossy(&output.stdout).into_owned())
}

#[test]
fn panicking_primary_aborts_before_attachments() {
    if env::var_os(CHILD_ENV).is_some() {
        let combined = heap(Exploding)
            .attach(heap(Noisy("first")))
            .attach(heap(Noisy("second")));
        drop(combined);
        println!("survived");
        return;
    }

    let (aborted, stdout) = run_child("panicking_primary_aborts_before_attachments");
    assert!(aborted, "child did not abort:\n{stdout}");
    assert!(stdout.contains("exploding"));
    assert!(!stdout.contains("dropped first"));
    assert!(!stdout.contains("dropped second"));
    assert!(!stdout.contains("survived"));
}

#[test]
fn panicking_attachment_aborts_before_later_ones() {
    if env::var_os(CHILD_ENV).is_some() {
        let combined = heap(Noisy("primary")).attach((heap(Exploding), heap(Noisy("last"))));
        drop(combined);
        println!("survived");
        return;
    }

    let (aborted, stdout) = run_child("panicking_attachment_aborts_before_later_ones");
    assert!(aborted, "child did not abort:\n{stdout}");
    assert!(stdout.contains("dropped primary"));
    assert!(stdout.contains("exploding"));
    assert!(!stdout.contains("dropped last"));
    assert!(!stdout.contains("survived"));
}
