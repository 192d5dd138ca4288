//! Shared test helpers

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run git in `repo_root`, panicking on failure
pub fn git(args: &[&str], repo_root: &Path) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Create a temporary git repository with initial commit on `main`
pub fn init_test_repo() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let repo_root = temp_dir.path();

    git(&["init"], repo_root);
    git(&["config", "user.email", "test@test.com"], repo_root);
    git(&["config", "user.name", "Test User"], repo_root);
    git(&["config", "commit.gpgsign", "false"], repo_root);

    fs::write(repo_root.join("README.md"), "# Test Repository\n")
        .expect("Failed to write README.md");
    git(&["add", "."], repo_root);
    git(&["commit", "-m", "Initial commit"], repo_root);
    git(&["branch", "-M", "main"], repo_root);

    temp_dir
}

/// Write `files` (relative paths) and commit them
pub fn commit_files(files: &[&str], message: &str, repo_root: &Path) {
    for file in files {
        let path = repo_root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let previous = fs::read_to_string(&path).unwrap_or_default();
        fs::write(&path, format!("{previous}// {message}\n")).expect("Failed to write file");
    }
    git(&["add", "."], repo_root);
    git(&["commit", "-m", message], repo_root);
}

/// Write an executable `#!/bin/sh` script into `dir`
pub fn write_rule_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

/// Script body that reports a submitted job with `job_id`
pub fn accepted_body(job_id: &str) -> String {
    format!(
        "echo 'Starting prover'\necho \"You can follow up on the status: https://prover.example/jobStatus/7/{job_id}?anonymousKey=abc\""
    )
}
