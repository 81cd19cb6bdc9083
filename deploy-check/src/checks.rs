//! Deployment readiness checks: files on disk plus required environment keys.
use std::fs;
use std::path::Path;

/// Identity service keys every deployment needs.
pub const REQUIRED_ENV_KEYS: [&str; 3] = [
    "IDENTITY_SERVICE_URL",
    "IDENTITY_ANON_KEY",
    "IDENTITY_SERVICE_ROLE_KEY",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub label: String,
    pub passed: bool,
    pub detail: Option<String>,
}

impl CheckResult {
    fn pass(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: None,
        }
    }

    fn fail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }

    pub fn line(&self) -> String {
        match (self.passed, &self.detail) {
            (true, _) => format!("✅ {}", self.label),
            (false, Some(detail)) => format!("❌ {} ({})", self.label, detail),
            (false, None) => format!("❌ {}", self.label),
        }
    }
}

/// Run every check against `root`, reading env keys through `env`.
pub fn run_all(root: &Path, env: impl Fn(&str) -> Option<String>) -> Vec<CheckResult> {
    let mut results = vec![
        file_present(root, "Cargo.toml"),
        file_present(root, "Cargo.lock"),
        file_present(root, ".env.example"),
        env_example_declares_keys(root),
        gitignore_covers_env(root),
    ];

    results.extend(REQUIRED_ENV_KEYS.into_iter().map(|key| {
        let label = format!("{key} is set");
        match env(key) {
            Some(v) if !v.trim().is_empty() => CheckResult::pass(label),
            Some(_) => CheckResult::fail(label, "empty"),
            None => CheckResult::fail(label, "missing"),
        }
    }));

    results
}

fn file_present(root: &Path, name: &str) -> CheckResult {
    let label = format!("{name} present");
    if root.join(name).is_file() {
        CheckResult::pass(label)
    } else {
        CheckResult::fail(label, "not found")
    }
}

fn env_example_declares_keys(root: &Path) -> CheckResult {
    let label = ".env.example declares identity keys";
    let Ok(content) = fs::read_to_string(root.join(".env.example")) else {
        return CheckResult::fail(label, "unreadable");
    };

    let declared: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.starts_with('#'))
        .filter_map(|l| l.split_once('=').map(|(k, _)| k.trim()))
        .collect();

    let missing: Vec<&str> = REQUIRED_ENV_KEYS
        .into_iter()
        .filter(|key| !declared.contains(key))
        .collect();

    if missing.is_empty() {
        CheckResult::pass(label)
    } else {
        CheckResult::fail(label, format!("missing {}", missing.join(", ")))
    }
}

fn gitignore_covers_env(root: &Path) -> CheckResult {
    let label = ".gitignore ignores .env";
    let Ok(content) = fs::read_to_string(root.join(".gitignore")) else {
        return CheckResult::fail(label, "no .gitignore");
    };

    let ignored = content
        .lines()
        .map(str::trim)
        .any(|l| matches!(l, ".env" | "/.env" | ".env*" | "*.env"));

    if ignored {
        CheckResult::pass(label)
    } else {
        CheckResult::fail(label, ".env not listed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, name: &str, content: &str) {
        fs::write(root.join(name), content).unwrap();
    }

    fn ready_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Cargo.toml", "[package]\nname = \"x\"\n");
        write(dir.path(), "Cargo.lock", "version = 4\n");
        write(
            dir.path(),
            ".env.example",
            "# identity\nIDENTITY_SERVICE_URL=\nIDENTITY_ANON_KEY=\nIDENTITY_SERVICE_ROLE_KEY=\n",
        );
        write(dir.path(), ".gitignore", "/target\n.env\n");
        dir
    }

    fn full_env(key: &str) -> Option<String> {
        Some(format!("value-for-{key}"))
    }

    #[test]
    fn ready_repo_passes_everything() {
        let dir = ready_repo();
        let results = run_all(dir.path(), full_env);

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn empty_dir_fails_file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let results = run_all(dir.path(), full_env);

        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(
            failed,
            vec![
                "Cargo.toml present",
                "Cargo.lock present",
                ".env.example present",
                ".env.example declares identity keys",
                ".gitignore ignores .env",
            ]
        );
    }

    #[test]
    fn reports_undeclared_and_unset_keys() {
        let dir = ready_repo();
        write(dir.path(), ".env.example", "IDENTITY_SERVICE_URL=https://x\n");

        let results = run_all(dir.path(), |key| {
            (key == "IDENTITY_ANON_KEY").then(|| "  ".to_string())
        });

        let declares = results
            .iter()
            .find(|r| r.label == ".env.example declares identity keys")
            .unwrap();
        assert_eq!(
            declares.detail.as_deref(),
            Some("missing IDENTITY_ANON_KEY, IDENTITY_SERVICE_ROLE_KEY")
        );

        let lines: Vec<String> = results.iter().map(CheckResult::line).collect();
        assert!(lines.contains(&"❌ IDENTITY_SERVICE_URL is set (missing)".to_string()));
        assert!(lines.contains(&"❌ IDENTITY_ANON_KEY is set (empty)".to_string()));
        assert!(lines.contains(&"✅ Cargo.toml present".to_string()));
    }
}
