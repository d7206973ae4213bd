//! Execution environment detection.

/// Environment variables that indicate a CI or other headless runner.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
///
/// Used by `main()` to pick the non-interactive UI, which avoids spinner
/// redraws in log-based output. Provisioning from cloud-init or a
/// configuration-management tool usually sets one of these too.
pub fn is_ci() -> bool {
    CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
}
