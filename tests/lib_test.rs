//! Integration tests for the library surface.

use provisioner::config::{parse_config, validate, InstallerConfig};
use provisioner::provision::{plan, steps};
use provisioner::runner::{Fatality, Orchestrator};
use provisioner::unit::ServiceUnit;
use provisioner::ProvisionError;
use std::path::Path;

#[test]
fn defaults_are_valid() {
    assert!(validate(&InstallerConfig::default()).is_ok());
}

#[test]
fn plan_describes_fatality() {
    let described = Orchestrator::new(plan(&InstallerConfig::default())).describe();
    let fatal: Vec<_> = described
        .iter()
        .filter(|s| s.fatality == Fatality::Fatal)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        fatal,
        vec![
            steps::INSTALL_PACKAGES,
            steps::RESET_INSTALL_DIR,
            steps::COPY_PAYLOAD,
            steps::CREATE_VENV,
            steps::REGISTER_SERVICE,
        ]
    );
}

#[test]
fn configured_unit_escapes_specifiers() {
    let config = parse_config(
        "app:\n  description: \"Cupom 100% local\"\n",
        Path::new("provisioner.yml"),
    )
    .unwrap();

    let text = ServiceUnit::for_app(&config, "deploy").render().unwrap();

    assert!(text.contains("Description=Cupom 100%% local\n"));
}

#[test]
fn errors_render_for_humans() {
    let err = ProvisionError::FatalStep {
        step: steps::CREATE_VENV.to_string(),
        message: "Command failed (exit code 1): pip install -r requirements.txt".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Step 'create-venv' failed: Command failed (exit code 1): pip install -r requirements.txt"
    );
}
