//! Final access URL and management hints.

use crate::error::Result;
use crate::host::{primary_ip, url_host};
use crate::runner::{RunContext, StepEffect};
use crate::shell::CommandRunner;
use crate::ui::UserInterface;

/// Print where the API answers and how to manage the service.
pub fn summarize(
    ctx: &RunContext,
    runner: &mut dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<StepEffect> {
    let app = &ctx.config.app;

    ui.show_hint(&format!("Status: systemctl status {}", app.name));
    ui.show_hint(&format!("Logs:   journalctl -u {} -f", app.name));

    let host = if runner.is_dry_run() {
        "<host-ip>".to_string()
    } else {
        url_host(&primary_ip(runner)?)
    };
    let url = access_url(&host, app.port, &app.docs_path);
    ui.success(&format!("{} is up: {}", app.name, url));

    Ok(StepEffect::DoneWith(url))
}

/// `http://<host>:<port><docs_path>`
pub fn access_url(host: &str, port: u16, docs_path: &str) -> String {
    format!("http://{}:{}{}", host, port, docs_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallerConfig;
    use crate::host::user::tests::alice;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use std::path::Path;

    fn ctx() -> RunContext {
        RunContext::new(alice(), InstallerConfig::default(), Path::new("/src"), false)
    }

    #[test]
    fn prints_docs_url_and_hints() {
        let mut runner = MockRunner::new();
        runner.set_output("hostname -I", "192.168.0.10 172.17.0.1\n");
        let mut ui = MockUI::new();

        let effect = summarize(&ctx(), &mut runner, &mut ui).unwrap();

        assert_eq!(
            effect,
            StepEffect::DoneWith("http://192.168.0.10:8000/docs".to_string())
        );
        assert!(ui.has_success("http://192.168.0.10:8000/docs"));
        assert!(ui.has_hint("systemctl status cupom-api"));
        assert!(ui.has_hint("journalctl -u cupom-api -f"));
    }

    #[test]
    fn hints_survive_missing_address() {
        let mut runner = MockRunner::new();
        let mut ui = MockUI::new();

        assert!(summarize(&ctx(), &mut runner, &mut ui).is_err());
        assert_eq!(ui.hints().len(), 2);
    }

    #[test]
    fn ipv6_is_bracketed() {
        let mut runner = MockRunner::new();
        runner.set_output("hostname -I", "2001:db8::5\n");
        let effect = summarize(&ctx(), &mut runner, &mut MockUI::new()).unwrap();
        assert_eq!(
            effect,
            StepEffect::DoneWith("http://[2001:db8::5]:8000/docs".to_string())
        );
    }

    #[test]
    fn access_url_format() {
        assert_eq!(access_url("10.0.0.1", 9000, "/redoc"), "http://10.0.0.1:9000/redoc");
    }
}
