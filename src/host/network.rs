//! Host address discovery for the final summary.

use std::net::IpAddr;

use crate::error::{ProvisionError, Result};
use crate::shell::{CommandRunner, CommandSpec};

/// Resolve the host's primary IP address via `hostname -I`.
pub fn primary_ip(runner: &mut dyn CommandRunner) -> Result<IpAddr> {
    let spec = CommandSpec::new("hostname").arg("-I").capture();
    let result = runner.run_checked(&spec)?;

    parse_primary_ip(&result.stdout).ok_or_else(|| {
        ProvisionError::Other(anyhow::anyhow!(
            "`hostname -I` reported no usable address"
        ))
    })
}

/// First address in `hostname -I` output that parses as an IP.
pub fn parse_primary_ip(output: &str) -> Option<IpAddr> {
    output
        .split_whitespace()
        .find_map(|token| token.parse::<IpAddr>().ok())
}

/// Format an address for use in a URL (IPv6 gets brackets).
pub fn url_host(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{}]", v6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;

    #[test]
    fn parses_first_address() {
        let ip = parse_primary_ip("192.168.1.20 172.17.0.1 fe80::1 \n").unwrap();
        assert_eq!(ip.to_string(), "192.168.1.20");
    }

    #[test]
    fn skips_garbage_tokens() {
        let ip = parse_primary_ip("junk 10.0.0.2").unwrap();
        assert_eq!(ip.to_string(), "10.0.0.2");
    }

    #[test]
    fn empty_output_is_none() {
        assert!(parse_primary_ip("  \n").is_none());
    }

    #[test]
    fn url_host_brackets_ipv6() {
        let v6: IpAddr = "fe80::1".parse().unwrap();
        let v4: IpAddr = "10.1.2.3".parse().unwrap();
        assert_eq!(url_host(&v6), "[fe80::1]");
        assert_eq!(url_host(&v4), "10.1.2.3");
    }

    #[test]
    fn primary_ip_uses_hostname() {
        let mut runner = MockRunner::new();
        runner.set_output("hostname -I", "10.9.8.7\n");
        let ip = primary_ip(&mut runner).unwrap();
        assert_eq!(ip.to_string(), "10.9.8.7");
        assert!(runner.ran("hostname -I"));
    }

    #[test]
    fn primary_ip_captures_output() {
        let mut runner = MockRunner::new();
        runner.set_output("hostname -I", "10.1.2.3\n");
        primary_ip(&mut runner).unwrap();
        assert!(runner.history()[0].capture);
    }

    #[test]
    fn primary_ip_fails_on_empty_output() {
        let mut runner = MockRunner::new();
        assert!(primary_ip(&mut runner).is_err());
    }
}
