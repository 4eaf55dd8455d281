//! ICMP echo probe via the platform ping binary.
//!
//! Spawns `ping -c 1` per probe and parses the round-trip time out of the
//! textual output. ICMP sockets need elevated privilege on several
//! platforms; the external binary carries the needed capability bits.
//! Each probe runs under a fresh process, so ICMP identity does not persist
//! across probes; a persistent-session prober could replace this behind the
//! same trait.

use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

use super::{ProbeError, Prober};

pub struct PingProber {
    host: String,
}

impl PingProber {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Prober for PingProber {
    async fn probe(&self, timeout: Duration) -> Result<f64, ProbeError> {
        run_ping_command(&self.host, timeout).await
    }
}

/// Invoke the platform echo facility with a response count of one and a
/// timeout bound by the probe interval.
async fn run_ping_command(address: &str, timeout: Duration) -> Result<f64, ProbeError> {
    let timeout_secs = timeout.as_secs().max(1);

    let output = Command::new("ping")
        .args(["-c", "1", "-W", &timeout_secs.to_string(), address])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ProbeError::Probe(format!("failed to execute ping: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        if is_resolution_failure(&stdout) || is_resolution_failure(&stderr) {
            return Err(ProbeError::Resolution(format!(
                "cannot resolve {}",
                address
            )));
        }
        if stderr.contains("timeout")
            || stdout.contains("100% packet loss")
            || stdout.contains("100.0% packet loss")
        {
            return Err(ProbeError::Timeout(timeout));
        }
        return Err(ProbeError::Unreachable(first_line(&stdout, &stderr)));
    }

    // Unparseable output counts as a failed probe, same as a timeout.
    parse_ping_output(&stdout)
        .ok_or_else(|| ProbeError::Unreachable("could not parse ping output".to_string()))
}

/// Resolution failures as reported by Linux and macOS ping.
fn is_resolution_failure(text: &str) -> bool {
    text.contains("Name or service not known")
        || text.contains("unknown host")
        || text.contains("Unknown host")
        || text.contains("cannot resolve")
        || text.contains("Temporary failure in name resolution")
}

fn first_line(stdout: &str, stderr: &str) -> String {
    stderr
        .lines()
        .chain(stdout.lines())
        .find(|l| !l.trim().is_empty())
        .unwrap_or("ping failed")
        .trim()
        .to_string()
}

/// Parse ping command output for latency in milliseconds.
fn parse_ping_output(output: &str) -> Option<f64> {
    // Per-packet response "time=X.XXX ms" (Linux, some macOS)
    static RE_PACKET: OnceLock<Regex> = OnceLock::new();
    let re = RE_PACKET.get_or_init(|| Regex::new(r"time[=<](?P<val>[0-9.]+)\s*ms").unwrap());
    if let Some(caps) = re.captures(output) {
        if let Ok(ms) = caps["val"].parse::<f64>() {
            return Some(ms);
        }
    }

    // Summary line "round-trip min/avg/max/stddev = a/b/c/d ms" (macOS)
    static RE_MACOS: OnceLock<Regex> = OnceLock::new();
    let re = RE_MACOS.get_or_init(|| {
        Regex::new(r"round-trip\s+min/avg/max/stddev\s*=\s*([0-9.]+)/([0-9.]+)/([0-9.]+)")
            .unwrap()
    });
    if let Some(caps) = re.captures(output) {
        if let Ok(ms) = caps[2].parse::<f64>() {
            return Some(ms);
        }
    }

    // Summary line "rtt min/avg/max/mdev = a/b/c/d ms" (Linux)
    static RE_LINUX: OnceLock<Regex> = OnceLock::new();
    let re = RE_LINUX.get_or_init(|| {
        Regex::new(r"rtt\s+min/avg/max/mdev\s*=\s*([0-9.]+)/([0-9.]+)/([0-9.]+)").unwrap()
    });
    if let Some(caps) = re.captures(output) {
        if let Ok(ms) = caps[2].parse::<f64>() {
            return Some(ms);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_per_packet_time() {
        let output = "64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.345 ms";
        let latency = parse_ping_output(output).unwrap();
        assert!((latency - 12.345).abs() < 1e-9);
    }

    #[test]
    fn parses_macos_summary() {
        let output = r#"PING google.com (142.250.69.174): 56 data bytes

--- google.com ping statistics ---
1 packets transmitted, 1 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 17.906/17.906/17.906/0.000 ms"#;
        let latency = parse_ping_output(output).unwrap();
        assert!((latency - 17.906).abs() < 1e-9);
    }

    #[test]
    fn parses_linux_summary_preferring_per_packet_time() {
        let output = r#"PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.
64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.3 ms

--- 8.8.8.8 ping statistics ---
1 packets transmitted, 1 received, 0% packet loss, time 0ms
rtt min/avg/max/mdev = 12.300/12.300/12.300/0.000 ms"#;
        let latency = parse_ping_output(output).unwrap();
        assert!((latency - 12.3).abs() < 1e-9);
    }

    #[test]
    fn rejects_garbage_output() {
        assert!(parse_ping_output("no latency here").is_none());
        assert!(parse_ping_output("").is_none());
    }

    #[test]
    fn detects_resolution_failures() {
        assert!(is_resolution_failure(
            "ping: nosuch.invalid: Name or service not known"
        ));
        assert!(is_resolution_failure(
            "ping: cannot resolve nosuch.invalid: Unknown host"
        ));
        assert!(is_resolution_failure("ping: unknown host nosuch.invalid"));
        assert!(!is_resolution_failure("100% packet loss"));
    }

    #[test]
    fn first_line_prefers_stderr() {
        assert_eq!(first_line("out line", "err line"), "err line");
        assert_eq!(first_line("out line", ""), "out line");
        assert_eq!(first_line("", ""), "ping failed");
    }
}
