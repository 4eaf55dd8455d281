//! Host target configuration and validation.

use std::time::Duration;

use thiserror::Error;

/// Floor for probe and refresh intervals.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Default retained samples per host.
pub const DEFAULT_CAPACITY: usize = 20;

/// Configuration errors. All of these abort startup before any probing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no hosts configured")]
    NoHosts,
    #[error("empty host in spec '{0}'")]
    EmptyHost(String),
    #[error("invalid port in spec '{0}': port must be 1-65535")]
    InvalidPort(String),
    #[error("invalid interval {0}: must be a positive number of seconds")]
    InvalidInterval(f64),
}

/// How a host is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// ICMP echo via the platform ping facility.
    Icmp,
    /// TCP connect timing against a specific port.
    Tcp(u16),
}

/// One monitored endpoint, created once at startup.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Hostname or address as given on the command line.
    pub name: String,
    pub mode: ProbeMode,
    /// Probe cadence; also the timeout bound for each probe.
    pub interval: Duration,
    /// Retained samples, oldest evicted first.
    pub capacity: usize,
}

impl HostConfig {
    /// Parse a `HOST` (ICMP) or `HOST:PORT` (TCP) spec string.
    pub fn from_spec(
        spec: &str,
        interval: Duration,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        let spec = spec.trim();
        let (name, mode) = match spec.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort(spec.to_string()))?;
                if port == 0 {
                    return Err(ConfigError::InvalidPort(spec.to_string()));
                }
                (host, ProbeMode::Tcp(port))
            }
            None => (spec, ProbeMode::Icmp),
        };

        if name.is_empty() {
            return Err(ConfigError::EmptyHost(spec.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            mode,
            interval: clamp_interval(interval),
            capacity: clamp_capacity(capacity),
        })
    }
}

/// Build the target list from CLI specs. Duplicate specs are kept: each
/// entry is monitored independently.
pub fn build_targets(
    specs: &[String],
    interval: Duration,
    capacity: usize,
) -> Result<Vec<HostConfig>, ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::NoHosts);
    }

    specs
        .iter()
        .map(|spec| HostConfig::from_spec(spec, interval, capacity))
        .collect()
}

/// Convert a CLI seconds value, rejecting non-positive or non-finite input.
pub fn interval_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidInterval(secs));
    }
    Ok(clamp_interval(Duration::from_secs_f64(secs)))
}

/// Clamp an interval to the minimum floor.
pub fn clamp_interval(interval: Duration) -> Duration {
    if interval < MIN_INTERVAL {
        tracing::warn!(min = ?MIN_INTERVAL, requested = ?interval,
            "interval below minimum, clamping");
        MIN_INTERVAL
    } else {
        interval
    }
}

fn clamp_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        tracing::warn!("history capacity of 0 requested, using 1");
        1
    } else {
        capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_is_icmp() {
        let target =
            HostConfig::from_spec("example.com", Duration::from_secs(1), 10).unwrap();
        assert_eq!(target.name, "example.com");
        assert_eq!(target.mode, ProbeMode::Icmp);
        assert_eq!(target.capacity, 10);
    }

    #[test]
    fn host_with_port_is_tcp() {
        let target =
            HostConfig::from_spec("example.com:443", Duration::from_secs(1), 10).unwrap();
        assert_eq!(target.name, "example.com");
        assert_eq!(target.mode, ProbeMode::Tcp(443));
    }

    #[test]
    fn port_zero_is_rejected() {
        let err = HostConfig::from_spec("example.com:0", Duration::from_secs(1), 10)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let err = HostConfig::from_spec("example.com:https", Duration::from_secs(1), 10)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn out_of_range_port_is_rejected() {
        let err = HostConfig::from_spec("example.com:70000", Duration::from_secs(1), 10)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn empty_host_is_rejected() {
        assert!(matches!(
            HostConfig::from_spec("", Duration::from_secs(1), 10),
            Err(ConfigError::EmptyHost(_))
        ));
        assert!(matches!(
            HostConfig::from_spec(":443", Duration::from_secs(1), 10),
            Err(ConfigError::EmptyHost(_))
        ));
    }

    #[test]
    fn empty_host_list_is_rejected() {
        let err = build_targets(&[], Duration::from_secs(1), 10).unwrap_err();
        assert!(matches!(err, ConfigError::NoHosts));
    }

    #[test]
    fn duplicate_hosts_are_kept() {
        let specs = vec!["a.example".to_string(), "a.example".to_string()];
        let targets = build_targets(&specs, Duration::from_secs(1), 10).unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn short_interval_is_clamped() {
        let target =
            HostConfig::from_spec("example.com", Duration::from_millis(10), 10).unwrap();
        assert_eq!(target.interval, MIN_INTERVAL);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let target =
            HostConfig::from_spec("example.com", Duration::from_secs(1), 0).unwrap();
        assert_eq!(target.capacity, 1);
    }

    #[test]
    fn non_positive_seconds_are_rejected() {
        assert!(interval_from_secs(0.0).is_err());
        assert!(interval_from_secs(-1.0).is_err());
        assert!(interval_from_secs(f64::NAN).is_err());
        assert_eq!(interval_from_secs(0.5).unwrap(), Duration::from_millis(500));
    }
}
