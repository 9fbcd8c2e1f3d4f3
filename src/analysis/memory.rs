//! System memory pressure probe

use tracing::warn;

/// Source of the current memory usage
pub trait MemoryProbe: Send + Sync {
    /// Used memory in percent, `None` when unknown
    fn usage_percent(&self) -> Option<f32>;

    /// True when usage is known and above `threshold` percent
    fn under_pressure(&self, threshold: f32) -> bool {
        match self.usage_percent() {
            Some(usage) if usage > threshold => {
                warn!("High memory usage: {:.1}% (threshold {}%)", usage, threshold);
                true
            }
            _ => false,
        }
    }
}

/// Reads `/proc/meminfo`; reports unknown on other platforms
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemoryProbe;

impl MemoryProbe for SystemMemoryProbe {
    fn usage_percent(&self) -> Option<f32> {
        let meminfo = std::fs::read_to_string("/proc/meminfo").ok()?;
        parse_meminfo(&meminfo)
    }
}

/// Usage percent from `/proc/meminfo` contents
pub fn parse_meminfo(meminfo: &str) -> Option<f32> {
    let field = |name: &str| -> Option<f64> {
        meminfo
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|rest| rest.trim_start_matches(':').split_whitespace().next())
            .and_then(|value| value.parse::<f64>().ok())
    };

    let total = field("MemTotal")?;
    let available = field("MemAvailable")?;
    if total <= 0.0 {
        return None;
    }
    Some((((total - available) / total) * 100.0) as f32)
}

/// Fixed reading
#[derive(Debug, Clone, Copy)]
pub struct FixedMemoryProbe(pub Option<f32>);

impl MemoryProbe for FixedMemoryProbe {
    fn usage_percent(&self) -> Option<f32> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meminfo() {
        let sample = "MemTotal:       16000000 kB\nMemFree:         1000000 kB\nMemAvailable:    4000000 kB\n";
        assert_eq!(parse_meminfo(sample), Some(75.0));
        assert_eq!(parse_meminfo("MemTotal: 100 kB\n"), None);
        assert_eq!(parse_meminfo(""), None);
    }

    #[test]
    fn test_under_pressure() {
        assert!(FixedMemoryProbe(Some(90.0)).under_pressure(85.0));
        assert!(!FixedMemoryProbe(Some(85.0)).under_pressure(85.0));
        assert!(!FixedMemoryProbe(None).under_pressure(85.0));
    }
}
