use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How the process manager runs the instances of one spec.
///
/// - `Fork`: `instances` fully independent processes, no shared socket
///   (default when `exec_mode` is omitted).
/// - `Cluster`: `instances` processes sharing inbound connection distribution.
///
/// The manager also understands the legacy spellings `fork_mode` and
/// `cluster_mode`, so those are accepted as aliases on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    #[default]
    #[serde(alias = "fork_mode")]
    Fork,
    #[serde(alias = "cluster_mode")]
    Cluster,
}

impl ExecMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecMode::Fork => "fork",
            ExecMode::Cluster => "cluster",
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit suffix of a [`MemorySize`]. Multiples are binary (1024-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    Bytes,
    Kilo,
    Mega,
    Giga,
}

impl SizeUnit {
    pub fn multiplier(&self) -> u64 {
        match self {
            SizeUnit::Bytes => 1,
            SizeUnit::Kilo => 1 << 10,
            SizeUnit::Mega => 1 << 20,
            SizeUnit::Giga => 1 << 30,
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            SizeUnit::Bytes => "",
            SizeUnit::Kilo => "K",
            SizeUnit::Mega => "M",
            SizeUnit::Giga => "G",
        }
    }
}

static MEMORY_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*([KkMmGg])?\s*$").expect("memory size pattern is valid")
});

/// Resident-memory ceiling above which the process manager restarts a process.
///
/// Authored as `"1000M"`, `"1G"`, `"512K"` or a plain byte count. Amount and
/// unit are kept separately, so `"1000M"` does not render as a byte count, but
/// the output is canonical: the suffix is upper case and a numeric byte count
/// comes back as a digit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemorySize {
    amount: u64,
    unit: SizeUnit,
}

impl MemorySize {
    /// `1000M`, the ceiling the shipped descriptors use.
    pub const DEFAULT_CEILING: MemorySize = MemorySize {
        amount: 1000,
        unit: SizeUnit::Mega,
    };

    /// Build a size, rejecting zero and amounts that overflow `u64` bytes.
    pub fn new(amount: u64, unit: SizeUnit) -> Result<Self, String> {
        if amount == 0 {
            return Err("memory ceiling must be greater than zero".to_string());
        }
        if amount.checked_mul(unit.multiplier()).is_none() {
            return Err(format!(
                "memory ceiling {amount}{} does not fit in 64 bits",
                unit.suffix()
            ));
        }
        Ok(Self { amount, unit })
    }

    pub fn megabytes(amount: u64) -> Result<Self, String> {
        Self::new(amount, SizeUnit::Mega)
    }

    /// Ceiling in bytes.
    pub fn bytes(&self) -> u64 {
        // Checked in `new`.
        self.amount * self.unit.multiplier()
    }
}

impl fmt::Display for MemorySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for MemorySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = MEMORY_SIZE_RE.captures(s).ok_or_else(|| {
            format!("invalid max_memory_restart: {s:?} (expected e.g. \"1000M\", \"1G\" or a byte count)")
        })?;

        let amount: u64 = caps[1]
            .parse()
            .map_err(|_| format!("invalid max_memory_restart: {s:?} (amount too large)"))?;

        let unit = match caps.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
            None => SizeUnit::Bytes,
            Some(u) if u == "K" => SizeUnit::Kilo,
            Some(u) if u == "M" => SizeUnit::Mega,
            Some(_) => SizeUnit::Giga,
        };

        MemorySize::new(amount, unit)
    }
}

impl Serialize for MemorySize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MemorySize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bytes(u64),
            Text(String),
        }

        let parsed = match Repr::deserialize(deserializer)? {
            Repr::Bytes(n) => MemorySize::new(n, SizeUnit::Bytes),
            Repr::Text(s) => s.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
