//! Hardware profiles and the hard metric bounds they impose.
//!
//! [`ProfileTable::builtin`] carries the four stock deployment targets; a
//! JSON file can add or override entries. [`HardwareConstraints`] is what
//! fitness scoring checks measured metrics against.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MonasError, Result};
use crate::eval::{Metric, MetricSet};

/// A deployment target: a cost bound plus the operation types it runs well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Short identifier used on the command line (e.g. "mobile").
    #[serde(skip)]
    pub name: String,
    /// Upper bound on estimated FLOPs. Candidates must stay strictly below it.
    pub max_flops: f64,
    /// Allowed operation substrings. An operation is allowed when its name
    /// contains at least one of these (case-sensitive).
    pub allowed_ops: Vec<String>,
}

impl HardwareProfile {
    pub fn new(name: &str, max_flops: f64, allowed_ops: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            max_flops,
            allowed_ops: allowed_ops.iter().map(|op| op.to_string()).collect(),
        }
    }

    pub fn mobile() -> Self {
        Self::new(
            "mobile",
            100e6,
            &["sep_conv_3x3", "avg_pool_3x3", "skip_connect"],
        )
    }

    pub fn cpu() -> Self {
        Self::new("cpu", 500e6, &["conv_1x1", "sep_conv_3x3", "skip_connect"])
    }

    pub fn gpu() -> Self {
        Self::new(
            "gpu",
            1e9,
            &["conv_1x1", "dil_conv_3x3", "sep_conv_3x3", "skip_connect"],
        )
    }

    pub fn raspberry_pi() -> Self {
        Self::new("raspberry_pi", 50e6, &["sep_conv_3x3", "avg_pool_3x3"])
    }

    /// Whether a single operation name matches the whitelist.
    pub fn allows_op(&self, op: &str) -> bool {
        self.allowed_ops.iter().any(|allowed| op.contains(allowed.as_str()))
    }

    /// Whether every operation matches the whitelist. Vacuously true for
    /// an empty operation list.
    pub fn allows_all<S: AsRef<str>>(&self, ops: &[S]) -> bool {
        ops.iter().all(|op| self.allows_op(op.as_ref()))
    }

    /// The hard bounds this profile imposes on measured metrics.
    pub fn constraints(&self) -> HardwareConstraints {
        HardwareConstraints::new().with_max(Metric::Flops, self.max_flops)
    }

    fn validate(&self) -> Result<()> {
        if self.max_flops.is_nan() || self.max_flops < 0.0 {
            return Err(MonasError::InvalidProfile {
                name: self.name.clone(),
                reason: format!("max_flops must be a non-negative number, got {}", self.max_flops),
            });
        }
        if let Some(op) = self.allowed_ops.iter().find(|op| op.is_empty()) {
            return Err(MonasError::InvalidProfile {
                name: self.name.clone(),
                reason: format!("empty allowed operation '{}' would match everything", op),
            });
        }
        Ok(())
    }
}

// ─── Profile table ─────────────────────────────────────────────────

/// Named hardware profiles, built once and passed by reference.
#[derive(Clone, Debug, Default)]
pub struct ProfileTable {
    profiles: BTreeMap<String, HardwareProfile>,
}

#[derive(Deserialize)]
struct ProfileFile {
    #[serde(default)]
    profiles: BTreeMap<String, HardwareProfile>,
}

impl ProfileTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The four built-in deployment targets.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for profile in [
            HardwareProfile::mobile(),
            HardwareProfile::cpu(),
            HardwareProfile::gpu(),
            HardwareProfile::raspberry_pi(),
        ] {
            table.insert(profile);
        }
        table
    }

    /// Add or replace a profile, keyed by its name.
    pub fn insert(&mut self, profile: HardwareProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_profile(mut self, profile: HardwareProfile) -> Self {
        self.insert(profile);
        self
    }

    /// Look up a profile. Unknown names are `None`, never a default profile.
    pub fn get(&self, name: &str) -> Option<&HardwareProfile> {
        self.profiles.get(name)
    }

    /// Look up a profile, turning an unknown name into a named error.
    pub fn resolve(&self, name: &str) -> Result<&HardwareProfile> {
        self.get(name)
            .ok_or_else(|| MonasError::UnknownHardwareProfile {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HardwareProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Built-in profiles extended (or overridden) by a JSON config file:
    ///
    /// ```json
    /// { "profiles": { "jetson": { "max_flops": 6e8, "allowed_ops": ["conv"] } } }
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MonasError::io(path, e))?;
        let mut table = Self::builtin();
        table.merge_json(&content, path)?;
        Ok(table)
    }

    /// Merge profiles from a JSON document into this table.
    pub fn merge_json(&mut self, content: &str, origin: &Path) -> Result<()> {
        let file: ProfileFile =
            serde_json::from_str(content).map_err(|e| MonasError::json(origin, e))?;
        for (name, mut profile) in file.profiles {
            profile.name = name;
            profile.validate()?;
            log::debug!(
                "loaded hardware profile '{}' from {}",
                profile.name,
                origin.display()
            );
            self.insert(profile);
        }
        Ok(())
    }
}

// ─── Hard constraints ──────────────────────────────────────────────

/// Upper bounds on measured metrics. A missing bound means unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HardwareConstraints {
    bounds: BTreeMap<Metric, f64>,
}

impl HardwareConstraints {
    /// No bounds at all.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max(mut self, metric: Metric, bound: f64) -> Self {
        self.bounds.insert(metric, bound);
        self
    }

    /// Parse `max_<metric>` keys, e.g. `{"max_flops": 6e8}`. A NaN bound is
    /// an error; `inf` leaves the metric unconstrained.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self> {
        let mut constraints = Self::new();
        for (key, &bound) in map {
            let metric = key
                .strip_prefix("max_")
                .ok_or_else(|| MonasError::UnknownMetric(key.clone()))?
                .parse::<Metric>()?;
            if bound.is_nan() {
                return Err(MonasError::InvalidBound {
                    key: key.clone(),
                    value: bound,
                });
            }
            constraints.bounds.insert(metric, bound);
        }
        Ok(constraints)
    }

    pub fn max(&self, metric: Metric) -> Option<f64> {
        self.bounds.get(&metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// The first bound `metrics` exceeds, if any. A NaN metric exceeds
    /// every bound.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn violation(&self, metrics: &MetricSet) -> Option<(Metric, f64)> {
        self.bounds
            .iter()
            .find(|&(&metric, &bound)| !(metrics.get(metric) <= bound))
            .map(|(&metric, &bound)| (metric, bound))
    }
}
