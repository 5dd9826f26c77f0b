//! Name resolver: fills in target-distribution entries of a rosdep manifest.
//!
//! For every rosdep key the first distribution of the fallback chain that
//! already maps the key supplies candidate package names. The candidates are
//! checked against the target distribution's repository and, when all of
//! them exist, written back under the target distribution key.

pub mod manifest;
pub mod oracle;

use serde_yaml::{Mapping, Value};

/// Result of looking up a key's mapping along the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// No chain member maps the key.
    Absent,
    /// The first chain member present maps the key to something that is
    /// neither a string nor a list.
    Unusable {
        /// Distribution whose entry was found.
        distro: String,
    },
    /// Candidate package names from the first chain member present.
    Candidates {
        /// Distribution whose entry was used.
        distro: String,
        /// List items in manifest order. Items that are not strings can
        /// never be verified.
        packages: Vec<Value>,
    },
}

/// Finds the first distribution of `chain` present in `entry`.
///
/// Only the first member present is considered: a later member is never
/// consulted, even if the first one turns out to be unusable.
#[must_use]
pub fn lookup_fallback(entry: &Mapping, chain: &[String]) -> Fallback {
    let Some((distro, value)) =
        chain.iter().find_map(|distro| entry.get(distro.as_str()).map(|v| (distro, v)))
    else {
        return Fallback::Absent;
    };
    match normalize(value) {
        Some(packages) => Fallback::Candidates { distro: distro.clone(), packages },
        None => Fallback::Unusable { distro: distro.clone() },
    }
}

/// A scalar string becomes a one-element list; lists are taken as they are.
fn normalize(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::String(_) => Some(vec![value.clone()]),
        Value::Sequence(items) => Some(items.clone()),
        _ => None,
    }
}

/// Counters and the failure record of one resolver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    /// Keys that had usable fallback candidates.
    pub processed: usize,
    /// Keys that received a target-distribution entry.
    pub changed: usize,
    /// Keys whose candidates failed verification, in manifest order.
    pub failed: Vec<String>,
}

/// Adds `target` entries to `manifest` in place.
///
/// `exists` is asked about each candidate in order and the check stops at
/// the first package that does not exist. A list item that is not a string
/// fails the check without asking `exists`. Keys that already carry `target`,
/// have no chain member, or map to an unusable shape are left untouched and
/// are not counted as failures.
pub fn resolve<F>(manifest: &mut Mapping, target: &str, chain: &[String], mut exists: F) -> ResolveSummary
where
    F: FnMut(&str) -> bool,
{
    let mut summary = ResolveSummary::default();

    for (key, value) in manifest.iter_mut() {
        let Value::Mapping(entry) = value else {
            continue;
        };
        if entry.contains_key(target) {
            continue;
        }

        let key = key_label(key);
        let (distro, packages) = match lookup_fallback(entry, chain) {
            Fallback::Absent => continue,
            Fallback::Unusable { distro } => {
                log::debug!("{key}: {distro} entry has no usable package names, skipping");
                continue;
            }
            Fallback::Candidates { distro, packages } => (distro, packages),
        };

        summary.processed += 1;
        let names: Vec<String> = packages.iter().map(key_label).collect();
        log::info!("{key}: trying {distro} packages {names:?}");

        let verified = packages.iter().all(|pkg| match pkg.as_str() {
            Some(name) => exists(name),
            None => {
                log::warn!("{key}: {distro} item {} is not a package name", key_label(pkg));
                false
            }
        });
        if verified {
            entry.insert(Value::String(target.to_string()), Value::Sequence(packages));
            summary.changed += 1;
            log::info!("{key}: {target} => {names:?}");
        } else {
            log::warn!("{key}: not every {distro} package exists in {target}");
            summary.failed.push(key);
        }
    }

    summary
}

/// Renders a manifest key or list item for logs and the failure list.
fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other).map(|s| s.trim().to_string()).unwrap_or_default(),
    }
}
