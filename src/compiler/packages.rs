use crate::model::Condition;
use ahash::AHashSet;

/// Packages assumed by the backend when no condition names one.
pub const DEFAULT_PACKAGES: &[&str] = &["base"];

/// Collects distinct package names in the order they are first referenced.
#[derive(Debug, Default)]
pub(super) struct PackageCollector {
    seen: AHashSet<String>,
    ordered: Vec<String>,
}

impl PackageCollector {
    pub(super) fn record(&mut self, condition: &Condition) {
        if let Some(name) = condition.package_name() {
            if self.seen.insert(name.clone()) {
                self.ordered.push(name);
            }
        }
    }

    /// The collected packages, or `defaults` when nothing was referenced.
    /// Never empty: an empty `defaults` falls back to [`DEFAULT_PACKAGES`].
    pub(super) fn finish(self, defaults: &[String]) -> Vec<String> {
        if !self.ordered.is_empty() {
            self.ordered
        } else if !defaults.is_empty() {
            defaults.to_vec()
        } else {
            DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect()
        }
    }
}
