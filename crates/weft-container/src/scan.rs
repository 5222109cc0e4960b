//! Package-scan roots shared by every scope of a layered container.

use weft_core::PluginDescriptor;

/// Ordered, duplicate-free set of package roots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageScan {
    roots: Vec<String>,
}

impl PackageScan {
    /// Creates an empty scan, which matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the roots of every descriptor whose injection spec is present
    /// and enabled, in first-seen order.
    pub fn from_descriptors<'a, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a PluginDescriptor>,
    {
        let mut scan = Self::new();
        for descriptor in descriptors.into_iter().filter(|d| d.is_injected()) {
            if let Some(spec) = &descriptor.injection {
                scan.extend(spec.package_scan.iter().cloned());
            }
        }
        scan
    }

    /// Adds a root unless it is already present.  Returns `true` when added.
    pub fn insert(&mut self, root: impl Into<String>) -> bool {
        let root = root.into();
        if self.roots.contains(&root) {
            return false;
        }
        self.roots.push(root);
        true
    }

    /// Roots in first-seen order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Number of distinct roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` when no root is configured.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Returns `true` when `package` is one of the roots or nested below one.
    ///
    /// Nesting is recognised after either a `::` or a `.` separator, so
    /// `acme` covers `acme::checks` and `acme.checks` but not `acmecorp`.
    pub fn matches(&self, package: &str) -> bool {
        self.roots.iter().any(|root| {
            package
                .strip_prefix(root.as_str())
                .is_some_and(|rest| {
                    rest.is_empty() || rest.starts_with("::") || rest.starts_with('.')
                })
        })
    }
}

impl Extend<String> for PackageScan {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for root in iter {
            self.insert(root);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PackageScan {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut scan = Self::new();
        for root in iter {
            scan.insert(root);
        }
        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::InjectionSpec;

    #[test]
    fn union_keeps_first_seen_order() {
        let descriptors = [
            PluginDescriptor::new("a").with_injection(InjectionSpec::scanning(["pkg.x"])),
            PluginDescriptor::new("b").with_injection(InjectionSpec::scanning(["pkg.y", "pkg.x"])),
        ];

        let scan = PackageScan::from_descriptors(&descriptors);
        assert_eq!(scan.roots(), ["pkg.x", "pkg.y"]);
    }

    #[test]
    fn union_ignores_plain_and_disabled_descriptors() {
        let descriptors = [
            PluginDescriptor::new("plain"),
            PluginDescriptor::new("off")
                .with_injection(InjectionSpec::scanning(["pkg.off"]).with_enabled(false)),
            PluginDescriptor::new("on").with_injection(InjectionSpec::scanning(["pkg.on"])),
        ];

        let scan = PackageScan::from_descriptors(&descriptors);
        assert_eq!(scan.roots(), ["pkg.on"]);
    }

    #[test]
    fn matching_respects_segment_boundaries() {
        let scan: PackageScan = ["acme", "org.example"].into_iter().collect();

        assert!(scan.matches("acme"));
        assert!(scan.matches("acme::checks"));
        assert!(scan.matches("org.example.rules"));
        assert!(!scan.matches("acmecorp"));
        assert!(!scan.matches("org"));
        assert!(!PackageScan::new().matches("acme"));
    }
}
