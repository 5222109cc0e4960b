//! Per-descriptor failures and load statistics.

use std::fmt;

use serde::Serialize;

use crate::loaded::LoadedPlugin;
use crate::resolver::ResolutionFailure;

/// Category of a per-descriptor failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No source resolved the type name.
    Resolution,
    /// The type resolved but could not be constructed as the capability.
    Construction,
    /// The type resolved but the container could not produce the bean.
    InjectionLookup,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolution => "resolution",
            Self::Construction => "construction",
            Self::InjectionLookup => "injection lookup",
        })
    }
}

/// One descriptor that did not produce a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Type name from the descriptor.
    pub type_name: String,
    /// Bean name requested from the container, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bean_name: Option<String>,
    /// Failure category.
    pub kind: FailureKind,
    /// Labels of the sources that were tried.
    pub sources_tried: Vec<String>,
    /// Human-readable cause.
    pub message: String,
}

impl LoadFailure {
    pub(crate) fn resolution(failure: &ResolutionFailure) -> Self {
        Self {
            type_name: failure.type_name.clone(),
            bean_name: None,
            kind: FailureKind::Resolution,
            sources_tried: failure.sources_tried(),
            message: failure.to_string(),
        }
    }

    pub(crate) fn new(
        kind: FailureKind,
        type_name: impl Into<String>,
        sources_tried: Vec<String>,
        message: impl fmt::Display,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            bean_name: None,
            kind,
            sources_tried,
            message: message.to_string(),
        }
    }

    pub(crate) fn with_bean_name(mut self, bean_name: Option<&str>) -> Self {
        self.bean_name = bean_name.map(str::to_string);
        self
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure for '{}'", self.kind, self.type_name)?;
        if let Some(bean) = &self.bean_name {
            write!(f, " (bean '{bean}')")?;
        }
        write!(f, ": {} [tried: {}]", self.message, self.sources_tried.join(", "))
    }
}

/// Statistics about one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Descriptors that were attempted.
    pub attempted: usize,
    /// Plugins in the result.
    pub loaded: usize,
    /// Plugins built but dropped because `enabled()` was false.
    pub disabled: usize,
    /// Descriptors declared disabled and never attempted.
    pub skipped: usize,
    /// Descriptors that failed.
    pub failed: usize,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Plugins: {} loaded of {} attempted ({} disabled, {} failed), {} skipped",
            self.loaded, self.attempted, self.disabled, self.failed, self.skipped
        )
    }
}

/// Everything a load observed besides the plugins themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    failures: Vec<LoadFailure>,
    stats: LoadStats,
}

impl LoadReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures in the order they occurred.
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Failures of one kind.
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &LoadFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }

    /// Returns `true` when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Counters for this load.
    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Appends the failures and counters of `other`.
    pub fn merge(&mut self, other: LoadReport) {
        self.failures.extend(other.failures);
        self.stats.attempted += other.stats.attempted;
        self.stats.loaded += other.stats.loaded;
        self.stats.disabled += other.stats.disabled;
        self.stats.skipped += other.stats.skipped;
        self.stats.failed += other.stats.failed;
    }

    pub(crate) fn attempted(&mut self) {
        self.stats.attempted += 1;
    }

    pub(crate) fn loaded(&mut self) {
        self.stats.loaded += 1;
    }

    pub(crate) fn disabled(&mut self) {
        self.stats.disabled += 1;
    }

    pub(crate) fn skipped(&mut self) {
        self.stats.skipped += 1;
    }

    pub(crate) fn fail(&mut self, failure: LoadFailure) {
        self.stats.failed += 1;
        self.failures.push(failure);
    }
}

/// Plugins produced by a load plus its report.
pub struct LoadOutcome<P: ?Sized> {
    /// Enabled plugins, in descriptor order.
    pub plugins: Vec<LoadedPlugin<P>>,
    /// Failures and counters.
    pub report: LoadReport,
}

impl<P: ?Sized> LoadOutcome<P> {
    pub(crate) fn empty() -> Self {
        Self {
            plugins: Vec::new(),
            report: LoadReport::new(),
        }
    }

    /// Type names of the loaded plugins, in order.
    pub fn type_names(&self) -> Vec<&str> {
        self.plugins.iter().map(LoadedPlugin::type_name).collect()
    }

    /// Number of loaded plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugin was loaded.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Drops the report and unwraps the plugin objects.
    pub fn into_plugins(self) -> Vec<Box<P>> {
        self.plugins.into_iter().map(LoadedPlugin::into_plugin).collect()
    }

    /// Appends `other` after this outcome.
    pub fn extend(&mut self, other: LoadOutcome<P>) {
        self.plugins.extend(other.plugins);
        self.report.merge(other.report);
    }
}

impl<P: ?Sized> fmt::Debug for LoadOutcome<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOutcome")
            .field("plugins", &self.plugins)
            .field("report", &self.report)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_display_summarises_counts() {
        let stats = LoadStats {
            attempted: 4,
            loaded: 2,
            disabled: 1,
            skipped: 1,
            failed: 1,
        };
        assert_eq!(
            stats.to_string(),
            "Plugins: 2 loaded of 4 attempted (1 disabled, 1 failed), 1 skipped"
        );
    }

    #[test]
    fn failure_display_names_kind_bean_and_sources() {
        let failure = LoadFailure::new(
            FailureKind::InjectionLookup,
            "acme::Bar",
            vec!["s1".into(), "s2".into()],
            "no bean",
        )
        .with_bean_name(Some("b1"));

        assert_eq!(
            failure.to_string(),
            "injection lookup failure for 'acme::Bar' (bean 'b1'): no bean [tried: s1, s2]"
        );
    }

    #[test]
    fn merge_accumulates() {
        let mut first = LoadReport::new();
        first.attempted();
        first.loaded();

        let mut second = LoadReport::new();
        second.attempted();
        second.fail(LoadFailure::new(FailureKind::Resolution, "x", Vec::new(), "gone"));

        first.merge(second);
        assert_eq!(first.stats().attempted, 2);
        assert_eq!(first.stats().failed, 1);
        assert_eq!(first.failures_of(FailureKind::Resolution).count(), 1);
        assert!(!first.is_clean());
    }

    #[test]
    fn report_serializes_kinds_in_snake_case() {
        let mut report = LoadReport::new();
        report.fail(LoadFailure::new(FailureKind::InjectionLookup, "x", Vec::new(), "m"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["kind"], "injection_lookup");
        assert_eq!(json["stats"]["failed"], 1);
    }
}
