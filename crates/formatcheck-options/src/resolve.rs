//! Overlay of convention values onto a typed option set.

use tracing::debug;

use crate::conventions::ConventionSnapshot;
use crate::descriptor::OptionDescriptor;
use crate::set::{OptionKey, ResolvedOptionSet};

/// Applies convention snapshots to option sets for a fixed descriptor
/// catalogue.
#[derive(Clone, Copy, Debug)]
pub struct OptionResolver<'a> {
    descriptors: &'a [OptionDescriptor],
}

impl<'a> OptionResolver<'a> {
    pub fn new(descriptors: &'a [OptionDescriptor]) -> Self {
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &'a [OptionDescriptor] {
        self.descriptors
    }

    /// See [`resolve_options`].
    pub fn resolve(
        &self,
        conventions: &ConventionSnapshot,
        language: &str,
        baseline: &ResolvedOptionSet,
    ) -> ResolvedOptionSet {
        resolve_options(self.descriptors, conventions, language, baseline)
    }
}

/// Derive a new option set from `baseline` by applying every convention
/// value that parses for its descriptor.
///
/// Descriptors without a convention key are skipped. Values that do not
/// parse leave the baseline entry in place; resolution itself never fails.
/// Per-language descriptors are stored under `language`, so the result can
/// be shared by documents in other languages without leaking the override.
pub fn resolve_options(
    descriptors: &[OptionDescriptor],
    conventions: &ConventionSnapshot,
    language: &str,
    baseline: &ResolvedOptionSet,
) -> ResolvedOptionSet {
    let mut resolved = baseline.clone();
    if conventions.is_empty() {
        return resolved;
    }

    for descriptor in descriptors {
        let Some(key) = descriptor.convention_key else {
            continue;
        };
        let Some(raw) = conventions.get(key) else {
            continue;
        };
        match descriptor.parse(raw) {
            Some(value) => {
                resolved = resolved.with(OptionKey::scoped(descriptor, language), value);
            }
            None => {
                debug!(
                    option = descriptor.name,
                    key,
                    raw,
                    expected = descriptor.value_type.label(),
                    "ignoring convention value that does not parse"
                );
            }
        }
    }

    resolved
}
