use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::descriptor::{OptionDescriptor, OptionValue};

/// Storage key of a resolved option: the option name plus the language it
/// is scoped to, or `None` for language-independent storage.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OptionKey {
    pub name: &'static str,
    pub language: Option<String>,
}

impl OptionKey {
    pub fn global(name: &'static str) -> Self {
        OptionKey {
            name,
            language: None,
        }
    }

    pub fn for_language(name: &'static str, language: impl Into<String>) -> Self {
        OptionKey {
            name,
            language: Some(language.into()),
        }
    }

    /// Key under which `descriptor` is stored when resolved for `language`.
    pub fn scoped(descriptor: &OptionDescriptor, language: &str) -> Self {
        if descriptor.is_per_language {
            OptionKey::for_language(descriptor.name, language)
        } else {
            OptionKey::global(descriptor.name)
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(language) => write!(f, "{}[{}]", self.name, language),
            None => f.write_str(self.name),
        }
    }
}

/// Immutable option set.
///
/// Updates never touch an existing set: [`with`](Self::with) returns a new
/// set that shares the baseline table and every earlier override, so a
/// process-wide baseline can be cloned into each document for free.
#[derive(Clone, Debug, Default)]
pub struct ResolvedOptionSet {
    baseline: Arc<HashMap<OptionKey, OptionValue>>,
    overrides: Option<Arc<Override>>,
}

#[derive(Debug)]
struct Override {
    key: OptionKey,
    value: OptionValue,
    previous: Option<Arc<Override>>,
}

impl ResolvedOptionSet {
    /// Baseline holding each descriptor's default under its global key.
    pub fn from_defaults<'a, I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = &'a OptionDescriptor>,
    {
        let baseline = descriptors
            .into_iter()
            .map(|descriptor| (OptionKey::global(descriptor.name), descriptor.default.clone()))
            .collect();
        ResolvedOptionSet {
            baseline: Arc::new(baseline),
            overrides: None,
        }
    }

    /// New set with `key` bound to `value`; `self` stays as it was.
    pub fn with(&self, key: OptionKey, value: OptionValue) -> Self {
        ResolvedOptionSet {
            baseline: Arc::clone(&self.baseline),
            overrides: Some(Arc::new(Override {
                key,
                value,
                previous: self.overrides.clone(),
            })),
        }
    }

    /// Exact lookup, without falling back to the global key.
    pub fn get_key(&self, key: &OptionKey) -> Option<&OptionValue> {
        let mut cursor = self.overrides.as_deref();
        while let Some(entry) = cursor {
            if &entry.key == key {
                return Some(&entry.value);
            }
            cursor = entry.previous.as_deref();
        }
        self.baseline.get(key)
    }

    /// Value of `descriptor` as seen by a document written in `language`.
    ///
    /// Per-language options look under the language first and fall back to
    /// the global entry, which holds the language-independent default.
    pub fn get(&self, descriptor: &OptionDescriptor, language: &str) -> Option<&OptionValue> {
        if descriptor.is_per_language {
            let scoped = OptionKey::for_language(descriptor.name, language);
            if let Some(value) = self.get_key(&scoped) {
                return Some(value);
            }
        }
        self.get_key(&OptionKey::global(descriptor.name))
    }

    pub fn get_bool(&self, descriptor: &OptionDescriptor, language: &str) -> Option<bool> {
        self.get(descriptor, language).and_then(OptionValue::as_bool)
    }

    pub fn get_int(&self, descriptor: &OptionDescriptor, language: &str) -> Option<i64> {
        self.get(descriptor, language).and_then(OptionValue::as_int)
    }

    pub fn get_literal(
        &self,
        descriptor: &OptionDescriptor,
        language: &str,
    ) -> Option<&'static str> {
        self.get(descriptor, language)
            .and_then(OptionValue::as_literal)
    }

    pub fn get_str(&self, descriptor: &OptionDescriptor, language: &str) -> Option<&str> {
        self.get(descriptor, language).and_then(OptionValue::as_str)
    }

    /// Number of overrides layered over the baseline.
    pub fn override_count(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.overrides.as_deref();
        while let Some(entry) = cursor {
            count += 1;
            cursor = entry.previous.as_deref();
        }
        count
    }

    /// Flatten into a sorted map, later overrides shadowing earlier ones.
    pub fn entries(&self) -> BTreeMap<OptionKey, OptionValue> {
        let mut entries: BTreeMap<OptionKey, OptionValue> = self
            .baseline
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut chain = Vec::new();
        let mut cursor = self.overrides.as_deref();
        while let Some(entry) = cursor {
            chain.push(entry);
            cursor = entry.previous.as_deref();
        }
        for entry in chain.into_iter().rev() {
            entries.insert(entry.key.clone(), entry.value.clone());
        }
        entries
    }
}

impl PartialEq for ResolvedOptionSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl Eq for ResolvedOptionSet {}

impl Drop for Override {
    // Unlink the chain iteratively so long override histories cannot
    // overflow the stack when the last set referencing them goes away.
    fn drop(&mut self) {
        let mut next = self.previous.take();
        while let Some(entry) = next {
            match Arc::try_unwrap(entry) {
                Ok(mut owned) => next = owned.previous.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ValueType;

    const WIDTH: OptionDescriptor = OptionDescriptor {
        name: "width",
        value_type: ValueType::Int,
        is_per_language: true,
        convention_key: Some("width"),
        default: OptionValue::Int(4),
    };

    #[test]
    fn with_leaves_the_original_untouched() {
        let baseline = ResolvedOptionSet::from_defaults([&WIDTH]);
        let updated = baseline.with(
            OptionKey::for_language("width", "rust"),
            OptionValue::Int(2),
        );

        assert_eq!(baseline.get_int(&WIDTH, "rust"), Some(4));
        assert_eq!(updated.get_int(&WIDTH, "rust"), Some(2));
        assert_eq!(updated.get_int(&WIDTH, "python"), Some(4));
        assert_eq!(baseline.override_count(), 0);
        assert_eq!(updated.override_count(), 1);
    }

    #[test]
    fn later_override_shadows_earlier() {
        let set = ResolvedOptionSet::from_defaults([&WIDTH])
            .with(OptionKey::global("width"), OptionValue::Int(8))
            .with(OptionKey::global("width"), OptionValue::Int(3));
        assert_eq!(
            set.get_key(&OptionKey::global("width")),
            Some(&OptionValue::Int(3))
        );
        assert_eq!(set.entries().len(), 1);
    }

    #[test]
    fn long_chains_drop_cleanly() {
        let mut set = ResolvedOptionSet::default();
        for value in 0..200_000 {
            set = set.with(OptionKey::global("width"), OptionValue::Int(value));
        }
        drop(set);
    }
}
