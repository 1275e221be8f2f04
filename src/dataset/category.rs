use std::{cmp::Ordering, collections::BTreeSet, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use super::DatasetConfig;

/// A classification bucket within a dataset, e.g. "Low" or "Very High".
///
/// `Unknown` is a first-class enumerant: it never contributes to intensity,
/// whatever the enabled set says.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Unknown,
    Named(Arc<str>),
}

impl Category {
    const UNKNOWN: &'static str = "Unknown";

    pub fn new(label: &str) -> Self {
        if label == Self::UNKNOWN { Category::Unknown } else { Category::Named(Arc::from(label)) }
    }

    #[inline] pub fn is_unknown(&self) -> bool { matches!(self, Category::Unknown) }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Unknown => Self::UNKNOWN,
            Category::Named(label) => label,
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self { Category::new(label) }
}

impl From<String> for Category {
    fn from(label: String) -> Self { Category::new(&label) }
}

impl From<Category> for String {
    fn from(category: Category) -> Self { category.as_str().to_string() }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// Ordered by label text.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering { self.as_str().cmp(other.as_str()) }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

/// The set of categories the user currently has switched on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledCategories(BTreeSet<Category>);

impl EnabledCategories {
    pub fn new() -> Self { Self::default() }

    /// Every category listed in the dataset's files, which is the state after a dataset switch.
    pub fn all_of(config: &DatasetConfig) -> Self {
        Self(config.files.iter().map(|file| file.category.clone()).collect())
    }

    #[inline] pub fn contains(&self, category: &Category) -> bool { self.0.contains(category) }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Category> { self.0.iter() }

    /// Switch a category on or off; returns whether the set changed.
    pub fn set(&mut self, category: Category, enabled: bool) -> bool {
        if enabled { self.0.insert(category) } else { self.0.remove(&category) }
    }

    /// Whether a category both is enabled and may contribute to intensity.
    #[inline]
    pub fn admits(&self, category: &Category) -> bool {
        !category.is_unknown() && self.contains(category)
    }

    /// Canonical serialization used as the host's update-trigger key: sorted labels joined by commas.
    pub fn trigger_key(&self) -> String {
        self.0.iter().map(Category::as_str).collect::<Vec<_>>().join(",")
    }
}

impl<C: Into<Category>> FromIterator<C> for EnabledCategories {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_parses_to_sentinel() {
        assert_eq!(Category::from("Unknown"), Category::Unknown);
        assert!(Category::from("Unknown").is_unknown());
        assert!(!Category::from("unknown").is_unknown());
        assert_eq!(Category::from("High").as_str(), "High");
    }

    #[test]
    fn serde_uses_plain_labels() {
        let json = serde_json::to_string(&vec![Category::Unknown, Category::from("Low")]).unwrap();
        assert_eq!(json, r#"["Unknown","Low"]"#);
        let back: Vec<Category> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], Category::Unknown);
    }

    #[test]
    fn trigger_key_is_sorted_and_order_independent() {
        let a: EnabledCategories = ["Very High", "Low", "Unknown"].into_iter().collect();
        let b: EnabledCategories = ["Unknown", "Very High", "Low"].into_iter().collect();
        assert_eq!(a.trigger_key(), "Low,Unknown,Very High");
        assert_eq!(a.trigger_key(), b.trigger_key());
        assert_eq!(EnabledCategories::new().trigger_key(), "");
    }

    #[test]
    fn unknown_is_never_admitted() {
        let enabled: EnabledCategories = ["Unknown", "Low"].into_iter().collect();
        assert!(enabled.admits(&Category::from("Low")));
        assert!(!enabled.admits(&Category::Unknown));
        assert!(!enabled.admits(&Category::from("High")));
    }

    #[test]
    fn set_reports_changes() {
        let mut enabled = EnabledCategories::new();
        assert!(enabled.set("Low".into(), true));
        assert!(!enabled.set("Low".into(), true));
        assert!(enabled.set("Low".into(), false));
        assert!(enabled.is_empty());
    }
}
