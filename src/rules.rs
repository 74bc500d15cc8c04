//! Extension rules: which category folder a file belongs in.
//!
//! A [`RuleSet`] is the user-facing, ordered list of `category -> extensions`
//! pairs (the shape config files use). A [`RuleTable`] is the normalized
//! reverse lookup built from it once per run.
//!
//! # Examples
//!
//! ```
//! use smartsort::rules::{RuleSet, RuleTable};
//!
//! let table = RuleTable::new(&RuleSet::default());
//! assert_eq!(table.category_for("pdf"), Some("Documents"));
//! assert_eq!(table.category_for(".JPG"), Some("Images"));
//! assert_eq!(table.category_for("txt"), Some("Documents"));
//! assert_eq!(table.category_for("exe"), None);
//! ```

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Built-in categories, in registration order.
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("Documents", &["pdf", "doc", "docx", "txt", "odt"]),
    ("Images", &["jpg", "jpeg", "png", "gif", "bmp", "tiff"]),
    ("Archives", &["zip", "rar", "7z", "tar", "gz"]),
    ("Videos", &["mp4", "mov", "avi", "mkv"]),
    ("Audio", &["mp3", "wav", "aac", "flac"]),
];

/// A rule set that cannot be used to build category folders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("invalid category name '{name}': {reason}")]
    InvalidCategory { name: String, reason: &'static str },
}

/// Ordered `category -> extensions` pairs.
///
/// Order matters: when two categories claim the same extension the one that
/// appears first wins. Deserializing keeps the order of the source document,
/// and a category named twice is merged into its first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<(String, Vec<String>)>,
}

impl RuleSet {
    /// Creates a rule set with no categories.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends extensions to a category, registering the category if it is new.
    pub fn push<C, I, E>(&mut self, category: C, extensions: I)
    where
        C: Into<String>,
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        let category = category.into();
        let extensions = extensions.into_iter().map(Into::into);
        match self.rules.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => existing.extend(extensions),
            None => self.rules.push((category, extensions.collect())),
        }
    }

    /// Iterates over `(category, extensions)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rules
            .iter()
            .map(|(category, extensions)| (category.as_str(), extensions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up the extensions registered for a category, exactly as written.
    pub fn extensions(&self, category: &str) -> Option<&[String]> {
        self.rules
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, extensions)| extensions.as_slice())
    }

    /// Checks that every category can safely be used as a folder name
    /// directly below the directory being organized.
    pub fn validate(&self) -> Result<(), RuleError> {
        for (name, _) in &self.rules {
            let reason = if name.trim().is_empty() {
                Some("name is empty")
            } else if name == "." || name == ".." {
                Some("name refers to a relative directory")
            } else if name.contains('/') || name.contains('\\') {
                Some("name contains a path separator")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(RuleError::InvalidCategory {
                    name: name.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        DEFAULT_RULES
            .iter()
            .map(|(category, extensions)| (*category, extensions.iter().copied()))
            .collect()
    }
}

impl<C, I, E> FromIterator<(C, I)> for RuleSet
where
    C: Into<String>,
    I: IntoIterator<Item = E>,
    E: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (C, I)>>(iter: T) -> Self {
        let mut rules = Self::empty();
        for (category, extensions) in iter {
            rules.push(category, extensions);
        }
        rules
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category names to lists of extensions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RuleSet, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut rules = RuleSet::empty();
                while let Some((category, extensions)) =
                    map.next_entry::<String, Vec<String>>()?
                {
                    rules.push(category, extensions);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}

/// Lowercases an extension and strips any leading dots.
///
/// ```
/// use smartsort::rules::normalize_extension;
///
/// assert_eq!(normalize_extension(".TAR"), "tar");
/// assert_eq!(normalize_extension("Gz"), "gz");
/// assert_eq!(normalize_extension("."), "");
/// ```
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Normalized `extension -> categories` lookup.
///
/// Immutable once built. Lookups are case- and leading-dot-insensitive and
/// the empty extension is an ordinary key (files without an extension).
#[derive(Debug, Clone)]
pub struct RuleTable {
    claims: HashMap<String, Vec<String>>,
    categories: Vec<String>,
}

impl RuleTable {
    /// Builds the lookup from a rule set, keeping the rule set's order.
    pub fn new(rules: &RuleSet) -> Self {
        let mut claims: HashMap<String, Vec<String>> = HashMap::new();
        let mut categories = Vec::with_capacity(rules.len());

        for (category, extensions) in rules.iter() {
            categories.push(category.to_string());
            for ext in extensions {
                let claimants = claims.entry(normalize_extension(ext)).or_default();
                if !claimants.iter().any(|c| c == category) {
                    claimants.push(category.to_string());
                }
            }
        }

        Self { claims, categories }
    }

    /// Returns the category a file with this extension is sorted into.
    pub fn category_for(&self, ext: &str) -> Option<&str> {
        self.claims(ext).first().map(String::as_str)
    }

    /// Every category that claims this extension, first-registered first.
    pub fn claims(&self, ext: &str) -> &[String] {
        self.claims
            .get(&normalize_extension(ext))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All categories in registration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(&RuleSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_order() {
        let rules = RuleSet::default();
        let names: Vec<&str> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["Documents", "Images", "Archives", "Videos", "Audio"]
        );
        assert_eq!(
            rules.extensions("Archives").map(|e| e.len()),
            Some(5),
            "Archives should carry zip, rar, 7z, tar and gz"
        );
    }

    #[test]
    fn test_default_table_lookups() {
        let table = RuleTable::default();
        assert_eq!(table.category_for("docx"), Some("Documents"));
        assert_eq!(table.category_for("tiff"), Some("Images"));
        assert_eq!(table.category_for("7z"), Some("Archives"));
        assert_eq!(table.category_for("mkv"), Some("Videos"));
        assert_eq!(table.category_for("flac"), Some("Audio"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = RuleTable::default();
        for (_, extensions) in RuleSet::default().iter() {
            for ext in extensions {
                assert_eq!(
                    table.category_for(ext),
                    table.category_for(&ext.to_uppercase()),
                    "case mismatch for {ext}"
                );
            }
        }
    }

    #[test]
    fn test_lookup_ignores_leading_dot() {
        let table = RuleTable::default();
        assert_eq!(table.category_for(".pdf"), table.category_for("pdf"));
        assert_eq!(table.category_for("..Mp3"), Some("Audio"));
    }

    #[test]
    fn test_rules_are_normalized_at_build_time() {
        let rules: RuleSet = [("Pictures", vec![".PNG", "Jpeg"])].into_iter().collect();
        let table = RuleTable::new(&rules);
        assert_eq!(table.category_for("png"), Some("Pictures"));
        assert_eq!(table.category_for("JPEG"), Some("Pictures"));
    }

    #[test]
    fn test_first_registered_category_wins() {
        let rules: RuleSet = [
            ("Text", vec!["txt", "md"]),
            ("Documents", vec!["TXT", "pdf"]),
        ]
        .into_iter()
        .collect();
        let table = RuleTable::new(&rules);

        assert_eq!(table.category_for("txt"), Some("Text"));
        assert_eq!(table.claims("txt"), ["Text", "Documents"]);
    }

    #[test]
    fn test_tie_break_follows_input_not_alphabet() {
        let rules: RuleSet = [("Zeta", vec!["dat"]), ("Alpha", vec!["dat"])]
            .into_iter()
            .collect();
        assert_eq!(RuleTable::new(&rules).category_for("dat"), Some("Zeta"));
    }

    #[test]
    fn test_empty_extension_is_a_key() {
        let rules: RuleSet = [("NoExtension", vec![""]), ("Misc", vec!["."])]
            .into_iter()
            .collect();
        let table = RuleTable::new(&rules);
        assert_eq!(table.category_for(""), Some("NoExtension"));
        assert_eq!(table.claims(""), ["NoExtension", "Misc"]);
    }

    #[test]
    fn test_unknown_extension_has_no_category() {
        let table = RuleTable::default();
        assert_eq!(table.category_for("exe"), None);
        assert_eq!(table.category_for(""), None);
        assert!(table.claims("exe").is_empty());
    }

    #[test]
    fn test_duplicate_category_is_merged_in_place() {
        let mut rules = RuleSet::empty();
        rules.push("Images", ["png"]);
        rules.push("Audio", ["mp3"]);
        rules.push("Images", ["gif"]);

        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules.extensions("Images"),
            Some(&["png".to_string(), "gif".to_string()][..])
        );
        assert_eq!(
            RuleTable::new(&rules).categories(),
            ["Images", "Audio"]
        );
    }

    #[test]
    fn test_validate_rejects_unsafe_category_names() {
        for bad in ["", "  ", ".", "..", "a/b", "a\\b"] {
            let rules: RuleSet = [(bad, vec!["pdf"])].into_iter().collect();
            assert!(rules.validate().is_err(), "{bad:?} should be rejected");
        }
        assert!(RuleSet::default().validate().is_ok());
    }
}
