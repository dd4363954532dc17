//! Selected sub-category filters.

/// The set of selected sub-categories.
///
/// Membership is a set (no duplicates, equality ignores order) but the
/// selection order is kept because it is the order the remote API receives
/// in the comma-joined `subCategories` parameter.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    selected: Vec<String>,
}

impl FilterSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: Vec::new(),
        }
    }

    /// Toggle a category in or out of the set (symmetric difference).
    ///
    /// Returns `true` if the category is selected afterwards.
    pub fn toggle(&mut self, category: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|c| c == category) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(category.to_owned());
            true
        }
    }

    /// Remove every selection. Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.selected.iter().any(|c| c == category)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected categories in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }
}

impl PartialEq for FilterSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|c| other.contains(c))
    }
}

impl Eq for FilterSet {}

impl<'a> FromIterator<&'a str> for FilterSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for category in iter {
            if !set.contains(category) {
                set.toggle(category);
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_symmetric_difference() {
        let mut filters = FilterSet::new();
        assert!(filters.toggle("Matte"));
        assert!(filters.toggle("Glossy"));
        assert!(!filters.toggle("Matte"));
        assert_eq!(filters.iter().collect::<Vec<_>>(), vec!["Glossy"]);
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        let original: FilterSet = ["Textured"].into_iter().collect();
        let mut filters = original.clone();
        filters.toggle("Floral");
        filters.toggle("Floral");
        assert_eq!(filters, original);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: FilterSet = ["Matte", "Glossy"].into_iter().collect();
        let b: FilterSet = ["Glossy", "Matte"].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_iter_deduplicates() {
        let set: FilterSet = ["Oak", "Oak", "Teak"].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_clear_reports_change() {
        let mut filters = FilterSet::new();
        assert!(!filters.clear());
        filters.toggle("Oak");
        assert!(filters.clear());
        assert!(filters.is_empty());
    }
}
