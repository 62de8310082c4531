//! The in-memory entity store produced by the build pass.
//!
//! The [`GedcomStore`] is the single owner of all individuals and families.
//! The builder is its only mutator; the analysis pass updates derived fields
//! in place, and every validation rule and listing holds a read-only
//! reference.

use std::collections::HashMap;

use super::{family::Family, individual::Individual, xref::Xref};

/// The complete set of entities parsed from one input file.
///
/// Entities are keyed by [`Xref`]; iteration follows insertion order, which
/// is file order. When the input reuses an identifier, the later record is
/// stored under a de-duplicated key (raw identifier plus an ordinal) while
/// the raw form is retained on the entity for the uniqueness rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GedcomStore {
    individuals: HashMap<Xref, Individual>,
    families: HashMap<Xref, Family>,
    individual_order: Vec<Xref>,
    family_order: Vec<Xref>,
}

impl GedcomStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new individual for the raw identifier `raw`, de-duplicating
    /// the key if necessary. Returns the key the individual was stored
    /// under.
    pub fn insert_individual(&mut self, raw: Xref, id_line: usize) -> Xref {
        let key = unique_key(&raw, |k| self.individuals.contains_key(k));
        self.individual_order.push(key.clone());
        self.individuals
            .insert(key.clone(), Individual::new(key.clone(), raw, id_line));
        key
    }

    /// Inserts a new family for the raw identifier `raw`, de-duplicating the
    /// key if necessary. Returns the key the family was stored under.
    pub fn insert_family(&mut self, raw: Xref, id_line: usize) -> Xref {
        let key = unique_key(&raw, |k| self.families.contains_key(k));
        self.family_order.push(key.clone());
        self.families
            .insert(key.clone(), Family::new(key.clone(), raw, id_line));
        key
    }

    /// Looks up an individual by store key.
    #[must_use]
    pub fn individual(&self, id: &Xref) -> Option<&Individual> {
        self.individuals.get(id)
    }

    /// Looks up a family by store key.
    #[must_use]
    pub fn family(&self, id: &Xref) -> Option<&Family> {
        self.families.get(id)
    }

    /// Mutable lookup of an individual, for the build and analysis passes.
    #[must_use]
    pub fn individual_mut(&mut self, id: &Xref) -> Option<&mut Individual> {
        self.individuals.get_mut(id)
    }

    /// Mutable lookup of a family, for the build and analysis passes.
    #[must_use]
    pub fn family_mut(&mut self, id: &Xref) -> Option<&mut Family> {
        self.families.get_mut(id)
    }

    /// Iterates over individuals in file order.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individual_order
            .iter()
            .filter_map(|id| self.individuals.get(id))
    }

    /// Iterates over families in file order.
    pub fn families(&self) -> impl Iterator<Item = &Family> {
        self.family_order.iter().filter_map(|id| self.families.get(id))
    }

    /// Iterates mutably over all individuals, in no particular order.
    pub fn individuals_mut(&mut self) -> impl Iterator<Item = &mut Individual> {
        self.individuals.values_mut()
    }

    /// Iterates mutably over all families, in no particular order.
    pub fn families_mut(&mut self) -> impl Iterator<Item = &mut Family> {
        self.families.values_mut()
    }

    /// Number of individuals in the store.
    #[must_use]
    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    /// Number of families in the store.
    #[must_use]
    pub fn family_count(&self) -> usize {
        self.families.len()
    }
}

/// Finds a key not yet present according to `taken`, appending ordinals
/// (starting at 2) to the raw identifier until the key is free.
fn unique_key(raw: &Xref, taken: impl Fn(&Xref) -> bool) -> Xref {
    if !taken(raw) {
        return raw.clone();
    }
    let mut ordinal = 2;
    loop {
        let candidate = raw.with_ordinal(ordinal);
        if !taken(&candidate) {
            return candidate;
        }
        ordinal += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xref(s: &str) -> Xref {
        Xref::new(s).expect("valid identifier")
    }

    #[test]
    fn iteration_follows_file_order() {
        let mut store = GedcomStore::new();
        store.insert_individual(xref("@I3@"), 1);
        store.insert_individual(xref("@I1@"), 2);
        store.insert_individual(xref("@I2@"), 3);

        let ids: Vec<&str> = store.individuals().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["@I3@", "@I1@", "@I2@"]);
    }

    #[test]
    fn duplicate_raw_id_gets_deduplicated_key() {
        let mut store = GedcomStore::new();
        let first = store.insert_individual(xref("@I1@"), 1);
        let second = store.insert_individual(xref("@I1@"), 5);

        assert_eq!(first.as_str(), "@I1@");
        assert_eq!(second.as_str(), "@I1@2");

        let stored = store.individual(&second).expect("second individual");
        assert_eq!(stored.raw_id.as_str(), "@I1@");
        assert_eq!(stored.id_line, 5);
        assert_eq!(store.individual_count(), 2);
    }

    #[test]
    fn individual_and_family_keys_are_independent() {
        let mut store = GedcomStore::new();
        let indi = store.insert_individual(xref("@X1@"), 1);
        let fam = store.insert_family(xref("@X1@"), 2);

        // Same raw identifier, no collision across kinds.
        assert_eq!(indi.as_str(), "@X1@");
        assert_eq!(fam.as_str(), "@X1@");
    }

    #[test]
    fn dangling_lookup_returns_none() {
        let store = GedcomStore::new();
        assert!(store.individual(&xref("@I9@")).is_none());
        assert!(store.family(&xref("@F9@")).is_none());
    }
}
