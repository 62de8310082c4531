//! Uniqueness rules over identifiers and name/birth pairs.

use std::collections::HashMap;

use super::{Context, Finding};
use crate::domain::GedcomStore;

/// No two individuals, and no two families, may share a normalized
/// identifier. The store de-duplicates colliding keys at build time and
/// keeps the raw identifier on the entity, so a collision shows up as a
/// stored key that differs from the raw form: one finding per extra
/// entity. Individual and family identifiers are independent namespaces.
pub fn check_unique_ids(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for individual in store.individuals() {
        if individual.id != individual.raw_id {
            findings.push(Finding::new(
                "unique-ids",
                &individual.id,
                vec![individual.id_line],
                format!("individual identifier {} is not unique", individual.raw_id),
            ));
        }
    }
    for family in store.families() {
        if family.id != family.raw_id {
            findings.push(Finding::new(
                "unique-ids",
                &family.id,
                vec![family.id_line],
                format!("family identifier {} is not unique", family.raw_id),
            ));
        }
    }

    findings
}

/// No two individuals may share both an identical name and an identical
/// birth date. Applicable only to individuals with both fields present;
/// the finding cites the creation lines of both individuals.
pub fn check_unique_name_and_birth(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut seen: HashMap<(&str, crate::domain::Date), usize> = HashMap::new();
    let mut findings = Vec::new();

    for individual in store.individuals() {
        let (Some(name), Some(birth)) = (&individual.name, &individual.birth) else {
            continue;
        };
        let key = (name.value.as_str(), birth.value);
        if let Some(first_line) = seen.get(&key) {
            findings.push(Finding::new(
                "unique-name-and-birth",
                &individual.id,
                vec![*first_line, individual.id_line],
                format!(
                    "name '{}' and birth date {} duplicate an earlier individual",
                    name.value, birth.value
                ),
            ));
        } else {
            seen.insert(key, individual.id_line);
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Date, Sourced, Xref};

    fn xref(s: &str) -> Xref {
        Xref::new(s).expect("valid identifier")
    }

    fn date(s: &str) -> Date {
        s.parse().expect("valid date")
    }

    fn ctx() -> Context {
        Context {
            today: date("27 AUG 2026"),
        }
    }

    fn named_individual(store: &mut GedcomStore, id: &str, line: usize, name: &str, birth: &str) {
        let key = store.insert_individual(xref(id), line);
        let individual = store.individual_mut(&key).expect("just inserted");
        individual.name = Some(Sourced::new(name.to_string(), line + 1));
        individual.birth = Some(Sourced::new(date(birth), line + 2));
    }

    #[test]
    fn shared_individual_id_is_one_finding() {
        let mut store = GedcomStore::new();
        store.insert_individual(xref("@I1@"), 1);
        store.insert_individual(xref("@I1@"), 2);

        let findings = check_unique_ids(&store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![2]);
    }

    #[test]
    fn shared_family_id_is_one_finding() {
        let mut store = GedcomStore::new();
        store.insert_family(xref("@F1@"), 1);
        store.insert_family(xref("@F1@"), 2);

        assert_eq!(check_unique_ids(&store, &ctx()).len(), 1);
    }

    #[test]
    fn id_normalization_makes_case_variants_collide() {
        let mut store = GedcomStore::new();
        store.insert_individual(xref("@i1@"), 1);
        store.insert_individual(xref("@I1@"), 2);

        assert_eq!(check_unique_ids(&store, &ctx()).len(), 1);
    }

    #[test]
    fn shared_id_across_individual_and_family_is_fine() {
        let mut store = GedcomStore::new();
        store.insert_individual(xref("@1@"), 1);
        store.insert_family(xref("@1@"), 2);

        assert!(check_unique_ids(&store, &ctx()).is_empty());
    }

    #[test]
    fn distinct_ids_are_fine() {
        let mut store = GedcomStore::new();
        store.insert_individual(xref("@I1@"), 1);
        store.insert_individual(xref("@I2@"), 2);
        store.insert_family(xref("@F1@"), 3);
        store.insert_family(xref("@F2@"), 4);

        assert!(check_unique_ids(&store, &ctx()).is_empty());
    }

    #[test]
    fn shared_name_and_birth_is_one_finding() {
        let mut store = GedcomStore::new();
        named_individual(&mut store, "@I1@", 1, "John Smith", "16 MAR 1999");
        named_individual(&mut store, "@I2@", 5, "John Smith", "16 MAR 1999");

        let findings = check_unique_name_and_birth(&store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![1, 5]);
    }

    #[test]
    fn same_birth_different_name_is_fine() {
        let mut store = GedcomStore::new();
        named_individual(&mut store, "@I1@", 1, "Joe Smith", "16 MAR 1999");
        named_individual(&mut store, "@I2@", 5, "John Smith", "16 MAR 1999");

        assert!(check_unique_name_and_birth(&store, &ctx()).is_empty());
    }

    #[test]
    fn same_name_different_birth_is_fine() {
        let mut store = GedcomStore::new();
        named_individual(&mut store, "@I1@", 1, "John Smith", "15 MAR 1999");
        named_individual(&mut store, "@I2@", 5, "John Smith", "16 MAR 1999");

        assert!(check_unique_name_and_birth(&store, &ctx()).is_empty());
    }

    #[test]
    fn individual_without_birth_date_is_inapplicable() {
        let mut store = GedcomStore::new();
        let first = store.insert_individual(xref("@I1@"), 1);
        store.individual_mut(&first).expect("present").name =
            Some(Sourced::new("John Smith".to_string(), 2));
        let second = store.insert_individual(xref("@I2@"), 3);
        store.individual_mut(&second).expect("present").name =
            Some(Sourced::new("John Smith".to_string(), 4));

        assert!(check_unique_name_and_birth(&store, &ctx()).is_empty());
    }
}
