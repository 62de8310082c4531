//! The derived-data pass.
//!
//! Runs once over the completed store, after the build pass and before the
//! rule engine: computes each individual's age, reorders family children by
//! birth date, and detects multiple-birth clusters. The reference date is
//! injected explicitly so the whole pipeline is deterministic under test.

use std::{cmp::Ordering, collections::HashMap};

use tracing::instrument;

use crate::domain::{Date, GedcomStore, Xref};

/// Computes all derived fields in place.
#[instrument(skip(store))]
pub fn run(store: &mut GedcomStore, today: Date) {
    compute_ages(store, today);
    sort_siblings(store);
    detect_multiple_births(store);
}

/// Sets each individual's age: whole years from birth to the death date if
/// present, otherwise to `today`. Individuals without a birth date keep
/// `None`: age is unknown, never zero.
pub fn compute_ages(store: &mut GedcomStore, today: Date) {
    for individual in store.individuals_mut() {
        let end = individual.death.as_ref().map_or(today, |death| death.value);
        individual.age = individual
            .birth
            .as_ref()
            .map(|birth| birth.value.years_until(end));
    }
}

/// Reorders each family's children ascending by birth date.
///
/// Children with an unknown birth date sort after all dated children; the
/// sort is stable, so ties and unknowns keep their original relative order.
pub fn sort_siblings(store: &mut GedcomStore) {
    let births = birth_dates(store);
    for family in store.families_mut() {
        family.children.sort_by(|a, b| {
            match (births.get(&a.value), births.get(&b.value)) {
                (Some(left), Some(right)) => left.cmp(right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}

/// Groups consecutive birth-sorted siblings with identical birth dates into
/// clusters of two or more. Must run after [`sort_siblings`].
pub fn detect_multiple_births(store: &mut GedcomStore) {
    let births = birth_dates(store);
    for family in store.families_mut() {
        let mut clusters: Vec<Vec<Xref>> = Vec::new();
        let mut run: Vec<Xref> = Vec::new();
        let mut run_date: Option<Date> = None;

        for child in &family.children {
            let date = births.get(&child.value).copied();
            if date.is_some() && date == run_date {
                run.push(child.value.clone());
            } else {
                if run.len() > 1 {
                    clusters.push(std::mem::take(&mut run));
                }
                run.clear();
                if date.is_some() {
                    run.push(child.value.clone());
                }
                run_date = date;
            }
        }
        if run.len() > 1 {
            clusters.push(run);
        }

        family.birth_clusters = clusters;
    }
}

/// Snapshot of known birth dates, keyed by individual store key. Children
/// whose reference does not resolve simply have no entry, the same as a
/// missing birth date.
fn birth_dates(store: &GedcomStore) -> HashMap<Xref, Date> {
    store
        .individuals()
        .filter_map(|individual| {
            individual
                .birth
                .as_ref()
                .map(|birth| (individual.id.clone(), birth.value))
        })
        .collect()
}
