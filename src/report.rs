//! Derived listings over the completed entity store.
//!
//! These are read-only scans; all date windows are computed against the
//! injected reference date so listings are reproducible. Calendar-invalid
//! dates are skipped by the window listings (they are surfaced by the
//! validity rule instead).

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Date, Family, GedcomStore, Individual, Xref};

/// Width of the "recent" and "upcoming" windows, in days.
const WINDOW_DAYS: i64 = 30;

/// Age threshold for the living-singles listing.
const SINGLE_AGE_YEARS: i32 = 30;

/// One row of a listing: the entity, a display name, and listing-specific
/// detail text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Store key of the listed entity.
    pub id: Xref,
    /// Display name: the individual's name, or a couple for family rows.
    pub name: String,
    /// Listing-specific detail, e.g. the relevant date or age.
    pub detail: String,
}

fn display_name(individual: &Individual) -> String {
    individual
        .name
        .as_ref()
        .map_or_else(|| "(unknown)".to_string(), |name| name.value.clone())
}

fn couple_name(store: &GedcomStore, family: &Family) -> String {
    let spouse = |reference: &Option<crate::domain::Sourced<Xref>>| {
        reference
            .as_ref()
            .and_then(|r| store.individual(&r.value))
            .map_or_else(|| "(unknown)".to_string(), display_name)
    };
    format!("{} & {}", spouse(&family.husband), spouse(&family.wife))
}

/// Days from `date` to `today`; positive when `date` is in the past.
/// `None` when `date` is calendar-invalid.
fn days_since(date: Date, today: NaiveDate) -> Option<i64> {
    date.to_naive().map(|d| (today - d).num_days())
}

/// Days from `today` to the next anniversary of `date`'s month and day.
/// `None` when the anniversary does not exist in the coming year (a leap
/// day in a common year) or the date is calendar-invalid.
fn days_until_anniversary(date: Date, today: NaiveDate) -> Option<i64> {
    use chrono::Datelike;

    let this_year = NaiveDate::from_ymd_opt(today.year(), date.month.number(), date.day);
    let next = match this_year {
        Some(candidate) if candidate >= today => Some(candidate),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, date.month.number(), date.day),
    }?;
    Some((next - today).num_days())
}

/// Every individual with their derived age (or "unknown").
#[must_use]
pub fn ages(store: &GedcomStore) -> Vec<Entry> {
    store
        .individuals()
        .map(|individual| Entry {
            id: individual.id.clone(),
            name: display_name(individual),
            detail: individual
                .age
                .map_or_else(|| "age unknown".to_string(), |age| format!("age {age}")),
        })
        .collect()
}

/// Individuals born within the last 30 days before the reference date.
#[must_use]
pub fn recent_births(store: &GedcomStore, today: Date) -> Vec<Entry> {
    let Some(today) = today.to_naive() else {
        return Vec::new();
    };
    store
        .individuals()
        .filter_map(|individual| {
            let birth = individual.birth.as_ref()?;
            let days = days_since(birth.value, today)?;
            (0..=WINDOW_DAYS).contains(&days).then(|| Entry {
                id: individual.id.clone(),
                name: display_name(individual),
                detail: format!("born {}", birth.value),
            })
        })
        .collect()
}

/// Individuals who died within the last 30 days before the reference date.
#[must_use]
pub fn recent_deaths(store: &GedcomStore, today: Date) -> Vec<Entry> {
    let Some(today) = today.to_naive() else {
        return Vec::new();
    };
    store
        .individuals()
        .filter_map(|individual| {
            let death = individual.death.as_ref()?;
            let days = days_since(death.value, today)?;
            (0..=WINDOW_DAYS).contains(&days).then(|| Entry {
                id: individual.id.clone(),
                name: display_name(individual),
                detail: format!("died {}", death.value),
            })
        })
        .collect()
}

/// Living individuals whose birthday falls within the next 30 days.
#[must_use]
pub fn upcoming_birthdays(store: &GedcomStore, today: Date) -> Vec<Entry> {
    let Some(today) = today.to_naive() else {
        return Vec::new();
    };
    store
        .individuals()
        .filter_map(|individual| {
            if !individual.is_alive() {
                return None;
            }
            let birth = individual.birth.as_ref()?;
            let days = days_until_anniversary(birth.value, today)?;
            (0..=WINDOW_DAYS).contains(&days).then(|| Entry {
                id: individual.id.clone(),
                name: display_name(individual),
                detail: format!("birthday in {days} days ({})", birth.value),
            })
        })
        .collect()
}

/// Families whose marriage anniversary falls within the next 30 days, where
/// both spouses resolve and are alive.
#[must_use]
pub fn upcoming_anniversaries(store: &GedcomStore, today: Date) -> Vec<Entry> {
    let Some(today_naive) = today.to_naive() else {
        return Vec::new();
    };
    store
        .families()
        .filter_map(|family| {
            let marriage = family.marriage.as_ref()?;
            let husband = store.individual(&family.husband.as_ref()?.value)?;
            let wife = store.individual(&family.wife.as_ref()?.value)?;
            if !husband.is_alive() || !wife.is_alive() {
                return None;
            }
            let days = days_until_anniversary(marriage.value, today_naive)?;
            (0..=WINDOW_DAYS).contains(&days).then(|| Entry {
                id: family.id.clone(),
                name: couple_name(store, family),
                detail: format!("anniversary in {days} days ({})", marriage.value),
            })
        })
        .collect()
}

/// Children of each family in their derived order: ascending birth date,
/// which is descending age. Requires the analysis pass to have run.
#[must_use]
pub fn children_by_age(store: &GedcomStore) -> Vec<Entry> {
    store
        .families()
        .flat_map(|family| {
            family.children.iter().map(|child| {
                let (name, age) = store.individual(&child.value).map_or_else(
                    || ("(unknown)".to_string(), None),
                    |individual| (display_name(individual), individual.age),
                );
                Entry {
                    id: child.value.clone(),
                    name,
                    detail: age.map_or_else(
                        || format!("family {}, age unknown", family.id),
                        |age| format!("family {}, age {age}", family.id),
                    ),
                }
            })
        })
        .collect()
}

/// Living individuals who are a spouse in at least one family.
#[must_use]
pub fn living_married(store: &GedcomStore) -> Vec<Entry> {
    store
        .individuals()
        .filter(|individual| individual.is_alive() && !individual.spouse_in.is_empty())
        .map(|individual| Entry {
            id: individual.id.clone(),
            name: display_name(individual),
            detail: format!(
                "married in {}",
                individual
                    .spouse_in
                    .iter()
                    .map(|f| f.value.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
        .collect()
}

/// Living individuals over 30 who have never been a spouse in any family.
#[must_use]
pub fn living_single(store: &GedcomStore) -> Vec<Entry> {
    store
        .individuals()
        .filter(|individual| {
            individual.is_alive()
                && individual.spouse_in.is_empty()
                && individual.age.is_some_and(|age| age > SINGLE_AGE_YEARS)
        })
        .map(|individual| Entry {
            id: individual.id.clone(),
            name: display_name(individual),
            detail: individual
                .age
                .map_or_else(String::new, |age| format!("age {age}")),
        })
        .collect()
}

/// Members of every multiple-birth cluster. Requires the analysis pass.
#[must_use]
pub fn multiple_births(store: &GedcomStore) -> Vec<Entry> {
    store
        .families()
        .flat_map(|family| {
            family.birth_clusters.iter().flat_map(|cluster| {
                cluster.iter().map(|member| {
                    let name = store
                        .individual(member)
                        .map_or_else(|| "(unknown)".to_string(), display_name);
                    Entry {
                        id: member.clone(),
                        name,
                        detail: format!("multiple birth in family {}", family.id),
                    }
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis, parser};

    fn date(s: &str) -> Date {
        s.parse().expect("valid date")
    }

    fn sample_store(today: &str) -> GedcomStore {
        let mut store = parser::build([
            "0 @I1@ INDI",
            "1 NAME Old /Timer/",
            "1 SEX M",
            "1 BIRT",
            "2 DATE 1 SEP 1980",
            "1 FAMS @F1@",
            "0 @I2@ INDI",
            "1 NAME New /Arrival/",
            "1 BIRT",
            "2 DATE 20 AUG 2026",
            "0 @I3@ INDI",
            "1 NAME Dear /Departed/",
            "1 BIRT",
            "2 DATE 1 JAN 1950",
            "1 DEAT",
            "2 DATE 10 AUG 2026",
            "0 @I4@ INDI",
            "1 NAME Free /Spirit/",
            "1 BIRT",
            "2 DATE 1 JAN 1990",
            "0 @F1@ FAM",
            "1 HUSB @I1@",
            "1 MARR",
            "2 DATE 5 SEP 2005",
        ]);
        analysis::run(&mut store, date(today));
        store
    }

    #[test]
    fn recent_births_within_window() {
        let store = sample_store("27 AUG 2026");
        let entries = recent_births(&store, date("27 AUG 2026"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "@I2@");
    }

    #[test]
    fn recent_deaths_within_window() {
        let store = sample_store("27 AUG 2026");
        let entries = recent_deaths(&store, date("27 AUG 2026"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "@I3@");
    }

    #[test]
    fn upcoming_birthdays_exclude_the_dead() {
        let store = sample_store("27 AUG 2026");
        let entries = upcoming_birthdays(&store, date("27 AUG 2026"));
        // @I1@'s birthday (1 SEP) is 5 days out; @I3@ is dead, @I4@ and
        // @I2@ are months away.
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert!(ids.contains(&"@I1@"));
        assert!(!ids.contains(&"@I3@"));
    }

    #[test]
    fn anniversary_requires_both_spouses_to_resolve() {
        let store = sample_store("27 AUG 2026");
        // @F1@ has no wife reference, so no anniversary row.
        assert!(upcoming_anniversaries(&store, date("27 AUG 2026")).is_empty());
    }

    #[test]
    fn living_married_and_single_partition() {
        let store = sample_store("27 AUG 2026");
        let married: Vec<String> = living_married(&store)
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(married, ["@I1@"]);

        let single: Vec<String> = living_single(&store)
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        // @I4@ is 36 and never married; @I2@ is a newborn, under the
        // 30-year threshold; @I3@ is dead.
        assert_eq!(single, ["@I4@"]);
    }

    #[test]
    fn ages_listing_reports_unknown() {
        let mut store = parser::build(["0 @I1@ INDI", "1 NAME No /Birth/"]);
        analysis::run(&mut store, date("27 AUG 2026"));
        let entries = ages(&store);
        assert_eq!(entries[0].detail, "age unknown");
    }

    #[test]
    fn leap_day_birthday_skips_common_years() {
        let mut store = parser::build([
            "0 @I1@ INDI",
            "1 BIRT",
            "2 DATE 29 FEB 2000",
        ]);
        analysis::run(&mut store, date("1 FEB 2026"));
        // 2026 is a common year: no 29 FEB anniversary to report.
        assert!(upcoming_birthdays(&store, date("1 FEB 2026")).is_empty());
    }
}
