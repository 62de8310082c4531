//! Rules over the dates recorded on a single entity.

use super::{Context, Finding};
use crate::domain::{Date, GedcomStore, Sourced};

/// Maximum age, in whole years, before a lifetime is considered erroneous.
const MAX_AGE_YEARS: i32 = 150;

/// Every recorded birth, death, marriage, and divorce date must not be
/// strictly after the current date. One finding per offending field.
pub fn check_dates_before_today(store: &GedcomStore, context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for individual in store.individuals() {
        for (label, field) in [("birth", &individual.birth), ("death", &individual.death)] {
            if let Some(finding) =
                future_date("dates-before-current-date", &individual.id, label, field, context.today)
            {
                findings.push(finding);
            }
        }
    }
    for family in store.families() {
        for (label, field) in [("marriage", &family.marriage), ("divorce", &family.divorce)] {
            if let Some(finding) =
                future_date("dates-before-current-date", &family.id, label, field, context.today)
            {
                findings.push(finding);
            }
        }
    }

    findings
}

fn future_date(
    rule: &'static str,
    id: &crate::domain::Xref,
    label: &str,
    field: &Option<Sourced<Date>>,
    today: Date,
) -> Option<Finding> {
    let sourced = field.as_ref()?;
    (sourced.value > today).then(|| {
        Finding::new(
            rule,
            id,
            vec![sourced.line],
            format!("{label} date {} is after the current date", sourced.value),
        )
    })
}

/// Every recorded date must name a day that exists in the calendar.
pub fn check_calendar_validity(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for individual in store.individuals() {
        for (label, field) in [("birth", &individual.birth), ("death", &individual.death)] {
            if let Some(finding) = invalid_date(&individual.id, label, field) {
                findings.push(finding);
            }
        }
    }
    for family in store.families() {
        for (label, field) in [("marriage", &family.marriage), ("divorce", &family.divorce)] {
            if let Some(finding) = invalid_date(&family.id, label, field) {
                findings.push(finding);
            }
        }
    }

    findings
}

fn invalid_date(
    id: &crate::domain::Xref,
    label: &str,
    field: &Option<Sourced<Date>>,
) -> Option<Finding> {
    let sourced = field.as_ref()?;
    (!sourced.value.is_valid()).then(|| {
        Finding::new(
            "valid-calendar-dates",
            id,
            vec![sourced.line],
            format!("{label} date {} is not a valid calendar date", sourced.value),
        )
    })
}

/// An individual's birth date must not be after their death date.
pub fn check_birth_before_death(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    store
        .individuals()
        .filter_map(|individual| {
            let birth = individual.birth.as_ref()?;
            let death = individual.death.as_ref()?;
            (birth.value > death.value).then(|| {
                Finding::new(
                    "birth-before-death",
                    &individual.id,
                    vec![birth.line, death.line],
                    format!(
                        "birth date {} is after death date {}",
                        birth.value, death.value
                    ),
                )
            })
        })
        .collect()
}

/// A lifetime (birth to death, or birth to the current date for the
/// living) must span fewer than 150 years.
pub fn check_age_limit(store: &GedcomStore, context: &Context) -> Vec<Finding> {
    store
        .individuals()
        .filter_map(|individual| {
            let birth = individual.birth.as_ref()?;
            let end = individual.death.as_ref().map_or(context.today, |d| d.value);
            let years = birth.value.years_until(end);
            (years >= MAX_AGE_YEARS).then(|| {
                let mut lines = vec![birth.line];
                if let Some(death) = &individual.death {
                    lines.push(death.line);
                }
                Finding::new(
                    "age-less-than-150",
                    &individual.id,
                    lines,
                    format!("age {years} reaches {MAX_AGE_YEARS} years"),
                )
            })
        })
        .collect()
}
