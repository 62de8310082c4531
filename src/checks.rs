//! The validation rule engine.
//!
//! Each rule is an independent pure function over the completed, immutable
//! store; rules never mutate entities and never fail. A rule that cannot
//! resolve a referenced entity is simply inapplicable for that field.
//! Because rules share no mutable state, the catalogue fans out over a
//! thread pool and the combined findings are sorted into a deterministic
//! order afterwards.

use rayon::prelude::*;
use serde::Serialize;
use tracing::instrument;

use crate::domain::{Date, GedcomStore, Xref};

mod dates;
mod family;
mod identity;

/// One validation failure: the offending entity, the contributing source
/// lines, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Name of the rule that produced the finding.
    pub rule: &'static str,
    /// Store key of the offending entity.
    pub id: Xref,
    /// Contributing 1-based source lines, ascending.
    pub lines: Vec<usize>,
    /// Description of the violation.
    pub message: String,
}

impl Finding {
    /// Creates a finding, sorting the contributing lines ascending.
    #[must_use]
    pub fn new(
        rule: &'static str,
        id: &Xref,
        mut lines: Vec<usize>,
        message: impl Into<String>,
    ) -> Self {
        lines.sort_unstable();
        Self {
            rule,
            id: id.clone(),
            lines,
            message: message.into(),
        }
    }
}

/// Pipeline configuration injected at the top of a run.
///
/// There is no ambient "now": the reference date is threaded explicitly so
/// repeated runs over unchanged input produce identical findings.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// The date all "current date" comparisons are made against.
    pub today: Date,
}

/// A named validation rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable rule name, used in reports and JSON output.
    pub name: &'static str,
    /// The rule function.
    pub check: fn(&GedcomStore, &Context) -> Vec<Finding>,
}

/// The fixed rule catalogue.
pub const CATALOG: &[Rule] = &[
    Rule {
        name: "dates-before-current-date",
        check: dates::check_dates_before_today,
    },
    Rule {
        name: "valid-calendar-dates",
        check: dates::check_calendar_validity,
    },
    Rule {
        name: "birth-before-death",
        check: dates::check_birth_before_death,
    },
    Rule {
        name: "age-less-than-150",
        check: dates::check_age_limit,
    },
    Rule {
        name: "correct-spouse-roles",
        check: family::check_spouse_roles,
    },
    Rule {
        name: "marriage-after-14",
        check: family::check_marriage_age,
    },
    Rule {
        name: "marriage-before-death",
        check: family::check_marriage_before_death,
    },
    Rule {
        name: "birth-before-marriage",
        check: family::check_birth_before_marriage,
    },
    Rule {
        name: "marriage-before-divorce",
        check: family::check_divorce_before_marriage,
    },
    Rule {
        name: "divorce-before-death",
        check: family::check_death_before_divorce,
    },
    Rule {
        name: "unique-ids",
        check: identity::check_unique_ids,
    },
    Rule {
        name: "unique-name-and-birth",
        check: identity::check_unique_name_and_birth,
    },
];

/// Runs every rule in the catalogue and returns the combined findings,
/// ordered by contributing line, entity, and rule name.
#[instrument(skip(store, context))]
#[must_use]
pub fn run(store: &GedcomStore, context: &Context) -> Vec<Finding> {
    let mut findings: Vec<Finding> = CATALOG
        .par_iter()
        .flat_map(|rule| (rule.check)(store, context))
        .collect();

    findings.sort_by(|a, b| {
        a.lines
            .cmp(&b.lines)
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.rule.cmp(b.rule))
    });
    findings
}
