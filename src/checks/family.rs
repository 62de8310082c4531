//! Rules spanning a family and its referenced spouses.
//!
//! Every rule here resolves spouse references through the store; a
//! reference to a missing individual makes the rule inapplicable for that
//! field, never an error.

use super::{Context, Finding};
use crate::domain::{Family, GedcomStore, Individual, Sex, Sourced, Xref};

/// Minimum age, in whole years, of each spouse at the marriage date.
const MIN_MARRIAGE_AGE_YEARS: i32 = 14;

/// Resolves the spouse references of a family that exist in the store.
fn spouses<'a>(
    store: &'a GedcomStore,
    family: &'a Family,
) -> impl Iterator<Item = (&'a Sourced<Xref>, &'a Individual)> {
    family
        .spouse_refs()
        .filter_map(|reference| store.individual(&reference.value).map(|i| (reference, i)))
}

/// A family's husband must be male and its wife female, when the
/// referenced individual exists. The finding cites the family's reference
/// line.
pub fn check_spouse_roles(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for family in store.families() {
        let roles = [
            ("husband", &family.husband, Sex::Male),
            ("wife", &family.wife, Sex::Female),
        ];
        for (role, reference, expected) in roles {
            let Some(reference) = reference else { continue };
            let Some(individual) = store.individual(&reference.value) else {
                continue;
            };
            if individual.sex() != expected {
                findings.push(Finding::new(
                    "correct-spouse-roles",
                    &family.id,
                    vec![reference.line],
                    format!(
                        "{role} {} is not recorded as {}",
                        reference.value,
                        match expected {
                            Sex::Male => "male",
                            _ => "female",
                        }
                    ),
                ));
            }
        }
    }

    findings
}

/// Marriage must happen at least 14 years after each spouse's birth. One
/// finding per underage spouse, citing the birth and marriage lines.
pub fn check_marriage_age(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for family in store.families() {
        let Some(marriage) = &family.marriage else {
            continue;
        };
        for (reference, spouse) in spouses(store, family) {
            let Some(birth) = &spouse.birth else { continue };
            let age_at_marriage = birth.value.years_until(marriage.value);
            if age_at_marriage < MIN_MARRIAGE_AGE_YEARS {
                findings.push(Finding::new(
                    "marriage-after-14",
                    &family.id,
                    vec![birth.line, marriage.line],
                    format!(
                        "spouse {} married at age {age_at_marriage}, younger than \
                         {MIN_MARRIAGE_AGE_YEARS}",
                        reference.value
                    ),
                ));
            }
        }
    }

    findings
}

/// Marriage must not happen after either spouse's death. One finding per
/// spouse who died before the marriage.
pub fn check_marriage_before_death(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for family in store.families() {
        let Some(marriage) = &family.marriage else {
            continue;
        };
        for (reference, spouse) in spouses(store, family) {
            let Some(death) = &spouse.death else { continue };
            if marriage.value > death.value {
                findings.push(Finding::new(
                    "marriage-before-death",
                    &family.id,
                    vec![marriage.line, death.line],
                    format!(
                        "marriage date {} is after the death of spouse {}",
                        marriage.value, reference.value
                    ),
                ));
            }
        }
    }

    findings
}

/// A spouse must be born on or before the family's marriage date. One
/// finding per spouse born after the marriage.
pub fn check_birth_before_marriage(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for family in store.families() {
        let Some(marriage) = &family.marriage else {
            continue;
        };
        for (reference, spouse) in spouses(store, family) {
            let Some(birth) = &spouse.birth else { continue };
            if birth.value > marriage.value {
                findings.push(Finding::new(
                    "birth-before-marriage",
                    &family.id,
                    vec![birth.line, marriage.line],
                    format!(
                        "spouse {} was born after the marriage date {}",
                        reference.value, marriage.value
                    ),
                ));
            }
        }
    }

    findings
}

/// Divorce must not precede marriage within the same family. Applicable
/// only when both dates are present.
pub fn check_divorce_before_marriage(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    store
        .families()
        .filter_map(|family| {
            let marriage = family.marriage.as_ref()?;
            let divorce = family.divorce.as_ref()?;
            (divorce.value < marriage.value).then(|| {
                Finding::new(
                    "marriage-before-divorce",
                    &family.id,
                    vec![marriage.line, divorce.line],
                    format!(
                        "divorce date {} precedes marriage date {}",
                        divorce.value, marriage.value
                    ),
                )
            })
        })
        .collect()
}

/// Neither spouse may die before the family's divorce. One finding per
/// spouse whose death date precedes the divorce date.
pub fn check_death_before_divorce(store: &GedcomStore, _context: &Context) -> Vec<Finding> {
    let mut findings = Vec::new();

    for family in store.families() {
        let Some(divorce) = &family.divorce else {
            continue;
        };
        for (reference, spouse) in spouses(store, family) {
            let Some(death) = &spouse.death else { continue };
            if death.value < divorce.value {
                findings.push(Finding::new(
                    "divorce-before-death",
                    &family.id,
                    vec![death.line, divorce.line],
                    format!(
                        "spouse {} died before the divorce date {}",
                        reference.value, divorce.value
                    ),
                ));
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Date;

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

    struct FamilyFixture {
        store: GedcomStore,
        family: Xref,
    }

    impl FamilyFixture {
        fn new() -> Self {
            let mut store = GedcomStore::new();
            let family = store.insert_family(xref("@F1@"), 1);
            Self { store, family }
        }

        fn spouse(&mut self, id: &str, role: &str, line: usize) -> &mut Self {
            let key = self.store.insert_individual(xref(id), 1);
            let family = self.store.family_mut(&self.family).expect("family");
            match role {
                "husband" => family.husband = Some(Sourced::new(key, line)),
                _ => family.wife = Some(Sourced::new(key, line)),
            }
            self
        }

        fn sex(&mut self, id: &str, sex: Sex) -> &mut Self {
            self.store
                .individual_mut(&xref(id))
                .expect("individual")
                .sex = Some(Sourced::new(sex, 2));
            self
        }

        fn birth(&mut self, id: &str, date_str: &str, line: usize) -> &mut Self {
            self.store
                .individual_mut(&xref(id))
                .expect("individual")
                .birth = Some(Sourced::new(date(date_str), line));
            self
        }

        fn death(&mut self, id: &str, date_str: &str, line: usize) -> &mut Self {
            self.store
                .individual_mut(&xref(id))
                .expect("individual")
                .death = Some(Sourced::new(date(date_str), line));
            self
        }

        fn marriage(&mut self, date_str: &str, line: usize) -> &mut Self {
            self.store
                .family_mut(&self.family)
                .expect("family")
                .marriage = Some(Sourced::new(date(date_str), line));
            self
        }

        fn divorce(&mut self, date_str: &str, line: usize) -> &mut Self {
            self.store.family_mut(&self.family).expect("family").divorce =
                Some(Sourced::new(date(date_str), line));
            self
        }
    }

    #[test]
    fn divorce_before_marriage_is_one_finding() {
        let mut fixture = FamilyFixture::new();
        fixture.marriage("16 MAR 1999", 2).divorce("12 MAR 1999", 3);

        let findings = check_divorce_before_marriage(&fixture.store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![2, 3]);
    }

    #[test]
    fn marriage_before_divorce_is_fine() {
        let mut fixture = FamilyFixture::new();
        fixture.marriage("10 MAR 1999", 2).divorce("12 MAR 1999", 3);

        assert!(check_divorce_before_marriage(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn divorce_without_marriage_is_inapplicable() {
        let mut fixture = FamilyFixture::new();
        fixture.divorce("16 MAR 1999", 2);

        assert!(check_divorce_before_marriage(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn marriage_without_divorce_is_inapplicable() {
        let mut fixture = FamilyFixture::new();
        fixture.marriage("10 MAR 1999", 2);

        assert!(check_divorce_before_marriage(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn one_death_before_divorce_is_one_finding() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .death("@I1@", "10 MAR 1999", 4)
            .divorce("12 MAR 1999", 5);

        let findings = check_death_before_divorce(&fixture.store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![4, 5]);
    }

    #[test]
    fn two_deaths_before_divorce_are_two_findings() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .death("@I1@", "10 MAR 1999", 4)
            .death("@I2@", "11 MAR 1999", 5)
            .divorce("12 MAR 1999", 6);

        assert_eq!(check_death_before_divorce(&fixture.store, &ctx()).len(), 2);
    }

    #[test]
    fn no_deaths_means_no_death_before_divorce_findings() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .divorce("12 MAR 1999", 4);

        assert!(check_death_before_divorce(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn no_divorce_means_no_death_before_divorce_findings() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .death("@I1@", "10 MAR 1999", 4)
            .death("@I2@", "11 MAR 1999", 5);

        assert!(check_death_before_divorce(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn deaths_after_divorce_are_fine() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .death("@I1@", "14 MAR 1999", 4)
            .death("@I2@", "15 MAR 1999", 5)
            .divorce("12 MAR 1999", 6);

        assert!(check_death_before_divorce(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn dangling_spouse_reference_is_silently_skipped() {
        let mut fixture = FamilyFixture::new();
        // Reference an individual that was never inserted.
        fixture
            .store
            .family_mut(&fixture.family)
            .expect("family")
            .husband = Some(Sourced::new(xref("@I9@"), 2));
        fixture.divorce("12 MAR 1999", 3).marriage("1 JAN 1999", 4);

        assert!(check_death_before_divorce(&fixture.store, &ctx()).is_empty());
        assert!(check_spouse_roles(&fixture.store, &ctx()).is_empty());
        assert!(check_marriage_age(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn wrong_spouse_sex_is_flagged_per_role() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .sex("@I1@", Sex::Female)
            .sex("@I2@", Sex::Male);

        let findings = check_spouse_roles(&fixture.store, &ctx());
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].lines, vec![2]);
        assert_eq!(findings[1].lines, vec![3]);
    }

    #[test]
    fn unknown_sex_counts_as_role_mismatch() {
        let mut fixture = FamilyFixture::new();
        fixture.spouse("@I1@", "husband", 2);

        assert_eq!(check_spouse_roles(&fixture.store, &ctx()).len(), 1);
    }

    #[test]
    fn correct_spouse_roles_produce_no_findings() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .sex("@I1@", Sex::Male)
            .sex("@I2@", Sex::Female);

        assert!(check_spouse_roles(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn marriage_at_thirteen_is_flagged_with_lines_ascending() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .birth("@I1@", "1 JAN 1990", 7)
            .marriage("1 JUN 2003", 4);

        let findings = check_marriage_age(&fixture.store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![4, 7]);
    }

    #[test]
    fn marriage_at_fourteen_is_fine() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .birth("@I1@", "1 JAN 1990", 3)
            .marriage("1 JAN 2004", 4);

        assert!(check_marriage_age(&fixture.store, &ctx()).is_empty());
    }

    #[test]
    fn marriage_after_spouse_death_is_flagged() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .death("@I1@", "1 JAN 1990", 3)
            .marriage("1 JAN 1991", 4);

        let findings = check_marriage_before_death(&fixture.store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![3, 4]);
    }

    #[test]
    fn spouse_born_after_marriage_is_flagged() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I2@", "wife", 2)
            .birth("@I2@", "1 JAN 2000", 3)
            .marriage("1 JAN 1995", 4);

        let findings = check_birth_before_marriage(&fixture.store, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].lines, vec![3, 4]);
    }

    #[test]
    fn well_ordered_marriage_produces_no_findings() {
        let mut fixture = FamilyFixture::new();
        fixture
            .spouse("@I1@", "husband", 2)
            .spouse("@I2@", "wife", 3)
            .sex("@I1@", Sex::Male)
            .sex("@I2@", Sex::Female)
            .birth("@I1@", "1 JAN 1960", 4)
            .birth("@I2@", "1 JAN 1962", 5)
            .marriage("1 JAN 1985", 6)
            .death("@I1@", "1 JAN 2020", 7);

        assert!(check_marriage_age(&fixture.store, &ctx()).is_empty());
        assert!(check_marriage_before_death(&fixture.store, &ctx()).is_empty());
        assert!(check_birth_before_marriage(&fixture.store, &ctx()).is_empty());
    }
}
