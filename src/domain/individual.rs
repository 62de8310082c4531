use super::{date::Date, sourced::Sourced, xref::Xref};

/// Sex of an individual, as recorded by a `SEX` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    /// Recorded as `M`.
    Male,
    /// Recorded as `F`.
    Female,
    /// Not recorded, or recorded with an unrecognized value.
    #[default]
    Unknown,
}

impl Sex {
    /// Parses a sex field, case-insensitively. Anything other than `M` or
    /// `F` is [`Sex::Unknown`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            s if s.eq_ignore_ascii_case("M") => Self::Male,
            s if s.eq_ignore_ascii_case("F") => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// An individual record, built from a contiguous run of lines starting at a
/// level-0 `INDI` line.
///
/// Fields are explicit `Option`s: absent means the input never set them.
/// The record is immutable after the build pass, except for the derived
/// [`age`](Self::age) field populated by the analysis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    /// Unique store key. Differs from [`raw_id`](Self::raw_id) only when the
    /// input reused an identifier and the store had to de-duplicate it.
    pub id: Xref,
    /// The identifier as written in the input.
    pub raw_id: Xref,
    /// 1-based line of the `INDI` record that created this individual.
    pub id_line: usize,
    /// Full name, from a `NAME` line.
    pub name: Option<Sourced<String>>,
    /// Sex, from a `SEX` line.
    pub sex: Option<Sourced<Sex>>,
    /// Birth date, from the `DATE` line following a `BIRT` line.
    pub birth: Option<Sourced<Date>>,
    /// Death date, from the `DATE` line following a `DEAT` line.
    pub death: Option<Sourced<Date>>,
    /// Families this individual belongs to as a child (`FAMC`).
    pub child_of: Vec<Sourced<Xref>>,
    /// Families this individual belongs to as a spouse (`FAMS`).
    pub spouse_in: Vec<Sourced<Xref>>,
    /// Derived age in whole years, relative to the death date or the
    /// reference date. `None` when the birth date is unknown.
    pub age: Option<i32>,
}

impl Individual {
    /// Creates an empty individual keyed by `id`.
    #[must_use]
    pub fn new(id: Xref, raw_id: Xref, id_line: usize) -> Self {
        Self {
            id,
            raw_id,
            id_line,
            name: None,
            sex: None,
            birth: None,
            death: None,
            child_of: Vec::new(),
            spouse_in: Vec::new(),
            age: None,
        }
    }

    /// The recorded sex, defaulting to [`Sex::Unknown`] when absent.
    #[must_use]
    pub fn sex(&self) -> Sex {
        self.sex.as_ref().map_or(Sex::Unknown, |s| s.value)
    }

    /// Whether the individual has no recorded death date.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.death.is_none()
    }
}
