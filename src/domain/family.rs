use super::{date::Date, sourced::Sourced, xref::Xref};

/// A family record, built from a contiguous run of lines starting at a
/// level-0 `FAM` line.
///
/// Spouse and child references are not guaranteed to resolve to entities in
/// the store; dangling references are a validation concern, never a lookup
/// failure. Immutable after the build pass except for the derived child
/// ordering and [`birth_clusters`](Self::birth_clusters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    /// Unique store key. Differs from [`raw_id`](Self::raw_id) only when the
    /// input reused an identifier and the store had to de-duplicate it.
    pub id: Xref,
    /// The identifier as written in the input.
    pub raw_id: Xref,
    /// 1-based line of the `FAM` record that created this family.
    pub id_line: usize,
    /// Husband reference, from a `HUSB` line.
    pub husband: Option<Sourced<Xref>>,
    /// Wife reference, from a `WIFE` line.
    pub wife: Option<Sourced<Xref>>,
    /// Child references, in input order until the analysis pass reorders
    /// them ascending by birth date (unknown birth dates last, stable).
    pub children: Vec<Sourced<Xref>>,
    /// Marriage date, from the `DATE` line following a `MARR` line.
    pub marriage: Option<Sourced<Date>>,
    /// Divorce date, from the `DATE` line following a `DIV` line.
    pub divorce: Option<Sourced<Date>>,
    /// Derived multiple-birth clusters: runs of birth-sorted children
    /// sharing an identical birth date. Each cluster has at least two
    /// members.
    pub birth_clusters: Vec<Vec<Xref>>,
}

impl Family {
    /// Creates an empty family keyed by `id`.
    #[must_use]
    pub fn new(id: Xref, raw_id: Xref, id_line: usize) -> Self {
        Self {
            id,
            raw_id,
            id_line,
            husband: None,
            wife: None,
            children: Vec::new(),
            marriage: None,
            divorce: None,
            birth_clusters: Vec::new(),
        }
    }

    /// The husband and wife references that are present, in that order.
    pub fn spouse_refs(&self) -> impl Iterator<Item = &Sourced<Xref>> {
        self.husband.iter().chain(self.wife.iter())
    }
}
