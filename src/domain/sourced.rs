/// A parsed value together with the 1-based input line it came from.
///
/// Every field on an entity carries its provenance so that validation
/// findings can cite the offending line(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sourced<T> {
    /// The parsed value.
    pub value: T,
    /// 1-based line number the value originated from.
    pub line: usize,
}

impl<T> Sourced<T> {
    /// Attaches a source line to a value.
    pub const fn new(value: T, line: usize) -> Self {
        Self { value, line }
    }
}
