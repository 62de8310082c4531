//! The entity builder: a state machine over the token stream.
//!
//! The builder keeps a "current entity" cursor. Level-0 `INDI`/`FAM`
//! records open a new entity keyed by the record's data; other level-0
//! records clear the cursor. Attribute lines apply to the current entity.
//! When a date-bearing tag (`BIRT`, `DEAT`, `MARR`, `DIV`) is matched the
//! cursor advances by **two** records: the following line is consumed as the
//! event's `DATE` line whether or not it tokenizes and parses, and on
//! failure the event's date simply stays unset.

use tracing::{debug, instrument};

use super::tokenizer::{Record, Tag, tokenize};
use crate::domain::{Date, GedcomStore, Sex, Sourced, Xref};

/// The builder's cursor state.
enum Current {
    /// No entity is open; attribute lines are ignored.
    None,
    /// An individual is open under the given store key.
    Individual(Xref),
    /// A family is open under the given store key.
    Family(Xref),
}

/// Builds the entity store from raw input lines.
///
/// Structural errors (unparseable lines, unknown tags) are recovered
/// locally by skipping the line; this function never fails.
#[instrument(skip(lines))]
pub fn build<'a, I>(lines: I) -> GedcomStore
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: Vec<&str> = lines.into_iter().collect();
    let mut store = GedcomStore::new();
    let mut current = Current::None;

    let mut index = 0;
    while index < lines.len() {
        let line_no = index + 1;
        let Some(record) = tokenize(lines[index]) else {
            debug!(line = line_no, "skipping unrecognized line");
            index += 1;
            continue;
        };

        if record.level == 0 {
            current = open_record(&mut store, &record, line_no);
            index += 1;
        } else {
            index += apply_attribute(&mut store, &current, &record, &lines, index);
        }
    }

    store
}

/// Handles a level-0 record, returning the new cursor state.
fn open_record(store: &mut GedcomStore, record: &Record, line_no: usize) -> Current {
    match record.tag {
        Tag::Indi => match Xref::new(&record.data) {
            Ok(raw) => Current::Individual(store.insert_individual(raw, line_no)),
            Err(_) => {
                debug!(line = line_no, "individual record without identifier");
                Current::None
            }
        },
        Tag::Fam => match Xref::new(&record.data) {
            Ok(raw) => Current::Family(store.insert_family(raw, line_no)),
            Err(_) => {
                debug!(line = line_no, "family record without identifier");
                Current::None
            }
        },
        // Header, trailer and note records carry no attached fields.
        _ => Current::None,
    }
}

/// Applies a non-zero-level record to the current entity.
///
/// Returns the number of input lines consumed: 2 when a date-bearing tag
/// had a following line to look at, 1 otherwise.
fn apply_attribute(
    store: &mut GedcomStore,
    current: &Current,
    record: &Record,
    lines: &[&str],
    index: usize,
) -> usize {
    let line_no = index + 1;
    let date = if record.tag.is_event() {
        lookahead_date(lines, index, record.level)
    } else {
        None
    };
    // The lookahead line is consumed even when it is not a valid DATE
    // record, unless the event tag was the final line of input.
    let consumed = if record.tag.is_event() && index + 1 < lines.len() {
        2
    } else {
        1
    };

    match current {
        Current::None => {
            debug!(line = line_no, "attribute line outside any record");
        }
        Current::Individual(id) => {
            if let Some(individual) = store.individual_mut(id) {
                match record.tag {
                    Tag::Name => individual.name = Some(Sourced::new(record.data.clone(), line_no)),
                    Tag::Sex => {
                        individual.sex = Some(Sourced::new(Sex::parse(&record.data), line_no));
                    }
                    Tag::Birt => {
                        if date.is_some() {
                            individual.birth = date;
                        }
                    }
                    Tag::Deat => {
                        if date.is_some() {
                            individual.death = date;
                        }
                    }
                    Tag::Famc => push_link(&mut individual.child_of, &record.data, line_no),
                    Tag::Fams => push_link(&mut individual.spouse_in, &record.data, line_no),
                    _ => debug!(line = line_no, "tag not applicable to an individual"),
                }
            }
        }
        Current::Family(id) => {
            if let Some(family) = store.family_mut(id) {
                match record.tag {
                    Tag::Husb => family.husband = sourced_xref(&record.data, line_no),
                    Tag::Wife => family.wife = sourced_xref(&record.data, line_no),
                    Tag::Chil => {
                        // Child links support repetition.
                        if let Some(child) = sourced_xref(&record.data, line_no) {
                            family.children.push(child);
                        }
                    }
                    Tag::Marr => {
                        if date.is_some() {
                            family.marriage = date;
                        }
                    }
                    Tag::Div => {
                        if date.is_some() {
                            family.divorce = date;
                        }
                    }
                    _ => debug!(line = line_no, "tag not applicable to a family"),
                }
            }
        }
    }

    consumed
}

/// Tokenizes the line after `index` and parses it as the `DATE` record of
/// an event at `level`. The returned provenance points at the `DATE` line.
fn lookahead_date(lines: &[&str], index: usize, level: u32) -> Option<Sourced<Date>> {
    let next = lines.get(index + 1)?;
    let record = tokenize(next)?;
    if record.level != level + 1 || record.tag != Tag::Date {
        return None;
    }
    let date: Date = record.data.parse().ok()?;
    Some(Sourced::new(date, index + 2))
}

/// Parses `data` as an identifier with provenance, or `None` when empty.
fn sourced_xref(data: &str, line_no: usize) -> Option<Sourced<Xref>> {
    Xref::new(data).ok().map(|xref| Sourced::new(xref, line_no))
}

/// Appends an identifier to a link set, ignoring duplicates.
fn push_link(links: &mut Vec<Sourced<Xref>>, data: &str, line_no: usize) {
    let Ok(xref) = Xref::new(data) else {
        return;
    };
    if !links.iter().any(|existing| existing.value == xref) {
        links.push(Sourced::new(xref, line_no));
    }
}
