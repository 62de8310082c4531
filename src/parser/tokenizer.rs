//! Tokenizing raw input lines into records.
//!
//! A record line is `<level> <TAG> [<data>]`, except at level 0 where
//! record-kind lines place the identifier before the tag (`0 @I1@ INDI`)
//! and only the bare tags `HEAD`, `TRLR` and `NOTE` sit directly after the
//! level. Tags are valid only within their declared level's vocabulary;
//! anything else makes the whole line unrecognized.

/// The fixed tag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Level 0: individual record.
    Indi,
    /// Level 0: family record.
    Fam,
    /// Level 0: file header.
    Head,
    /// Level 0: file trailer.
    Trlr,
    /// Level 0: free-form note.
    Note,
    /// Level 1: name of an individual.
    Name,
    /// Level 1: sex of an individual.
    Sex,
    /// Level 1: birth event; the date follows on the next line.
    Birt,
    /// Level 1: death event; the date follows on the next line.
    Deat,
    /// Level 1: family where the individual is a child.
    Famc,
    /// Level 1: family where the individual is a spouse.
    Fams,
    /// Level 1: marriage event; the date follows on the next line.
    Marr,
    /// Level 1: husband in a family.
    Husb,
    /// Level 1: wife in a family.
    Wife,
    /// Level 1: child in a family.
    Chil,
    /// Level 1: divorce event; the date follows on the next line.
    Div,
    /// Level 2: the date of the preceding event.
    Date,
}

impl Tag {
    /// Parses a tag name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let tag = match s.to_ascii_uppercase().as_str() {
            "INDI" => Self::Indi,
            "FAM" => Self::Fam,
            "HEAD" => Self::Head,
            "TRLR" => Self::Trlr,
            "NOTE" => Self::Note,
            "NAME" => Self::Name,
            "SEX" => Self::Sex,
            "BIRT" => Self::Birt,
            "DEAT" => Self::Deat,
            "FAMC" => Self::Famc,
            "FAMS" => Self::Fams,
            "MARR" => Self::Marr,
            "HUSB" => Self::Husb,
            "WIFE" => Self::Wife,
            "CHIL" => Self::Chil,
            "DIV" => Self::Div,
            "DATE" => Self::Date,
            _ => return None,
        };
        Some(tag)
    }

    /// Whether the tag belongs to the vocabulary of the given level.
    #[must_use]
    pub const fn is_valid_at(self, level: u32) -> bool {
        match level {
            0 => matches!(
                self,
                Self::Indi | Self::Fam | Self::Head | Self::Trlr | Self::Note
            ),
            1 => matches!(
                self,
                Self::Name
                    | Self::Sex
                    | Self::Birt
                    | Self::Deat
                    | Self::Famc
                    | Self::Fams
                    | Self::Marr
                    | Self::Husb
                    | Self::Wife
                    | Self::Chil
                    | Self::Div
            ),
            2 => matches!(self, Self::Date),
            _ => false,
        }
    }

    /// Whether this is a level-0 tag that sits directly after the level,
    /// with no identifier slot (`0 HEAD`, `0 TRLR`, `0 NOTE ...`).
    #[must_use]
    pub const fn is_bare_record(self) -> bool {
        matches!(self, Self::Head | Self::Trlr | Self::Note)
    }

    /// Whether the tag announces an event whose date is carried by the
    /// following `DATE` line.
    #[must_use]
    pub const fn is_event(self) -> bool {
        matches!(self, Self::Birt | Self::Deat | Self::Marr | Self::Div)
    }
}

/// One tokenized line: level, tag, and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Nesting level, the leading integer on the line.
    pub level: u32,
    /// The recognized tag.
    pub tag: Tag,
    /// Remaining tokens, re-joined with single spaces. For level-0
    /// record-kind lines this is the identifier slot.
    pub data: String,
}

/// Tokenizes one raw line.
///
/// Returns `None` for blank lines, lines without a leading integer level,
/// and lines whose tag is unknown at their level. Pure and total: never
/// panics, never produces a partial record.
#[must_use]
pub fn tokenize(raw: &str) -> Option<Record> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let level: u32 = tokens.first()?.parse().ok()?;
    let rest = &tokens[1..];

    let (tag, data) = if level == 0 {
        let first = *rest.first()?;
        match Tag::parse(first) {
            Some(tag) if tag.is_bare_record() => (tag, rest[1..].join(" ")),
            _ => {
                // Record-kind lines carry the identifier before the tag:
                // `0 @I1@ INDI`. The data is everything except the tag.
                let tag = Tag::parse(rest.get(1)?)?;
                let mut data_tokens = vec![first];
                data_tokens.extend_from_slice(&rest[2..]);
                (tag, data_tokens.join(" "))
            }
        }
    } else {
        let tag = Tag::parse(rest.first()?)?;
        (tag, rest[1..].join(" "))
    };

    if !tag.is_valid_at(level) {
        return None;
    }

    Some(Record { level, tag, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(tokenize(""), None);
        assert_eq!(tokenize("   \t  "), None);
    }

    #[test]
    fn missing_level_is_empty() {
        assert_eq!(tokenize("INDI @I1@"), None);
        assert_eq!(tokenize("x 1 NAME"), None);
    }

    #[test]
    fn level_zero_record_kind_keeps_identifier_as_data() {
        let record = tokenize("0 @I1@ INDI").expect("recognized line");
        assert_eq!(record.level, 0);
        assert_eq!(record.tag, Tag::Indi);
        assert_eq!(record.data, "@I1@");
    }

    #[test]
    fn level_zero_bare_tags_sit_after_the_level() {
        let head = tokenize("0 HEAD").expect("recognized line");
        assert_eq!(head.tag, Tag::Head);
        assert_eq!(head.data, "");

        let note = tokenize("0 NOTE my test file").expect("recognized line");
        assert_eq!(note.tag, Tag::Note);
        assert_eq!(note.data, "my test file");
    }

    #[test]
    fn attribute_line_data_is_rejoined_with_single_spaces() {
        let record = tokenize("1  NAME   John /Smith/ ").expect("recognized line");
        assert_eq!(record.level, 1);
        assert_eq!(record.tag, Tag::Name);
        assert_eq!(record.data, "John /Smith/");
    }

    #[test]
    fn tags_are_case_insensitive() {
        let record = tokenize("2 date 4 JUL 1776").expect("recognized line");
        assert_eq!(record.tag, Tag::Date);
        assert_eq!(record.data, "4 JUL 1776");
    }

    #[test]
    fn unknown_tag_is_empty() {
        assert_eq!(tokenize("1 BAPM 4 JUL 1776"), None);
        assert_eq!(tokenize("0 @I1@ PERSON"), None);
    }

    #[test]
    fn tag_outside_its_level_is_empty() {
        // DATE is only valid at level 2.
        assert_eq!(tokenize("1 DATE 4 JUL 1776"), None);
        // INDI is only valid at level 0.
        assert_eq!(tokenize("1 INDI @I1@"), None);
        assert_eq!(tokenize("3 DATE 4 JUL 1776"), None);
    }

    #[test]
    fn record_kind_without_tag_slot_is_empty() {
        // Only an identifier after the level, no tag.
        assert_eq!(tokenize("0 @I1@"), None);
    }
}
