//! Group schema
//!
//! Static catalog of grouping-level definitions. Each definition names the
//! domain that keys the level (with its value expression and sort direction),
//! any extra domains grouped/sorted at that level, and the domains pushed
//! down to every book row underneath it. Definitions are immutable data; the
//! catalog is built once and memoized (see [`catalog`]).

pub mod catalog;

use crate::error::ListError;
use crate::row::SourceRow;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use catalog::{all_ids, definition_for};

/// Domain column names supplied by the entity store's flattened join.
pub mod columns {
    pub const TITLE: &str = "title";
    pub const AUTHOR_FAMILY: &str = "author_family";
    pub const AUTHOR_GIVEN: &str = "author_given";
    pub const AUTHOR_ID: &str = "author_id";
    pub const AUTHOR_COMPLETE: &str = "author_complete";
    pub const SERIES_TITLE: &str = "series_title";
    pub const SERIES_ID: &str = "series_id";
    pub const SERIES_COMPLETE: &str = "series_complete";
    pub const SERIES_POSITION: &str = "series_position";
    pub const GENRE: &str = "genre";
    pub const PUBLISHER_NAME: &str = "publisher_name";
    pub const PUBLISHER_ID: &str = "publisher_id";
    pub const READ_STATUS: &str = "read_status";
    pub const LOANEE: &str = "loanee";
    pub const DATE_PUBLISHED: &str = "date_published";
    pub const DATE_FIRST_PUBLISHED: &str = "date_first_published";
    pub const DATE_ADDED: &str = "date_added";
    pub const DATE_READ: &str = "date_read";
    pub const DATE_UPDATED: &str = "date_updated";
    pub const DATE_ACQUIRED: &str = "date_acquired";
    pub const FORMAT: &str = "format";
    pub const LOCATION: &str = "location";
    pub const LANGUAGE: &str = "language";
    pub const RATING: &str = "rating";
    pub const BOOKSHELF_NAME: &str = "bookshelf_name";
    pub const COLOR: &str = "color";
    pub const CONDITION: &str = "condition";
}

/// Stable identifier of a grouping kind.
///
/// Discriminants are persisted inside styles and must never be renumbered.
/// New kinds append new numbers; removed kinds leave gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum GroupId {
    Author = 0,
    Series = 1,
    Genre = 2,
    Publisher = 3,
    ReadStatus = 4,
    Loan = 5,
    PublicationYear = 6,
    PublicationMonth = 7,
    TitleLetter = 8,
    AddedYear = 9,
    AddedMonth = 10,
    AddedDay = 11,
    Format = 12,
    ReadYear = 13,
    ReadMonth = 14,
    ReadDay = 15,
    Location = 16,
    Language = 17,
    UpdatedYear = 18,
    UpdatedMonth = 19,
    UpdatedDay = 20,
    Rating = 21,
    Bookshelf = 22,
    AcquiredYear = 23,
    AcquiredMonth = 24,
    AcquiredDay = 25,
    FirstPublicationYear = 26,
    FirstPublicationMonth = 27,
    Color = 28,
    SeriesTitleLetter = 29,
    Condition = 30,

    /// Sentinel for leaf (book) rows. Never part of a style and has no
    /// catalog definition.
    Book = 100,
}

impl GroupId {
    /// The persisted numeric id.
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Resolve a persisted numeric id. `None` for unknown ids.
    pub fn from_id(raw: u16) -> Option<GroupId> {
        use GroupId::*;
        Some(match raw {
            0 => Author,
            1 => Series,
            2 => Genre,
            3 => Publisher,
            4 => ReadStatus,
            5 => Loan,
            6 => PublicationYear,
            7 => PublicationMonth,
            8 => TitleLetter,
            9 => AddedYear,
            10 => AddedMonth,
            11 => AddedDay,
            12 => Format,
            13 => ReadYear,
            14 => ReadMonth,
            15 => ReadDay,
            16 => Location,
            17 => Language,
            18 => UpdatedYear,
            19 => UpdatedMonth,
            20 => UpdatedDay,
            21 => Rating,
            22 => Bookshelf,
            23 => AcquiredYear,
            24 => AcquiredMonth,
            25 => AcquiredDay,
            26 => FirstPublicationYear,
            27 => FirstPublicationMonth,
            28 => Color,
            29 => SeriesTitleLetter,
            30 => Condition,
            100 => Book,
            _ => return None,
        })
    }
}

impl From<GroupId> for u16 {
    fn from(id: GroupId) -> u16 {
        id.id()
    }
}

impl TryFrom<u16> for GroupId {
    type Error = ListError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        GroupId::from_id(raw).ok_or(ListError::InvalidGroupId(raw))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Direction a domain sorts in. Names ascend; dates and ratings descend so
/// the most recent or highest group lists first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Per-style preference for rendering person names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrder {
    /// "Family, Given" — the catalog default.
    #[default]
    FamilyFirst,
    /// "Given Family".
    GivenFirst,
}

/// How a domain's value is computed from a source row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainExpr {
    /// Raw column value.
    Column(&'static str),
    /// Uppercased first letter of a column value.
    FirstLetter(&'static str),
    /// Year component of an ISO date column.
    Year(&'static str),
    /// Month component of an ISO date column.
    Month(&'static str),
    /// Day component of an ISO date column.
    Day(&'static str),
    /// Column displayed verbatim but ordered as a number, for values like
    /// "3.1" or "10" that must not sort lexicographically.
    NumericCast(&'static str),
    /// Person name assembled from family/given columns.
    PersonName {
        family: &'static str,
        given: &'static str,
        given_first: bool,
    },
}

impl DomainExpr {
    /// Evaluate against a source row. Missing columns evaluate to the empty
    /// string, which is a legal (and grouping-relevant) value.
    pub fn eval(&self, row: &SourceRow) -> String {
        match self {
            DomainExpr::Column(col) | DomainExpr::NumericCast(col) => {
                row.column(col).unwrap_or_default().to_string()
            }
            DomainExpr::FirstLetter(col) => row
                .column(col)
                .and_then(|v| v.chars().next())
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default(),
            DomainExpr::Year(col) => date_component(row.column(col), 0),
            DomainExpr::Month(col) => date_component(row.column(col), 1),
            DomainExpr::Day(col) => date_component(row.column(col), 2),
            DomainExpr::PersonName {
                family,
                given,
                given_first,
            } => {
                let family = row.column(family).unwrap_or_default().trim();
                let given = row.column(given).unwrap_or_default().trim();
                match (family.is_empty(), given.is_empty()) {
                    (true, true) => String::new(),
                    (false, true) => family.to_string(),
                    (true, false) => given.to_string(),
                    (false, false) => {
                        if *given_first {
                            format!("{} {}", given, family)
                        } else {
                            format!("{}, {}", family, given)
                        }
                    }
                }
            }
        }
    }

    /// Whether ordering must compare evaluated values as numbers.
    pub fn orders_numerically(&self) -> bool {
        matches!(
            self,
            DomainExpr::NumericCast(_)
                | DomainExpr::Year(_)
                | DomainExpr::Month(_)
                | DomainExpr::Day(_)
        )
    }
}

/// Extract a date component as an unpadded number string.
///
/// Full ISO dates go through chrono; partial dates ("2023", "2023-04") fall
/// back to positional splitting. Unparseable input yields the empty string.
fn date_component(value: Option<&str>, index: usize) -> String {
    use chrono::Datelike;

    let Some(value) = value else {
        return String::new();
    };
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let n = match index {
            0 => date.year() as u32,
            1 => date.month(),
            _ => date.day(),
        };
        return n.to_string();
    }
    value
        .split('-')
        .nth(index)
        .and_then(|part| part.parse::<u32>().ok())
        .map(|n| n.to_string())
        .unwrap_or_default()
}

/// A named, computed, directed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Name the domain is addressed by in accumulated sets and row details.
    pub name: &'static str,
    pub expr: DomainExpr,
    pub direction: SortDirection,
}

impl Domain {
    pub fn new(name: &'static str, expr: DomainExpr, direction: SortDirection) -> Self {
        Self {
            name,
            expr,
            direction,
        }
    }
}

/// Per-style display/sort overrides for composite groups, dispatched by group
/// id rather than by subtype.
#[derive(Debug, Clone)]
pub struct Customizer {
    /// Key domain when the owning style orders names given-first.
    pub given_first: Domain,
    /// Key domain when the owning style orders names family-first.
    pub family_first: Domain,
}

/// One grouping-level definition.
#[derive(Debug, Clone)]
pub struct GroupDefinition {
    pub id: GroupId,
    pub label: &'static str,
    /// Short unique tag used in node keys. Unique across the whole catalog.
    pub key_prefix: &'static str,
    /// Display/sort domain keying this level.
    pub key_domain: Domain,
    /// Surrogate id domain for many-to-many relations; part of the grouping
    /// identity so two same-named entities never merge.
    pub id_domain: Option<Domain>,
    /// Extra domains grouped/sorted at this level.
    pub group_domains: Vec<Domain>,
    /// Domains pushed down to every book row under this level.
    pub base_domains: Vec<Domain>,
    /// Display/sort overrides resolved per style, if this group has any.
    pub customizer: Option<Customizer>,
}

impl GroupDefinition {
    /// The key domain after applying the style's name-order preference.
    pub fn resolved_key_domain(&self, name_order: NameOrder) -> &Domain {
        match (&self.customizer, name_order) {
            (Some(c), NameOrder::GivenFirst) => &c.given_first,
            (Some(c), NameOrder::FamilyFirst) => &c.family_first,
            (None, _) => &self.key_domain,
        }
    }

    /// Domain whose value lands in this level's path segment: the surrogate
    /// id when there is one (stable across renames), else the key domain.
    pub fn key_value_domain(&self, name_order: NameOrder) -> &Domain {
        match &self.id_domain {
            Some(id) => id,
            None => self.resolved_key_domain(name_order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_ids_round_trip_through_raw_values() {
        for id in all_ids() {
            assert_eq!(GroupId::from_id(id.id()), Some(id));
        }
        assert_eq!(GroupId::from_id(GroupId::Book.id()), Some(GroupId::Book));
        assert_eq!(GroupId::from_id(999), None);
    }

    #[test]
    fn person_name_orders() {
        let row = SourceRow::new(1, "T")
            .with(columns::AUTHOR_FAMILY, "Asimov")
            .with(columns::AUTHOR_GIVEN, "Isaac");
        let family_first = DomainExpr::PersonName {
            family: columns::AUTHOR_FAMILY,
            given: columns::AUTHOR_GIVEN,
            given_first: false,
        };
        let given_first = DomainExpr::PersonName {
            family: columns::AUTHOR_FAMILY,
            given: columns::AUTHOR_GIVEN,
            given_first: true,
        };
        assert_eq!(family_first.eval(&row), "Asimov, Isaac");
        assert_eq!(given_first.eval(&row), "Isaac Asimov");
    }

    #[test]
    fn date_components_handle_full_and_partial_dates() {
        let row = SourceRow::new(1, "T")
            .with(columns::DATE_READ, "2023-04-09")
            .with(columns::DATE_ADDED, "2021-11")
            .with(columns::DATE_PUBLISHED, "1975");
        assert_eq!(DomainExpr::Year(columns::DATE_READ).eval(&row), "2023");
        assert_eq!(DomainExpr::Month(columns::DATE_READ).eval(&row), "4");
        assert_eq!(DomainExpr::Day(columns::DATE_READ).eval(&row), "9");
        assert_eq!(DomainExpr::Month(columns::DATE_ADDED).eval(&row), "11");
        assert_eq!(DomainExpr::Year(columns::DATE_PUBLISHED).eval(&row), "1975");
        assert_eq!(DomainExpr::Day(columns::DATE_PUBLISHED).eval(&row), "");
    }

    #[test]
    fn first_letter_uppercases() {
        let row = SourceRow::new(1, "dune");
        assert_eq!(DomainExpr::FirstLetter(columns::TITLE).eval(&row), "D");
    }
}
