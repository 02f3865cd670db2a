//! The grouping-level catalog.
//!
//! Built once behind a `OnceLock` and memoized; definitions are immutable
//! data, so lookups are pure.

use super::{columns, Customizer, Domain, DomainExpr, GroupDefinition, GroupId, SortDirection};
use std::collections::BTreeMap;
use std::sync::OnceLock;

static CATALOG: OnceLock<BTreeMap<GroupId, GroupDefinition>> = OnceLock::new();

/// Definition for a group id. `None` only for the Book sentinel, which has
/// no definition of its own.
pub fn definition_for(id: GroupId) -> Option<&'static GroupDefinition> {
    catalog().get(&id)
}

/// All defined group ids in catalog order, excluding the Book sentinel.
pub fn all_ids() -> Vec<GroupId> {
    catalog().keys().copied().collect()
}

fn catalog() -> &'static BTreeMap<GroupId, GroupDefinition> {
    CATALOG.get_or_init(build_catalog)
}

fn column(name: &'static str, direction: SortDirection) -> Domain {
    Domain::new(name, DomainExpr::Column(name), direction)
}

fn surrogate_id(name: &'static str) -> Domain {
    // Numeric so id tiebreaks don't order "10" before "9".
    Domain::new(name, DomainExpr::NumericCast(name), SortDirection::Ascending)
}

fn year(name: &'static str, col: &'static str) -> Domain {
    Domain::new(name, DomainExpr::Year(col), SortDirection::Descending)
}

fn month(name: &'static str, col: &'static str) -> Domain {
    Domain::new(name, DomainExpr::Month(col), SortDirection::Descending)
}

fn day(name: &'static str, col: &'static str) -> Domain {
    Domain::new(name, DomainExpr::Day(col), SortDirection::Descending)
}

fn simple(
    id: GroupId,
    label: &'static str,
    key_prefix: &'static str,
    key_domain: Domain,
) -> GroupDefinition {
    GroupDefinition {
        id,
        label,
        key_prefix,
        key_domain,
        id_domain: None,
        group_domains: Vec::new(),
        base_domains: Vec::new(),
        customizer: None,
    }
}

fn build_catalog() -> BTreeMap<GroupId, GroupDefinition> {
    use GroupId::*;
    use SortDirection::{Ascending, Descending};

    let author_name = |given_first: bool| DomainExpr::PersonName {
        family: columns::AUTHOR_FAMILY,
        given: columns::AUTHOR_GIVEN,
        given_first,
    };

    let defs = vec![
        GroupDefinition {
            id: Author,
            label: "Author",
            key_prefix: "a",
            key_domain: Domain::new("author_sort", author_name(false), Ascending),
            id_domain: Some(surrogate_id(columns::AUTHOR_ID)),
            group_domains: vec![column(columns::AUTHOR_COMPLETE, Ascending)],
            base_domains: Vec::new(),
            customizer: Some(Customizer {
                given_first: Domain::new("author_sort", author_name(true), Ascending),
                family_first: Domain::new("author_sort", author_name(false), Ascending),
            }),
        },
        GroupDefinition {
            id: Series,
            label: "Series",
            key_prefix: "s",
            key_domain: column(columns::SERIES_TITLE, Ascending),
            id_domain: Some(surrogate_id(columns::SERIES_ID)),
            group_domains: vec![column(columns::SERIES_COMPLETE, Ascending)],
            // Position must order numerically ("1", "2", "10") while
            // displaying arbitrary text ("3.1", "Omnibus 3-10").
            base_domains: vec![
                Domain::new(
                    "series_position_sort",
                    DomainExpr::NumericCast(columns::SERIES_POSITION),
                    Ascending,
                ),
                column(columns::SERIES_POSITION, Ascending),
            ],
            customizer: None,
        },
        simple(Genre, "Genre", "g", column(columns::GENRE, Ascending)),
        GroupDefinition {
            id: Publisher,
            label: "Publisher",
            key_prefix: "p",
            key_domain: column(columns::PUBLISHER_NAME, Ascending),
            id_domain: Some(surrogate_id(columns::PUBLISHER_ID)),
            group_domains: Vec::new(),
            base_domains: Vec::new(),
            customizer: None,
        },
        simple(
            ReadStatus,
            "Read & Unread",
            "r",
            column(columns::READ_STATUS, Ascending),
        ),
        simple(Loan, "Loaned", "ln", column(columns::LOANEE, Ascending)),
        simple(
            PublicationYear,
            "Publication Year",
            "yrp",
            year("published_year", columns::DATE_PUBLISHED),
        ),
        simple(
            PublicationMonth,
            "Publication Month",
            "mnp",
            month("published_month", columns::DATE_PUBLISHED),
        ),
        simple(
            TitleLetter,
            "First Letter of Title",
            "t1",
            Domain::new(
                "title_letter",
                DomainExpr::FirstLetter(columns::TITLE),
                Ascending,
            ),
        ),
        simple(
            AddedYear,
            "Added Year",
            "yra",
            year("added_year", columns::DATE_ADDED),
        ),
        simple(
            AddedMonth,
            "Added Month",
            "mna",
            month("added_month", columns::DATE_ADDED),
        ),
        simple(
            AddedDay,
            "Added Day",
            "dya",
            day("added_day", columns::DATE_ADDED),
        ),
        simple(Format, "Format", "fmt", column(columns::FORMAT, Ascending)),
        simple(
            ReadYear,
            "Read Year",
            "yrr",
            year("read_year", columns::DATE_READ),
        ),
        simple(
            ReadMonth,
            "Read Month",
            "mnr",
            month("read_month", columns::DATE_READ),
        ),
        simple(
            ReadDay,
            "Read Day",
            "dyr",
            day("read_day", columns::DATE_READ),
        ),
        simple(
            Location,
            "Location",
            "loc",
            column(columns::LOCATION, Ascending),
        ),
        simple(
            Language,
            "Language",
            "lng",
            column(columns::LANGUAGE, Ascending),
        ),
        simple(
            UpdatedYear,
            "Updated Year",
            "yru",
            year("updated_year", columns::DATE_UPDATED),
        ),
        simple(
            UpdatedMonth,
            "Updated Month",
            "mnu",
            month("updated_month", columns::DATE_UPDATED),
        ),
        simple(
            UpdatedDay,
            "Updated Day",
            "dyu",
            day("updated_day", columns::DATE_UPDATED),
        ),
        simple(
            Rating,
            "Rating",
            "rt",
            Domain::new(
                columns::RATING,
                DomainExpr::NumericCast(columns::RATING),
                Descending,
            ),
        ),
        simple(
            Bookshelf,
            "Bookshelf",
            "shf",
            column(columns::BOOKSHELF_NAME, Ascending),
        ),
        simple(
            AcquiredYear,
            "Acquired Year",
            "yaq",
            year("acquired_year", columns::DATE_ACQUIRED),
        ),
        simple(
            AcquiredMonth,
            "Acquired Month",
            "maq",
            month("acquired_month", columns::DATE_ACQUIRED),
        ),
        simple(
            AcquiredDay,
            "Acquired Day",
            "daq",
            day("acquired_day", columns::DATE_ACQUIRED),
        ),
        simple(
            FirstPublicationYear,
            "First Publication Year",
            "yfp",
            year("first_published_year", columns::DATE_FIRST_PUBLISHED),
        ),
        simple(
            FirstPublicationMonth,
            "First Publication Month",
            "mfp",
            month("first_published_month", columns::DATE_FIRST_PUBLISHED),
        ),
        simple(Color, "Color", "col", column(columns::COLOR, Ascending)),
        simple(
            SeriesTitleLetter,
            "First Letter of Series",
            "s1",
            Domain::new(
                "series_letter",
                DomainExpr::FirstLetter(columns::SERIES_TITLE),
                Ascending,
            ),
        ),
        simple(
            Condition,
            "Condition",
            "cnd",
            column(columns::CONDITION, Ascending),
        ),
    ];

    defs.into_iter().map(|def| (def.id, def)).collect()
}
