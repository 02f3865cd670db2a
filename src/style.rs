//! Styles
//!
//! A style is a user-configured ordered list of grouping levels, outermost
//! first, plus per-entry options and per-style display preferences. Styles
//! are persisted as JSON with group ids in their stable numeric form;
//! definitions themselves stay immutable catalog data and are never embedded.

use crate::error::{ListError, Result};
use crate::schema::{self, columns, Domain, DomainExpr, GroupDefinition, GroupId, NameOrder, SortDirection};
use serde::{Deserialize, Serialize};

/// Per-entry user options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOptions {
    /// Materialize a book under every matching parent (e.g. under each of
    /// its authors), not just the primary one. Consumed by the join producer;
    /// carried here so one record describes the whole level.
    #[serde(default = "default_true")]
    pub show_under_each: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            show_under_each: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_expansion_depth() -> usize {
    // Fresh lists show the top level collapsed.
    0
}

/// One grouping level inside a style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleEntry {
    pub group: GroupId,
    #[serde(default)]
    pub options: GroupOptions,
}

/// A user-configured style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub id: String,
    pub name: String,
    pub entries: Vec<StyleEntry>,
    /// Rows at or above this depth start expanded when no stored state exists.
    #[serde(default = "default_expansion_depth")]
    pub default_expansion_depth: usize,
    #[serde(default)]
    pub name_order: NameOrder,
}

impl Style {
    pub fn new(id: impl Into<String>, name: impl Into<String>, groups: &[GroupId]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entries: groups
                .iter()
                .map(|&group| StyleEntry {
                    group,
                    options: GroupOptions::default(),
                })
                .collect(),
            default_expansion_depth: default_expansion_depth(),
            name_order: NameOrder::default(),
        }
    }

    /// Decode a persisted style. Unknown or sentinel group ids are fatal for
    /// the style ([`ListError::InvalidGroupId`]); callers substitute a
    /// default style.
    pub fn from_json(raw: &str) -> Result<Style> {
        let raw: RawStyle =
            serde_json::from_str(raw).map_err(|e| ListError::InvalidStyle(e.to_string()))?;
        let mut entries = Vec::with_capacity(raw.entries.len());
        for entry in raw.entries {
            let group = GroupId::from_id(entry.group)
                .filter(|id| schema::definition_for(*id).is_some())
                .ok_or(ListError::InvalidGroupId(entry.group))?;
            entries.push(StyleEntry {
                group,
                options: entry.options,
            });
        }
        Ok(Style {
            id: raw.id,
            name: raw.name,
            entries,
            default_expansion_depth: raw.default_expansion_depth,
            name_order: raw.name_order,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ListError::InvalidStyle(e.to_string()))
    }

    /// Resolve every entry against the catalog.
    pub fn resolve(&self) -> Result<ResolvedStyle> {
        let mut levels = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let def = schema::definition_for(entry.group)
                .ok_or(ListError::InvalidGroupId(entry.group.id()))?;
            levels.push(ResolvedLevel {
                def,
                options: entry.options.clone(),
            });
        }
        Ok(ResolvedStyle {
            levels,
            default_expansion_depth: self.default_expansion_depth,
            name_order: self.name_order,
        })
    }
}

/// Raw persisted form, decoded before group-id validation.
#[derive(Deserialize)]
struct RawStyle {
    id: String,
    name: String,
    #[serde(default)]
    entries: Vec<RawEntry>,
    #[serde(default = "default_expansion_depth")]
    default_expansion_depth: usize,
    #[serde(default)]
    name_order: NameOrder,
}

#[derive(Deserialize)]
struct RawEntry {
    group: u16,
    #[serde(default)]
    options: GroupOptions,
}

/// One style level with its catalog definition attached.
#[derive(Debug, Clone)]
pub struct ResolvedLevel {
    pub def: &'static GroupDefinition,
    pub options: GroupOptions,
}

/// A style with every group id resolved against the catalog.
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    levels: Vec<ResolvedLevel>,
    pub default_expansion_depth: usize,
    pub name_order: NameOrder,
}

impl ResolvedStyle {
    /// Number of group levels, excluding the implicit trailing book level.
    pub fn group_level_count(&self) -> usize {
        self.levels.len()
    }

    /// 1-based depth of the implicit book level.
    pub fn book_level(&self) -> usize {
        self.levels.len() + 1
    }

    pub fn levels(&self) -> &[ResolvedLevel] {
        &self.levels
    }

    /// Definition of a 1-based group level.
    pub fn definition(&self, level: usize) -> Option<&'static GroupDefinition> {
        self.levels.get(level.checked_sub(1)?).map(|l| l.def)
    }

    /// Accumulated domain set for levels 1..=`level`: each level's key domain
    /// (name-order resolved), surrogate id, and group domains, outer columns
    /// strictly before inner ones. A column reached through two levels keeps
    /// its outermost position.
    pub fn accumulated_domains(&self, level: usize) -> Vec<Domain> {
        let mut out: Vec<Domain> = Vec::new();
        for resolved in self.levels.iter().take(level) {
            let def = resolved.def;
            push_unique(&mut out, def.resolved_key_domain(self.name_order).clone());
            if let Some(id) = &def.id_domain {
                push_unique(&mut out, id.clone());
            }
            for domain in &def.group_domains {
                push_unique(&mut out, domain.clone());
            }
        }
        out
    }

    /// Base domains pushed down to book rows by every level, outer to inner.
    pub fn accumulated_base_domains(&self) -> Vec<Domain> {
        let mut out: Vec<Domain> = Vec::new();
        for resolved in &self.levels {
            for domain in &resolved.def.base_domains {
                push_unique(&mut out, domain.clone());
            }
        }
        out
    }

    /// The full ordering for a build: every level's grouping domains outer to
    /// inner, then the accumulated base domains, then title as final tiebreak.
    pub fn sort_domains(&self) -> Vec<Domain> {
        let mut out = self.accumulated_domains(self.levels.len());
        for domain in self.accumulated_base_domains() {
            push_unique(&mut out, domain);
        }
        push_unique(
            &mut out,
            Domain::new(
                columns::TITLE,
                DomainExpr::Column(columns::TITLE),
                SortDirection::Ascending,
            ),
        );
        out
    }
}

fn push_unique(domains: &mut Vec<Domain>, domain: Domain) {
    if !domains.iter().any(|d| d.name == domain.name) {
        domains.push(domain);
    }
}
