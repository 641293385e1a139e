use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::Id;
use super::person::{Gender, Person};

/// Kind of a recorded relationship edge. For Mother/Father/Child the
/// `from` side is the parent and the `to` side is the child; CHILD uses
/// the same parent-to-child direction as the other two. Spouse links are
/// recorded as two mirrored edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    Mother,
    Father,
    Child,
    Spouse,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Mother => "MOTHER",
            EdgeKind::Father => "FATHER",
            EdgeKind::Child => "CHILD",
            EdgeKind::Spouse => "SPOUSE",
        }
    }

    pub fn parse(s: &str) -> Option<EdgeKind> {
        match s {
            "MOTHER" => Some(EdgeKind::Mother),
            "FATHER" => Some(EdgeKind::Father),
            "CHILD" => Some(EdgeKind::Child),
            "SPOUSE" => Some(EdgeKind::Spouse),
            _ => None,
        }
    }
}

/// A directed, typed record connecting two member ids in the family's
/// relationship log. Immutable once written, except for bulk removal when
/// a referenced member is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: Id<Edge>,
    pub from_id: Id<Person>,
    pub to_id: Id<Person>,
    pub kind: EdgeKind,
    pub created_at: NaiveDateTime,
}

impl Edge {
    pub fn create(from_id: Id<Person>, to_id: Id<Person>, kind: EdgeKind) -> Self {
        Self {
            id: Id::generate(),
            from_id,
            to_id,
            kind,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn touches(&self, id: Id<Person>) -> bool {
        self.from_id == id || self.to_id == id
    }
}

/// The relationship requested when attaching a new member to an anchor.
/// Parsed case-insensitively from the caller-supplied string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachKind {
    Child,
    Mother,
    Father,
    Parent,
    Spouse,
}

impl AttachKind {
    pub fn parse(s: &str) -> Option<AttachKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "child" => Some(AttachKind::Child),
            "mother" => Some(AttachKind::Mother),
            "father" => Some(AttachKind::Father),
            "parent" => Some(AttachKind::Parent),
            "spouse" => Some(AttachKind::Spouse),
            _ => None,
        }
    }
}

/// Tree-shaped display cursor stored on the family. Maintained but not
/// required for graph correctness; only the root member id is ever set by
/// the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyNode {
    pub person_id: Option<Id<Person>>,
    pub location: i32,
    pub children: Vec<FamilyNode>,
    pub parents: Vec<FamilyNode>,
    pub spouse: Vec<FamilyNode>,
}

/// A named collection of members plus their relationship edges, owned by
/// exactly one account. `family_key` equals the owning account's username
/// and is unique across families.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: Id<Family>,
    pub name: String,
    pub family_key: String,
    pub root: FamilyNode,
    /// Active member ids, hydrated on load from the person store.
    #[serde(default)]
    pub member_ids: Vec<Id<Person>>,
}

impl Family {
    pub fn create(name: String, family_key: String) -> Self {
        Self {
            id: Id::generate(),
            name,
            family_key,
            root: FamilyNode::default(),
            member_ids: Vec::new(),
        }
    }
}

/// Maps a parent's gender to the slot it occupies on a child record.
/// A modeling choice, not a biological assertion; `Other` fills neither
/// slot on the child-attach path.
pub fn parent_slot(gender: Gender) -> Option<EdgeKind> {
    match gender {
        Gender::Male => Some(EdgeKind::Father),
        Gender::Female => Some(EdgeKind::Mother),
        Gender::Other => None,
    }
}
