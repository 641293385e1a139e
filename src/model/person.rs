use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::Id;

/// Gender of a family member. Only used to decide which of the
/// mother/father parent slots an attachment populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Gender> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            "OTHER" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// The embedded kinship pointer record of a member: who they are married
/// to, their children, and their parents. `mother_id`/`father_id`, when
/// set, must also appear in `parent_ids`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Kinship {
    pub spouse_id: Option<Id<Person>>,
    pub children_ids: Vec<Id<Person>>,
    pub parent_ids: Vec<Id<Person>>,
    pub mother_id: Option<Id<Person>>,
    pub father_id: Option<Id<Person>>,
}

impl Kinship {
    /// True if any pointer references `id`.
    pub fn references(&self, id: Id<Person>) -> bool {
        self.spouse_id == Some(id)
            || self.mother_id == Some(id)
            || self.father_id == Some(id)
            || self.children_ids.contains(&id)
            || self.parent_ids.contains(&id)
    }

    /// Removes every pointer to `id`. Returns true if anything changed.
    pub fn sever(&mut self, id: Id<Person>) -> bool {
        let mut changed = false;
        if self.spouse_id == Some(id) {
            self.spouse_id = None;
            changed = true;
        }
        if self.mother_id == Some(id) {
            self.mother_id = None;
            changed = true;
        }
        if self.father_id == Some(id) {
            self.father_id = None;
            changed = true;
        }
        let before = self.children_ids.len();
        self.children_ids.retain(|c| *c != id);
        changed |= self.children_ids.len() != before;
        let before = self.parent_ids.len();
        self.parent_ids.retain(|p| *p != id);
        changed |= self.parent_ids.len() != before;
        changed
    }

    pub fn add_child(&mut self, id: Id<Person>) {
        if !self.children_ids.contains(&id) {
            self.children_ids.push(id);
        }
    }

    pub fn add_parent(&mut self, id: Id<Person>) {
        if !self.parent_ids.contains(&id) {
            self.parent_ids.push(id);
        }
    }
}

/// A member of a family. Created on member-add, never hard-deleted:
/// removal flips `active` off and severs all pointers at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Id<Person>,
    pub full_name: String,
    pub nick_name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub gender: Gender,
    pub blood_group: Option<String>,
    pub birth_day: Option<NaiveDate>,
    pub marriage_anniversary: Option<NaiveDate>,
    pub job: Option<String>,
    pub education: Option<String>,
    pub death_anniversary: Option<NaiveDate>,
    /// Display-ordering hint for tree rendering, not a graph key.
    pub location: i32,
    pub active: bool,
    pub kinship: Kinship,
}

impl Person {
    pub fn create(full_name: String, gender: Gender) -> Self {
        Self {
            id: Id::generate(),
            full_name,
            nick_name: None,
            mobile: None,
            email: None,
            image_url: None,
            bio: None,
            gender,
            blood_group: None,
            birth_day: None,
            marriage_anniversary: None,
            job: None,
            education: None,
            death_anniversary: None,
            location: 0,
            active: true,
            kinship: Kinship::default(),
        }
    }
}

/// Profile attributes consumed by member add/update. The image URL comes
/// from the media collaborator and is stored verbatim.
#[derive(Debug, Clone, Default)]
pub struct MemberDraft {
    pub full_name: String,
    pub nick_name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    pub blood_group: Option<String>,
    pub birth_day: Option<NaiveDate>,
    pub marriage_anniversary: Option<NaiveDate>,
    pub job: Option<String>,
    pub education: Option<String>,
    pub death_anniversary: Option<NaiveDate>,
    pub location: Option<i32>,
}

impl MemberDraft {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn with_gender(full_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            full_name: full_name.into(),
            gender: Some(gender),
            ..Default::default()
        }
    }
}
