pub mod account;
pub mod family;
pub mod ids;
pub mod person;

pub use account::Account;
pub use family::{AttachKind, Edge, EdgeKind, Family, FamilyNode};
pub use ids::Id;
pub use person::{Gender, Kinship, MemberDraft, Person};
