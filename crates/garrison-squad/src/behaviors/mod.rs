//! Behaviour families.
//!
//! `ground` holds manoeuvres shared by ground-squad families; each family
//! module defines one state enum implementing `SquadBehavior`.

pub mod ground;
pub mod protection;

pub use protection::ProtectionState;
