//! FBR Model
//!
//! Football records and the synchronous half of their validation.
//!
//! # Overview
//!
//! - **Enumeration**: closed integer-coded value sets ([`Gender`], [`PersonType`])
//! - **ConstraintViolation**: the five violation kinds, returned as values
//! - **Checks**: pure per-field validators over raw form input
//! - **Records**: [`Person`], the role records, [`FootballClub`],
//!   [`FootballAssociation`] and [`NationalTeam`], with their document converters
//!
//! # Example
//!
//! ```rust
//! use fbr_model::prelude::*;
//!
//! let club = FootballClub::from_slots(&ClubSlots {
//!     club_id: "1".into(),
//!     name: "FC Bayern München".into(),
//!     gender: "1".into(),
//!     association: "3".into(),
//! })
//! .unwrap();
//! assert_eq!(club.references()[0].target, Collection::Associations);
//!
//! let err = check_date_of_birth("1889-12-31").unwrap_err();
//! assert_eq!(err.kind(), ViolationKind::Interval);
//! ```

#![warn(missing_docs)]

pub mod association;
pub mod check;
pub mod club;
pub mod collection;
pub mod enumeration;
pub mod ids;
pub mod national_team;
pub mod person;
pub mod record;
pub mod roles;
pub mod violation;

// Re-exports
pub use association::{AssociationSlots, AssociationUpdate, FootballAssociation};
pub use club::{ClubSlots, FootballClub};
pub use collection::Collection;
pub use enumeration::{EnumCode, Enumeration, Gender, PersonType};
pub use ids::{AssoId, ClubId, DocKey, PersonId};
pub use national_team::{NationalTeam, NationalTeamSlots, NationalTeamUpdate};
pub use person::{Person, PersonSlots};
pub use record::{Changes, ConversionError, Record, Reference, Updatable};
pub use roles::{
    Coach, CoachSlots, Member, MemberSlots, MemberUpdate, Player, PlayerSlots, President,
    PresidentSlots,
};
pub use violation::{ConstraintViolation, FieldViolation, Validation, ViolationKind, ViolationReport};

/// Prelude for common imports
pub mod prelude {
    pub use crate::check::{
        check_date_of_birth, check_gender, check_name, check_types, BIRTH_DATE_MIN,
    };
    pub use crate::{
        AssoId, AssociationSlots, AssociationUpdate, ClubId, ClubSlots, Coach, CoachSlots,
        Collection, ConstraintViolation, DocKey, EnumCode, FootballAssociation, FootballClub,
        Gender, Member, MemberSlots, MemberUpdate, NationalTeam, NationalTeamSlots,
        NationalTeamUpdate, Person, PersonId, PersonSlots, PersonType, Player, PlayerSlots,
        President, PresidentSlots, Record, Updatable, Validation, ViolationKind, ViolationReport,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
