//! Per-entity orchestration hooks

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use fbr_model::{
    Coach, FootballAssociation, FootballClub, Member, NationalTeam, Person, PersonType, Player,
    President, Updatable,
};

/// A record the registry can manage
pub trait Managed: Updatable {
    /// Role tag the base person should carry for this record
    const ROLE: Option<PersonType> = None;

    /// Caller-level rules checked before a write
    ///
    /// # Errors
    /// The rule that failed
    fn admit(&self, _config: &RegistryConfig) -> Result<()> {
        Ok(())
    }
}

impl Managed for Person {}

impl Managed for Member {
    const ROLE: Option<PersonType> = Some(PersonType::Member);
}

impl Managed for Player {
    const ROLE: Option<PersonType> = Some(PersonType::Player);
}

impl Managed for Coach {
    const ROLE: Option<PersonType> = Some(PersonType::Coach);
}

impl Managed for President {
    const ROLE: Option<PersonType> = Some(PersonType::President);
}

impl Managed for FootballClub {}

impl Managed for FootballAssociation {}

impl Managed for NationalTeam {
    fn admit(&self, config: &RegistryConfig) -> Result<()> {
        let actual = self.players().len();
        if actual < config.min_national_team_players {
            return Err(RegistryError::TooFewPlayers {
                required: config.min_national_team_players,
                actual,
            });
        }
        Ok(())
    }
}
