//! National team record
//!
//! One team per gender. The minimum squad size is a registry rule, not a
//! record invariant.

use crate::check::{apply_delta, check_gender, parse_id_set};
use crate::collection::Collection;
use crate::enumeration::{EnumCode, Gender};
use crate::ids::{DocKey, PersonId};
use crate::record::{key_array, Changes, ConversionError, DocReader, Record, Reference, Updatable};
use crate::violation::ViolationReport;
use fbr_store::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Raw national-team input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalTeamSlots {
    /// Gender code, also the key
    pub gender: String,
    /// Coach person id
    #[serde(rename = "coach_id")]
    pub coach: String,
    /// Player person ids
    #[serde(rename = "playerIdRefs")]
    pub players: Vec<String>,
}

/// National-team changes; players as add and remove lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalTeamUpdate {
    /// Gender code of the team
    pub gender: String,
    /// Coach person id; empty removes the coach
    #[serde(rename = "coach_id")]
    pub coach: String,
    /// Player ids to add
    #[serde(rename = "playerIdRefsToAdd")]
    pub players_to_add: Vec<String>,
    /// Player ids to remove
    #[serde(rename = "playerIdRefsToRemove")]
    pub players_to_remove: Vec<String>,
}

/// The national team of one gender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationalTeam {
    gender: Gender,
    coach: Option<PersonId>,
    players: BTreeSet<PersonId>,
}

impl NationalTeam {
    /// Gender, also the key
    #[must_use]
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Coach
    #[must_use]
    pub fn coach(&self) -> Option<PersonId> {
        self.coach
    }

    /// Players
    #[must_use]
    pub fn players(&self) -> &BTreeSet<PersonId> {
        &self.players
    }
}

impl Record for NationalTeam {
    type Key = Gender;
    type Slots = NationalTeamSlots;
    const COLLECTION: Collection = Collection::NationalTeams;

    fn from_slots(slots: &NationalTeamSlots) -> Result<Self, ViolationReport> {
        let mut report = ViolationReport::new();
        let gender = report.check("gender", check_gender(&slots.gender));
        let coach = report.check("coach", PersonId::parse(&slots.coach));
        let players = report.check("players", parse_id_set(&slots.players, PersonId::parse));
        match (gender, coach, players) {
            (Some(gender), Some(coach), Some(players)) => Ok(Self {
                gender,
                coach,
                players,
            }),
            _ => Err(report),
        }
    }

    fn key(&self) -> Gender {
        self.gender
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = Reference::to_all("coach", Collection::Coaches, &self.coach);
        refs.extend(Reference::to_all("players", Collection::Players, &self.players));
        refs
    }

    fn to_document(&self) -> Document {
        let mut doc = Document::new()
            .with("gender", self.gender.to_value())
            .with("playerIdRefs", key_array(&self.players));
        if let Some(coach) = self.coach {
            doc.insert("coach_id", coach.get());
        }
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ConversionError> {
        let r = DocReader::new(doc, Collection::NationalTeams);
        Ok(Self {
            gender: r.code("gender")?,
            coach: r.opt_key("coach_id", PersonId::from_stored)?,
            players: r.key_set("playerIdRefs", PersonId::from_stored)?,
        })
    }
}

impl Updatable for NationalTeam {
    type Update = NationalTeamUpdate;

    fn update_key(update: &NationalTeamUpdate) -> Result<Gender, ViolationReport> {
        check_gender(&update.gender).map_err(|v| ViolationReport::single("gender", v))
    }

    fn changes(&self, update: &NationalTeamUpdate) -> Result<Changes<Self>, ViolationReport> {
        let mut report = ViolationReport::new();
        let mut changes = Changes::new(self.clone());

        if let Some(coach) = report.check("coach", PersonId::parse(&update.coach)) {
            if coach != self.coach {
                match coach {
                    Some(id) => {
                        changes
                            .references
                            .push(Reference::to("coach", Collection::Coaches, &id));
                        changes.set("coach_id", id.get());
                    }
                    None => changes.clear("coach_id"),
                }
                changes.record.coach = coach;
            }
        }

        let add = report.check(
            "players",
            parse_id_set(&update.players_to_add, PersonId::parse),
        );
        let remove = report.check(
            "players",
            parse_id_set(&update.players_to_remove, PersonId::parse),
        );
        if let (Some(add), Some(remove)) = (add, remove) {
            let players = apply_delta(&self.players, &add, &remove);
            if players != self.players {
                changes.references.extend(Reference::to_all(
                    "players",
                    Collection::Players,
                    add.difference(&remove),
                ));
                changes.set("playerIdRefs", key_array(&players));
                changes.record.players = players;
            }
        }

        report.into_result(changes)
    }
}
