//! Testing utilities for the FBR workspace
//!
//! Sample data, slot builders and a seeded in-memory registry.

#![allow(missing_docs)]

use fbr_model::{
    AssociationSlots, ClubSlots, CoachSlots, MemberSlots, NationalTeamSlots, PersonSlots,
    PlayerSlots, PresidentSlots,
};
use fbr_registry::{Registry, RegistryConfig};
use fbr_store::MemoryStore;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::io;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Sample data, as raw form input
#[derive(Debug, Clone)]
pub struct SampleData {
    pub persons: Vec<PersonSlots>,
    pub associations: Vec<AssociationSlots>,
    pub clubs: Vec<ClubSlots>,
    pub members: Vec<MemberSlots>,
    pub players: Vec<PlayerSlots>,
    pub coaches: Vec<CoachSlots>,
    pub presidents: Vec<PresidentSlots>,
    pub national_teams: Vec<NationalTeamSlots>,
}

fn fixture<T: DeserializeOwned>(name: &str, json: &str) -> Vec<T> {
    serde_json::from_str(json).unwrap_or_else(|e| panic!("fixture {name}: {e}"))
}

impl SampleData {
    pub fn load() -> Self {
        Self {
            persons: fixture("persons", include_str!("../fixtures/persons.json")),
            associations: fixture("associations", include_str!("../fixtures/associations.json")),
            clubs: fixture("clubs", include_str!("../fixtures/clubs.json")),
            members: fixture("members", include_str!("../fixtures/members.json")),
            players: fixture("players", include_str!("../fixtures/players.json")),
            coaches: fixture("coaches", include_str!("../fixtures/coaches.json")),
            presidents: fixture("presidents", include_str!("../fixtures/presidents.json")),
            national_teams: fixture(
                "national_teams",
                include_str!("../fixtures/national_teams.json"),
            ),
        }
    }

    /// Add everything through the registry, referenced records first
    pub async fn seed(&self, registry: &Registry) {
        for slots in &self.associations {
            registry.associations().add(slots).await.unwrap();
        }
        for slots in &self.clubs {
            registry.clubs().add(slots).await.unwrap();
        }
        for slots in &self.persons {
            registry.persons().add(slots).await.unwrap();
        }
        for slots in &self.members {
            registry.members().add(slots).await.unwrap();
        }
        for slots in &self.players {
            registry.players().add(slots).await.unwrap();
        }
        for slots in &self.coaches {
            registry.coaches().add(slots).await.unwrap();
        }
        for slots in &self.presidents {
            registry.presidents().add(slots).await.unwrap();
        }
        for slots in &self.national_teams {
            registry.national_teams().add(slots).await.unwrap();
        }
    }
}

/// Empty registry over a fresh in-memory store
pub fn memory_registry() -> (MemoryStore, Registry) {
    memory_registry_with(RegistryConfig::default())
}

pub fn memory_registry_with(config: RegistryConfig) -> (MemoryStore, Registry) {
    let store = MemoryStore::new();
    let registry = Registry::new(store.clone(), config);
    (store, registry)
}

/// Registry holding the full sample data set
pub async fn seeded_registry() -> (MemoryStore, Registry) {
    let (store, registry) = memory_registry();
    SampleData::load().seed(&registry).await;
    (store, registry)
}

/// Route tracing output through the test harness
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory sink for formatted log lines
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.0))
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Capture this thread's events at `WARN` and above until the guard drops
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }
}

pub fn person(id: u32, name: &str, date_of_birth: &str, gender: &str, types: &[&str]) -> PersonSlots {
    PersonSlots {
        person_id: id.to_string(),
        name: name.to_string(),
        date_of_birth: date_of_birth.to_string(),
        gender: gender.to_string(),
        types: types.iter().map(ToString::to_string).collect(),
    }
}

pub fn association(id: u32, name: &str, sup: &[u32]) -> AssociationSlots {
    AssociationSlots {
        asso_id: id.to_string(),
        name: name.to_string(),
        sup_associations: ids(sup),
    }
}

pub fn club(id: u32, name: &str, gender: &str, association: u32) -> ClubSlots {
    ClubSlots {
        club_id: id.to_string(),
        name: name.to_string(),
        gender: gender.to_string(),
        association: association.to_string(),
    }
}

pub fn member(id: u32, clubs: &[u32], associations: &[u32]) -> MemberSlots {
    MemberSlots {
        person_id: id.to_string(),
        asso_clubs: ids(clubs),
        asso_associations: ids(associations),
    }
}

pub fn player(id: u32, club: u32) -> PlayerSlots {
    PlayerSlots {
        person_id: id.to_string(),
        asso_club: club.to_string(),
    }
}

pub fn coach(id: u32, club: u32) -> CoachSlots {
    CoachSlots {
        person_id: id.to_string(),
        asso_club: club.to_string(),
    }
}

pub fn president(id: u32, association: u32) -> PresidentSlots {
    PresidentSlots {
        person_id: id.to_string(),
        asso_association: association.to_string(),
    }
}

pub fn national_team(gender: &str, coach: u32, players: &[u32]) -> NationalTeamSlots {
    NationalTeamSlots {
        gender: gender.to_string(),
        coach: coach.to_string(),
        players: ids(players),
    }
}

fn ids(values: &[u32]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
