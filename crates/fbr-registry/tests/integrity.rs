//! Functional tests for writes guarded by validation and integrity checks.
//!
//! Guarantees exercised here:
//! - Nothing is written unless every field is valid, the key is unused and
//!   every reference resolves.
//! - Updates report every violation and write only the fields that changed.
//! - Store failures surface to the caller unchanged.

use fbr_model::prelude::*;
use fbr_registry::{RegistryConfig, RegistryError};
use fbr_store::{DocumentStore, StoreError};
use fbr_test_utils::{
    association, club, init_test_logging, member, memory_registry, memory_registry_with,
    national_team, person, seeded_registry,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn sample_data_seeds_cleanly() {
    init_test_logging();
    let (store, _registry) = seeded_registry().await;

    let counts: Vec<usize> = Collection::ALL
        .iter()
        .map(|c| store.document_count(c.name()))
        .collect();
    // persons, members, players, coaches, presidents, clubs, associations, national teams
    assert_eq!(counts, vec![28, 2, 23, 3, 2, 6, 3, 2]);
}

/// A stored record reads back equal to what `add` returned.
#[tokio::test]
async fn stored_person_reads_back_unchanged() {
    let (_store, registry) = memory_registry();
    let added = registry
        .persons()
        .add(&person(1, "  Manuel Neuer ", "1986-03-27", "1", &["2"]))
        .await
        .unwrap();
    assert_eq!(added.name(), "Manuel Neuer");

    let read = registry
        .persons()
        .retrieve(PersonId::new(1).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read, added);
    assert!(read.has_role(PersonType::Player));
}

/// An update that matches the stored record is a no-op.
#[tokio::test]
async fn unchanged_update_writes_nothing() {
    let (store, registry) = seeded_registry().await;
    let stored = registry
        .persons()
        .retrieve(PersonId::new(8).unwrap())
        .await
        .unwrap()
        .unwrap();

    // any write would consume this fault and fail the update
    store.fail_next_write("unexpected write");
    let outcome = registry.persons().update(&stored.to_slots()).await.unwrap();
    assert!(outcome.is_noop());
    assert_eq!(outcome.record, stored);

    // the fault is still pending, so nothing reached the store
    assert!(store.delete("persons", "8").await.is_err());
    assert!(store.contains("persons", "8"));
}

#[tokio::test]
async fn update_writes_only_changed_fields() {
    let (_store, registry) = seeded_registry().await;
    let mut slots = registry
        .persons()
        .retrieve(PersonId::new(2).unwrap())
        .await
        .unwrap()
        .unwrap()
        .to_slots();
    slots.name = "Antonio Rüdiger".into();

    let outcome = registry.persons().update(&slots).await.unwrap();
    assert_eq!(outcome.fields, vec!["name".to_string()]);

    let read = registry
        .persons()
        .retrieve(PersonId::new(2).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.name(), "Antonio Rüdiger");
    assert_eq!(read.date_of_birth().to_string(), "1993-03-03");
}

/// Every invalid field is reported and none of the valid ones is written.
#[tokio::test]
async fn invalid_update_reports_every_field() {
    let (_store, registry) = seeded_registry().await;
    let mut slots = registry
        .persons()
        .retrieve(PersonId::new(3).unwrap())
        .await
        .unwrap()
        .unwrap()
        .to_slots();
    slots.name = String::new();
    slots.date_of_birth = "1850-01-01".into();
    slots.gender = "2".into();

    let err = registry.persons().update(&slots).await.unwrap_err();
    let report = err.violations().unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.for_field("name").unwrap().kind(), ViolationKind::MandatoryValue);
    assert_eq!(
        report.for_field("dateOfBirth").unwrap().kind(),
        ViolationKind::Interval
    );

    let read = registry
        .persons()
        .retrieve(PersonId::new(3).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.gender(), Gender::Male);
}

/// The key of an update must resolve like any other reference.
#[tokio::test]
async fn updating_missing_record_violates_referential_integrity() {
    let (store, registry) = memory_registry();
    let err = registry
        .clubs()
        .update(&club(9, "Holstein Kiel", "1", 1))
        .await
        .unwrap_err();
    let violation = err.violations().unwrap().for_field("clubId").unwrap();
    assert_eq!(violation.kind(), ViolationKind::ReferentialIntegrity);
    assert_eq!(
        violation.message(),
        "There is no football club record with this Club ID (9)!"
    );
    assert_eq!(store.document_count("clubs"), 0);
}

#[tokio::test]
async fn member_with_missing_club_is_not_stored() {
    let (store, registry) = memory_registry();
    registry
        .associations()
        .add(&association(1, "DFB", &[]))
        .await
        .unwrap();

    let err = registry
        .members()
        .add(&member(27, &[7], &[1]))
        .await
        .unwrap_err();
    assert!(err.has_violation(ViolationKind::ReferentialIntegrity));
    let violation = err.violations().unwrap().for_field("assoClubs").unwrap();
    assert_eq!(
        violation.message(),
        "There is no football club record with this Club ID (7)!"
    );
    assert_eq!(store.document_count("members"), 0);
}

#[tokio::test]
async fn duplicate_association_is_rejected() {
    let (store, registry) = memory_registry();
    registry
        .associations()
        .add(&association(5, "Bayerischer Fußball-Verband", &[]))
        .await
        .unwrap();

    let err = registry
        .associations()
        .add(&association(5, "BFV", &[]))
        .await
        .unwrap_err();
    assert!(err.has_violation(ViolationKind::Uniqueness));
    assert_eq!(store.document_count("associations"), 1);
    let stored = registry
        .associations()
        .retrieve(AssoId::new(5).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name(), "Bayerischer Fußball-Verband");
}

/// Field, uniqueness and reference problems are reported together.
#[tokio::test]
async fn add_collects_all_violations() {
    let (_store, registry) = seeded_registry().await;
    let err = registry
        .clubs()
        .add(&club(1, "", "1", 9))
        .await
        .unwrap_err();
    let report = err.violations().unwrap();
    assert_eq!(report.for_field("name").unwrap().kind(), ViolationKind::MandatoryValue);

    let err = registry
        .clubs()
        .add(&club(1, "Hamburger SV", "1", 9))
        .await
        .unwrap_err();
    let report = err.violations().unwrap();
    assert_eq!(report.for_field("clubId").unwrap().kind(), ViolationKind::Uniqueness);
    assert_eq!(
        report.for_field("association").unwrap().kind(),
        ViolationKind::ReferentialIntegrity
    );
}

#[tokio::test]
async fn short_national_team_is_rejected() {
    let (store, registry) = memory_registry();
    let err = registry
        .national_teams()
        .add(&national_team("1", 12, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::TooFewPlayers {
            required: 11,
            actual: 10
        }
    ));
    assert_eq!(store.document_count("nationalTeams"), 0);
}

#[tokio::test]
async fn squad_minimum_is_configurable() {
    let (_store, registry) =
        memory_registry_with(RegistryConfig::new().with_min_national_team_players(2));
    let err = registry
        .national_teams()
        .add(&national_team("2", 24, &[13, 14]))
        .await
        .unwrap_err();
    // past the size rule, the references are checked
    assert!(err.has_violation(ViolationKind::ReferentialIntegrity));
}

#[tokio::test]
async fn update_cannot_shrink_team_below_minimum() {
    let (_store, registry) = seeded_registry().await;
    let err = registry
        .national_teams()
        .update(&NationalTeamUpdate {
            gender: "1".into(),
            coach: "12".into(),
            players_to_add: Vec::new(),
            players_to_remove: vec!["1".into()],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::TooFewPlayers { actual: 10, .. }));

    let team = registry
        .national_teams()
        .retrieve(Gender::Male)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(team.players().len(), 11);
}

#[tokio::test]
async fn member_update_applies_deltas() {
    let (_store, registry) = seeded_registry().await;
    let outcome = registry
        .members()
        .update(&MemberUpdate {
            person_id: "28".into(),
            asso_clubs_to_add: vec!["5".into()],
            asso_clubs_to_remove: vec!["2".into()],
            asso_associations_to_add: vec!["1".into()],
            asso_associations_to_remove: Vec::new(),
        })
        .await
        .unwrap();
    let clubs: Vec<u32> = outcome.record.asso_clubs().iter().map(|c| c.get()).collect();
    assert_eq!(clubs, vec![5]);

    let err = registry
        .members()
        .update(&MemberUpdate {
            person_id: "28".into(),
            asso_clubs_to_add: vec!["8".into()],
            ..MemberUpdate::default()
        })
        .await
        .unwrap_err();
    assert!(err.has_violation(ViolationKind::ReferentialIntegrity));
}

#[tokio::test]
async fn store_outage_surfaces_unchanged() {
    let (store, registry) = memory_registry();
    store.set_unavailable(true);

    let err = registry
        .associations()
        .add(&association(1, "DFB", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Store(StoreError::Unavailable(_))));
    assert!(err.is_retryable());

    store.set_unavailable(false);
    assert_eq!(store.document_count("associations"), 0);
}
