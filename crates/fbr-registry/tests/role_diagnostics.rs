//! Functional tests for the role-agreement warning on role record writes.
//!
//! Role records are stored whether or not the base person carries the
//! role tag; the disagreement is only logged.

use fbr_registry::{Registry, RegistryConfig};
use fbr_store::MemoryStore;
use fbr_test_utils::{
    association, club, memory_registry, memory_registry_with, person, player, LogCapture,
};

async fn with_club(config: RegistryConfig) -> (MemoryStore, Registry) {
    let (store, registry) = memory_registry_with(config);
    registry.associations().add(&association(1, "DFB", &[])).await.unwrap();
    registry.clubs().add(&club(4, "Holstein Kiel", "1", 1)).await.unwrap();
    (store, registry)
}

#[tokio::test]
async fn player_for_member_only_person_is_logged() {
    let (store, registry) = with_club(RegistryConfig::new()).await;
    registry
        .persons()
        .add(&person(7, "Fin Bartels", "1987-02-07", "1", &["1"]))
        .await
        .unwrap();

    let logs = LogCapture::default();
    let _guard = logs.install();
    registry.players().add(&player(7, 4)).await.unwrap();

    assert!(logs.contains("base person lacks the role tag"), "{}", logs.contents());
    assert!(logs.contains("role=Player"), "{}", logs.contents());
    assert!(store.contains("players", "7"));
}

#[tokio::test]
async fn player_without_base_person_is_logged() {
    let (store, registry) = with_club(RegistryConfig::new()).await;

    let logs = LogCapture::default();
    let _guard = logs.install();
    registry.players().add(&player(7, 4)).await.unwrap();

    assert!(logs.contains("role record has no base person in persons"), "{}", logs.contents());
    assert!(store.contains("players", "7"));
}

#[tokio::test]
async fn agreeing_roles_log_nothing() {
    let (_store, registry) = with_club(RegistryConfig::new()).await;
    registry
        .persons()
        .add(&person(7, "Fin Bartels", "1987-02-07", "1", &["2"]))
        .await
        .unwrap();

    let logs = LogCapture::default();
    let _guard = logs.install();
    registry.players().add(&player(7, 4)).await.unwrap();

    assert_eq!(logs.contents(), "");
}

#[tokio::test]
async fn disabled_warning_stays_silent() {
    let (store, registry) =
        with_club(RegistryConfig::new().with_role_mismatch_warnings(false)).await;

    let logs = LogCapture::default();
    let _guard = logs.install();
    registry.players().add(&player(7, 4)).await.unwrap();

    assert!(!logs.contains("base person"), "{}", logs.contents());
    assert!(store.contains("players", "7"));
}

#[tokio::test]
async fn non_role_records_skip_the_check() {
    let (_store, registry) = memory_registry();

    let logs = LogCapture::default();
    let _guard = logs.install();
    registry.associations().add(&association(1, "DFB", &[])).await.unwrap();

    assert_eq!(logs.contents(), "");
}
