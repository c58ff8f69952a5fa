//! Integration tests for the record stores and the typed entity helpers.

use chrono::Utc;
use database::{
    delete_entity, insert_entity, load_all, load_entity, seed_defaults, DatabaseConfig,
    DatabaseError, EntityKind, FrequentPlayer, MemoryStore, NoopStore, PersistenceGateway,
    SavedConfig, SqliteStore,
};
use types::{HouseRules, RoleCounts, RoleDefinition, RoleId, RolePreset};
use uuid::Uuid;

async fn sqlite() -> SqliteStore {
    SqliteStore::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory store")
}

#[tokio::test]
async fn test_seed_defaults_fills_empty_store() {
    let mut store = sqlite().await;
    let report = seed_defaults(&mut store).await.expect("Failed to seed");
    assert_eq!(report.roles.len(), RoleId::ALL.len());
    assert_eq!(report.presets, 7);
    assert!(report.house_rules);

    let roles: Vec<RoleDefinition> = load_all(&store).await.unwrap();
    assert_eq!(roles.len(), RoleId::ALL.len());
    let presets: Vec<RolePreset> = load_all(&store).await.unwrap();
    assert!(presets.iter().any(|preset| preset.id == "chaos_14"));
}

#[tokio::test]
async fn test_seed_defaults_only_restores_missing_roles() {
    let mut store = sqlite().await;
    seed_defaults(&mut store).await.unwrap();

    let mut custom = RoleDefinition::default_for(RoleId::Seer);
    custom.notes = "House variant".to_string();
    insert_entity(&mut store, &custom).await.unwrap();
    delete_entity(&mut store, &RoleDefinition::default_for(RoleId::Mayor))
        .await
        .unwrap();
    store.commit().await.unwrap();

    let report = seed_defaults(&mut store).await.unwrap();
    assert_eq!(report.roles, vec![RoleId::Mayor]);
    assert_eq!(report.presets, 0);
    assert!(!report.house_rules);

    let seer: RoleDefinition = load_entity(&store, "seer").await.unwrap();
    assert_eq!(seer.notes, "House variant");
}

#[tokio::test]
async fn test_saved_config_round_trips_through_sqlite() {
    let mut store = sqlite().await;
    let config = SavedConfig {
        id: Uuid::new_v4(),
        date: Utc::now(),
        players_count: 8,
        role_selection: RoleCounts::new()
            .with(RoleId::Werewolf, 2)
            .with(RoleId::Villager, 6),
        preset_id: Some("classic_8".to_string()),
    };
    insert_entity(&mut store, &config).await.unwrap();
    store.commit().await.unwrap();

    let loaded: Vec<SavedConfig> = load_all(&store).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].role_selection, config.role_selection);
    assert_eq!(loaded[0].preset_id.as_deref(), Some("classic_8"));
}

#[tokio::test]
async fn test_missing_entity_is_reported() {
    let store = MemoryStore::new();
    let result: Result<HouseRules, _> = load_entity(&store, "default").await;
    assert!(matches!(
        result,
        Err(DatabaseError::RecordNotFound { ref kind, .. }) if kind == "house_rules"
    ));
}

#[tokio::test]
async fn test_gateway_is_object_safe() {
    let mut stores: Vec<Box<dyn PersistenceGateway>> = vec![
        Box::new(NoopStore),
        Box::new(MemoryStore::new()),
        Box::new(sqlite().await),
    ];
    for store in stores.iter_mut() {
        let player = FrequentPlayer::new("Alice", Utc::now());
        insert_entity(store.as_mut(), &player).await.unwrap();
        store.commit().await.unwrap();
        let players: Vec<FrequentPlayer> = load_all(store.as_ref()).await.unwrap();
        assert!(players.len() <= 1);
    }
    assert!(stores[0].load(EntityKind::FrequentPlayer).await.unwrap().is_empty());
}
