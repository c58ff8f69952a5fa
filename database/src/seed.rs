use types::{builtin_presets, HouseRules, RoleCatalog, RoleDefinition, RoleId, RolePreset};

use crate::{
    entity::{insert_entity, load_all},
    DatabaseError, PersistenceGateway,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles: Vec<RoleId>,
    pub presets: usize,
    pub house_rules: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.presets == 0 && !self.house_rules
    }
}

/// Inserts whatever default configuration the store is missing: absent
/// catalog roles, the built-in presets when there are none, and default
/// house rules. Existing records are never overwritten.
pub async fn seed_defaults<S>(store: &mut S) -> Result<SeedReport, DatabaseError>
where
    S: PersistenceGateway + ?Sized,
{
    let mut report = SeedReport::default();

    let definitions: Vec<RoleDefinition> = load_all(&*store).await?;
    for id in RoleCatalog::missing_from(&definitions) {
        insert_entity(store, &RoleDefinition::default_for(id)).await?;
        report.roles.push(id);
    }

    let presets: Vec<RolePreset> = load_all(&*store).await?;
    if presets.is_empty() {
        for preset in builtin_presets() {
            insert_entity(store, &preset).await?;
            report.presets += 1;
        }
    }

    let rules: Vec<HouseRules> = load_all(&*store).await?;
    if rules.is_empty() {
        insert_entity(store, &HouseRules::default()).await?;
        report.house_rules = true;
    }

    if report.is_empty() {
        return Ok(report);
    }

    store.commit().await?;
    tracing::info!(
        "Seeded {} roles, {} presets, house rules: {}",
        report.roles.len(),
        report.presets,
        report.house_rules
    );
    Ok(report)
}
