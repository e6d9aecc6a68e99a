//! Reconciliation of persisted providers with the catalog.
//!
//! Catalog records always come first, in catalog order. Each one is overlaid
//! with the first persisted element of the same kind, field by field, with
//! persisted values winning where present. Persisted custom providers follow
//! in persisted order; one whose id is already taken gets a fresh `-n`
//! suffix. Everything else (duplicates of a catalog kind, elements without a
//! kind, custom providers without an id or endpoint) is dropped.
//!
//! The function is pure, so running it twice over the same input yields the
//! same list.

use crate::store::StoredProvider;
use briefing_providers::catalog::{self, ProviderTemplate};
use briefing_providers::{ModelDescriptor, ProviderKind, ProviderRecord};
use std::collections::HashSet;

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// The reconciled provider list.
    pub records: Vec<ProviderRecord>,
    /// `true` if nothing usable was persisted and the list was seeded from
    /// the catalog. A seeded list should be persisted right away.
    pub seeded: bool,
}

/// Builds the registry's provider list from persisted data.
#[must_use]
pub fn reconcile(persisted: Option<Vec<StoredProvider>>) -> Reconciled {
    let Some(persisted) = persisted else {
        return Reconciled {
            records: catalog::seeded_records(),
            seeded: true,
        };
    };

    let mut consumed = vec![false; persisted.len()];
    let mut used_ids = HashSet::new();
    let mut records = Vec::with_capacity(persisted.len().max(ProviderKind::ALL.len()));

    for (index, template) in catalog::defaults().iter().enumerate() {
        let base = template.seed(index);
        let found = persisted
            .iter()
            .enumerate()
            .find(|(i, stored)| !consumed[*i] && stored.kind == Some(template.kind));

        let mut record = match found {
            Some((i, stored)) => {
                consumed[i] = true;
                overlay(base, stored)
            }
            None => base,
        };

        if !used_ids.insert(record.id.clone()) {
            record.id = free_id(&ProviderTemplate::seed_id(index), &used_ids);
            tracing::warn!(kind = %template.kind, id = %record.id, "stored provider id collides, reassigning");
            used_ids.insert(record.id.clone());
        }
        records.push(record);
    }

    for (i, stored) in persisted.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        match stored.kind {
            Some(ProviderKind::Custom) => match restore_custom(stored) {
                Some(mut record) => {
                    if used_ids.contains(&record.id) {
                        let id = free_id(&record.id, &used_ids);
                        tracing::warn!(from = %record.id, to = %id, "custom provider id collides, reassigning");
                        record.id = id;
                    }
                    used_ids.insert(record.id.clone());
                    records.push(record);
                }
                None => {
                    tracing::warn!(index = i, "dropping custom provider without id or base URL");
                }
            },
            Some(kind) => {
                tracing::debug!(index = i, %kind, "dropping duplicate stored provider");
            }
            None => {
                tracing::warn!(index = i, "dropping stored provider without a type");
            }
        }
    }

    Reconciled {
        records,
        seeded: false,
    }
}

/// Overlays persisted fields onto a seeded record.
fn overlay(base: ProviderRecord, stored: &StoredProvider) -> ProviderRecord {
    let mut record = ProviderRecord {
        id: non_empty(stored.id.clone()).unwrap_or(base.id),
        kind: base.kind,
        display_name: non_empty(stored.display_name.clone()).unwrap_or(base.display_name),
        credential: stored.credential.clone().or(base.credential),
        endpoint: stored.endpoint.clone().or(base.endpoint),
        is_active: stored.is_active.unwrap_or(base.is_active),
        is_connected: stored.is_connected.unwrap_or(base.is_connected),
        models: stored
            .models
            .clone()
            .map_or(base.models, dedup_models),
        selected_model: stored.selected_model.clone().or(base.selected_model),
        last_tested_at: stored.last_tested_at.or(base.last_tested_at),
    };
    heal_selection(&mut record);
    record
}

/// Rebuilds a persisted custom provider. Returns `None` if it has no id or
/// no endpoint.
fn restore_custom(stored: &StoredProvider) -> Option<ProviderRecord> {
    let id = non_empty(stored.id.clone())?;
    let endpoint = non_empty(stored.endpoint.clone())?;

    let mut record = ProviderRecord {
        id,
        kind: ProviderKind::Custom,
        display_name: non_empty(stored.display_name.clone())
            .unwrap_or_else(|| ProviderKind::Custom.label().to_string()),
        credential: stored.credential.clone(),
        endpoint: Some(endpoint),
        is_active: stored.is_active.unwrap_or(false),
        is_connected: stored.is_connected.unwrap_or(false),
        models: stored.models.clone().map(dedup_models).unwrap_or_default(),
        selected_model: stored.selected_model.clone(),
        last_tested_at: stored.last_tested_at,
    };
    heal_selection(&mut record);
    Some(record)
}

pub(crate) fn heal_selection(record: &mut ProviderRecord) {
    if let Some(selected) = &record.selected_model
        && !record.has_model(selected)
    {
        tracing::debug!(provider = %record.id, model = %selected, "clearing dangling model selection");
        record.selected_model = None;
    }
}

/// Keeps the first model per id.
pub(crate) fn dedup_models(models: Vec<ModelDescriptor>) -> Vec<ModelDescriptor> {
    let mut seen = HashSet::new();
    models
        .into_iter()
        .filter(|model| seen.insert(model.id.clone()))
        .collect()
}

fn free_id(preferred: &str, used: &HashSet<String>) -> String {
    if !used.contains(preferred) {
        return preferred.to_string();
    }
    (2..)
        .map(|n| format!("{preferred}-{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| preferred.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
