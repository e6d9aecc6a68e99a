//! Registry behavior through the gateway facade.

mod common;

use briefing_gateway::{GatewayConfig, ProviderGateway};
use briefing_providers::{
    ModelDescriptor, NewProvider, ProviderKind, ProviderPatch, RegistryError,
};
use common::{FailingProbe, KEY, StaticProbe, by_kind, gateway_over, memory_gateway, persisted};
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn fresh_registry_seeds_catalog() {
    let (gateway, store) = memory_gateway();

    let providers = gateway.list();
    let kinds: Vec<_> = providers.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ProviderKind::Gemini,
            ProviderKind::Groq,
            ProviderKind::Anthropic,
            ProviderKind::Grok,
            ProviderKind::Ollama,
        ]
    );

    let connected: Vec<_> = providers.iter().filter(|p| p.is_connected).collect();
    assert_eq!(connected.len(), 1);
    assert_eq!(connected[0].kind, ProviderKind::Gemini);

    // Seeding is persisted right away.
    assert_eq!(persisted(&store).as_array().map(Vec::len), Some(5));
}

#[test]
fn add_then_remove_custom_provider() {
    let (gateway, _store) = memory_gateway();

    let added = gateway
        .add(NewProvider::custom("X", "https://e.com"))
        .unwrap();
    assert_eq!(added.kind, ProviderKind::Custom);
    assert!(added.models.is_empty());
    assert!(!added.is_connected);
    assert!(added.last_tested_at.is_none());
    assert!(gateway.list().iter().any(|p| p.id == added.id));

    gateway.remove(&added.id).unwrap();
    assert!(gateway.list().iter().all(|p| p.id != added.id));

    let err = gateway.remove(&added.id).unwrap_err();
    assert_eq!(err, RegistryError::ProviderNotFound(added.id));
}

#[test]
fn predefined_providers_cannot_be_removed() {
    let (gateway, _store) = memory_gateway();
    let groq = by_kind(&gateway, ProviderKind::Groq);

    let err = gateway.remove(&groq.id).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::UnsupportedOperation {
            kind: ProviderKind::Groq,
            ..
        }
    ));
    assert_eq!(gateway.list().len(), 5);
}

#[test]
fn ids_stay_unique_across_adds() {
    let (gateway, _store) = memory_gateway();
    for n in 0..20 {
        gateway
            .add(NewProvider::custom(format!("P{n}"), "https://e.com"))
            .unwrap();
    }

    let ids: HashSet<_> = gateway.list().into_iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 25);
}

#[test]
fn set_active_leaves_exactly_one_active() {
    let (gateway, _store) = memory_gateway();
    let added = gateway
        .add(NewProvider::custom("X", "https://e.com").with_active(true))
        .unwrap();

    // Adding an active provider does not deactivate the others.
    assert_eq!(gateway.list().iter().filter(|p| p.is_active).count(), 2);

    gateway.set_active(&added.id).unwrap();
    let active: Vec<_> = gateway.list().into_iter().filter(|p| p.is_active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, added.id);

    assert_eq!(
        gateway.set_active("provider-unknown").unwrap_err(),
        RegistryError::ProviderNotFound("provider-unknown".into())
    );
    assert_eq!(gateway.active_provider().unwrap().id, added.id);
}

#[test]
fn credential_gating_by_kind() {
    let (gateway, _store) = memory_gateway();
    let ollama = by_kind(&gateway, ProviderKind::Ollama);
    let groq = by_kind(&gateway, ProviderKind::Groq);

    let err = gateway.set_credential(&ollama.id, "secret").unwrap_err();
    assert!(matches!(err, RegistryError::UnsupportedOperation { .. }));
    assert_eq!(gateway.credential(&ollama.id).unwrap(), None);

    gateway.set_credential(&groq.id, "gsk-123").unwrap();
    assert_eq!(
        gateway.credential(&groq.id).unwrap().as_deref(),
        Some("gsk-123")
    );

    assert!(gateway.credential("missing").unwrap_err().is_not_found());
}

#[tokio::test]
async fn selected_model_must_be_available() {
    let (gateway, _store) = memory_gateway();
    let gemini = by_kind(&gateway, ProviderKind::Gemini);

    let models = gateway.available_models(&gemini.id).await.unwrap();
    let first = &models[0].id;
    gateway.set_selected_model(&gemini.id, first).unwrap();

    let err = gateway
        .set_selected_model(&gemini.id, "gemini-0.1-nano")
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::ModelNotFound {
            provider: gemini.id.clone(),
            model: "gemini-0.1-nano".into(),
        }
    );
    assert_eq!(
        gateway.get(&gemini.id).unwrap().selected_model.as_deref(),
        Some(first.as_str())
    );
}

#[tokio::test]
async fn probe_failure_clears_connectivity() {
    let probe = FailingProbe::new(ProviderKind::Gemini);
    let gateway = ProviderGateway::builder()
        .store(Arc::new(briefing_core::persistence::MemoryStore::new()))
        .probe(probe.clone())
        .build()
        .unwrap();

    let gemini = by_kind(&gateway, ProviderKind::Gemini);
    assert!(gemini.is_connected);

    let result = gateway.test_connection(&gemini.id).await;
    assert!(!result.success);
    assert_eq!(result.message, "Gemini connection failed");
    assert_eq!(result.error.as_deref(), Some("connection reset by peer"));
    assert_eq!(probe.calls(), 1);

    let after = gateway.get(&gemini.id).unwrap();
    assert!(!after.is_connected);
    assert_eq!(after.last_tested_at, gemini.last_tested_at);
}

#[tokio::test]
async fn unknown_id_probe_is_a_failed_result() {
    let (gateway, _store) = memory_gateway();
    let result = gateway.test_connection("provider-404").await;
    assert!(!result.success);
    assert_eq!(result.message, "Provider not found");
    assert_eq!(
        result.error.as_deref(),
        Some("Provider with id provider-404 not found")
    );
}

#[tokio::test]
async fn available_models_caches_probe_results() {
    let store = Arc::new(briefing_core::persistence::MemoryStore::new());
    let gateway = ProviderGateway::builder()
        .store(store.clone())
        .config(GatewayConfig::default().with_storage_key(KEY))
        .probe(Arc::new(StaticProbe {
            kind: ProviderKind::Custom,
            models: vec![ModelDescriptor::new("m1"), ModelDescriptor::new("m2")],
        }))
        .build()
        .unwrap();

    let added = gateway
        .add(NewProvider::custom("Local", "http://127.0.0.1:9"))
        .unwrap();
    let models = gateway.available_models(&added.id).await.unwrap();
    assert_eq!(models.len(), 2);

    let record = gateway.get(&added.id).unwrap();
    assert_eq!(record.models, models);
    assert!(record.is_connected);
    assert!(record.last_tested_at.is_some());

    let stored = persisted(&store);
    let stored_custom = stored
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == added.id.as_str())
        .unwrap();
    assert_eq!(stored_custom["models"].as_array().map(Vec::len), Some(2));
    assert_eq!(stored_custom["isConnected"], true);
}

#[tokio::test]
async fn available_models_surfaces_probe_errors() {
    let gateway = gateway_over(
        Arc::new(briefing_core::persistence::MemoryStore::new()),
        GatewayConfig::default(),
    );
    let groq = by_kind(&gateway, ProviderKind::Groq);

    let err = gateway.available_models(&groq.id).await.unwrap_err();
    assert_eq!(
        err,
        RegistryError::Probe("Groq API key is required for connection testing".into())
    );
    assert!(gateway.get(&groq.id).unwrap().models.is_empty());
}

#[test]
fn update_validates_the_merged_record() {
    let (gateway, _store) = memory_gateway();
    let added = gateway
        .add(NewProvider::custom("X", "https://e.com"))
        .unwrap();

    let err = gateway
        .update(&added.id, ProviderPatch::new().endpoint(None))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidConfig(_)));
    assert_eq!(
        gateway.get(&added.id).unwrap().endpoint.as_deref(),
        Some("https://e.com")
    );

    let updated = gateway
        .update(
            &added.id,
            ProviderPatch::new()
                .models(vec![ModelDescriptor::new("a")])
                .selected_model(Some("a".into())),
        )
        .unwrap();
    assert_eq!(updated.selected_model.as_deref(), Some("a"));
    assert_eq!(updated.id, added.id);
    assert_eq!(updated.kind, ProviderKind::Custom);
}

#[test]
fn list_returns_a_copy() {
    let (gateway, _store) = memory_gateway();
    let mut providers = gateway.list();
    providers.clear();
    assert_eq!(gateway.list().len(), 5);
}
