//! Naming integration tests.
//!
//! These tests drive name resolution against a real SQLite cache file.

use chrono::{Duration as ChronoDuration, Utc};
use modelnamer_core::{cache_key, DisplayNameCache, Namer, NoopNotifier, DEFAULT_MAX_AGE};
use modelnamer_provider::mock::MockGenerator;
use modelnamer_provider::CatalogModel;
use modelnamer_storage::{CacheEntry, NameStore, SqliteStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn gpt4(provider: &str) -> CatalogModel {
    CatalogModel {
        id: "gpt-4".to_string(),
        model: "gpt-4".to_string(),
        provider: provider.to_string(),
        route: provider.to_string(),
        description: format!("GPT-4 served by {provider}"),
        kind: "llm".to_string(),
        enabled: 1,
        available: 1,
        max_tokens: 8192,
        ..Default::default()
    }
}

fn open_namer(path: &Path, generator: &MockGenerator) -> Namer {
    let store = SqliteStore::open(path).expect("Failed to open cache");
    Namer::new(
        DisplayNameCache::new(Arc::new(store)),
        Arc::new(generator.clone()),
        Arc::new(NoopNotifier),
    )
}

/// Test that a batched response names both variants and persists them.
#[tokio::test]
async fn test_group_names_are_persisted() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("cache.db");
    let openai = gpt4("openai");
    let azure = gpt4("azure");

    let generator = MockGenerator::with_text_response("[1] -> GPT-4 (OpenAI)\n[2] -> GPT-4 (Azure)");
    let namer = open_namer(&path, &generator);
    let names = namer.resolve_all(&[openai.clone(), azure.clone()]).await;

    assert_ne!(cache_key(&openai), cache_key(&azure));
    assert_eq!(names[&cache_key(&openai)], "GPT-4 (OpenAI)");
    assert_eq!(names[&cache_key(&azure)], "GPT-4 (Azure)");
    drop(namer);

    // A fresh process reads both names from disk without calling out
    let offline = MockGenerator::unavailable();
    let namer = open_namer(&path, &offline);
    let names = namer.resolve_all(&[openai.clone(), azure.clone()]).await;

    assert_eq!(names[&cache_key(&openai)], "GPT-4 (OpenAI)");
    assert_eq!(names[&cache_key(&azure)], "GPT-4 (Azure)");
    assert_eq!(offline.call_count(), 0);
    assert_eq!(namer.cache().stats().await.expect("stats"), 2);
}

/// Test that a fallback name is never written to the cache.
#[tokio::test]
async fn test_fallback_is_not_cached() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("cache.db");
    let model = gpt4("openai");

    let namer = open_namer(&path, &MockGenerator::unavailable());
    let names = namer.resolve_all(std::slice::from_ref(&model)).await;

    assert_eq!(names[&cache_key(&model)], "gpt-4");
    assert_eq!(namer.cache().get(&model).await, None);
    assert_eq!(namer.cache().stats().await.expect("stats"), 0);

    // Once the service is back the model gets a real name
    let generator = MockGenerator::with_text_response("GPT-4");
    let namer = open_namer(&path, &generator);
    let names = namer.resolve_all(std::slice::from_ref(&model)).await;
    assert_eq!(names[&cache_key(&model)], "GPT-4");
    assert_eq!(generator.call_count(), 1);
}

/// Test that a metadata change invalidates the cached name.
#[tokio::test]
async fn test_metadata_change_forces_regeneration() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("cache.db");
    let before = gpt4("openai");

    let generator = MockGenerator::new();
    generator.expect_text("GPT-4");
    generator.expect_text("GPT-4 (32K)");
    let namer = open_namer(&path, &generator);
    assert_eq!(namer.resolve_one(&before).await, "GPT-4");

    let mut after = before.clone();
    after.max_tokens = 32_768;
    assert_eq!(namer.resolve_one(&after).await, "GPT-4 (32K)");
    assert_eq!(generator.call_count(), 2);
    assert_eq!(namer.cache().stats().await.expect("stats"), 2);
}

/// Test that the age sweep removes only stale entries.
#[tokio::test]
async fn test_sweep_removes_stale_entries() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let path = temp.path().join("cache.db");
    let stale = gpt4("openai");
    let fresh = gpt4("azure");

    let store = SqliteStore::open(&path).expect("Failed to open cache");
    store
        .put(&CacheEntry::with_created_at(
            cache_key(&stale),
            "GPT-4 (OpenAI)",
            Utc::now() - ChronoDuration::days(31),
        ))
        .await
        .expect("put stale");
    store
        .put(&CacheEntry::with_created_at(
            cache_key(&fresh),
            "GPT-4 (Azure)",
            Utc::now() - ChronoDuration::days(29),
        ))
        .await
        .expect("put fresh");

    let cache = DisplayNameCache::new(Arc::new(store));
    let removed = cache.clean_old_entries(DEFAULT_MAX_AGE).await.expect("sweep");

    assert_eq!(removed, 1);
    assert_eq!(cache.get(&stale).await, None);
    assert_eq!(cache.get(&fresh).await.as_deref(), Some("GPT-4 (Azure)"));
}
