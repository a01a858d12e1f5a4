//! Integration tests for the author repository

mod common;

use assert_matches::assert_matches;
use quill_api::models::CreateAuthor;
use quill_api::repositories::AuthorRepository;
use quill_api::ApiError;
use rstest::rstest;

use common::{empty_pool, seeded_pool};

#[tokio::test]
async fn test_seed_runs_once() {
    let repo = AuthorRepository::new(seeded_pool().await);

    assert_eq!(repo.count().await.unwrap(), 2);
    assert_eq!(repo.seed_defaults().await.unwrap(), 0);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_find_many_skips_missing_ids() {
    let repo = AuthorRepository::new(seeded_pool().await);
    let authors = repo.find_all().await.unwrap();

    let ids = vec![
        authors[1].id.clone(),
        "nope".to_string(),
        authors[0].id.clone(),
    ];
    let mut found = repo.find_many(&ids).await.unwrap();
    found.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(found, authors);
}

#[tokio::test]
async fn test_find_many_beyond_bind_parameter_limit() {
    let repo = AuthorRepository::new(seeded_pool().await);
    let authors = repo.find_all().await.unwrap();

    // More IDs than SQLite accepts as bound parameters in one statement
    let mut ids: Vec<String> = (0..40_000).map(|n| format!("unknown-{}", n)).collect();
    ids.insert(7, authors[0].id.clone());
    ids.push(authors[1].id.clone());

    let mut found = repo.find_many(&ids).await.unwrap();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(found, authors);
}

#[tokio::test]
async fn test_find_many_empty_input() {
    let repo = AuthorRepository::new(seeded_pool().await);
    assert!(repo.find_many(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_then_find_by_id() {
    let repo = AuthorRepository::new(empty_pool().await);

    let created = repo.create(&CreateAuthor::new("  Ada  ")).await.unwrap();
    assert_eq!(created.name, "Ada");
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());

    let found = repo.find_by_id(&created.id).await.unwrap();
    assert_eq!(found, Some(created));
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn test_create_rejects_blank_names(#[case] name: &str) {
    let repo = AuthorRepository::new(empty_pool().await);

    let result = repo.create(&CreateAuthor::new(name)).await;
    assert_matches!(result, Err(ApiError::ValidationError(_)));
    assert_eq!(repo.count().await.unwrap(), 0);
}
