use sqlx::PgPool;
use std::sync::Arc;
use url_redirector::domain::entities::{CampaignKind, CampaignTagPatch, NewCampaignTag};
use url_redirector::domain::repositories::CampaignRepository;
use url_redirector::error::AppError;
use url_redirector::infrastructure::persistence::PgCampaignRepository;

fn new_tag(unique_id: &str, kind: CampaignKind, tag: &str) -> NewCampaignTag {
    NewCampaignTag {
        unique_id: unique_id.to_string(),
        user_id: "user-1".to_string(),
        kind,
        tag: tag.to_string(),
        name: "Spring newsletter".to_string(),
    }
}

fn constraint_of(err: AppError) -> String {
    match err {
        AppError::Conflict { context, .. } => context["constraint"].as_str().unwrap().to_string(),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[sqlx::test]
async fn test_create_and_list(pool: PgPool) {
    let repo = PgCampaignRepository::new(Arc::new(pool));

    let created = repo
        .create(new_tag("aB3dE6", CampaignKind::Source, "newsletter"))
        .await
        .unwrap();
    assert_eq!(created.kind, CampaignKind::Source);

    repo.create(new_tag("xY9zW1", CampaignKind::Medium, "email"))
        .await
        .unwrap();

    let sources = repo
        .list_by_user(CampaignKind::Source, "user-1")
        .await
        .unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].unique_id, "aB3dE6");
}

#[sqlx::test]
async fn test_unique_constraints(pool: PgPool) {
    let repo = PgCampaignRepository::new(Arc::new(pool));

    repo.create(new_tag("aB3dE6", CampaignKind::Source, "newsletter"))
        .await
        .unwrap();

    let err = repo
        .create(new_tag("aB3dE6", CampaignKind::Name, "spring"))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(err), "campaign_tags_unique_id_key");

    let err = repo
        .create(new_tag("qR5tY7", CampaignKind::Source, "newsletter"))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(err), "campaign_tags_user_kind_tag_key");
}

#[sqlx::test]
async fn test_update_and_delete(pool: PgPool) {
    let repo = PgCampaignRepository::new(Arc::new(pool));

    repo.create(new_tag("aB3dE6", CampaignKind::Source, "newsletter"))
        .await
        .unwrap();

    let patch = CampaignTagPatch {
        tag: None,
        name: Some("Summer".to_string()),
    };
    let updated = repo
        .update(CampaignKind::Source, "user-1", "aB3dE6", patch.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Summer");
    assert_eq!(updated.tag, "newsletter");

    // Wrong kind does not match.
    assert!(
        repo.update(CampaignKind::Medium, "user-1", "aB3dE6", patch)
            .await
            .unwrap()
            .is_none()
    );

    assert!(repo.delete(CampaignKind::Source, "user-1", "aB3dE6").await.unwrap());
    assert!(!repo.delete(CampaignKind::Source, "user-1", "aB3dE6").await.unwrap());
}
