//! Integration tests for users, chat history and preferences.

use sqlx::PgPool;
use vidgen_db::models::chat_message::{CreateChatMessage, KIND_ASSISTANT, KIND_USER};
use vidgen_db::models::user::CreateUser;
use vidgen_db::models::user_preference::UpdateUserPreference;
use vidgen_db::repositories::chat_message_repo::HISTORY_LIMIT;
use vidgen_db::repositories::{ChatMessageRepo, UserPreferenceRepo, UserRepo};

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        display_name: Some("Tester".to_string()),
        role: "user".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("dup@example.com"))
        .await
        .unwrap_err();

    let constraint = err.as_database_error().and_then(|e| e.constraint());
    assert_eq!(constraint, Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_email_and_record_login(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("a@example.com"))
        .await
        .unwrap();
    assert!(created.last_login_at.is_none());

    UserRepo::record_login(&pool, created.id).await.unwrap();

    let found = UserRepo::find_by_email(&pool, "a@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);
    assert!(found.last_login_at.is_some());
    assert!(UserRepo::find_by_email(&pool, "missing@example.com")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_chat_history_returns_latest_oldest_first(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@example.com"))
        .await
        .unwrap();

    let total = HISTORY_LIMIT + 5;
    for i in 0..total {
        let kind = if i % 2 == 0 { KIND_USER } else { KIND_ASSISTANT };
        ChatMessageRepo::create(
            &pool,
            &CreateChatMessage {
                user_id: user.id,
                kind: kind.to_string(),
                content: format!("message {i}"),
                video_id: None,
            },
        )
        .await
        .unwrap();
    }

    let history = ChatMessageRepo::list_recent(&pool, user.id).await.unwrap();

    assert_eq!(history.len() as i64, HISTORY_LIMIT);
    assert_eq!(history.first().unwrap().content, "message 5");
    assert_eq!(
        history.last().unwrap().content,
        format!("message {}", total - 1)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_preferences_upsert_and_counter(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("a@example.com"))
        .await
        .unwrap();

    assert!(UserPreferenceRepo::find_by_user(&pool, user.id)
        .await
        .unwrap()
        .is_none());

    UserPreferenceRepo::increment_total_videos(&pool, user.id)
        .await
        .unwrap();
    UserPreferenceRepo::increment_total_videos(&pool, user.id)
        .await
        .unwrap();

    let prefs = UserPreferenceRepo::upsert(
        &pool,
        user.id,
        &UpdateUserPreference {
            preferred_style: Some("watercolor".to_string()),
            analysis_summary: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(prefs.total_videos, 2);
    assert_eq!(prefs.preferred_style.as_deref(), Some("watercolor"));

    let prefs = UserPreferenceRepo::upsert(
        &pool,
        user.id,
        &UpdateUserPreference {
            preferred_style: None,
            analysis_summary: Some("Likes landscapes".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(prefs.preferred_style.as_deref(), Some("watercolor"));
    assert_eq!(prefs.analysis_summary.as_deref(), Some("Likes landscapes"));
}
