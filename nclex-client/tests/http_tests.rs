//! End-to-end tests: HTTP client against a live nclex-server on loopback

use std::net::SocketAddr;
use std::time::Duration;

use nclex_client::{HttpReviewApi, ListView, ReviewApi, Session, ViewState};
use nclex_common::models::{EnglishLevel, NewComment, PassStatus};
use nclex_common::ReviewQuery;
use nclex_server::{build_router, db, AppState, Paging};

/// Spawn a server over a fresh in-memory database, returning its API base URL
async fn spawn_server() -> String {
    let pool = db::init_in_memory()
        .await
        .expect("Should create in-memory database");
    let app = build_router(AppState::new(pool, Paging::default()), &[]);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind loopback");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{}/api", addr)
}

async fn client() -> HttpReviewApi {
    let base = spawn_server().await;
    HttpReviewApi::new(&base, Duration::from_secs(5)).unwrap()
}

fn fill_draft(session: &mut Session, title: &str) {
    let draft = session.draft_mut();
    draft.title = title.to_string();
    draft.author = "nurse_kim".to_string();
    draft.content = "Practice questions every day.".to_string();
    draft.study_period = "2 years".to_string();
    draft.exam_date = "2024-05-01".to_string();
    draft.english_level = EnglishLevel::High;
    draft.toggle_resource("UWorld");
}

#[tokio::test]
async fn test_empty_board() {
    let api = client().await;
    let mut session = Session::new();

    session.go_home(&api).await;

    assert_eq!(session.list_view(), ListView::Empty);
    assert_eq!(session.stats().total_reviews, 0);
    assert_eq!(session.stats().avg_study_months, 4.0);
}

#[tokio::test]
async fn test_submit_browse_and_interact() {
    let api = client().await;
    let mut session = Session::new();

    session.open_write();
    fill_draft(&mut session, "Passed at 85 questions");
    let created = session.submit(&api).await.expect("submit should succeed");

    // Back home with the new review listed
    assert_eq!(session.view(), ViewState::Home);
    assert_eq!(session.total(), 1);
    assert_eq!(session.stats().total_reviews, 1);
    assert_eq!(session.stats().pass_rate, 100.0);

    let id = created.id.to_string();
    assert!(session.select_review(&api, &id).await);

    let review = session.selected_review().unwrap();
    assert_eq!(review.id, id);
    assert_eq!(review.pass_status, PassStatus::Pass);
    assert_eq!(review.study_period_months, 24);
    assert_eq!(review.exam_date.as_deref(), Some("2024-05-01"));
    assert_eq!(review.base_info.english_level, EnglishLevel::High);
    assert!(!review.base_info.is_working);
    assert_eq!(review.resources, vec!["UWorld"]);
    assert_eq!(review.center_tips, None);
    assert_eq!(review.view_count, 1);
    // created_at is truncated to the date portion
    assert_eq!(review.created_at.len(), 10);

    assert_eq!(session.like_selected(&api).await, Some(1));
    assert_eq!(session.selected_review().unwrap().likes, 1);

    session.post_comment(&api, "lee", "Congrats!").await.unwrap();
    assert_eq!(session.comments().len(), 1);
    assert_eq!(session.comments()[0].author, "lee");
}

#[tokio::test]
async fn test_filters_reach_server() {
    let api = client().await;
    let mut session = Session::new();

    for title in ["high english", "medium english"] {
        session.open_write();
        fill_draft(&mut session, title);
        if title.starts_with("medium") {
            session.draft_mut().english_level = EnglishLevel::Medium;
        }
        session.submit(&api).await.unwrap();
    }
    assert_eq!(session.total(), 2);

    let ticket = session
        .update_filters(|f| f.english_level = "High".to_string())
        .unwrap();
    session.run_list_fetch(&api, ticket).await;
    assert_eq!(session.total(), 1);
    assert_eq!(session.reviews()[0].title, "high english");

    let ticket = session.update_filters(|f| f.search = "nothing like this".to_string()).unwrap();
    session.run_list_fetch(&api, ticket).await;
    assert_eq!(session.list_view(), ListView::Empty);
}

#[tokio::test]
async fn test_paging_query() {
    let api = client().await;
    let mut session = Session::new();
    for i in 0..13 {
        session.open_write();
        fill_draft(&mut session, &format!("review {}", i));
        session.submit(&api).await.unwrap();
    }

    let first = api.fetch_reviews(&ReviewQuery::default()).await.unwrap();
    assert_eq!(first.reviews.len(), 12);
    assert_eq!(first.total_pages, 2);

    let second = api
        .fetch_reviews(&ReviewQuery::default().with_page(2))
        .await
        .unwrap();
    assert_eq!(second.page, 2);
    assert_eq!(second.reviews.len(), 1);
    assert_eq!(second.reviews[0].title, "review 0");
}

#[tokio::test]
async fn test_missing_review_is_status_error() {
    let api = client().await;

    let err = api.fetch_review("999").await.unwrap_err();
    assert!(matches!(err, nclex_client::ClientError::Status(404, _)));

    let err = api
        .create_comment(
            "999",
            &NewComment {
                author: "a".to_string(),
                content: "b".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, nclex_client::ClientError::Status(404, _)));
}
