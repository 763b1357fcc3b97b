// ABOUTME: Integration tests for the SQLite managers
// ABOUTME: Coach uniqueness, edits and removal, foreign keys, listing order and timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Coachhub Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    at, coach_registration, coaching_request, coaching_request_payload, create_engine,
    create_test_database,
};

use chrono::Duration;
use coachhub::database::{CoachSort, Database, ListCoachesFilter, ListCoachingRequestsFilter};
use coachhub_core::errors::ErrorCode;
use coachhub_core::models::{CoachRole, CreateCoachRequest, PatchCoachRequest};

async fn weekly_bucket_count(database: &Database, coach_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM weekly_coaching_requests WHERE coach_id = $1")
        .bind(coach_id)
        .fetch_one(database.pool())
        .await
        .unwrap()
}

fn priced_coach(
    email: &str,
    first_name: &str,
    expertise: &str,
    hourly_rate: u32,
) -> CreateCoachRequest {
    CreateCoachRequest {
        first_name: first_name.to_owned(),
        expertise: vec![expertise.to_owned()],
        hourly_rate,
        ..coach_registration(email)
    }
}

#[tokio::test]
async fn test_coach_defaults_and_lookup() {
    let database = create_test_database().await;
    let coaches = database.coaches();

    let coach = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();

    assert_eq!(coach.roles, vec![CoachRole::User]);
    assert_eq!(coach.image_url, "/avatars/avatar.png");
    assert_eq!(coaches.get(&coach.id).await.unwrap(), Some(coach.clone()));
    assert!(coaches.exists(&coach.id).await.unwrap());
    assert!(!coaches.exists("missing").await.unwrap());
    assert!(coaches.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_coach_email_is_already_exists() {
    let database = create_test_database().await;
    let coaches = database.coaches();
    coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();

    let err = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert!(err.message.contains("coach@example.com"));
}

#[tokio::test]
async fn test_coaching_request_requires_existing_coach() {
    let database = create_test_database().await;

    let err = database
        .coaching_requests()
        .create(&coaching_request_payload("ghost", "hello"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_coaching_request_timestamps_round_trip() {
    let database = create_test_database().await;
    let coach = database
        .coaches()
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();
    let requests = database.coaching_requests();

    let created_at = at(2024, 4, 1, 9) + Duration::nanoseconds(123_456_789);
    let created = requests
        .create_at(&coaching_request_payload(&coach.id, "hello"), created_at)
        .await
        .unwrap();

    assert_eq!(created.created_at, at(2024, 4, 1, 9) + Duration::microseconds(123_456));
    let stored = requests.get(&created.id).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_update_and_delete_coaching_request() {
    let database = create_test_database().await;
    let coach = database
        .coaches()
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();
    let requests = database.coaching_requests();
    let created = requests
        .create(&coaching_request_payload(&coach.id, "hello"))
        .await
        .unwrap();

    let mut changed = created.clone();
    changed.reply = Some("hi".to_owned());
    changed.reply_at = Some(created.created_at);
    assert!(requests.update(&changed).await.unwrap());
    assert_eq!(requests.get(&created.id).await.unwrap(), Some(changed.clone()));

    let mut ghost = changed.clone();
    ghost.id = "missing".to_owned();
    assert!(!requests.update(&ghost).await.unwrap());

    let mut bad_coach = changed.clone();
    bad_coach.coach_id = "ghost".to_owned();
    let err = requests.update(&bad_coach).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    assert_eq!(requests.delete(&created.id).await.unwrap(), Some(changed));
    assert!(requests.delete(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_orders_newest_first_and_filters() {
    let database = create_test_database().await;
    let first = database
        .coaches()
        .create(&coach_registration("first@example.com"))
        .await
        .unwrap();
    let second = database
        .coaches()
        .create(&coach_registration("second@example.com"))
        .await
        .unwrap();
    let requests = database.coaching_requests();

    for day in 1..=3 {
        requests
            .create_at(&coaching_request_payload(&first.id, "first"), at(2024, 4, day, 9))
            .await
            .unwrap();
    }
    requests
        .create_at(&coaching_request_payload(&second.id, "second"), at(2024, 4, 2, 12))
        .await
        .unwrap();

    let all = requests
        .list(&ListCoachingRequestsFilter {
            coach_id: None,
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap();
    let days: Vec<_> = all.iter().map(|r| r.created_at).collect();
    assert_eq!(
        days,
        vec![
            at(2024, 4, 3, 9),
            at(2024, 4, 2, 12),
            at(2024, 4, 2, 9),
            at(2024, 4, 1, 9)
        ]
    );

    let filtered = requests
        .list(&ListCoachingRequestsFilter {
            coach_id: Some(first.id.clone()),
            limit: 1,
            offset: 1,
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].created_at, at(2024, 4, 2, 9));
}

#[tokio::test]
async fn test_email_exists_returns_owner() {
    let database = create_test_database().await;
    let coaches = database.coaches();
    let coach = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();

    assert_eq!(
        coaches.email_exists("coach@example.com").await.unwrap(),
        Some(coach.id)
    );
    assert!(coaches.email_exists("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_coach_overwrites_profile() {
    let database = create_test_database().await;
    let coaches = database.coaches();
    let coach = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();

    let mut changed = coach.clone();
    changed.email = "moved@example.com".to_owned();
    changed.description = "Clay court specialist".to_owned();
    changed.expertise = vec!["tennis".to_owned()];
    changed.hourly_rate = 95;
    changed.updated_at = coach.updated_at + Duration::minutes(1);
    assert!(coaches.update(&changed).await.unwrap());
    assert_eq!(coaches.get(&coach.id).await.unwrap(), Some(changed.clone()));

    changed.id = "missing".to_owned();
    assert!(!coaches.update(&changed).await.unwrap());
}

#[tokio::test]
async fn test_patch_coach_applies_present_fields_only() {
    let database = create_test_database().await;
    let coaches = database.coaches();
    let coach = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();

    let patch = PatchCoachRequest {
        hourly_rate: Some(150),
        expertise: Some(vec!["padel".to_owned()]),
        ..Default::default()
    };
    let patched = coaches.patch(&coach.id, &patch).await.unwrap().unwrap();

    assert_eq!(patched.hourly_rate, 150);
    assert_eq!(patched.expertise, vec!["padel"]);
    assert_eq!(patched.email, coach.email);
    assert_eq!(patched.first_name, coach.first_name);
    assert_eq!(patched.image_url, coach.image_url);
    assert_eq!(patched.created_at, coach.created_at);
    assert!(patched.updated_at >= coach.updated_at);
    assert_eq!(coaches.get(&coach.id).await.unwrap(), Some(patched));

    assert!(coaches.patch("missing", &patch).await.unwrap().is_none());
}

#[tokio::test]
async fn test_patch_coach_to_taken_email_is_already_exists() {
    let database = create_test_database().await;
    let coaches = database.coaches();
    coaches
        .create(&coach_registration("taken@example.com"))
        .await
        .unwrap();
    let coach = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();

    let patch = PatchCoachRequest {
        email: Some("taken@example.com".to_owned()),
        ..Default::default()
    };
    let err = coaches.patch(&coach.id, &patch).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
    assert_eq!(
        coaches.get(&coach.id).await.unwrap().unwrap().email,
        "coach@example.com"
    );
}

#[tokio::test]
async fn test_list_coaches_filters_and_sorts() {
    let database = create_test_database().await;
    let coaches = database.coaches();
    for request in [
        priced_coach("a@example.com", "Ana", "yoga", 40),
        priced_coach("b@example.com", "Ben", "tennis", 120),
        priced_coach("c@example.com", "Cleo", "yoga", 90),
    ] {
        coaches.create(&request).await.unwrap();
    }

    let yoga_by_rate = coaches
        .list(&ListCoachesFilter {
            expertise: Some("yoga".to_owned()),
            sort: CoachSort::RateDesc,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = yoga_by_rate.iter().map(|c| c.first_name.as_str()).collect();
    assert_eq!(names, vec!["Cleo", "Ana"]);

    let mid_range = coaches
        .list(&ListCoachesFilter {
            min_hourly_rate: Some(50),
            max_hourly_rate: Some(120),
            sort: CoachSort::FirstName,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = mid_range.iter().map(|c| c.first_name.as_str()).collect();
    assert_eq!(names, vec!["Ben", "Cleo"]);

    let by_email = coaches
        .list(&ListCoachesFilter {
            email: Some("b@example.com".to_owned()),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].first_name, "Ben");

    let second_page = coaches
        .list(&ListCoachesFilter {
            sort: CoachSort::RateAsc,
            limit: 1,
            offset: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].hourly_rate, 90);
}

#[test]
fn test_coach_sort_parsing() {
    assert_eq!("-hourly_rate".parse::<CoachSort>().unwrap(), CoachSort::RateDesc);
    assert_eq!("created_at".parse::<CoachSort>().unwrap(), CoachSort::Oldest);
    assert_eq!("-created_at".parse::<CoachSort>().unwrap(), CoachSort::Newest);
    let err = "password".parse::<CoachSort>().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_delete_coach_cascades_requests_and_removes_weekly_buckets() {
    let database = create_test_database().await;
    let engine = create_engine(&database);
    let coaches = database.coaches();
    let coach = coaches
        .create(&coach_registration("coach@example.com"))
        .await
        .unwrap();
    let other = coaches
        .create(&coach_registration("other@example.com"))
        .await
        .unwrap();

    let stored = database
        .coaching_requests()
        .create(&coaching_request_payload(&coach.id, "hello"))
        .await
        .unwrap();
    engine.insert(&stored).await.unwrap();
    engine
        .insert(&coaching_request(&coach.id, at(2020, 3, 3, 12)))
        .await
        .unwrap();
    engine
        .insert(&coaching_request(&other.id, at(2020, 3, 3, 12)))
        .await
        .unwrap();
    assert_eq!(weekly_bucket_count(&database, &coach.id).await, 2);

    let deleted = coaches.delete(&coach.id).await.unwrap();
    assert_eq!(deleted, Some(coach.clone()));

    assert!(coaches.get(&coach.id).await.unwrap().is_none());
    assert!(database
        .coaching_requests()
        .get(&stored.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(weekly_bucket_count(&database, &coach.id).await, 0);
    assert_eq!(weekly_bucket_count(&database, &other.id).await, 1);

    assert!(coaches.delete(&coach.id).await.unwrap().is_none());
}
