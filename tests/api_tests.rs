mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;

/// Helper to create a test server backed by its own empty database
async fn setup() -> TestServer {
    let pool = common::create_test_pool().await;
    let app = common::create_test_app(pool);
    TestServer::new(app).unwrap()
}

async fn create_speaker(server: &TestServer, name: &str, email: &str) -> serde_json::Value {
    let response = server
        .post("/speakers")
        .json(&json!({ "name": name, "email": email }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn create_speaker_with_avatar(
    server: &TestServer,
    name: &str,
    email: &str,
    avatar: &str,
) -> serde_json::Value {
    let response = server
        .post("/speakers")
        .json(&json!({ "name": name, "email": email, "avatar": avatar }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn create_talk(
    server: &TestServer,
    speaker_id: &str,
    title: &str,
    new_talk: bool,
) -> serde_json::Value {
    let response = server
        .post("/talks")
        .json(&json!({
            "title": title,
            "abstract": format!("Abstract for {}", title),
            "speaker_id": speaker_id,
            "new_talk": new_talk
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

// ============================================================================
// Speaker API Tests
// ============================================================================

#[tokio::test]
async fn test_speaker_crud() {
    let server = setup().await;

    // Create a new speaker
    let create_body = json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "bio": "Wrote the first program.",
        "twitter_handle": "@ada",
        "qualifications": ["business-leader", "open-source"]
    });

    let response = server.post("/speakers").json(&create_body).await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    let speaker_id = created["id"].as_str().expect("Created speaker should have an id");
    assert_eq!(created["name"], "Ada Lovelace");
    assert_eq!(created["normalized_name"], "ada lovelace");
    assert_eq!(created["qualifications"], json!(["business-leader", "open-source"]));
    assert!(created["avatar"].is_null());

    // Read the created speaker
    let response = server.get(&format!("/speakers/{}", speaker_id)).await;
    response.assert_status_ok();
    let fetched: serde_json::Value = response.json();
    assert_eq!(fetched["email"], "ada@example.com");

    // Update merges: only the bio changes
    let response = server
        .put(&format!("/speakers/{}", speaker_id))
        .json(&json!({ "bio": "Updated bio" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["bio"], "Updated bio");
    assert_eq!(updated["name"], "Ada Lovelace");
    assert_eq!(updated["email"], "ada@example.com");
    assert_eq!(updated["qualifications"], json!(["business-leader", "open-source"]));

    // Delete the speaker
    let response = server.delete(&format!("/speakers/{}", speaker_id)).await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server.get(&format!("/speakers/{}", speaker_id)).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_speaker_validation() {
    let server = setup().await;

    // Blank name
    let response = server
        .post("/speakers")
        .json(&json!({ "name": "   ", "email": "a@example.com" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Unprocessable Entity");
    assert_eq!(body["message"], "name is required");

    // Malformed email
    let response = server
        .post("/speakers")
        .json(&json!({ "name": "No At Sign", "email": "not-an-email" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing was persisted
    let response = server.get("/speakers").await;
    response.assert_status_ok();
    let speakers: Vec<serde_json::Value> = response.json();
    assert!(speakers.is_empty());
}

#[tokio::test]
async fn test_speaker_rejects_unknown_qualification() {
    let server = setup().await;

    let response = server
        .post("/speakers")
        .json(&json!({
            "name": "Bad Quals",
            "email": "bad@example.com",
            "qualifications": ["time-traveller"]
        }))
        .await;
    // Rejected at the JSON boundary before any handler code runs
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_speaker_search_is_accent_insensitive() {
    let server = setup().await;

    create_speaker(&server, "José García", "jose@example.com").await;
    create_speaker(&server, "Plain Name", "plain@example.com").await;

    for term in ["jose", "José", "garcia", "garcía"] {
        let response = server.get(&format!("/speakers?search={}", term)).await;
        response.assert_status_ok();
        let speakers: Vec<serde_json::Value> = response.json();
        assert_eq!(speakers.len(), 1, "search term {term}");
        assert_eq!(speakers[0]["name"], "José García");
    }

    // Email fragments match too
    let response = server.get("/speakers?search=plain@").await;
    response.assert_status_ok();
    let speakers: Vec<serde_json::Value> = response.json();
    assert_eq!(speakers.len(), 1);
    assert_eq!(speakers[0]["name"], "Plain Name");
}

#[tokio::test]
async fn test_speaker_pagination() {
    let server = setup().await;

    for i in 0..3 {
        create_speaker(&server, &format!("Speaker {i}"), &format!("s{i}@example.com")).await;
    }

    let response = server.get("/speakers?limit=2&offset=0").await;
    response.assert_status_ok();
    let page: Vec<serde_json::Value> = response.json();
    assert_eq!(page.len(), 2);

    let response = server.get("/speakers?limit=2&offset=2").await;
    response.assert_status_ok();
    let page: Vec<serde_json::Value> = response.json();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_delete_speaker_with_talks_is_refused() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Busy Speaker", "busy@example.com").await;
    let speaker_id = speaker["id"].as_str().unwrap();
    let talk = create_talk(&server, speaker_id, "Still Scheduled", false).await;

    let response = server.delete(&format!("/speakers/{}", speaker_id)).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Speaker still has talks");

    // Speaker and talk both survived the attempt
    server
        .get(&format!("/speakers/{}", speaker_id))
        .await
        .assert_status_ok();

    // Once the talk is gone the speaker can be deleted
    let talk_id = talk["id"].as_str().unwrap();
    server
        .delete(&format!("/talks/{}", talk_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("/speakers/{}", speaker_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

// ============================================================================
// Talk API Tests
// ============================================================================

#[tokio::test]
async fn test_talk_crud_and_defaults() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Grace Hopper", "grace@example.com").await;
    let speaker_id = speaker["id"].as_str().unwrap();

    let response = server
        .post("/talks")
        .json(&json!({
            "title": "Compilers",
            "abstract": "From A-0 onwards.",
            "speaker_id": speaker_id
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    let talk_id = created["id"].as_str().expect("Created talk should have an id");
    assert_eq!(created["status"], "submitted");
    assert_eq!(created["length"], "normal");
    assert_eq!(created["new_talk"], false);
    assert_eq!(created["abstract"], "From A-0 onwards.");

    // Read it back
    let response = server.get(&format!("/talks/{}", talk_id)).await;
    response.assert_status_ok();

    // Update editable fields
    let response = server
        .put(&format!("/talks/{}", talk_id))
        .json(&json!({ "title": "Compilers, revisited", "length": "keynote" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["title"], "Compilers, revisited");
    assert_eq!(updated["length"], "keynote");
    assert_eq!(updated["abstract"], "From A-0 onwards.");

    // Delete
    let response = server.delete(&format!("/talks/{}", talk_id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/talks/{}", talk_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_talk_create_with_unknown_speaker() {
    let server = setup().await;

    let response = server
        .post("/talks")
        .json(&json!({
            "title": "Orphan",
            "abstract": "No speaker exists for this.",
            "speaker_id": Uuid::new_v4()
        }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Speaker not found");

    let response = server.get("/talks").await;
    let talks: Vec<serde_json::Value> = response.json();
    assert!(talks.is_empty(), "Nothing should have been persisted");
}

#[tokio::test]
async fn test_talk_requires_title_and_abstract() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Val Idator", "val@example.com").await;
    let speaker_id = speaker["id"].as_str().unwrap();

    let response = server
        .post("/talks")
        .json(&json!({ "title": "", "abstract": "x", "speaker_id": speaker_id }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .post("/talks")
        .json(&json!({ "title": "x", "abstract": "   ", "speaker_id": speaker_id }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_talk_update_ignores_status_and_speaker_fields() {
    let server = setup().await;

    let alice = create_speaker(&server, "Alice Owner", "alice@example.com").await;
    let bob = create_speaker(&server, "Bob Other", "bob@example.com").await;
    let talk = create_talk(&server, alice["id"].as_str().unwrap(), "Fixed Facts", false).await;
    let talk_id = talk["id"].as_str().unwrap();

    // A client trying to smuggle status or speaker changes through the
    // update payload gets them silently dropped
    let response = server
        .put(&format!("/talks/{}", talk_id))
        .json(&json!({
            "title": "Fixed Facts v2",
            "status": "approved",
            "speaker_id": bob["id"].as_str().unwrap()
        }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["title"], "Fixed Facts v2");
    assert_eq!(updated["status"], "submitted");
    assert_eq!(updated["speaker_id"], alice["id"]);
}

#[tokio::test]
async fn test_approve_talk_and_conflicting_second_decision() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Review Target", "review@example.com").await;
    let talk = create_talk(&server, speaker["id"].as_str().unwrap(), "Decide Me", false).await;
    let talk_id = talk["id"].as_str().unwrap();

    // First decision wins
    let response = server.post(&format!("/talks/{}/approve", talk_id)).await;
    response.assert_status_ok();
    let outcome: serde_json::Value = response.json();
    assert_eq!(outcome["talk"]["status"], "approved");
    assert_eq!(outcome["notification"]["kind"], "success");
    assert_eq!(outcome["notification"]["title"], "Talk approved");
    assert_eq!(outcome["notification"]["body"], "The talk has been approved.");
    assert_eq!(outcome["notification"]["duration_ms"], 3000);

    // A later reject loses and reports the state it found
    let response = server.post(&format!("/talks/{}/reject", talk_id)).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Talk is already approved");

    // So does a repeated approve
    let response = server.post(&format!("/talks/{}/approve", talk_id)).await;
    response.assert_status(StatusCode::CONFLICT);

    // The stored status never wavered
    let response = server.get(&format!("/talks/{}", talk_id)).await;
    let current: serde_json::Value = response.json();
    assert_eq!(current["status"], "approved");
}

#[tokio::test]
async fn test_reject_talk_notification() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Tough Crowd", "tough@example.com").await;
    let talk = create_talk(&server, speaker["id"].as_str().unwrap(), "Not This Year", false).await;
    let talk_id = talk["id"].as_str().unwrap();

    let response = server.post(&format!("/talks/{}/reject", talk_id)).await;
    response.assert_status_ok();
    let outcome: serde_json::Value = response.json();
    assert_eq!(outcome["talk"]["status"], "rejected");
    assert_eq!(outcome["notification"]["kind"], "danger");
    assert_eq!(outcome["notification"]["title"], "Talk rejected");
    assert_eq!(outcome["notification"]["body"], "The talk has been rejected.");
    assert_eq!(outcome["notification"]["duration_ms"], 3000);
}

#[tokio::test]
async fn test_review_nonexistent_talk() {
    let server = setup().await;

    let fake_id = Uuid::new_v4();
    let response = server.post(&format!("/talks/{}/approve", fake_id)).await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_talk_filters_agree_with_count() {
    let server = setup().await;

    let ada = create_speaker_with_avatar(
        &server,
        "Ada Árnadóttir",
        "ada@example.com",
        "avatars/ada.jpg",
    )
    .await;
    let bob = create_speaker(&server, "Bob Stone", "bob@example.com").await;
    let ada_id = ada["id"].as_str().unwrap();
    let bob_id = bob["id"].as_str().unwrap();

    create_talk(&server, ada_id, "Intro to Queues", true).await;
    create_talk(&server, ada_id, "Advanced Queues", false).await;
    create_talk(&server, bob_id, "Keynote Vision", true).await;

    let cases = vec![
        ("".to_string(), 3),
        ("?search=queues".to_string(), 2),
        ("?search=QUEUES".to_string(), 2),
        ("?search=arnadottir".to_string(), 2),
        ("?new_talk=true".to_string(), 2),
        ("?new_talk=false".to_string(), 1),
        (format!("?speakers={}", ada_id), 2),
        (format!("?speakers={},{}", ada_id, bob_id), 3),
        ("?has_avatar=true".to_string(), 2),
        ("?has_avatar=false".to_string(), 3),
        (format!("?search=queues&new_talk=true&speakers={}", ada_id), 1),
    ];

    for (query, expected) in cases {
        let response = server.get(&format!("/talks{}", query)).await;
        response.assert_status_ok();
        let talks: Vec<serde_json::Value> = response.json();
        assert_eq!(talks.len(), expected, "list for query {query:?}");

        let response = server.get(&format!("/talks/count{}", query)).await;
        response.assert_status_ok();
        let count: serde_json::Value = response.json();
        assert_eq!(
            count["count"].as_i64().unwrap(),
            expected as i64,
            "count for query {query:?}"
        );
    }

    // List rows carry the joined speaker columns
    let response = server.get("/talks?search=keynote").await;
    let talks: Vec<serde_json::Value> = response.json();
    assert_eq!(talks[0]["speaker_name"], "Bob Stone");
    assert!(talks[0]["speaker_avatar"].is_null());
}

#[tokio::test]
async fn test_talk_filter_rejects_malformed_speaker_id() {
    let server = setup().await;

    let response = server.get("/talks?speakers=not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Bad Request");

    let response = server.get("/talks/count?speakers=not-a-uuid").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_talk_sorting() {
    let server = setup().await;

    let zoe = create_speaker(&server, "Zoe Last", "zoe@example.com").await;
    let amy = create_speaker(&server, "Amy First", "amy@example.com").await;

    create_talk(&server, zoe["id"].as_str().unwrap(), "Banana Sharding", false).await;
    create_talk(&server, amy["id"].as_str().unwrap(), "Apple Indexing", false).await;
    create_talk(&server, amy["id"].as_str().unwrap(), "cherry Caching", false).await;

    // Case-insensitive title sort
    let response = server.get("/talks?sort=title").await;
    response.assert_status_ok();
    let talks: Vec<serde_json::Value> = response.json();
    let titles: Vec<&str> = talks.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Apple Indexing", "Banana Sharding", "cherry Caching"]);

    let response = server.get("/talks?sort=title&direction=desc").await;
    let talks: Vec<serde_json::Value> = response.json();
    let titles: Vec<&str> = talks.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["cherry Caching", "Banana Sharding", "Apple Indexing"]);

    // Sorting by the joined speaker name
    let response = server.get("/talks?sort=speaker_name").await;
    let talks: Vec<serde_json::Value> = response.json();
    assert_eq!(talks[0]["speaker_name"], "Amy First");
    assert_eq!(talks[2]["speaker_name"], "Zoe Last");
}

#[tokio::test]
async fn test_talk_pagination_covers_everything_once() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Page Turner", "page@example.com").await;
    let speaker_id = speaker["id"].as_str().unwrap();
    for i in 0..5 {
        create_talk(&server, speaker_id, &format!("Talk {i}"), false).await;
    }

    let mut seen = std::collections::HashSet::new();
    for offset in [0, 2, 4] {
        let response = server
            .get(&format!("/talks?limit=2&offset={}", offset))
            .await;
        response.assert_status_ok();
        let talks: Vec<serde_json::Value> = response.json();
        for talk in &talks {
            let id = talk["id"].as_str().unwrap().to_string();
            assert!(seen.insert(id), "pages must not overlap");
        }
    }
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn test_talk_export_reports_filtered_rows() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Export Er", "export@example.com").await;
    let speaker_id = speaker["id"].as_str().unwrap();
    create_talk(&server, speaker_id, "Fresh Ideas", true).await;
    create_talk(&server, speaker_id, "Old Ideas", false).await;

    let response = server.post("/talks/export?new_talk=true").await;
    response.assert_status_ok();
    let receipt: serde_json::Value = response.json();
    assert_eq!(receipt["rows"].as_i64().unwrap(), 1);

    let response = server.post("/talks/export").await;
    let receipt: serde_json::Value = response.json();
    assert_eq!(receipt["rows"].as_i64().unwrap(), 2);
}

#[tokio::test]
async fn test_talk_bulk_delete() {
    let server = setup().await;

    let speaker = create_speaker(&server, "Bulk Cleaner", "bulk@example.com").await;
    let speaker_id = speaker["id"].as_str().unwrap();
    let t1 = create_talk(&server, speaker_id, "one", false).await;
    let t2 = create_talk(&server, speaker_id, "two", false).await;
    let t3 = create_talk(&server, speaker_id, "three", false).await;

    let response = server
        .post("/talks/bulk-delete")
        .json(&json!({ "ids": [t1["id"], t3["id"], Uuid::new_v4()] }))
        .await;
    response.assert_status_ok();
    let result: serde_json::Value = response.json();
    assert_eq!(result["deleted"].as_u64().unwrap(), 2);

    let response = server.get("/talks").await;
    let talks: Vec<serde_json::Value> = response.json();
    assert_eq!(talks.len(), 1);
    assert_eq!(talks[0]["id"], t2["id"]);

    // Empty selection is a no-op
    let response = server
        .post("/talks/bulk-delete")
        .json(&json!({ "ids": [] }))
        .await;
    response.assert_status_ok();
    let result: serde_json::Value = response.json();
    assert_eq!(result["deleted"].as_u64().unwrap(), 0);
}

// ============================================================================
// Venue API Tests
// ============================================================================

#[tokio::test]
async fn test_venue_crud() {
    let server = setup().await;

    let create_body = json!({
        "name": "Oslo Spektrum",
        "city": "Oslo",
        "country": "Norway",
        "postal_code": "0187",
        "region": "eu"
    });

    let response = server.post("/venues").json(&create_body).await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    let venue_id = created["id"].as_str().expect("Created venue should have an id");
    assert_eq!(created["region"], "eu");

    let response = server
        .put(&format!("/venues/{}", venue_id))
        .json(&json!({ "city": "Bergen" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["city"], "Bergen");
    assert_eq!(updated["name"], "Oslo Spektrum");

    let response = server.get("/venues?search=spektrum").await;
    response.assert_status_ok();
    let venues: Vec<serde_json::Value> = response.json();
    assert_eq!(venues.len(), 1);

    let response = server.delete(&format!("/venues/{}", venue_id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/venues/{}", venue_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_venue_validation() {
    let server = setup().await;

    let response = server
        .post("/venues")
        .json(&json!({
            "name": "No City",
            "city": "",
            "country": "Norway",
            "postal_code": "0187"
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "city is required");
}

// ============================================================================
// Conference API Tests
// ============================================================================

#[tokio::test]
async fn test_conference_crud() {
    let server = setup().await;

    let response = server
        .post("/venues")
        .json(&json!({
            "name": "Rai",
            "city": "Amsterdam",
            "country": "Netherlands",
            "postal_code": "1078 GZ",
            "region": "eu"
        }))
        .await;
    let venue: serde_json::Value = response.json();
    let venue_id = venue["id"].as_str().unwrap();

    let create_body = json!({
        "name": "Laracon EU",
        "description": "The big one",
        "start_date": "2026-02-03",
        "end_date": "2026-02-04",
        "region": "eu",
        "venue_id": venue_id
    });

    let response = server.post("/conferences").json(&create_body).await;
    response.assert_status(StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    let conference_id = created["id"].as_str().expect("Created conference should have an id");
    assert_eq!(created["start_date"], "2026-02-03");
    assert_eq!(created["venue_id"], venue["id"]);

    // Update merges
    let response = server
        .put(&format!("/conferences/{}", conference_id))
        .json(&json!({ "name": "Laracon EU Amsterdam" }))
        .await;
    response.assert_status_ok();
    let updated: serde_json::Value = response.json();
    assert_eq!(updated["name"], "Laracon EU Amsterdam");
    assert_eq!(updated["end_date"], "2026-02-04");

    let response = server.delete(&format!("/conferences/{}", conference_id)).await;
    response.assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/conferences/{}", conference_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_conference_rejects_reversed_dates() {
    let server = setup().await;

    let response = server
        .post("/conferences")
        .json(&json!({
            "name": "Backwards Conf",
            "start_date": "2026-02-04",
            "end_date": "2026-02-03"
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "end_date must not be before start_date");
}

#[tokio::test]
async fn test_conference_rejects_unknown_venue() {
    let server = setup().await;

    let response = server
        .post("/conferences")
        .json(&json!({ "name": "Nowhere Conf", "venue_id": Uuid::new_v4() }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Venue not found");
}

#[tokio::test]
async fn test_deleting_venue_detaches_it_from_conferences() {
    let server = setup().await;

    let response = server
        .post("/venues")
        .json(&json!({
            "name": "Gone Soon",
            "city": "Lisbon",
            "country": "Portugal",
            "postal_code": "1000-001"
        }))
        .await;
    let venue: serde_json::Value = response.json();
    let venue_id = venue["id"].as_str().unwrap();

    let response = server
        .post("/conferences")
        .json(&json!({ "name": "Homeless Conf", "venue_id": venue_id }))
        .await;
    let conference: serde_json::Value = response.json();
    let conference_id = conference["id"].as_str().unwrap();

    server
        .delete(&format!("/venues/{}", venue_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // The conference lives on without a venue
    let response = server.get(&format!("/conferences/{}", conference_id)).await;
    response.assert_status_ok();
    let fetched: serde_json::Value = response.json();
    assert!(fetched["venue_id"].is_null());
}

#[tokio::test]
async fn test_conference_speaker_attachments() {
    let server = setup().await;

    let response = server
        .post("/conferences")
        .json(&json!({ "name": "Lineup Conf" }))
        .await;
    let conference: serde_json::Value = response.json();
    let conference_id = conference["id"].as_str().unwrap();

    let alice = create_speaker(&server, "Alice Lineup", "alice@example.com").await;
    let alice_id = alice["id"].as_str().unwrap();

    // Attach
    let response = server
        .post(&format!("/conferences/{}/speakers/{}", conference_id, alice_id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    // Attaching twice is a conflict
    let response = server
        .post(&format!("/conferences/{}/speakers/{}", conference_id, alice_id))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    // Unknown endpoints are 404s
    let response = server
        .post(&format!("/conferences/{}/speakers/{}", conference_id, Uuid::new_v4()))
        .await;
    response.assert_status_not_found();
    let response = server
        .post(&format!("/conferences/{}/speakers/{}", Uuid::new_v4(), alice_id))
        .await;
    response.assert_status_not_found();

    // The line-up lists the attached speaker
    let response = server
        .get(&format!("/conferences/{}/speakers", conference_id))
        .await;
    response.assert_status_ok();
    let lineup: Vec<serde_json::Value> = response.json();
    assert_eq!(lineup.len(), 1);
    assert_eq!(lineup[0]["id"], alice["id"]);

    // Detach, then detaching again fails
    let response = server
        .delete(&format!("/conferences/{}/speakers/{}", conference_id, alice_id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    let response = server
        .delete(&format!("/conferences/{}/speakers/{}", conference_id, alice_id))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_conference_talk_attachments() {
    let server = setup().await;

    let response = server
        .post("/conferences")
        .json(&json!({ "name": "Program Conf" }))
        .await;
    let conference: serde_json::Value = response.json();
    let conference_id = conference["id"].as_str().unwrap();

    let speaker = create_speaker(&server, "Prog Speaker", "prog@example.com").await;
    let talk = create_talk(&server, speaker["id"].as_str().unwrap(), "On Programs", false).await;
    let talk_id = talk["id"].as_str().unwrap();

    let response = server
        .post(&format!("/conferences/{}/talks/{}", conference_id, talk_id))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .post(&format!("/conferences/{}/talks/{}", conference_id, talk_id))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let response = server
        .get(&format!("/conferences/{}/talks", conference_id))
        .await;
    response.assert_status_ok();
    let program: Vec<serde_json::Value> = response.json();
    assert_eq!(program.len(), 1);
    assert_eq!(program[0]["id"], talk["id"]);

    // Deleting the conference keeps the talk and speaker
    server
        .delete(&format!("/conferences/{}", conference_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/talks/{}", talk_id))
        .await
        .assert_status_ok();
    server
        .get(&format!("/speakers/{}", speaker["id"].as_str().unwrap()))
        .await
        .assert_status_ok();
}

// ============================================================================
// Vocabulary Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_vocabularies() {
    let server = setup().await;

    let response = server.get("/meta/vocabularies").await;
    response.assert_status_ok();
    let vocab: serde_json::Value = response.json();

    let statuses = vocab["statuses"].as_array().unwrap();
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses[0]["value"], "submitted");
    assert_eq!(statuses[0]["color"], "primary");
    assert_eq!(statuses[0]["icon"], "heroicon-o-clock");
    assert_eq!(statuses[1]["value"], "approved");
    assert_eq!(statuses[1]["color"], "success");
    assert_eq!(statuses[1]["icon"], "heroicon-o-check-circle");
    assert_eq!(statuses[2]["value"], "rejected");
    assert_eq!(statuses[2]["color"], "danger");
    assert_eq!(statuses[2]["icon"], "heroicon-o-no-symbol");

    let lengths = vocab["lengths"].as_array().unwrap();
    assert_eq!(lengths.len(), 3);
    assert_eq!(lengths[0]["value"], "normal");
    assert_eq!(lengths[0]["icon"], "heroicon-o-megaphone");
    assert_eq!(lengths[1]["value"], "lightning");
    assert_eq!(lengths[1]["icon"], "heroicon-o-flash");
    assert_eq!(lengths[2]["value"], "keynote");
    assert_eq!(lengths[2]["icon"], "heroicon-o-star");

    let regions = vocab["regions"].as_array().unwrap();
    let region_values: Vec<&str> = regions.iter().map(|r| r["value"].as_str().unwrap()).collect();
    assert_eq!(region_values, vec!["us", "eu", "online"]);
    assert_eq!(regions[2]["label"], "Online");

    let qualifications = vocab["qualifications"].as_array().unwrap();
    assert_eq!(qualifications.len(), 10);
    assert!(qualifications
        .iter()
        .any(|q| q["value"] == "business-leader" && q["label"] == "Business Leader"));
    assert!(qualifications
        .iter()
        .any(|q| q["value"] == "open-source"
            && q["label"] == "Open Source Creator / Maintainer"));

    assert_eq!(vocab["limits"]["avatar_max_bytes"].as_u64().unwrap(), 2 * 1024 * 1024);
}

// ============================================================================
// Edge Cases and Error Handling
// ============================================================================

#[tokio::test]
async fn test_get_nonexistent_resources() {
    let server = setup().await;

    let fake_id = Uuid::new_v4();
    server
        .get(&format!("/speakers/{}", fake_id))
        .await
        .assert_status_not_found();
    server
        .get(&format!("/talks/{}", fake_id))
        .await
        .assert_status_not_found();
    server
        .get(&format!("/venues/{}", fake_id))
        .await
        .assert_status_not_found();
    server
        .get(&format!("/conferences/{}", fake_id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_nonexistent_talk() {
    let server = setup().await;

    let fake_id = Uuid::new_v4();
    let response = server.delete(&format!("/talks/{}", fake_id)).await;
    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Talk not found");
}

// ============================================================================
// Authentication Tests
// ============================================================================

const TEST_TOKEN: &str = "test-token-0123456789abcdef0123456789abcdef";

#[tokio::test]
#[serial]
async fn test_auth_accepts_configured_token_only() {
    let pool = common::create_test_pool().await;
    let server = TestServer::new(common::create_auth_test_app(pool)).unwrap();

    std::env::set_var("API_TOKENS", TEST_TOKEN);

    // No header
    let response = server.get("/speakers").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Wrong scheme
    let response = server
        .get("/speakers")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Basic abc"),
        )
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Too short to be a token at all
    let response = server.get("/speakers").authorization_bearer("short").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // Well-formed but unknown
    let response = server
        .get("/speakers")
        .authorization_bearer("wrong-token-0123456789abcdef0123456789abcd")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Invalid or expired token.");

    // The configured token gets through
    let response = server
        .get("/speakers")
        .authorization_bearer(TEST_TOKEN)
        .await;
    response.assert_status_ok();

    std::env::remove_var("API_TOKENS");
}

#[tokio::test]
#[serial]
async fn test_auth_misconfiguration_is_a_server_error() {
    let pool = common::create_test_pool().await;
    let server = TestServer::new(common::create_auth_test_app(pool)).unwrap();

    std::env::remove_var("API_TOKENS");

    let response = server
        .get("/speakers")
        .authorization_bearer(TEST_TOKEN)
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
