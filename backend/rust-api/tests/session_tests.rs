mod common;

use axum::body::to_bytes;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Starts a sequence_musical session (TEA routing) and returns
/// (session_id, first_trial).
async fn start_musical_session(app: &axum::Router) -> (String, Value) {
    let (status, json) = post_json(
        app,
        "/api/v1/assessments/route",
        json!({
            "student": {
                "id": "student-1",
                "adaptation_details": { "diagnosis": ["TEA"] }
            },
            "assessment": { "id": "assessment-1" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        json["session_id"].as_str().unwrap().to_string(),
        json["trial"].clone(),
    )
}

/// The melody is in the trial prompt (the client replays it), so a test
/// can answer correctly by echoing it back.
fn correct_answer(trial: &Value) -> String {
    trial["prompt"]["melody"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::test]
async fn five_correct_and_five_wrong_yield_grade_five() {
    let app = common::create_test_app().await;
    let (session_id, mut trial) = start_musical_session(&app).await;
    let uri = format!("/api/v1/sessions/{session_id}/answers");

    let mut last = Value::Null;
    for i in 0..10 {
        let answer = if i < 5 {
            correct_answer(&trial)
        } else {
            "resposta errada".to_string()
        };
        let (status, json) = post_json(&app, &uri, json!({ "answer": answer })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["correct"], i < 5);
        assert_eq!(json["question_index"], i + 1);
        if let Some(next) = json.get("next_trial").filter(|v| !v.is_null()) {
            trial = next.clone();
        }
        last = json;
    }

    assert_eq!(last["finished"], true);
    let submission = &last["submission"];
    assert_eq!(submission["score"], 5);
    assert_eq!(submission["total_questions"], 10);
    assert_eq!(submission["answer_log"].as_array().unwrap().len(), 10);
    assert_eq!(submission["grade"], 5.0);
    assert_eq!(submission["grade_display"], "5,0");
    for entry in submission["answer_log"].as_array().unwrap() {
        assert!(entry["duration_seconds"].as_i64().unwrap() >= 1);
        assert_eq!(entry["adaptation_type"], "tea");
    }

    // the finished session rejects further answers
    let (status, _) = post_json(&app, &uri, json!({ "answer": "x" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn memory_game_runs_to_completion_via_the_board() {
    let app = common::create_test_app().await;
    let (status, json) = post_json(
        &app,
        "/api/v1/assessments/route",
        json!({
            "student": {
                "id": "student-2",
                "adaptation_details": { "diagnosis": ["Down"] }
            },
            "assessment": { "id": "assessment-2" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["game_type"], "memory");

    let session_id = json["session_id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/sessions/{session_id}/answers");
    let mut trial = json["trial"].clone();

    // answer each trial by finding the revealed card's pair on the board
    let mut finished = false;
    for _ in 0..8 {
        let cards = trial["prompt"]["cards"].as_array().unwrap().clone();
        let revealed = trial["prompt"]["revealed_index"].as_u64().unwrap() as usize;
        let matching = cards
            .iter()
            .enumerate()
            .position(|(i, c)| i != revealed && c == &cards[revealed])
            .unwrap();

        let (status, json) = post_json(&app, &uri, json!({ "answer": matching.to_string() })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["correct"], true);
        finished = json["finished"].as_bool().unwrap();
        if let Some(next) = json.get("next_trial").filter(|v| !v.is_null()) {
            trial = next.clone();
        }
        if finished {
            assert_eq!(json["submission"]["score"], 8);
            assert_eq!(json["submission"]["total_questions"], 8);
            assert_eq!(json["submission"]["grade_display"], "10,0");
        }
    }
    assert!(finished);
}

#[tokio::test]
async fn explicit_finish_emits_a_partial_submission() {
    let app = common::create_test_app().await;
    let (session_id, trial) = start_musical_session(&app).await;
    let answers_uri = format!("/api/v1/sessions/{session_id}/answers");

    let (status, first) =
        post_json(&app, &answers_uri, json!({ "answer": correct_answer(&trial) })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["correct"], true);
    let (status, _) = post_json(&app, &answers_uri, json!({ "answer": "errada" })).await;
    assert_eq!(status, StatusCode::OK);

    let finish_uri = format!("/api/v1/sessions/{session_id}/finish");
    let (status, record) = post_json(&app, &finish_uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["score"], 1);
    // denominator is the answered count, not the planned ten
    assert_eq!(record["total_questions"], 2);
    assert_eq!(record["grade_display"], "5,0");
    assert_eq!(record["student_id"], "student-1");
    assert_eq!(record["game_type"], "sequence_musical");

    // finishing again returns the same record, answer attempts conflict
    let (status, again) = post_json(&app, &finish_uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, record);
    let (status, _) = post_json(&app, &answers_uri, json!({ "answer": "x" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn current_trial_endpoint_matches_the_session() {
    let app = common::create_test_app().await;
    let (session_id, trial) = start_musical_session(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/sessions/{session_id}/trial"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let current: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(current["question_id"], trial["question_id"]);
    assert!(current.get("expected").is_none());
}

#[tokio::test]
async fn unknown_session_is_a_plain_404() {
    let app = common::create_test_app().await;
    let uri = format!("/api/v1/sessions/{}/answers", uuid::Uuid::new_v4());
    let (status, _) = post_json(&app, &uri, json!({ "answer": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_answer_is_rejected() {
    let app = common::create_test_app().await;
    let (session_id, _) = start_musical_session(&app).await;
    let uri = format!("/api/v1/sessions/{session_id}/answers");
    let (status, _) = post_json(&app, &uri, json!({ "answer": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
