use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_reminders() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;

    let note = helper::create_note(&mut app, &access_token, "Dentist").await;

    // moment is required
    let (status_code, _, error) =
        helper::maybe_create_reminder(&mut app, &access_token, &note.id, json!({ "name": "Call" }))
            .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("`remindAt` is required".to_string()), error);

    // unknown note
    let payload = json!({ "name": "Call", "remindAt": "2026-01-05T09:00:00+01:00" });
    let (status_code, _, error) = helper::maybe_create_reminder(
        &mut app,
        &access_token,
        "0123456789abcdef01234567",
        payload.clone(),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Unknown Note".to_string()), error);

    let (status_code, reminder, _) =
        helper::maybe_create_reminder(&mut app, &access_token, &note.id, payload).await;
    assert_eq!(StatusCode::CREATED, status_code);
    let reminder = reminder.unwrap();
    assert_eq!("Call", reminder.name);
    assert!(reminder.is_active);
    assert_eq!("never", reminder.repeat);

    // invalid repeat
    let payload = json!({ "remindAt": "2026-01-05T09:00:00Z", "repeat": "hourly" });
    let (status_code, _, error) =
        helper::maybe_create_reminder(&mut app, &access_token, &note.id, payload).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Data error".to_string()), error);

    // update
    let payload = json!({ "name": "", "isActive": false, "repeat": "monthly" });
    let (status_code, modified, _) =
        helper::maybe_update_reminder(&mut app, &access_token, &reminder.id, payload).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(1), modified);

    let (status_code, single) = helper::single_reminder(&mut app, &reminder.id).await;
    assert_eq!(StatusCode::OK, status_code);
    let single = single.unwrap();
    assert_eq!("Call", single.name);
    assert!(!single.is_active);
    assert_eq!("monthly", single.repeat);

    let (status_code, reminders, _) = helper::list_reminders(&mut app, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(1, reminders.unwrap().len());

    // deleting the note takes the reminders along
    let (status_code, _) =
        helper::maybe_delete(&mut app, &access_token, &format!("/api/v1/notes/{}", note.id)).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, _) = helper::single_reminder(&mut app, &reminder.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (status_code, _, error) = helper::list_reminders(&mut app, &note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);
}

#[tokio::test]
async fn test_delete_reminder() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;

    let note = helper::create_note(&mut app, &access_token, "Dentist").await;
    let payload = json!({ "remindAt": "2026-01-05T09:00:00Z", "repeat": "yearly" });
    let (_, reminder, _) =
        helper::maybe_create_reminder(&mut app, &access_token, &note.id, payload).await;
    let reminder = reminder.unwrap();

    let uri = format!("/api/v1/reminders/{}", reminder.id);

    let (status_code, _) = helper::maybe_delete(&mut app, &access_token, &uri).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, error) = helper::maybe_delete(&mut app, &access_token, &uri).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Reminder not found".to_string()), error);

    let (status_code, reminders, _) = helper::list_reminders(&mut app, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(reminders.unwrap().is_empty());
}
