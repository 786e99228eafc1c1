use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_invalid_json() {
    let mut app = helper::setup_test_app().await;

    let login = "/api/v1/users/login";

    // credentials missing
    let (status_code, error) = helper::maybe_send_raw_body(&mut app, login, None, r"{}", true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("Data error", error.error);
    assert_eq!(
        Some("missing field `email` at line 1 column 2".to_string()),
        error.description
    );

    // unterminated string
    let (status_code, error) =
        helper::maybe_send_raw_body(&mut app, login, None, r#"{"}"#, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("JSON syntax error", error.error);
    assert_eq!(
        Some("EOF while parsing a string at line 1 column 3".to_string()),
        error.description
    );

    // missing content type
    let (status_code, error) = helper::maybe_send_raw_body(&mut app, login, None, r"{}", false).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Missing `application/json` content type", error.unwrap().error);
}

#[tokio::test]
async fn test_invalid_note_and_reminder_json() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;
    let note = helper::create_note(&mut app, &access_token, "Dentist").await;

    // order must be a number
    let body = r#"{"name":"Report","order":"first"}"#;
    let (status_code, error) =
        helper::maybe_send_raw_body(&mut app, "/api/v1/notes", Some(&access_token), body, true)
            .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("Data error", error.error);
    assert!(error.description.unwrap().starts_with("order: invalid type: string"));

    // syntax error in an unknown field names the path
    let body = r#"{"extra":{"first":}}"#;
    let (status_code, error) =
        helper::maybe_send_raw_body(&mut app, "/api/v1/notes", Some(&access_token), body, true)
            .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    let error = error.unwrap();
    assert_eq!("JSON syntax error", error.error);
    assert_eq!(
        Some("extra: expected value at line 1 column 19".to_string()),
        error.description
    );

    // moment without offset
    let uri = format!("/api/v1/notes/{}/reminders", note.id);
    let body = r#"{"remindAt":"2026-01-05 09:00"}"#;
    let (status_code, error) =
        helper::maybe_send_raw_body(&mut app, &uri, Some(&access_token), body, true).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Data error", error.unwrap().error);

    // nothing was created
    let (_, notes, _) = helper::list_notes(&mut app, "/api/v1/notes").await;
    assert_eq!(1, notes.unwrap().len());

    let (_, reminders, _) = helper::list_reminders(&mut app, &note.id).await;
    assert!(reminders.unwrap().is_empty());
}
