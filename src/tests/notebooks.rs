use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_notebooks() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;

    let (status_code, _, error) = helper::maybe_create_notebook(&mut app, &access_token, "").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Name is required".to_string()), error);

    let notebook = helper::create_notebook(&mut app, &access_token, "Work").await;
    assert_eq!("Work", notebook.name);
    assert!(notebook.is_active);

    // `isActive` is applied even when false
    let (status_code, modified, _) = helper::maybe_update_notebook(
        &mut app,
        &access_token,
        &notebook.id,
        json!({ "name": "", "isActive": false }),
    )
    .await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(1), modified);

    let (status_code, single) = helper::single_notebook(&mut app, &notebook.id).await;
    assert_eq!(StatusCode::OK, status_code);
    let single = single.unwrap();
    assert_eq!("Work", single.name);
    assert!(!single.is_active);

    let (status_code, body) = helper::get_raw(&mut app, "/api/v1/notebooks").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(1, body["data"].as_array().unwrap().len());

    let (status_code, _) = helper::single_notebook(&mut app, "0123456789abcdef01234567").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_delete_notebook_keeps_notes() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;

    let work = helper::create_notebook(&mut app, &access_token, "Work").await;

    let payload = json!({ "name": "Report", "notebookId": work.id });
    let (status_code, note, _) = helper::maybe_create_note(&mut app, &access_token, payload).await;
    assert_eq!(StatusCode::CREATED, status_code);
    let note = note.unwrap();
    assert_eq!(Some(work.id.clone()), note.notebook_id);

    let (status_code, notes, _) =
        helper::list_notes(&mut app, &format!("/api/v1/notebooks/{}/notes", work.id)).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(vec![note.id.clone()], notes.unwrap().into_iter().map(|note| note.id).collect::<Vec<_>>());

    let (status_code, _) =
        helper::maybe_delete(&mut app, &access_token, &format!("/api/v1/notebooks/{}", work.id))
            .await;
    assert_eq!(StatusCode::OK, status_code);

    // the note stays, without notebook
    let (status_code, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(None, single.unwrap().notebook_id);

    let (status_code, _) = helper::single_notebook(&mut app, &work.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (status_code, _, error) =
        helper::list_notes(&mut app, &format!("/api/v1/notebooks/{}/notes", work.id)).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Unknown Notebook".to_string()), error);
}

#[tokio::test]
async fn test_reassign_notebook() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;

    let work = helper::create_notebook(&mut app, &access_token, "Work").await;
    let home = helper::create_notebook(&mut app, &access_token, "Home").await;
    let note = helper::create_note(&mut app, &access_token, "Report").await;

    let (status_code, modified, _) =
        helper::maybe_reassign_notebook(&mut app, &access_token, &note.id, Some(&work.id)).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(1), modified);

    // unknown notebook, note unchanged
    let (status_code, _, error) = helper::maybe_reassign_notebook(
        &mut app,
        &access_token,
        &note.id,
        Some("0123456789abcdef01234567"),
    )
    .await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Unknown Notebook".to_string()), error);

    let (_, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(Some(work.id.clone()), single.unwrap().notebook_id);

    // move to another notebook
    helper::maybe_reassign_notebook(&mut app, &access_token, &note.id, Some(&home.id)).await;

    let (_, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(Some(home.id.clone()), single.unwrap().notebook_id);

    // unlink
    let (status_code, _, _) =
        helper::maybe_reassign_notebook(&mut app, &access_token, &note.id, None).await;
    assert_eq!(StatusCode::OK, status_code);

    let (_, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(None, single.unwrap().notebook_id);
}
