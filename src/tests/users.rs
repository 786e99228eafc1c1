use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_register() {
    let mut app = helper::setup_test_app().await;

    let (status_code, user, error) =
        helper::maybe_register(&mut app, " Ada@Example.com ", helper::PASSWORD).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert!(error.is_none());
    let user = user.unwrap();
    assert_eq!("ada@example.com", user.email);
    assert_eq!(24, user.id.len());

    // duplicate, regardless of case
    let (status_code, user, error) =
        helper::maybe_register(&mut app, "ADA@example.com", "otherpassword").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert!(user.is_none());
    assert_eq!(Some("User already exists".to_string()), error);

    // invalid email
    let (status_code, _, error) = helper::maybe_register(&mut app, "ada", helper::PASSWORD).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Invalid email address".to_string()), error);

    // missing password
    let (status_code, _, error) = helper::maybe_register(&mut app, "bob@example.com", "").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(Some("Password is required".to_string()), error);
}

#[tokio::test]
async fn test_current_user() {
    let mut app = helper::setup_test_app().await;

    let access_token = helper::login(&mut app).await;

    let (status_code, user) = helper::current_user(&mut app, &access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(helper::EMAIL, user.unwrap().email);

    // garbage token
    let (status_code, user) = helper::current_user(&mut app, "Bearer nonsense").await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert!(user.is_none());
}

#[tokio::test]
async fn test_unknown_route() {
    let mut app = helper::setup_test_app().await;

    let (status_code, body) = helper::get_raw(&mut app, "/api/v1/nothing-here").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(body["data"].is_null());
    assert_eq!("Route not found", body["error"]);

    let (status_code, body) = helper::get_raw(&mut app, "/api/v1/health").await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(body["data"].is_null());
    assert_eq!("", body["error"]);
}
