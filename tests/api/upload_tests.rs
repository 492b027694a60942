//! Multipart task attachments, profile images and the image upload route.

use super::helpers::{Part, TestApp, app, json_request, multipart_request, str_field};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};
use taskdeck::upload::stored_name;

const NO_FILE: &str = "No file uploaded or invalid file format";

#[rstest]
#[tokio::test]
async fn multipart_create_appends_uploads_after_links(app: TestApp) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    let request = multipart_request(
        Method::POST,
        "/api/tasks",
        Some(&token),
        &[
            Part::Text("title", "Collect receipts"),
            Part::Text("dueDate", "2030-02-01"),
            Part::Text("checklist", r#"[{"title":"Scan","completed":true},{"title":"File"}]"#),
            Part::Text("attachments", "https://docs.example/policy"),
            Part::File("attachments", "receipt.txt", b"lunch 12.50"),
        ],
    )
    .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::CREATED);
    let task = body.get("task").expect("task");
    let uploaded = format!("/uploads/{}", stored_name("receipt.txt", b"lunch 12.50"));
    assert_eq!(
        task.get("attachments"),
        Some(&json!(["https://docs.example/policy", uploaded]))
    );
    assert_eq!(task.get("progress"), Some(&json!(50)));

    let (file_status, contents) = app
        .send_raw(json_request(Method::GET, &uploaded, None, None).expect("request"))
        .await
        .expect("response");
    assert_eq!(file_status, StatusCode::OK);
    assert_eq!(contents.as_ref(), b"lunch 12.50");
}

#[rstest]
#[tokio::test]
async fn multipart_update_with_only_files_replaces_attachments(app: TestApp) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    let task = app
        .create_task(
            &token,
            &json!({ "title": "Scan", "dueDate": "2030-01-01", "attachments": ["https://old.example"] }),
        )
        .await
        .expect("create");
    let uri = format!("/api/tasks/{}", str_field(&task, "id").expect("id"));
    let request = multipart_request(
        Method::PUT,
        &uri,
        Some(&token),
        &[Part::File("attachments", "scan.pdf", b"%PDF-1.7")],
    )
    .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::OK);
    let expected = format!("/uploads/{}", stored_name("scan.pdf", b"%PDF-1.7"));
    assert_eq!(body.pointer("/task/attachments"), Some(&json!([expected])));
    assert_eq!(body.pointer("/task/title"), Some(&json!("Scan")));
}

#[rstest]
#[tokio::test]
async fn register_with_profile_image_stores_it(app: TestApp) {
    let request = multipart_request(
        Method::POST,
        "/api/auth/register",
        None,
        &[
            Part::Text("name", "Ada"),
            Part::Text("email", "ada@example.com"),
            Part::Text("password", "hunter22"),
            Part::File("profileImage", "ada.png", b"\x89PNG fake"),
        ],
    )
    .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::CREATED);
    let expected = format!(
        "http://localhost:5000/uploads/{}",
        stored_name("ada.png", b"\x89PNG fake")
    );
    assert_eq!(
        body.pointer("/user/profileImageUrl").and_then(Value::as_str),
        Some(expected.as_str())
    );
    assert!(app.upload_root().join(stored_name("ada.png", b"\x89PNG fake")).exists());
}

#[rstest]
#[case("evil.html", b"<script>alert(1)</script>".as_slice())]
#[case("avatar.svg", b"<svg/>".as_slice())]
#[case("empty.png", b"".as_slice())]
#[tokio::test]
async fn register_rejects_non_image_profile_files(
    app: TestApp,
    #[case] file_name: &str,
    #[case] contents: &[u8],
) {
    let request = multipart_request(
        Method::POST,
        "/api/auth/register",
        None,
        &[
            Part::Text("name", "Mallory"),
            Part::Text("email", "mallory@example.com"),
            Part::Text("password", "hunter22"),
            Part::File("profileImage", file_name, contents),
        ],
    )
    .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(str_field(&body, "message"), Some(NO_FILE));
    assert_eq!(app.stored_file_count().expect("listing"), 0);
    app.register("Mallory", "mallory@example.com")
        .await
        .expect("the address was never taken");
}

#[rstest]
#[tokio::test]
async fn rejected_registration_keeps_its_image_off_disk(app: TestApp) {
    app.register("Ada", "ada@example.com").await.expect("registration");
    let request = multipart_request(
        Method::POST,
        "/api/auth/register",
        None,
        &[
            Part::Text("name", "Imposter"),
            Part::Text("email", "ada@example.com"),
            Part::Text("password", "hunter22"),
            Part::File("profileImage", "ada.png", b"\x89PNG fake"),
        ],
    )
    .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(str_field(&body, "message"), Some("User already exists"));
    assert_eq!(app.stored_file_count().expect("listing"), 0);
}

#[rstest]
#[case::missing_due_date(&[Part::Text("title", "No deadline")], "Due date is required")]
#[case::blank_title(&[Part::Text("title", "  "), Part::Text("dueDate", "2030-01-01")], "")]
#[case::unknown_priority(
    &[
        Part::Text("title", "Odd"),
        Part::Text("dueDate", "2030-01-01"),
        Part::Text("priority", "Urgent"),
    ],
    ""
)]
#[tokio::test]
async fn rejected_create_keeps_attachments_off_disk(
    app: TestApp,
    #[case] fields: &[Part<'static>],
    #[case] message: &str,
) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    let mut parts: Vec<Part<'_>> = fields.to_vec();
    parts.push(Part::File("attachments", "receipt.txt", b"lunch 12.50"));
    let request =
        multipart_request(Method::POST, "/api/tasks", Some(&token), &parts).expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    if !message.is_empty() {
        assert_eq!(str_field(&body, "message"), Some(message));
    }
    assert_eq!(app.stored_file_count().expect("listing"), 0);
}

#[rstest]
#[tokio::test]
async fn forbidden_update_keeps_attachments_off_disk(app: TestApp) {
    let owner = app.register("Ada", "ada@example.com").await.expect("registration");
    let intruder = app.register("Eve", "eve@example.com").await.expect("registration");
    let task = app
        .create_task(&owner, &json!({ "title": "Private", "dueDate": "2030-01-01" }))
        .await
        .expect("create");
    let uri = format!("/api/tasks/{}", str_field(&task, "id").expect("id"));
    let request = multipart_request(
        Method::PUT,
        &uri,
        Some(&intruder),
        &[Part::File("attachments", "junk.bin", b"filler bytes")],
    )
    .expect("request");

    let (status, _) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.stored_file_count().expect("listing"), 0);
}

#[rstest]
#[tokio::test]
async fn image_upload_returns_paths_and_url(app: TestApp) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    let request = multipart_request(
        Method::POST,
        "/api/uploads/upload-image",
        Some(&token),
        &[Part::File("image", "Photo.JPG", b"jpeg bytes")],
    )
    .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(str_field(&body, "message"), Some("File uploaded successfully"));
    let filename = stored_name("Photo.JPG", b"jpeg bytes");
    assert_eq!(
        body.get("data"),
        Some(&json!({
            "filePath": format!("/uploads/{filename}"),
            "filename": filename,
            "url": format!("http://localhost:5000/uploads/{filename}"),
        }))
    );
}

#[rstest]
#[case(&[Part::File("image", "anim.gif", b"GIF89a")])]
#[case(&[Part::Text("image", "not a file")])]
#[case(&[Part::File("photo", "me.png", b"png")])]
#[tokio::test]
async fn image_upload_rejects_missing_or_unsupported_files(
    app: TestApp,
    #[case] parts: &[Part<'static>],
) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");
    let request = multipart_request(Method::POST, "/api/uploads/upload-image", Some(&token), parts)
        .expect("request");

    let (status, body) = app.send(request).await.expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(str_field(&body, "message"), Some(NO_FILE));
}

#[rstest]
#[tokio::test]
async fn image_upload_requires_multipart(app: TestApp) {
    let token = app.register("Ada", "ada@example.com").await.expect("registration");

    let (status, body) = app
        .send(
            json_request(
                Method::POST,
                "/api/uploads/upload-image",
                Some(&token),
                Some(&json!({ "image": "x" })),
            )
            .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(str_field(&body, "message"), Some(NO_FILE));
}
