//! End-to-end API tests over the in-memory store

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};

use common::{spawn_app, titles};

#[tokio::test]
async fn health_check() {
    let app = spawn_app().await;

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.request(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn sign_in_with_bad_password_is_unauthorized() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/signin",
            None,
            Some(json!({ "username": "admin", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Bad credentials");

    let (status, unknown) = app
        .request(
            Method::POST,
            "/auth/signin",
            None,
            Some(json!({ "username": "nobody", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, body);
}

#[tokio::test]
async fn reads_require_a_token() {
    let app = spawn_app().await;

    let (status, _) = app.request(Method::GET, "/author", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/author", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bare_token_without_bearer_prefix_is_accepted() {
    let app = spawn_app().await;
    let token = app.user_token().await;

    let request = Request::builder()
        .uri("/resources/genre")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[1], json!({ "id": 2, "name": "novel" }));
}

#[tokio::test]
async fn authors_are_listed_in_id_order() {
    let app = spawn_app().await;
    let token = app.user_token().await;

    let (status, body) = app.get("/author", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "name": "Stephen", "surname": "King" },
            { "id": 2, "name": "Nicolas", "surname": "Sparks" },
            { "id": 3, "name": "Dan", "surname": "Brown" },
            { "id": 4, "name": "Lewis", "surname": null },
        ])
    );

    let (status, body) = app.get("/author/count", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(4));
}

#[tokio::test]
async fn authors_page_sorted_by_id_descending() {
    let app = spawn_app().await;
    let token = app.user_token().await;

    let (status, body) = app.get("/author?page=0&size=1&sort=id,desc", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 4, "name": "Lewis", "surname": null }]));
}

#[tokio::test]
async fn unknown_sort_property_is_bad_request() {
    let app = spawn_app().await;
    let token = app.user_token().await;

    let (status, body) = app.get("/book?sort=password", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn book_is_returned_with_its_author_and_genre() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let id = app.create_book(&admin, "It", &[1], &[2]).await;

    let (status, body) = app.get(&format!("/book/{}", id), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "It");
    assert_eq!(body["listOfGenres"], json!([{ "id": 2, "name": "novel" }]));
    assert_eq!(
        body["listOfAuthors"],
        json!([{ "id": 1, "name": "Stephen", "surname": "King" }])
    );
    assert!(body["creationDate"].is_string());
}

#[tokio::test]
async fn only_admins_may_create() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let user = app.user_token().await;
    let book = json!({ "title": "Carrie", "listOfAuthors": [{ "id": 1 }] });

    let (status, _) = app
        .request(Method::POST, "/book", Some(&admin), Some(book.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request(Method::POST, "/book", Some(&user), Some(book)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = app
        .request(Method::DELETE, "/author/4", Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_ignores_supplied_id() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let first = app.create_book(&admin, "It", &[1], &[]).await;

    let (status, body) = app
        .request(
            Method::POST,
            "/book",
            Some(&admin),
            Some(json!({ "id": first, "title": "Misery" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["id"].as_i64().unwrap(), first);

    let (_, original) = app.get(&format!("/book/{}", first), &admin).await;
    assert_eq!(original["title"], "It");
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    for payload in [json!(null), json!({ "title": "" }), json!({ "description": "untitled" })] {
        let (status, _) = app
            .request(Method::POST, "/book", Some(&admin), Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app
        .request(
            Method::POST,
            "/book",
            Some(&admin),
            Some(json!({ "title": "Ghost", "listOfAuthors": [{ "id": 99 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn values_wider_than_their_columns_are_bad_requests() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/book",
            Some(&admin),
            Some(json!({ "title": "t".repeat(256) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, _) = app
        .request(
            Method::POST,
            "/author",
            Some(&admin),
            Some(json!({ "name": "Dan", "surname": "b".repeat(256) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/book/count", &admin).await;
    assert_eq!(body, json!(0));

    let (status, _) = app
        .request(
            Method::POST,
            "/book",
            Some(&admin),
            Some(json!({ "title": "t".repeat(255) })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn title_search_is_case_insensitive() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_book(&admin, "It", &[1], &[2]).await;
    app.create_book(&admin, "The Notebook", &[2], &[4]).await;

    let (status, body) = app.get("/book?title=it", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["It"]);

    let (_, body) = app.get("/book?title=", &admin).await;
    assert_eq!(titles(&body), ["It", "The Notebook"]);
}

#[tokio::test]
async fn search_ands_categories_and_ors_ids() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_book(&admin, "It", &[1], &[2]).await;
    app.create_book(&admin, "The Shining", &[1], &[1]).await;
    app.create_book(&admin, "The Notebook", &[2], &[2, 4]).await;
    app.create_book(&admin, "Inferno", &[3], &[3]).await;

    let (_, body) = app.get("/book?authorIds=1&genreIds=2", &admin).await;
    assert_eq!(titles(&body), ["It"]);

    let (_, body) = app.get("/book?authorIds=1&authorIds=3", &admin).await;
    assert_eq!(titles(&body), ["It", "The Shining", "Inferno"]);

    let (_, body) = app.get("/book?genreIds=2,4", &admin).await;
    assert_eq!(titles(&body), ["It", "The Notebook"]);

    let (status, body) = app.get("/book/count?genreIds=2,4", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(2));

    let (status, _) = app.get("/book?authorIds=one", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_item_page_and_full_count() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    for title in ["It", "Carrie", "Misery"] {
        app.create_book(&admin, title, &[1], &[]).await;
    }

    let (_, body) = app.get("/book?page=0&size=1", &admin).await;
    assert_eq!(titles(&body), ["It"]);

    let (_, body) = app.get("/book?page=1&size=1&sort=title,desc", &admin).await;
    assert_eq!(titles(&body), ["It"]);

    let (_, body) = app.get("/book/count", &admin).await;
    assert_eq!(body, json!(3));
}

#[tokio::test]
async fn update_replaces_relationships_and_keeps_creation_date() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let id = app.create_book(&admin, "It", &[1, 2], &[2]).await;
    let (_, before) = app.get(&format!("/book/{}", id), &admin).await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/book/{}", id),
            Some(&admin),
            Some(json!({
                "title": "It",
                "price": 12.5,
                "creationDate": "1999-01-01T00:00:00Z",
                "listOfAuthors": [{ "id": 1 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64(), Some(id));
    assert_eq!(body["price"], json!(12.5));
    assert_eq!(body["creationDate"], before["creationDate"]);
    assert_eq!(body["listOfAuthors"].as_array().unwrap().len(), 1);
    assert_eq!(body["listOfGenres"], json!([]));
}

#[tokio::test]
async fn update_of_missing_book_is_not_found() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .request(Method::PUT, "/book/77", Some(&admin), Some(json!({ "title": "x" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_book_then_it_is_gone() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let id = app.create_book(&admin, "It", &[1], &[2]).await;

    let (status, body) = app
        .request(Method::DELETE, "/book/999", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book with id 999 does not exist");

    let (status, _) = app
        .request(Method::DELETE, &format!("/book/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/book/{}", id), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_lifecycle() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .request(
            Method::POST,
            "/author",
            Some(&admin),
            Some(json!({ "id": 1, "name": "Terry", "surname": "Pratchett" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(id, 5);

    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/author/{}", id),
            Some(&admin),
            Some(json!({ "name": "Terence" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({ "id": 5, "name": "Terence", "surname": null }));

    let (status, _) = app
        .request(Method::DELETE, &format!("/author/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/author/{}", id), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn referenced_author_cannot_be_deleted() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_book(&admin, "It", &[1], &[]).await;

    let (status, _) = app.request(Method::DELETE, "/author/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body): (StatusCode, Value) = app.get("/author/count", &admin).await;
    assert_eq!(body, json!(4));
}
