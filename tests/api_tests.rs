//! API integration tests
//!
//! These run against a live server (`cargo run`) whose config enables the
//! bootstrap admin from config/default.toml.

use chrono::{Duration, Utc};
use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

const ADMIN_EMAIL: &str = "admin@bookworm.local";
const ADMIN_PASSWORD: &str = "change-me";

/// Log in as the bootstrap admin
async fn admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .json(&json!({
            "email": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Register a fresh user and log them in, returning (token, user id)
async fn register_and_login(client: &Client) -> (String, String) {
    let email = format!("reader-{}@bookworm.test", Uuid::new_v4());

    let response = client
        .post(format!("{}/user/register", BASE_URL))
        .json(&json!({
            "name": "Test Reader",
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["data"]["token"].as_str().expect("No token").to_string();
    let user_id = body["data"]["user"]["id"].as_str().expect("No user id").to_string();
    (token, user_id)
}

/// Create a genre and a book under it, returning (genre id, book id)
async fn create_book(client: &Client, token: &str, marker: &str) -> (String, String) {
    let response = client
        .post(format!("{}/genre", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": format!("Genre {}", marker) }))
        .send()
        .await
        .expect("Failed to create genre");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse genre response");
    let genre_id = body["data"]["id"].as_str().expect("No genre id").to_string();

    let response = client
        .post(format!("{}/book", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": format!("Book {}", marker),
            "author": "Frank Herbert",
            "description": "A test book",
            "coverImageUrl": "https://covers.bookworm.test/cover.jpg",
            "genre": genre_id
        }))
        .send()
        .await
        .expect("Failed to create book");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse book response");
    let book_id = body["data"]["id"].as_str().expect("No book id").to_string();

    (genre_id, book_id)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    // Readiness needs the database round-trip to succeed
    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_register_and_login() {
    let client = Client::new();
    let email = format!("reader-{}@bookworm.test", Uuid::new_v4());

    let response = client
        .post(format!("{}/user/register", BASE_URL))
        .json(&json!({
            "name": "Chani Kynes",
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["role"], "User");
    assert!(body["data"]["password"].is_null());

    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Login success");
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["user"]["email"], email);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (_, _) = register_and_login(&client).await;

    let response = client
        .post(format!("{}/user/login", BASE_URL))
        .json(&json!({
            "email": format!("nobody-{}@bookworm.test", Uuid::new_v4()),
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_email() {
    let client = Client::new();
    let email = format!("reader-{}@bookworm.test", Uuid::new_v4());
    let payload = json!({
        "name": "Duncan Idaho",
        "email": email,
        "password": "secret123"
    });

    let response = client
        .post(format!("{}/user/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/user/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
#[ignore]
async fn test_register_validation_errors() {
    let client = Client::new();

    let response = client
        .post(format!("{}/user/register", BASE_URL))
        .json(&json!({
            "name": "Al",
            "email": "not-an-email",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().expect("No errors array");
    assert!(errors.len() >= 3);
    assert!(errors.iter().any(|e| e["field"] == "email"));
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/book", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/book", BASE_URL))
        .header("Authorization", "Bearer not-a-token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
#[ignore]
async fn test_list_books_defaults() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;

    let response = client
        .get(format!("{}/book", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
    assert_eq!(body["meta"]["page"], 1);
    assert_eq!(body["meta"]["limit"], 10);
    assert!(body["meta"]["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_book_crud() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let marker = Uuid::new_v4().to_string();
    let (genre_id, book_id) = create_book(&client, &token, &marker).await;

    // Read it back with the genre embedded
    let response = client
        .get(format!("{}/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["genre"]["id"], genre_id.as_str());
    assert!(body["data"]["genre"]["name"].is_string());

    // Duplicate title is rejected, ignoring case and surrounding whitespace
    let response = client
        .post(format!("{}/book", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": format!("book {} ", marker),
            "author": "Someone Else",
            "coverImageUrl": "https://covers.bookworm.test/other.jpg",
            "genre": genre_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book title already exists");

    // Update
    let response = client
        .patch(format!("{}/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": format!("Book {} revised", marker),
            "author": "Frank Herbert",
            "description": "Updated",
            "coverImageUrl": "https://covers.bookworm.test/cover2.jpg",
            "genre": genre_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book updated");

    // Soft delete, then the book is gone
    let response = client
        .delete(format!("{}/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book deleted (soft)");

    let response = client
        .get(format!("{}/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    // A second delete finds no live row
    let response = client
        .delete(format!("{}/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_book_mutation_requires_admin() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;

    let response = client
        .post(format!("{}/book", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Forbidden Book",
            "author": "Nobody",
            "coverImageUrl": "https://covers.bookworm.test/x.jpg",
            "genre": Uuid::new_v4()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
#[ignore]
async fn test_book_search_and_pagination() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let marker = Uuid::new_v4().to_string();
    create_book(&client, &token, &format!("{} one", marker)).await;
    create_book(&client, &token, &format!("{} two", marker)).await;

    let response = client
        .get(format!(
            "{}/book?searchTerm={}&limit=1&page=1",
            BASE_URL, marker
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let data = body["data"].as_array().expect("No data array");
    assert_eq!(data.len(), 1);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["meta"]["limit"], 1);
    for row in data {
        let title = row["title"].as_str().expect("No title").to_lowercase();
        assert!(title.contains(&marker.to_lowercase()));
    }
}

#[tokio::test]
#[ignore]
async fn test_book_fields_projection() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let marker = Uuid::new_v4().to_string();
    create_book(&client, &token, &marker).await;

    let response = client
        .get(format!(
            "{}/book?searchTerm={}&fields=title",
            BASE_URL, marker
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let data = body["data"].as_array().expect("No data array");
    assert!(!data.is_empty());
    for row in data {
        assert!(row["id"].is_string());
        assert!(row["title"].is_string());
        assert!(row.get("author").is_none());
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_filter_key_rejected() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;

    let response = client
        .get(format!("{}/book?publisher=tor", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore]
async fn test_user_access_control() {
    let client = Client::new();
    let (token_a, id_a) = register_and_login(&client).await;
    let (_, id_b) = register_and_login(&client).await;

    // Own record is readable
    let response = client
        .get(format!("{}/user/{}", BASE_URL, id_a))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Someone else's is not
    let response = client
        .get(format!("{}/user/{}", BASE_URL, id_b))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Listing users needs the Admin role
    let response = client
        .get(format!("{}/user", BASE_URL))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let admin = admin_token(&client).await;
    let response = client
        .get(format!("{}/user/{}", BASE_URL, id_a))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_review_approval_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (user, _) = register_and_login(&client).await;
    let marker = Uuid::new_v4().to_string();
    let (_, book_id) = create_book(&client, &admin, &marker).await;

    // Submit a review; it starts pending
    let response = client
        .post(format!("{}/review", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({
            "book": book_id,
            "rating": 5,
            "comment": "Spice must flow"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let review_id = body["data"]["id"].as_str().expect("No review id").to_string();
    assert_eq!(body["data"]["status"], "pending");

    // Pending reviews are invisible on the public listing
    let response = client
        .get(format!("{}/review/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["meta"]["total"], 0);

    // Approval requires the Admin role
    let response = client
        .patch(format!("{}/review/{}/approve", BASE_URL, review_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let response = client
        .patch(format!("{}/review/{}/approve", BASE_URL, review_id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "approved");

    // Now it shows up, with the reviewer embedded
    let response = client
        .get(format!("{}/review/book/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["meta"]["total"], 1);
    assert!(body["data"][0]["user"]["name"].is_string());
    assert!(body["data"][0]["user"]["email"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_library_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (user, _) = register_and_login(&client).await;
    let marker = Uuid::new_v4().to_string();
    let (_, book_id) = create_book(&client, &admin, &marker).await;

    // Add with defaults
    let response = client
        .post(format!("{}/user-library", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({ "book": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let entry_id = body["data"]["id"].as_str().expect("No entry id").to_string();
    assert_eq!(body["data"]["shelf"], "want");
    assert_eq!(body["data"]["progress"], 0);

    // Adding the same book again is rejected
    let response = client
        .post(format!("{}/user-library", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({ "book": book_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book is already in your library");

    // The listing embeds the book
    let response = client
        .get(format!("{}/user-library/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["book"]["id"], book_id.as_str());
    assert!(body["data"][0]["book"]["genre"]["name"].is_string());

    // Move to the completed shelf
    let response = client
        .patch(format!("{}/user-library/{}", BASE_URL, entry_id))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({ "shelf": "completed", "progress": 100 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["shelf"], "completed");
    assert_eq!(body["data"]["progress"], 100);
}

#[tokio::test]
#[ignore]
async fn test_reading_goal_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (user, user_id) = register_and_login(&client).await;
    let start = (Utc::now() - Duration::days(1)).to_rfc3339();
    let end = (Utc::now() + Duration::days(30)).to_rfc3339();

    // First goal becomes active
    let response = client
        .post(format!("{}/reading-goal", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({
            "period": "monthly",
            "targetBook": 10,
            "startDate": start,
            "endDate": end
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let first_goal = body["data"]["id"].as_str().expect("No goal id").to_string();
    assert_eq!(body["data"]["isActive"], true);

    // A second goal displaces the first
    let response = client
        .post(format!("{}/reading-goal", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({
            "period": "weekly",
            "targetBook": 2,
            "startDate": start,
            "endDate": end
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let second_goal = body["data"]["id"].as_str().expect("No goal id").to_string();

    let response = client
        .get(format!("{}/reading-goal/active/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["id"], second_goal.as_str());

    // Both goals remain listed, newest first
    let response = client
        .get(format!("{}/reading-goal/user/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let goals = body["data"].as_array().expect("No goals array");
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0]["id"], second_goal.as_str());
    assert_eq!(goals[0]["isActive"], true);
    assert_eq!(goals[1]["id"], first_goal.as_str());
    assert_eq!(goals[1]["isActive"], false);

    // Complete one book inside the window, then check progress
    let marker = Uuid::new_v4().to_string();
    let (_, book_id) = create_book(&client, &admin, &marker).await;
    let response = client
        .post(format!("{}/user-library", BASE_URL))
        .header("Authorization", format!("Bearer {}", user))
        .json(&json!({ "book": book_id, "shelf": "completed", "progress": 100 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!(
            "{}/reading-goal/active/{}/progress",
            BASE_URL, user_id
        ))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["completedBooks"], 1);
    assert_eq!(body["data"]["remaining"], 1);
    assert_eq!(body["data"]["percentage"], 50);

    // Delete the active goal; none is active afterwards
    let response = client
        .delete(format!("{}/reading-goal/{}", BASE_URL, second_goal))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/reading-goal/active/{}", BASE_URL, user_id))
        .header("Authorization", format!("Bearer {}", user))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_reading_goal_requires_user_role() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let start = Utc::now().to_rfc3339();
    let end = (Utc::now() + Duration::days(7)).to_rfc3339();

    let response = client
        .post(format!("{}/reading-goal", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "period": "weekly",
            "targetBook": 1,
            "startDate": start,
            "endDate": end
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}
