//! Integration tests for the user, category and book repositories.

use librairie_core::roles::{ROLE_BUYER, ROLE_SELLER};
use librairie_core::search::contains_pattern;
use librairie_db::models::book::{Book, CreateBook, UpdateBook};
use librairie_db::models::user::{CreateUser, UpdateProfile, User};
use librairie_db::repositories::{BookRepo, CategoryRepo, RoleRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str, role: &str) -> User {
    let role = RoleRepo::find_by_name(pool, role).await.unwrap().unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap()
}

async fn new_book(pool: &PgPool, user_id: i64, category_id: i64, title: &str) -> Book {
    BookRepo::create(
        pool,
        &CreateBook {
            title: title.to_string(),
            description: "A description".to_string(),
            author: "Some Author".to_string(),
            price: 2500.0,
            stock: 3,
            image: "cover.jpg".to_string(),
            pdf: "book.pdf".to_string(),
            user_id,
            category_id,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "ada@example.com", ROLE_BUYER).await;

    let role = RoleRepo::find_by_name(&pool, ROLE_BUYER).await.unwrap().unwrap();
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".to_string(),
            surname: "Person".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "x".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_response_resolves_role_name(pool: PgPool) {
    let user = new_user(&pool, "seller@example.com", ROLE_SELLER).await;

    let response = UserRepo::find_response_by_id(&pool, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.role, ROLE_SELLER);
    assert_eq!(response.email, "seller@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_taken_ignores_own_row(pool: PgPool) {
    let user = new_user(&pool, "me@example.com", ROLE_BUYER).await;
    new_user(&pool, "other@example.com", ROLE_BUYER).await;

    assert!(!UserRepo::email_taken(&pool, "me@example.com", Some(user.id)).await.unwrap());
    assert!(UserRepo::email_taken(&pool, "other@example.com", Some(user.id)).await.unwrap());
    assert!(UserRepo::email_taken(&pool, "me@example.com", None).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_profile_replaces_fields(pool: PgPool) {
    let user = new_user(&pool, "before@example.com", ROLE_BUYER).await;
    let updated = UserRepo::update_profile(
        &pool,
        user.id,
        &UpdateProfile {
            name: "Grace".to_string(),
            surname: "Hopper".to_string(),
            email: "after@example.com".to_string(),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Grace");
    assert_eq!(updated.email, "after@example.com");
    assert_eq!(updated.password_hash, user.password_hash);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_user_cascades_to_books(pool: PgPool) {
    let seller = new_user(&pool, "gone@example.com", ROLE_SELLER).await;
    let category = CategoryRepo::find_by_name(&pool, "Roman").await.unwrap().unwrap();
    let book = new_book(&pool, seller.id, category.id, "Orphan").await;

    assert!(UserRepo::delete(&pool, seller.id).await.unwrap());
    assert!(BookRepo::find_by_id(&pool, book.id).await.unwrap().is_none());
    assert!(!UserRepo::delete(&pool, seller.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_with_books_cannot_be_deleted(pool: PgPool) {
    let seller = new_user(&pool, "s@example.com", ROLE_SELLER).await;
    let category = CategoryRepo::create(&pool, "Voyage").await.unwrap();
    new_book(&pool, seller.id, category.id, "Around the World").await;

    let err = CategoryRepo::delete(&pool, category.id).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("fk_books_category"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_category_is_deleted(pool: PgPool) {
    let category = CategoryRepo::create(&pool, "Éphémère").await.unwrap();
    assert!(CategoryRepo::delete(&pool, category.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, category.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn book_listing_joins_category(pool: PgPool) {
    let seller = new_user(&pool, "s@example.com", ROLE_SELLER).await;
    let category = CategoryRepo::find_by_name(&pool, "Manga").await.unwrap().unwrap();
    new_book(&pool, seller.id, category.id, "First").await;
    new_book(&pool, seller.id, category.id, "Second").await;

    let books = BookRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].book.title, "Second", "newest first");
    assert!(books.iter().all(|b| b.category_name == "Manga"));

    let page = BookRepo::list(&pool, 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].book.title, "First");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_any_text_column_case_insensitively(pool: PgPool) {
    let seller = new_user(&pool, "s@example.com", ROLE_SELLER).await;
    let category = CategoryRepo::find_by_name(&pool, "Science").await.unwrap().unwrap();
    new_book(&pool, seller.id, category.id, "The Selfish Gene").await;
    new_book(&pool, seller.id, category.id, "Cosmos").await;

    let pattern = contains_pattern("selfish").unwrap();
    let hits = BookRepo::search(&pool, &pattern, 50, 0).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].book.title, "The Selfish Gene");

    // Every seeded book shares the author, so an author match returns both.
    let pattern = contains_pattern("SOME AUTHOR").unwrap();
    assert_eq!(BookRepo::search(&pool, &pattern, 50, 0).await.unwrap().len(), 2);

    // Wildcards are matched literally.
    let pattern = contains_pattern("%").unwrap();
    assert!(BookRepo::search(&pool, &pattern, 50, 0).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn counters_increment_atomically(pool: PgPool) {
    let seller = new_user(&pool, "s@example.com", ROLE_SELLER).await;
    let category = CategoryRepo::find_by_name(&pool, "Art").await.unwrap().unwrap();
    let book = new_book(&pool, seller.id, category.id, "Counted").await;

    assert!(BookRepo::increment_click(&pool, book.id).await.unwrap());
    assert!(BookRepo::increment_click(&pool, book.id).await.unwrap());
    assert!(BookRepo::increment_download(&pool, book.id).await.unwrap());

    let reloaded = BookRepo::find_by_id(&pool, book.id).await.unwrap().unwrap();
    assert_eq!(reloaded.click, 2);
    assert_eq!(reloaded.download, 1);

    assert!(!BookRepo::increment_click(&pool, 9_999_999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_book(pool: PgPool) {
    let seller = new_user(&pool, "s@example.com", ROLE_SELLER).await;
    let roman = CategoryRepo::find_by_name(&pool, "Roman").await.unwrap().unwrap();
    let histoire = CategoryRepo::find_by_name(&pool, "Histoire").await.unwrap().unwrap();
    let book = new_book(&pool, seller.id, roman.id, "Draft").await;

    let updated = BookRepo::update(
        &pool,
        book.id,
        &UpdateBook {
            title: "Final".to_string(),
            description: "Revised".to_string(),
            author: "Another Author".to_string(),
            price: 3000.0,
            stock: 10,
            category_id: histoire.id,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.category_id, histoire.id);
    assert_eq!(updated.image, book.image, "files are untouched by updates");

    let deleted = BookRepo::delete(&pool, book.id).await.unwrap().unwrap();
    assert_eq!(deleted.pdf, "book.pdf");
    assert!(BookRepo::delete(&pool, book.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_stock_is_rejected(pool: PgPool) {
    let seller = new_user(&pool, "s@example.com", ROLE_SELLER).await;
    let category = CategoryRepo::find_by_name(&pool, "Art").await.unwrap().unwrap();

    let err = BookRepo::create(
        &pool,
        &CreateBook {
            title: "Bad".to_string(),
            description: "Bad".to_string(),
            author: "Bad".to_string(),
            price: 10.0,
            stock: -1,
            image: "a.jpg".to_string(),
            pdf: "a.pdf".to_string(),
            user_id: seller.id,
            category_id: category.id,
        },
    )
    .await
    .unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.constraint(), Some("ck_books_stock_non_negative"));
}
