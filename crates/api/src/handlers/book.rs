//! Handlers for the `/book` resource.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use librairie_core::error::CoreError;
use librairie_core::search::{clamp_limit, clamp_offset, contains_pattern};
use librairie_core::types::DbId;
use librairie_core::upload::{download_file_name, image_content_type, UploadKind};
use librairie_core::validation::{not_blank, require_text, required};
use librairie_db::models::book::{BookResponse, BookWithCategory, CreateBook, UpdateBook};
use librairie_db::repositories::{BookRepo, CategoryRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequirePublisher};
use crate::query::{PaginationParams, SearchParams};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /book/{id}`. Every field is required.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    #[validate(
        required(message = "is required"),
        range(min = 0.0, message = "must not be negative")
    )]
    pub price: Option<f64>,
    #[validate(
        required(message = "is required"),
        range(min = 0, message = "must not be negative")
    )]
    pub stock: Option<i32>,
    #[validate(required(message = "is required"))]
    pub category_id: Option<DbId>,
}

/// A file part of the upload form, held in memory until the form is valid.
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

/// The parsed `multipart/form-data` body of `POST /book`.
#[derive(Default)]
struct BookForm {
    text: HashMap<String, String>,
    image: Option<UploadedFile>,
    pdf: Option<UploadedFile>,
}

impl BookForm {
    /// Read every part of the form, rejecting file parts with the wrong type.
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match UploadKind::from_field(&name) {
                Some(kind) => {
                    let content_type = field.content_type().map(str::to_string);
                    kind.check_content_type(content_type.as_deref())?;
                    let file = UploadedFile {
                        file_name: field.file_name().map(str::to_string),
                        content_type,
                        bytes: field
                            .bytes()
                            .await
                            .map_err(|e| AppError::BadRequest(e.body_text()))?,
                    };
                    match kind {
                        UploadKind::Image => form.image = Some(file),
                        UploadKind::Pdf => form.pdf = Some(file),
                    }
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.body_text()))?;
                    form.text.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    fn text(&self, field: &str) -> Result<&str, CoreError> {
        require_text(field, self.text.get(field).map(String::as_str))
    }

    fn number<T: std::str::FromStr>(&self, field: &str) -> Result<T, CoreError> {
        self.text(field)?
            .parse()
            .map_err(|_| CoreError::Validation(format!("{field} must be a number")))
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Book", id })
}

fn responses(rows: Vec<BookWithCategory>) -> Vec<BookResponse> {
    rows.into_iter().map(BookResponse::from).collect()
}

// ---------------------------------------------------------------------------
// Listing & lookup
// ---------------------------------------------------------------------------

/// GET /api/book
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Vec<BookResponse>>>> {
    let rows = BookRepo::list(
        &state.pool,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(ApiResponse::ok("Books retrieved", responses(rows))))
}

/// GET /api/book/search?query=
pub async fn search_books(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<Vec<BookResponse>>>> {
    let pattern = params
        .query
        .as_deref()
        .and_then(contains_pattern)
        .ok_or_else(|| AppError::BadRequest("A search query is required".into()))?;

    let rows = BookRepo::search(
        &state.pool,
        &pattern,
        clamp_limit(params.limit),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(ApiResponse::ok("Search results", responses(rows))))
}

/// GET /api/book/{id}
///
/// Counts as a view: the book's `click` counter is incremented.
pub async fn get_book(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<BookResponse>>> {
    if !BookRepo::increment_click(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let row = BookRepo::find_with_category(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::ok("Book retrieved", BookResponse::from(row))))
}

/// GET /api/book/user/me
pub async fn my_books(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<BookResponse>>>> {
    let rows = BookRepo::list_by_user(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok("Books retrieved", responses(rows))))
}

/// GET /api/book/category/{category_id}
pub async fn books_by_category(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<BookResponse>>>> {
    CategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }))?;
    let rows = BookRepo::list_by_category(&state.pool, category_id).await?;
    Ok(Json(ApiResponse::ok("Books retrieved", responses(rows))))
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

/// POST /api/book (multipart/form-data)
///
/// Text fields `title, description, author, price, stock, category_id` and
/// file fields `image` and `pdf`.
pub async fn create_book(
    RequirePublisher(user): RequirePublisher,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<BookResponse>>)> {
    let form = BookForm::read(multipart).await?;

    let title = form.text("title")?.to_string();
    let description = form.text("description")?.to_string();
    let author = form.text("author")?.to_string();
    let price: f64 = form.number("price")?;
    let stock: i32 = form.number("stock")?;
    let category_id: DbId = form.number("category_id")?;
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation("price must not be negative".into()).into());
    }
    if stock < 0 {
        return Err(CoreError::Validation("stock must not be negative".into()).into());
    }
    let image = required("image", form.image)?;
    let pdf = required("pdf", form.pdf)?;

    CategoryRepo::find_by_id(&state.pool, category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: category_id,
        }))?;

    let image_name = store(&state, UploadKind::Image, &image).await?;
    let pdf_name = match store(&state, UploadKind::Pdf, &pdf).await {
        Ok(name) => name,
        Err(e) => {
            state.uploads.remove(UploadKind::Image, &image_name).await;
            return Err(e);
        }
    };

    let input = CreateBook {
        title,
        description,
        author,
        price,
        stock,
        image: image_name.clone(),
        pdf: pdf_name.clone(),
        user_id: user.user_id,
        category_id,
    };
    let book = match BookRepo::create(&state.pool, &input).await {
        Ok(book) => book,
        Err(e) => {
            state.uploads.remove(UploadKind::Image, &image_name).await;
            state.uploads.remove(UploadKind::Pdf, &pdf_name).await;
            return Err(e.into());
        }
    };
    tracing::info!(book_id = book.id, user_id = user.user_id, "Book published");

    let row = BookRepo::find_with_category(&state.pool, book.id)
        .await?
        .ok_or_else(|| not_found(book.id))?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Book created", BookResponse::from(row))),
    ))
}

async fn store(state: &AppState, kind: UploadKind, file: &UploadedFile) -> AppResult<String> {
    let extension = kind.extension(file.file_name.as_deref(), file.content_type.as_deref());
    state
        .uploads
        .save(kind, extension, &file.bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))
}

/// PUT /api/book/{id}
///
/// Only the publisher of a book may edit it. Files are not replaced.
pub async fn update_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateBookRequest>,
) -> AppResult<Json<ApiResponse<BookResponse>>> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if book.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the publisher of this book can update it".into(),
        )));
    }

    let update = UpdateBook {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        author: input.author.trim().to_string(),
        price: required("price", input.price)?,
        stock: required("stock", input.stock)?,
        category_id: required("category_id", input.category_id)?,
    };
    CategoryRepo::find_by_id(&state.pool, update.category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: update.category_id,
        }))?;

    BookRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;
    let row = BookRepo::find_with_category(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::ok("Book updated", BookResponse::from(row))))
}

/// DELETE /api/book/{id}
///
/// Allowed for the publisher and for administrators.
pub async fn delete_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !auth.owns_or_admin(book.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the publisher or an administrator can delete this book".into(),
        )));
    }

    let deleted = BookRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.uploads.remove(UploadKind::Image, &deleted.image).await;
    state.uploads.remove(UploadKind::Pdf, &deleted.pdf).await;

    tracing::info!(book_id = id, deleted_by = auth.user_id, "Book deleted");
    Ok(Json(MessageResponse::message("Book deleted")))
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// GET /api/book/{id}/download
///
/// Streams the book's PDF as an attachment and counts the download.
pub async fn download_book(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let bytes = read_file(&state, UploadKind::Pdf, &book.pdf, id).await?;
    BookRepo::increment_download(&state.pool, id).await?;

    let disposition = format!("attachment; filename=\"{}\"", download_file_name(&book.title));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// GET /api/book/{id}/image
pub async fn book_image(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let bytes = read_file(&state, UploadKind::Image, &book.image, id).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, image_content_type(&book.image))],
        bytes,
    ))
}

async fn read_file(
    state: &AppState,
    kind: UploadKind,
    file_name: &str,
    book_id: DbId,
) -> AppResult<Vec<u8>> {
    state.uploads.read(kind, file_name).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            tracing::warn!(book_id, file = file_name, "Stored book file is missing");
            AppError::Core(CoreError::NotFound {
                entity: "Book file",
                id: book_id,
            })
        } else {
            AppError::InternalError(format!("Failed to read stored file: {e}"))
        }
    })
}
