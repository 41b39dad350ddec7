//! Book upload rules: which multipart fields carry files, which MIME types
//! each accepts, and how stored files are named.

use crate::error::CoreError;

/// Sub-directory (under the upload root) for cover images.
pub const IMAGE_DIR: &str = "images";

/// Sub-directory (under the upload root) for book PDFs.
pub const PDF_DIR: &str = "pdf";

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];
const PDF_TYPES: &[&str] = &["application/pdf"];

/// A file-carrying multipart field of the book upload form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Pdf,
}

impl UploadKind {
    /// Map a multipart field name to its upload kind.
    pub fn from_field(name: &str) -> Option<Self> {
        match name {
            "image" => Some(UploadKind::Image),
            "pdf" => Some(UploadKind::Pdf),
            _ => None,
        }
    }

    pub fn field_name(self) -> &'static str {
        match self {
            UploadKind::Image => "image",
            UploadKind::Pdf => "pdf",
        }
    }

    /// Directory under the upload root where files of this kind live.
    pub fn directory(self) -> &'static str {
        match self {
            UploadKind::Image => IMAGE_DIR,
            UploadKind::Pdf => PDF_DIR,
        }
    }

    fn accepted_types(self) -> &'static [&'static str] {
        match self {
            UploadKind::Image => IMAGE_TYPES,
            UploadKind::Pdf => PDF_TYPES,
        }
    }

    /// Reject a file whose declared content type is not accepted for this field.
    pub fn check_content_type(self, content_type: Option<&str>) -> Result<(), CoreError> {
        let accepted = content_type
            .map(|ct| self.accepted_types().contains(&ct))
            .unwrap_or(false);
        if accepted {
            return Ok(());
        }
        let expected = match self {
            UploadKind::Image => "image files (jpg, jpeg, png)",
            UploadKind::Pdf => "PDF files",
        };
        Err(CoreError::Validation(format!(
            "Field {} only accepts {expected}",
            self.field_name()
        )))
    }

    /// File extension to store an accepted upload under.
    ///
    /// Uses the client file name's extension when it is one we expect,
    /// otherwise derives it from the content type.
    pub fn extension(self, file_name: Option<&str>, content_type: Option<&str>) -> &'static str {
        let from_name = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match self {
            UploadKind::Pdf => "pdf",
            UploadKind::Image => match (from_name.as_deref(), content_type) {
                (Some("png"), _) => "png",
                (Some("jpeg"), _) => "jpeg",
                (Some("jpg"), _) => "jpg",
                (_, Some("image/png")) => "png",
                _ => "jpg",
            },
        }
    }
}

/// Unique stored file name: `<millis>-<uuid>.<ext>`.
pub fn unique_file_name(extension: &str) -> String {
    format!(
        "{}-{}.{extension}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Whether a stored file name is safe to join onto an upload directory.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

/// File name offered when a book's PDF is downloaded.
///
/// Header values must be visible ASCII, so anything else in the title is
/// replaced with `_`.
pub fn download_file_name(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "book.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}

/// Content type to serve a stored cover image with.
pub fn image_content_type(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}
