//! Attachments and local file references.

/// How an attachment is uploaded and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Image uploaded through the image endpoint and shown inline.
    Image,
    /// Any other file.
    File,
}

impl AttachmentKind {
    /// Pick the kind for a MIME type. Only `image/*` types are images.
    pub fn for_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") { Self::Image } else { Self::File }
    }
}

/// Remote attachment reference, as stored on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Image or file.
    pub kind: AttachmentKind,
    /// Remote URL the upload collaborator returned. `None` for attachments
    /// the SDK produced without an asset (e.g. link previews).
    pub url: Option<String>,
    /// Display title, usually the original file name.
    pub title: Option<String>,
    /// MIME type of the uploaded file.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub file_size: Option<u64>,
}

impl Attachment {
    /// Attachment for a successfully uploaded file.
    pub fn uploaded(file: &FileRef, url: impl Into<String>) -> Self {
        Self {
            kind: file.kind(),
            url: Some(url.into()),
            title: Some(file.name.clone()),
            mime_type: Some(file.mime_type.clone()),
            file_size: Some(file.size),
        }
    }
}

/// Local file picked by the user, not yet uploaded.
///
/// Opaque to the composer: only the upload collaborator reads the file
/// contents, so this carries metadata and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// File name as shown in the picker.
    pub name: String,
    /// MIME type reported by the platform.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileRef {
    /// Create a file reference.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self { name: name.into(), mime_type: mime_type.into(), size }
    }

    /// Upload kind derived from the MIME type.
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::for_mime(&self.mime_type)
    }

    /// Reconstruct a file reference for an attachment that is already
    /// uploaded (used when a message is loaded for editing).
    pub fn from_attachment(attachment: &Attachment) -> Self {
        let mime_type = attachment.mime_type.clone().unwrap_or_else(|| match attachment.kind {
            AttachmentKind::Image => "image/*".to_string(),
            AttachmentKind::File => "application/octet-stream".to_string(),
        });
        Self {
            name: attachment.title.clone().unwrap_or_default(),
            mime_type,
            size: attachment.file_size.unwrap_or(0),
        }
    }
}
