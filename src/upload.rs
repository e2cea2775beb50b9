//! File payloads for multipart uploads.

use bytes::Bytes;

/// The category of an uploaded file.
///
/// Each kind fixes the MIME type and placeholder filename written into the
/// multipart file part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    /// A JPEG image.
    Image,
    /// An MP4 video.
    Video,
}

impl UploadKind {
    /// MIME type of the file part.
    pub fn mime_type(self) -> &'static str {
        match self {
            UploadKind::Image => "image/jpeg",
            UploadKind::Video => "video/mp4",
        }
    }

    /// Filename sent in the file part's `Content-Disposition`.
    pub fn placeholder_filename(self) -> &'static str {
        match self {
            UploadKind::Image => "placeholder.jpeg",
            UploadKind::Video => "placeholder.mov",
        }
    }

    /// Form field name of the file part.
    pub fn field_name(self) -> &'static str {
        "file"
    }
}

/// Raw bytes to upload together with their [`UploadKind`].
///
/// An upload without bytes (or with an empty buffer) builds no multipart body;
/// the call goes out as a plain request.
///
/// ```
/// use lightnet::{Upload, UploadKind};
///
/// let upload = Upload::new(UploadKind::Image, vec![0xFF, 0xD8, 0xFF]);
/// assert!(upload.has_payload());
/// assert!(!Upload::empty(UploadKind::Video).has_payload());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    kind: UploadKind,
    data: Option<Bytes>,
}

impl Upload {
    /// Creates an upload carrying `data`.
    pub fn new(kind: UploadKind, data: impl Into<Bytes>) -> Self {
        Self {
            kind,
            data: Some(data.into()),
        }
    }

    /// Creates an upload with no bytes attached.
    pub fn empty(kind: UploadKind) -> Self {
        Self { kind, data: None }
    }

    /// The category of the file.
    pub fn kind(&self) -> UploadKind {
        self.kind
    }

    /// The bytes to upload, if any.
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Returns `true` if there are bytes that warrant a multipart body.
    pub fn has_payload(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
    }
}
