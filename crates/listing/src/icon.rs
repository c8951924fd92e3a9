//! Icon classification for listing rows.

/// The icon shown next to a listing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconClass {
    /// The synthetic "parent directory" row.
    ParentDirectory,
    Folder,
    Video,
    Image,
    Audio,
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Archive,
    Html,
    Css,
    Code,
    JavaScript,
    Python,
    Text,
    /// Fallback for unknown or undetectable types.
    File,
}

impl IconClass {
    /// Classify a file by its MIME type.
    ///
    /// Exact MIME strings win over the top-level family; anything unmatched,
    /// including `None`, is [`IconClass::File`].
    pub fn for_mime(mime: Option<&str>) -> Self {
        let Some(mime) = mime else {
            return IconClass::File;
        };
        let mime = mime.trim().to_ascii_lowercase();

        match mime.as_str() {
            "application/pdf" => return IconClass::Pdf,
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                return IconClass::Word
            }
            "application/vnd.ms-excel"
            | "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => {
                return IconClass::Excel
            }
            "application/vnd.ms-powerpoint"
            | "application/vnd.openxmlformats-officedocument.presentationml.presentation" => {
                return IconClass::PowerPoint
            }
            "application/zip"
            | "application/x-rar-compressed"
            | "application/vnd.rar"
            | "application/x-7z-compressed"
            | "application/gzip"
            | "application/x-tar" => return IconClass::Archive,
            "text/html" => return IconClass::Html,
            "text/css" => return IconClass::Css,
            "application/json" => return IconClass::Code,
            "application/javascript" | "text/javascript" => return IconClass::JavaScript,
            "text/x-python" => return IconClass::Python,
            "text/plain" => return IconClass::Text,
            _ => {}
        }

        match mime.split('/').next().unwrap_or_default() {
            "video" => IconClass::Video,
            "image" => IconClass::Image,
            "audio" => IconClass::Audio,
            _ => IconClass::File,
        }
    }

    /// Font Awesome 5 classes for this icon.
    pub fn css_class(self) -> &'static str {
        match self {
            IconClass::ParentDirectory => "fas fa-level-up-alt",
            IconClass::Folder => "fas fa-folder-open",
            IconClass::Video => "fas fa-video",
            IconClass::Image => "fas fa-image",
            IconClass::Audio => "fas fa-music",
            IconClass::Pdf => "fas fa-file-pdf",
            IconClass::Word => "fas fa-file-word",
            IconClass::Excel => "fas fa-file-excel",
            IconClass::PowerPoint => "fas fa-file-powerpoint",
            IconClass::Archive => "fas fa-file-archive",
            IconClass::Html => "fab fa-html5",
            IconClass::Css => "fab fa-css3",
            IconClass::Code => "fas fa-file-code",
            IconClass::JavaScript => "fab fa-js",
            IconClass::Python => "fab fa-python",
            IconClass::Text => "fas fa-file-alt",
            IconClass::File => "fas fa-file",
        }
    }
}
