use std::fmt;

/// File extension chosen for a downloaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    Jpg,
    Png,
    Gif,
}

impl ImageExtension {
    /// Maps a declared `Content-Type` to an extension.
    ///
    /// Case-insensitive substring match, first hit wins: `jpeg`/`jpg`, then
    /// `png`, then `gif`. Anything else, including a missing header, is `jpg`.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(raw) = content_type else {
            return ImageExtension::Jpg;
        };
        let lowered = raw.to_ascii_lowercase();
        if lowered.contains("jpeg") || lowered.contains("jpg") {
            ImageExtension::Jpg
        } else if lowered.contains("png") {
            ImageExtension::Png
        } else if lowered.contains("gif") {
            ImageExtension::Gif
        } else {
            ImageExtension::Jpg
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::Jpg => "jpg",
            ImageExtension::Png => "png",
            ImageExtension::Gif => "gif",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
