//! Media recovery — single-byte XOR key discovery for obfuscated image
//! attachments.
//!
//! The exporter XORs every byte of an image with one key byte. Comparing the
//! first two obfuscated bytes against the known leading bytes of JPEG, PNG
//! and GIF recovers the key; the check is a two-byte consistency test, not a
//! full validation of the decoded image.

/// Image formats recognised by their two-byte magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Tried in this order.
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif];

    pub fn signature(self) -> [u8; 2] {
        match self {
            ImageFormat::Jpeg => [0xFF, 0xD8],
            ImageFormat::Png => [0x89, 0x50],
            ImageFormat::Gif => [0x47, 0x49],
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decoded attachment bytes tagged with their format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredMedia {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl RecoveredMedia {
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Find the XOR key and format from the first two bytes of `buf`.
pub fn detect_key(buf: &[u8]) -> Option<(u8, ImageFormat)> {
    let &[b0, b1, ..] = buf else {
        return None;
    };
    ImageFormat::ALL.into_iter().find_map(|format| {
        let [s0, s1] = format.signature();
        let key = b0 ^ s0;
        (b1 ^ s1 == key).then_some((key, format))
    })
}

/// Decode an obfuscated attachment. `None` means no known signature matched
/// and the attachment should be shown as unrecoverable.
pub fn recover(buf: &[u8]) -> Option<RecoveredMedia> {
    let (key, format) = detect_key(buf)?;
    Some(RecoveredMedia {
        bytes: xor(buf, key),
        format,
    })
}

fn xor(buf: &[u8], key: u8) -> Vec<u8> {
    buf.iter().map(|b| b ^ key).collect()
}
