use serde::Deserialize;

/// One entry of a GitHub "contents of a directory" listing.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileDescriptor {
    pub name: String,
    // null for sub-directories
    pub download_url: Option<String>,
}

/// Single-file representation of the contents API, payload embedded in base64.
#[derive(Deserialize, Debug)]
pub(super) struct EmbeddedContent {
    pub content: String,
    pub encoding: Option<String>,
}
