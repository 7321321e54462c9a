/// A blog post ready to be listed in the README.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Post {
    pub title: String,
    pub url: String,
    /// Wall-clock date as written by the author, never shifted to UTC.
    pub date: chrono::NaiveDateTime,
    pub source_filename: String,
}
