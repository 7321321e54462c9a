use std::{path::PathBuf, time::Duration};

const BLOG_REPO: &str = "alicelond/alicelond.github.io";
const POSTS_DIR: &str = "_posts";
const API_BASE: &str = "https://api.github.com";
const SITE_URL: &str = "https://signaltosoftware.com";
const MAX_POSTS: usize = 5;
const USER_AGENT: &str = "GitHub-Action-README-Update";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const START_MARKER: &str = "### 📕 Latest Blog Post";
pub(crate) const END_MARKER: &str = "### 📖 Currently Reading";

/// Settings of one sync run. Passed explicitly to every stage.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    /// `owner/name` of the repository holding the blog.
    pub blog_repo: String,
    pub posts_dir: String,
    pub api_base: String,

    /// Base of the generated post links.
    pub site_url: String,
    pub max_posts: usize,

    pub readme_path: PathBuf,
    pub start_marker: String,
    pub end_marker: String,

    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            blog_repo: BLOG_REPO.to_string(),
            posts_dir: POSTS_DIR.to_string(),
            api_base: API_BASE.to_string(),
            site_url: SITE_URL.to_string(),
            max_posts: MAX_POSTS,
            readme_path: PathBuf::from("README.md"),
            start_marker: START_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
            user_agent: USER_AGENT.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Context {
    /// GitHub "contents of a directory" endpoint for the posts directory.
    pub fn listing_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.blog_repo,
            self.posts_dir
        )
    }

    pub fn site_base(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}
