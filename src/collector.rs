use log::{debug, error, info, warn};

use crate::{
    context::Context,
    error::{Result, SyncError},
    frontmatter::{self, ParsedDocument},
    metadata::Post,
    remote::{self, Fetch, FileDescriptor},
};

mod utils;

use utils::{
    date_from_filename, extract_title, parse_date, post_url, slug_from_filename, sort_post,
};

fn is_markdown(name: &str) -> bool {
    name.ends_with(".md")
}

/// Derives title, date and link of one post. `None` means the post has no usable date.
pub(crate) fn normalize_post(
    ctx: &Context,
    file: &FileDescriptor,
    parsed: &ParsedDocument,
) -> Option<Post> {
    if !is_markdown(&file.name) {
        return None;
    }

    let date = parsed
        .attributes
        .get("date")
        .and_then(|value| parse_date(value))
        .or_else(|| date_from_filename(&file.name))?;

    let title = match parsed.attributes.get("title").map(|t| t.trim()) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => extract_title(&parsed.body),
    };

    let slug = slug_from_filename(&file.name);
    Some(Post {
        title,
        url: post_url(ctx.site_base(), slug, &date),
        date,
        source_filename: file.name.clone(),
    })
}

fn process_file(
    ctx: &Context,
    fetcher: &dyn Fetch,
    file: &FileDescriptor,
) -> Result<Option<Post>> {
    let download_url = file
        .download_url
        .as_deref()
        .ok_or_else(|| SyncError::format(format!("{} has no download url", file.name)))?;

    let content = remote::fetch_document(fetcher, download_url)?;
    debug!("Fetched {} ({} bytes)", file.name, content.len());

    let parsed = frontmatter::parse(&content);
    debug!("Front matter of {}: {:?}", file.name, parsed.attributes);

    if let Some(value) = parsed.attributes.get("date") {
        if parse_date(value).is_none() {
            warn!("Unrecognized date {value:?} in {}, falling back to filename", file.name);
        }
    }

    Ok(normalize_post(ctx, file, &parsed))
}

/// Fetches and normalizes every post of the blog.
///
/// A failing file is logged and skipped. A failing listing yields no posts at all.
pub(crate) fn collect_posts(ctx: &Context, fetcher: &dyn Fetch) -> Vec<Post> {
    let listing_url = ctx.listing_url();
    info!("Fetching posts from {listing_url}...");

    let files = match remote::list_posts(fetcher, &listing_url) {
        Ok(files) => files,
        Err(e) => {
            error!("Error fetching posts from {}: {e}", ctx.blog_repo);
            return vec![];
        }
    };

    let mut posts = vec![];
    for file in files.iter() {
        if !is_markdown(&file.name) {
            debug!("Skipping non-markdown file: {}", file.name);
            continue;
        }

        match process_file(ctx, fetcher, file) {
            Ok(Some(post)) => {
                debug!("Added post {:?} -> {}", post.title, post.url);
                posts.push(post);
            }
            Ok(None) => info!("No valid date found for {}, skipping", file.name),
            Err(e) => warn!("Error processing {}: {e}", file.name),
        }
    }

    info!("Total posts processed: {}", posts.len());
    posts
}

/// Newest `max` posts, newest first. Posts sharing a date keep their fetch order.
pub(crate) fn select_latest(mut posts: Vec<Post>, max: usize) -> Vec<Post> {
    posts.sort_by(sort_post);
    posts.truncate(max);
    posts
}
