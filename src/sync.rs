use log::info;

use crate::{
    collector::{collect_posts, select_latest},
    context::Context,
    error::Result,
    metadata::Post,
    readme::{update_readme, DocumentStore},
    remote::Fetch,
};

/// One full sync: collect the blog's posts, pick the newest and splice them into the README.
pub(crate) fn run(
    ctx: &Context,
    fetcher: &dyn Fetch,
    store: &dyn DocumentStore,
) -> Result<Vec<Post>> {
    info!("Fetching latest posts from {}...", ctx.blog_repo);

    let posts = select_latest(collect_posts(ctx, fetcher), ctx.max_posts);

    info!("Found {} posts:", posts.len());
    for (i, post) in posts.iter().enumerate() {
        info!("{}. {} ({})", i + 1, post.title, post.date.format("%Y-%m-%d"));
    }

    update_readme(store, ctx, &posts)?;
    Ok(posts)
}
