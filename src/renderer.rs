use handlebars::Handlebars;
use serde::Serialize;

use crate::{
    error::{Result, SyncError},
    metadata::Post,
};

const SECTION_TEMPLATE: &str = "{{#each posts}}- [{{title}}]({{url}})
{{else}}- No posts available yet
{{/each}}";

#[derive(Serialize, Debug)]
struct SectionData<'a> {
    posts: &'a [Post],
}

pub(crate) fn generate_renderer() -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    // output is markdown, not html
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("section", SECTION_TEMPLATE)
        .map_err(|e| SyncError::Render(e.to_string()))?;

    Ok(handlebars)
}

/// One `- [title](url)` line per post, or a placeholder line when there are none.
pub(crate) fn render_posts(handlebars: &Handlebars<'_>, posts: &[Post]) -> Result<String> {
    handlebars
        .render("section", &SectionData { posts })
        .map_err(|e| SyncError::Render(e.to_string()))
}
