use std::{
    fs,
    io::Write as _,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    context::Context,
    error::{Result, SyncError},
    metadata::Post,
    renderer,
};

/// Read-file / write-file seam around the README.
pub(crate) trait DocumentStore {
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The local filesystem. Writes go through a sibling temp file that is renamed into place.
pub(crate) struct FsStore;

impl DocumentStore for FsStore {
    fn read(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Replaces everything from `start_marker` up to `end_marker` with the marker line and `block`.
pub(crate) fn splice(
    text: &str,
    start_marker: &str,
    end_marker: &str,
    block: &str,
) -> Result<String> {
    let start = text
        .find(start_marker)
        .ok_or_else(|| SyncError::marker_not_found(start_marker))?;
    let end = text
        .find(end_marker)
        .ok_or_else(|| SyncError::marker_not_found(end_marker))?;
    if end < start + start_marker.len() {
        return Err(SyncError::marker_not_found(end_marker));
    }

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..start]);
    out.push_str(start_marker);
    out.push('\n');
    out.push_str(block);
    out.push_str(&text[end..]);
    Ok(out)
}

/// Rewrites the blog section of the README. The file is left as is if the markers are missing.
pub(crate) fn update_readme(
    store: &dyn DocumentStore,
    ctx: &Context,
    posts: &[Post],
) -> Result<()> {
    let handlebars = renderer::generate_renderer()?;
    let block = renderer::render_posts(&handlebars, posts)?;

    let text = store.read(&ctx.readme_path)?;
    let updated = splice(&text, &ctx.start_marker, &ctx.end_marker, &block)?;
    store.write(&ctx.readme_path, &updated)?;

    info!("{} updated", ctx.readme_path.display());
    Ok(())
}
