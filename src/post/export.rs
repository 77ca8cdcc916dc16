use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use futures::future::join_all;
use log::{debug, error, info, warn};

use crate::config::Format;

use super::Post;

pub const INDEX_FILE: &str = "index.json";

/// Writes every post to `{output}/post/{slug}.{ext}` plus an `index.json`
/// listing them all. Returns how many post files were written.
///
/// When several posts share a slug only the first, i.e. the newest, gets a
/// file.
pub async fn export_posts(
    posts: &[Post],
    output: &Path,
    format: Format,
) -> Result<usize, Box<dyn std::error::Error>> {
    let folder = output.join("post");
    tokio::fs::create_dir_all(&folder).await?;

    let index = serde_json::to_vec_pretty(posts)?;
    tokio::fs::write(output.join(INDEX_FILE), index).await?;

    let mut slugs = HashSet::new();
    let mut tasks = vec![];
    for post in posts {
        if !slugs.insert(post.slug.as_str()) {
            warn!("Duplicate slug {:?}, skipping post {}", post.slug, post.id);
            continue;
        }
        let path = post_file(&folder, post, format);
        let content = post.render(format);
        tasks.push(tokio::spawn(async move {
            debug!("Writing {}", path.display());
            match tokio::fs::write(&path, content).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Failed to write {}: {}", path.display(), e);
                    false
                }
            }
        }));
    }

    let written = join_all(tasks)
        .await
        .into_iter()
        .filter(|task| matches!(task, Ok(true)))
        .count();
    info!("{} of {} posts written", written, posts.len());

    Ok(written)
}

/// Slugs from the content service are not guaranteed to be file-name safe.
fn post_file(folder: &Path, post: &Post, format: Format) -> PathBuf {
    folder.join(format!(
        "{}.{}",
        urlencoding::encode(&post.slug),
        format.extension()
    ))
}
