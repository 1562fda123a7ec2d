use feedgrab_logging::grab_debug;

use crate::{RenderedPageSession, SessionError};

/// A post that yielded no preview image. `post` is its 1-based position
/// among the posts that were examined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSkip {
    pub post: usize,
    pub reason: SessionError,
}

/// Preview images found in document order, plus the posts that had none.
#[derive(Debug)]
pub struct Discovery<E> {
    pub images: Vec<E>,
    pub skipped: Vec<PostSkip>,
}

impl<E> Default for Discovery<E> {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Looks at the first `max_posts` posts and collects each one's preview image.
///
/// A post without a match is recorded in `skipped` and not replaced by a
/// later post, so fewer than `max_posts` images may come back. Only a
/// failure of the top-level post query is returned as an error.
pub async fn extract_candidates<S: RenderedPageSession>(
    session: &S,
    post_tag: &str,
    image_selector: &str,
    max_posts: usize,
) -> Result<Discovery<S::Element>, SessionError> {
    let posts = session.query_all(post_tag).await?;
    grab_debug!(
        "{} <{}> elements rendered, examining {}",
        posts.len(),
        post_tag,
        posts.len().min(max_posts)
    );

    let mut discovery = Discovery::default();
    for (offset, post) in posts.iter().take(max_posts).enumerate() {
        match session.query_within(post, image_selector).await {
            Ok(image) => discovery.images.push(image),
            Err(reason) => discovery.skipped.push(PostSkip {
                post: offset + 1,
                reason,
            }),
        }
    }
    Ok(discovery)
}
