use feedgrab_core::{resolve_source, ResolveError, FALLBACK_ATTRIBUTE, PRIMARY_ATTRIBUTE};

use crate::RenderedPageSession;

/// Reads an image element's source attributes and picks the URL to fetch.
///
/// The fallback attribute is only read when the primary one is unusable.
pub async fn resolve_element<S: RenderedPageSession>(
    session: &S,
    element: &S::Element,
) -> Result<String, ResolveError> {
    let primary = read(session, element, PRIMARY_ATTRIBUTE).await?;
    if let Ok(url) = resolve_source(primary.as_deref(), None) {
        return Ok(url);
    }
    let fallback = read(session, element, FALLBACK_ATTRIBUTE).await?;
    resolve_source(primary.as_deref(), fallback.as_deref())
}

async fn read<S: RenderedPageSession>(
    session: &S,
    element: &S::Element,
    name: &str,
) -> Result<Option<String>, ResolveError> {
    session
        .attribute(element, name)
        .await
        .map_err(|err| ResolveError::Unreadable {
            attribute: name.to_string(),
            message: err.to_string(),
        })
}
