//! Display-name lookup of existing control-plane resources.
//!
//! Display names are not unique on the platform. When several resources
//! share one, the first in listing order wins, so repeated runs keep
//! resolving to the same resource.

use anchorage_core::model::{IndexEndpoint, VectorIndex};
use anchorage_core::DisplayNameFilter;

use crate::client::ControlPlane;
use crate::error::ProvisionResult;

/// Find the index named `filter`'s display name, if any.
pub async fn find_index<P: ControlPlane + ?Sized>(
    plane: &P,
    filter: &DisplayNameFilter,
) -> ProvisionResult<Option<VectorIndex>> {
    let candidates = plane.list_indexes(filter).await?;
    Ok(first_match("index", filter, candidates, |i| i.name.as_str()))
}

/// Find the index endpoint named `filter`'s display name, if any.
pub async fn find_index_endpoint<P: ControlPlane + ?Sized>(
    plane: &P,
    filter: &DisplayNameFilter,
) -> ProvisionResult<Option<IndexEndpoint>> {
    let candidates = plane.list_index_endpoints(filter).await?;
    Ok(first_match("index endpoint", filter, candidates, |e| {
        e.name.as_str()
    }))
}

/// Pick the first candidate, warning when the display name is ambiguous.
fn first_match<T>(
    kind: &str,
    filter: &DisplayNameFilter,
    candidates: Vec<T>,
    resource_name: impl Fn(&T) -> &str,
) -> Option<T> {
    if candidates.len() > 1 {
        log::warn!(
            "{} {}s share display name {:?}; using {}",
            candidates.len(),
            kind,
            filter.display_name(),
            resource_name(&candidates[0])
        );
    }
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_empty() {
        let filter = DisplayNameFilter::new("docs").unwrap();
        let picked = first_match::<&str>("index", &filter, Vec::new(), |s| *s);
        assert!(picked.is_none());
    }

    #[test]
    fn test_first_match_keeps_listing_order() {
        let filter = DisplayNameFilter::new("docs").unwrap();
        let picked = first_match("index", &filter, vec!["b", "a", "c"], |s| *s);
        assert_eq!(picked, Some("b"));
    }
}
