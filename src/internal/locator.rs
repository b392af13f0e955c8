use crate::api::ApiService;
use crate::api::error::LocatorError;
use crate::internal::models::Item;

/// Extract the item id from a list line of the form `whatever [ITEM_ID]`.
///
/// The id is read from the last bracket on the line, so titles that contain
/// brackets of their own still resolve to the right item.
pub fn parse_line(line: &str) -> Result<u64, LocatorError> {
    let line = line.trim();
    let Some((_, rest)) = line.rsplit_once('[') else {
        return Err(LocatorError::MissingId {
            line: line.to_string(),
        });
    };

    let raw = rest.trim_end_matches(']').trim();
    raw.parse::<u64>()
        .map_err(|source| LocatorError::InvalidId {
            raw: raw.to_string(),
            source,
        })
}

/// Resolve a list line to the item it names.
pub fn locate(api: &ApiService, line: &str) -> Result<Item, LocatorError> {
    let id = parse_line(line)?;
    tracing::debug!(id, "locating item");
    api.fetch_item(id)
        .map_err(|source| LocatorError::Api { id, source })
}
