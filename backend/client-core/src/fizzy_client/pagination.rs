use super::{ApiResponse, FizzyClient};
use crate::error::FizzyError;

use log::debug;
use serde_json::Value;

/// Upper bound on follow-up pages for one `fetch_all` listing.
///
/// Guards against a server whose `next` links form a cycle.
pub const MAX_FOLLOW_PAGES: usize = 1000;

impl FizzyClient {
    /// GET a list endpoint, optionally following every `next` link.
    ///
    /// Without `fetch_all` this is a plain GET and the next link is left on
    /// the response for the caller to expose. With `fetch_all` the array
    /// payloads of all pages are concatenated in order and the returned
    /// response carries no next link. A first page that is not an array is
    /// returned untouched. Any page failure fails the whole listing.
    pub async fn get_with_pagination(
        &self,
        path: &str,
        fetch_all: bool,
    ) -> Result<ApiResponse, FizzyError> {
        let mut response = self.get(path).await?;

        if !fetch_all {
            return Ok(response);
        }

        let mut items = match response.data.take() {
            Some(Value::Array(items)) => items,
            other => {
                response.data = other;
                return Ok(response);
            }
        };

        let mut next_url = response.link_next.take();
        let mut followed = 0;

        while let Some(url) = next_url {
            if followed == MAX_FOLLOW_PAGES {
                return Err(FizzyError::general(format!(
                    "Pagination exceeded {MAX_FOLLOW_PAGES} pages"
                )));
            }
            followed += 1;

            debug!("Fetching page {} from {url}", followed + 1);
            let page = self.get(&url).await?;

            if let Some(Value::Array(page_items)) = page.data {
                items.extend(page_items);
            }
            next_url = page.link_next;
        }

        response.data = Some(Value::Array(items));
        Ok(response)
    }
}
