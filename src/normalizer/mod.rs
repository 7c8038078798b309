use html_escape::decode_html_entities;
use serde::Deserialize;

use crate::app::Result;
use crate::domain::Item;

#[derive(Debug, Default, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Option<ListingData>,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    selftext: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
}

/// Turns a listing body (`{ data: { children: [ { data: {..} } ] } }`)
/// into items, keeping listing order.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<Item>> {
        let listing: Listing = serde_json::from_slice(body)?;

        let children = listing
            .data
            .and_then(|d| d.children)
            .unwrap_or_default();

        let items = children
            .into_iter()
            .filter_map(|child| match serde_json::from_value::<Child>(child) {
                Ok(child) => Some(child.data),
                Err(e) => {
                    tracing::debug!("Dropping malformed listing child: {}", e);
                    None
                }
            })
            .map(|post| Item {
                id: post.id.filter(|id| !id.is_empty()),
                title: post.title.map(|t| decode_html_entities(&t).to_string()),
                body: post
                    .selftext
                    .filter(|s| !s.is_empty())
                    .map(|s| decode_html_entities(&s).to_string()),
                permalink: post.permalink.filter(|p| !p.is_empty()),
            })
            .collect();

        Ok(items)
    }
}
