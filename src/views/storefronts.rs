use tokio_util::sync::CancellationToken;

use super::{fetch_collection, Collection, EmptyState, ListView};
use crate::api::ApiTransport;
use crate::forms::StorefrontForm;
use crate::model::StorefrontRecord;

pub const GET_STOREFRONTS: &str = "/api/get_storefronts";

pub struct Storefronts;

impl Collection for Storefronts {
    type Record = StorefrontRecord;
    type Form = StorefrontForm;

    const ENDPOINT: &'static str = GET_STOREFRONTS;
    const EMPTY: EmptyState = EmptyState {
        message: "No storefronts linked yet.",
        action: "Link a storefront to get started",
    };

    fn id(record: &StorefrontRecord) -> u64 {
        record.id
    }

    fn create_form() -> StorefrontForm {
        StorefrontForm::create()
    }

    fn edit_form(record: &StorefrontRecord) -> StorefrontForm {
        StorefrontForm::edit(record)
    }
}

pub type StorefrontsView = ListView<Storefronts>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontTile {
    pub id: u64,
    pub title: String,
    pub store_type: String,
}

impl ListView<Storefronts> {
    pub fn tiles(&self) -> Vec<StorefrontTile> {
        self.items()
            .iter()
            .map(|s| StorefrontTile {
                id: s.id,
                title: s.display_name().to_string(),
                store_type: s.store_type.clone(),
            })
            .collect()
    }
}

pub async fn fetch_storefronts(
    api: &dyn ApiTransport,
    cancel: &CancellationToken,
) -> Vec<StorefrontRecord> {
    fetch_collection(api, GET_STOREFRONTS, cancel).await
}
