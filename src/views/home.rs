use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::orders::sample_orders;
use super::products::fetch_products;
use super::storefronts::fetch_storefronts;
use crate::api::ApiTransport;
use crate::model::{OrderRow, ProductRecord, StorefrontRecord};

pub const PRODUCT_PREVIEW: usize = 3;
pub const STOREFRONT_PREVIEW: usize = 3;
pub const ORDER_PREVIEW: usize = 5;

/// Dashboard: a short preview of each section.
#[derive(Debug, Clone, Default)]
pub struct Home {
    pub products: Vec<ProductRecord>,
    pub storefronts: Vec<StorefrontRecord>,
    pub orders: Vec<OrderRow>,
}

impl Home {
    /// Run the three fetches side by side and keep the first few of each.
    #[instrument(skip_all)]
    pub async fn load(api: &dyn ApiTransport, cancel: &CancellationToken) -> Self {
        let (mut products, mut storefronts) =
            tokio::join!(fetch_products(api, cancel), fetch_storefronts(api, cancel));
        products.truncate(PRODUCT_PREVIEW);
        storefronts.truncate(STOREFRONT_PREVIEW);
        Self {
            products,
            storefronts,
            orders: sample_orders(ORDER_PREVIEW),
        }
    }
}
