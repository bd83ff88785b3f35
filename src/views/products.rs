use tokio_util::sync::CancellationToken;

use super::{fetch_collection, Collection, EmptyState, ListView};
use crate::api::{ApiError, ApiRequest, ApiTransport};
use crate::forms::ProductForm;
use crate::model::{format_price, ProductRecord};

pub const GET_PRODUCTS: &str = "/api/get_products";
pub const GET_PRODUCT_IMAGE: &str = "/api/get_product_image";

pub struct Products;

impl Collection for Products {
    type Record = ProductRecord;
    type Form = ProductForm;

    const ENDPOINT: &'static str = GET_PRODUCTS;
    const EMPTY: EmptyState = EmptyState {
        message: "No products yet.",
        action: "Add a product to get started",
    };

    fn id(record: &ProductRecord) -> u64 {
        record.id
    }

    fn create_form() -> ProductForm {
        ProductForm::create()
    }

    fn edit_form(record: &ProductRecord) -> ProductForm {
        ProductForm::edit(record)
    }
}

pub type ProductsView = ListView<Products>;

/// What a product tile shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTile {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub count: u64,
    pub image: Option<String>,
}

impl From<&ProductRecord> for ProductTile {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            price: format_price(record.price),
            count: record.count,
            image: (!record.image.is_empty()).then(|| record.image.clone()),
        }
    }
}

impl ListView<Products> {
    pub fn tiles(&self) -> Vec<ProductTile> {
        self.items().iter().map(ProductTile::from).collect()
    }
}

/// Fetch products without the view, e.g. for the dashboard.
pub async fn fetch_products(
    api: &dyn ApiTransport,
    cancel: &CancellationToken,
) -> Vec<ProductRecord> {
    fetch_collection(api, GET_PRODUCTS, cancel).await
}

/// Download the stored image behind a product tile.
pub async fn fetch_product_image(
    api: &dyn ApiTransport,
    image: &str,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, ApiError> {
    let request = ApiRequest::get(GET_PRODUCT_IMAGE).with_query("image", image);
    let response = api.send(request, cancel).await?;
    if !response.status.is_success() {
        return Err(ApiError::Status {
            status: response.status,
            body: response.text(),
        });
    }
    Ok(response.body)
}
