//! Client-side records and drafts for products, storefront links and orders.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schema::FormState;

/// Product as returned by `GET /api/get_products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "prodID")]
    pub id: u64,
    #[serde(rename = "prodName")]
    pub name: String,
    #[serde(rename = "prodDesc", default)]
    pub description: String,
    #[serde(rename = "image", default)]
    pub image: String,
    #[serde(rename = "prodPrice", default)]
    pub price: f64,
    #[serde(rename = "prodCount", default)]
    pub count: u64,
    #[serde(rename = "prodTags", default)]
    pub tags: String,
}

/// Image attached to a product draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSource {
    #[default]
    None,
    /// Freshly picked file, encoded as a `data:` URL.
    DataUrl(String),
    /// Stored image path returned by the backend; never re-uploaded.
    Existing(String),
}

impl ImageSource {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ImageSource::None => None,
            ImageSource::DataUrl(s) | ImageSource::Existing(s) => Some(s.as_str()),
        }
    }
}

/// Editable product fields, as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub count: String,
    pub tags: String,
    pub image: ImageSource,
}

impl ProductDraft {
    /// Translate a list record into form fields.
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            price: format_price(record.price),
            count: record.count.to_string(),
            tags: record.tags.clone(),
            image: if record.image.is_empty() {
                ImageSource::None
            } else {
                ImageSource::Existing(record.image.clone())
            },
        }
    }
}

impl FormState for ProductDraft {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "productName" => Some(&self.name),
            "description" => Some(&self.description),
            "price" => Some(&self.price),
            "count" => Some(&self.count),
            "tags" => Some(&self.tags),
            "image" => self.image.as_str(),
            _ => None,
        }
    }
}

/// `12.5` -> `$12.50`.
pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Strip the currency sign so the backend can parse the amount.
pub fn price_amount(display: &str) -> &str {
    let trimmed = display.trim();
    trimmed.strip_prefix('$').unwrap_or(trimmed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Amazon,
    Pinterest,
    Etsy,
}

impl StoreType {
    pub const ALL: [StoreType; 3] = [StoreType::Amazon, StoreType::Pinterest, StoreType::Etsy];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreType::Amazon => "amazon",
            StoreType::Pinterest => "pinterest",
            StoreType::Etsy => "etsy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StoreType::Amazon => "Amazon Seller Central",
            StoreType::Pinterest => "Pinterest Business",
            StoreType::Etsy => "Etsy",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStoreType(pub String);

impl fmt::Display for UnknownStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown storefront type '{}'", self.0)
    }
}

impl std::error::Error for UnknownStoreType {}

impl FromStr for StoreType {
    type Err = UnknownStoreType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStoreType(s.to_string()))
    }
}

/// Storefront link as returned by `GET /api/get_storefronts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontRecord {
    pub id: u64,
    #[serde(rename = "storeType", default)]
    pub store_type: String,
    #[serde(rename = "storeName", default)]
    pub store_name: String,
    #[serde(rename = "storeId", default)]
    pub store_id: String,
    #[serde(rename = "storeUrl", default)]
    pub store_url: String,
}

impl StorefrontRecord {
    /// Tile heading: the nickname, or the platform when none was given.
    pub fn display_name(&self) -> &str {
        if self.store_name.trim().is_empty() {
            &self.store_type
        } else {
            &self.store_name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorefrontDraft {
    pub store_type: StoreType,
    pub store_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub store_id: String,
    pub store_url: String,
    /// `storeType` as the backend stored it, kept even when it is not one
    /// of [`StoreType::ALL`].
    pub record_type: Option<String>,
}

impl StorefrontDraft {
    /// Translate a list record into form fields. Credentials stay blank.
    pub fn from_record(record: &StorefrontRecord) -> Self {
        Self {
            store_type: record.store_type.parse().unwrap_or_default(),
            store_name: record.store_name.clone(),
            api_key: String::new(),
            api_secret: String::new(),
            store_id: record.store_id.clone(),
            store_url: record.store_url.clone(),
            record_type: Some(record.store_type.clone()).filter(|t| !t.trim().is_empty()),
        }
    }

    /// Nickname sent to the backend; defaults to `<type> Link` when cleared.
    pub fn effective_name(&self) -> String {
        let name = self.store_name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        match &self.record_type {
            Some(raw) => format!("{} Link", raw.trim()),
            None => format!("{} Link", self.store_type),
        }
    }
}

impl FormState for StorefrontDraft {
    fn value(&self, field: &str) -> Option<&str> {
        match field {
            "storeType" => Some(self.store_type.as_str()),
            "storeName" => Some(&self.store_name),
            "apiKey" => Some(&self.api_key),
            "apiSecret" => Some(&self.api_secret),
            "storeId" => Some(&self.store_id),
            "storeUrl" => Some(&self.store_url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Shipped,
    Processing,
    Delivered,
    Pending,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Shipped,
        OrderStatus::Processing,
        OrderStatus::Delivered,
        OrderStatus::Pending,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Processing => "Processing",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Pending => "Pending",
            OrderStatus::Canceled => "Canceled",
        }
    }
}

/// Read-only order line shown in the orders grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order_no: String,
    pub products: String,
    pub total: String,
    pub order_date: String,
    pub status: OrderStatus,
    pub customer: String,
    pub shipping_label: String,
}
