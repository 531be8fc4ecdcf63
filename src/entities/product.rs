//! Products screen

use crate::core::comparator::{SortKind, SortSpec};
use crate::core::pipeline::{ListDescriptor, Tab};
use crate::core::validation::{FormModel, ImageUpload, filters, validate_image};
use crate::export::ExportColumns;
use serde_json::{Value, json};
use validator::Validate;

crate::impl_entity!(Product, "products", "product", {
    name: String,
    #[serde(deserialize_with = "crate::entities::de::number")]
    price: f64,
    #[serde(default)]
    category: String,
    #[serde(default, deserialize_with = "crate::entities::de::count")]
    stock: i64,
    #[serde(default = "crate::entities::product::default_active")]
    active: bool,
    #[serde(default)]
    image_url: Option<String>,
});

pub(crate) fn default_active() -> bool {
    true
}

impl Product {
    pub fn descriptor() -> ListDescriptor {
        ListDescriptor::new("products")
            .search(["name", "category"])
            .select("category")
            .select_with_options("active", ["true", "false"])
            .sort("name", SortKind::Text)
            .sort("price", SortKind::Numeric)
            .sort("stock", SortKind::Numeric)
            .tabs(
                "active",
                vec![
                    Tab::all("all", "All"),
                    Tab::new("active", "Active", "true"),
                    Tab::new("inactive", "Inactive", "false"),
                ],
            )
            .default_sort(SortSpec::asc("name"))
    }

    pub fn export_columns() -> ExportColumns {
        ExportColumns::new()
            .column("id", "ID")
            .column("name", "Name")
            .column("category", "Category")
            .column("price", "Price")
            .column("stock", "Stock")
            .column("active", "Active")
    }
}

/// Create/edit form for a product
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: f64,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i64,

    pub category: String,

    pub active: bool,

    /// File picked for upload; the upload itself happens elsewhere
    #[validate(custom(function = "validate_image"))]
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    pub fn new() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    pub fn for_edit(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            category: product.category.clone(),
            active: product.active,
            image: None,
        }
    }
}

impl FormModel for ProductForm {
    fn normalize(&mut self) {
        self.name = filters::trim(&self.name);
        self.category = filters::trim(&self.category);
        self.price = filters::round_decimals(self.price, 2);
    }

    fn to_payload(&self) -> Value {
        let mut payload = json!({
            "name": self.name,
            "price": self.price,
            "stock": self.stock,
            "category": self.category,
            "active": self.active,
        });
        if let Some(image) = &self.image {
            payload["image"] = json!(image.file_name);
        }
        payload
    }
}
