use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_negative, required};

pub const PRODUCT_NAME_MAX: usize = 100;

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub stock: u32,
}

/// Payload for updating an existing product. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub stock: Option<u32>,
}

/// Catalog listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref().map(str::trim) {
            None | Some("") | Some("All") => true,
            Some(category) => product.category == category,
        };
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
        };
        category_ok && search_ok
    }
}

pub fn validate_product_name(name: &str) -> Result<String, String> {
    let name = required("Product name", name)?;
    if name.chars().count() > PRODUCT_NAME_MAX {
        return Err(format!("Product name cannot exceed {PRODUCT_NAME_MAX} characters"));
    }
    Ok(name)
}

impl Product {
    /// Builds a validated product record.
    pub fn from_params(id: String, params: ProductCreate) -> Result<Self, String> {
        let now = Utc::now();
        Ok(Self {
            id,
            name: validate_product_name(&params.name)?,
            description: required("Description", &params.description)?,
            price: non_negative("Price", params.price)?,
            category: required("Category", &params.category)?,
            image: required("Product image", &params.image)?,
            stock: params.stock,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_patch(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = validate_product_name(&name)?;
        }
        if let Some(description) = patch.description {
            self.description = required("Description", &description)?;
        }
        if let Some(price) = patch.price {
            self.price = non_negative("Price", price)?;
        }
        if let Some(category) = patch.category {
            self.category = required("Category", &category)?;
        }
        if let Some(image) = patch.image {
            self.image = required("Product image", &image)?;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_product(id: &str, category: &str, price: f64, stock: u32) -> Product {
    let now = Utc::now();
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: "A sample product".to_string(),
        price,
        category: category.to_string(),
        image: "https://img.example/p.png".to_string(),
        stock,
        created_at: now,
        updated_at: now,
    }
}
