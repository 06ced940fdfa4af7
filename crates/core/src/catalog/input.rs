use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::product::{NewProduct, ProductPatch};
use crate::errors::CatalogError;

/// Raw product fields as received from a caller.
///
/// Each field is `None` when the key was absent and `Some(value)` when it
/// was present, including an explicit `null`. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProductInput {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub stock: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ProductInput {
    pub fn from_json(value: Value) -> Result<Self, CatalogError> {
        if !value.is_object() {
            return Err(CatalogError::validation("request body must be a JSON object"));
        }
        serde_json::from_value(value)
            .map_err(|error| CatalogError::validation(format!("invalid product payload: {error}")))
    }

    pub fn into_new_product(self) -> Result<NewProduct, CatalogError> {
        Ok(NewProduct {
            name: text("name", required("name", self.name)?)?,
            category: text("category", required("category", self.category)?)?,
            description: text("description", required("description", self.description)?)?,
            price: price(required("price", self.price)?)?,
            stock: stock(required("stock", self.stock)?)?,
        })
    }

    /// Fails when no recognised field is present, or when any present field
    /// is invalid. Nothing is partially accepted.
    pub fn into_patch(self) -> Result<ProductPatch, CatalogError> {
        let patch = ProductPatch {
            name: self.name.map(|value| text("name", value)).transpose()?,
            category: self.category.map(|value| text("category", value)).transpose()?,
            description: self.description.map(|value| text("description", value)).transpose()?,
            price: self.price.map(price).transpose()?,
            stock: self.stock.map(stock).transpose()?,
        };

        if patch.is_empty() {
            return Err(CatalogError::validation("no fields to update"));
        }
        Ok(patch)
    }
}

fn required(field: &str, value: Option<Value>) -> Result<Value, CatalogError> {
    value.ok_or_else(|| CatalogError::validation(format!("{field} is required")))
}

fn text(field: &str, value: Value) -> Result<String, CatalogError> {
    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(CatalogError::validation(format!("{field} must not be empty")))
            } else {
                Ok(trimmed.to_string())
            }
        }
        _ => Err(CatalogError::validation(format!("{field} must be a string"))),
    }
}

fn price(value: Value) -> Result<f64, CatalogError> {
    let parsed = match &value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|price| price.is_finite() && *price >= 0.0)
        .ok_or_else(|| CatalogError::validation("price must be a non-negative number"))
}

fn stock(value: Value) -> Result<u64, CatalogError> {
    let parsed = match &value {
        // `u64::MAX as f64` rounds up to 2^64, so the upper bound is exclusive.
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|count| count.fract() == 0.0 && (0.0..u64::MAX as f64).contains(count))
                .map(|count| count as u64)
        }),
        Value::String(raw) => raw.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| CatalogError::validation("stock must be a non-negative integer"))
}
