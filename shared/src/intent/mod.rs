//! Sale intents and the mutation resolver
//!
//! The presentation layer forwards user gestures as [`SaleIntent`]s.
//! [`resolve`] turns one into a validated [`MutationRequest`] for the
//! sync client, or a rejection the UI can surface. Pure function of
//! (product, intent); no side effects, so it is testable without any
//! network or rendering in the loop.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::models::{MutationPayload, MutationRequest, Product, ProductVariant};

/// A user-originated sale gesture, pre-validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SaleIntent {
    /// Restock one unit
    Increment,
    /// Sell one unit
    Decrement,
    /// Sell a weighed amount of a bulk product
    SellWeight {
        #[serde(rename = "amount")]
        amount_kg: f64,
    },
    /// Sell one named portion
    SellVariation {
        #[serde(rename = "variationName")]
        name: String,
    },
}

impl SaleIntent {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::SellWeight { .. } => "sell-weight",
            Self::SellVariation { .. } => "sell-variation",
        }
    }
}

/// Resolve an intent against the product's current state.
///
/// Validation rules:
/// - `Increment`/`Decrement` apply only to unit-counted products.
/// - `SellWeight` applies only to bulk-weight products and requires a
///   positive finite amount.
/// - `SellVariation` applies only to portioned products and requires an
///   exact, case-sensitive name match.
pub fn resolve(product: &Product, intent: &SaleIntent) -> Result<MutationRequest, DomainError> {
    let product_id = product.id.clone().ok_or(DomainError::MissingId)?;

    let payload = match (intent, product.variant()) {
        (SaleIntent::Increment, ProductVariant::Unit) => MutationPayload::Un(1),
        (SaleIntent::Decrement, ProductVariant::Unit) => MutationPayload::Un(-1),
        (SaleIntent::SellWeight { amount_kg }, ProductVariant::BulkWeight) => {
            if !amount_kg.is_finite() || *amount_kg <= 0.0 {
                return Err(DomainError::InvalidAmount(amount_kg.to_string()));
            }
            MutationPayload::Kg(-amount_kg)
        }
        (SaleIntent::SellVariation { name }, ProductVariant::Portioned(_)) => {
            if product.find_variation(name).is_none() {
                return Err(DomainError::UnknownVariation { name: name.clone() });
            }
            MutationPayload::Variacao {
                name: name.clone(),
                count: 1,
            }
        }
        (intent, variant) => {
            return Err(DomainError::VariantMismatch {
                intent: intent.label(),
                variant: variant.label(),
            });
        }
    };

    Ok(MutationRequest {
        product_id,
        payload,
    })
}
