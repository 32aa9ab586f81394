//! Stock mutation payloads
//!
//! [`MutationPayload`] is the body of the backend's partial-update
//! (PATCH) endpoint, tagged exactly the way the backend expects:
//! `{"tipo": "UN" | "KG" | "VARIACAO", "valor": ...}`.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

use super::product::{Product, ProductVariant};

/// Partial-update payload for a single stock change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "valor")]
pub enum MutationPayload {
    /// Signed count delta for a unit-counted product
    #[serde(rename = "UN")]
    Un(i64),
    /// Signed weight delta in kilograms, negative for a sale
    #[serde(rename = "KG")]
    Kg(f64),
    /// Portion sale by variation name
    #[serde(rename = "VARIACAO")]
    Variacao {
        #[serde(rename = "nome")]
        name: String,
        #[serde(rename = "quantidade")]
        count: u32,
    },
}

impl MutationPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Un(_) => "UN",
            Self::Kg(_) => "KG",
            Self::Variacao { .. } => "VARIACAO",
        }
    }

    /// Compute the quantity this payload produces on `product`.
    ///
    /// `Un` and `Kg` add their signed delta; `Variacao` subtracts
    /// `unit_weight_kg * count` for the named variation. No stock floor
    /// is enforced, so the result may go negative.
    pub fn apply_to(&self, product: &Product) -> Result<f64, DomainError> {
        match (self, product.variant()) {
            (Self::Un(delta), ProductVariant::Unit) => Ok(product.quantity + *delta as f64),
            (Self::Kg(delta), ProductVariant::BulkWeight) => Ok(product.quantity + delta),
            (Self::Variacao { name, count }, ProductVariant::Portioned(_)) => {
                let variation = product
                    .find_variation(name)
                    .ok_or_else(|| DomainError::UnknownVariation { name: name.clone() })?;
                Ok(product.quantity - variation.unit_weight_kg * f64::from(*count))
            }
            (payload, variant) => Err(DomainError::VariantMismatch {
                intent: payload.kind(),
                variant: variant.label(),
            }),
        }
    }
}

/// A validated, backend-ready description of a stock change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRequest {
    pub product_id: String,
    pub payload: MutationPayload,
}
