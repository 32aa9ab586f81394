//! Product Model

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// How a product is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Discrete count
    #[serde(rename = "UN")]
    Un,
    /// Continuous weight in kilograms
    #[serde(rename = "KG")]
    Kg,
}

/// A named portion of a weight-sold product (e.g. "Pote P")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    #[serde(rename = "nome")]
    pub name: String,
    /// Weight of a single portion. Stored unit is canonical kilograms.
    #[serde(rename = "pesoKg")]
    pub unit_weight_kg: f64,
}

impl Variation {
    pub fn new(name: impl Into<String>, unit_weight_kg: f64) -> Self {
        Self {
            name: name.into(),
            unit_weight_kg,
        }
    }

    /// The form layer collects portion weights in grams; convert on save.
    pub fn from_grams(name: impl Into<String>, grams: f64) -> Self {
        Self::new(name, grams / 1000.0)
    }

    /// Portion weight in grams, for pre-filling the edit form.
    pub fn grams(&self) -> f64 {
        self.unit_weight_kg * 1000.0
    }

    /// A row is usable only with a non-empty name and a positive finite weight.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.unit_weight_kg.is_finite() && self.unit_weight_kg > 0.0
    }
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend-assigned identifier, immutable once created
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nome")]
    pub name: String,
    /// Count for `UN` products, total kilograms for `KG` products
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(rename = "unidadeDeMedida")]
    pub unit: Unit,
    /// Present only for `KG` products sold in named portions
    #[serde(rename = "variacoes", default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<Variation>,
}

impl Product {
    /// Derive the product's variant from `unit` plus the presence of
    /// variations. Computed here once so callers match exhaustively
    /// instead of re-deriving the combination at every call site.
    pub fn variant(&self) -> ProductVariant<'_> {
        match self.unit {
            Unit::Un => ProductVariant::Unit,
            Unit::Kg if self.variations.is_empty() => ProductVariant::BulkWeight,
            Unit::Kg => ProductVariant::Portioned(&self.variations),
        }
    }

    /// Look up a variation by exact, case-sensitive name.
    pub fn find_variation(&self, name: &str) -> Option<&Variation> {
        self.variations.iter().find(|v| v.name == name)
    }
}

/// Derived product variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductVariant<'a> {
    /// Sold by discrete count
    Unit,
    /// Sold by continuous weight, no sub-portions
    BulkWeight,
    /// Sold by weight, packaged into named portions
    Portioned(&'a [Variation]),
}

impl ProductVariant<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::BulkWeight => "bulk weight",
            Self::Portioned(_) => "portioned",
        }
    }
}

/// Create/replace payload. The backend assigns `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: f64,
    #[serde(rename = "unidadeDeMedida")]
    pub unit: Unit,
    #[serde(rename = "variacoes", default, skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<Variation>,
}

impl ProductDraft {
    /// Draft for a unit-counted product.
    pub fn unit(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: Unit::Un,
            variations: Vec::new(),
        }
    }

    /// Draft for a bulk-weight product (total kilograms in stock).
    pub fn bulk_kg(name: impl Into<String>, quantity_kg: f64) -> Self {
        Self {
            name: name.into(),
            quantity: quantity_kg,
            unit: Unit::Kg,
            variations: Vec::new(),
        }
    }

    /// Draft for a weight product sold in named portions.
    pub fn portioned_kg(
        name: impl Into<String>,
        quantity_kg: f64,
        variations: Vec<Variation>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity_kg,
            unit: Unit::Kg,
            variations,
        }
    }

    /// Validate and normalize the draft before it goes on the wire.
    ///
    /// Invalid variation rows are dropped. A portioned draft where no row
    /// survives is rejected; variations on a `UN` draft are meaningless
    /// and are cleared.
    pub fn validate(mut self) -> Result<Self, DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidDraft("name must not be empty".into()));
        }
        if !self.quantity.is_finite() {
            return Err(DomainError::InvalidDraft(
                "quantity must be a finite number".into(),
            ));
        }
        match self.unit {
            Unit::Un => self.variations.clear(),
            Unit::Kg => {
                let had_rows = !self.variations.is_empty();
                self.variations.retain(Variation::is_valid);
                if had_rows && self.variations.is_empty() {
                    return Err(DomainError::InvalidDraft(
                        "at least one valid portion is required".into(),
                    ));
                }
            }
        }
        Ok(self)
    }
}
