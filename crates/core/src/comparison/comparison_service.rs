use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{BestValue, ComparisonEntry, MaterialComparison, PriceRange, VariantStatistics};
use crate::errors::Result;
use crate::materials::{Material, MaterialRepositoryTrait};

/// Compares supplier offers for equivalent materials and picks a best
/// value.
///
/// Grouping prefers explicit canonical-variant links; materials without
/// one fall back to same-category siblings, which is a heuristic and
/// can group non-equivalent products.
pub struct ComparisonService {
    materials: Arc<dyn MaterialRepositoryTrait>,
}

impl ComparisonService {
    pub fn new(materials: Arc<dyn MaterialRepositoryTrait>) -> Self {
        Self { materials }
    }

    /// Compare `material_id` against its group. `Ok(None)` when the
    /// material does not exist; a lone material compares against itself
    /// with no best-value pick.
    pub async fn compare(&self, material_id: &str) -> Result<Option<MaterialComparison>> {
        let Some(material) = self.materials.get_by_id(material_id).await? else {
            return Ok(None);
        };

        let mut entries = self.grouping(&material).await?;
        if entries.len() <= 1 {
            return Ok(Some(MaterialComparison {
                material_id: material.id.clone(),
                name: material.name.clone(),
                entries: vec![ComparisonEntry::from(&material)],
                price_range: PriceRange {
                    min: material.price,
                    max: material.price,
                    avg: material.price,
                },
                best_value: None,
            }));
        }

        // ascending by price, offers without a price at the end;
        // stable so equal prices keep repository order
        entries.sort_by(|a, b| match (a.price, b.price) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        let price_range = price_range(&entries);
        let best_value = best_value(&entries);

        Ok(Some(MaterialComparison {
            material_id: material.id,
            name: material.name,
            entries,
            price_range,
            best_value,
        }))
    }

    /// Price spread over a canonical material's variants. Zeroed when
    /// the canonical has none.
    pub async fn statistics(&self, canonical_id: &str) -> Result<VariantStatistics> {
        let variants = self.materials.variants_for_canonical(canonical_id).await?;
        let prices: Vec<Decimal> = variants.iter().filter_map(|v| v.price).collect();
        if prices.is_empty() {
            return Ok(VariantStatistics {
                variant_count: variants.len(),
                ..VariantStatistics::default()
            });
        }

        let sum: Decimal = prices.iter().sum();
        Ok(VariantStatistics {
            min_price: prices.iter().copied().min().unwrap_or_default(),
            max_price: prices.iter().copied().max().unwrap_or_default(),
            avg_price: (sum / Decimal::from(prices.len() as u64)).round_dp(2),
            variant_count: variants.len(),
        })
    }

    async fn grouping(&self, material: &Material) -> Result<Vec<ComparisonEntry>> {
        if let Some(variant) = self.materials.variant_for_material(&material.id).await? {
            let variants = self
                .materials
                .variants_for_canonical(&variant.canonical_material_id)
                .await?;
            return Ok(variants.iter().map(ComparisonEntry::from).collect());
        }

        debug!(
            "material '{}' has no canonical variant, grouping by category",
            material.id
        );
        let mut siblings = match &material.category {
            Some(category) => self.materials.list_by_category(category).await?,
            None => vec![],
        };
        if !siblings.iter().any(|m| m.id == material.id) {
            siblings.push(material.clone());
        }
        Ok(siblings.iter().map(ComparisonEntry::from).collect())
    }
}

fn price_range(entries: &[ComparisonEntry]) -> PriceRange {
    let prices: Vec<Decimal> = entries.iter().filter_map(|e| e.price).collect();
    if prices.is_empty() {
        return PriceRange {
            min: None,
            max: None,
            avg: None,
        };
    }
    let sum: Decimal = prices.iter().sum();
    PriceRange {
        min: prices.iter().copied().min(),
        max: prices.iter().copied().max(),
        avg: Some((sum / Decimal::from(prices.len() as u64)).round_dp(2)),
    }
}

/// Weighted value score: price dominates, lead time and availability
/// break the rest. Highest score wins; ties keep the earlier entry.
fn score(entry: &ComparisonEntry) -> f64 {
    let mut total = 0.0;
    if let Some(price) = entry.price.and_then(|p| p.to_f64()) {
        if price > 0.0 {
            total += 50.0 / price;
        }
    }
    total += match entry.lead_time_days.unwrap_or(999) {
        d if d < 7 => 30.0,
        d if d < 14 => 20.0,
        d if d < 30 => 10.0,
        _ => 0.0,
    };
    total += match entry.availability.as_deref() {
        Some("in_stock") => 20.0,
        Some("limited_stock") => 10.0,
        _ => 0.0,
    };
    total
}

fn best_value(entries: &[ComparisonEntry]) -> Option<BestValue> {
    let mut best: Option<(&ComparisonEntry, f64)> = None;
    for entry in entries {
        let s = score(entry);
        match best {
            Some((_, top)) if s <= top => {}
            _ => best = Some((entry, s)),
        }
    }
    let (winner, winner_score) = best?;

    let min_price = entries.iter().filter_map(|e| e.price).min();
    let min_lead = entries.iter().filter_map(|e| e.lead_time_days).min();

    let mut reasons = Vec::new();
    if winner.price.is_some() && winner.price == min_price {
        reasons.push("Lowest price");
    }
    if winner.lead_time_days.is_some() && winner.lead_time_days == min_lead {
        reasons.push("Fastest delivery");
    }
    if winner.availability.as_deref() == Some("in_stock") {
        reasons.push("Available now");
    }
    let reasons = if reasons.is_empty() {
        "Best overall value".to_string()
    } else {
        reasons.join(", ")
    };

    Some(BestValue {
        material_id: winner.material_id.clone(),
        score: winner_score,
        reasons,
    })
}
