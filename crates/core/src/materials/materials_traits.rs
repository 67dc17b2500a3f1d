use async_trait::async_trait;

use super::{Material, MaterialVariant};
use crate::errors::Result;

/// Read access to the material catalog and its variant groupings.
#[async_trait]
pub trait MaterialRepositoryTrait: Send + Sync {
    async fn get_by_id(&self, material_id: &str) -> Result<Option<Material>>;

    /// Exact-name lookup, used to match fetched price records to
    /// catalog materials.
    async fn find_by_name(&self, name: &str) -> Result<Option<Material>>;

    async fn list_by_category(&self, category: &str) -> Result<Vec<Material>>;

    /// Materials that currently carry a price.
    async fn list_priced(&self) -> Result<Vec<Material>>;

    /// The variant row linking `material_id` into a canonical group,
    /// when one exists.
    async fn variant_for_material(&self, material_id: &str) -> Result<Option<MaterialVariant>>;

    async fn variants_for_canonical(&self, canonical_id: &str) -> Result<Vec<MaterialVariant>>;
}
