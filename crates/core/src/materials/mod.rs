//! Materials module - catalog read models and repository traits.

mod materials_model;
mod materials_traits;

pub use materials_model::{CanonicalMaterial, Material, MaterialVariant, SupplierRef};
pub use materials_traits::MaterialRepositoryTrait;
