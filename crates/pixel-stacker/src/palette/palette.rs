//! The validated material palette and its memoized combination sets.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::catalog::parse_catalog;
use super::combination::{Combination, SIDE_FACE_SHADE};
use super::error::PaletteError;
use super::material::{Material, MaterialIndex, MaterialLayer};
use crate::options::Options;

/// Ordered, deduplicated set of materials.
///
/// Index 0 always holds air. Everything else keeps catalog order, which is
/// also the order combinations are emitted in and therefore the tie-break
/// order of the color mapper.
///
/// The palette is immutable after construction and is meant to be shared
/// behind an `Arc` across every conversion of a run. Combination sets are
/// computed lazily, once per (view mode, multilayer, shading) triple.
///
/// # Example
///
/// ```
/// use pixel_stacker::{Material, MaterialPalette, Options, Srgb};
///
/// let palette = MaterialPalette::new(vec![
///     Material::solid("RED", 35, 14, Srgb::from_u8(255, 0, 0)),
///     Material::solid("BLUE", 35, 11, Srgb::from_u8(0, 0, 255)),
/// ])
/// .unwrap();
///
/// let combos = palette.valid_combinations(&Options::new()).unwrap();
/// assert_eq!(combos.len(), 2);
/// assert!(combos.iter().all(|c| !c.is_layered()));
/// ```
#[derive(Debug)]
pub struct MaterialPalette {
    materials: Vec<Material>,
    by_id: HashMap<String, MaterialIndex>,
    by_block: HashMap<(u8, u8), MaterialIndex>,
    // Indexed by `combination_key`.
    combinations: [OnceLock<Arc<[Combination]>>; 8],
}

#[inline]
fn combination_key(is_side_view: bool, is_multi_layer: bool, shade: bool) -> usize {
    ((is_side_view as usize) << 2) | ((shade as usize) << 1) | is_multi_layer as usize
}

fn view_name(is_side_view: bool) -> &'static str {
    if is_side_view {
        "side"
    } else {
        "top"
    }
}

impl MaterialPalette {
    /// Validate `materials` and build the palette.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyCatalog`] when no non-air material is given
    /// - [`PaletteError::DuplicateId`] / [`PaletteError::DuplicateBlock`] on
    ///   repeated identifiers
    /// - [`PaletteError::InvalidData`] / [`PaletteError::InvalidOpacity`] on
    ///   out-of-range values
    /// - [`PaletteError::DuplicateAir`] when more than one air entry exists
    pub fn new(materials: Vec<Material>) -> Result<Self, PaletteError> {
        let mut air: Option<Material> = None;
        let mut rest = Vec::with_capacity(materials.len());
        for material in materials {
            if material.layer == MaterialLayer::Air {
                if air.is_some() {
                    return Err(PaletteError::DuplicateAir(material.id));
                }
                air = Some(material);
            } else {
                rest.push(material);
            }
        }
        if rest.is_empty() {
            return Err(PaletteError::EmptyCatalog);
        }

        let mut ordered = Vec::with_capacity(rest.len() + 1);
        ordered.push(air.unwrap_or_else(Material::air));
        ordered.extend(rest);

        if ordered.len() > u16::MAX as usize {
            return Err(PaletteError::TooManyMaterials(ordered.len()));
        }

        let mut by_id = HashMap::with_capacity(ordered.len());
        let mut by_block = HashMap::with_capacity(ordered.len());
        for (i, material) in ordered.iter().enumerate() {
            let index = MaterialIndex(i as u16);
            if material.data > 15 {
                return Err(PaletteError::InvalidData {
                    id: material.id.clone(),
                    data: material.data,
                });
            }
            if !(0.0..=1.0).contains(&material.opacity) {
                return Err(PaletteError::InvalidOpacity {
                    id: material.id.clone(),
                    opacity: material.opacity,
                });
            }
            if by_id.insert(material.id.clone(), index).is_some() {
                return Err(PaletteError::DuplicateId(material.id.clone()));
            }
            if by_block
                .insert((material.block_id, material.data), index)
                .is_some()
            {
                return Err(PaletteError::DuplicateBlock {
                    id: material.id.clone(),
                    block: material.block_id,
                    data: material.data,
                });
            }
        }

        tracing::debug!(materials = ordered.len(), "Material palette built");

        Ok(Self {
            materials: ordered,
            by_id,
            by_block,
            combinations: Default::default(),
        })
    }

    /// Parse a YAML catalog (see the `catalog` module docs for the format).
    pub fn from_yaml(yaml: &str) -> Result<Self, PaletteError> {
        Self::new(parse_catalog(yaml)?)
    }

    /// Number of materials, air included.
    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Always false: construction rejects empty catalogs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    #[inline]
    pub fn get(&self, index: MaterialIndex) -> &Material {
        &self.materials[index.get()]
    }

    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[inline]
    pub fn air(&self) -> MaterialIndex {
        MaterialIndex::AIR
    }

    /// Whether `index` refers to a material of this palette.
    #[inline]
    pub fn contains(&self, index: MaterialIndex) -> bool {
        index.get() < self.materials.len()
    }

    pub fn index_of(&self, id: &str) -> Option<MaterialIndex> {
        self.by_id.get(id).copied()
    }

    /// Look a material up by its legacy block id and data value.
    pub fn find_block(&self, block_id: u8, data: u8) -> Option<MaterialIndex> {
        self.by_block.get(&(block_id, data)).copied()
    }

    /// The admissible combinations for `options`.
    ///
    /// Single-material entries come first in palette order. With multilayer
    /// enabled, every (solid, overlay) pair follows, overlay-major. In side
    /// view with `preprocess.face_shading` set, every effective color is
    /// scaled by [`SIDE_FACE_SHADE`]. The result is memoized and shared.
    ///
    /// # Errors
    ///
    /// [`PaletteError::NoEligibleMaterials`] when no enabled solid exists.
    pub fn valid_combinations(&self, options: &Options) -> Result<Arc<[Combination]>, PaletteError> {
        let shade = options.is_side_view && options.preprocess.face_shading;
        let slot = &self.combinations[combination_key(options.is_side_view, options.is_multi_layer, shade)];
        if let Some(cached) = slot.get() {
            return Ok(Arc::clone(cached));
        }

        let built = self.build_combinations(options.is_side_view, options.is_multi_layer, shade)?;
        // A racing thread may have filled the slot first; both values are equal.
        Ok(Arc::clone(slot.get_or_init(|| built)))
    }

    fn build_combinations(
        &self,
        is_side_view: bool,
        is_multi_layer: bool,
        shade: bool,
    ) -> Result<Arc<[Combination]>, PaletteError> {
        let indexed = || {
            self.materials
                .iter()
                .enumerate()
                .map(|(i, m)| (MaterialIndex(i as u16), m))
        };

        let solids: Vec<(MaterialIndex, &Material)> =
            indexed().filter(|(_, m)| m.is_eligible_solid()).collect();
        if solids.is_empty() {
            return Err(PaletteError::NoEligibleMaterials {
                view: view_name(is_side_view),
            });
        }

        let mut combos: Vec<Combination> = solids
            .iter()
            .map(|&(i, m)| Combination::single(i, m, is_side_view))
            .collect();

        if is_multi_layer {
            for (oi, overlay) in indexed().filter(|(_, m)| m.is_eligible_overlay()) {
                combos.extend(
                    solids
                        .iter()
                        .map(|&(si, solid)| Combination::layered(si, solid, oi, overlay, is_side_view)),
                );
            }
        }

        if shade {
            for combo in &mut combos {
                *combo = combo.shaded(SIDE_FACE_SHADE);
            }
        }

        tracing::debug!(
            view = view_name(is_side_view),
            multilayer = is_multi_layer,
            shaded = shade,
            combinations = combos.len(),
            "Valid combinations built"
        );

        Ok(combos.into())
    }
}
