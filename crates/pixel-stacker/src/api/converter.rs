//! Converter -- the single-image entry point of the crate.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::buffer::PixelBuffer;
use crate::mapper::{ColorMapper, KdTreeMapper};
use crate::options::Options;
use crate::palette::MaterialPalette;
use crate::render::{build_pool, CancelToken, RenderEngine, RenderedCanvas};
use crate::schematic::{ProjectData, SchematicExporter};

use super::ConvertError;

/// Converts pixel buffers into schematics for one set of [`Options`].
///
/// Construction builds the combination set, seeds the color mapper and,
/// for `options.threads > 0`, starts the render thread pool once.
/// All conversion methods take `&self`, so a converter is reused for every
/// image of a batch and may be shared across threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pixel_stacker::{Converter, Material, MaterialPalette, Options, PixelBuffer, Rgba, Srgb};
///
/// let palette = MaterialPalette::new(vec![
///     Material::solid("WHITE", 35, 0, Srgb::from_u8(233, 236, 236)),
///     Material::solid("BLACK", 35, 15, Srgb::from_u8(20, 21, 25)),
/// ])
/// .unwrap();
/// let converter = Converter::new(Arc::new(palette), Options::new()).unwrap();
///
/// let image = PixelBuffer::filled(4, 3, Rgba::opaque(10, 10, 10));
/// let canvas = converter.render(&image).unwrap();
/// assert_eq!(canvas.material_counts(converter.palette())["BLACK"], 12);
///
/// let bytes = converter.convert(&image).unwrap();
/// assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
/// ```
pub struct Converter {
    palette: Arc<MaterialPalette>,
    options: Options,
    mapper: Box<dyn ColorMapper>,
    pool: Option<rayon::ThreadPool>,
}

impl Converter {
    /// Build a converter backed by a [`KdTreeMapper`] using `options.metric`.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::Configuration`] when the palette has no eligible
    ///   material for the requested view mode
    /// - [`ConvertError::Render`] when the render thread pool can't be started
    pub fn new(palette: Arc<MaterialPalette>, options: Options) -> Result<Self, ConvertError> {
        let mapper = KdTreeMapper::new(options.metric);
        Self::with_mapper(palette, options, mapper)
    }

    /// Build a converter around a caller-provided mapper, seeding it first.
    pub fn with_mapper(
        palette: Arc<MaterialPalette>,
        options: Options,
        mut mapper: impl ColorMapper + 'static,
    ) -> Result<Self, ConvertError> {
        let combinations = palette.valid_combinations(&options)?;
        mapper.set_seed_data(combinations, &palette, options.is_side_view);
        if !mapper.is_seeded() {
            return Err(ConvertError::NotSeeded);
        }
        let pool = build_pool(options.threads)?;
        Ok(Self {
            palette,
            options,
            mapper: Box::new(mapper),
            pool,
        })
    }

    #[inline]
    pub fn palette(&self) -> &Arc<MaterialPalette> {
        &self.palette
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn mapper(&self) -> &dyn ColorMapper {
        self.mapper.as_ref()
    }

    /// Render `image` into a canvas.
    pub fn render(&self, image: &PixelBuffer) -> Result<RenderedCanvas, ConvertError> {
        self.render_cancellable(image, &CancelToken::new())
    }

    /// Render `image`, giving up with [`RenderError::Cancelled`](crate::RenderError::Cancelled)
    /// once `cancel` fires.
    pub fn render_cancellable(
        &self,
        image: &PixelBuffer,
        cancel: &CancelToken,
    ) -> Result<RenderedCanvas, ConvertError> {
        let started = Instant::now();
        let canvas = RenderEngine::render_canvas_in(
            image,
            self.mapper(),
            &self.palette,
            &self.options,
            self.pool.as_ref(),
            cancel,
        )?;
        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            overlays = canvas.has_overlays(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Canvas rendered"
        );
        Ok(canvas)
    }

    /// Serialize a canvas produced by this converter.
    pub fn export(&self, canvas: &RenderedCanvas) -> Result<Vec<u8>, ConvertError> {
        let project = ProjectData::new(canvas, &self.options, &self.palette);
        Ok(SchematicExporter::to_bytes(&project)?)
    }

    /// Serialize a canvas and write it atomically to `path`.
    pub fn export_to_file(&self, canvas: &RenderedCanvas, path: &Path) -> Result<(), ConvertError> {
        let project = ProjectData::new(canvas, &self.options, &self.palette);
        Ok(SchematicExporter::export(path, &project)?)
    }

    /// Render and serialize in one step.
    pub fn convert(&self, image: &PixelBuffer) -> Result<Vec<u8>, ConvertError> {
        let canvas = self.render(image)?;
        self.export(&canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgba, Srgb};
    use crate::mapper::{LinearScanMapper, MapperError};
    use crate::palette::{Combination, Material, PaletteError};
    use crate::render::RenderError;
    use crate::schematic::read_schematic;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread::ThreadId;

    fn palette() -> Arc<MaterialPalette> {
        Arc::new(
            MaterialPalette::new(vec![
                Material::solid("WHITE", 35, 0, Srgb::from_u8(233, 236, 236)),
                Material::solid("BLACK", 35, 15, Srgb::from_u8(20, 21, 25)),
                Material::overlay("GLASS_BLUE", 95, 11, Srgb::from_u8(51, 76, 178), 0.5),
            ])
            .unwrap(),
        )
    }

    /// Accepts seed data but never reports itself seeded.
    struct NeverSeeded;

    impl ColorMapper for NeverSeeded {
        fn set_seed_data(&mut self, _: Arc<[Combination]>, _: &MaterialPalette, _: bool) {}

        fn is_seeded(&self) -> bool {
            false
        }

        fn find_nearest(&self, _: Rgba) -> Result<Combination, MapperError> {
            Err(MapperError::NotSeeded)
        }
    }

    #[test]
    fn test_convert_round_trip() {
        let converter = Converter::new(palette(), Options::new().multi_layer(true)).unwrap();
        let image = PixelBuffer::filled(5, 4, Rgba::opaque(200, 200, 200));
        let canvas = converter.render(&image).unwrap();
        let bytes = converter.export(&canvas).unwrap();
        let parsed = read_schematic(&bytes, converter.palette()).unwrap();
        assert_eq!(parsed.canvas, canvas);
        assert_eq!(converter.convert(&image).unwrap(), bytes);
    }

    #[test]
    fn test_custom_mapper() {
        let converter =
            Converter::with_mapper(palette(), Options::new(), LinearScanMapper::default()).unwrap();
        let canvas = converter.render(&PixelBuffer::filled(2, 2, Rgba::opaque(0, 0, 0))).unwrap();
        assert_eq!(canvas.material_counts(converter.palette())["BLACK"], 4);
    }

    #[test]
    fn test_unseeded_mapper_is_rejected() {
        let result = Converter::with_mapper(palette(), Options::new(), NeverSeeded);
        assert!(matches!(result, Err(ConvertError::NotSeeded)));
    }

    #[test]
    fn test_configuration_error() {
        let only_glass = Arc::new(
            MaterialPalette::new(vec![Material::overlay("G", 95, 0, Srgb::from_u8(255, 255, 255), 0.5)])
                .unwrap(),
        );
        let result = Converter::new(only_glass, Options::new());
        assert!(matches!(
            result,
            Err(ConvertError::Configuration(PaletteError::NoEligibleMaterials { .. }))
        ));
    }

    #[test]
    fn test_empty_image_is_a_render_error() {
        let converter = Converter::new(palette(), Options::new()).unwrap();
        let image = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        assert!(matches!(
            converter.convert(&image),
            Err(ConvertError::Render(RenderError::EmptyImage { .. }))
        ));
    }

    /// Records which threads answered lookups.
    struct ThreadRecorder {
        inner: LinearScanMapper,
        threads: Arc<Mutex<HashSet<ThreadId>>>,
    }

    impl ColorMapper for ThreadRecorder {
        fn set_seed_data(&mut self, combos: Arc<[Combination]>, palette: &MaterialPalette, side: bool) {
            self.inner.set_seed_data(combos, palette, side);
        }

        fn is_seeded(&self) -> bool {
            self.inner.is_seeded()
        }

        fn find_nearest(&self, color: Rgba) -> Result<Combination, MapperError> {
            self.threads.lock().unwrap().insert(std::thread::current().id());
            self.inner.find_nearest(color)
        }
    }

    #[test]
    fn test_thread_pool_is_reused_across_renders() {
        let threads = Arc::new(Mutex::new(HashSet::new()));
        let recorder = ThreadRecorder {
            inner: LinearScanMapper::default(),
            threads: Arc::clone(&threads),
        };
        let converter = Converter::with_mapper(palette(), Options::new().threads(2), recorder).unwrap();
        assert_eq!(converter.pool.as_ref().map(|p| p.current_num_threads()), Some(2));

        let image = PixelBuffer::filled(8, 32, Rgba::opaque(0, 0, 0));
        let first = converter.render(&image).unwrap();
        for _ in 0..4 {
            assert_eq!(converter.render(&image).unwrap(), first);
        }
        // A fresh pool per render would bring new worker threads each time.
        let seen = threads.lock().unwrap().len();
        assert!((1..=2).contains(&seen), "{seen} threads");

        let global = Converter::new(palette(), Options::new()).unwrap();
        assert!(global.pool.is_none());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.schematic");
        let converter = Converter::new(palette(), Options::new()).unwrap();
        let canvas = converter.render(&PixelBuffer::filled(3, 3, Rgba::opaque(240, 240, 240))).unwrap();
        converter.export_to_file(&canvas, &path).unwrap();
        let parsed = read_schematic(&std::fs::read(&path).unwrap(), converter.palette()).unwrap();
        assert_eq!(parsed.canvas, canvas);
    }
}
