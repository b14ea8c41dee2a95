//! Preprocess, map and assemble the canvas.

use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::mapper::{ColorMapper, MapperError};
use crate::options::Options;
use crate::palette::MaterialPalette;
use crate::preprocess::Preprocessor;

use super::{CancelToken, Cell, RenderError, RenderedCanvas};

/// Drives one image through the pipeline.
///
/// The mapper must already be seeded with the combinations of `palette`
/// for the same view and multilayer settings as `options`.
pub struct RenderEngine;

impl RenderEngine {
    /// Render `image` into a fully populated canvas.
    ///
    /// Rows are mapped in parallel against the shared, read-only mapper.
    /// Transparent pixels become air without a lookup. The cancel token is
    /// checked before every row; a cancelled render drops its partial grid.
    ///
    /// # Errors
    ///
    /// - [`RenderError::EmptyImage`] for a zero-area image
    /// - [`RenderError::NotSeeded`] when the mapper has no seed data
    /// - [`RenderError::Cancelled`] when `cancel` fires mid-render
    /// - [`RenderError::ThreadPool`] when a dedicated pool can't be started
    ///
    /// With `options.threads > 0` a pool is built for this call alone; use
    /// [`RenderEngine::render_canvas_in`] to reuse one across renders.
    pub fn render_canvas(
        image: &PixelBuffer,
        mapper: &dyn ColorMapper,
        palette: &MaterialPalette,
        options: &Options,
        cancel: &CancelToken,
    ) -> Result<RenderedCanvas, RenderError> {
        let pool = build_pool(options.threads)?;
        Self::render_canvas_in(image, mapper, palette, options, pool.as_ref(), cancel)
    }

    /// Like [`RenderEngine::render_canvas`], mapping rows on `pool`, or on
    /// rayon's global pool when `pool` is `None`. `options.threads` is
    /// ignored.
    pub fn render_canvas_in(
        image: &PixelBuffer,
        mapper: &dyn ColorMapper,
        palette: &MaterialPalette,
        options: &Options,
        pool: Option<&ThreadPool>,
        cancel: &CancelToken,
    ) -> Result<RenderedCanvas, RenderError> {
        if image.is_empty() {
            return Err(RenderError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }
        if !mapper.is_seeded() {
            return Err(RenderError::NotSeeded);
        }
        if cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }

        let started = Instant::now();
        let processed = Preprocessor::new(options).process(image);
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Preprocessing done"
        );

        let started = Instant::now();
        let cells = match pool {
            Some(pool) => pool.install(|| map_rows(&processed, mapper, cancel))?,
            None => map_rows(&processed, mapper, cancel)?,
        };
        tracing::debug!(
            cells = cells.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Color mapping done"
        );

        debug_assert!(cells.iter().all(|c| palette.contains(c.bottom())));

        RenderedCanvas::new(
            processed.width(),
            processed.height(),
            cells,
            options.is_side_view,
            options.is_multi_layer,
        )
        .ok_or(RenderError::EmptyImage {
            width: processed.width(),
            height: processed.height(),
        })
    }
}

/// A dedicated pool of `threads` workers; `None` for 0 (rayon's global pool).
pub(crate) fn build_pool(threads: usize) -> Result<Option<ThreadPool>, RenderError> {
    if threads == 0 {
        return Ok(None);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("pixel-stacker-{i}"))
        .build()?;
    Ok(Some(pool))
}

fn map_rows(
    image: &PixelBuffer,
    mapper: &dyn ColorMapper,
    cancel: &CancelToken,
) -> Result<Vec<Cell>, RenderError> {
    let width = image.width();
    let mut cells = vec![Cell::AIR; image.area()];

    cells
        .par_chunks_mut(width)
        .enumerate()
        .try_for_each(|(y, row)| {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }
            for (cell, &pixel) in row.iter_mut().zip(image.row(y)) {
                *cell = map_pixel(mapper, pixel)?;
            }
            Ok(())
        })?;

    Ok(cells)
}

#[inline]
fn map_pixel(mapper: &dyn ColorMapper, pixel: Rgba) -> Result<Cell, RenderError> {
    if pixel.is_transparent() {
        return Ok(Cell::AIR);
    }
    let combo = mapper.find_nearest(pixel).map_err(|e| match e {
        MapperError::NotSeeded => RenderError::NotSeeded,
    })?;
    Ok(Cell::from(combo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::mapper::KdTreeMapper;
    use crate::palette::Material;
    use std::sync::Arc;

    fn palette() -> Arc<MaterialPalette> {
        Arc::new(
            MaterialPalette::new(vec![
                Material::solid("WHITE", 35, 0, Srgb::from_u8(255, 255, 255)),
                Material::solid("BLACK", 35, 15, Srgb::from_u8(0, 0, 0)),
                Material::solid("RED", 35, 14, Srgb::from_u8(200, 0, 0)),
            ])
            .unwrap(),
        )
    }

    fn mapper(palette: &MaterialPalette, options: &Options) -> KdTreeMapper {
        let mut mapper = KdTreeMapper::new(options.metric);
        mapper.set_seed_data(
            palette.valid_combinations(options).unwrap(),
            palette,
            options.is_side_view,
        );
        mapper
    }

    fn top_view() -> Options {
        Options::new().side_view(false)
    }

    #[test]
    fn test_every_cell_populated() {
        let palette = palette();
        let options = top_view();
        let mapper = mapper(&palette, &options);
        let pixels = vec![
            Rgba::opaque(250, 250, 250),
            Rgba::opaque(5, 5, 5),
            Rgba::opaque(190, 10, 10),
            Rgba::TRANSPARENT,
            Rgba::new(255, 255, 255, 10),
            Rgba::opaque(0, 0, 0),
        ];
        let image = PixelBuffer::new(3, 2, pixels).unwrap();
        let canvas =
            RenderEngine::render_canvas(&image, &mapper, &palette, &options, &CancelToken::new()).unwrap();

        assert_eq!((canvas.width(), canvas.height()), (3, 2));
        let ids: Vec<&str> = canvas
            .cells()
            .iter()
            .map(|c| palette.get(c.bottom()).id.as_str())
            .collect();
        assert_eq!(ids, ["WHITE", "BLACK", "RED", "AIR", "AIR", "BLACK"]);
    }

    #[test]
    fn test_empty_image() {
        let palette = palette();
        let options = top_view();
        let mapper = mapper(&palette, &options);
        let image = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        let err = RenderEngine::render_canvas(&image, &mapper, &palette, &options, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::EmptyImage { width: 0, height: 5 }));
    }

    #[test]
    fn test_unseeded_mapper() {
        let palette = palette();
        let image = PixelBuffer::filled(2, 2, Rgba::opaque(1, 2, 3));
        let err = RenderEngine::render_canvas(
            &image,
            &KdTreeMapper::default(),
            &palette,
            &top_view(),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::NotSeeded));
    }

    #[test]
    fn test_cancelled() {
        let palette = palette();
        let options = top_view();
        let mapper = mapper(&palette, &options);
        let image = PixelBuffer::filled(16, 16, Rgba::opaque(1, 2, 3));
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = RenderEngine::render_canvas(&image, &mapper, &palette, &options, &cancel).unwrap_err();
        assert!(matches!(err, RenderError::Cancelled));
    }

    #[test]
    fn test_dedicated_pool_matches_global_pool() {
        let palette = palette();
        let options = top_view();
        let mapper = mapper(&palette, &options);
        let pixels = (0..64 * 48)
            .map(|i| Rgba::opaque((i % 256) as u8, (i / 64) as u8 * 5, (i * 7 % 256) as u8))
            .collect();
        let image = PixelBuffer::new(64, 48, pixels).unwrap();
        let cancel = CancelToken::new();

        let global = RenderEngine::render_canvas(&image, &mapper, &palette, &options, &cancel).unwrap();
        let pooled =
            RenderEngine::render_canvas(&image, &mapper, &palette, &options.clone().threads(2), &cancel)
                .unwrap();
        assert_eq!(global, pooled);

        let pool = build_pool(3).unwrap().unwrap();
        assert_eq!(pool.current_num_threads(), 3);
        for _ in 0..3 {
            let shared =
                RenderEngine::render_canvas_in(&image, &mapper, &palette, &options, Some(&pool), &cancel)
                    .unwrap();
            assert_eq!(shared, global);
        }
    }

    #[test]
    fn test_zero_threads_uses_global_pool() {
        assert!(build_pool(0).unwrap().is_none());
    }
}
