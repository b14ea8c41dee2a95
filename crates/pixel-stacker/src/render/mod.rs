//! Canvas rendering.

mod cancel;
mod canvas;
mod engine;

pub use cancel::CancelToken;
pub use canvas::{Cell, RenderedCanvas};
pub use engine::RenderEngine;
pub(crate) use engine::build_pool;

/// Rendering failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },

    #[error("color mapper is not seeded")]
    NotSeeded,

    #[error("render cancelled")]
    Cancelled,

    #[error("failed to start render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
