//! Map tile rendering of risk meshes.
//!
//! - `bounds` / `select`: geographic rectangles and the visible cell filter
//! - `projection`: world pixel projection and tile arithmetic
//! - `surface` / `style`: what gets painted and in which colors
//! - `renderer`: the attach / update / redraw / detach lifecycle
//! - `output`: PNG tile files

pub mod bounds;
pub mod error;
pub mod output;
pub mod projection;
pub mod renderer;
pub mod select;
pub mod style;
pub mod surface;

pub use bounds::GeoBounds;
pub use projection::{PixelPoint, Projection, TileCoord, WebMercator};
pub use renderer::{AttachedRenderer, PaintStats, RedrawOutcome, TileRenderer};
pub use select::{cell_bounds, select_visible};
pub use style::RenderStyle;
pub use surface::{PixelRect, RenderSurface};
