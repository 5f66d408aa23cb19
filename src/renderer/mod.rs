//! Render adapter
//!
//! Turns battle state into a flat vertex list. No GPU code lives here; the
//! host owns the device and just uploads `Frame::as_bytes()`.

pub mod draw;
pub mod shapes;
pub mod snapshot;
pub mod vertex;

pub use draw::{Frame, build_frame};
pub use snapshot::{HitEffectView, PlayerView, RenderSnapshot};
pub use vertex::Vertex;
