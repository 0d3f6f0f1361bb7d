/// Scène 3D de gyroscii : graphe de nœuds en arène, caméra perspective,
/// mise à l'échelle viewport, mathématiques d'orientation par tick et
/// rasterisation filaire dans un `FrameBuffer` off-screen.
pub mod camera;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod motion;
pub mod rasterizer;
pub mod wire;

pub use camera::{PerspectiveCamera, Plane, Ray};
pub use error::SceneError;
pub use graph::{NodeId, SceneGraph};
pub use layout::ViewportLayout;
pub use rasterizer::{FrameRasterizer, PivotChain, TickReport};
