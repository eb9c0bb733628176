pub mod mesh;
pub mod view;

pub use mesh::{MeshBatch, MeshRenderOptions};
pub use view::View;
