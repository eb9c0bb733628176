//! Differentiable silhouette rendering of triangle meshes.

pub mod backward;
pub mod cpu;
pub mod forward;

pub use crate::{
    backend::{self, Autodiff},
    error::Error,
};
pub use burn::{
    config::Config,
    tensor::{
        backend::{AutodiffBackend, Backend},
        Int, Tensor,
    },
};

use burn::{
    backend::autodiff::{
        checkpoint::{base::Checkpointer, strategy::NoCheckpointing},
        grads::Gradients,
        ops::{Backward, Ops, OpsKind},
    },
    tensor::TensorPrimitive,
};
use std::{fmt, marker};

#[derive(Config, Debug)]
pub struct MeshRenderOptions {
    #[config(default = "64")]
    /// `I_y`
    pub image_height: u32,
    #[config(default = "64")]
    /// `I_x`
    pub image_width: u32,
}

/// A batch of `N` meshes sharing the face and vertex counts.
#[derive(Clone, Debug)]
pub struct MeshBatch<B: Backend> {
    /// `[N, F, 3]`
    ///
    /// The vertex indices of each face in counter-clockwise order.
    pub faces: Tensor<B, 3, Int>,
    /// `[N, V, 3]`
    ///
    /// The projected vertices, with `x` and `y` in NDC and `z` in `[0, 1]`.
    pub vertices: Tensor<B, 3>,
}

#[derive(Clone)]
pub struct MeshRenderOutput<B: Backend> {
    /// `[N, I_y, I_x]`
    pub depth_maps: Tensor<B, 3>,
    /// `[N, I_y, I_x]`
    ///
    /// It is `-1` where no face is rasterized.
    pub face_index_maps: Tensor<B, 3, Int>,
    /// `[N, I_y, I_x]` (`0` or `1`)
    pub silhouettes: Tensor<B, 3>,
}

#[derive(Clone)]
pub struct MeshRenderOutputAutodiff<AB: AutodiffBackend> {
    /// `[N, I_y, I_x]` (`0` or `1`)
    ///
    /// The gradient of it flows to the x and y coordinates of the vertices.
    pub silhouettes: Tensor<AB, 3>,
    /// `[N, I_y, I_x]`
    pub depth_maps: Tensor<AB::InnerBackend, 3>,
    /// `[N, I_y, I_x]`
    pub face_index_maps: Tensor<AB::InnerBackend, 3, Int>,
}

#[derive(Clone, Copy, Debug, Default)]
struct MeshRendererBackward<B: Backend> {
    __: marker::PhantomData<B>,
}

impl<B: Backend> MeshBatch<B> {
    pub fn new(
        faces: Tensor<B, 3, Int>,
        vertices: Tensor<B, 3>,
    ) -> Self {
        Self { faces, vertices }
    }

    /// `N`
    #[inline]
    pub fn batch_size(&self) -> usize {
        self.vertices.dims()[0]
    }

    /// `F`
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.dims()[1]
    }

    /// `V`
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.dims()[1]
    }

    #[inline]
    pub fn device(&self) -> B::Device {
        self.vertices.device()
    }

    pub fn render(
        &self,
        options: &MeshRenderOptions,
    ) -> Result<MeshRenderOutput<B>, Error> {
        let input = forward::RenderInput {
            faces: self.faces.to_owned(),
            vertices: self.vertices.to_owned(),
        };

        let output = cpu::forward(input, options)?;

        Ok(MeshRenderOutput {
            depth_maps: output.depth_maps,
            face_index_maps: output.face_index_maps,
            silhouettes: output.silhouettes,
        })
    }
}

impl<B: Backend> MeshBatch<Autodiff<B>> {
    pub fn render_differentiable(
        &self,
        options: &MeshRenderOptions,
    ) -> Result<MeshRenderOutputAutodiff<Autodiff<B>>, Error> {
        let vertices = self.vertices.to_owned().into_primitive().tensor();

        let input = forward::RenderInput {
            faces: self.faces.to_owned().inner(),
            vertices: Tensor::from_primitive(TensorPrimitive::Float(
                vertices.primitive,
            )),
        };

        let output = cpu::forward(input, options)?;

        let silhouettes = output.silhouettes.into_primitive().tensor();
        let silhouettes = Tensor::from_primitive(TensorPrimitive::Float(
            match MeshRendererBackward::<B>::default()
                .prepare::<NoCheckpointing>([vertices.node])
                .compute_bound()
                .stateful()
            {
                OpsKind::Tracked(prep) => prep.finish(output.state, silhouettes),
                OpsKind::UnTracked(prep) => prep.finish(silhouettes),
            },
        ));

        Ok(MeshRenderOutputAutodiff {
            silhouettes,
            depth_maps: output.depth_maps,
            face_index_maps: output.face_index_maps,
        })
    }
}

impl<B: Backend> Backward<B, 1> for MeshRendererBackward<B> {
    type State = backward::RenderInput<B>;

    fn backward(
        self,
        ops: Ops<Self::State, 1>,
        grads: &mut Gradients,
        _checkpointer: &mut Checkpointer,
    ) {
        #[cfg(debug_assertions)]
        log::debug!(
            target: "meshgrad::renderer::mesh",
            "MeshRendererBackward::backward",
        );

        let silhouettes_grad = grads.consume::<B>(&ops.node);

        let Some(node) = &ops.parents[0] else {
            return;
        };

        let silhouettes_grad =
            Tensor::from_primitive(TensorPrimitive::Float(silhouettes_grad));

        match cpu::backward(ops.state, silhouettes_grad) {
            Ok(output) => grads.register::<B>(
                node.id,
                output.vertices_grad.into_primitive().tensor(),
            ),
            Err(error) => log::error!(
                target: "meshgrad::renderer::mesh",
                "MeshRendererBackward::backward: {error}",
            ),
        }
    }
}

impl Default for MeshRenderOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> fmt::Debug for MeshRenderOutput<B> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct(&format!("MeshRenderOutput<{}>", B::name()))
            .field("depth_maps.dims()", &self.depth_maps.dims())
            .field("face_index_maps.dims()", &self.face_index_maps.dims())
            .field("silhouettes.dims()", &self.silhouettes.dims())
            .finish()
    }
}

impl<AB: AutodiffBackend> fmt::Debug for MeshRenderOutputAutodiff<AB> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct(&format!("MeshRenderOutputAutodiff<{}>", AB::name()))
            .field("depth_maps.dims()", &self.depth_maps.dims())
            .field("face_index_maps.dims()", &self.face_index_maps.dims())
            .field("silhouettes.dims()", &self.silhouettes.dims())
            .finish()
    }
}
