pub use burn::tensor::{backend::Backend, Tensor, TensorData};

/// A camera looking at the origin from the positive z-axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// Distance from the origin.
    pub distance: f64,
    /// Rotation about the x-axis in degrees.
    pub angle_x: f64,
    /// Rotation about the y-axis in degrees.
    pub angle_y: f64,
    /// The vertical field of view in degrees.
    pub viewing_angle: f64,
    /// The farthest visible depth.
    pub z_max: f64,
    /// The nearest visible depth.
    pub z_min: f64,
}

/// Rotation matrices.
///
/// They are in **row-major order**, i.e., `M[row][col]`, and the angles are
/// in degrees.
impl View {
    pub fn rotation_x(angle: f64) -> [[f64; 3]; 3] {
        let (s, c) = (angle % 360.0).to_radians().sin_cos();
        [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
    }

    pub fn rotation_y(angle: f64) -> [[f64; 3]; 3] {
        let (s, c) = (angle % 360.0).to_radians().sin_cos();
        [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]
    }

    pub fn rotation_z(angle: f64) -> [[f64; 3]; 3] {
        let (s, c) = (angle % 360.0).to_radians().sin_cos();
        [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
    }

    /// Returns `R_l * R_r`.
    pub fn compose(
        rotation_l: &[[f64; 3]; 3],
        rotation_r: &[[f64; 3]; 3],
    ) -> [[f64; 3]; 3] {
        let mut output = [[0.0; 3]; 3];
        for (row, output) in output.iter_mut().enumerate() {
            for (col, value) in output.iter_mut().enumerate() {
                *value = (0..3).map(|k| rotation_l[row][k] * rotation_r[k][col]).sum();
            }
        }
        output
    }
}

/// Vertex transformations.
impl View {
    /// Rotating the vertices `[N, V, 3]` by `R`, i.e., `v <- R * v`.
    pub fn rotate<B: Backend>(
        vertices: Tensor<B, 3>,
        rotation: &[[f64; 3]; 3],
    ) -> Tensor<B, 3> {
        let [batch_size, vertex_count, _] = vertices.dims();
        let device = vertices.device();

        // R^T
        let rotation_transposed = Tensor::<B, 2>::from_data(
            TensorData::new(
                (0..3)
                    .flat_map(|row| (0..3).map(move |col| rotation[col][row] as f32))
                    .collect::<Vec<_>>(),
                [3, 3],
            ),
            &device,
        );

        vertices
            .reshape([batch_size * vertex_count, 3])
            .matmul(rotation_transposed)
            .reshape([batch_size, vertex_count, 3])
    }

    /// Rotating about the x-axis then the y-axis and moving the camera back.
    pub fn transform_to_camera<B: Backend>(
        &self,
        vertices: Tensor<B, 3>,
    ) -> Tensor<B, 3> {
        let [batch_size, vertex_count, _] = vertices.dims();
        let device = vertices.device();
        let rotation = Self::compose(
            &Self::rotation_y(self.angle_y),
            &Self::rotation_x(self.angle_x),
        );
        let translation = Tensor::<B, 2>::from_data(
            TensorData::new(vec![0.0, 0.0, -self.distance as f32], [1, 3]),
            &device,
        );

        Self::rotate(vertices, &rotation)
            .reshape([batch_size * vertex_count, 3])
            .add(translation)
            .reshape([batch_size, vertex_count, 3])
    }

    /// Projecting camera-space vertices `[N, V, 3]` to NDC.
    ///
    /// The depth is mirrored and normalized so that `z_min` maps to `0` and
    /// `z_max` to `1`. `x` and `y` are scaled but not divided by the depth.
    pub fn project<B: Backend>(
        &self,
        vertices: Tensor<B, 3>,
    ) -> Tensor<B, 3> {
        let [batch_size, vertex_count, _] = vertices.dims();
        let device = vertices.device();

        // 1 / tan(Fov / 2)
        let focal = 1.0 / (self.viewing_angle / 2.0).to_radians().tan();
        // z_max / (z_max - z_min)
        let z_a = self.z_max / (self.z_max - self.z_min);
        // z_max * z_min / (z_min - z_max)
        let z_b = self.z_max * self.z_min / (self.z_min - self.z_max);

        let scale = Tensor::<B, 2>::from_data(
            TensorData::new(
                vec![
                    (focal / self.z_max) as f32,
                    (focal / self.z_max) as f32,
                    (-z_a / self.z_max) as f32,
                ],
                [1, 3],
            ),
            &device,
        );
        let offset = Tensor::<B, 2>::from_data(
            TensorData::new(vec![0.0, 0.0, z_b as f32], [1, 3]),
            &device,
        );

        vertices
            .reshape([batch_size * vertex_count, 3])
            .mul(scale)
            .add(offset)
            .reshape([batch_size, vertex_count, 3])
    }
}

impl Default for View {
    #[inline]
    fn default() -> Self {
        Self {
            distance: 2.0,
            angle_x: 0.0,
            angle_y: 0.0,
            viewing_angle: 30.0,
            z_max: 5.0,
            z_min: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    type B = NdArray<f32>;

    fn assert_close(
        output: &[f32],
        target: &[f32],
    ) {
        assert_eq!(output.len(), target.len());
        for (o, t) in output.iter().zip(target) {
            assert!((o - t).abs() < 1e-5, "{output:?} != {target:?}");
        }
    }

    #[test]
    fn rotation() {
        use super::*;

        let rotation = View::rotation_y(90.0);
        assert!((rotation[0][2] - 1.0).abs() < 1e-12);
        assert!((rotation[2][0] + 1.0).abs() < 1e-12);

        let rotation = View::compose(&View::rotation_z(30.0), &View::rotation_z(60.0));
        let target = View::rotation_z(90.0 + 360.0);
        for (o, t) in rotation.iter().flatten().zip(target.iter().flatten()) {
            assert!((o - t).abs() < 1e-12);
        }

        let device = Default::default();
        let vertices = Tensor::<B, 3>::from_data(
            TensorData::new(vec![1.0_f32, 0.0, 0.0, 0.0, 1.0, 0.0], [1, 2, 3]),
            &device,
        );
        let output = View::rotate(vertices, &View::rotation_z(90.0))
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        assert_close(&output, &[0.0, 1.0, 0.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn transform_to_camera() {
        use super::*;

        let device = Default::default();
        let vertices = Tensor::<B, 3>::from_data(
            TensorData::new(vec![0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], [1, 3, 3]),
            &device,
        );

        let view = View::default();
        let output = view
            .transform_to_camera(vertices.to_owned())
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        assert_close(&output, &[0.0, 0.0, -2.0, 1.0, 0.0, -2.0, 0.0, 0.0, -1.0]);

        let view = View {
            angle_y: 90.0,
            ..Default::default()
        };
        let output = view
            .transform_to_camera(vertices)
            .into_data()
            .to_vec::<f32>()
            .unwrap();
        assert_close(&output, &[0.0, 0.0, -2.0, 0.0, 0.0, -3.0, 1.0, 0.0, -2.0]);
    }

    #[test]
    fn project() {
        use super::*;

        let device = Default::default();
        let vertices = Tensor::<B, 3>::from_data(
            TensorData::new(vec![0.0_f32, 0.0, -2.0, 1.0, -0.5, -5.0], [1, 2, 3]),
            &device,
        );

        let view = View::default();
        let output = view.project(vertices).into_data().to_vec::<f32>().unwrap();
        // 1 / tan(15 deg) / 5
        let scale = 0.746_410_2;
        assert_close(&output, &[0.0, 0.0, 0.4, scale, -0.5 * scale, 1.0]);
    }

    #[test]
    fn gradient_through_projection() {
        use super::*;
        use crate::{
            backend::Autodiff,
            render::mesh::{MeshBatch, MeshRenderOptions},
        };
        use burn::tensor::Int;

        type AB = Autodiff<B>;

        let device = Default::default();
        let vertices = Tensor::<AB, 3>::from_data(
            TensorData::new(
                vec![-0.5_f32, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0],
                [1, 3, 3],
            ),
            &device,
        )
        .require_grad();
        let faces = Tensor::<AB, 3, Int>::from_data(
            TensorData::new(vec![0, 1, 2], [1, 1, 3]),
            &device,
        );

        let view = View::default();
        let projected = view.project(view.transform_to_camera(vertices.to_owned()));
        let output = MeshBatch::new(faces, projected)
            .render_differentiable(&MeshRenderOptions::default())
            .unwrap();
        let target = Tensor::<AB, 3>::ones([1, 64, 64], &device);
        let grads = (output.silhouettes - target).powf_scalar(2.0).sum().backward();

        let vertices_grad = vertices.grad(&grads).unwrap().into_data().to_vec::<f32>().unwrap();
        assert!(vertices_grad[0] > 0.0, "{vertices_grad:?}");
        assert!(vertices_grad.chunks_exact(3).all(|v| v[2] == 0.0));
    }
}
