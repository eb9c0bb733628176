pub mod kernel;

pub use super::{backward, forward, Backend, Error, Int, MeshRenderOptions, Tensor};

use burn::tensor::TensorData;
use kernel::*;

pub fn forward<B: Backend>(
    input: forward::RenderInput<B>,
    options: &MeshRenderOptions,
) -> Result<forward::RenderOutput<B>, Error> {
    #[cfg(debug_assertions)]
    log::debug!(target: "meshgrad::renderer::mesh::forward", "start");

    // Specifying the arguments

    let device = input.vertices.device();
    let [batch_size, face_count, face_size] = input.faces.dims();
    let [batch_size_vertices, vertex_count, vertex_size] = input.vertices.dims();
    // I_x
    let image_size_x = options.image_width;
    // I_y
    let image_size_y = options.image_height;

    if face_size != 3 {
        return Err(Error::Validation(
            format!("The last dimension of faces ({face_size})"),
            "3".into(),
        ));
    }
    if vertex_size != 3 {
        return Err(Error::Validation(
            format!("The last dimension of vertices ({vertex_size})"),
            "3".into(),
        ));
    }
    if batch_size != batch_size_vertices {
        return Err(Error::Validation(
            format!("The batch size of faces ({batch_size})"),
            format!("the batch size of vertices ({batch_size_vertices})"),
        ));
    }
    if image_size_x == 0 || image_size_y == 0 {
        return Err(Error::Validation(
            format!("The image size ({image_size_y} * {image_size_x})"),
            "positive".into(),
        ));
    }

    // Specifying the inputs

    let faces = input.faces.into_data().iter::<i32>().collect::<Vec<_>>();
    let vertices = input.vertices.into_data().iter::<f32>().collect::<Vec<_>>();

    // Gathering the vertices of faces

    let face_vertices = gather::main(
        gather::Arguments {
            batch_size: batch_size as u32,
            face_count: face_count as u32,
            vertex_count: vertex_count as u32,
        },
        gather::Inputs {
            faces: &faces,
            vertices: &vertices,
        },
    )?
    .face_vertices;

    #[cfg(debug_assertions)]
    log::debug!(target: "meshgrad::renderer::mesh::forward", "gather");

    // Rasterizing the faces

    let outputs = rasterize::main(
        rasterize::Arguments {
            batch_size: batch_size as u32,
            face_count: face_count as u32,
            image_size_x,
            image_size_y,
        },
        rasterize::Inputs {
            face_vertices: &face_vertices,
        },
    )?;

    #[cfg(debug_assertions)]
    log::debug!(target: "meshgrad::renderer::mesh::forward", "rasterize");

    // Specifying the outputs

    let shape = [batch_size, image_size_y as usize, image_size_x as usize];
    let depth_maps =
        Tensor::from_data(TensorData::new(outputs.depth_maps, shape), &device);
    let face_index_maps = Tensor::from_data(
        TensorData::new(outputs.face_index_maps.to_owned(), shape),
        &device,
    );
    let silhouettes = Tensor::from_data(
        TensorData::new(
            outputs
                .silhouettes
                .iter()
                .map(|&value| value as f32 / SILHOUETTE_FOREGROUND as f32)
                .collect::<Vec<_>>(),
            shape,
        ),
        &device,
    );

    let state = backward::RenderInput {
        device,
        batch_size: batch_size as u32,
        face_count: face_count as u32,
        vertex_count: vertex_count as u32,
        image_size_x,
        image_size_y,
        faces,
        face_vertices,
        face_index_maps: outputs.face_index_maps,
        silhouettes: outputs.silhouettes,
    };

    Ok(forward::RenderOutput {
        depth_maps,
        face_index_maps,
        silhouettes,
        state,
    })
}

pub fn backward<B: Backend>(
    state: backward::RenderInput<B>,
    silhouettes_grad: Tensor<B, 3>,
) -> Result<backward::RenderOutput<B>, Error> {
    #[cfg(debug_assertions)]
    log::debug!(target: "meshgrad::renderer::mesh::backward", "start");

    // Specifying the arguments

    let arguments = rasterize_backward::Arguments {
        batch_size: state.batch_size,
        face_count: state.face_count,
        vertex_count: state.vertex_count,
        image_size_x: state.image_size_x,
        image_size_y: state.image_size_y,
    };
    let image_shape = [
        state.batch_size as usize,
        state.image_size_y as usize,
        state.image_size_x as usize,
    ];
    let vertices_shape = [state.batch_size as usize, state.vertex_count as usize, 3];

    if silhouettes_grad.dims() != image_shape {
        return Err(Error::Validation(
            format!("The shape of silhouettes grad ({:?})", silhouettes_grad.dims()),
            format!("{image_shape:?}"),
        ));
    }

    // Specifying the inputs

    let silhouettes_grad =
        silhouettes_grad.into_data().iter::<f32>().collect::<Vec<_>>();

    // Scanning the edges

    let mut outputs = rasterize_backward::Outputs::zeros(&arguments);
    rasterize_backward::main(
        arguments,
        rasterize_backward::Inputs {
            faces: &state.faces,
            face_vertices: &state.face_vertices,
            face_index_maps: &state.face_index_maps,
            silhouettes: &state.silhouettes,
            silhouettes_grad: &silhouettes_grad,
        },
        &mut outputs,
    )?;

    #[cfg(debug_assertions)]
    log::debug!(target: "meshgrad::renderer::mesh::backward", "rasterize_backward");

    // Specifying the outputs

    let vertices_grad = Tensor::from_data(
        TensorData::new(outputs.vertices_grad, vertices_shape),
        &state.device,
    );
    let debug_grad_maps = Tensor::from_data(
        TensorData::new(outputs.debug_grad_maps, image_shape),
        &state.device,
    );

    Ok(backward::RenderOutput {
        vertices_grad,
        debug_grad_maps,
    })
}
