//! Scanline gradient of one face edge along one axis.
//!
//! For each primary line crossed by the edge, the pixels are visited from the
//! image boundary towards the face. Pixels before the face are moved inside by
//! pushing the edge outwards, and pixels inside the face are moved outside by
//! pulling either the near edge or the far edge (the one through the third
//! vertex) inwards.

pub use super::*;

/// The axis along which the edge is displaced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Scanning the columns of each row.
    X,
    /// Scanning the rows of each column.
    Y,
}

/// The order in which a scanline is visited.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Increasing,
    Decreasing,
}

/// Per-pixel maps of one batch item.
#[derive(Clone, Copy, Debug)]
pub struct Maps<'a> {
    pub face_index_map: Frame<'a, i32>,
    pub silhouette: Frame<'a, i32>,
    pub silhouette_grad: Frame<'a, f32>,
}

/// A directed face edge `A -> B` and the opposite vertex `C`.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    pub face_index: i32,
    /// Indices of `A` and `B` in the vertex list.
    pub vertex_indices: [usize; 2],
    pub vertices: [Vertex; 3],
}

impl Axis {
    /// The channel of the vertex gradient.
    #[inline]
    pub fn channel(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The sign of NDC along increasing pixel indices.
    #[inline]
    pub fn ndc_sign(self) -> f32 {
        match self {
            Axis::X => 1.0,
            Axis::Y => -1.0,
        }
    }

    /// The pixel index of the vertex on the primary axis.
    #[inline]
    pub fn primary(
        self,
        vertex: &Vertex,
        maps: &Maps<'_>,
    ) -> usize {
        let image_size_y = maps.face_index_map.height() as u32;
        let image_size_x = maps.face_index_map.width() as u32;
        match self {
            Axis::X => ndc_to_row(vertex.y, image_size_y) as usize,
            Axis::Y => to_pixel(vertex.x, image_size_x) as usize,
        }
    }

    /// The exterior of a counter-clockwise face lies on the right of its
    /// edges, so the scan starts from that side.
    #[inline]
    pub fn direction(
        self,
        primary_a: usize,
        primary_b: usize,
    ) -> Direction {
        match (self, primary_a < primary_b) {
            (Axis::X, true) | (Axis::Y, false) => Direction::Increasing,
            (Axis::X, false) | (Axis::Y, true) => Direction::Decreasing,
        }
    }
}

/// A scanline at a fixed primary index.
#[derive(Clone, Copy, Debug)]
struct Line<'a> {
    axis: Axis,
    direction: Direction,
    maps: &'a Maps<'a>,
    primary: usize,
    length: usize,
}

impl Line<'_> {
    /// Row and column of the pixel at `step` from the scan origin.
    #[inline]
    fn pixel(
        &self,
        step: usize,
    ) -> (usize, usize) {
        let secondary = match self.direction {
            Direction::Increasing => step,
            Direction::Decreasing => self.length - 1 - step,
        };
        match self.axis {
            Axis::X => (self.primary, secondary),
            Axis::Y => (secondary, self.primary),
        }
    }

    #[inline]
    fn face_index(
        &self,
        step: usize,
    ) -> i32 {
        let (row, col) = self.pixel(step);
        self.maps.face_index_map.get(row, col)
    }

    #[inline]
    fn intensity(
        &self,
        step: usize,
    ) -> f32 {
        let (row, col) = self.pixel(step);
        self.maps.silhouette.get(row, col) as f32
    }

    #[inline]
    fn grad(
        &self,
        step: usize,
    ) -> f32 {
        let (row, col) = self.pixel(step);
        self.maps.silhouette_grad.get(row, col)
    }
}

/// The vertex gradient accumulators of one batch item.
#[derive(Debug)]
pub struct Accumulator<'a, 'b> {
    pub vertices_grad: &'a mut [f32],
    pub debug_grad_map: &'a mut FrameMut<'b, f32>,
}

/// One candidate displacement of a vertex.
#[derive(Clone, Copy, Debug)]
struct Contribution {
    vertex_index: usize,
    /// The weight of the vertex is `numerator / span`.
    numerator: usize,
    span: usize,
    /// Steps between the pixel and the edge.
    distance: usize,
    sign: f32,
    grad: f32,
    /// The intensity change when the pixel flips.
    delta: f32,
}

impl Accumulator<'_, '_> {
    fn add(
        &mut self,
        channel: usize,
        (row, col): (usize, usize),
        contribution: Contribution,
    ) {
        let Contribution {
            vertex_index,
            numerator,
            span,
            distance,
            sign,
            grad,
            delta,
        } = contribution;

        if numerator == 0 {
            return;
        }
        let moving_distance = distance as f32 / numerator as f32 * span as f32;
        if moving_distance <= 0.0 {
            return;
        }
        if grad * delta >= 0.0 {
            return;
        }

        let value = sign * grad * delta / moving_distance / 255.0;
        self.vertices_grad[vertex_index * 3 + channel] += value;
        self.debug_grad_map.add(row, col, value);
    }
}

/// Accumulating the gradient of the edge along the axis.
pub fn scan(
    axis: Axis,
    edge: &Edge,
    maps: &Maps<'_>,
    accumulator: &mut Accumulator<'_, '_>,
) {
    let [vertex_a, vertex_b, vertex_c] = &edge.vertices;
    let [index_a, index_b] = edge.vertex_indices;
    let target = edge.face_index;

    let primary_a = axis.primary(vertex_a, maps);
    let primary_b = axis.primary(vertex_b, maps);
    let primary_c = axis.primary(vertex_c, maps);
    if primary_a == primary_b {
        return;
    }

    let direction = axis.direction(primary_a, primary_b);
    let sign = axis.ndc_sign()
        * match direction {
            Direction::Increasing => -1.0,
            Direction::Decreasing => 1.0,
        };
    let channel = axis.channel();
    let length = match axis {
        Axis::X => maps.face_index_map.width(),
        Axis::Y => maps.face_index_map.height(),
    };

    let (start, end, index_start, index_end) = if primary_a < primary_b {
        (primary_a, primary_b, index_a, index_b)
    } else {
        (primary_b, primary_a, index_b, index_a)
    };
    let span = end - start;

    for primary in start..=end {
        let line = Line {
            axis,
            direction,
            maps,
            primary,
            length,
        };

        if line.face_index(0) == target {
            continue;
        }
        let Some(edge_step) = (1..length).find(|&step| line.face_index(step) == target)
        else {
            continue;
        };

        // Outside the face

        let inside_value = line.intensity(edge_step);
        for step in 0..edge_step {
            let grad = line.grad(step);
            if grad == 0.0 {
                continue;
            }
            let pixel = line.pixel(step);
            let delta = inside_value - line.intensity(step);
            let distance = edge_step - step;

            for (vertex_index, numerator) in
                [(index_end, primary - start), (index_start, end - primary)]
            {
                accumulator.add(
                    channel,
                    pixel,
                    Contribution {
                        vertex_index,
                        numerator,
                        span,
                        distance,
                        sign,
                        grad,
                        delta,
                    },
                );
            }
        }

        // Inside the face

        let outside_value = line.intensity(edge_step - 1);
        let Some(exit_step) =
            (edge_step + 1..length).find(|&step| line.face_index(step) != target)
        else {
            continue;
        };
        let other_edge_step = exit_step - 1;
        let other_outside_value = line.intensity(exit_step);

        for step in edge_step..=other_edge_step {
            let grad = line.grad(step);
            if grad == 0.0 {
                continue;
            }
            let pixel = line.pixel(step);
            let intensity = line.intensity(step);

            // Pulling the near edge
            let delta = outside_value - intensity;
            let distance = step - edge_step;
            for (vertex_index, numerator) in
                [(index_end, primary - start), (index_start, end - primary)]
            {
                accumulator.add(
                    channel,
                    pixel,
                    Contribution {
                        vertex_index,
                        numerator,
                        span,
                        distance,
                        sign: -sign,
                        grad,
                        delta,
                    },
                );
            }

            // Pulling the far edge
            let delta = other_outside_value - intensity;
            let distance = other_edge_step - step;
            let far = if primary > primary_c {
                Some((index_end, primary - primary_c, end - primary_c))
            } else if primary < primary_c {
                Some((index_start, primary_c - primary, primary_c - start))
            } else {
                None
            };
            if let Some((vertex_index, numerator, span)) = far {
                accumulator.add(
                    channel,
                    pixel,
                    Contribution {
                        vertex_index,
                        numerator,
                        span,
                        distance,
                        sign,
                        grad,
                        delta,
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    const SIZE: usize = 11;

    /// The corners `(row, col)` of a counter-clockwise face.
    const CORNERS: [(usize, usize); 3] = [(1, 2), (9, 3), (5, 9)];

    /// The raster of the face.
    const MASK: [&str; SIZE] = [
        "...........",
        "..#........",
        "...#.......",
        "...###.....",
        "...#####...",
        "...#######.",
        "...#####...",
        "...####....",
        "...##......",
        "...#.......",
        "...........",
    ];

    /// Scanning the edge `[A, B, C]` against a unit gradient at one pixel.
    ///
    /// Returns `(vertices_grad, debug_grad_map)`.
    fn scan_pixel(
        axis: super::Axis,
        [a, b, c]: [usize; 3],
        (row, col): (usize, usize),
    ) -> (Vec<f32>, Vec<f32>) {
        use super::*;

        let vertex = |(row, col): (usize, usize)| Vertex {
            x: col as f32 / 5.0 - 1.0,
            y: 1.0 - row as f32 / 5.0,
            z: 0.5,
        };
        let face_index_map = MASK
            .iter()
            .flat_map(|line| line.bytes())
            .map(|pixel| if pixel == b'#' { 0 } else { FACE_INDEX_BACKGROUND })
            .collect::<Vec<_>>();
        let silhouette = face_index_map
            .iter()
            .map(|&index| if index == 0 { SILHOUETTE_FOREGROUND } else { 0 })
            .collect::<Vec<_>>();
        let mut silhouette_grad = vec![0.0; SIZE * SIZE];
        silhouette_grad[row * SIZE + col] = 1.0;

        let maps = Maps {
            face_index_map: Frame::new(&face_index_map, SIZE, SIZE).unwrap(),
            silhouette: Frame::new(&silhouette, SIZE, SIZE).unwrap(),
            silhouette_grad: Frame::new(&silhouette_grad, SIZE, SIZE).unwrap(),
        };
        let edge = Edge {
            face_index: 0,
            vertex_indices: [a, b],
            vertices: [vertex(CORNERS[a]), vertex(CORNERS[b]), vertex(CORNERS[c])],
        };
        let mut vertices_grad = vec![0.0; 9];
        let mut debug_grad_map = vec![0.0; SIZE * SIZE];
        scan(
            axis,
            &edge,
            &maps,
            &mut Accumulator {
                vertices_grad: &mut vertices_grad,
                debug_grad_map: &mut FrameMut::new(&mut debug_grad_map, SIZE, SIZE)
                    .unwrap(),
            },
        );

        (vertices_grad, debug_grad_map)
    }

    /// Only `vertices_grad[vertex][channel]` and the pixel are nonzero.
    fn assert_only(
        (vertices_grad, debug_grad_map): (Vec<f32>, Vec<f32>),
        (vertex, channel): (usize, usize),
        (row, col): (usize, usize),
        value: f32,
    ) {
        for (index, &grad) in vertices_grad.iter().enumerate() {
            if index == vertex * 3 + channel {
                assert!((grad - value).abs() < 1e-6, "{grad} != {value}");
            } else {
                assert_eq!(grad, 0.0, "{vertices_grad:?}");
            }
        }
        for (index, &grad) in debug_grad_map.iter().enumerate() {
            if index == row * SIZE + col {
                assert!((grad - value).abs() < 1e-6, "{grad} != {value}");
            } else {
                assert_eq!(grad, 0.0, "({}, {})", index / SIZE, index % SIZE);
            }
        }
    }

    #[test]
    fn axis_directions() {
        use super::*;

        assert_eq!(Axis::X.direction(1, 9), Direction::Increasing);
        assert_eq!(Axis::X.direction(9, 5), Direction::Decreasing);
        assert_eq!(Axis::Y.direction(9, 2), Direction::Increasing);
        assert_eq!(Axis::Y.direction(3, 9), Direction::Decreasing);
    }

    // The pixels below are the first inside pixels of their scanlines, so the
    // near edge stays still and only the far edge moves.

    #[test]
    fn far_edge_of_rows_scanned_from_the_left() {
        use super::*;

        // Row 3 lies above C (row 5), so A moves by (5 - 3) / (5 - 1) across
        // 2 pixels.
        assert_only(scan_pixel(Axis::X, [0, 1, 2], (3, 3)), (0, 0), (3, 3), 0.25);
        // Row 7 lies below C, so B moves by (7 - 5) / (9 - 5) across 3 pixels.
        assert_only(
            scan_pixel(Axis::X, [0, 1, 2], (7, 3)),
            (1, 0),
            (7, 3),
            1.0 / 6.0,
        );
    }

    #[test]
    fn far_edge_of_rows_scanned_from_the_right() {
        use super::*;

        // Row 7 lies below C (row 1), so A moves by (7 - 1) / (9 - 1) across
        // 3 pixels.
        assert_only(
            scan_pixel(Axis::X, [1, 2, 0], (7, 6)),
            (1, 0),
            (7, 6),
            -0.25,
        );
        // Row 3 lies above C (row 9), so B moves by (9 - 3) / (9 - 1) across
        // 2 pixels.
        assert_only(
            scan_pixel(Axis::X, [2, 0, 1], (3, 5)),
            (0, 0),
            (3, 5),
            -0.375,
        );
    }

    #[test]
    fn far_edge_of_columns_scanned_from_the_top() {
        use super::*;

        // Col 5 lies right of C (col 3), so A moves by (5 - 3) / (9 - 3)
        // across 4 pixels.
        assert_only(
            scan_pixel(Axis::Y, [2, 0, 1], (3, 5)),
            (2, 1),
            (3, 5),
            -1.0 / 12.0,
        );
    }

    #[test]
    fn far_edge_of_columns_scanned_from_the_bottom() {
        use super::*;

        // Col 4 lies right of C (col 2), so B moves by (4 - 2) / (9 - 2)
        // across 5 pixels.
        assert_only(
            scan_pixel(Axis::Y, [1, 2, 0], (8, 4)),
            (2, 1),
            (8, 4),
            2.0 / 35.0,
        );
        // Col 3 lies left of C (col 9), so A moves by (9 - 3) / (9 - 2)
        // across 7 pixels.
        assert_only(
            scan_pixel(Axis::Y, [0, 1, 2], (9, 3)),
            (0, 1),
            (9, 3),
            6.0 / 49.0,
        );
    }

    #[test]
    fn far_edge_stays_on_the_line_of_the_opposite_vertex() {
        use super::*;

        // Row 5 is the row of C.
        let (vertices_grad, _) = scan_pixel(Axis::X, [0, 1, 2], (5, 3));
        assert!(vertices_grad.iter().all(|&grad| grad == 0.0), "{vertices_grad:?}");

        // Off the first pixel, only the near edge moves.
        let (vertices_grad, _) = scan_pixel(Axis::X, [0, 1, 2], (5, 4));
        assert!((vertices_grad[0] + 0.5).abs() < 1e-6, "{vertices_grad:?}");
        assert!((vertices_grad[3] + 0.5).abs() < 1e-6, "{vertices_grad:?}");
        assert_eq!(vertices_grad[6], 0.0);

        // Col 3 is the column of C.
        let (vertices_grad, _) = scan_pixel(Axis::Y, [2, 0, 1], (2, 3));
        assert!(vertices_grad.iter().all(|&grad| grad == 0.0), "{vertices_grad:?}");
    }
}
