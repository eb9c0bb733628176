//! Row views over a row-major `[I_y, I_x]` buffer.
//!
//! Indexing out of the image panics instead of touching a neighbouring row.

pub use super::Error;

#[derive(Clone, Copy, Debug)]
pub struct Frame<'a, T> {
    data: &'a [T],
    height: usize,
    width: usize,
}

#[derive(Debug)]
pub struct FrameMut<'a, T> {
    data: &'a mut [T],
    height: usize,
    width: usize,
}

impl<'a, T: Copy> Frame<'a, T> {
    pub fn new(
        data: &'a [T],
        height: usize,
        width: usize,
    ) -> Result<Self, Error> {
        check_length(data.len(), height, width)?;
        Ok(Self {
            data,
            height,
            width,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn row(
        &self,
        row: usize,
    ) -> &'a [T] {
        assert!(row < self.height, "row {row} is out of {}", self.height);
        &self.data[row * self.width..(row + 1) * self.width]
    }

    #[inline]
    pub fn get(
        &self,
        row: usize,
        col: usize,
    ) -> T {
        self.row(row)[col]
    }
}

impl<'a, T: Copy> FrameMut<'a, T> {
    pub fn new(
        data: &'a mut [T],
        height: usize,
        width: usize,
    ) -> Result<Self, Error> {
        check_length(data.len(), height, width)?;
        Ok(Self {
            data,
            height,
            width,
        })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn row_mut(
        &mut self,
        row: usize,
    ) -> &mut [T] {
        assert!(row < self.height, "row {row} is out of {}", self.height);
        &mut self.data[row * self.width..(row + 1) * self.width]
    }

    #[inline]
    pub fn get(
        &self,
        row: usize,
        col: usize,
    ) -> T {
        assert!(row < self.height, "row {row} is out of {}", self.height);
        self.data[row * self.width..(row + 1) * self.width][col]
    }

    #[inline]
    pub fn set(
        &mut self,
        row: usize,
        col: usize,
        value: T,
    ) {
        self.row_mut(row)[col] = value;
    }
}

impl FrameMut<'_, f32> {
    #[inline]
    pub fn add(
        &mut self,
        row: usize,
        col: usize,
        value: f32,
    ) {
        self.row_mut(row)[col] += value;
    }
}

fn check_length(
    length: usize,
    height: usize,
    width: usize,
) -> Result<(), Error> {
    if height.checked_mul(width) != Some(length) {
        return Err(Error::Validation(
            format!("The length of the frame ({length})"),
            format!("{height} * {width}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn rows() {
        use super::*;

        let data = (0..12).collect::<Vec<i32>>();
        let frame = Frame::new(&data, 3, 4).unwrap();
        assert_eq!(frame.row(1), &[4, 5, 6, 7]);
        assert_eq!(frame.get(2, 3), 11);

        let mut data = vec![0.0; 6];
        let mut frame = FrameMut::new(&mut data, 2, 3).unwrap();
        frame.set(1, 0, 2.0);
        frame.add(1, 0, 0.5);
        frame.add(0, 2, -1.0);
        assert_eq!(frame.get(1, 0), 2.5);
        assert_eq!(data, [0.0, 0.0, -1.0, 2.5, 0.0, 0.0]);
    }

    #[test]
    fn length_mismatch() {
        use super::*;

        let data = vec![0_i32; 11];
        Frame::new(&data, 3, 4).unwrap_err();
    }

    #[test]
    #[should_panic]
    fn column_out_of_row() {
        use super::*;

        let data = vec![0_i32; 12];
        Frame::new(&data, 3, 4).unwrap().get(0, 4);
    }
}
