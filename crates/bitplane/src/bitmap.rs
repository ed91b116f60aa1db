//! Borrowed views over packed 1bpp source images.

/// Geometry validation errors for [`BitmapRef::new`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BitmapError {
    /// Width is zero or not a multiple of 8.
    UnalignedWidth,
    /// Height is zero.
    EmptyImage,
    /// Row stride is shorter than the pixel data needs.
    StrideTooShort,
    /// Backing buffer is shorter than `row_stride * height`.
    BufferTooShort,
}

/// Immutable 1bpp bitmap view, MSB-first within each byte.
///
/// Geometry is validated once at construction; row and bit accessors
/// only ever see consistent bounds after that.
#[derive(Clone, Copy, Debug)]
pub struct BitmapRef<'a> {
    width: usize,
    height: usize,
    row_stride: usize,
    data: &'a [u8],
}

impl<'a> BitmapRef<'a> {
    pub fn new(
        width: usize,
        height: usize,
        row_stride: usize,
        data: &'a [u8],
    ) -> Result<Self, BitmapError> {
        if width == 0 || width % 8 != 0 {
            return Err(BitmapError::UnalignedWidth);
        }
        if height == 0 {
            return Err(BitmapError::EmptyImage);
        }
        if row_stride < width / 8 {
            return Err(BitmapError::StrideTooShort);
        }
        if data.len() < row_stride * height {
            return Err(BitmapError::BufferTooShort);
        }

        Ok(Self {
            width,
            height,
            row_stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Returns the packed bytes of row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }

        let start = y * self.row_stride;
        Some(&self.data[start..start + self.row_stride])
    }

    /// Reads bit `bit_index` of row `y`, counted from the left edge.
    pub fn read_bit(&self, y: usize, bit_index: usize) -> Option<bool> {
        if bit_index >= self.width {
            return None;
        }

        let row = self.row(y)?;
        let byte = row[bit_index / 8];
        Some(byte & (1 << (7 - (bit_index % 8))) != 0)
    }
}
