//! Column-major binary bitmap
//!
//! Each column is one byte, bit `y` holding row `y` counted from the top.
//! This is the same layout the render pass sends to the driver boards, so a
//! leaf's cached pixels can be copied column by column.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::config::MAX_COLUMNS;

/// Tallest bitmap (one byte per column)
pub const MAX_BITMAP_HEIGHT: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    columns: [u8; MAX_COLUMNS],
    width: u8,
    height: u8,
}

impl Bitmap {
    /// Create an all-off bitmap, clamping the size to the supported maximum
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            columns: [0; MAX_COLUMNS],
            width: width.min(MAX_COLUMNS as u8),
            height: height.min(MAX_BITMAP_HEIGHT),
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Pixel value; anything outside the bitmap is off
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.columns[x as usize] & (1 << y) != 0
    }

    /// Set a pixel; writes outside the bitmap are dropped
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if !self.contains(x, y) {
            return;
        }
        let mask = 1u8 << y;
        if on {
            self.columns[x as usize] |= mask;
        } else {
            self.columns[x as usize] &= !mask;
        }
    }

    pub fn clear(&mut self) {
        self.columns = [0; MAX_COLUMNS];
    }

    /// Raw column byte
    pub fn column(&self, x: u8) -> u8 {
        if x < self.width {
            self.columns[x as usize]
        } else {
            0
        }
    }

    /// True if at least one pixel is on
    pub fn any(&self) -> bool {
        self.columns[..self.width as usize].iter().any(|&c| c != 0)
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
