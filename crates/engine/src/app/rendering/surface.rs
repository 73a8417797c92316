/// Borrowed RGBA8 frame that scenes draw into. All writes are clipped to the frame.
pub struct Surface<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Surface<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = pixel_byte_offset(self.width as usize, x as usize, y as usize)?;
        let bytes = self.frame.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn write_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let Some(offset) = pixel_byte_offset(self.width as usize, x as usize, y as usize) else {
            return;
        };
        if let Some(target) = self.frame.get_mut(offset..offset + 4) {
            target.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, rect_width: i32, rect_height: i32, color: [u8; 4]) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = x.saturating_add(rect_width).min(self.width as i32);
        let end_y = y.saturating_add(rect_height).min(self.height as i32);
        if end_x <= start_x || end_y <= start_y {
            return;
        }

        for py in start_y..end_y {
            for px in start_x..end_x {
                self.write_pixel(px, py, color);
            }
        }
    }

    /// Composites a uniform `color` over the whole frame at `alpha` (0 = untouched,
    /// 255 = solid). The destination alpha channel is left as is.
    pub fn fade_overlay(&mut self, color: [u8; 3], alpha: u8) {
        if alpha == 0 {
            return;
        }

        for chunk in self.frame.chunks_exact_mut(4) {
            for (channel, overlay) in chunk.iter_mut().zip(color) {
                *channel = blend_channel(*channel, overlay, alpha);
            }
        }
    }
}

fn pixel_byte_offset(width: usize, x: usize, y: usize) -> Option<usize> {
    y.checked_mul(width)
        .and_then(|row| row.checked_add(x))
        .and_then(|pixel| pixel.checked_mul(4))
}

fn blend_channel(destination: u8, source: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    let blended = u32::from(source) * alpha + u32::from(destination) * (255 - alpha) + 127;
    (blended / 255) as u8
}
