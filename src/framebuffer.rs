/// screen width in pixels
pub const WIDTH: usize = 64;
/// screen height in pixels
pub const HEIGHT: usize = 32;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Monochrome 64x32 screen, one byte per pixel (0 or 1), row-major so that
/// index = x + y * 64. Tracks whether it has changed since the host last drew
/// it.
pub struct Framebuffer {
    cells: [u8; PIXEL_COUNT],
    draw_pending: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            cells: [0; PIXEL_COUNT],
            draw_pending: false,
        }
    }

    /// blank every pixel and flag the change
    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.draw_pending = true;
    }

    /// blank every pixel without telling the host; used on machine reset
    pub(crate) fn reset(&mut self) {
        self.cells.fill(0);
        self.draw_pending = false;
    }

    /// XOR a lit pixel onto the cell at index. Returns whether that turned a
    /// lit pixel off (a collision), or None if the index is off the end of
    /// the buffer.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let cell = self.cells.get_mut(index)?;
        let collided = *cell == 1;
        *cell ^= 1;
        self.draw_pending = true;
        Some(collided)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.draw_pending = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.cells[x + y * WIDTH] == 1
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    pub fn draw_pending(&self) -> bool {
        self.draw_pending
    }

    /// hand the dirty flag to the host, clearing it
    pub fn take_draw_pending(&mut self) -> bool {
        std::mem::take(&mut self.draw_pending)
    }

    /// iterator over coordinates of lit pixels
    pub fn lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == 1)
            .map(|(i, _)| (i % WIDTH, i / WIDTH))
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
