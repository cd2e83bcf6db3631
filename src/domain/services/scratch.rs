//! Scratch-to-reveal overlay.
//!
//! The overlay is a grid of cells over the card. Pointer or touch strokes
//! erase every cell whose centre lies within the brush radius; coverage is
//! sampled on a stride rather than over every cell, and the card counts as
//! revealed once the sampled coverage reaches [`REVEAL_THRESHOLD`].

pub const REVEAL_THRESHOLD: f32 = 0.5;
pub const DEFAULT_CELL_SIZE: u32 = 8;
pub const DEFAULT_BRUSH_RADIUS: f32 = 24.0;
const SAMPLE_STRIDE: usize = 4;

#[derive(Debug, Clone)]
pub struct ScratchCard {
    cols: u32,
    rows: u32,
    cell_size: u32,
    brush_radius: f32,
    erased: Vec<bool>,
    last_point: Option<(f32, f32)>,
    revealed: bool,
}

impl ScratchCard {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_brush(width, height, DEFAULT_CELL_SIZE, DEFAULT_BRUSH_RADIUS)
    }

    pub fn with_brush(width: u32, height: u32, cell_size: u32, brush_radius: f32) -> Self {
        let cell_size = cell_size.max(1);
        let cols = width.div_ceil(cell_size).max(1);
        let rows = height.div_ceil(cell_size).max(1);
        Self {
            cols,
            rows,
            cell_size,
            brush_radius: brush_radius.max(0.0),
            erased: vec![false; (cols * rows) as usize],
            last_point: None,
            revealed: false,
        }
    }

    /// Pointer down / touch start.
    pub fn begin_stroke(&mut self, x: f32, y: f32) -> bool {
        self.last_point = Some((x, y));
        self.erase_disc(x, y);
        self.check_reveal()
    }

    /// Pointer move. Erases along the segment from the previous point so fast strokes leave no gaps.
    pub fn stroke_to(&mut self, x: f32, y: f32) -> bool {
        let Some((px, py)) = self.last_point else {
            return self.begin_stroke(x, y);
        };

        let distance = ((x - px).powi(2) + (y - py).powi(2)).sqrt();
        let step = (self.brush_radius / 2.0).max(1.0);
        let steps = (distance / step).ceil().max(1.0) as u32;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.erase_disc(px + (x - px) * t, py + (y - py) * t);
        }

        self.last_point = Some((x, y));
        self.check_reveal()
    }

    /// Pointer up / touch end.
    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    pub fn coverage(&self) -> f32 {
        let sampled = self.erased.iter().step_by(SAMPLE_STRIDE);
        let (total, cleared) = sampled.fold((0u32, 0u32), |(total, cleared), &e| {
            (total + 1, cleared + u32::from(e))
        });
        if total == 0 {
            return 0.0;
        }
        cleared as f32 / total as f32
    }

    /// Once revealed the card stays revealed.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn check_reveal(&mut self) -> bool {
        if !self.revealed && self.coverage() >= REVEAL_THRESHOLD {
            self.revealed = true;
        }
        self.revealed
    }

    fn erase_disc(&mut self, x: f32, y: f32) {
        let cell = self.cell_size as f32;
        let r = self.brush_radius;
        let min_col = ((x - r) / cell).floor().max(0.0) as u32;
        let min_row = ((y - r) / cell).floor().max(0.0) as u32;
        let max_col = (((x + r) / cell).floor().max(0.0) as u32).min(self.cols - 1);
        let max_row = (((y + r) / cell).floor().max(0.0) as u32).min(self.rows - 1);

        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let cx = (col as f32 + 0.5) * cell;
                let cy = (row as f32 + 0.5) * cell;
                if (cx - x).powi(2) + (cy - y).powi(2) <= r * r {
                    self.erased[(row * self.cols + col) as usize] = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dab_does_not_reveal() {
        let mut card = ScratchCard::new(320, 200);
        assert!(!card.begin_stroke(160.0, 100.0));
        assert!(card.coverage() > 0.0);
        assert!(card.coverage() < REVEAL_THRESHOLD);
    }

    #[test]
    fn test_sweeping_strokes_reveal() {
        let mut card = ScratchCard::new(320, 200);
        let mut y = 0.0;
        while y <= 200.0 {
            card.begin_stroke(0.0, y);
            card.stroke_to(320.0, y);
            card.end_stroke();
            y += 30.0;
        }
        assert!(card.is_revealed());
        assert!(card.coverage() >= REVEAL_THRESHOLD);
    }

    #[test]
    fn test_points_outside_canvas_are_clamped() {
        let mut card = ScratchCard::new(100, 100);
        card.begin_stroke(-500.0, -500.0);
        card.stroke_to(1000.0, 1000.0);
        assert!(card.coverage() > 0.0);
    }
}
