use crate::engine::{Rect, Size};

/// Equal-sized frames cut from one texture, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    frames: Vec<Rect>,
    frame_size: Size,
}

impl SpriteSheet {
    pub fn grid(width: f64, height: f64, cols: u32, rows: u32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let frame_size = Size {
            width: width / f64::from(cols),
            height: height / f64::from(rows),
        };
        let frames = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .map(|(row, col)| {
                Rect::new(
                    f64::from(col) * frame_size.width,
                    f64::from(row) * frame_size.height,
                    frame_size.width,
                    frame_size.height,
                )
            })
            .collect();
        SpriteSheet { frames, frame_size }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Rect> {
        self.frames.get(index)
    }

    pub fn frame_size(&self) -> Size {
        self.frame_size
    }
}

/// [0, 1) split into `frame_count` equal bins, anything past the end clamps
/// to the last frame.
pub fn frame_index(t: f64, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let bin = (t.max(0.0) * frame_count as f64).floor() as usize;
    bin.min(frame_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_by_three_grid_is_row_major() {
        let sheet = SpriteSheet::grid(300.0, 150.0, 3, 3);
        assert_eq!(sheet.len(), 9);
        assert_eq!(sheet.frame(1), Some(&Rect::new(100.0, 0.0, 100.0, 50.0)));
        assert_eq!(sheet.frame(3), Some(&Rect::new(0.0, 50.0, 100.0, 50.0)));
        assert_eq!(sheet.frame(9), None);
    }

    #[test]
    fn progress_maps_to_equal_bins() {
        assert_eq!(frame_index(0.0, 9), 0);
        assert_eq!(frame_index(0.11, 9), 0);
        assert_eq!(frame_index(0.12, 9), 1);
        assert_eq!(frame_index(0.999, 9), 8);
        assert_eq!(frame_index(1.5, 9), 8);
        assert_eq!(frame_index(0.5, 0), 0);
    }
}
