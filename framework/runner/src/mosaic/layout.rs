/// Image pixels per inch of figure, before the minimum cell size is applied.
pub const SIZE_DIVISOR: f64 = 100.0;
/// Smallest cell edge, in inches, so that sparse grids of small images stay legible.
pub const MIN_CELL_INCHES: f64 = 3.0;
/// Output pixels per inch of figure.
pub const DPI: f64 = 100.0;
/// Height of one line of title text, in pixels.
pub const TITLE_LINE_HEIGHT: u32 = 16;
/// Space above and below the title block, in pixels.
pub const TITLE_PADDING: u32 = 4;

/// The geometry of a comparison mosaic.
///
/// Every cell has the same size, derived from the dimensions of the first image. A cell is a
/// title band on top of an image area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicLayout {
    pub columns: usize,
    pub rows: usize,
    /// Number of cells that hold a result. The remaining cells are hidden.
    pub populated: usize,
    pub cell_width: u32,
    pub image_height: u32,
    pub title_height: u32,
}

impl MosaicLayout {
    /// Lay out `count` results in `columns` columns.
    ///
    /// `first_image` is the pixel size of the first result and `title_lines` the largest
    /// number of title lines over all results.
    pub fn compute(
        count: usize,
        columns: usize,
        first_image: (u32, u32),
        title_lines: usize,
    ) -> Self {
        let columns = columns.max(1);
        let rows = count.div_ceil(columns);

        Self {
            columns,
            rows,
            populated: count,
            cell_width: cell_pixels(first_image.0),
            image_height: cell_pixels(first_image.1),
            title_height: title_lines as u32 * TITLE_LINE_HEIGHT + 2 * TITLE_PADDING,
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    /// Cells after the last result, which are left out of the drawing entirely.
    pub fn hidden_cells(&self) -> usize {
        self.cells() - self.populated
    }

    pub fn cell_height(&self) -> u32 {
        self.image_height + self.title_height
    }

    /// Size of the whole figure in pixels.
    pub fn figure_size(&self) -> (u32, u32) {
        (
            self.columns as u32 * self.cell_width,
            self.rows as u32 * self.cell_height(),
        )
    }
}

fn cell_pixels(image_pixels: u32) -> u32 {
    let inches = (image_pixels as f64 / SIZE_DIVISOR).max(MIN_CELL_INCHES);
    (inches * DPI).round() as u32
}

/// Scale `image` to fit inside `bounds`, keeping its aspect ratio.
pub fn fit_within(image: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (w, h) = (image.0.max(1) as f64, image.1.max(1) as f64);
    let scale = (bounds.0 as f64 / w).min(bounds.1 as f64 / h);
    let fit = |edge: f64, bound: u32| ((edge * scale).round() as u32).clamp(1, bound.max(1));

    (fit(w, bounds.0), fit(h, bounds.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seven_results_in_three_columns() {
        let layout = MosaicLayout::compute(7, 3, (640, 480), 3);
        assert_eq!(layout.rows, 3);
        assert_eq!(layout.cells(), 9);
        assert_eq!(layout.hidden_cells(), 2);
    }

    #[test]
    fn exact_fit_has_no_hidden_cells() {
        let layout = MosaicLayout::compute(8, 4, (640, 480), 1);
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.hidden_cells(), 0);
    }

    #[test]
    fn large_images_scale_the_figure() {
        let layout = MosaicLayout::compute(4, 2, (1200, 900), 2);
        assert_eq!(layout.cell_width, 1200);
        assert_eq!(layout.image_height, 900);
        assert_eq!(
            layout.figure_size(),
            (2 * 1200, 2 * (900 + 2 * TITLE_LINE_HEIGHT + 2 * TITLE_PADDING))
        );
    }

    #[test]
    fn small_images_use_minimum_cell_size() {
        let layout = MosaicLayout::compute(1, 4, (40, 30), 1);
        assert_eq!(layout.cell_width, 300);
        assert_eq!(layout.image_height, 300);
        assert_eq!(layout.rows, 1);
        assert_eq!(layout.hidden_cells(), 3);
    }

    #[test]
    fn fit_within_keeps_aspect_ratio() {
        assert_eq!(fit_within((40, 20), (300, 300)), (300, 150));
        assert_eq!(fit_within((1000, 2000), (500, 500)), (250, 500));
        assert_eq!(fit_within((1, 10_000), (300, 300)), (1, 300));
    }
}
