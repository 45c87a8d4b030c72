mod fonts;
mod layout;

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::imageops::FilterType;
use image::DynamicImage;
use plotters::coord::Shift;
use plotters::element::BitMapElement;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::collector::ResultRecord;
use crate::types::SweepResult;

use fonts::{ensure_title_font, TITLE_FONT_FAMILY};
pub use layout::{fit_within, MosaicLayout, TITLE_LINE_HEIGHT, TITLE_PADDING};

const TITLE_FONT_SIZE: f64 = 13.0;

type Cell<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders the results of a run into a single comparison image.
#[derive(Debug, Clone)]
pub struct MosaicRenderer {
    columns: usize,
    font_path: Option<PathBuf>,
}

impl MosaicRenderer {
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            font_path: None,
        }
    }

    /// Use a TrueType font from `path` for the cell titles.
    pub fn font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    /// Lay out `records` in scenario order and write the mosaic to `out_path`.
    ///
    /// Nothing is written when there are no records, in which case `None` is returned. The
    /// first image must be readable because it sizes the whole figure.
    pub fn render(
        &self,
        records: &[ResultRecord],
        out_path: &Path,
    ) -> SweepResult<Option<PathBuf>> {
        let Some(first) = records.first() else {
            log::warn!("No results to render");
            return Ok(None);
        };

        let first_dims = image::image_dimensions(&first.output_path).with_context(|| {
            format!(
                "Failed to read the first result {} to size the mosaic",
                first.output_path.display()
            )
        })?;
        let title_lines = records
            .iter()
            .map(|r| r.title_lines().count())
            .max()
            .unwrap_or(1);
        let layout = MosaicLayout::compute(records.len(), self.columns, first_dims, title_lines);
        log::debug!("Mosaic layout: {layout:?}");

        let draw_titles = ensure_title_font(self.font_path.as_deref());

        if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let root = BitMapBackend::new(out_path, layout.figure_size()).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error("fill the mosaic"))?;

        let cells = root.split_evenly((layout.rows, layout.columns));
        let mut titles_ok = draw_titles;
        // Cells past the last record are never drawn, which hides them.
        for (record, cell) in records.iter().zip(&cells) {
            if !draw_image(cell, record, &layout)? {
                continue;
            }
            if titles_ok {
                if let Err(e) = draw_title(cell, record, &layout) {
                    log::warn!("Skipping mosaic titles, failed to draw text: {e:?}");
                    titles_ok = false;
                }
            }
        }

        root.present().map_err(drawing_error("write the mosaic"))?;
        log::info!(
            "Comparison grid saved to '{}' ({} images, {}x{} grid)",
            out_path.display(),
            records.len(),
            layout.rows,
            layout.columns
        );

        Ok(Some(out_path.to_path_buf()))
    }
}

/// Draw the record's image in grayscale with nearest neighbour scaling, centred in the image
/// area of the cell. Returns false if the image could not be read, leaving the cell hidden.
fn draw_image(
    cell: &Cell<'_>,
    record: &ResultRecord,
    layout: &MosaicLayout,
) -> SweepResult<bool> {
    let image = match image::open(&record.output_path) {
        Ok(image) => image,
        Err(e) => {
            log::error!(
                "Failed to read result {}, leaving its cell empty: {e}",
                record.output_path.display()
            );
            return Ok(false);
        }
    };

    let gray = image.to_luma8();
    let (width, height) = fit_within(gray.dimensions(), (layout.cell_width, layout.image_height));
    let scaled = image::imageops::resize(&gray, width, height, FilterType::Nearest);
    let rgb = DynamicImage::ImageLuma8(scaled).to_rgb8();

    let x = (layout.cell_width - width) / 2;
    let y = layout.title_height + (layout.image_height - height) / 2;
    let element =
        BitMapElement::with_owned_buffer((x as i32, y as i32), (width, height), rgb.into_raw())
            .context("Scaled image does not match its buffer size")?;
    cell.draw(&element)
        .map_err(drawing_error("draw a result image"))?;

    Ok(true)
}

fn draw_title(cell: &Cell<'_>, record: &ResultRecord, layout: &MosaicLayout) -> SweepResult<()> {
    let style = (TITLE_FONT_FAMILY, TITLE_FONT_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let center = (layout.cell_width / 2) as i32;

    for (i, line) in record.title_lines().enumerate() {
        let y = (TITLE_PADDING + i as u32 * TITLE_LINE_HEIGHT) as i32;
        cell.draw_text(&line, &style, (center, y))
            .map_err(drawing_error("draw a title"))?;
    }

    Ok(())
}

fn drawing_error<E: std::fmt::Display>(action: &'static str) -> impl FnOnce(E) -> anyhow::Error {
    move |e| anyhow::anyhow!("Failed to {action}: {e}")
}
