//! HTML bead instruction sheet.
//!
//! Every bead row becomes two table rows: one with cells colored like the
//! matched beads, one with the short bead name under each cell. Thick
//! borders mark the edges of physical boards.

use std::path::Path;

use bead_pattern::{BeadPattern, PaletteIndex};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;

const TEMPLATE_NAME: &str = "instructions.html";
const TEMPLATE: &str = include_str!("templates/instructions.html");

#[derive(Debug, Serialize)]
struct SheetCell<'a> {
    color: String,
    name: &'a str,
    border: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct SheetRow<'a> {
    top: bool,
    bottom: bool,
    cells: Vec<SheetCell<'a>>,
}

/// First whitespace-separated word of a bead name ("01 White" -> "01").
pub fn short_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

fn column_border(x: u32, board_dimension: u32) -> Option<&'static str> {
    if x == 0 {
        Some("lb")
    } else if (x + 1) % board_dimension == 0 {
        Some("rb")
    } else {
        None
    }
}

fn closes_board(y: u32, board_dimension: u32) -> bool {
    y > 0 && (y + 1) % board_dimension == 0
}

/// Render the instruction sheet for a matched pattern.
///
/// The pattern must have been produced with bead names collected.
pub fn render_instructions(
    pattern: &BeadPattern,
    index: &PaletteIndex,
    board_dimension: u32,
    title: &str,
) -> Result<String, AppError> {
    let names = pattern.names().ok_or(AppError::MissingBeadNames)?;
    let board_dimension = board_dimension.max(1);
    let width = pattern.width() as usize;

    let rows: Vec<SheetRow<'_>> = names
        .chunks(width.max(1))
        .zip(0u32..)
        .map(|(row, y)| SheetRow {
            top: y == 0,
            bottom: closes_board(y, board_dimension),
            cells: row
                .iter()
                .zip(0u32..)
                .map(|(name, x)| SheetCell {
                    color: index
                        .get(name)
                        .map_or_else(|| "#000000".to_string(), |bead| bead.rgb().to_hex()),
                    name: short_name(name),
                    border: column_border(x, board_dimension),
                })
                .collect(),
        })
        .collect();

    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("rows", &rows);

    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

/// Render the instruction sheet and write it to `path`.
pub fn write_instructions(
    path: &Path,
    pattern: &BeadPattern,
    index: &PaletteIndex,
    board_dimension: u32,
) -> Result<(), AppError> {
    let title = path
        .file_stem()
        .map_or_else(|| "bead pattern".into(), |stem| stem.to_string_lossy());
    let html = render_instructions(pattern, index, board_dimension, &title)?;
    std::fs::write(path, html).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Instruction sheet written");
    Ok(())
}
