//! Coarse-grid digit recognition.
//!
//! The isolated region is resampled to a tiny grid (3×5 by default) and the
//! row-major indices of fully lit cells form a signature. A digit is
//! recognised only when that signature equals a catalog entry exactly; a
//! single flipped cell means no match.

use image::GrayImage;
use std::sync::{Arc, OnceLock};

use crate::detection::preprocessing::{resize_bilinear, FOREGROUND};
use crate::models::Recognition;

pub const GRID_COLS: u32 = 3;
pub const GRID_ROWS: u32 = 5;

/// Lit cells of digits 0-9 on the 3×5 grid, row-major and ascending
const STANDARD_SIGNATURES: [&[usize]; 10] = [
    &[0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 13, 14],
    &[0, 1, 4, 7, 10, 13],
    &[0, 1, 2, 5, 6, 7, 8, 9, 12, 13, 14],
    &[0, 1, 2, 5, 6, 7, 8, 11, 12, 13, 14],
    &[0, 2, 3, 5, 6, 7, 8, 11, 14],
    &[0, 1, 2, 3, 6, 7, 8, 11, 12, 13, 14],
    &[0, 1, 2, 3, 6, 7, 8, 9, 11, 12, 13, 14],
    &[0, 1, 2, 5, 8, 11, 14],
    &[0, 1, 2, 3, 5, 6, 7, 8, 9, 11, 12, 13, 14],
    &[0, 1, 2, 3, 5, 6, 7, 8, 11, 14],
];

static STANDARD: OnceLock<Arc<DigitCatalog>> = OnceLock::new();

/// Immutable table of digit signatures; entry `i` identifies digit `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitCatalog {
    cols: u32,
    rows: u32,
    signatures: Vec<Vec<usize>>,
}

impl DigitCatalog {
    /// Build a catalog for a `cols`×`rows` grid.
    ///
    /// Every signature must be strictly ascending and index cells inside
    /// the grid, and there can be at most ten of them.
    pub fn new(cols: u32, rows: u32, signatures: Vec<Vec<usize>>) -> anyhow::Result<Self> {
        if cols == 0 || rows == 0 {
            anyhow::bail!("Grid must have at least one cell, got {}x{}", cols, rows);
        }
        if signatures.len() > 10 {
            anyhow::bail!("Catalog holds digits 0-9 only, got {} signatures", signatures.len());
        }

        let cells = (cols * rows) as usize;
        for (digit, signature) in signatures.iter().enumerate() {
            if let Some(&cell) = signature.iter().find(|&&c| c >= cells) {
                anyhow::bail!(
                    "Signature for {} uses cell {} outside a {}-cell grid",
                    digit,
                    cell,
                    cells
                );
            }
            if signature.windows(2).any(|w| w[0] >= w[1]) {
                anyhow::bail!("Signature for {} is not strictly ascending", digit);
            }
        }

        Ok(Self {
            cols,
            rows,
            signatures,
        })
    }

    /// The seven-segment style 3×5 table, built on first use
    pub fn standard() -> Arc<DigitCatalog> {
        STANDARD
            .get_or_init(|| {
                Arc::new(DigitCatalog {
                    cols: GRID_COLS,
                    rows: GRID_ROWS,
                    signatures: STANDARD_SIGNATURES.iter().map(|s| s.to_vec()).collect(),
                })
            })
            .clone()
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cell_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn signature(&self, digit: u8) -> Option<&[usize]> {
        self.signatures.get(digit as usize).map(Vec::as_slice)
    }

    /// First entry exactly equal to `lit`
    pub fn lookup(&self, lit: &[usize]) -> Recognition {
        self.signatures
            .iter()
            .position(|signature| signature.as_slice() == lit)
            .map(|digit| Recognition::Digit(digit as u8))
            .unwrap_or(Recognition::NoMatch)
    }
}

/// Everything the matcher derived from one region
#[derive(Debug, Clone)]
pub struct DigitReading {
    /// The resampled `cols`×`rows` grid
    pub grid: GrayImage,
    /// Row-major indices of lit cells
    pub lit_cells: Vec<usize>,
    pub recognition: Recognition,
}

/// Row-major indices of cells that are exactly foreground
pub fn lit_cells(grid: &GrayImage) -> Vec<usize> {
    grid.pixels()
        .enumerate()
        .filter(|(_, p)| p[0] == FOREGROUND)
        .map(|(idx, _)| idx)
        .collect()
}

/// Classifies isolated regions against a shared catalog
#[derive(Debug, Clone)]
pub struct DigitMatcher {
    catalog: Arc<DigitCatalog>,
}

impl DigitMatcher {
    pub fn new(catalog: Arc<DigitCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DigitCatalog {
        &self.catalog
    }

    /// Resample `region` to the catalog grid and match its lit cells.
    ///
    /// A 0×0 region resamples to an all-dark grid and so never matches.
    pub fn read(&self, region: &GrayImage) -> DigitReading {
        let grid = resize_bilinear(region, self.catalog.cols(), self.catalog.rows());
        let lit_cells = lit_cells(&grid);
        let recognition = self.catalog.lookup(&lit_cells);

        DigitReading {
            grid,
            lit_cells,
            recognition,
        }
    }

    pub fn recognize(&self, region: &GrayImage) -> Recognition {
        self.read(region).recognition
    }
}

impl Default for DigitMatcher {
    fn default() -> Self {
        Self::new(DigitCatalog::standard())
    }
}
