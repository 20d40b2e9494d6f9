//! Framegrab Services Library
//!
//! Integrations with external business services. Currently the selection
//! spreadsheet: one row per saved frame pair, behind the [`SelectionSheet`]
//! trait with a Google Sheets and an in-memory implementation.

pub mod sheets;

pub use sheets::{
    create_selection_sheet, MemorySheet, SelectionRow, SelectionSheet, SheetError, SheetResult,
    HEADER,
};

#[cfg(feature = "google-sheets")]
pub use sheets::{GoogleSheet, ServiceAccountAuth, StaticToken, TokenProvider};
