// SPDX-License-Identifier: MIT
//
// PDF reading and writing via `lopdf`.

pub mod reader;
pub mod writer;

pub use reader::{PdfReader, import_pdf_page, is_pdf};
pub use writer::{EncodedPage, PdfWriter};
