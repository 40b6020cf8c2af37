// SPDX-License-Identifier: MIT
//
// Image operations on in-memory rasters.

pub mod processor;

pub use processor::ImageProcessor;
