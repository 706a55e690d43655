//! Format strategies: serialize a value, code it to bytes, compare it.
//!
//! | Constructor | Value | Extension | Diffing |
//! |---|---|---|---|
//! | [`lines`] | `str` | `txt` | line diff |
//! | [`json`] | `T: Serialize` | `json` | line diff |
//! | [`dump`] | `T: Debug` | `txt` | line diff |
//! | [`bytes`] | `[u8]` | `bin` | byte comparison |
//! | [`image`] | [`PixelBuffer`] | `png` | pixel diff |

pub mod binary;
pub mod image;
pub mod strategy;
pub mod text;

pub use binary::bytes;
pub use image::{image, image_exact, PixelBuffer};
pub use strategy::FormatStrategy;
pub use text::{dump, json, lines};
