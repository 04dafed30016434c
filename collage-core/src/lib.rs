//! Core of a touch-driven photo collage: per-object transforms driven by gesture deltas, paint
//! order, and flattening a canvas into a PNG snapshot. Windowing, input recognition and file
//! pickers belong to the host, which talks to this crate through [`commands`].

pub mod bitmap;
pub mod commands;
pub mod id;
pub mod io;
pub mod state;
pub mod util;

use id::CollageID;
