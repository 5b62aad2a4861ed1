pub mod encode;
pub mod gain;

pub use encode::{encode, AudioFormat};
pub use gain::{apply_gain, db_to_linear, normalize_rms};
