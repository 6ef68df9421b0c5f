pub mod preflight;
pub mod submit;
