pub mod batch_cmp;
pub mod compare;
pub mod errors;
pub mod manifest;
