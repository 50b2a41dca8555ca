//! Utility module: shared helpers
pub mod header_converter;

pub use self::header_converter::HeaderConverter;
pub use feedlens_engine::utils::preview_compact;
