pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    absolute_pin_url, medium_resolution_fallback, search_url, split_media_filename,
    upscale_thumbnail,
};
