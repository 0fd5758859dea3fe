pub mod data_uri;
pub mod gemini;
pub mod image;
pub mod outcome;
pub mod request;
pub mod text;

pub use data_uri::*;
pub use image::*;
pub use outcome::*;
pub use request::*;
pub use text::*;
