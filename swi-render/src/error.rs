use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Tile output failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
