/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the source and destination image sizes do not match.
    #[error("Image size mismatch: source ({0}x{1}) and destination ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the number of elements of an image does not fit in `usize`.
    #[error("Image size ({0}x{1}x{2}) overflows the addressable length")]
    ImageSizeOverflow(usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when a pixel value cannot be represented in the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),
}
