use std::collections::TryReserveError;
use thiserror::Error;

/// Why a rasterize call produced no image. The destination buffer is left fully transparent in every case.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RasterError {
	#[error("Failed to grow rasterizer scratch memory: {0}")]
	AllocationFailure(#[from] TryReserveError),
	#[error("Destination buffer holds {actual} bytes, but {required} are needed")]
	BufferTooSmall { required: usize, actual: usize },
	#[error("Row stride of {stride} bytes cannot hold {width} pixels")]
	InvalidStride { stride: usize, width: usize },
	#[error("An image of {width}x{height} pixels does not fit in memory")]
	DimensionsTooLarge { width: usize, height: usize },
}
