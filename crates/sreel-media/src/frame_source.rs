//! Seekable frame sources.
//!
//! The core never decodes media itself; callers hand it anything that
//! implements [`FrameSource`]. The optional `opencv` feature ships one
//! concrete backend decoding through `videoio`. A single decode handle must
//! never be used from two scoring calls at once, so sources are shared
//! behind a mutex that serializes seek+read.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};

/// Static properties of a frame source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Frames per second.
    pub fps: f64,
    /// Total decodable frames.
    pub frame_count: u64,
    /// Duration in seconds.
    pub duration: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Display rotation in degrees (0, 90, 180, 270).
    pub rotation: i32,
}

impl SourceInfo {
    /// Frame index closest to a timestamp.
    pub fn frame_at(&self, time: f64) -> u64 {
        if self.fps <= 0.0 {
            return 0;
        }
        ((time * self.fps).round() as u64).min(self.frame_count.saturating_sub(1))
    }

    /// Timestamp of a frame index, seconds.
    pub fn time_at(&self, frame: u64) -> f64 {
        if self.fps <= 0.0 {
            return 0.0;
        }
        frame as f64 / self.fps
    }

    /// Whether the source reports any decodable content.
    pub fn is_usable(&self) -> bool {
        self.duration > 0.0 && self.frame_count > 0 && self.fps > 0.0
    }
}

/// One decoded frame, packed RGB24.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGB24 pixel data, `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl Frame {
    /// Create a frame, validating the buffer length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> MediaResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(MediaError::decode_failed(format!(
                "frame buffer is {} bytes, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// A seekable source of decoded video frames.
///
/// `read_frame` returns `Ok(None)` when a single frame fails to decode;
/// callers skip that sample. Errors are reserved for failures that make the
/// whole source unusable.
pub trait FrameSource: Send {
    /// Static properties of the source.
    fn info(&self) -> SourceInfo;

    /// Decode the frame at `index`, or `None` if this frame cannot be read.
    fn read_frame(&mut self, index: u64) -> MediaResult<Option<Frame>>;
}

/// A frame source shared across scoring workers.
///
/// The mutex serializes seek+read; scoring happens outside the lock.
pub type SharedFrameSource = Arc<Mutex<dyn FrameSource>>;

/// Wrap a source for shared use.
pub fn share(source: impl FrameSource + 'static) -> SharedFrameSource {
    Arc::new(Mutex::new(source))
}

/// Lock a shared source, surfacing poisoning as an internal error.
pub(crate) fn lock_source(
    source: &SharedFrameSource,
) -> MediaResult<std::sync::MutexGuard<'_, dyn FrameSource + 'static>> {
    source
        .lock()
        .map_err(|_| MediaError::internal("frame source mutex poisoned"))
}

#[cfg(feature = "opencv")]
pub use self::opencv_backend::OpenCvFrameSource;

#[cfg(feature = "opencv")]
mod opencv_backend {
    use opencv::{imgproc, prelude::*, videoio};

    use super::{Frame, FrameSource, SourceInfo};
    use crate::error::{MediaError, MediaResult};

    /// Frame source backed by OpenCV `videoio`.
    pub struct OpenCvFrameSource {
        capture: videoio::VideoCapture,
        info: SourceInfo,
    }

    impl OpenCvFrameSource {
        /// Open a video file for seekable decoding.
        pub fn open(path: &str) -> MediaResult<Self> {
            let capture = videoio::VideoCapture::from_file(path, videoio::CAP_ANY)
                .map_err(|e| MediaError::decode_failed(format!("open {path}: {e}")))?;

            let opened = capture
                .is_opened()
                .map_err(|e| MediaError::decode_failed(format!("open {path}: {e}")))?;
            if !opened {
                return Err(MediaError::no_usable_content(format!(
                    "cannot open video source {path}"
                )));
            }

            let prop = |id: i32| -> MediaResult<f64> {
                capture
                    .get(id)
                    .map_err(|e| MediaError::decode_failed(format!("probe {path}: {e}")))
            };

            let fps = prop(videoio::CAP_PROP_FPS)?;
            let frame_count = prop(videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as u64;
            let width = prop(videoio::CAP_PROP_FRAME_WIDTH)?.max(0.0) as u32;
            let height = prop(videoio::CAP_PROP_FRAME_HEIGHT)?.max(0.0) as u32;
            // Not every container exposes orientation metadata; default to 0.
            let rotation = prop(videoio::CAP_PROP_ORIENTATION_META).unwrap_or(0.0) as i32;

            let duration = if fps > 0.0 {
                frame_count as f64 / fps
            } else {
                0.0
            };

            let info = SourceInfo {
                fps,
                frame_count,
                duration,
                width,
                height,
                rotation,
            };

            if !info.is_usable() {
                return Err(MediaError::no_usable_content(format!(
                    "video source {path} reports no decodable duration"
                )));
            }

            Ok(Self { capture, info })
        }
    }

    impl FrameSource for OpenCvFrameSource {
        fn info(&self) -> SourceInfo {
            self.info
        }

        fn read_frame(&mut self, index: u64) -> MediaResult<Option<Frame>> {
            self.capture
                .set(videoio::CAP_PROP_POS_FRAMES, index as f64)
                .map_err(|e| MediaError::decode_failed(format!("seek to frame {index}: {e}")))?;

            let mut bgr = Mat::default();
            let read = self
                .capture
                .read(&mut bgr)
                .map_err(|e| MediaError::decode_failed(format!("read frame {index}: {e}")))?;
            if !read || bgr.empty() {
                // Single-frame decode failure: the caller skips this sample.
                return Ok(None);
            }

            let mut rgb = Mat::default();
            imgproc::cvt_color(
                &bgr,
                &mut rgb,
                imgproc::COLOR_BGR2RGB,
                0,
                opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
            )
            .map_err(|e| MediaError::decode_failed(format!("bgr2rgb frame {index}: {e}")))?;

            let width = rgb.cols() as u32;
            let height = rgb.rows() as u32;
            let data = rgb
                .data_bytes()
                .map_err(|e| MediaError::decode_failed(format!("frame bytes {index}: {e}")))?
                .to_vec();

            Frame::new(width, height, data).map(Some)
        }
    }
}
