//! Frame-difference motion detection

use thiserror::Error;

/// Bytes per RGBA pixel
const CHANNELS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Frame buffer is {actual} bytes; {width}x{height} RGBA needs {expected}")]
pub struct FrameSizeError {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// One sampled RGBA frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, FrameSizeError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(FrameSizeError {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame with every pixel set to `rgba`
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(pixels),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Sum of absolute R, G and B differences over the whole frame.
///
/// Alpha is ignored. Returns `None` when the frames differ in size.
pub fn frame_difference(prev: &Frame, cur: &Frame) -> Option<u64> {
    if prev.dimensions() != cur.dimensions() {
        return None;
    }

    let total = prev
        .data
        .chunks_exact(CHANNELS)
        .zip(cur.data.chunks_exact(CHANNELS))
        .map(|(a, b)| {
            (0..3)
                .map(|c| u64::from(a[c].abs_diff(b[c])))
                .sum::<u64>()
        })
        .sum();
    Some(total)
}

/// Compares each sampled frame with the previous one
#[derive(Debug, Default)]
pub struct MotionDetector {
    baseline: Option<Frame>,
}

impl MotionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Difference against the previous frame, then make `frame` the baseline.
    ///
    /// The first frame, and any frame whose size differs from the baseline,
    /// only establishes the baseline and yields `None`.
    pub fn observe(&mut self, frame: Frame) -> Option<u64> {
        let metric = self
            .baseline
            .as_ref()
            .and_then(|prev| frame_difference(prev, &frame));
        if metric.is_none() && self.baseline.is_some() {
            tracing::debug!(dimensions = ?frame.dimensions(), "Frame size changed, resetting baseline");
        }
        self.baseline = Some(frame);
        metric
    }

    /// Forget the baseline
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }
}
