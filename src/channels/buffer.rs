use super::channel::{ColorChannel, ALPHA_OFFSET, BYTES_PER_PIXEL};
use crate::errors::{Result, SplitError};
use image::{DynamicImage, RgbaImage};
use std::ops::{Deref, DerefMut, Range};
use std::slice::{ChunksExact, ChunksExactMut};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread::{self, ThreadId};

/// Largest pixel count an image may have, so every histogram bucket fits a `u32`.
pub const MAX_PIXELS: usize = u32::MAX as usize;

/// An 8-bit image stored as tightly packed BGRA pixels, row-major.
///
/// The pixel bytes sit behind a lock: at most one [`PixelBuffer`] or
/// [`PixelBufferMut`] can be checked out at a time. The blocking accessors
/// wait while another thread holds a view, the `try_` accessors reject with
/// [`SplitError::InvalidImageState`]. Asking for a second view from the
/// thread that already holds one is always rejected.
#[derive(Debug)]
pub struct BgraImage {
    width: u32,
    height: u32,
    pixels: Mutex<Vec<u8>>,
    holder: Mutex<Option<ThreadId>>,
}

fn expected_len(width: u32, height: u32) -> Option<usize> {
    let pixel_count = (width as usize).checked_mul(height as usize)?;
    if pixel_count > MAX_PIXELS {
        return None;
    }
    pixel_count.checked_mul(BYTES_PER_PIXEL)
}

fn poisoned() -> SplitError {
    SplitError::invalid_state("pixel buffer poisoned by a panicked accessor")
}

fn already_checked_out() -> SplitError {
    SplitError::invalid_state("pixel buffer is already checked out")
}

impl BgraImage {
    fn new_unchecked(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels: Mutex::new(pixels),
            holder: Mutex::new(None),
        }
    }

    /// Wraps an existing BGRA buffer. The length must be exactly `width * height * 4`
    /// and the pixel count at most [`MAX_PIXELS`].
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        match expected_len(width, height) {
            Some(expected) if expected == pixels.len() => {
                Ok(Self::new_unchecked(width, height, pixels))
            }
            expected => Err(SplitError::DimensionMismatch {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: pixels.len(),
            }),
        }
    }

    /// Image filled with a single BGRA pixel value.
    pub fn from_pixel(width: u32, height: u32, bgra: [u8; 4]) -> Result<Self> {
        let len = expected_len(width, height).ok_or(SplitError::DimensionMismatch {
            width,
            height,
            expected: usize::MAX,
            actual: 0,
        })?;
        let pixels = bgra.iter().copied().cycle().take(len).collect();
        Self::from_raw(width, height, pixels)
    }

    /// Converts a decoded image into BGRA. Images without alpha end up opaque.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixels = rgba.into_raw();

        for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            let [r, g, b, a] = [px[0], px[1], px[2], px[3]];
            px[ColorChannel::Red.offset()] = r;
            px[ColorChannel::Green.offset()] = g;
            px[ColorChannel::Blue.offset()] = b;
            px[ALPHA_OFFSET] = a;
        }

        Self::from_raw(width, height, pixels)
    }

    /// Swizzles the pixels back to RGBA for encoding or display.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let view = self.lock_pixels()?;
        let mut rgba = Vec::with_capacity(view.len());
        for px in view.pixels() {
            rgba.extend_from_slice(&[
                ColorChannel::Red.value(px),
                ColorChannel::Green.value(px),
                ColorChannel::Blue.value(px),
                px[ALPHA_OFFSET],
            ]);
        }
        let actual = rgba.len();

        RgbaImage::from_raw(self.width, self.height, rgba).ok_or(SplitError::DimensionMismatch {
            width: self.width,
            height: self.height,
            expected: expected_len(self.width, self.height).unwrap_or(usize::MAX),
            actual,
        })
    }

    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        Ok(DynamicImage::ImageRgba8(self.to_rgba_image()?))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Read-only view, waiting for a view held by another thread to be released.
    pub fn lock_pixels(&self) -> Result<PixelBuffer<'_>> {
        let guard = self.blocking_guard()?;
        Ok(PixelBuffer {
            guard: Some(guard),
            holder: &self.holder,
            stride: self.stride(),
        })
    }

    /// Mutable view, waiting for a view held by another thread to be released.
    pub fn lock_pixels_mut(&self) -> Result<PixelBufferMut<'_>> {
        let guard = self.blocking_guard()?;
        Ok(PixelBufferMut {
            guard: Some(guard),
            holder: &self.holder,
            stride: self.stride(),
            committed: false,
        })
    }

    /// Read-only view; fails if another view is outstanding.
    pub fn try_lock_pixels(&self) -> Result<PixelBuffer<'_>> {
        let guard = self.try_guard()?;
        Ok(PixelBuffer {
            guard: Some(guard),
            holder: &self.holder,
            stride: self.stride(),
        })
    }

    /// Mutable view; fails if another view is outstanding.
    pub fn try_lock_pixels_mut(&self) -> Result<PixelBufferMut<'_>> {
        let guard = self.try_guard()?;
        Ok(PixelBufferMut {
            guard: Some(guard),
            holder: &self.holder,
            stride: self.stride(),
            committed: false,
        })
    }

    fn holder_slot(&self) -> MutexGuard<'_, Option<ThreadId>> {
        // Only ever holds a ThreadId, nothing to repair after a panic
        self.holder.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn blocking_guard(&self) -> Result<MutexGuard<'_, Vec<u8>>> {
        let current = thread::current().id();
        if *self.holder_slot() == Some(current) {
            return Err(already_checked_out());
        }
        let guard = self.pixels.lock().map_err(|_| poisoned())?;
        *self.holder_slot() = Some(current);
        Ok(guard)
    }

    fn try_guard(&self) -> Result<MutexGuard<'_, Vec<u8>>> {
        let guard = match self.pixels.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(already_checked_out()),
            Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
        };
        *self.holder_slot() = Some(thread::current().id());
        Ok(guard)
    }

    /// Independent byte-for-byte copy. The copy shares no lock with `self`.
    pub fn try_clone(&self) -> Result<BgraImage> {
        let view = self.lock_pixels()?;
        Ok(Self::new_unchecked(self.width, self.height, view.to_vec()))
    }

    pub fn into_raw(self) -> Result<Vec<u8>> {
        self.pixels.into_inner().map_err(|_| poisoned())
    }
}

/// Clears the holder before the pixel lock itself is released.
fn release(guard: &mut Option<MutexGuard<'_, Vec<u8>>>, holder: &Mutex<Option<ThreadId>>) {
    if guard.is_some() {
        *holder.lock().unwrap_or_else(|e| e.into_inner()) = None;
        *guard = None;
    }
}

/// Read-only pixel view. The image is unlocked when this is dropped.
pub struct PixelBuffer<'a> {
    guard: Option<MutexGuard<'a, Vec<u8>>>,
    holder: &'a Mutex<Option<ThreadId>>,
    stride: usize,
}

impl PixelBuffer<'_> {
    fn bytes(&self) -> &[u8] {
        self.guard.as_deref().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn pixels(&self) -> ChunksExact<'_, u8> {
        self.bytes().chunks_exact(BYTES_PER_PIXEL)
    }

    pub fn pixel_count(&self) -> usize {
        self.bytes().len() / BYTES_PER_PIXEL
    }

    /// Bytes of the given rows.
    pub fn rows(&self, rows: Range<usize>) -> &[u8] {
        &self.bytes()[rows.start * self.stride..rows.end * self.stride]
    }
}

impl Deref for PixelBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes()
    }
}

impl Drop for PixelBuffer<'_> {
    fn drop(&mut self) {
        release(&mut self.guard, self.holder);
    }
}

/// Mutable pixel view. Call [`commit`](Self::commit) once the pass is done;
/// the image is unlocked on every exit path either way.
pub struct PixelBufferMut<'a> {
    guard: Option<MutexGuard<'a, Vec<u8>>>,
    holder: &'a Mutex<Option<ThreadId>>,
    stride: usize,
    committed: bool,
}

impl PixelBufferMut<'_> {
    pub fn pixels_mut(&mut self) -> ChunksExactMut<'_, u8> {
        self.deref_mut().chunks_exact_mut(BYTES_PER_PIXEL)
    }

    pub fn pixel_count(&self) -> usize {
        self.len() / BYTES_PER_PIXEL
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Publishes the mutation and releases the image.
    pub fn commit(mut self) {
        self.committed = true;
        tracing::trace!(bytes = self.len(), "pixel buffer committed");
    }
}

impl Deref for PixelBufferMut<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.guard.as_deref().map(Vec::as_slice).unwrap_or_default()
    }
}

impl DerefMut for PixelBufferMut<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.guard
            .as_deref_mut()
            .map(Vec::as_mut_slice)
            .unwrap_or_default()
    }
}

impl Drop for PixelBufferMut<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("mutable pixel buffer released without commit");
        }
        release(&mut self.guard, self.holder);
    }
}
