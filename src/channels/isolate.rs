use super::buffer::BgraImage;
use super::channel::ColorChannel;
use crate::errors::Result;

/// Returns a copy of `source` where only `channel` and alpha survive.
///
/// The two other color bytes of every pixel are overwritten with zero.
/// `source` is only read.
pub fn isolate(source: &BgraImage, channel: ColorChannel) -> Result<BgraImage> {
    let isolated = source.try_clone()?;

    let mut view = isolated.lock_pixels_mut()?;
    mask_channels(view.pixels_mut(), channel);
    view.commit();

    tracing::debug!(
        %channel,
        width = isolated.width(),
        height = isolated.height(),
        "isolated channel"
    );
    Ok(isolated)
}

fn mask_channels<'a>(pixels: impl Iterator<Item = &'a mut [u8]>, channel: ColorChannel) {
    let [first, second] = channel.other_offsets();
    for px in pixels {
        px[first] = 0;
        px[second] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::channel::ALPHA_OFFSET;
    use std::sync::Arc;

    fn poison(img: &Arc<BgraImage>) {
        let img = Arc::clone(img);
        let _ = std::thread::spawn(move || {
            let _view = img.lock_pixels_mut().unwrap();
            panic!("accessor panicked mid-pass");
        })
        .join();
    }

    fn gradient(width: u32, height: u32) -> BgraImage {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v.wrapping_mul(3), v.wrapping_add(17), 255 - v]
            })
            .collect();
        BgraImage::from_raw(width, height, pixels).unwrap()
    }

    #[test]
    fn test_single_pixel_red() {
        let img = BgraImage::from_raw(1, 1, vec![10, 20, 30, 255]).unwrap();
        let red = isolate(&img, ColorChannel::Red).unwrap();
        assert_eq!(red.into_raw().unwrap(), vec![0, 0, 30, 255]);
    }

    #[test]
    fn test_single_pixel_green_and_blue() {
        let img = BgraImage::from_raw(1, 1, vec![10, 20, 30, 255]).unwrap();
        let green = isolate(&img, ColorChannel::Green).unwrap();
        let blue = isolate(&img, ColorChannel::Blue).unwrap();
        assert_eq!(green.into_raw().unwrap(), vec![0, 20, 0, 255]);
        assert_eq!(blue.into_raw().unwrap(), vec![10, 0, 0, 255]);
    }

    #[test]
    fn test_preserves_dimensions_alpha_and_selected_channel() {
        let img = gradient(7, 5);
        let source = img.lock_pixels().unwrap().to_vec();

        for channel in ColorChannel::ALL {
            let isolated = isolate(&img, channel).unwrap();
            assert_eq!(isolated.dimensions(), (7, 5));

            let view = isolated.lock_pixels().unwrap();
            for (out, src) in view.pixels().zip(source.chunks_exact(4)) {
                assert_eq!(out[ALPHA_OFFSET], src[ALPHA_OFFSET]);
                assert_eq!(channel.value(out), channel.value(src));
                for offset in channel.other_offsets() {
                    assert_eq!(out[offset], 0);
                }
            }
        }
    }

    #[test]
    fn test_source_untouched() {
        let img = gradient(4, 4);
        let before = img.lock_pixels().unwrap().to_vec();
        let _ = isolate(&img, ColorChannel::Green).unwrap();
        assert_eq!(&*img.lock_pixels().unwrap(), before.as_slice());
    }

    #[test]
    fn test_idempotent() {
        let img = gradient(9, 3);
        for channel in ColorChannel::ALL {
            let once = isolate(&img, channel).unwrap();
            let twice = isolate(&once, channel).unwrap();
            assert_eq!(once.into_raw().unwrap(), twice.into_raw().unwrap());
        }
    }

    #[test]
    fn test_isolate_after_view_released() {
        let img = gradient(2, 2);
        {
            let view = img.lock_pixels().unwrap();
            assert_eq!(view.pixel_count(), 4);
        }
        assert!(isolate(&img, ColorChannel::Blue).is_ok());
    }

    #[test]
    fn test_poisoned_source_is_invalid_state() {
        let img = Arc::new(gradient(3, 3));
        poison(&img);

        for channel in ColorChannel::ALL {
            let err = isolate(&img, channel).err().expect("poisoned source must fail");
            assert_eq!(err.error_code(), "INVALID_IMAGE_STATE");
        }
    }

    #[test]
    fn test_view_held_by_caller_is_invalid_state() {
        let img = gradient(3, 3);
        let view = img.lock_pixels().unwrap();

        let err = isolate(&img, ColorChannel::Red).err().expect("held view must fail");
        assert_eq!(err.error_code(), "INVALID_IMAGE_STATE");

        drop(view);
        assert!(isolate(&img, ColorChannel::Red).is_ok());
    }
}
