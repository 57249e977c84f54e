use image::{RgbaImage, imageops};
use miru_config::region::RegionConfig;
use miru_types::{Frame, Rect, RegionImage};

use crate::source::CaptureError;

/// Crop one region out of a frame. Rects partially outside the frame are
/// clipped to the overlap; a rect with no overlap at all is a hard error.
/// Pure function of its inputs.
pub fn extract_region(
    frame: &Frame,
    name: &str,
    rect: &Rect,
) -> Result<RegionImage, CaptureError> {
    let clipped = clip(rect, frame.width, frame.height)
        .ok_or_else(|| CaptureError::InvalidRegion(name.to_string()))?;

    let image = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| {
            CaptureError::Unavailable("frame buffer does not match dimensions".to_string())
        })?;

    let cropped = imageops::crop_imm(
        &image,
        clipped.x as u32,
        clipped.y as u32,
        clipped.width,
        clipped.height,
    )
    .to_image();

    Ok(RegionImage {
        region: name.to_string(),
        width: cropped.width(),
        height: cropped.height(),
        data: cropped.into_raw(),
        captured_at: frame.captured_at,
    })
}

/// Crop every configured region. Per-region results so one bad region
/// never hides its siblings.
pub fn extract_regions<'a>(
    frame: &Frame,
    regions: &'a [RegionConfig],
) -> Vec<(&'a RegionConfig, Result<RegionImage, CaptureError>)> {
    regions
        .iter()
        .map(|r| (r, extract_region(frame, &r.name, &r.rect)))
        .collect()
}

/// Intersect a rect with frame bounds. None when the overlap is empty.
fn clip(rect: &Rect, frame_width: u32, frame_height: u32) -> Option<Rect> {
    let left = rect.x.max(0);
    let top = rect.y.max(0);
    let right = rect.right().min(frame_width as i32);
    let bottom = rect.bottom().min(frame_height as i32);

    if left >= right || top >= bottom {
        return None;
    }

    Some(Rect::new(
        left,
        top,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}
