use super::canvas::Rgb;
use image::DynamicImage;
use image::imageops::FilterType;
use rand::Rng;
use rand::seq::{IndexedRandom, index};
use std::path::PathBuf;

const SAMPLE_EDGE: u32 = 64;
const SAMPLE_COUNT: usize = 6;
const RANDOM_COLOURS: usize = 5;
const FALLBACK_GREY: Rgb = [120, 120, 120];

/// Five random mid-tone colours.
pub fn random_palette<R: Rng + ?Sized>(rng: &mut R) -> Vec<Rgb> {
    (0..RANDOM_COLOURS)
        .map(|_| {
            [
                rng.random_range(80..=200),
                rng.random_range(80..=200),
                rng.random_range(80..=200),
            ]
        })
        .collect()
}

/// Up to six distinct pixels of a 64×64 thumbnail.
pub fn extract_palette<R: Rng + ?Sized>(source: &DynamicImage, rng: &mut R) -> Vec<Rgb> {
    let thumb = source
        .resize_exact(SAMPLE_EDGE, SAMPLE_EDGE, FilterType::Triangle)
        .to_rgb8();
    let pixels: Vec<Rgb> = thumb.pixels().map(|p| p.0).collect();
    if pixels.is_empty() {
        return Vec::new();
    }
    index::sample(rng, pixels.len(), SAMPLE_COUNT.min(pixels.len()))
        .into_iter()
        .map(|i| pixels[i])
        .collect()
}

/// Palette from a random curated image, or random colours when the pool is
/// empty. An unreadable image is logged and treated like an empty pool.
pub fn choose_palette<R: Rng + ?Sized>(curated: &[PathBuf], rng: &mut R) -> Vec<Rgb> {
    let Some(path) = curated.choose(rng) else {
        return random_palette(rng);
    };

    match image::open(path) {
        Ok(source) => {
            let palette = extract_palette(&source, rng);
            if palette.is_empty() {
                vec![FALLBACK_GREY]
            } else {
                palette
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable inspiration image");
            random_palette(rng)
        }
    }
}

/// Scale every channel by `factor`, saturating at 0 and 255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn adjust(color: Rgb, factor: f64) -> Rgb {
    color.map(|channel| (f64::from(channel) * factor).clamp(0.0, 255.0) as u8)
}
