//! One drawing recipe per [`Icon`], laid out inside a square box.

use super::canvas::{Bounds, Canvas, Rgb, opaque};
use crate::catalog::Icon;
use image::Rgba;

const INK: Rgba<u8> = opaque([40, 40, 40]);
const DARK: Rgba<u8> = opaque([30, 30, 30]);
const WHITE: Rgba<u8> = opaque([245, 245, 245]);
const SMOKE: Rgba<u8> = opaque([235, 235, 235]);
const BEAK: Rgba<u8> = opaque([245, 180, 60]);
const COMB: Rgba<u8> = opaque([220, 60, 60]);
const SUN: Rgba<u8> = opaque([245, 215, 90]);
const SEA: Rgba<u8> = opaque([90, 170, 220]);
const SAND: Rgba<u8> = opaque([240, 210, 140]);
const TAIL: Rgba<u8> = opaque([150, 150, 150]);
const SMUDGE: Rgba<u8> = opaque([90, 90, 90]);
const FILTER: Rgba<u8> = opaque([240, 200, 120]);
const STEM: Rgba<u8> = opaque([245, 230, 210]);
const GLASS: Rgba<u8> = opaque([240, 240, 240]);

pub fn draw_icon(canvas: &mut Canvas, icon: Icon, b: Bounds, fill: Rgb) {
    let f = opaque(fill);
    match icon {
        Icon::Owl => owl(canvas, b, f),
        Icon::Cat => cat(canvas, b, f),
        Icon::DirtyCat => {
            cat(canvas, b, f);
            canvas.fill_ellipse(Bounds::new(b.x1 + 8, b.y1 + 12, b.x1 + 18, b.y1 + 22), SMUDGE);
        }
        Icon::Skunk => {
            let (cx, _) = b.center();
            canvas.fill_ellipse(b, f);
            canvas.fill_rect(Bounds::new(cx - 6, b.y1 + 6, cx + 6, b.y2 - 6), WHITE);
            canvas.fill_ellipse(Bounds::new(b.x2 - 18, b.y1 + 8, b.x2, b.y1 + 26), WHITE);
        }
        Icon::Possum => {
            canvas.fill_ellipse(b, f);
            canvas.fill_ellipse(Bounds::new(b.x1 + 8, b.y1 + 12, b.x1 + 24, b.y1 + 28), WHITE);
            canvas.fill_ellipse(Bounds::new(b.x2 - 24, b.y1 + 12, b.x2 - 8, b.y1 + 28), WHITE);
            canvas.line((b.x2 - 6, b.y2 - 12), (b.x2 + 18, b.y2 - 2), TAIL, 4);
        }
        Icon::Chicken => chicken(canvas, b, f),
        Icon::Squirrel => {
            canvas.fill_ellipse(Bounds::new(b.x1 + 10, b.y1 + 10, b.x2 - 20, b.y2 - 10), f);
            canvas.stroke_ellipse(Bounds::new(b.x2 - 30, b.y1 - 6, b.x2 + 10, b.y2 - 20), f, 6);
        }
        Icon::Vaping => {
            canvas.fill_rect(Bounds::new(b.x1 + 10, b.y2 - 20, b.x1 + 38, b.y2 - 8), f);
            canvas.line((b.x1 + 38, b.y2 - 14), (b.x1 + 58, b.y2 - 20), f, 4);
            for step in 0..3 {
                let dx = step * 8;
                let puff = Bounds::new(b.x1 + 40 + dx, b.y1 + 6, b.x1 + 58 + dx, b.y1 + 24);
                canvas.arc(puff, 200.0, 20.0, SMOKE, 3);
            }
        }
        Icon::Sleeping => {
            canvas.stroke_ellipse(Bounds::new(b.x1 + 10, b.y1 + 10, b.x2 - 10, b.y2 - 10), f, 4);
            zed(canvas, b.x1 + 18, b.y1 + 8, 10, f);
            zed(canvas, b.x1 + 30, b.y1 + 2, 7, f);
        }
        Icon::Falling => {
            canvas.line((b.x1 + 20, b.y1 + 20), (b.x2 - 20, b.y2 - 20), f, 4);
            canvas.fill_ellipse(Bounds::new(b.x2 - 26, b.y2 - 26, b.x2 - 10, b.y2 - 10), f);
        }
        Icon::Slipping => {
            canvas.arc(Bounds::new(b.x1 + 8, b.y2 - 30, b.x1 + 46, b.y2 - 6), 200.0, 20.0, SUN, 6);
            canvas.line((b.x1 + 50, b.y1 + 20), (b.x2 - 20, b.y2 - 10), f, 4);
            canvas.fill_ellipse(Bounds::new(b.x2 - 20, b.y2 - 20, b.x2 - 6, b.y2 - 6), f);
        }
        Icon::Laughing => {
            canvas.fill_ellipse(b, f);
            canvas.arc(Bounds::new(b.x1 + 14, b.y1 + 14, b.x2 - 14, b.y2 - 14), 200.0, 340.0, DARK, 4);
            canvas.fill_ellipse(Bounds::new(b.x1 + 20, b.y1 + 20, b.x1 + 32, b.y1 + 32), DARK);
            canvas.fill_ellipse(Bounds::new(b.x2 - 32, b.y1 + 20, b.x2 - 20, b.y1 + 32), DARK);
        }
        Icon::Mischief => {
            canvas.stroke_rect(b, f, 4);
            canvas.fill_ellipse(Bounds::new(b.x1 + 12, b.y1 + 18, b.x1 + 30, b.y1 + 36), f);
            canvas.fill_ellipse(Bounds::new(b.x2 - 30, b.y1 + 18, b.x2 - 12, b.y1 + 36), f);
            canvas.arc(Bounds::new(b.x1 + 16, b.y2 - 30, b.x2 - 16, b.y2 - 10), 0.0, 180.0, f, 3);
        }
        Icon::Snowboarding => {
            canvas.line((b.x1 + 10, b.y2 - 18), (b.x2 - 10, b.y2 - 6), f, 6);
            canvas.line((b.x1 + 20, b.y1 + 20), (b.x2 - 30, b.y2 - 24), f, 4);
            canvas.fill_ellipse(Bounds::new(b.x2 - 34, b.y2 - 42, b.x2 - 18, b.y2 - 26), f);
        }
        Icon::Fishing => {
            canvas.line((b.x1 + 12, b.y1 + 10), (b.x2 - 12, b.y2 - 10), f, 4);
            canvas.line((b.x2 - 12, b.y2 - 10), (b.x2 - 6, b.y2 + 4), f, 2);
            canvas.stroke_ellipse(Bounds::new(b.x2 - 10, b.y2, b.x2 + 4, b.y2 + 14), f, 3);
        }
        Icon::Car => {
            canvas.fill_rect(Bounds::new(b.x1 + 10, b.y1 + 20, b.x2 - 10, b.y2 - 12), f);
            canvas.fill_rect(Bounds::new(b.x1 + 24, b.y1 + 6, b.x2 - 24, b.y1 + 24), f);
            canvas.fill_ellipse(Bounds::new(b.x1 + 16, b.y2 - 18, b.x1 + 34, b.y2), DARK);
            canvas.fill_ellipse(Bounds::new(b.x2 - 34, b.y2 - 18, b.x2 - 16, b.y2), DARK);
        }
        Icon::Bar => {
            canvas.fill_rect(Bounds::new(b.x1 + 10, b.y2 - 24, b.x2 - 10, b.y2 - 8), f);
            for offset in [0, 18, 36] {
                let glass = Bounds::new(b.x1 + 12 + offset, b.y1 + 12, b.x1 + 20 + offset, b.y2 - 26);
                canvas.fill_rect(glass, GLASS);
            }
        }
        Icon::Beach => {
            canvas.fill_ellipse(Bounds::new(b.x1 + 8, b.y1 + 8, b.x1 + 28, b.y1 + 28), SUN);
            canvas.fill_rect(Bounds::new(b.x1 + 8, b.y2 - 18, b.x2 - 8, b.y2 - 8), SEA);
            canvas.arc(Bounds::new(b.x1 + 8, b.y2 - 30, b.x2 - 8, b.y2 - 6), 0.0, 180.0, SAND, 4);
        }
        Icon::StoreSign => {
            canvas.stroke_rect(Bounds::new(b.x1 + 8, b.y1 + 10, b.x2 - 8, b.y2 - 12), f, 3);
            // Lettering stand-in: two rules of "text" across the sign.
            canvas.line((b.x1 + 14, b.y1 + 22), (b.x2 - 14, b.y1 + 22), f, 3);
            canvas.line((b.x1 + 14, b.y1 + 32), (b.x2 - 24, b.y1 + 32), f, 3);
        }
        Icon::RockConcert => {
            canvas.line((b.x1 + 20, b.y1 + 10), (b.x1 + 20, b.y2 - 10), f, 4);
            canvas.stroke_ellipse(Bounds::new(b.x1 + 20, b.y1 + 10, b.x2 - 10, b.y1 + 34), f, 4);
            // Eighth note.
            canvas.fill_ellipse(Bounds::new(b.x2 - 26, b.y2 - 14, b.x2 - 16, b.y2 - 6), f);
            canvas.line((b.x2 - 17, b.y2 - 10), (b.x2 - 17, b.y2 - 28), f, 2);
            canvas.line((b.x2 - 17, b.y2 - 28), (b.x2 - 10, b.y2 - 22), f, 2);
        }
        Icon::Cigarettes => {
            canvas.fill_rect(Bounds::new(b.x1 + 12, b.y2 - 22, b.x2 - 12, b.y2 - 14), f);
            canvas.fill_rect(Bounds::new(b.x2 - 24, b.y2 - 22, b.x2 - 12, b.y2 - 14), FILTER);
            canvas.arc(Bounds::new(b.x1 + 6, b.y1 + 6, b.x1 + 24, b.y1 + 24), 200.0, 20.0, opaque([220, 220, 220]), 2);
        }
        Icon::Hat => {
            canvas.fill_rect(Bounds::new(b.x1 + 16, b.y1 + 18, b.x2 - 16, b.y2 - 12), f);
            canvas.fill_rect(Bounds::new(b.x1 + 8, b.y2 - 16, b.x2 - 8, b.y2 - 8), f);
        }
        Icon::Boot => {
            canvas.fill_rect(Bounds::new(b.x1 + 20, b.y1 + 10, b.x1 + 36, b.y2 - 16), f);
            canvas.fill_rect(Bounds::new(b.x1 + 20, b.y2 - 16, b.x2 - 12, b.y2 - 8), f);
        }
        Icon::Mushroom => {
            canvas.arc(Bounds::new(b.x1 + 8, b.y1 + 4, b.x2 - 8, b.y2 - 10), 0.0, 180.0, f, 6);
            canvas.fill_rect(Bounds::new(b.x1 + 24, b.y1 + 24, b.x2 - 24, b.y2 - 8), STEM);
        }
        Icon::SpeechBubble => {
            canvas.stroke_rect(Bounds::new(b.x1 + 10, b.y1 + 10, b.x2 - 10, b.y2 - 16), f, 3);
            canvas.fill_polygon(
                &[(b.x1 + 24, b.y2 - 16), (b.x1 + 30, b.y2 - 2), (b.x1 + 40, b.y2 - 16)],
                f,
            );
            // Exclamation mark.
            canvas.line((b.x1 + 24, b.y1 + 16), (b.x1 + 24, b.y1 + 28), f, 3);
            canvas.fill_ellipse(Bounds::new(b.x1 + 22, b.y1 + 32, b.x1 + 26, b.y1 + 36), f);
        }
        Icon::Gun => {
            canvas.fill_rect(Bounds::new(b.x1 + 10, b.y1 + 20, b.x2 - 12, b.y1 + 32), f);
            canvas.fill_rect(Bounds::new(b.x1 + 28, b.y1 + 32, b.x1 + 42, b.y2 - 10), f);
            canvas.fill_rect(Bounds::new(b.x2 - 18, b.y1 + 22, b.x2 - 6, b.y1 + 28), f);
        }
        Icon::Wheel => {
            let (cx, cy) = b.center();
            canvas.stroke_ellipse(b, f, 4);
            canvas.line((b.x1 + 10, cy), (b.x2 - 10, cy), f, 2);
            canvas.line((cx, b.y1 + 10), (cx, b.y2 - 10), f, 2);
        }
        Icon::Frame => canvas.stroke_rect(b, f, 4),
    }
}

fn owl(canvas: &mut Canvas, b: Bounds, f: Rgba<u8>) {
    let (cx, cy) = b.center();
    let radius = b.width().min(b.height()) / 2;
    canvas.fill_ellipse(Bounds::new(cx - radius, cy - radius, cx + radius, cy + radius), f);

    let eye = radius / 3;
    for offset in [-eye, eye] {
        canvas.fill_ellipse(
            Bounds::new(cx + offset - eye, cy - eye, cx + offset + eye, cy + eye),
            WHITE,
        );
        let pupil = eye / 3;
        canvas.fill_ellipse(
            Bounds::new(cx + offset - pupil, cy - pupil, cx + offset + pupil, cy + pupil),
            INK,
        );
    }
    canvas.fill_polygon(
        &[
            (cx, cy + eye / 2),
            (cx - eye / 2, cy + eye),
            (cx + eye / 2, cy + eye),
        ],
        BEAK,
    );
}

fn cat(canvas: &mut Canvas, b: Bounds, f: Rgba<u8>) {
    let (cx, cy) = b.center();
    let radius = b.width().min(b.height()) / 2;
    canvas.fill_ellipse(Bounds::new(cx - radius, cy - radius, cx + radius, cy + radius), f);

    let ear = radius / 2;
    canvas.fill_polygon(
        &[
            (cx - radius, cy - radius / 2),
            (cx - radius + ear, cy - radius - ear),
            (cx, cy - radius / 2),
        ],
        f,
    );
    canvas.fill_polygon(
        &[
            (cx + radius, cy - radius / 2),
            (cx + radius - ear, cy - radius - ear),
            (cx, cy - radius / 2),
        ],
        f,
    );
    canvas.fill_ellipse(Bounds::new(cx - radius / 2, cy - radius / 4, cx - radius / 3, cy), INK);
    canvas.fill_ellipse(Bounds::new(cx + radius / 3, cy - radius / 4, cx + radius / 2, cy), INK);
    canvas.line((cx - radius / 2, cy + radius / 6), (cx - radius, cy + radius / 4), INK, 2);
    canvas.line((cx + radius / 2, cy + radius / 6), (cx + radius, cy + radius / 4), INK, 2);
}

fn chicken(canvas: &mut Canvas, b: Bounds, f: Rgba<u8>) {
    let (cx, cy) = b.center();
    let radius = b.width().min(b.height()) / 2;
    canvas.fill_ellipse(Bounds::new(cx - radius, cy - radius, cx + radius, cy + radius), f);

    let comb = radius / 3;
    canvas.fill_ellipse(
        Bounds::new(cx - comb, cy - radius - comb / 2, cx + comb, cy - radius + comb),
        COMB,
    );
    canvas.fill_polygon(
        &[
            (cx + radius / 2, cy),
            (cx + radius, cy + radius / 6),
            (cx + radius / 2, cy + radius / 3),
        ],
        BEAK,
    );
    canvas.fill_ellipse(Bounds::new(cx - radius / 3, cy - radius / 4, cx - radius / 6, cy), DARK);
}

/// A "Z" of side `size` with its top-left corner at (x, y).
fn zed(canvas: &mut Canvas, x: i32, y: i32, size: i32, f: Rgba<u8>) {
    canvas.line((x, y), (x + size, y), f, 2);
    canvas.line((x + size, y), (x, y + size), f, 2);
    canvas.line((x, y + size), (x + size, y + size), f, 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const BOX: Bounds = Bounds::new(10, 10, 78, 78);
    const FILL: Rgb = [200, 30, 90];

    fn painted(icon: Icon) -> usize {
        let mut canvas = Canvas::new(100, 100);
        draw_icon(&mut canvas, icon, BOX, FILL);
        canvas.image().pixels().filter(|p| p[3] > 0).count()
    }

    #[test]
    fn every_icon_paints_something() {
        for icon in Icon::iter() {
            assert!(painted(icon) > 50, "{icon} drew almost nothing");
        }
    }

    #[test]
    fn dirty_cat_adds_a_smudge() {
        let mut clean = Canvas::new(100, 100);
        draw_icon(&mut clean, Icon::Cat, BOX, FILL);
        let mut dirty = Canvas::new(100, 100);
        draw_icon(&mut dirty, Icon::DirtyCat, BOX, FILL);
        assert_ne!(clean.image(), dirty.image());
        assert_eq!(dirty.image().get_pixel(23, 27).0, [90, 90, 90, 255]);
    }

    #[test]
    fn skunk_has_a_white_stripe() {
        let mut canvas = Canvas::new(100, 100);
        draw_icon(&mut canvas, Icon::Skunk, BOX, FILL);
        assert_eq!(canvas.image().get_pixel(44, 44).0, [245, 245, 245, 255]);
    }
}
