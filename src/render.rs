//! Rasterizes a [`FaceFrame`] with `embedded-graphics`.
//!
//! Works on any monochrome [`DrawTarget`], so the same code drives a memory
//! LCD on hardware and a framebuffer in tests.
//!
//! # Drawing Order
//!
//! ```text
//! background ─► hour hand ─► minute hand ─► second hand ─► cap ─► date
//! ```
//!
//! Filled hands are drawn as a triangle fan around [`HandShape::hub`], then
//! outlined. The second hand is a single line.

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, Polyline, PrimitiveStyle, Triangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::angle::Angle;
use crate::face::FaceFrame;
use crate::generation::{HandColor, Theme};
use crate::hands::{self, HandShape, HOUR_HAND, MAX_OUTLINE_POINTS, MINUTE_HAND, SECOND_HAND};
use crate::traits::Background;

/// Inner and outer radius of the hour ticks.
const TICK_RADII: (i32, i32) = (62, 70);

fn to_eg(p: hands::Point) -> Point {
    Point::new(p.x, p.y)
}

fn pixel(color: HandColor) -> BinaryColor {
    match color {
        HandColor::White => BinaryColor::On,
        HandColor::Black => BinaryColor::Off,
    }
}

/// Dial fill and marking colours for a background.
fn dial_colors(background: Background) -> (BinaryColor, BinaryColor) {
    match background {
        Background::Normal => (BinaryColor::Off, BinaryColor::On),
        Background::Inverted => (BinaryColor::On, BinaryColor::Off),
    }
}

/// Draws the whole face. A frame without resources clears the target.
pub fn render_frame<D>(frame: &FaceFrame, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let Some(theme) = frame.theme else {
        return target.clear(BinaryColor::Off);
    };
    let center = frame.layout.center;
    let (dial, marking) = dial_colors(theme.background);

    target.clear(dial)?;
    draw_ticks(target, center, marking)?;

    if let Some(hour) = frame.hour {
        draw_filled_hand(target, &HOUR_HAND, hour, center, &theme)?;
    }
    if let Some(minute) = frame.minute {
        draw_filled_hand(target, &MINUTE_HAND, minute, center, &theme)?;
    }
    if let Some(second) = frame.second {
        let outline = SECOND_HAND.outline(second, center);
        if let [from, to] = outline.as_slice() {
            Line::new(to_eg(*from), to_eg(*to))
                .into_styled(PrimitiveStyle::with_stroke(pixel(theme.second_hand), 1))
                .draw(target)?;
        }
    }

    let radius = frame.layout.cap_radius;
    Circle::with_center(to_eg(center), radius * 2 + 1)
        .into_styled(PrimitiveStyle::with_fill(pixel(theme.hand_outline)))
        .draw(target)?;

    if let (Some(rect), false) = (frame.layout.date_frame, frame.date.is_empty()) {
        let mid = Point::new(
            rect.origin.x + (rect.width / 2) as i32,
            rect.origin.y + (rect.height / 2) as i32,
        );
        let style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(
            frame.date.as_str(),
            mid,
            MonoTextStyle::new(&FONT_6X10, marking),
            style,
        )
        .draw(target)?;
    }

    Ok(())
}

fn draw_ticks<D>(target: &mut D, center: hands::Point, color: BinaryColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = PrimitiveStyle::with_stroke(color, 1);
    for hour in 0..12 {
        let angle = Angle::from_fraction(hour, 12);
        let inner = hands::Point::new(0, -TICK_RADII.0).rotate_translate(angle, center);
        let outer = hands::Point::new(0, -TICK_RADII.1).rotate_translate(angle, center);
        Line::new(to_eg(inner), to_eg(outer))
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

fn draw_filled_hand<D>(
    target: &mut D,
    shape: &HandShape,
    angle: Angle,
    center: hands::Point,
    theme: &Theme,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let outline = shape.outline(angle, center);
    let hub = to_eg(shape.hub(angle, center));
    let fill = PrimitiveStyle::with_fill(pixel(theme.hand_fill));

    let n = outline.len();
    for i in 0..n {
        let a = to_eg(outline[i]);
        let b = to_eg(outline[(i + 1) % n]);
        Triangle::new(hub, a, b).into_styled(fill).draw(target)?;
    }

    let mut closed: heapless::Vec<Point, { MAX_OUTLINE_POINTS + 1 }> = heapless::Vec::new();
    for p in outline.iter().chain(outline.first()) {
        let _ = closed.push(to_eg(*p));
    }
    Polyline::new(&closed)
        .into_styled(PrimitiveStyle::with_stroke(pixel(theme.hand_outline), 1))
        .draw(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FaceLayout;
    use crate::scheduler::DateText;
    use crate::settings::DisplayConfig;
    use core::convert::Infallible;

    const WIDTH: u32 = 144;
    const HEIGHT: u32 = 168;

    /// Full-screen monochrome framebuffer.
    struct Framebuffer {
        pixels: std::vec::Vec<bool>,
    }

    impl Framebuffer {
        fn new() -> Self {
            Self {
                pixels: std::vec![false; (WIDTH * HEIGHT) as usize],
            }
        }

        fn is_on(&self, x: i32, y: i32) -> bool {
            self.pixels[(y as u32 * WIDTH + x as u32) as usize]
        }

        fn lit_in(&self, rect: hands::Rect) -> usize {
            let mut count = 0;
            for y in rect.origin.y..rect.origin.y + rect.height as i32 {
                for x in rect.origin.x..rect.origin.x + rect.width as i32 {
                    if self.is_on(x, y) {
                        count += 1;
                    }
                }
            }
            count
        }
    }

    impl OriginDimensions for Framebuffer {
        fn size(&self) -> Size {
            Size::new(WIDTH, HEIGHT)
        }
    }

    impl DrawTarget for Framebuffer {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, color) in pixels {
                if p.x >= 0 && p.y >= 0 && (p.x as u32) < WIDTH && (p.y as u32) < HEIGHT {
                    self.pixels[(p.y as u32 * WIDTH + p.x as u32) as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    fn date(text: &str) -> DateText {
        let mut date = DateText::new();
        date.push_str(text).unwrap();
        date
    }

    /// Noon on a 24-hour dial: hour hand down, minute and second hands up.
    fn noon(config: DisplayConfig) -> FaceFrame {
        FaceFrame {
            config,
            theme: Some(Theme::for_config(&config)),
            layout: FaceLayout::default(),
            second: config.seconds_visible.then_some(Angle::ZERO),
            minute: Some(Angle::ZERO),
            hour: Some(Angle::HALF),
            date: date("7"),
            generation: Some(1),
        }
    }

    #[test]
    fn normal_theme_pixels() {
        let mut fb = Framebuffer::new();
        render_frame(&noon(DisplayConfig::default()), &mut fb).unwrap();

        assert!(!fb.is_on(2, 2), "dark dial");
        assert!(fb.is_on(71, 83 + 40), "hour hand fill");
        assert!(fb.is_on(71, 83 - 50), "minute hand fill");
        assert!(fb.is_on(71, 8), "white second hand");
        assert!(!fb.is_on(71, 83), "black cap");
    }

    #[test]
    fn inverted_theme_pixels() {
        let config = DisplayConfig {
            inverted: true,
            ..DisplayConfig::default()
        };
        let mut fb = Framebuffer::new();
        render_frame(&noon(config), &mut fb).unwrap();

        assert!(fb.is_on(2, 2), "light dial");
        assert!(!fb.is_on(71, 8), "black second hand");
        assert!(fb.is_on(71, 83 + 40), "hour hand fill stays white");
    }

    #[test]
    fn hidden_seconds_leave_dial_clear() {
        let config = DisplayConfig {
            seconds_visible: false,
            ..DisplayConfig::default()
        };
        let mut fb = Framebuffer::new();
        render_frame(&noon(config), &mut fb).unwrap();
        assert!(!fb.is_on(71, 8));
    }

    #[test]
    fn date_label_is_drawn() {
        let mut fb = Framebuffer::new();
        let frame = noon(DisplayConfig::default());
        render_frame(&frame, &mut fb).unwrap();
        let rect = frame.layout.date_frame.unwrap();
        assert!(fb.lit_in(rect) > 0);

        let mut fb = Framebuffer::new();
        let mut frame = noon(DisplayConfig::default());
        frame.date.clear();
        render_frame(&frame, &mut fb).unwrap();
        assert_eq!(fb.lit_in(rect), 0);
    }

    #[test]
    fn frame_without_resources_clears() {
        let mut frame = noon(DisplayConfig::default());
        frame.theme = None;
        let mut fb = Framebuffer::new();
        render_frame(&frame, &mut fb).unwrap();
        assert!(fb.pixels.iter().all(|on| !on));
    }
}
