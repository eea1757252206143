use std::f32::consts::PI;

use image::Rgb;

use super::canvas::Canvas;

/// Colors used by every motif routine. Papercraft-style prompts get a dark
/// palette on the light background; everything else is light-on-dark with a
/// gold accent.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub base: Rgb<u8>,
    pub accent: Rgb<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotifKind {
    Tree,
    Star,
    Snowflake,
    Bell,
    Wreath,
    Santa,
    Reindeer,
    Present,
    Candle,
    OrnamentBall,
    Default,
}

struct MotifSpec {
    kind: MotifKind,
    keywords: &'static [&'static str],
}

/// Priority-ordered keyword table; the first matching entry wins.
const MOTIF_TABLE: [MotifSpec; 10] = [
    MotifSpec {
        kind: MotifKind::Tree,
        keywords: &["tree", "ツリー"],
    },
    MotifSpec {
        kind: MotifKind::Star,
        keywords: &["star", "星"],
    },
    MotifSpec {
        kind: MotifKind::Snowflake,
        keywords: &["snowflake", "雪", "結晶"],
    },
    MotifSpec {
        kind: MotifKind::Bell,
        keywords: &["bell", "ベル"],
    },
    MotifSpec {
        kind: MotifKind::Wreath,
        keywords: &["wreath", "リース"],
    },
    MotifSpec {
        kind: MotifKind::Santa,
        keywords: &["santa", "サンタ"],
    },
    MotifSpec {
        kind: MotifKind::Reindeer,
        keywords: &["reindeer", "トナカイ"],
    },
    MotifSpec {
        kind: MotifKind::Present,
        keywords: &["present", "プレゼント", "gift"],
    },
    MotifSpec {
        kind: MotifKind::Candle,
        keywords: &["candle", "キャンドル"],
    },
    MotifSpec {
        kind: MotifKind::OrnamentBall,
        keywords: &["ornament", "ball", "ボール"],
    },
];

/// Case-insensitive substring dispatch over the fixed motif table.
pub fn classify(motif: &str) -> MotifKind {
    let lower = motif.to_lowercase();
    for entry in &MOTIF_TABLE {
        if entry.keywords.iter().any(|keyword| lower.contains(keyword)) {
            return entry.kind;
        }
    }
    MotifKind::Default
}

pub fn draw(
    kind: MotifKind,
    canvas: &mut Canvas,
    cx: f32,
    cy: f32,
    size: f32,
    palette: &Palette,
) {
    match kind {
        MotifKind::Tree => draw_tree(canvas, cx, cy, size, palette),
        MotifKind::Star => draw_star(canvas, cx, cy, size, palette),
        MotifKind::Snowflake => draw_snowflake(canvas, cx, cy, size, palette),
        MotifKind::Bell => draw_bell(canvas, cx, cy, size, palette),
        MotifKind::Wreath => draw_wreath(canvas, cx, cy, size, palette),
        MotifKind::Santa => draw_santa(canvas, cx, cy, size, palette),
        MotifKind::Reindeer => draw_reindeer(canvas, cx, cy, size, palette),
        MotifKind::Present => draw_present(canvas, cx, cy, size, palette),
        MotifKind::Candle => draw_candle(canvas, cx, cy, size, palette),
        MotifKind::OrnamentBall => draw_ornament_ball(canvas, cx, cy, size, palette),
        MotifKind::Default => draw_default_ornament(canvas, cx, cy, size, palette),
    }
}

fn draw_tree(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let tree = size * 0.6;
    let trunk_w = tree * 0.15;
    let trunk_h = tree * 0.2;

    // Three stacked tiers.
    canvas.fill_triangle(
        (cx, cy - tree / 2.0),
        (cx - tree * 0.3, cy - tree * 0.1),
        (cx + tree * 0.3, cy - tree * 0.1),
        palette.base,
    );
    canvas.fill_triangle(
        (cx, cy - tree * 0.15),
        (cx - tree * 0.4, cy + tree * 0.15),
        (cx + tree * 0.4, cy + tree * 0.15),
        palette.base,
    );
    canvas.fill_triangle(
        (cx, cy + tree * 0.1),
        (cx - tree * 0.5, cy + tree * 0.4),
        (cx + tree * 0.5, cy + tree * 0.4),
        palette.base,
    );

    canvas.fill_rect(
        cx - trunk_w / 2.0,
        cy + tree * 0.4,
        trunk_w,
        trunk_h,
        palette.accent,
    );

    // Topper and baubles.
    canvas.fill_circle(cx, cy - tree / 2.0, size * 0.05, palette.accent);
    canvas.fill_circle(cx - tree * 0.2, cy, size * 0.04, palette.accent);
    canvas.fill_circle(cx + tree * 0.2, cy + tree * 0.1, size * 0.04, palette.accent);
}

fn draw_star(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let outer = size * 0.5 / 2.0;
    let inner = outer * 0.4;
    let spikes = 5;

    let mut points = Vec::with_capacity(spikes * 2);
    for i in 0..spikes * 2 {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = (i as f32 * PI) / spikes as f32 - PI / 2.0;
        points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
    }

    canvas.fill_polygon(&points, palette.accent);

    let thickness = size * 0.02;
    for i in 0..points.len() {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % points.len()];
        canvas.stroke_line(x1, y1, x2, y2, thickness, palette.base);
    }
}

fn draw_snowflake(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let arm = size * 0.3;
    let arms = 6;
    let thickness = size * 0.02;

    for i in 0..arms {
        let angle = (i as f32 * PI * 2.0) / arms as f32;
        let rotate = |px: f32, py: f32| {
            (
                cx + px * angle.cos() - py * angle.sin(),
                cy + px * angle.sin() + py * angle.cos(),
            )
        };

        let (tip_x, tip_y) = rotate(0.0, -arm);
        canvas.stroke_line(cx, cy, tip_x, tip_y, thickness, palette.base);

        for j in 1..=2 {
            let branch_y = -arm * (j as f32 / 3.0);
            let branch = arm * 0.3;
            let (bx, by) = rotate(0.0, branch_y);
            let (lx, ly) = rotate(-branch * 0.6, branch_y - branch * 0.3);
            let (rx, ry) = rotate(branch * 0.6, branch_y - branch * 0.3);
            canvas.stroke_line(bx, by, lx, ly, thickness, palette.base);
            canvas.stroke_line(bx, by, rx, ry, thickness, palette.base);
        }
    }
}

fn draw_bell(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let bell = size * 0.5;
    let r = bell / 2.0;
    let skirt = bell * 0.3;
    let thickness = size * 0.02;

    // Dome plus skirt.
    canvas.fill_semicircle(cx, cy, r, true, palette.accent);
    canvas.fill_rect(cx - r, cy, bell, skirt, palette.accent);

    canvas.stroke_semicircle(cx, cy, r, thickness, true, palette.base);
    canvas.stroke_line(cx - r, cy, cx - r, cy + skirt, thickness, palette.base);
    canvas.stroke_line(cx + r, cy, cx + r, cy + skirt, thickness, palette.base);
    canvas.stroke_line(cx - r, cy + skirt, cx + r, cy + skirt, thickness, palette.base);

    // Interior rim and hanger loop.
    canvas.stroke_semicircle(cx, cy, bell * 0.3, thickness, false, palette.base);
    canvas.fill_circle(cx, cy - r, bell * 0.15, palette.base);
}

fn draw_wreath(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let radius = size * 0.3;
    canvas.stroke_circle(cx, cy, radius, size * 0.08, palette.base);

    for i in 0..6 {
        let angle = (i as f32 * PI * 2.0) / 6.0;
        canvas.fill_circle(
            cx + radius * 0.7 * angle.cos(),
            cy + radius * 0.7 * angle.sin(),
            size * 0.04,
            palette.accent,
        );
    }
}

fn draw_santa(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let santa = size * 0.5;

    canvas.fill_circle(cx, cy - santa * 0.3, santa * 0.25, palette.accent);
    canvas.fill_circle(cx, cy, santa * 0.2, palette.base);
    canvas.stroke_semicircle(
        cx,
        cy + santa * 0.1,
        santa * 0.15,
        size * 0.02,
        false,
        palette.base,
    );
}

fn draw_reindeer(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let deer = size * 0.4;
    let thickness = size * 0.02;

    canvas.fill_ellipse(cx, cy, deer * 0.3, deer * 0.2, palette.base);
    canvas.fill_circle(cx - deer * 0.2, cy - deer * 0.1, deer * 0.15, palette.base);

    canvas.stroke_line(
        cx - deer * 0.25,
        cy - deer * 0.2,
        cx - deer * 0.35,
        cy - deer * 0.35,
        thickness,
        palette.accent,
    );
    canvas.stroke_line(
        cx - deer * 0.15,
        cy - deer * 0.2,
        cx - deer * 0.25,
        cy - deer * 0.35,
        thickness,
        palette.accent,
    );
}

fn draw_present(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let b = size * 0.4;

    canvas.fill_rect(cx - b / 2.0, cy - b / 2.0, b, b, palette.accent);
    canvas.fill_rect(cx - b * 0.05, cy - b / 2.0, b * 0.1, b, palette.base);
    canvas.fill_rect(cx - b / 2.0, cy - b * 0.05, b, b * 0.1, palette.base);
    canvas.fill_circle(cx, cy, b * 0.15, palette.base);
}

fn draw_candle(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let w = size * 0.15;
    let h = size * 0.4;

    canvas.fill_rect(cx - w / 2.0, cy - h / 2.0, w, h, palette.base);
    canvas.fill_ellipse(cx, cy - h / 2.0, w * 0.3, w * 0.5, palette.accent);
    canvas.stroke_line(
        cx,
        cy - h / 2.0,
        cx,
        cy - h / 2.0 - w * 0.5,
        size * 0.01,
        palette.base,
    );
}

fn draw_ornament_ball(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let ball = size * 0.4;
    let r = ball / 2.0;

    canvas.fill_radial_circle(
        cx,
        cy,
        r,
        (cx - ball * 0.2, cy - ball * 0.2),
        palette.accent,
        palette.base,
    );
    canvas.fill_circle(cx, cy - r, ball * 0.1, palette.base);
    canvas.fill_circle_alpha(
        cx - ball * 0.15,
        cy - ball * 0.15,
        ball * 0.1,
        Rgb([255, 255, 255]),
        0.6,
    );
}

fn draw_default_ornament(canvas: &mut Canvas, cx: f32, cy: f32, size: f32, palette: &Palette) {
    let radius = size * 0.3;
    canvas.stroke_circle(cx, cy, radius, size * 0.03, palette.base);
    canvas.fill_circle(cx, cy, radius * 0.6, palette.accent);
}
