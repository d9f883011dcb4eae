// Canvas renderer. A painter's-algorithm pass over the world: everything is
// projected through the camera, sorted far to near and drawn as flat shapes
// tinted by the current lighting and fog.

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::game::{FLOOR_Y, TargetImage, World};
use crate::scene::camera::Vec3;
use crate::scene::{Camera, Lighting, Rgb, TimeOfDay, fog_amount, fog_color, lighting, sky_color};

const GRASS: Rgb = Rgb::hex(0x3d7a37);
const CRAB: Rgb = Rgb::hex(0xe85d04);
const PINK: Rgb = Rgb::hex(0xff6b9d);
const STAR: Rgb = Rgb::hex(0xfff8dc);

pub(crate) struct Sprites {
    pub bullseye: HtmlImageElement,
    pub cookie: HtmlImageElement,
}

impl Sprites {
    fn get(&self, image: TargetImage) -> &HtmlImageElement {
        match image {
            TargetImage::Bullseye => &self.bullseye,
            TargetImage::Cookie => &self.cookie,
        }
    }
}

enum Shape {
    Sprite { image: TargetImage, size: f64 },
    Heart { color: Rgb, size: f64, cracks: u32 },
    Crab { size: f64, heart: bool },
    Plant { foliage: Rgb, stem: Rgb, size: f64, tree: bool },
    Star { color: Rgb, size: f64 },
    Spark { color: Rgb, size: f64, alpha: f64 },
}

struct Drawable {
    x: f64,
    y: f64,
    depth: f64,
    shape: Shape,
}

fn light_factor(l: &Lighting) -> f64 {
    (l.ambient_intensity + l.sun_intensity * 0.3).clamp(0.15, 1.2)
}

fn tint(color: Rgb, l: &Lighting, time: TimeOfDay, depth: f64) -> String {
    color
        .shade(light_factor(l))
        .lerp(fog_color(time), fog_amount(depth))
        .css()
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw(
    ctx: &CanvasRenderingContext2d,
    (w, h): (f64, f64),
    camera: &Camera,
    world: &World,
    sprites: &Sprites,
    time: TimeOfDay,
    targets_visible: bool,
    now: f64,
) {
    let light = lighting(time);

    // Sky, lightening towards the horizon.
    let focal = camera.scale_at(1.0, h);
    let horizon = (h / 2.0 + camera.pitch.tan() * focal).clamp(-1.0, h + 1.0);
    let sky = sky_color(time);
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, horizon.max(1.0));
    gradient.add_color_stop(0.0, &sky.css()).ok();
    gradient.add_color_stop(1.0, &sky.lerp(Rgb::hex(0xffffff), 0.25).css()).ok();
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str(&GRASS.shade(light_factor(&light)).css());
    ctx.fill_rect(0.0, horizon, w, h - horizon);

    let night = time.is_night();
    let mut items: Vec<Drawable> = Vec::new();
    let mut push = |p: Vec3, shape: Shape| {
        if let Some((x, y, depth)) = camera.project(p, w, h) {
            items.push(Drawable { x, y, depth, shape });
        }
    };

    if targets_visible {
        for t in world.targets.targets() {
            push(t.position, Shape::Sprite { image: t.image, size: crate::config::TARGET_SCALE });
        }
        if let Some(heart) = &world.mega_heart {
            push(heart.position(), Shape::Heart { color: heart.color(), size: 2.5, cracks: heart.hits() });
        }
    }
    for crab in &world.crabs {
        push(crab.position, Shape::Crab { size: 1.5, heart: crab.shows_heart(now) });
    }
    for plant in &world.plants {
        let scale = plant.scale(now);
        if scale > 0.0 {
            push(
                [plant.position[0], FLOOR_Y + 0.5 * scale, plant.position[2]],
                Shape::Plant {
                    foliage: plant.foliage,
                    stem: plant.stem,
                    size: scale,
                    tree: plant.kind == crate::game::effects::PlantKind::Tree,
                },
            );
        }
    }
    if night {
        let c = &world.constellation;
        let all = c.is_complete();
        for (i, star) in c.stars().iter().enumerate() {
            let lit = all || c.is_lit(i);
            let grow = if c.next_star() == Some(i) { 1.2 } else { 1.0 };
            push(*star, Shape::Star { color: if lit { PINK } else { STAR }, size: c.star_radius() * grow });
        }
    }
    for rocket in world.fireworks.rockets() {
        push(rocket.position, Shape::Spark { color: rocket.color, size: 0.15, alpha: 1.0 });
    }
    let secs = world.elapsed_secs();
    for burst in world.fireworks.bursts() {
        let alpha = (1.0 - burst.age(secs) / 2.0).clamp(0.0, 1.0);
        for p in burst.sparks(secs) {
            push(p, Shape::Spark { color: burst.color, size: 0.25, alpha });
        }
    }
    for burst in &world.bursts {
        for p in burst.particles(now) {
            push(p.position, Shape::Spark { color: PINK, size: p.size * 4.0, alpha: p.alpha });
        }
    }

    items.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    for d in &items {
        draw_one(ctx, d, camera, h, sprites, &light, time);
    }

    if night {
        draw_constellation_lines(ctx, camera, world, (w, h));
    }
    for tracer in &world.tracers {
        let (Some(a), Some(b)) = (camera.project(tracer.from, w, h), camera.project(tracer.to, w, h)) else {
            continue;
        };
        ctx.set_global_alpha(tracer.alpha(now));
        ctx.set_stroke_style_str("#ff6b9d");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(a.0, a.1);
        ctx.line_to(b.0, b.1);
        ctx.stroke();
        ctx.set_global_alpha(1.0);
    }
}

fn draw_one(
    ctx: &CanvasRenderingContext2d,
    d: &Drawable,
    camera: &Camera,
    h: f64,
    sprites: &Sprites,
    light: &Lighting,
    time: TimeOfDay,
) {
    let px = |world_size: f64| camera.scale_at(d.depth, h) * world_size;
    match d.shape {
        Shape::Sprite { image, size } => {
            let s = px(size);
            let img = sprites.get(image);
            if img.complete() && img.natural_width() > 0 {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, d.x - s / 2.0, d.y - s / 2.0, s, s)
                    .ok();
            } else {
                // Glowing placeholder when the texture is missing.
                ctx.set_shadow_color("#ff6b9d");
                ctx.set_shadow_blur(12.0);
                ctx.set_fill_style_str(&tint(PINK, light, time, d.depth));
                ctx.fill_rect(d.x - s / 2.0, d.y - s / 2.0, s, s);
                ctx.set_shadow_blur(0.0);
            }
        }
        Shape::Heart { color, size, cracks } => {
            let s = px(size);
            ctx.set_fill_style_str(&tint(color, light, time, d.depth));
            heart_path(ctx, d.x, d.y, s);
            ctx.fill();
            ctx.set_stroke_style_str("rgba(40,0,0,0.8)");
            ctx.set_line_width(2.0);
            for i in 0..cracks {
                let a = i as f64 * 2.4;
                ctx.begin_path();
                ctx.move_to(d.x, d.y);
                ctx.line_to(d.x + a.cos() * s * 0.35, d.y + a.sin() * s * 0.35);
                ctx.stroke();
            }
        }
        Shape::Crab { size, heart } => {
            let s = px(size);
            ctx.set_fill_style_str(&tint(CRAB, light, time, d.depth));
            ctx.begin_path();
            ctx.ellipse(d.x, d.y - s * 0.2, s * 0.5, s * 0.25, 0.0, 0.0, TAU).ok();
            ctx.fill();
            if heart {
                ctx.set_font(&format!("{}px sans-serif", (s * 0.6).max(10.0)));
                ctx.set_text_align("center");
                ctx.fill_text("\u{2764}", d.x, d.y - s).ok();
            }
        }
        Shape::Plant { foliage, stem, size, tree } => {
            let s = px(size);
            ctx.set_fill_style_str(&tint(stem, light, time, d.depth));
            ctx.fill_rect(d.x - s * 0.05, d.y, s * 0.1, s * 0.5);
            ctx.set_fill_style_str(&tint(foliage, light, time, d.depth));
            ctx.begin_path();
            if tree {
                ctx.move_to(d.x, d.y - s * 0.6);
                ctx.line_to(d.x - s * 0.4, d.y + s * 0.1);
                ctx.line_to(d.x + s * 0.4, d.y + s * 0.1);
                ctx.close_path();
            } else {
                ctx.arc(d.x, d.y - s * 0.1, s * 0.2, 0.0, TAU).ok();
            }
            ctx.fill();
        }
        Shape::Star { color, size } => {
            ctx.set_fill_style_str(&color.css());
            ctx.begin_path();
            ctx.arc(d.x, d.y, px(size).max(1.5), 0.0, TAU).ok();
            ctx.fill();
        }
        Shape::Spark { color, size, alpha } => {
            ctx.set_global_alpha(alpha);
            ctx.set_fill_style_str(&color.css());
            let s = px(size).max(1.0);
            ctx.fill_rect(d.x - s / 2.0, d.y - s / 2.0, s, s);
            ctx.set_global_alpha(1.0);
        }
    }
}

fn heart_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, s: f64) {
    let top = y - s * 0.25;
    ctx.begin_path();
    ctx.move_to(x, top + s * 0.15);
    ctx.bezier_curve_to(x, top, x - s * 0.5, top, x - s * 0.5, top + s * 0.25);
    ctx.bezier_curve_to(x - s * 0.5, top + s * 0.5, x, top + s * 0.6, x, top + s * 0.8);
    ctx.bezier_curve_to(x, top + s * 0.6, x + s * 0.5, top + s * 0.5, x + s * 0.5, top + s * 0.25);
    ctx.bezier_curve_to(x + s * 0.5, top, x, top, x, top + s * 0.15);
    ctx.close_path();
}

fn draw_constellation_lines(ctx: &CanvasRenderingContext2d, camera: &Camera, world: &World, (w, h): (f64, f64)) {
    ctx.set_stroke_style_str("#ff6b9d");
    ctx.set_line_width(2.0);
    for (a, b) in world.constellation.segments() {
        if let (Some(a), Some(b)) = (camera.project(a, w, h), camera.project(b, w, h)) {
            ctx.begin_path();
            ctx.move_to(a.0, a.1);
            ctx.line_to(b.0, b.1);
            ctx.stroke();
        }
    }
}
