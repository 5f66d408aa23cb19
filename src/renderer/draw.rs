//! Tessellate a snapshot into a single triangle list
//!
//! Draw order: colliders, players, weapon reach, bars, hit effects. The host
//! uploads `Frame::as_bytes()` as one vertex buffer.

use glam::Vec2;

use super::shapes;
use super::snapshot::{PlayerView, RenderSnapshot};
use super::vertex::{Vertex, colors, health_color};
use crate::sim::{BodyKind, PlayerId};

const BAR_WIDTH: f32 = 50.0;
const BAR_HEIGHT: f32 = 5.0;
const BAR_GAP: f32 = 3.0;
const REACH_LINE_WIDTH: f32 = 3.0;
const HIT_RADIUS: f32 = 18.0;
const HIT_SEGMENTS: u32 = 16;

/// Vertices for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub vertices: Vec<Vertex>,
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

fn collider_color(kind: BodyKind) -> [f32; 4] {
    match kind {
        BodyKind::Ground => colors::GROUND,
        BodyKind::Wall => colors::WALL,
        BodyKind::Platform => colors::PLATFORM,
        BodyKind::Hazard => colors::HAZARD,
        BodyKind::Player => colors::WALL,
    }
}

fn player_color(player: &PlayerView) -> [f32; 4] {
    if player.attacking {
        return colors::ATTACK_FLASH;
    }
    match player.id {
        PlayerId::P1 => colors::P1,
        PlayerId::P2 => colors::P2,
    }
}

fn draw_player(out: &mut Vec<Vertex>, player: &PlayerView) {
    let half = player.size * 0.5;
    out.extend(shapes::rect(
        player.position - half,
        player.position + half,
        player_color(player),
    ));

    // Reach line from the leading edge at chest height
    let origin = player.position + Vec2::new(half.x * player.facing, -half.y * 0.25);
    let tip = Vec2::new(player.position.x + player.reach * player.facing, origin.y);
    out.extend(shapes::line(origin, tip, REACH_LINE_WIDTH, colors::WEAPON_REACH));

    // Health over stamina, above the head
    let health_min = Vec2::new(
        player.position.x - BAR_WIDTH * 0.5,
        player.position.y - half.y - BAR_GAP * 2.0 - BAR_HEIGHT * 2.0,
    );
    out.extend(shapes::bar(
        health_min,
        Vec2::new(BAR_WIDTH, BAR_HEIGHT),
        player.health_fraction(),
        health_color(player.health_fraction()),
        colors::BAR_BACK,
    ));
    out.extend(shapes::bar(
        health_min + Vec2::new(0.0, BAR_HEIGHT + BAR_GAP),
        Vec2::new(BAR_WIDTH, BAR_HEIGHT),
        player.stamina_fraction(),
        colors::STAMINA,
        colors::BAR_BACK,
    ));
}

/// Build the draw list for a snapshot
pub fn build_frame(snapshot: &RenderSnapshot) -> Frame {
    let mut vertices = Vec::new();

    for collider in &snapshot.colliders {
        vertices.extend(shapes::aabb(&collider.shape, collider_color(collider.kind)));
    }

    for player in &snapshot.players {
        draw_player(&mut vertices, player);
    }

    for effect in &snapshot.hit_effects {
        let alpha = effect.intensity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            continue;
        }
        let [r, g, b, _] = colors::HIT;
        // Grows as it fades
        let radius = HIT_RADIUS * (1.5 - 0.5 * alpha);
        vertices.extend(shapes::circle(
            effect.position,
            radius * 0.6,
            [r, g, b, alpha * 0.5],
            HIT_SEGMENTS,
        ));
        vertices.extend(shapes::ring(
            effect.position,
            radius * 0.6,
            radius,
            [r, g, b, alpha],
            HIT_SEGMENTS,
        ));
    }

    Frame { vertices }
}
