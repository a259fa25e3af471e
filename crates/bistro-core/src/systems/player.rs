//! Player movement with wall collision

use bistro_logic::constants::movement::{MAX_COLLISION_STEP, PLAYER_SIZE};
use bistro_logic::geometry::{Point, Rect};
use bistro_logic::motion::facing_degrees;

use crate::components::{FrameInput, Player};

/// Move the player for one frame.
///
/// Each axis is resolved separately in short sub-steps so the player
/// slides along walls instead of sticking to them. `bounds` limits the
/// player's centre.
pub fn player_movement_system(
    player: &mut Player,
    input: &FrameInput,
    solids: &[Rect],
    bounds: Rect,
    delta_ms: f32,
) {
    let (dx, dy) = input.direction();
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    let origin = player.position;
    player.facing = facing_degrees(origin, Point::new(origin.x + dx, origin.y + dy));

    let distance = player.speed * delta_ms.max(0.0) / 1000.0;
    let steps = (distance / MAX_COLLISION_STEP).ceil().max(1.0) as u32;
    let step = distance / steps as f32;

    for _ in 0..steps {
        try_move(player, Point::new(dx * step, 0.0), solids, bounds);
        try_move(player, Point::new(0.0, dy * step), solids, bounds);
    }
}

fn try_move(player: &mut Player, offset: Point, solids: &[Rect], bounds: Rect) {
    if offset == Point::ZERO {
        return;
    }
    let target = player.position + offset;
    let target = Point::new(
        target.x.clamp(bounds.x, bounds.right()),
        target.y.clamp(bounds.y, bounds.bottom()),
    );
    let current = Rect::centered(player.position, PLAYER_SIZE, PLAYER_SIZE);
    let body = Rect::centered(target, PLAYER_SIZE, PLAYER_SIZE);
    // A solid already overlapping the body (a door closed on the player)
    // does not hold it in place.
    if solids
        .iter()
        .any(|s| s.intersects(&body) && !s.intersects(&current))
    {
        return;
    }
    player.position = target;
}
