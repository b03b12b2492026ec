use glam::Vec3;
use pool_engine::*;

// Table geometry (meters). The felt is centered off the origin so the rack
// apex sits at x = 0 and the cue spot at x = 1.12.
pub const FELT_CENTER: Vec3 = Vec3::new(0.5588, -0.005, 0.0);
pub const FELT_HALF_LENGTH: f32 = TABLE_LENGTH / 2.0;
pub const FELT_HALF_WIDTH: f32 = TABLE_WIDTH / 2.0;
const FELT_HALF_THICKNESS: f32 = 0.005;

const RAIL_THICKNESS: f32 = 0.05;
const RAIL_HEIGHT: f32 = 0.04;
/// Open felt left at each corner for the corner portals.
const CORNER_GAP: f32 = 0.08;
/// Open felt on each side of the side portals.
const SIDE_GAP: f32 = 0.06;

/// Portals sit just under the felt edge; a ball falling through a gap
/// lands in one.
const POCKET_Y: f32 = -0.09;
const POCKET_HALF_HEIGHT: f32 = 0.02;
/// Pocket numbering: 1 2 3 along the -z rail, 6 5 4 along the +z rail.
const POCKETS: [(u8, f32, f32); 6] = [
    (1, -0.57, -0.6),
    (2, 0.57, -0.6),
    (3, 1.71, -0.6),
    (4, 1.71, 0.6),
    (5, 0.57, 0.6),
    (6, -0.57, 0.6),
];

/// Catches anything that leaves the table.
const FLOOR_Y: f32 = -0.6;
const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(6.0, 0.05, 4.0);

// Holding-area container: an open-topped box around the jail drop point.
const JAIL_HALF_WIDTH: f32 = BALL_DIAMETER * 4.5 / 2.0;
const JAIL_HALF_HEIGHT: f32 = BALL_DIAMETER * 5.0;
const JAIL_WALL: f32 = 0.005;

// Materials
const BALL_FRICTION: f32 = 0.7;
const BALL_RESTITUTION: f32 = 0.85;
const FELT_FRICTION: f32 = 0.6;
const RAIL_FRICTION: f32 = 0.5;
const RAIL_RESTITUTION: f32 = 0.7;
const BALL_DAMPING: f32 = 0.5;

/// What a started contact means to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Pocket(PocketId, BallId),
    Floor(BallId),
}

/// Entity handles of everything the game reacts to.
pub struct Table {
    pub balls: BallMap,
    pockets: Vec<(EntityId, PocketId)>,
    floor: EntityId,
}

impl Table {
    /// Spawn the felt, rails, portals, floor catcher, holding container and
    /// the sixteen balls.
    pub fn build(ctx: &mut EngineContext, rules: &RulesConfig) -> Self {
        build_felt(ctx);
        build_rails(ctx);
        build_jail(ctx, rules.holding_area);
        let pockets = build_pockets(ctx);
        let floor = build_floor(ctx);
        let balls = build_balls(ctx, rules);
        log::info!("table built: {} entities", ctx.scene.len());
        Self { balls, pockets, floor }
    }

    pub fn pocket_entity(&self, pocket: PocketId) -> Option<EntityId> {
        self.pockets
            .iter()
            .find(|(_, p)| *p == pocket)
            .map(|(id, _)| *id)
    }

    pub fn floor_entity(&self) -> EntityId {
        self.floor
    }

    /// Map a collision to a pocket or floor contact. Ball-on-ball and
    /// ball-on-rail contacts are not interesting here.
    pub fn classify(&self, pair: &CollisionPair) -> Option<Contact> {
        if !pair.started {
            return None;
        }
        for &(entity, pocket) in &self.pockets {
            if let Some(ball) = pair.other(entity).and_then(|e| self.balls.ball(e)) {
                return Some(Contact::Pocket(pocket, ball));
            }
        }
        pair.other(self.floor)
            .and_then(|e| self.balls.ball(e))
            .map(Contact::Floor)
    }
}

fn build_felt(ctx: &mut EngineContext) {
    let felt = BodyDesc::fixed(ColliderDesc::Cuboid {
        half_extents: Vec3::new(FELT_HALF_LENGTH, FELT_HALF_THICKNESS, FELT_HALF_WIDTH),
    })
    .with_position(FELT_CENTER);
    let material = ColliderMaterial {
        restitution: 0.0,
        friction: FELT_FRICTION,
        density: 1.0,
    };
    let id = ctx.next_id();
    ctx.spawn_with_body(Entity::new(id).with_tag("felt"), felt, material);
}

/// Six rail segments around the felt, leaving the pocket mouths open.
fn build_rails(ctx: &mut EngineContext) {
    let material = ColliderMaterial {
        restitution: RAIL_RESTITUTION,
        friction: RAIL_FRICTION,
        density: 1.0,
    };
    let min_x = FELT_CENTER.x - FELT_HALF_LENGTH;
    let max_x = FELT_CENTER.x + FELT_HALF_LENGTH;
    let y = RAIL_HEIGHT / 2.0;
    let rail_z = FELT_HALF_WIDTH + RAIL_THICKNESS / 2.0;

    let mut rails: Vec<(Vec3, Vec3)> = Vec::new();

    // Long rails, split by the side pockets.
    let spans = [
        (min_x + CORNER_GAP, FELT_CENTER.x - SIDE_GAP),
        (FELT_CENTER.x + SIDE_GAP, max_x - CORNER_GAP),
    ];
    for z in [-rail_z, rail_z] {
        for (from, to) in spans {
            rails.push((
                Vec3::new((from + to) / 2.0, y, z),
                Vec3::new((to - from) / 2.0, RAIL_HEIGHT / 2.0, RAIL_THICKNESS / 2.0),
            ));
        }
    }

    // Short rails at the head and foot.
    let short_half = FELT_HALF_WIDTH - CORNER_GAP;
    for x in [min_x - RAIL_THICKNESS / 2.0, max_x + RAIL_THICKNESS / 2.0] {
        rails.push((
            Vec3::new(x, y, 0.0),
            Vec3::new(RAIL_THICKNESS / 2.0, RAIL_HEIGHT / 2.0, short_half),
        ));
    }

    for (pos, half_extents) in rails {
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid { half_extents }).with_position(pos);
        let id = ctx.next_id();
        ctx.spawn_with_body(Entity::new(id).with_tag("rail"), desc, material);
    }
}

fn build_pockets(ctx: &mut EngineContext) -> Vec<(EntityId, PocketId)> {
    let mut pockets = Vec::with_capacity(POCKETS.len());
    for (number, x, z) in POCKETS {
        let Ok(pocket) = PocketId::new(number) else {
            continue;
        };
        let desc = BodyDesc::trigger(ColliderDesc::Cylinder {
            half_height: POCKET_HALF_HEIGHT,
            radius: BALL_DIAMETER * 2.0,
        })
        .with_position(Vec3::new(x, POCKET_Y, z));
        let id = ctx.next_id();
        // Portals are drawn by the host, so they carry a sync key too.
        let entity = Entity::new(id)
            .with_tag(format!("pocket_{}", number))
            .with_sync_key(100 + number as u32);
        ctx.spawn_with_body(entity, desc, ColliderMaterial::default());
        pockets.push((id, pocket));
    }
    pockets
}

fn build_floor(ctx: &mut EngineContext) -> EntityId {
    let desc = BodyDesc::trigger(ColliderDesc::Cuboid {
        half_extents: FLOOR_HALF_EXTENTS,
    })
    .with_position(Vec3::new(FELT_CENTER.x, FLOOR_Y, 0.0));
    let id = ctx.next_id();
    ctx.spawn_with_body(Entity::new(id).with_tag("floor"), desc, ColliderMaterial::default())
}

/// Open-topped box the sunk balls drop into.
fn build_jail(ctx: &mut EngineContext, center: Vec3) {
    let material = ColliderMaterial {
        restitution: 0.2,
        friction: FELT_FRICTION,
        density: 1.0,
    };
    let outer = JAIL_HALF_WIDTH + JAIL_WALL;
    let bottom = center.y - JAIL_HALF_HEIGHT;

    let mut parts = vec![(
        Vec3::new(center.x, bottom, center.z),
        Vec3::new(outer, JAIL_WALL, outer),
    )];
    for side in [-1.0, 1.0] {
        parts.push((
            center + Vec3::new(side * outer, 0.0, 0.0),
            Vec3::new(JAIL_WALL, JAIL_HALF_HEIGHT, outer),
        ));
        parts.push((
            center + Vec3::new(0.0, 0.0, side * outer),
            Vec3::new(outer, JAIL_HALF_HEIGHT, JAIL_WALL),
        ));
    }

    for (pos, half_extents) in parts {
        let desc = BodyDesc::fixed(ColliderDesc::Cuboid { half_extents }).with_position(pos);
        let id = ctx.next_id();
        ctx.spawn_with_body(Entity::new(id).with_tag("jail"), desc, material);
    }
}

/// Density that gives a regulation ball its mass.
fn ball_density(radius: f32) -> f32 {
    let volume = 4.0 / 3.0 * std::f32::consts::PI * radius * radius * radius;
    BALL_MASS / volume
}

/// Spawn all sixteen balls at the origin; the session racks them.
fn build_balls(ctx: &mut EngineContext, rules: &RulesConfig) -> BallMap {
    let radius = rules.ball_radius();
    let material = ColliderMaterial {
        restitution: BALL_RESTITUTION,
        friction: BALL_FRICTION,
        density: ball_density(radius),
    };
    let mut entities = [EntityId(0); BALL_COUNT];
    for ball in BallId::all() {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius })
            .with_position(rules.holding_area)
            .with_linear_damping(BALL_DAMPING)
            .with_angular_damping(BALL_DAMPING)
            .with_ccd(true);
        let id = ctx.next_id();
        let entity = Entity::new(id)
            .with_tag(format!("ball_{}", ball.number()))
            .with_sync_key(ball.number() as u32);
        ctx.spawn_with_body(entity, desc, material);
        entities[ball.index()] = id;
    }
    BallMap::new(entities)
}
