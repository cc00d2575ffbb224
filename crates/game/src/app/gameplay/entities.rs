/// The named animation cycles an actor owns. The owner's `EntityState`
/// selects which one is active; the set itself only keeps their anchors and
/// facing in sync.
#[derive(Debug, Clone)]
pub(crate) struct CycleSet {
    idle: AnimationCycle,
    walk: AnimationCycle,
    attack: AnimationCycle,
    hurt: AnimationCycle,
    death: AnimationCycle,
    facing: Facing,
}

impl CycleSet {
    fn load(anchor: Vec2, content_dir: &Path, actor: &str) -> Self {
        Self {
            idle: load_cycle(anchor, content_dir, actor, "idle"),
            walk: load_cycle(anchor, content_dir, actor, "walk"),
            attack: load_cycle(anchor, content_dir, actor, "attack"),
            hurt: load_cycle(anchor, content_dir, actor, "hurt"),
            death: load_cycle(anchor, content_dir, actor, "death"),
            facing: Facing::Left,
        }
    }

    fn for_state(&self, state: EntityState) -> &AnimationCycle {
        match state {
            EntityState::Idle => &self.idle,
            EntityState::Walking => &self.walk,
            EntityState::Attacking => &self.attack,
            EntityState::Hurt => &self.hurt,
            EntityState::Dying => &self.death,
        }
    }

    fn for_state_mut(&mut self, state: EntityState) -> &mut AnimationCycle {
        match state {
            EntityState::Idle => &mut self.idle,
            EntityState::Walking => &mut self.walk,
            EntityState::Attacking => &mut self.attack,
            EntityState::Hurt => &mut self.hurt,
            EntityState::Dying => &mut self.death,
        }
    }

    fn all_mut(&mut self) -> [&mut AnimationCycle; 5] {
        [
            &mut self.idle,
            &mut self.walk,
            &mut self.attack,
            &mut self.hurt,
            &mut self.death,
        ]
    }

    fn set_anchor(&mut self, anchor: Vec2) {
        for cycle in self.all_mut() {
            cycle.set_anchor(anchor);
        }
    }

    fn set_facing(&mut self, facing: Facing) {
        if self.facing == facing {
            return;
        }
        for cycle in self.all_mut() {
            cycle.reflect_horizontally();
        }
        self.facing = facing;
    }
}

fn load_cycle(anchor: Vec2, content_dir: &Path, actor: &str, cycle_name: &str) -> AnimationCycle {
    let key = SpriteKey::new(&format!("sprites/{actor}_{cycle_name}"))
        .expect("actor asset names are lowercase identifiers");
    let sheet_path = content_dir.join(format!("sprites/{actor}_{cycle_name}.png"));
    let sheet = SpriteSheet::load(key, &sheet_path, FALLBACK_SHEET_DIMENSIONS);
    let anim_path = content_dir.join(format!("anim/{actor}_{cycle_name}.anim"));
    AnimationCycle::load(anchor, sheet, &anim_path)
}

/// Melee weapon component. Its hit-geometry only means anything while the
/// owner is attacking; each swing remembers who it already hit so one swing
/// lands at most once per target no matter how many ticks the overlap
/// persists.
#[derive(Debug, Clone)]
pub(crate) struct Sword {
    idle_cycle: AnimationCycle,
    attack_cycle: AnimationCycle,
    facing: Facing,
    damage: u32,
    swing_hits: HashSet<EntityId>,
}

impl Sword {
    fn load(anchor: Vec2, content_dir: &Path, damage: u32) -> Self {
        Self {
            idle_cycle: load_cycle(anchor, content_dir, "sword", "idle"),
            attack_cycle: load_cycle(anchor, content_dir, "sword", "attack"),
            facing: Facing::Left,
            damage,
            swing_hits: HashSet::new(),
        }
    }

    fn active_cycle(&self, owner_state: EntityState) -> &AnimationCycle {
        if owner_state == EntityState::Attacking {
            &self.attack_cycle
        } else {
            &self.idle_cycle
        }
    }

    fn damage(&self) -> u32 {
        self.damage
    }

    fn begin_swing(&mut self) {
        self.attack_cycle.reset();
        self.swing_hits.clear();
    }

    fn end_swing(&mut self) {
        self.attack_cycle.reset();
    }

    /// True the first time this swing touches `target`; later ticks of the
    /// same swing return false.
    fn try_register_hit(&mut self, target: EntityId) -> bool {
        self.swing_hits.insert(target)
    }

    fn animate(&mut self, owner_state: EntityState) {
        if owner_state == EntityState::Attacking {
            self.attack_cycle.advance();
        } else {
            self.idle_cycle.advance();
        }
    }

    fn set_anchor(&mut self, anchor: Vec2) {
        self.idle_cycle.set_anchor(anchor);
        self.attack_cycle.set_anchor(anchor);
    }

    fn set_facing(&mut self, facing: Facing) {
        if self.facing == facing {
            return;
        }
        self.idle_cycle.reflect_horizontally();
        self.attack_cycle.reflect_horizontally();
        self.facing = facing;
    }
}

/// A combat actor: the player or one enemy. Position, state, health, cycles
/// and sword live together; anchors flow strictly downward from `set_pos`.
#[derive(Debug, Clone)]
pub(crate) struct Fighter {
    id: EntityId,
    name: String,
    pos: Vec2,
    state: EntityState,
    health: Health,
    cycles: CycleSet,
    sword: Sword,
    velocity: Vec2,
    target_pos: Vec2,
    walk_speed: f64,
    blocked_by_terrain: bool,
    fully_dead: bool,
}

impl Fighter {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: EntityId,
        name: String,
        pos: Vec2,
        health: Health,
        cycles: CycleSet,
        sword: Sword,
        walk_speed: f64,
        blocked_by_terrain: bool,
    ) -> Self {
        let mut fighter = Self {
            id,
            name,
            pos,
            state: EntityState::Idle,
            health,
            cycles,
            sword,
            velocity: VEC2_ZERO,
            target_pos: pos,
            walk_speed,
            blocked_by_terrain,
            fully_dead: false,
        };
        fighter.set_pos(pos);
        fighter
    }

    pub(crate) fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn pos(&self) -> Vec2 {
        self.pos
    }

    pub(crate) fn state(&self) -> EntityState {
        self.state
    }

    pub(crate) fn facing(&self) -> Facing {
        self.cycles.facing
    }

    pub(crate) fn health_fraction(&self) -> f64 {
        self.health.fraction()
    }

    pub(crate) fn active_cycle(&self) -> &AnimationCycle {
        self.cycles.for_state(self.state)
    }

    pub(crate) fn general_aabb(&self) -> Aabb {
        self.active_cycle().general_aabb()
    }

    pub(crate) fn center(&self) -> Vec2 {
        self.general_aabb().center()
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    pub(crate) fn is_fully_dead(&self) -> bool {
        self.fully_dead
    }

    fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        self.cycles.set_anchor(pos);
        self.sword.set_anchor(pos);
    }

    fn set_target(&mut self, target: Vec2) {
        self.target_pos = target;
        self.face_toward(target.x);
    }

    fn face_toward(&mut self, x: f64) {
        let facing = if x <= self.center().x {
            Facing::Left
        } else {
            Facing::Right
        };
        self.cycles.set_facing(facing);
        self.sword.set_facing(facing);
    }

    /// Switches behavioral state. The cycle being left is reset so an
    /// interrupted attack or flinch never resumes from a stale frame, and
    /// the cycle being entered starts from its first frame.
    fn set_state(&mut self, next: EntityState) {
        if self.state == next {
            return;
        }
        self.cycles.for_state_mut(self.state).reset();
        if self.state == EntityState::Attacking {
            self.sword.end_swing();
        }
        self.state = next;
        self.cycles.for_state_mut(next).reset();
    }

    fn begin_attack(&mut self) {
        if !self.state.allows_attack() {
            return;
        }
        self.sword.begin_swing();
        self.set_state(EntityState::Attacking);
    }

    /// Applies damage and drives the hurt/death transitions. Taking damage
    /// mid-flinch restarts the flinch from its first frame.
    fn take_damage(&mut self, amount: u32, events: &mut GameEventBus) {
        if !self.is_alive() {
            return;
        }

        self.health.take_damage(amount);
        debug!(
            name = self.name.as_str(),
            amount,
            remaining = self.health.current(),
            "damage_taken"
        );
        events.emit(GameEvent::EntityDamaged {
            entity_id: self.id,
            amount,
        });

        if self.health.is_depleted() {
            self.set_state(EntityState::Dying);
            events.emit(GameEvent::EntitySlain { entity_id: self.id });
        } else if self.state == EntityState::Hurt {
            self.cycles.for_state_mut(EntityState::Hurt).reset();
        } else {
            self.set_state(EntityState::Hurt);
        }
    }

    /// One animation tick: advance the active cycle (and the sword's), then
    /// run the transitions that fire when a cycle finishes.
    fn advance_animation(&mut self) {
        self.cycles.for_state_mut(self.state).advance();
        self.sword.animate(self.state);

        if !self.active_cycle().is_done() {
            return;
        }
        match self.state {
            EntityState::Dying => self.fully_dead = true,
            EntityState::Attacking | EntityState::Hurt => self.set_state(EntityState::Idle),
            EntityState::Idle | EntityState::Walking => {}
        }
    }
}
