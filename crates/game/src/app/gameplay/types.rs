#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EntityId(pub(crate) u64);

/// Session-owned id allocator; ids are unique within one world instance
/// rather than process-wide.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Facing {
    /// Assets are authored facing left.
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Health {
    current: u32,
    max: u32,
}

impl Health {
    fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    fn current(&self) -> u32 {
        self.current
    }

    fn is_depleted(&self) -> bool {
        self.current == 0
    }

    fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    fn fraction(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f64 / self.max as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Scales an enemy stat: easy halves, hard adds half again.
    fn scale_enemy_stat(self, base: u32) -> u32 {
        match self {
            Self::Easy => base / 2,
            Self::Medium => base,
            Self::Hard => base.saturating_add(base / 2),
        }
        .max(1)
    }
}

/// The entity's behavioral state. The state selects which animation cycle is
/// active, not the other way around; no game logic compares cycle
/// identities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum EntityState {
    #[default]
    Idle,
    Walking,
    Attacking,
    Hurt,
    Dying,
}

impl EntityState {
    /// Movement is suppressed while flinching or dying.
    fn allows_movement(self) -> bool {
        matches!(self, Self::Idle | Self::Walking | Self::Attacking)
    }

    /// A new attack may start from the neutral states only; an attack in
    /// flight is never restarted and hurt/dying entities cannot swing.
    fn allows_attack(self) -> bool {
        matches!(self, Self::Idle | Self::Walking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    EntityDamaged { entity_id: EntityId, amount: u32 },
    EntitySlain { entity_id: EntityId },
    EntityRemoved { entity_id: EntityId },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEventKind {
    EntityDamaged,
    EntitySlain,
    EntityRemoved,
    GameOver,
}

impl GameEvent {
    fn kind(self) -> GameEventKind {
        match self {
            Self::EntityDamaged { .. } => GameEventKind::EntityDamaged,
            Self::EntitySlain { .. } => GameEventKind::EntitySlain,
            Self::EntityRemoved { .. } => GameEventKind::EntityRemoved,
            Self::GameOver => GameEventKind::GameOver,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct GameEventCounts {
    total: u32,
    entity_damaged: u32,
    entity_slain: u32,
    entity_removed: u32,
    game_over: u32,
}

impl GameEventCounts {
    fn record(&mut self, kind: GameEventKind) {
        self.total = self.total.saturating_add(1);
        match kind {
            GameEventKind::EntityDamaged => {
                self.entity_damaged = self.entity_damaged.saturating_add(1)
            }
            GameEventKind::EntitySlain => self.entity_slain = self.entity_slain.saturating_add(1),
            GameEventKind::EntityRemoved => {
                self.entity_removed = self.entity_removed.saturating_add(1)
            }
            GameEventKind::GameOver => self.game_over = self.game_over.saturating_add(1),
        }
    }
}

/// Death notifications and damage reports for UI collaborators: events
/// accumulate during a tick and roll over into counts at tick end.
#[derive(Debug, Default)]
pub(crate) struct GameEventBus {
    current_tick_events: Vec<GameEvent>,
    last_tick_counts: GameEventCounts,
}

impl GameEventBus {
    fn emit(&mut self, event: GameEvent) {
        self.current_tick_events.push(event);
    }

    #[allow(dead_code)]
    fn iter_emitted_so_far(&self) -> impl Iterator<Item = &GameEvent> {
        self.current_tick_events.iter()
    }

    fn finish_tick_rollover(&mut self) {
        let mut counts = GameEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    fn last_tick_counts(&self) -> GameEventCounts {
        self.last_tick_counts
    }
}
