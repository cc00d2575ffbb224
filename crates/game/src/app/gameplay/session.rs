/// Pose data the rendering collaborator needs for one entity.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntityPose {
    pub(crate) sprite_key: SpriteKey,
    pub(crate) frame_index: usize,
    pub(crate) facing: Facing,
}

/// The running game world: terrain, the player, the enemy roster, the
/// camera's streaming tracker and the event bus. Implements the engine's
/// `Simulation` contract; everything mutates synchronously inside one tick.
pub(crate) struct GameSession {
    map: WorldMap,
    camera: CameraTracker,
    player: Fighter,
    enemies: Vec<Fighter>,
    ids: IdAllocator,
    events: GameEventBus,
    over: bool,
}

impl GameSession {
    pub(crate) fn new(map: WorldMap, settings: &crate::app::config::Settings, content_dir: &Path) -> Self {
        let mut ids = IdAllocator::default();

        let player_spawn = settings.player_spawn;
        let player = Fighter::new(
            ids.alloc(),
            PLAYER_NAME.to_string(),
            player_spawn,
            Health::full(PLAYER_MAX_HEALTH),
            CycleSet::load(player_spawn, content_dir, "player"),
            Sword::load(player_spawn, content_dir, PLAYER_SWORD_DAMAGE),
            PLAYER_WALK_SPEED,
            true,
        );

        let mut session = Self {
            map,
            camera: CameraTracker::default(),
            player,
            enemies: Vec::new(),
            ids,
            events: GameEventBus::default(),
            over: false,
        };

        for spawn in &settings.enemies {
            session.spawn_enemy(
                spawn.pos,
                settings.difficulty.scale_enemy_stat(spawn.max_health),
                settings.difficulty.scale_enemy_stat(spawn.sword_damage),
                content_dir,
            );
        }

        // Seed the active set around the spawn point before the first tick.
        let spawn_center = session.player.center();
        session.camera.crossed_chunk_boundary(spawn_center);
        session.map.update_active_set(spawn_center);

        info!(
            enemy_count = session.enemies.len(),
            chunk_count = session.map.chunk_count(),
            "session_started"
        );
        session
    }

    fn spawn_enemy(
        &mut self,
        pos: Vec2,
        max_health: u32,
        sword_damage: u32,
        content_dir: &Path,
    ) {
        let id = self.ids.alloc();
        let name = format!("enemy-{}", id.0);
        let enemy = Fighter::new(
            id,
            name,
            pos,
            Health::full(max_health),
            CycleSet::load(pos, content_dir, "enemy"),
            Sword::load(pos, content_dir, sword_damage),
            ENEMY_WALK_SPEED,
            false,
        );
        self.enemies.push(enemy);
    }

    fn run_combat(&mut self) {
        for enemy in &mut self.enemies {
            run_sword_hit(&mut self.player, enemy, &mut self.events);
            run_sword_hit(enemy, &mut self.player, &mut self.events);
        }
    }

    fn sweep_dead(&mut self) {
        let events = &mut self.events;
        self.enemies.retain(|enemy| {
            if enemy.is_fully_dead() {
                events.emit(GameEvent::EntityRemoved {
                    entity_id: enemy.id(),
                });
                false
            } else {
                true
            }
        });

        if self.player.is_fully_dead() && !self.over {
            self.events.emit(GameEvent::GameOver);
            self.over = true;
            info!(player = self.player.name(), "game_over");
        }
    }
}

/// The query surface consumed by out-of-scope UI collaborators (health bars,
/// minimap, screen transitions). Not exercised by the headless binary.
#[allow(dead_code)]
impl GameSession {
    pub(crate) fn player(&self) -> &Fighter {
        &self.player
    }

    pub(crate) fn enemies(&self) -> &[Fighter] {
        &self.enemies
    }

    pub(crate) fn map(&self) -> &WorldMap {
        &self.map
    }

    pub(crate) fn last_tick_events(&self) -> GameEventCounts {
        self.events.last_tick_counts()
    }

    /// Every entity still participating in the simulation, the player first.
    /// Dying entities stay listed until their death cycle completes.
    pub(crate) fn active_entities(&self) -> impl Iterator<Item = &Fighter> {
        std::iter::once(&self.player).chain(self.enemies.iter())
    }

    fn find_entity(&self, id: EntityId) -> Option<&Fighter> {
        self.active_entities().find(|fighter| fighter.id() == id)
    }

    pub(crate) fn entity_pose(&self, id: EntityId) -> Option<EntityPose> {
        let fighter = self.find_entity(id)?;
        let cycle = fighter.active_cycle();
        Some(EntityPose {
            sprite_key: cycle.sprite_key().clone(),
            frame_index: cycle.active_index(),
            facing: fighter.facing(),
        })
    }

    pub(crate) fn entity_position(&self, id: EntityId) -> Option<Vec2> {
        self.find_entity(id).map(Fighter::pos)
    }

    pub(crate) fn entity_bounds(&self, id: EntityId) -> Option<Aabb> {
        self.find_entity(id).map(Fighter::general_aabb)
    }

    pub(crate) fn health_fraction(&self, id: EntityId) -> Option<f64> {
        self.find_entity(id).map(Fighter::health_fraction)
    }

    /// UI-requested camera refresh, for consumers (minimap, screen
    /// transitions) that move the viewpoint without moving the player.
    pub(crate) fn request_camera_refresh(&mut self, camera_pos: Vec2) {
        if self.camera.crossed_chunk_boundary(camera_pos) {
            self.map.update_active_set(camera_pos);
        }
    }
}

impl Simulation for GameSession {
    fn update(&mut self, input: &InputSnapshot) {
        run_player_intent(&mut self.player, input);

        let player_center = self.player.center();
        let player_box = self.player.general_aabb();
        for enemy in &mut self.enemies {
            run_enemy_intent(enemy, player_center, &player_box);
        }

        run_movement(&mut self.player, &self.map);
        for enemy in &mut self.enemies {
            run_movement(enemy, &self.map);
        }

        run_motion_state(&mut self.player);
        for enemy in &mut self.enemies {
            run_motion_state(enemy);
        }

        // The camera follows the player; restream chunks only when it
        // crossed into another chunk.
        let camera_pos = self.player.center();
        if self.camera.crossed_chunk_boundary(camera_pos) {
            self.map.update_active_set(camera_pos);
        }

        self.run_combat();
        self.sweep_dead();
        self.events.finish_tick_rollover();
    }

    fn animate(&mut self) {
        self.player.advance_animation();
        for enemy in &mut self.enemies {
            enemy.advance_animation();
        }
    }

    fn is_over(&self) -> bool {
        self.over
    }
}
