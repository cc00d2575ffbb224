/// Turns the input snapshot into the player's desired per-tick velocity,
/// facing, and attack trigger.
fn run_player_intent(player: &mut Fighter, input: &InputSnapshot) {
    if input.attack_pressed() {
        player.begin_attack();
    }

    let direction = input.movement_direction();
    if !player.state().allows_movement() {
        player.velocity = VEC2_ZERO;
        return;
    }
    if direction.x != 0.0 {
        let center_x = player.center().x;
        player.face_toward(center_x + direction.x);
    }
    player.velocity = direction.scale(player.walk_speed);
}

/// Enemy steering: walk toward the remembered target, re-reading the
/// player's position only once the old target is close enough (anti-thrash),
/// clamping speed to the remaining distance (anti-overshoot), and switching
/// to the attack cycle inside attack range.
fn run_enemy_intent(enemy: &mut Fighter, player_center: Vec2, player_box: &Aabb) {
    if !enemy.state().allows_movement() {
        enemy.velocity = VEC2_ZERO;
        return;
    }

    if enemy.center().distance_to(player_center) <= ENEMY_ATTACK_RANGE {
        enemy.velocity = VEC2_ZERO;
        enemy.begin_attack();
        return;
    }

    if enemy.center().distance_to(enemy.target_pos) <= ENEMY_TARGET_ARRIVAL_RADIUS {
        debug!(enemy = enemy.name(), "enemy_retargeted");
        enemy.set_target(player_center);
    }

    let to_target = enemy.target_pos.sub(enemy.center());
    let speed = enemy.walk_speed.min(to_target.length());
    enemy.velocity = to_target.with_length(speed);

    // Never walk into the player's body; stop short instead of overlapping.
    if enemy.general_aabb().overlaps(player_box) {
        enemy.velocity = VEC2_ZERO;
    }
}

/// Applies the desired velocity, routing terrain-blocked movers through the
/// collision resolver first. Enemies pass through terrain, as the original
/// behavior has it; only the player collides with the world. The desired
/// velocity is kept as-is: walking against a wall still reads as walking.
fn run_movement(fighter: &mut Fighter, map: &WorldMap) {
    if fighter.velocity == VEC2_ZERO {
        return;
    }
    let applied = if fighter.blocked_by_terrain {
        resolve_velocity(map, &fighter.general_aabb(), fighter.velocity)
    } else {
        fighter.velocity
    };
    if applied != VEC2_ZERO {
        let pos = fighter.pos().add(applied);
        fighter.set_pos(pos);
    }
}

/// Settles the idle/walk half of the state machine from this tick's desired
/// velocity. The other states manage their own exits.
fn run_motion_state(fighter: &mut Fighter) {
    match fighter.state() {
        EntityState::Idle if fighter.velocity != VEC2_ZERO => {
            fighter.set_state(EntityState::Walking)
        }
        EntityState::Walking if fighter.velocity == VEC2_ZERO => {
            fighter.set_state(EntityState::Idle)
        }
        _ => {}
    }
}

/// One attacker-versus-defender combat check: coarse general boxes first,
/// then the sword's active frame against the defender's active cycle, then
/// the per-swing hit guard, then damage.
fn run_sword_hit(attacker: &mut Fighter, defender: &mut Fighter, events: &mut GameEventBus) {
    if attacker.state() != EntityState::Attacking || !defender.is_alive() {
        return;
    }

    let sword_cycle = attacker.sword.active_cycle(attacker.state());
    if !sword_cycle.general_aabb().overlaps(&defender.general_aabb()) {
        return;
    }
    if !sword_cycle.overlaps_cycle(defender.active_cycle()) {
        return;
    }
    if !attacker.sword.try_register_hit(defender.id()) {
        return;
    }

    let amount = attacker.sword.damage();
    defender.take_damage(amount, events);
}
