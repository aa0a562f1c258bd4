//! Headless симуляция Emberfall
//!
//! Маленькая арена: игрок стоит, мобы разных видов подходят и атакуют.

use emberfall_simulation::{
    create_headless_app, log_error, spawn_mobs, step_fixed, Combatant, Mob, PlayerBody,
    SolidBlock, SpawnRecord,
};

use bevy::prelude::*;

fn main() {
    let seed = 42;
    println!("Starting Emberfall headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    // Арена: пол + две платформы
    let world = app.world_mut();
    world.spawn(SolidBlock::new(-400.0, 600.0, 1600.0, 40.0));
    world.spawn(SolidBlock::new(100.0, 480.0, 160.0, 20.0));
    world.spawn(SolidBlock::new(560.0, 480.0, 160.0, 20.0));
    world.spawn(PlayerBody::new(Vec2::new(400.0, 552.0)));

    let records = [
        SpawnRecord::new("zombie", 120.0, 552.0),
        SpawnRecord::new("skeleton", 700.0, 550.0),
        SpawnRecord::new("slime", 250.0, 576.0),
        SpawnRecord::new("goblin", 620.0, 564.0),
        SpawnRecord::new("fire_imp", 150.0, 420.0),
    ];
    if let Err(err) = spawn_mobs(world, &records) {
        log_error(&format!("Level setup failed: {}", err));
        return;
    }

    // 20 секунд при 60Hz
    for tick in 0..1200 {
        step_fixed(&mut app);

        if tick % 120 == 0 {
            let world = app.world_mut();
            let player_health = world
                .query::<&PlayerBody>()
                .iter(world)
                .map(|player| player.health().current())
                .next()
                .unwrap_or(0.0);
            let mobs: Vec<String> = world
                .query::<&Mob>()
                .iter(world)
                .map(|mob| {
                    format!(
                        "{}:{}({:.0})",
                        mob.species(),
                        mob.state().as_str(),
                        mob.health().current()
                    )
                })
                .collect();
            println!(
                "Tick {}: player hp {:.0}, mobs [{}]",
                tick,
                player_health,
                mobs.join(", ")
            );

            let alive = world
                .query::<&PlayerBody>()
                .iter(world)
                .any(|player| player.is_alive());
            if !alive {
                println!("Player fell at tick {}", tick);
                break;
            }
        }
    }

    println!("Simulation complete!");
}
