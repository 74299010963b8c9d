//! Seeded random rounds. The agent always starts in the origin
//! corner; everything else is drawn from the remaining cells, with
//! the collectibles and the exit kept out of the detection zones.
//! A zone may still reach the start cell, which makes that round a
//! loss before the first move, exactly like a bad manual layout.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use stealth_core::{Pos, Scenario, SentrySpec, VisionPattern};

const SENTRY_RADIUS: u32 = 1;
const MAX_ATTEMPTS: u32 = 128;

pub fn generate(seed: u64, size: usize, vision: VisionPattern) -> Result<Scenario, String> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..MAX_ATTEMPTS {
        if let Some(scenario) = draw(&mut rng, size, vision) {
            return Ok(scenario);
        }
    }
    Err(format!("could not fit a random round on a {size}x{size} grid"))
}

fn draw(rng: &mut ChaCha8Rng, size: usize, vision: VisionPattern) -> Option<Scenario> {
    let start = Pos { y: 0, x: 0 };
    let limit = size as i32;
    let mut pool: Vec<Pos> = (0..limit)
        .flat_map(|y| (0..limit).map(move |x| Pos { y, x }))
        .filter(|&pos| pos != start)
        .collect();

    let first = take(rng, &mut pool)?;
    let second = take(rng, &mut pool)?;
    let radius = SENTRY_RADIUS as i32;
    pool.retain(|&pos| chebyshev(pos, first) > radius && chebyshev(pos, second) > radius);

    let relic = take(rng, &mut pool)?;
    let cloak = take(rng, &mut pool)?;
    let exit = take(rng, &mut pool)?;
    Some(Scenario {
        size,
        vision,
        start,
        sentries: vec![
            SentrySpec { pos: first, radius: SENTRY_RADIUS },
            SentrySpec { pos: second, radius: SENTRY_RADIUS },
        ],
        relic,
        cloak,
        exit,
    })
}

fn take(rng: &mut ChaCha8Rng, pool: &mut Vec<Pos>) -> Option<Pos> {
    if pool.is_empty() {
        return None;
    }
    let idx = (rng.next_u64() % pool.len() as u64) as usize;
    Some(pool.swap_remove(idx))
}

fn chebyshev(a: Pos, b: Pos) -> i32 {
    (a.y - b.y).abs().max((a.x - b.x).abs())
}
