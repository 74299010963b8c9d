//! Manual placement input: one line of six `[x,y]` pairs in the order
//! agent, first sentry, second sentry, relic, cloak, exit.

use stealth_core::{Pos, Scenario, SentrySpec, VisionPattern};

const EXPECTED_PAIRS: usize = 6;

pub fn parse_placements(
    line: &str,
    size: usize,
    vision: VisionPattern,
) -> Result<Scenario, String> {
    let mut positions = Vec::with_capacity(EXPECTED_PAIRS);
    for token in line.split_whitespace() {
        positions.push(parse_pair(token)?);
    }
    if positions.len() != EXPECTED_PAIRS {
        return Err(format!(
            "expected {EXPECTED_PAIRS} bracketed positions, got {}",
            positions.len()
        ));
    }
    Ok(Scenario {
        size,
        vision,
        start: positions[0],
        sentries: vec![
            SentrySpec { pos: positions[1], radius: 1 },
            SentrySpec { pos: positions[2], radius: 1 },
        ],
        relic: positions[3],
        cloak: positions[4],
        exit: positions[5],
    })
}

fn parse_pair(token: &str) -> Result<Pos, String> {
    let inner = token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| format!("'{token}' is not a bracketed pair like [x,y]"))?;
    let (x, y) = inner
        .split_once(',')
        .ok_or_else(|| format!("'{token}' is missing a comma"))?;
    let x: i32 = x
        .trim()
        .parse()
        .map_err(|_| format!("'{token}' has a non-numeric x coordinate"))?;
    let y: i32 = y
        .trim()
        .parse()
        .map_err(|_| format!("'{token}' has a non-numeric y coordinate"))?;
    Ok(Pos { y, x })
}
