//! Drawer rotation and round bookkeeping.
//!
//! Rounds are 0-indexed. A round is complete once every player currently on
//! the roster has a terminal turn in it; the game continues while
//! `round < max_rounds`.

/// Player after `current` in `roster` (join order), wrapping around.
///
/// If `current` is no longer on the roster, the first player is returned.
pub fn next_in_order<'a>(roster: &'a [String], current: &str) -> Option<&'a str> {
    if roster.is_empty() {
        return None;
    }
    let next = match roster.iter().position(|p| p == current) {
        Some(idx) => (idx + 1) % roster.len(),
        None => 0,
    };
    roster.get(next).map(String::as_str)
}

/// Player after `departed`, who is being removed from `roster`.
///
/// `roster` still contains the departing player; the result never does.
pub fn successor_of_departed<'a>(roster: &'a [String], departed: &str) -> Option<&'a str> {
    let idx = roster.iter().position(|p| p == departed)?;
    (1..roster.len())
        .map(|step| &roster[(idx + step) % roster.len()])
        .find(|p| p.as_str() != departed)
        .map(String::as_str)
}

/// Every player on `roster` appears in `drawn`. Drawers who have since left
/// do not count towards completion.
pub fn round_complete(roster: &[String], drawn: &[String]) -> bool {
    !roster.is_empty() && roster.iter().all(|p| drawn.contains(p))
}

/// First player after `after` in `order` who has not drawn yet this round,
/// never `excluded`. Starts from the top if `after` is not in `order`.
fn next_to_draw<'a>(
    order: &'a [String],
    after: &str,
    drawn: &[String],
    excluded: Option<&str>,
) -> Option<&'a str> {
    let start = order.iter().position(|p| p == after).map_or(0, |i| i + 1);
    (0..order.len())
        .map(|step| &order[(start + step) % order.len()])
        .find(|p| !drawn.contains(p) && Some(p.as_str()) != excluded)
        .map(String::as_str)
}

pub fn game_over(round: i32, max_rounds: i32) -> bool {
    round >= max_rounds
}

/// What happens once a turn reaches a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Same round, hand the pen to `next_drawer`.
    NextDrawer { next_drawer: String },
    /// Round closed; `round` is the new round index.
    NextRound { round: i32, next_drawer: String },
    /// `max_rounds` reached.
    Finished { round: i32 },
}

/// Decide how the game moves on after a turn in `round` ends. `drawn` lists
/// the drawers of the round's terminal turns, including the one just closed.
///
/// `first_drawer_of_round` seeds the next round: it starts one seat after
/// whoever opened the round that just closed.
pub fn plan_advance(
    roster: &[String],
    round: i32,
    max_rounds: i32,
    drawn: &[String],
    last_drawer: &str,
    first_drawer_of_round: Option<&str>,
) -> Option<Advance> {
    if !round_complete(roster, drawn) {
        let next = next_to_draw(roster, last_drawer, drawn, None)?;
        return Some(Advance::NextDrawer {
            next_drawer: next.to_string(),
        });
    }

    let next_round = round + 1;
    if game_over(next_round, max_rounds) {
        return Some(Advance::Finished { round: next_round });
    }

    let anchor = first_drawer_of_round.unwrap_or(last_drawer);
    let next = next_in_order(roster, anchor)?;
    Some(Advance::NextRound {
        round: next_round,
        next_drawer: next.to_string(),
    })
}

/// Like [`plan_advance`], for a turn closed because its drawer left.
///
/// `roster_before` still lists `departed`; round completion is judged on the
/// roster without them, and the pen passes to the next player after them who
/// has not drawn yet.
pub fn plan_after_departure(
    roster_before: &[String],
    departed: &str,
    round: i32,
    max_rounds: i32,
    drawn: &[String],
    first_drawer_of_round: Option<&str>,
) -> Option<Advance> {
    let roster_after: Vec<String> = roster_before
        .iter()
        .filter(|p| p.as_str() != departed)
        .cloned()
        .collect();

    if !round_complete(&roster_after, drawn) {
        let next = next_to_draw(roster_before, departed, drawn, Some(departed))?;
        return Some(Advance::NextDrawer {
            next_drawer: next.to_string(),
        });
    }

    let next_round = round + 1;
    if game_over(next_round, max_rounds) {
        return Some(Advance::Finished { round: next_round });
    }

    let next = match first_drawer_of_round {
        Some(anchor) if anchor != departed => next_in_order(&roster_after, anchor)?,
        _ => successor_of_departed(roster_before, departed)?,
    };
    Some(Advance::NextRound {
        round: next_round,
        next_drawer: next.to_string(),
    })
}
