//! Target selection for a single reveal.
//!
//! The draw is a matching between pending gifters and open targets where
//! nobody may draw themselves. Every gifter is adjacent to every open target
//! except possibly itself, so Hall's condition collapses to a size check
//! plus the lone-gifter-is-the-lone-target case.

use giftdraw_types::{DrawPolicy, RandomSource};

use crate::models::DrawState;

/// Open targets the requester may draw: everyone unclaimed except themselves.
pub fn candidates<'a>(requester: &str, state: &'a DrawState) -> Vec<&'a str> {
    state
        .open
        .iter()
        .map(String::as_str)
        .filter(|id| *id != requester)
        .collect()
}

/// Whether every pending gifter can still get a distinct open target other
/// than themselves.
pub fn completable<P, O>(pending: &[P], open: &[O]) -> bool
where
    P: AsRef<str>,
    O: AsRef<str>,
{
    match (pending, open) {
        ([], _) => true,
        _ if open.len() < pending.len() => false,
        ([gifter], [target]) => gifter.as_ref() != target.as_ref(),
        _ => true,
    }
}

/// Chooses `requester`'s target, or `None` when nobody is left to draw.
pub fn choose_target(
    requester: &str,
    state: &DrawState,
    policy: DrawPolicy,
    rng: &dyn RandomSource,
) -> Option<String> {
    let candidates = candidates(requester, state);
    if candidates.is_empty() {
        return None;
    }

    let pool = match policy {
        DrawPolicy::Greedy => candidates,
        DrawPolicy::Guarded => {
            let others: Vec<&str> = state
                .pending
                .iter()
                .map(String::as_str)
                .filter(|id| *id != requester)
                .collect();
            let safe: Vec<&str> = candidates
                .iter()
                .copied()
                .filter(|&c| {
                    let rest: Vec<&str> =
                        state.open.iter().map(String::as_str).filter(|id| *id != c).collect();
                    completable(&others, &rest)
                })
                .collect();
            // Already uncompletable (e.g. someone joined after the cycle
            // closed); any pick is as good as another.
            if safe.is_empty() { candidates } else { safe }
        }
    };

    Some(pool[rng.index(pool.len())].to_string())
}
