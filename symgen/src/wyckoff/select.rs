use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::WyckoffPosition;

/// Pick a multiset of Wyckoff positions (by index into `wyckoffs`) whose
/// multiplicities sum exactly to `target`. With 50% probability, greedily
/// fills from the largest available multiplicity down (fewer, larger
/// orbits); otherwise reshuffles the candidate order after every pick to
/// diversify which letters get used. Returns `None` if the greedy walk
/// cannot complete even though `target` is known to be achievable overall.
pub fn choose_wyckoff_combination(
    wyckoffs: &[WyckoffPosition],
    target: usize,
    rng: &mut impl Rng,
) -> Option<Vec<usize>> {
    let mut order: Vec<usize> = (0..wyckoffs.len()).collect();
    let prefer_large = rng.gen_bool(0.5);
    if prefer_large {
        order.sort_by(|&a, &b| wyckoffs[b].multiplicity.cmp(&wyckoffs[a].multiplicity));
    } else {
        order.shuffle(rng);
    }

    let mut remaining = target;
    let mut chosen = Vec::new();
    while remaining > 0 {
        let pick = order.iter().find(|&&i| wyckoffs[i].multiplicity <= remaining);
        match pick {
            Some(&idx) => {
                chosen.push(idx);
                remaining -= wyckoffs[idx].multiplicity;
                if !prefer_large {
                    order.shuffle(rng);
                }
            }
            None => return None,
        }
    }
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::space_group_entry;
    use rand::SeedableRng;

    #[test]
    fn test_combination_sums_to_target() {
        let entry = space_group_entry(225).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let combo =
                choose_wyckoff_combination(&entry.wyckoff_positions, 4, &mut rng).unwrap();
            let sum: usize = combo.iter().map(|&i| entry.wyckoff_positions[i].multiplicity).sum();
            assert_eq!(sum, 4);
        }
    }

    #[test]
    fn test_unreachable_target_returns_none_or_overshoots_never() {
        let entry = space_group_entry(230).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        assert!(choose_wyckoff_combination(&entry.wyckoff_positions, 1, &mut rng).is_none());
    }
}
