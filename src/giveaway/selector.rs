use rand::Rng;

/// Draws up to `count` distinct ids from `pool`, skipping everything in
/// `exclude`. Partial Fisher-Yates: each draw removes the chosen candidate,
/// so no id repeats within one call and nothing from `exclude` can appear.
/// Returns fewer than `count` ids when the candidates run out; callers cap
/// `count` beforehand if they care.
pub fn pick<R: Rng>(pool: &[String], exclude: &[String], count: usize, rng: &mut R) -> Vec<String> {
    let mut candidates: Vec<&String> = pool
        .iter()
        .filter(|id| !exclude.contains(*id))
        .collect();

    let mut drawn = Vec::with_capacity(count.min(candidates.len()));
    while drawn.len() < count && !candidates.is_empty() {
        let index = rng.gen_range(0..candidates.len());
        drawn.push(candidates.swap_remove(index).clone());
    }
    drawn
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::pick;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn draws_requested_number_of_distinct_ids() {
        let pool = ids(&["a", "b", "c", "d", "e"]);
        let mut rng = StdRng::seed_from_u64(7);

        let drawn = pick(&pool, &[], 3, &mut rng);

        assert_eq!(drawn.len(), 3);
        for id in &drawn {
            assert!(pool.contains(id));
            assert_eq!(drawn.iter().filter(|other| *other == id).count(), 1);
        }
    }

    #[test]
    fn never_returns_excluded_ids() {
        let pool = ids(&["a", "b", "c", "d"]);
        let exclude = ids(&["a", "c"]);
        let mut rng = StdRng::seed_from_u64(21);

        let drawn = pick(&pool, &exclude, 4, &mut rng);

        assert_eq!(drawn.len(), 2);
        assert!(drawn.contains(&"b".to_string()));
        assert!(drawn.contains(&"d".to_string()));
    }

    #[test]
    fn returns_fewer_when_pool_is_small() {
        let pool = ids(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(pick(&pool, &[], 5, &mut rng).len(), 2);
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick(&[], &[], 1, &mut rng).is_empty());
    }

    #[test]
    fn fully_excluded_pool_yields_nothing() {
        let pool = ids(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick(&pool, &pool.clone(), 1, &mut rng).is_empty());
    }

    #[test]
    fn identical_seeds_draw_identically() {
        let pool = ids(&["a", "b", "c", "d", "e", "f"]);

        let first = pick(&pool, &[], 3, &mut StdRng::seed_from_u64(99));
        let second = pick(&pool, &[], 3, &mut StdRng::seed_from_u64(99));

        assert_eq!(first, second);
    }
}
