//! End-to-end properties of the generator algebra: distribution, bounds,
//! determinism, and shrink discipline.

use std::collections::HashMap;

use gencheck::context::EntropySource;
use gencheck::prelude::*;

/// Entropy source that fails the test if it is ever read.
struct NoEntropy;

impl EntropySource for NoEntropy {
    fn next_u64(&mut self) -> u64 {
        panic!("entropy drawn where none was expected");
    }
}

#[test]
fn ranged_values_stay_within_bounds_across_seeds() {
    for seed in 0..500 {
        let value = sample(NOMINAL_SIZE, seed, &ranged(10i64, 20)).unwrap();
        assert!((10..20).contains(&value));
    }
}

#[test]
fn inverted_range_always_fails() {
    for seed in 0..10 {
        let err = sample(NOMINAL_SIZE, seed, &ranged(1i32, -1)).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRange { .. }));
    }
}

#[test]
fn degenerate_range_is_deterministic_and_entropy_free() {
    let mut ctx = GenContext::new(NOMINAL_SIZE, Box::new(NoEntropy));
    for _ in 0..10 {
        assert_eq!(ranged(5u8, 5).generate(&mut ctx).unwrap(), 5);
    }
}

#[test]
fn such_that_results_always_satisfy_the_predicate() {
    let multiples = such_that(arbitrary::<u32>(), |x| x % 7 == 0);
    for seed in 0..200 {
        assert_eq!(sample(NOMINAL_SIZE, seed, &multiples).unwrap() % 7, 0);
    }
}

#[test]
fn unsatisfiable_predicate_fails_after_the_documented_bound() {
    let impossible = such_that(arbitrary::<u8>(), |_| false);
    let err = sample(NOMINAL_SIZE, 0, &impossible).unwrap_err();
    match err {
        GenerationError::GaveUp { attempts, .. } => assert_eq!(attempts, 101),
        other => panic!("expected GaveUp, got {other:?}"),
    }

    // The bound is configuration, not a constant.
    let mut ctx = GenContext::seeded(NOMINAL_SIZE, 0).with_limits(Limits { max_rejections: 3 });
    let err = impossible.generate(&mut ctx).unwrap_err();
    match err {
        GenerationError::GaveUp { attempts, .. } => assert_eq!(attempts, 4),
        other => panic!("expected GaveUp, got {other:?}"),
    }
}

#[test]
fn fixed_length_containers_are_exact() {
    for len in [0usize, 1, 5, 50] {
        let values: Vec<i32> = sample(NOMINAL_SIZE, 17, &vector_of(len, arbitrary::<i32>())).unwrap();
        assert_eq!(values.len(), len);
    }
}

#[test]
fn variable_length_containers_are_roughly_uniform_over_the_size_range() {
    let size = 10usize;
    let trials = 2_200;
    let mut counts = vec![0usize; size + 1];
    for seed in 0..trials {
        let values: Vec<u8> = sample(size, seed, &collection_of(arbitrary::<u8>())).unwrap();
        counts[values.len()] += 1;
    }
    // Expect ~200 per length; allow generous slack for a seeded stream.
    let expected = trials as usize / (size + 1);
    for (len, &count) in counts.iter().enumerate() {
        assert!(
            count > expected / 2 && count < expected * 2,
            "length {len} occurred {count} times (expected ~{expected})"
        );
    }
}

#[test]
fn shrink_sequences_are_reproducible() {
    let generator = collection_of::<Vec<u32>, _>(arbitrary::<u32>());
    let value = vec![9u32, 4, 7];
    let first: Vec<Vec<u32>> = generator.shrink(value.clone()).collect();
    let second: Vec<Vec<u32>> = generator.shrink(value).collect();
    assert_eq!(first, second);
}

#[test]
fn each_element_candidates_differ_in_exactly_one_position() {
    let source = vec![6u32, 12, 3];
    let candidates = each_element(source.clone(), |element| {
        arbitrary::<u32>().shrink(*element)
    });
    for candidate in candidates {
        assert_eq!(candidate.len(), source.len());
        let differing = candidate
            .iter()
            .zip(&source)
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(differing, 1);
    }
}

#[test]
fn tuple_shrink_never_changes_both_components() {
    let generator = pair_of(arbitrary::<u32>(), arbitrary::<u32>());
    let source = (16u32, 9u32);
    for (a, b) in generator.shrink(source) {
        let both = a != source.0 && b != source.1;
        assert!(!both, "candidate ({a}, {b}) changed both components");
    }
}

#[test]
fn scale_inside_a_pin_observes_the_scaled_magnitude() {
    let probe = from_fn(|ctx: &mut GenContext| Ok(ctx.size()));
    let observed = sample(NOMINAL_SIZE, 0, &resize(10, scale(2.0, probe))).unwrap();
    assert_eq!(observed, 20);
}

#[test]
fn context_overrides_do_not_leak_between_siblings() {
    let probe = from_fn(|ctx: &mut GenContext| Ok(ctx.size()));
    let sibling_sizes = pair_of(resize(3, probe.clone()), probe);
    assert_eq!(sample(77, 0, &sibling_sizes).unwrap(), (3, 77));
}

#[test]
fn one_of_selects_each_branch_with_similar_frequency() {
    let choice = one_of(vec![
        constant("left").boxed(),
        constant("middle").boxed(),
        constant("right").boxed(),
    ]);
    let trials = 3_000u64;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for seed in 0..trials {
        let value = sample(NOMINAL_SIZE, seed, &choice).unwrap();
        *counts.entry(value).or_insert(0) += 1;
    }
    assert_eq!(counts.len(), 3);
    for (branch, &count) in &counts {
        let share = count as f64 / trials as f64;
        assert!(
            (share - 1.0 / 3.0).abs() < 0.05,
            "branch {branch} selected with frequency {share:.3}"
        );
    }
}

#[test]
fn generation_is_deterministic_for_a_fixed_seed() {
    let generator = collection_of::<Vec<(u16, char)>, _>(pair_of(
        arbitrary::<u16>(),
        character::<char>(),
    ));
    let first = sample(30, 123, &generator).unwrap();
    let second = sample(30, 123, &generator).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rescue_absorbs_gave_up_failures_end_to_end() {
    let generator = rescue(
        such_that(ranged(0u8, 10), |_| false),
        GenerationErrorKind::GaveUp,
        |_| 0,
    );
    assert_eq!(sample(NOMINAL_SIZE, 0, &generator).unwrap(), 0);
}
