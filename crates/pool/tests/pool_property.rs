//! Property tests for produce/recycle ordering and list invariants.
//!
//! A plain `Vec` stack models the free list: produce pops its top, recycle
//! pushes onto it. After every operation the pool must agree with the model
//! and its lists must partition the slots.

use proptest::prelude::*;
use slotpool::{FixedPool, Handle, PoolConfig};

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Produce,
    Recycle(usize),
    RecycleStale(usize),
    RecycleForeign,
    RecycleNone,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Produce),
        3 => any::<usize>().prop_map(Op::Recycle),
        1 => any::<usize>().prop_map(Op::RecycleStale),
        1 => Just(Op::RecycleForeign),
        1 => Just(Op::RecycleNone),
    ]
}

struct Model {
    /// Free slot indices, top of stack last.
    free: Vec<usize>,
    held: Vec<(Handle<u32>, usize)>,
    retired: Vec<Handle<u32>>,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Self {
            free: (0..capacity).rev().collect(),
            held: Vec::new(),
            retired: Vec::new(),
        }
    }
}

fn check(pool: &FixedPool<u32>, model: &Model) -> Result<(), TestCaseError> {
    prop_assert!(pool.check_invariants().is_ok());
    prop_assert_eq!(pool.available(), model.free.len());
    prop_assert_eq!(pool.in_use(), model.held.len());
    prop_assert_eq!(pool.available() + pool.in_use(), pool.capacity());
    for (handle, index) in &model.held {
        prop_assert!(pool.is_live(handle));
        prop_assert_eq!(pool.index_of(handle), Some(*index));
        prop_assert_eq!(unsafe { *handle.as_ref() }, *index as u32);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pool_matches_lifo_model(
        capacity in 1usize..12,
        ops in proptest::collection::vec(op(), 1..80),
    ) {
        let pool = FixedPool::<u32>::with_config(PoolConfig::debug(capacity)).unwrap();
        let foreign_pool = FixedPool::<u32>::new(1);
        let foreign = foreign_pool.produce().unwrap();
        let mut model = Model::new(capacity);
        let mut rejected = 0_u64;

        for op in ops {
            match op {
                Op::Produce => {
                    let expected = model.free.pop();
                    let mut produced = None;
                    let handle = pool.produce_with(|| {
                        produced = expected;
                        expected.map_or(0, |index| index as u32)
                    });
                    prop_assert_eq!(handle.is_some(), expected.is_some());
                    if let (Some(handle), Some(index)) = (handle, expected) {
                        prop_assert_eq!(pool.index_of(&handle), Some(index));
                        model.held.push((handle, index));
                    }
                    prop_assert_eq!(produced, expected);
                }
                Op::Recycle(pick) if !model.held.is_empty() => {
                    let (handle, index) = model.held.swap_remove(pick % model.held.len());
                    let mut slot = Some(handle);
                    pool.recycle(&mut slot);
                    prop_assert!(slot.is_none());
                    model.free.push(index);
                    model.retired.push(handle);
                }
                Op::RecycleStale(pick) if !model.retired.is_empty() => {
                    let stale = model.retired[pick % model.retired.len()];
                    pool.recycle_handle(stale);
                    rejected += 1;
                }
                Op::RecycleForeign => {
                    pool.recycle_handle(foreign);
                    rejected += 1;
                }
                Op::Recycle(_) | Op::RecycleStale(_) | Op::RecycleNone => {
                    pool.recycle(&mut None);
                }
            }
            check(&pool, &model)?;
        }

        let stats = pool.stats().unwrap();
        prop_assert_eq!(stats.rejected_recycles(), rejected);
        prop_assert!(stats.peak_in_use <= capacity);
        prop_assert!(foreign_pool.is_live(&foreign));
    }

    #[test]
    fn drain_and_refill_reverses_recycle_order(capacity in 1usize..16) {
        let pool = FixedPool::<u32>::new(capacity);
        let handles: Vec<_> = (0..capacity).map(|_| pool.produce().unwrap()).collect();
        prop_assert!(pool.produce().is_none());

        for handle in &handles {
            pool.recycle_handle(*handle);
        }
        let refilled: Vec<_> = (0..capacity)
            .map(|_| pool.index_of(&pool.produce().unwrap()).unwrap())
            .collect();

        let expected: Vec<_> = (0..capacity).rev().collect();
        prop_assert_eq!(refilled, expected);
    }
}
