/*!
 * Guard Property Tests
 *
 * At-most-once invocation over arbitrary transfer/release sequences
 */

use proptest::prelude::*;
use scope_exit::core::guard::*;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
enum Step {
    Transfer,
    Release,
    Inspect,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => Just(Step::Transfer),
        1 => Just(Step::Release),
        2 => Just(Step::Inspect),
    ]
}

proptest! {
    #[test]
    fn owned_guard_chain_runs_at_most_once(steps in prop::collection::vec(step(), 0..32)) {
        let count = Rc::new(Cell::new(0u32));
        let c = count.clone();
        let mut guard = make_exit_guard(move || c.set(c.get() + 1));
        let mut released = false;

        for step in steps {
            match step {
                Step::Transfer => {
                    let next = guard.transfer();
                    guard = next;
                }
                Step::Release => {
                    guard.release();
                    released = true;
                }
                Step::Inspect => {
                    prop_assert_eq!(guard.is_armed(), !released);
                }
            }
            prop_assert_eq!(count.get(), 0);
        }

        drop(guard);
        prop_assert_eq!(count.get(), if released { 0 } else { 1 });
    }

    #[test]
    fn borrowed_guard_chain_runs_at_most_once(steps in prop::collection::vec(step(), 0..32)) {
        let count = Cell::new(0u32);
        let action = || count.set(count.get() + 1);
        let mut guard = make_exit_guard_ref(&action);
        let mut released = false;

        for step in steps {
            match step {
                Step::Transfer => {
                    let next = guard.transfer();
                    guard = next;
                }
                Step::Release => {
                    guard.release();
                    released = true;
                }
                Step::Inspect => {
                    prop_assert_eq!(guard.is_armed(), !released);
                }
            }
            prop_assert_eq!(count.get(), 0);
        }

        drop(guard);
        prop_assert_eq!(count.get(), if released { 0 } else { 1 });
    }

    #[test]
    fn settle_fires_fail_guard_iff_err(ok in any::<bool>()) {
        let count = Cell::new(0u32);
        let outcome: Result<(), ()> = if ok { Ok(()) } else { Err(()) };
        let settled = make_fail_guard(|| count.set(count.get() + 1)).settle(outcome);

        prop_assert_eq!(settled.is_ok(), ok);
        prop_assert_eq!(count.get(), if ok { 0 } else { 1 });
    }
}
