extern crate alloc;
extern crate std;

use crate::sequence::Iterated;
use crate::{caps, AnyView};
use alloc::vec::Vec;
use proptest::prelude::*;

type Ints<'a> = AnyView<'a, i64, caps![random_access | sized | common]>;
type Borrowed<'a> = AnyView<'a, i64, caps![random_access | sized | common | borrowed]>;

proptest! {
    #[test]
    fn jump_then_distance(values in prop::collection::vec(any::<i64>(), 0..64), n in 0usize..64) {
        let n = n.min(values.len());
        let view: Ints = AnyView::new(values.clone());
        let begin = view.begin();
        let jumped = &begin + n as isize;
        prop_assert_eq!(&jumped - &begin, n as isize);
        if n < values.len() {
            prop_assert_eq!(jumped.get(), values[n]);
        }
    }

    #[test]
    fn len_advances_reach_end(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let view: Borrowed = AnyView::new(&values);
        let mut it = view.begin();
        for _ in 0..view.len() {
            prop_assert!(it != view.end());
            it.advance();
        }
        prop_assert!(it == view.end());
        prop_assert_eq!(view.len(), values.len());
    }

    #[test]
    fn copies_are_independent(values in prop::collection::vec(any::<i64>(), 1..32), steps in 0usize..32) {
        let view: Ints = AnyView::new(values.clone());
        let copy = view.clone();
        let mut it = copy.begin();
        for _ in 0..steps.min(values.len()) {
            it.advance();
        }
        drop(it);
        drop(copy);
        prop_assert_eq!(view.begin().get(), values[0]);
        prop_assert_eq!(view.iter().collect::<Vec<_>>(), values);
    }

    #[test]
    fn moves_preserve_contents(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let view: Ints = AnyView::new(values.clone());
        let len = view.len();
        let moved = [view];
        let [view] = moved;
        prop_assert_eq!(view.len(), len);
        prop_assert_eq!(view.iter().collect::<Vec<_>>(), values);
    }

    #[test]
    fn ranges_match_std(start in -1000i32..1000, len in 0i32..200) {
        let view: AnyView<'_, i32, caps![random_access | sized]> = AnyView::new(start..start + len);
        prop_assert_eq!(view.len(), len as usize);
        prop_assert!(view.iter().eq(start..start + len));
    }

    #[test]
    fn input_views_match_iterator(values in prop::collection::vec(any::<u16>(), 0..32)) {
        let view: AnyView<'_, u16, caps![input | move_only]> =
            AnyView::new(Iterated::new(values.iter().copied()));
        prop_assert_eq!(view.iter().collect::<Vec<_>>(), values.clone());
        prop_assert_eq!(view.iter().count(), values.len());
    }
}
