/*!
 * Model-based Property Tests
 *
 * Random operation sequences checked against a plain array/Vec model.
 */

use concurrent_containers::{ConcurrentArray, ConcurrentVec};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum ArrayOp {
    Set(usize, i32),
    At(usize),
    Fill(i32),
}

fn array_op() -> impl Strategy<Value = ArrayOp> {
    prop_oneof![
        (0usize..12, any::<i32>()).prop_map(|(pos, v)| ArrayOp::Set(pos, v)),
        (0usize..12).prop_map(ArrayOp::At),
        any::<i32>().prop_map(ArrayOp::Fill),
    ]
}

#[derive(Debug, Clone)]
enum VecOp {
    Push(u16),
    Pop,
    Set(usize, u16),
    Truncate(usize),
    Reserve(usize),
    ShrinkToFit,
}

fn vec_op() -> impl Strategy<Value = VecOp> {
    prop_oneof![
        3 => any::<u16>().prop_map(VecOp::Push),
        1 => Just(VecOp::Pop),
        2 => (0usize..40, any::<u16>()).prop_map(|(pos, v)| VecOp::Set(pos, v)),
        1 => (0usize..40).prop_map(VecOp::Truncate),
        1 => (0usize..64).prop_map(VecOp::Reserve),
        1 => Just(VecOp::ShrinkToFit),
    ]
}

proptest! {
    #[test]
    fn array_matches_model(ops in prop::collection::vec(array_op(), 0..64)) {
        let array = ConcurrentArray::new([0i32; 10]);
        let mut model = [0i32; 10];

        for op in ops {
            match op {
                ArrayOp::Set(pos, v) => {
                    let result = array.set(pos, v);
                    if pos < 10 {
                        prop_assert!(result.is_ok());
                        model[pos] = v;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                ArrayOp::At(pos) => {
                    prop_assert_eq!(array.at(pos).ok(), model.get(pos).copied());
                }
                ArrayOp::Fill(v) => {
                    array.fill(v);
                    model = [v; 10];
                }
            }
        }
        prop_assert_eq!(array.to_array(), model);
    }

    #[test]
    fn vec_matches_model(ops in prop::collection::vec(vec_op(), 0..128)) {
        let vec: ConcurrentVec<u16> = ConcurrentVec::new();
        let mut model: Vec<u16> = Vec::new();

        for op in ops {
            match op {
                VecOp::Push(v) => {
                    vec.push(v).unwrap();
                    model.push(v);
                }
                VecOp::Pop => prop_assert_eq!(vec.pop(), model.pop()),
                VecOp::Set(pos, v) => {
                    let result = vec.set(pos, v);
                    prop_assert_eq!(result.is_ok(), pos < model.len());
                    if let Some(slot) = model.get_mut(pos) {
                        *slot = v;
                    }
                }
                VecOp::Truncate(len) => {
                    vec.truncate(len);
                    model.truncate(len);
                }
                VecOp::Reserve(additional) => {
                    vec.reserve(additional).unwrap();
                    prop_assert!(vec.capacity() >= model.len() + additional);
                }
                VecOp::ShrinkToFit => {
                    vec.shrink_to_fit().unwrap();
                    prop_assert_eq!(vec.capacity(), model.len());
                }
            }
            prop_assert!(vec.len() <= vec.capacity());
            prop_assert_eq!(vec.len(), model.len());
        }
        prop_assert_eq!(vec.to_vec(), model);
    }
}
