use num_bigint::BigUint;

/// Returns the sorted middle, or the floor average of the two middle items if
/// the slice has an even number of elements.
pub fn calculate(list: &mut [BigUint]) -> Option<BigUint> {
    if list.is_empty() {
        return None;
    }
    list.sort();
    let len = list.len();
    let middle_index = len / 2;
    if len % 2 == 0 {
        // [2.0, 2.1, 2.2, 2.3]
        let median1 = list.get(middle_index - 1)?; // 2.1
        let median2 = list.get(middle_index)?; // 2.2
        Some((median1 + median2) / 2u32) // 4.3 / 2 = 2.15, floored
    } else {
        list.get(middle_index).cloned()
    }
}
