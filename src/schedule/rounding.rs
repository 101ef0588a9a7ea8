use crate::decimal::Money;

/// split a total into n parts on the currency minor unit with no drift:
/// the first n-1 parts get the floored base, the last part absorbs the
/// entire rounding remainder, so the parts always sum to the input exactly
pub fn split_even(total: Money, parts: u32) -> Vec<Money> {
    if parts == 0 {
        return Vec::new();
    }

    let base = total.floor_div(parts);
    let mut amounts = vec![base; (parts - 1) as usize];

    let mut assigned = Money::ZERO;
    for _ in 0..parts - 1 {
        assigned += base;
    }
    amounts.push(total - assigned);

    amounts
}
