/// ABA routing transit number check: nine digits whose 3-7-1 weighted sum is
/// a multiple of ten.
pub fn is_valid_routing_number(routing: &str) -> bool {
    if routing.len() != 9 || !routing.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digit = |i: usize| u32::from(routing.as_bytes()[i] - b'0');
    let sum = 3 * (digit(0) + digit(3) + digit(6))
        + 7 * (digit(1) + digit(4) + digit(7))
        + (digit(2) + digit(5) + digit(8));
    sum % 10 == 0
}
