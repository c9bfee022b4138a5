/// Component-wise "current >= minimum" over dotted version strings.
///
/// Missing trailing components count as 0, so "2.1.7" satisfies "2.1.7.0".
/// Components that fail to parse also count as 0. No pre-release or build
/// metadata handling.
pub fn is_at_least(current: &str, minimum: &str) -> bool {
    let current = parse_components(current);
    let minimum = parse_components(minimum);
    for i in 0..current.len().max(minimum.len()) {
        let cur = current.get(i).copied().unwrap_or(0);
        let min = minimum.get(i).copied().unwrap_or(0);
        if cur > min {
            return true;
        }
        if cur < min {
            return false;
        }
    }
    true
}

fn parse_components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|part| part.trim().parse().unwrap_or(0))
        .collect()
}
