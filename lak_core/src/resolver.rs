//! Street-to-directory resolution.
//!
//! A street name can map to several directory entries with overlapping house
//! number ranges plus an optional general entry. Both the schedule lookup and
//! the calendar export resolve an address through this single function.

use crate::model::Street;

/// Select the directory entry for a street and optional house number.
///
/// Returns `None` only when `candidates` is empty; callers treat that as
/// "street not found". Matching is first-match-wins in candidate order:
/// overlapping ranges resolve by the order the store returned them, not by
/// the narrowest range. Without a usable house number the general entry wins,
/// falling back to the first candidate when there is none.
pub fn resolve<'a>(candidates: &'a [Street], house_number: Option<&str>) -> Option<&'a Street> {
    let first = candidates.first()?;
    if candidates.len() == 1 {
        return Some(first);
    }
    let general = candidates.iter().find(|street| street.is_general());
    let Some(number) = house_number.and_then(|value| value.trim().parse::<i64>().ok()) else {
        return Some(general.unwrap_or(first));
    };
    candidates
        .iter()
        .find(|street| covers_house_number(street, number))
        .or(general)
        .or(Some(first))
}

/// Whether a street entry's house number spec covers `number`.
///
/// The spec is a comma-separated token list, each token a single number or an
/// inclusive `start-end` range. Malformed tokens never match.
fn covers_house_number(street: &Street, number: i64) -> bool {
    let Some(spec) = street.house_numbers.as_deref() else {
        return false;
    };
    spec.split(',')
        .map(str::trim)
        .any(|token| match token.split_once('-') {
            Some((start, end)) => {
                let (Ok(start), Ok(end)) = (start.trim().parse::<i64>(), end.trim().parse::<i64>())
                else {
                    return false;
                };
                start <= number && number <= end
            }
            None => token.parse::<i64>() == Ok(number),
        })
}
