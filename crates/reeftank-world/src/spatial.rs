//! Nearest-neighbour and radius queries over small entity sets.
//!
//! Populations are tens of entities, so every query is a linear scan with no
//! index and nothing cached between calls. Ties keep the first candidate
//! encountered.

use reeftank_types::Point;

/// Find the candidate closest to `origin`.
///
/// Returns `None` when `candidates` is empty.
pub fn nearest(origin: Point, candidates: &[Point]) -> Option<Point> {
    nearest_by(origin, candidates, |p| *p).copied()
}

/// Find the item whose position (as extracted by `position`) is closest to
/// `origin`.
pub fn nearest_by<'a, T, F>(origin: Point, items: &'a [T], position: F) -> Option<&'a T>
where
    F: Fn(&T) -> Point,
{
    let mut best: Option<(&'a T, f64)> = None;
    for item in items {
        let d = origin.distance_to(position(item));
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((item, d)),
        }
    }
    best.map(|(item, _)| item)
}

/// Iterate over the items within `radius` of `origin` (inclusive), yielding
/// each alongside its distance.
pub fn within_radius<'a, T, F>(
    origin: Point,
    items: &'a [T],
    radius: f64,
    position: F,
) -> impl Iterator<Item = (&'a T, f64)> + 'a
where
    F: Fn(&T) -> Point + 'a,
{
    items.iter().filter_map(move |item| {
        let d = origin.distance_to(position(item));
        (d <= radius).then_some((item, d))
    })
}
