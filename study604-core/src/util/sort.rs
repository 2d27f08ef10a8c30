use std::cmp::Ordering;

use crate::entities::*;

/// Something that can be placed on the explore lists.
pub trait Ranked {
    /// Distance proxy, lower is closer.
    fn nearness(&self) -> f64;
    /// Higher is more popular.
    fn popularity(&self) -> f64;
}

impl Ranked for Spot {
    fn nearness(&self) -> f64 {
        self.nearness
    }
    fn popularity(&self) -> f64 {
        self.popularity
    }
}

impl<T: Ranked> Ranked for &T {
    fn nearness(&self) -> f64 {
        (*self).nearness()
    }
    fn popularity(&self) -> f64 {
        (*self).popularity()
    }
}

fn rank_by<T, F>(items: &[T], limit: usize, cmp: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    let mut ranked = items.to_vec();
    // Stable, i.e. ties keep their input order
    ranked.sort_by(cmp);
    ranked.truncate(limit);
    ranked
}

/// The `limit` closest items, closest first.
pub fn rank_by_nearness<T: Ranked + Clone>(items: &[T], limit: usize) -> Vec<T> {
    rank_by(items, limit, |a, b| a.nearness().total_cmp(&b.nearness()))
}

/// The `limit` most popular items, most popular first.
pub fn rank_by_popularity<T: Ranked + Clone>(items: &[T], limit: usize) -> Vec<T> {
    rank_by(items, limit, |a, b| b.popularity().total_cmp(&a.popularity()))
}
