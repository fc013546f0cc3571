//! Independent water computations used to cross-check the stack engine
//!
//! Neither function records steps. [`water_levels`] is the per-bar depth a
//! renderer needs to draw water columns.

use super::{Height, Water};

/// Total water from prefix and suffix maxima
///
/// Sums `max(0, min(left_max(i), right_max(i)) - heights[i])` where both
/// maxima include `i` itself.
pub fn reference_total(heights: &[Height]) -> Water {
    let n = heights.len();
    if n == 0 {
        return 0;
    }

    let mut right_max = vec![0; n];
    let mut running = 0;
    for i in (0..n).rev() {
        running = running.max(heights[i]);
        right_max[i] = running;
    }

    let mut left_max = 0;
    let mut total: Water = 0;
    for (i, &height) in heights.iter().enumerate() {
        left_max = left_max.max(height);
        let level = left_max.min(right_max[i]);
        total += Water::from(level.saturating_sub(height));
    }
    total
}

/// Water depth standing above each bar
///
/// Two-pointer sweep from both ends; the side with the lower wall is
/// settled first because its own running maximum bounds its water.
pub fn water_levels(heights: &[Height]) -> Vec<Height> {
    let n = heights.len();
    let mut levels = vec![0; n];
    if n == 0 {
        return levels;
    }

    let mut left = 0;
    let mut right = n - 1;
    let mut left_max = 0;
    let mut right_max = 0;

    while left <= right {
        if heights[left] < heights[right] {
            if heights[left] >= left_max {
                left_max = heights[left];
            } else {
                levels[left] = left_max - heights[left];
            }
            left += 1;
        } else {
            if heights[right] >= right_max {
                right_max = heights[right];
            } else {
                levels[right] = right_max - heights[right];
            }
            if right == 0 {
                break;
            }
            right -= 1;
        }
    }

    levels
}

/// Sum of [`water_levels`]
pub fn levels_total(levels: &[Height]) -> Water {
    levels.iter().map(|&level| Water::from(level)).sum()
}
