//! Trailing streak detection.
//!
//! Scans backward from the most recent close and counts consecutive steps
//! in one direction. A flat step or a reversal ends the scan.

/// Consecutive closes below their predecessor, counted back from the last close.
pub fn down_streak(closes: &[f64]) -> u32 {
    let mut streak = 0;
    for pair in closes.windows(2).rev() {
        if pair[1] < pair[0] {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// `(up, down)` trailing streaks. The first step back fixes the direction,
/// so at most one of the two is non-zero.
pub fn up_down_streak(closes: &[f64]) -> (u32, u32) {
    let mut up = 0;
    let mut down = 0;

    for pair in closes.windows(2).rev() {
        let (prev, curr) = (pair[0], pair[1]);
        if curr > prev && down == 0 {
            up += 1;
        } else if curr < prev && up == 0 {
            down += 1;
        } else {
            break;
        }
    }

    (up, down)
}
