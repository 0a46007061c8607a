//! Trailing-window statistics over one player's chronologically ordered
//! column. Every window ends at (and includes) the current position.

pub const FORM_WINDOW: usize = 10;
pub const FORM_MIN_PERIODS: usize = 3;

fn window(values: &[f64], end: usize) -> Option<&[f64]> {
    let start = (end + 1).saturating_sub(FORM_WINDOW);
    let slice = &values[start..=end];
    if slice.len() < FORM_MIN_PERIODS {
        return None;
    }
    Some(slice)
}

fn mean(slice: &[f64]) -> f64 {
    slice.iter().sum::<f64>() / slice.len() as f64
}

pub fn rolling_mean(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|idx| window(values, idx).map(mean))
        .collect()
}

/// Sample standard deviation (n - 1 denominator).
pub fn rolling_std(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|idx| {
            window(values, idx).map(|slice| {
                let m = mean(slice);
                let ss = slice.iter().map(|v| (v - m).powi(2)).sum::<f64>();
                (ss / (slice.len() - 1) as f64).sqrt()
            })
        })
        .collect()
}

pub fn rolling_count(flags: &[bool]) -> Vec<Option<u32>> {
    let as_f64 = flags
        .iter()
        .map(|hit| if *hit { 1.0 } else { 0.0 })
        .collect::<Vec<_>>();
    (0..flags.len())
        .map(|idx| window(&as_f64, idx).map(|slice| slice.iter().sum::<f64>() as u32))
        .collect()
}
