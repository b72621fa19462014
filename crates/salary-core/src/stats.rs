// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using linear
/// interpolation between closest ranks (NumPy's default method).
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> Option<f64> {
    let len = sorted_data.len();
    match len {
        0 => None,
        1 => Some(sorted_data[0]),
        _ => {
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (len as f64 - 1.0);
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
        }
    }
}

/// Median of a **sorted** slice.
pub fn median(sorted_data: &[f64]) -> Option<f64> {
    percentile(sorted_data, 50.0)
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation (n − 1 denominator); `None` below two values.
pub fn sample_stdev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let avg = mean(data)?;
    let sum_sq: f64 = data.iter().map(|v| (v - avg).powi(2)).sum();
    Some((sum_sq / (data.len() as f64 - 1.0)).sqrt())
}

/// Sort a sample in place with a total order so NaN cannot panic the sort.
pub fn sort_values(data: &mut [f64]) {
    data.sort_by(f64::total_cmp);
}

// ── Describe ──────────────────────────────────────────────────────────────────

/// Descriptive statistics of one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub stdev: Option<f64>,
}

/// Describe a sample. Consumes the values because they are sorted in place.
///
/// Returns `None` for an empty sample.
pub fn describe(mut values: Vec<f64>) -> Option<Description> {
    sort_values(&mut values);
    let min = *values.first()?;
    let max = *values.last()?;
    Some(Description {
        count: values.len(),
        min,
        max,
        mean: mean(&values)?,
        median: median(&values)?,
        stdev: sample_stdev(&values),
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
