use crate::utilities::error::{InvalidParam, Result};
use crate::utilities::structs::{KMeansOptions, MAX_ITER_LIMIT};

/// Checks every run parameter before any clustering work starts.
pub fn validate(k: usize, n: usize, d: usize, options: &KMeansOptions) -> Result<()> {
    if n <= 1 {
        return Err(InvalidParam::Points.into());
    }
    if k <= 1 || k >= n {
        return Err(InvalidParam::Clusters.into());
    }
    if d == 0 {
        return Err(InvalidParam::Dimension.into());
    }
    if options.max_iter <= 1 || options.max_iter >= MAX_ITER_LIMIT {
        return Err(InvalidParam::MaxIter.into());
    }
    if !options.epsilon.is_finite() || options.epsilon < 0.0 {
        return Err(InvalidParam::Epsilon.into());
    }
    if options.cores == 0 {
        return Err(InvalidParam::Cores.into());
    }
    Ok(())
}

/// Parses a positive whole number. `"3"` and `"3.0"` are accepted, `"3.5"`,
/// `"0"` and `"-2"` are not.
pub fn parse_count(raw: &str, param: InvalidParam) -> Result<usize> {
    let s = raw.trim();
    let v = if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<usize>().map_err(|_| param)?
    } else {
        let f: f64 = s.parse().map_err(|_| param)?;
        if !f.is_finite() || f.fract() != 0.0 || f < 0.0 || f >= usize::MAX as f64 {
            return Err(param.into());
        }
        f as usize
    };
    if v == 0 {
        return Err(param.into());
    }
    Ok(v)
}
