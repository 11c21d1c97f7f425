use memchr::memchr;

use crate::utilities::error::{KMeansError, Result};
use crate::utilities::structs::Matrix;

fn lines<'a>(bytes: &'a [u8]) -> impl Iterator<Item = (usize, &'a [u8])> {
    let mut start = 0usize;
    let mut ln = 0usize;
    std::iter::from_fn(move || {
        if start >= bytes.len() {
            return None;
        }
        ln += 1;
        let end = memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |i| start + i);
        let line = &bytes[start..end];
        start = end + 1;
        Some((ln, line))
    })
}

fn parse_value(field: &[u8], ln: usize) -> Result<f64> {
    let s = std::str::from_utf8(field)
        .map_err(|_| KMeansError::malformed(ln, "not valid UTF-8"))?
        .trim();
    if s.is_empty() {
        return Err(KMeansError::malformed(ln, "empty value"));
    }
    let v: f64 = s
        .parse()
        .map_err(|_| KMeansError::malformed(ln, format!("`{s}` is not a number")))?;
    if !v.is_finite() {
        return Err(KMeansError::malformed(ln, format!("`{s}` is not finite")));
    }
    Ok(v)
}

fn parse_row(line: &[u8], ln: usize, out: &mut Vec<f64>) -> Result<usize> {
    // a single trailing comma is tolerated ("1.0,2.0,")
    let line = line.strip_suffix(b",").unwrap_or(line);
    let mut rest = line;
    let mut count = 0usize;
    loop {
        let (field, tail) = match memchr(b',', rest) {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let v = parse_value(field, ln)?;
        out.try_reserve(1)
            .map_err(|_| KMeansError::ResourceExhaustion { values: out.len() + 1 })?;
        out.push(v);
        count += 1;
        match tail {
            Some(t) => rest = t,
            None => return Ok(count),
        }
    }
}

/// Reads comma-separated points, one per line. Blank lines are skipped and
/// every row must have the same number of values.
pub fn read_points(bytes: &[u8]) -> Result<Matrix> {
    let mut values: Vec<f64> = Vec::new();
    let mut rows = 0usize;
    let mut cols = 0usize;
    for (ln, line) in lines(bytes) {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let width = parse_row(line, ln, &mut values)?;
        if rows == 0 {
            cols = width;
        } else if width != cols {
            return Err(KMeansError::malformed(
                ln,
                format!("expected {cols} values, found {width}"),
            ));
        }
        rows += 1;
    }
    if rows == 0 {
        return Err(KMeansError::malformed(0, "no points"));
    }
    Matrix::from_flat(values, rows, cols)
}

/// [`read_points`] plus a check against the declared shape.
pub fn read_dataset(bytes: &[u8], n: usize, d: usize) -> Result<Matrix> {
    let m = read_points(bytes)?;
    if m.rows() != n {
        return Err(KMeansError::malformed(
            0,
            format!("expected {n} points, found {}", m.rows()),
        ));
    }
    if m.cols() != d {
        return Err(KMeansError::malformed(
            0,
            format!("expected dimension {d}, found {}", m.cols()),
        ));
    }
    Ok(m)
}
