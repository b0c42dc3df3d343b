use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }
}

/// Tri-state sort: nothing, or one column in one direction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SortState {
    spec: Option<SortSpec>,
}

impl SortState {
    pub fn new(initial: Option<SortSpec>) -> Self {
        Self { spec: initial }
    }

    pub fn spec(&self) -> Option<&SortSpec> {
        self.spec.as_ref()
    }

    pub fn order_for(&self, column: &str) -> Option<SortOrder> {
        self.spec
            .as_ref()
            .filter(|spec| spec.column == column)
            .map(|spec| spec.order)
    }

    /// Selecting the active option again clears the sort; anything else
    /// replaces it outright.
    pub fn toggle(&mut self, column: &str, order: SortOrder) {
        if self.order_for(column) == Some(order) {
            self.spec = None;
        } else {
            self.spec = Some(SortSpec::new(column, order));
        }
    }

    pub fn set(&mut self, spec: Option<SortSpec>) {
        self.spec = spec;
    }
}

/// Orders two display strings. Numeric literals come first, ordered by
/// value; everything else follows by case-insensitive natural collation.
/// Numbers and text never compare across kinds, so the order stays total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| natural_cmp(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => natural_cmp(a, b),
    }
}

/// Parses `-1,234.5`-style literals. Exponents, `inf` and `NaN` are not numbers here.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    if unsigned.is_empty() {
        return None;
    }

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }
    if !valid_integer_part(int_part) {
        return None;
    }
    if let Some(frac) = frac_part {
        if !frac.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
    }

    let cleaned: String = s.chars().filter(|ch| *ch != ',').collect();
    cleaned.parse::<f64>().ok()
}

fn valid_integer_part(int_part: &str) -> bool {
    if !int_part.contains(',') {
        return int_part.chars().all(|ch| ch.is_ascii_digit());
    }

    let mut groups = int_part.split(',');
    let first = groups.next().unwrap_or_default();
    (1..=3).contains(&first.len())
        && first.chars().all(|ch| ch.is_ascii_digit())
        && groups.all(|group| group.len() == 3 && group.chars().all(|ch| ch.is_ascii_digit()))
}

/// Case-insensitive comparison where digit runs compare by value, so
/// `file2` sorts before `file10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }

    // Equal under collation; keep the order total and deterministic.
    a.cmp(b)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(ch) = chars.peek().copied() {
        if !ch.is_ascii_digit() {
            break;
        }
        run.push(ch);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}
