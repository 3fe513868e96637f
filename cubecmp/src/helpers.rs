use std::fmt::Display;

/// Format a shape the way it reads in a diagnostic, eg `(2, 3)`, or `(4,)` for one dimension.
///
pub fn fmt_shape(shape: &[usize]) -> String {
    match shape {
        [extent] => format!("({extent},)"),
        _ => {
            let extents: Vec<String> = shape.iter().map(|extent| extent.to_string()).collect();
            format!("({})", extents.join(", "))
        }
    }
}

/// Format a list of names as a bracketed, quoted list, eg `['x', 'y']`.
pub fn fmt_names(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|name| format!("'{name}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// One numbered summary line per item.
pub fn fmt_summaries<'a, T, I>(items: I) -> String
where
    T: Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let lines: Vec<String> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("{i}: {item}"))
        .collect();
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_shape() {
        assert_eq!(fmt_shape(&[]), "()");
        assert_eq!(fmt_shape(&[4]), "(4,)");
        assert_eq!(fmt_shape(&[2, 3]), "(2, 3)");
    }

    #[test]
    fn test_fmt_names() {
        assert_eq!(fmt_names(&[]), "[]");
        assert_eq!(fmt_names(&[String::from("y")]), "['y']");
        assert_eq!(fmt_names(&[String::from("x"), String::from("y")]), "['x', 'y']");
    }

    #[test]
    fn test_fmt_summaries() {
        assert_eq!(fmt_summaries(&["a", "b"]), "0: a\n1: b");
    }
}
