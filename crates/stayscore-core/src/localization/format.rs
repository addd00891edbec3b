//! printf-style substitution for translated templates.

use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::LazyLock;

static SPECIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(?:(\d+)\$)?([sdif%])").expect("specifier regex is valid"));

/// Substitutes `args` into `template`.
///
/// Supports `%s`, `%d`, `%i`, `%f`, positional `%2$s` and the `%%` escape.
/// Every argument is rendered with `Display`. A specifier with no matching
/// argument is left as written.
pub fn sprintf(template: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() && !template.contains("%%") {
        return template.to_string();
    }

    let mut next = 0usize;
    SPECIFIER
        .replace_all(template, |caps: &Captures<'_>| {
            if &caps[2] == "%" {
                return "%".to_string();
            }
            let index = match caps.get(1) {
                Some(pos) => match pos.as_str().parse::<usize>() {
                    Ok(n) if n > 0 => n - 1,
                    _ => return caps[0].to_string(),
                },
                None => {
                    let i = next;
                    next += 1;
                    i
                }
            };
            args.get(index)
                .map_or_else(|| caps[0].to_string(), |arg| arg.to_string())
        })
        .into_owned()
}
