//! Filename resolution.
//!
//! The engine passes filenames exactly as the Pascal program assembled
//! them: padded with trailing spaces, sometimes wrapped in legacy
//! conventions (`{job}` wrappers, `TeXfonts:` device prefixes, quoted
//! paths). Every open runs the raw name through the fixed pipeline below
//! before any lookup happens, so the store, the handle table and read-back
//! all agree on one spelling per file.

/// Name of the terminal device. Opening it for read yields the stdin
/// pseudo-file, opening it for write the stdout pseudo-file.
pub const TTY_DEVICE: &str = "TTY:";

/// Legacy device prefix font metric opens arrive with.
const FONT_DEVICE_PREFIX: &str = "TeXfonts:";

/// Legacy spelling of the string pool file and its canonical replacement.
const POOL_ALIAS: &str = "TeXformats:TEX.POOL";
const POOL_NAME: &str = "tex.pool";

/// Normalize a filename the engine passed to an open.
///
/// The stages run unconditionally, in this order, each on the previous
/// stage's output:
///
/// 1. strip a `{`…`}` job-name wrapper (`{job}.tex` → `job.tex`)
/// 2. strip trailing spaces
/// 3. strip one leading `*`
/// 4. strip a leading `TeXfonts:` device prefix
/// 5. strip every double quote
/// 6. rewrite the exact name `TeXformats:TEX.POOL` to `tex.pool`
///
/// The order is load-bearing: trailing spaces are removed before the
/// prefix and pool comparisons, so padded spellings of either still match.
pub fn normalize(raw: &str) -> String {
    let mut name = String::from(raw);

    // 1. Job-name wrapper. The closing brace may sit anywhere; only the
    // braces themselves are dropped.
    if name.starts_with('{') {
        name.remove(0);
        if let Some(close) = name.find('}') {
            name.remove(close);
        }
    }

    // 2. Trailing spaces only; tabs would be real filename bytes.
    while name.ends_with(' ') {
        name.pop();
    }

    // 3. One leading `*`.
    if name.starts_with('*') {
        name.remove(0);
    }

    // 4. Device prefix.
    if let Some(rest) = name.strip_prefix(FONT_DEVICE_PREFIX) {
        name = String::from(rest);
    }

    // 5. Quotes, wherever they appear.
    if name.contains('"') {
        name.retain(|c| c != '"');
    }

    // 6. The engine binary still asks for the pool by its legacy spelling.
    if name == POOL_ALIAS {
        return String::from(POOL_NAME);
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(normalize("input.tex"), "input.tex");
        assert_eq!(normalize("input.dvi"), "input.dvi");
    }

    #[test]
    fn job_wrapper_keeps_the_suffix() {
        assert_eq!(normalize("{job}.tex  "), "job.tex");
        assert_eq!(normalize("{plain}.fmt"), "plain.fmt");
    }

    #[test]
    fn unclosed_wrapper_still_drops_the_brace() {
        assert_eq!(normalize("{job.tex"), "job.tex");
    }

    #[test]
    fn trailing_spaces_are_stripped() {
        assert_eq!(normalize("input.tex   "), "input.tex");
        // Interior spaces are filename bytes.
        assert_eq!(normalize("my file.tex "), "my file.tex");
    }

    #[test]
    fn leading_star_is_stripped_once() {
        assert_eq!(normalize("*TTY:"), "TTY:");
        assert_eq!(normalize("**x"), "*x");
    }

    #[test]
    fn font_device_prefix_is_stripped() {
        assert_eq!(normalize("TeXfonts:cmr10.tfm"), "cmr10.tfm");
        // Padded spelling: spaces go first, then the prefix.
        assert_eq!(normalize("TeXfonts:cmr10.tfm  "), "cmr10.tfm");
    }

    #[test]
    fn quotes_are_removed_everywhere() {
        assert_eq!(normalize("\"my file.tex\""), "my file.tex");
        assert_eq!(normalize("a\"b\"c"), "abc");
    }

    #[test]
    fn pool_alias_is_rewritten() {
        assert_eq!(normalize("TeXformats:TEX.POOL"), "tex.pool");
        assert_eq!(normalize("TeXformats:TEX.POOL  "), "tex.pool");
        // Exact match only.
        assert_eq!(normalize("TeXformats:tex.pool"), "TeXformats:tex.pool");
    }

    #[test]
    fn terminal_name_survives_normalization() {
        assert_eq!(normalize("TTY:"), TTY_DEVICE);
        assert_eq!(normalize("TTY:  "), TTY_DEVICE);
    }
}
