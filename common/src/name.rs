//! Splits Google Benchmark identifiers such as `BM_StdThreadBitonicSort/2048/4`
//! into the sorter variant and its arguments.

const NAME_PREFIX: &str = "BM_";
const NAME_SUFFIXES: &[&str] = &["BitonicSort", "Sort"];
const THREADS_KEY: &str = "threads:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub variant: String,
    pub size: Option<u64>,
    pub threads: Option<u64>,
}

/// Never fails: fields that cannot be read are left as `None`.
///
/// A thread count is only looked for when the variant label contains
/// `threaded_variant`.
pub fn parse_benchmark_name(name: &str, threaded_variant: &str) -> ParsedName {
    let mut parts = name.split('/');
    let variant = variant_label(parts.next().unwrap_or_default());
    let size = parts.next().and_then(parse_digits);

    let threads = if !threaded_variant.is_empty() && variant.contains(threaded_variant) {
        parts.next().and_then(|part| match part.strip_prefix(THREADS_KEY) {
            Some(count) => parse_digits(count),
            None => parse_digits(part),
        })
    } else {
        None
    };

    ParsedName {
        variant,
        size,
        threads,
    }
}

fn variant_label(segment: &str) -> String {
    let segment = segment.strip_prefix(NAME_PREFIX).unwrap_or(segment);
    NAME_SUFFIXES
        .iter()
        .find_map(|suffix| segment.strip_suffix(suffix))
        .filter(|label| !label.is_empty())
        .unwrap_or(segment)
        .to_owned()
}

/// Plain unsigned decimal, no sign and no surrounding text
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_THREADED_VARIANT;

    fn parse(name: &str) -> ParsedName {
        parse_benchmark_name(name, DEFAULT_THREADED_VARIANT)
    }

    #[test]
    fn plain_variant_with_size() {
        assert_eq!(
            parse("BM_FooSort/1024"),
            ParsedName {
                variant: "Foo".to_owned(),
                size: Some(1024),
                threads: None,
            }
        );
    }

    #[test]
    fn threaded_variant_with_positional_threads() {
        let parsed = parse("BM_StdThreadBitonicSort/2048/4");
        assert_eq!(parsed.variant, "StdThread");
        assert_eq!(parsed.size, Some(2048));
        assert_eq!(parsed.threads, Some(4));
    }

    #[test]
    fn threaded_variant_with_keyed_threads() {
        let parsed = parse("BM_StdThreadBitonicSort/2048/threads:8");
        assert_eq!(parsed.size, Some(2048));
        assert_eq!(parsed.threads, Some(8));
    }

    #[test]
    fn third_segment_ignored_for_other_variants() {
        let parsed = parse("BM_OpenMPBitonicSort/512/4");
        assert_eq!(parsed.variant, "OpenMP");
        assert_eq!(parsed.threads, None);
    }

    #[test]
    fn malformed_numbers_are_absent() {
        assert_eq!(parse("BM_PlainBitonicSort/1024_mean").size, None);
        assert_eq!(parse("BM_PlainBitonicSort/-5").size, None);
        assert_eq!(parse("BM_PlainBitonicSort/+5").size, None);
        assert_eq!(parse("BM_PlainBitonicSort/99999999999999999999999").size, None);
        assert_eq!(parse("BM_StdThreadBitonicSort/64/threads:x").threads, None);
        assert_eq!(parse("BM_PlainBitonicSort").size, None);
    }

    #[test]
    fn label_without_known_affixes_is_kept() {
        assert_eq!(parse("Custom/8").variant, "Custom");
        assert_eq!(parse("BM_Sort/8").variant, "Sort");
        assert_eq!(parse("").variant, "");
    }
}
