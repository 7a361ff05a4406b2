//! Symbol normalization for quote providers.
//!
//! Index constituent lists write class shares with a dot (`BRK.B`) while
//! the quote API wants a dash (`BRK-B`). Normalization is applied to every
//! symbol entering the universe so the rest of the pipeline only ever sees
//! the quotable form.

/// Normalize a raw symbol: trim, uppercase, dot-to-dash for class shares.
pub fn resolve_symbol(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace('.', "-")
}

/// Normalize a list of symbols, dropping empties and duplicates while
/// preserving the input order.
pub fn sanitize_symbols<I, S>(symbols: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();
    for raw in symbols {
        let symbol = resolve_symbol(raw.as_ref());
        if symbol.is_empty() {
            continue;
        }
        if seen.insert(symbol.clone()) {
            out.push(symbol);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_shares_use_dash() {
        assert_eq!(resolve_symbol("BRK.B"), "BRK-B");
        assert_eq!(resolve_symbol("BF.B"), "BF-B");
    }

    #[test]
    fn test_trims_and_uppercases() {
        assert_eq!(resolve_symbol("  nvda "), "NVDA");
    }

    #[test]
    fn test_sanitize_preserves_order_and_drops_duplicates() {
        let out = sanitize_symbols(["MSFT", "aapl", "BRK.B", "AAPL", "", "BRK-B"]);
        assert_eq!(out, vec!["MSFT", "AAPL", "BRK-B"]);
    }
}
