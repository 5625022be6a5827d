//! Built-in lint rules for lintseed
//!
//! [`builtin_catalog`] registers every built-in rule in a fixed order. That
//! order is the order rules are configured and reported in.

pub mod builtin;

use lintseed_core::RuleCatalog;
use tracing::debug;

pub use builtin::{
    CommaDangle, EolLast, Eqeqeq, Indent, LinebreakStyle, NoConsole, NoDebugger, NoEmpty,
    NoTrailingSpaces, NoUnusedVars, NoVar, Quotes, Semi,
};

/// Catalog with every built-in rule
pub fn builtin_catalog() -> RuleCatalog {
    let catalog = RuleCatalog::new()
        .with_rule(Semi::new())
        .with_rule(Quotes::new())
        .with_rule(Indent::new())
        .with_rule(NoUnusedVars::new())
        .with_rule(Eqeqeq::new())
        .with_rule(NoTrailingSpaces::new())
        .with_rule(EolLast::new())
        .with_rule(CommaDangle::new())
        .with_rule(NoVar::new())
        .with_rule(NoConsole::new())
        .with_rule(NoDebugger::new())
        .with_rule(LinebreakStyle::new())
        .with_rule(NoEmpty::new());
    debug!("Registered {} built-in rules", catalog.len());
    catalog
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = builtin_catalog();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(
            ids,
            vec![
                "semi",
                "quotes",
                "indent",
                "no-unused-vars",
                "eqeqeq",
                "no-trailing-spaces",
                "eol-last",
                "comma-dangle",
                "no-var",
                "no-console",
                "no-debugger",
                "linebreak-style",
                "no-empty",
            ]
        );
    }

    #[test]
    fn test_recommended_rules() {
        let catalog = builtin_catalog();
        let recommended: Vec<&str> = catalog.recommended_ids().collect();
        assert_eq!(recommended, vec!["no-unused-vars", "no-debugger", "no-empty"]);
    }
}
