/// Parse a CSS selector once and keep it in a static
#[macro_export]
macro_rules! selector {
    ($e: expr) => {{
        use ::scraper::Selector;
        use ::std::sync::LazyLock;
        static SELECTOR: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($e).expect("selector literal must be valid"));
        &*SELECTOR
    }};
}
